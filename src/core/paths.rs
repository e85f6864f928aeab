use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const PRESUBMIT_FILE_NAME: &str = "PRESUBMIT.toml";

/// Forward slashes, `.` and `..` collapsed lexically; an empty path is `.`.
pub fn normpath(path: &str) -> String {
    let path = path.replace(std::path::MAIN_SEPARATOR, "/");
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            part => parts.push(part),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Directory part of a normalized local path, `""` for the root.
pub fn parent_dir(local_path: &str) -> &str {
    local_path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// The local directory a presubmit script governs.
pub fn governed_dir(presubmit_path: &Path, root: &Path) -> String {
    let dir = presubmit_path.parent().unwrap_or(presubmit_path);
    let local = dir.strip_prefix(root).unwrap_or(dir);
    match normpath(&local.to_string_lossy()).as_str() {
        "." => String::new(),
        other => other.to_string(),
    }
}

/// Every existing presubmit script in the directories enclosing `files`, up to
/// and including `root`. Parents sort before their children.
pub fn list_relevant_presubmit_files(files: &[String], root: &Path) -> Vec<PathBuf> {
    let mut candidates = BTreeSet::new();
    for file in files {
        let file = normpath(file);
        if file == ".." || file.starts_with("../") || file.starts_with('/') {
            tracing::debug!("{} is outside {}", file, root.display());
            continue;
        }
        let mut dir = parent_dir(&file);
        while candidates.insert(dir.to_string()) && !dir.is_empty() {
            dir = parent_dir(dir);
        }
    }

    candidates
        .into_iter()
        .map(|dir| {
            if dir.is_empty() {
                root.join(PRESUBMIT_FILE_NAME)
            } else {
                root.join(dir).join(PRESUBMIT_FILE_NAME)
            }
        })
        .filter(|path| path.is_file())
        .collect()
}
