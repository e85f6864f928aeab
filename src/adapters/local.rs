use crate::core::paths::normpath;
use crate::domain::ports::SourceTree;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The files under a directory on the local file system.
#[derive(Debug, Clone)]
pub struct LocalSourceTree {
    root: PathBuf,
    ignored: Vec<String>,
}

impl LocalSourceTree {
    pub fn new(root: impl Into<PathBuf>, ignored: Vec<String>) -> Self {
        Self {
            root: root.into(),
            ignored,
        }
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignored.iter().any(|i| i == name)
    }
}

impl SourceTree for LocalSourceTree {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn list_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_ignored(&entry.file_name().to_string_lossy()));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let local = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            files.push(normpath(&local.to_string_lossy()));
        }

        tracing::debug!("Found {} files under {}", files.len(), self.root.display());
        Ok(files)
    }

    async fn read_file(&self, local_path: &str) -> Result<String> {
        let bytes = tokio::fs::read(self.root.join(local_path)).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
