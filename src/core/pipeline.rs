use crate::config::script::PresubmitScript;
use crate::core::paths::{governed_dir, list_relevant_presubmit_files, normpath};
use crate::domain::model::{AffectedFile, Change, Event, PresubmitResult, SourceFile};
use crate::domain::ports::{ConfigProvider, Pipeline, SourceTree};
use crate::rules::{check_files, RuleContext};
use crate::utils::error::{PresubmitError, Result};
use async_trait::async_trait;
use std::path::Path;

/// Runs declarative presubmit scripts over the files of a source tree.
pub struct DirectoryPipeline<S: SourceTree, C: ConfigProvider> {
    tree: S,
    config: C,
    event: Event,
    explicit_files: Vec<String>,
}

impl<S: SourceTree, C: ConfigProvider> DirectoryPipeline<S, C> {
    pub fn new(tree: S, config: C, event: Event) -> Self {
        Self {
            tree,
            config,
            event,
            explicit_files: Vec::new(),
        }
    }

    /// Restricts the change to `files` instead of every file in the tree.
    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.explicit_files = files;
        self
    }

    fn local_path(&self, file: &str) -> String {
        let path = Path::new(file);
        let local = path.strip_prefix(self.tree.root()).unwrap_or(path);
        normpath(&local.to_string_lossy())
    }
}

#[async_trait]
impl<S: SourceTree, C: ConfigProvider> Pipeline for DirectoryPipeline<S, C> {
    fn event(&self) -> Event {
        self.event
    }

    async fn discover(&self) -> Result<Change> {
        let files = if self.explicit_files.is_empty() {
            self.tree.list_files().await?
        } else {
            self.explicit_files.iter().map(|f| self.local_path(f)).collect()
        };

        let root = self.tree.root().to_path_buf();
        let presubmit_files = list_relevant_presubmit_files(&files, &root);
        tracing::debug!(
            "Change has {} file(s) and {} presubmit script(s)",
            files.len(),
            presubmit_files.len()
        );

        Ok(Change {
            files: files.into_iter().map(|f| AffectedFile::new(f, &root)).collect(),
            presubmit_files,
            root,
        })
    }

    async fn read_script(&self, presubmit_path: &Path) -> Result<String> {
        Ok(tokio::fs::read_to_string(presubmit_path).await?)
    }

    async fn exec_script(
        &self,
        change: &Change,
        script_text: &str,
        presubmit_path: &Path,
    ) -> Result<Vec<PresubmitResult>> {
        let script = PresubmitScript::from_toml_str(script_text).map_err(|e| {
            PresubmitError::presubmit_failure(format!(
                "\"{}\" has an exception.\n{}",
                presubmit_path.display(),
                e
            ))
        })?;

        let checks = script.checks_for(self.event);
        if checks.is_empty() {
            tracing::debug!("{} has no {:?} checks", presubmit_path.display(), self.event);
            return Ok(Vec::new());
        }

        let function_name = match self.event {
            Event::Upload => "CheckChangeOnUpload",
            Event::Commit => "CheckChangeOnCommit",
        };
        tracing::info!("Running {} in {}", function_name, presubmit_path.display());

        let dir = governed_dir(presubmit_path, &change.root);
        let mut results = Vec::new();
        for check in checks {
            let mut sources = Vec::new();
            for file in change.files_under(&dir).filter(|f| check.matches(f)) {
                let content = self.tree.read_file(file.local_path()).await?;
                sources.push(SourceFile::new(file.local_path(), content));
            }

            let ctx = RuleContext {
                license: self.config.license(),
                column_limit: check.column_limit.unwrap_or(self.config.column_limit()),
            };
            results.extend(check_files(&check.rules(), &sources, &ctx, check.level));
        }

        tracing::info!("Running {} done.", function_name);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PresubmitSettings;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    /// An in-memory tree.
    struct MemoryTree {
        root: PathBuf,
        files: BTreeMap<String, String>,
    }

    impl MemoryTree {
        fn new(files: &[(&str, &str)]) -> Self {
            Self {
                root: PathBuf::from("/repo"),
                files: files.iter().map(|(p, c)| (p.to_string(), c.to_string())).collect(),
            }
        }
    }

    impl SourceTree for MemoryTree {
        fn root(&self) -> &Path {
            &self.root
        }

        async fn list_files(&self) -> Result<Vec<String>> {
            Ok(self.files.keys().cloned().collect())
        }

        async fn read_file(&self, local_path: &str) -> Result<String> {
            self.files.get(local_path).cloned().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, local_path.to_string()).into()
            })
        }
    }

    fn pipeline(files: &[(&str, &str)]) -> DirectoryPipeline<MemoryTree, PresubmitSettings> {
        DirectoryPipeline::new(
            MemoryTree::new(files),
            PresubmitSettings::with_base_dir("/repo"),
            Event::Upload,
        )
    }

    #[tokio::test]
    async fn test_script_only_sees_files_under_its_directory() {
        let pipeline = pipeline(&[
            ("a/A.java", "import x.*;\nclass A {}\n"),
            ("b/B.java", "import y.*;\nclass B {}\n"),
        ]);
        let change = pipeline.discover().await.unwrap();
        let script = "[[upload]]\nsuite = \"java_style\"\nlevel = \"error\"\n";
        let results = pipeline
            .exec_script(&change, script, Path::new("/repo/a/PRESUBMIT.toml"))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].level.is_fatal());
        assert_eq!(results[0].items, vec!["a/A.java:1 MSG: import x.*;"]);
    }

    #[tokio::test]
    async fn test_script_without_event_checks_yields_nothing() {
        let pipeline = pipeline(&[("A.java", "import x.*;\nclass A {}\n")]);
        let change = pipeline.discover().await.unwrap();
        let results = pipeline
            .exec_script(&change, "[[commit]]\nsuite = \"java_style\"\n", Path::new("/repo/PRESUBMIT.toml"))
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_broken_script_is_a_presubmit_failure() {
        let pipeline = pipeline(&[]);
        let change = pipeline.discover().await.unwrap();
        let err = pipeline
            .exec_script(&change, "[[upload]\n", Path::new("/repo/PRESUBMIT.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, PresubmitError::PresubmitFailure { .. }));
        assert!(err.to_string().starts_with("\"/repo/PRESUBMIT.toml\" has an exception.\n"));
    }

    #[tokio::test]
    async fn test_explicit_files_are_normalized() {
        let pipeline = pipeline(&[]).with_files(vec!["/repo/src/./A.java".into(), "src/b/../B.java".into()]);
        let change = pipeline.discover().await.unwrap();
        let paths: Vec<&str> = change.files.iter().map(|f| f.local_path()).collect();
        assert_eq!(paths, vec!["src/A.java", "src/B.java"]);
        assert!(change.presubmit_files.is_empty());
    }
}
