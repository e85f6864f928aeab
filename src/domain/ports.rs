use crate::domain::model::{Change, Event, PresubmitResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Read access to the files of a repository, addressed by local path.
pub trait SourceTree: Send + Sync {
    fn root(&self) -> &Path;
    fn list_files(&self) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
    fn read_file(&self, local_path: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_dir(&self) -> &Path;
    fn license(&self) -> Option<&str>;
    fn column_limit(&self) -> usize;
    fn ignored_dirs(&self) -> &[String];
}

/// Where presubmit reports are written.
pub trait OutputSink {
    fn write(&mut self, s: &str);
    fn fail(&mut self);
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    fn event(&self) -> Event;
    /// Collects the affected files and the presubmit scripts that apply to them.
    async fn discover(&self) -> Result<Change>;
    async fn read_script(&self, presubmit_path: &Path) -> Result<String>;
    /// Runs one presubmit script; `presubmit_path` locates the directory it governs.
    async fn exec_script(
        &self,
        change: &Change,
        script_text: &str,
        presubmit_path: &Path,
    ) -> Result<Vec<PresubmitResult>>;
}
