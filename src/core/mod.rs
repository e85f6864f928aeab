pub mod engine;
pub mod output;
pub mod paths;
pub mod pipeline;

pub use crate::domain::ports::{ConfigProvider, OutputSink, Pipeline, SourceTree};
pub use crate::utils::error::Result;
pub use engine::{EngineOptions, PresubmitEngine};
pub use output::PresubmitOutput;
pub use pipeline::DirectoryPipeline;

use crate::adapters::LocalSourceTree;
use crate::config::PresubmitSettings;
use crate::domain::model::Event;

pub type LocalEngine = PresubmitEngine<DirectoryPipeline<LocalSourceTree, PresubmitSettings>>;

/// An engine over the settings' base directory. Empty `files` means every
/// file under it.
pub fn local_engine(
    settings: PresubmitSettings,
    event: Event,
    files: Vec<String>,
    options: EngineOptions,
    monitor_enabled: bool,
) -> LocalEngine {
    let tree = LocalSourceTree::new(settings.base_dir(), settings.ignored_dirs().to_vec());
    let pipeline = DirectoryPipeline::new(tree, settings, event).with_files(files);
    PresubmitEngine::new_with_monitoring(pipeline, options, monitor_enabled)
}
