pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod java;
pub mod rules;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::LocalSourceTree;
pub use config::{load_settings, PresubmitSettings};
pub use core::{local_engine, DirectoryPipeline, EngineOptions, PresubmitEngine, PresubmitOutput};
pub use domain::model::{Event, PresubmitResult, ResultLevel};
pub use utils::error::{PresubmitError, Result};
