use crate::core::output::PresubmitOutput;
use crate::core::paths::PRESUBMIT_FILE_NAME;
use crate::domain::model::PresubmitResult;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::io::{BufRead, Write};
use std::time::Instant;

pub const WARNINGS_PROMPT: &str = "There were presubmit warnings. Are you sure you wish to continue? (y/N): ";

#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub verbose: bool,
    /// Ask before continuing past warnings; otherwise warnings fail the run.
    pub may_prompt: bool,
    /// Script text run as if it sat at the root, before the discovered scripts.
    pub default_presubmit: Option<String>,
}

pub struct PresubmitEngine<P: Pipeline> {
    pipeline: P,
    options: EngineOptions,
    monitor: SystemMonitor,
}

impl<P: Pipeline> PresubmitEngine<P> {
    pub fn new(pipeline: P, options: EngineOptions) -> Self {
        Self::new_with_monitoring(pipeline, options, false)
    }

    pub fn new_with_monitoring(pipeline: P, options: EngineOptions, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            options,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs every presubmit script that applies to the change and reports the
    /// results to `output`. Whether the caller should go on is
    /// `output.should_continue()`.
    pub async fn run<R: BufRead, W: Write>(
        &self,
        output: &mut PresubmitOutput<R, W>,
    ) -> Result<Vec<PresubmitResult>> {
        let start_time = Instant::now();
        let verbose = self.options.verbose;

        let change = self.pipeline.discover().await?;
        self.monitor.log_stats("Discovery");
        if change.presubmit_files.is_empty() && verbose {
            output.write(&format!("Warning, no {} found.\n", PRESUBMIT_FILE_NAME));
        }

        let mut results = Vec::new();
        if let Some(default_presubmit) = &self.options.default_presubmit {
            if verbose {
                output.write("Running default presubmit script.\n");
            }
            let fake_path = change.root.join(PRESUBMIT_FILE_NAME);
            results.extend(
                self.pipeline
                    .exec_script(&change, default_presubmit, &fake_path)
                    .await?,
            );
        }

        for presubmit_path in &change.presubmit_files {
            if verbose {
                output.write(&format!("Running {}\n", presubmit_path.display()));
            }
            let script_text = self.pipeline.read_script(presubmit_path).await?;
            results.extend(
                self.pipeline
                    .exec_script(&change, &script_text, presubmit_path)
                    .await?,
            );
        }
        self.monitor.log_stats("Scripts");

        let (errors, rest): (Vec<&PresubmitResult>, Vec<&PresubmitResult>) =
            results.iter().partition(|r| r.level.is_fatal());
        let (warnings, notifications): (Vec<&PresubmitResult>, Vec<&PresubmitResult>) =
            rest.into_iter().partition(|r| r.level.should_prompt());

        output.write("\n");
        for (name, group) in [("Messages", &notifications), ("Warnings", &warnings), ("ERRORS", &errors)] {
            if group.is_empty() {
                continue;
            }
            output.write(&format!("** Presubmit {} **\n", name));
            for result in group.iter() {
                result.handle(output);
                output.write("\n");
            }
        }

        let total_time = start_time.elapsed().as_secs_f64();
        if total_time > 1.0 {
            output.write(&format!("Presubmit checks took {:.1}s to calculate.\n\n", total_time));
        }

        if errors.is_empty() {
            if warnings.is_empty() {
                output.write("Presubmit checks passed.\n");
            } else if self.options.may_prompt {
                output.prompt_yes_no(WARNINGS_PROMPT);
            } else {
                output.fail();
            }
        }

        tracing::info!(
            "Presubmit finished: {} error(s), {} warning(s), {} message(s)",
            errors.len(),
            warnings.len(),
            notifications.len()
        );
        self.monitor.log_final_stats();
        Ok(results)
    }
}
