use crate::domain::model::Event;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "presubmit")]
#[command(about = "Runs presubmit checks over the Java sources of a change", version)]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_name = "FILE", help = "Preferences file (default: ./presubmit.toml)")]
    pub prefs: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run every presubmit script that applies to the change
    Check(CheckArgs),
    /// Print the structural tree of a Java file
    Outline { file: PathBuf },
    /// Print each string and character literal with its escapes
    Literals { file: PathBuf },
    /// List the available rules
    Rules,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    #[arg(long, help = "Fail on warnings instead of asking")]
    pub no_prompt: bool,

    #[arg(long, help = "Also run the built-in default presubmit script")]
    pub default_presubmit: bool,

    #[arg(long, help = "Log CPU and memory use per phase")]
    pub monitor: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long, value_enum, default_value_t = Event::Upload)]
    pub event: Event,

    /// Files to check, relative to the base directory (default: every file under it)
    pub files: Vec<String>,
}

impl Validate for CheckArgs {
    fn validate(&self) -> Result<()> {
        for file in &self.files {
            validate_path("files", file)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check() {
        let cli = CliConfig::parse_from([
            "presubmit", "-v", "check", "--no-prompt", "--format", "json", "--event", "commit", "A.java",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Command::Check(args) => {
                assert!(args.no_prompt);
                assert!(!args.default_presubmit);
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(args.event, Event::Commit);
                assert_eq!(args.files, vec!["A.java".to_string()]);
                assert!(args.validate().is_ok());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_outline_with_global_prefs() {
        let cli = CliConfig::parse_from(["presubmit", "outline", "A.java", "--prefs", "p.toml"]);
        assert_eq!(cli.prefs, Some(PathBuf::from("p.toml")));
        assert!(matches!(cli.command, Command::Outline { .. }));
    }
}
