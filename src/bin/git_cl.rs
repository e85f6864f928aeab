use anyhow::Context;
use clap::{Parser, Subcommand};
use java_presubmit::utils::logger;
use java_presubmit::{load_settings, local_engine, EngineOptions, Event, PresubmitError, PresubmitOutput};
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "git-cl")]
#[command(about = "Changelist tool that runs the presubmit hook before upload")]
struct Args {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Preferences file (default: ./presubmit.toml)
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<GitClCommand>,
}

#[derive(Subcommand)]
enum GitClCommand {
    /// Run the presubmit hook, then upload
    Upload {
        /// Skip the warnings prompt; warnings still fail the hook
        #[arg(short, long)]
        force: bool,
    },
}

/// The change being uploaded.
struct Changelist {
    prefs: Option<PathBuf>,
}

impl Changelist {
    fn new(prefs: Option<PathBuf>) -> Self {
        Self { prefs }
    }

    /// Exits the process when the hook itself breaks; returns the hook output otherwise.
    async fn run_hook(&self, may_prompt: bool, verbose: bool) -> anyhow::Result<PresubmitOutput<BufReader<std::io::Stdin>, std::io::Stdout>> {
        let settings = load_settings(self.prefs.as_deref()).context("Failed to load presubmit preferences")?;
        let options = EngineOptions {
            verbose,
            may_prompt,
            default_presubmit: None,
        };
        let engine = local_engine(settings, Event::Upload, Vec::new(), options, false);

        let mut output = PresubmitOutput::new(Some(BufReader::new(std::io::stdin())), Some(std::io::stdout()));
        match engine.run(&mut output).await {
            Ok(_) => Ok(output),
            Err(e @ PresubmitError::PresubmitFailure { .. }) => die_with_error(&e.to_string()),
            Err(e) => Err(e.into()),
        }
    }
}

fn die_with_error(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn asctime() -> String {
    chrono::Local::now().format("%a %b %e %H:%M:%S %Y").to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let start_time = Instant::now();
    if args.verbose {
        println!("{}", asctime());
    }

    let status = match args.command {
        Some(GitClCommand::Upload { force }) => {
            let cl = Changelist::new(args.prefs);
            let hook_results = cl.run_hook(!force, args.verbose).await?;
            if hook_results.should_continue() {
                tracing::info!("Presubmit hook passed, ready to upload");
                0
            } else {
                1
            }
        }
        None => {
            println!("Nothing to do; try `git-cl upload`.");
            0
        }
    };

    if args.verbose {
        println!("{}", asctime());
        println!("TOTAL TIME IN MINUTES:");
        println!("{}", start_time.elapsed().as_secs_f64() / 60.0);
    }

    std::process::exit(status);
}
