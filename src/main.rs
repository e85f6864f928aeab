use clap::Parser;
use java_presubmit::config::cli::{CheckArgs, Command, OutputFormat};
use java_presubmit::config::DEFAULT_PRESUBMIT;
use java_presubmit::java::{self, EscapeKind};
use java_presubmit::rules;
use java_presubmit::utils::error::ErrorSeverity;
use java_presubmit::utils::{logger, validation::Validate};
use java_presubmit::{load_settings, local_engine, CliConfig, EngineOptions, PresubmitOutput, Result};
use std::io::BufReader;
use std::path::Path;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    let json_output = matches!(&config.command, Command::Check(args) if args.format == OutputFormat::Json);
    if json_output {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    let outcome = match &config.command {
        Command::Check(args) => run_check(&config, args).await,
        Command::Outline { file } => print_outline(file).await,
        Command::Literals { file } => print_literals(file).await,
        Command::Rules => {
            print_rules();
            Ok(true)
        }
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!(
                "❌ presubmit failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

/// Whether the change may go ahead.
async fn run_check(config: &CliConfig, args: &CheckArgs) -> Result<bool> {
    args.validate()?;
    let settings = load_settings(config.prefs.as_deref())?;
    tracing::info!("Checking {}", settings.base_dir.display());

    if args.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let json_output = args.format == OutputFormat::Json;
    let options = EngineOptions {
        verbose: config.verbose,
        may_prompt: !args.no_prompt && !json_output,
        default_presubmit: args.default_presubmit.then(|| DEFAULT_PRESUBMIT.to_string()),
    };
    let engine = local_engine(settings, args.event, args.files.clone(), options, args.monitor);

    if json_output {
        let mut output = PresubmitOutput::capture();
        let results = engine.run(&mut output).await?;
        let passed = output.should_continue();
        let report = serde_json::json!({
            "checked_at": chrono::Utc::now(),
            "passed": passed,
            "results": results,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(passed);
    }

    let mut output = PresubmitOutput::new(Some(BufReader::new(std::io::stdin())), Some(std::io::stdout()));
    engine.run(&mut output).await?;
    Ok(output.should_continue())
}

async fn print_outline(file: &Path) -> Result<bool> {
    let source = tokio::fs::read_to_string(file).await?;
    let outline = java::outline(&source)?;
    print!("{}", outline.render());
    Ok(true)
}

async fn print_literals(file: &Path) -> Result<bool> {
    let source = tokio::fs::read_to_string(file).await?;
    for token in java::tokenize(&source)? {
        let Some(literal) = token.literal() else {
            continue;
        };
        println!("{}:{} {}", token.line, token.col, token.text);
        println!("  value: {:?}", literal.value);
        for escape in &literal.escapes {
            let kind = match escape.kind {
                EscapeKind::Simple => "simple",
                EscapeKind::Octal => "octal",
                EscapeKind::Unicode => "unicode",
            };
            match escape.preferred() {
                Some(preferred) => println!("  {} {} = {:?} (prefer \\{})", kind, escape.raw, escape.value, preferred),
                None => println!("  {} {} = {:?}", kind, escape.raw, escape.value),
            }
        }
    }
    Ok(true)
}

fn print_rules() {
    for suite in rules::suite_names() {
        println!("{}:", suite);
        for rule in rules::suite(suite).unwrap_or_default() {
            println!("  {:<18} {}", rule.name(), rule.summary());
        }
    }
}
