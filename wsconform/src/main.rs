use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::debug;
use wsconform_core::config::Config;
use wsconform_core::verdict::Mode;

mod app;

use app::{ColorChoice, Overrides, Run};

#[derive(Parser, Debug)]
#[command(author, version, about = "wsconform - Autobahn|Testsuite report gate", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<Utf8PathBuf>,

    /// Reject every failed test case, ignoring the known-failure list
    #[arg(long)]
    strict: bool,

    /// Accept failures on the known-failure list, even if the config says strict
    #[arg(long, conflicts_with = "strict")]
    partial: bool,

    /// Report file to check instead of the mode's default index.json
    #[arg(short, long)]
    report: Option<Utf8PathBuf>,

    /// Agent name the report is keyed by
    #[arg(short, long)]
    agent: Option<String>,

    /// Color the verdict
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        let mode = if self.strict {
            Some(Mode::Strict)
        } else if self.partial {
            Some(Mode::Partial)
        } else {
            None
        };

        Overrides {
            mode,
            report_path: self.report.clone(),
            agent: self.agent.clone(),
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for the verdict
    let log_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    debug!("Starting wsconform v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration, then override with CLI arguments
    let config = match &args.config {
        Some(config_path) => Config::load_from_path(config_path),
        None => Config::discover(),
    };
    let overrides = args.overrides();
    let run = config.map(|config| Run::resolve(config, overrides));

    let color = args.color.enabled(std::io::stdout().is_terminal());
    let passed = app::run(
        run,
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
        color,
    )?;

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
