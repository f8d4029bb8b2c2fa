//! linker - Expose files from a source tree under target directories via
//! symbolic links.
//!
//! Usage:
//!   linker -c CONFIG              Create links described by CONFIG
//!   linker -c CONFIG --dry-run    Show what would be linked
//!   linker --help                 Show help

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use linker_core::{Configuration, Report};
use linker_ops::{LinkMode, Pipeline};

#[derive(Parser)]
#[command(
    name = "linker",
    version,
    about = "Create symbolic links from target directories to a single source directory",
    long_about = "linker discovers everything below the configured source directory, skips \
                  what is already linked from one of the targets, and links whatever a \
                  link map matches into its target directory."
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    configuration: PathBuf,

    /// Run without performing any changes
    #[arg(long)]
    dry_run: bool,

    /// Output format for the report
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let configuration = Configuration::from_file(&cli.configuration).with_context(|| {
        format!(
            "Unable to load configuration from {}",
            cli.configuration.display()
        )
    })?;

    let mode = if cli.dry_run {
        LinkMode::DryRun
    } else {
        LinkMode::Real
    };

    let report = Pipeline::new(&configuration).run(mode);
    info!(
        %mode,
        created = report.created.len(),
        failed = report.failures.len(),
        residual = report.residual_sources(),
        "Run complete"
    );
    print_report(&report, cli.format)?;

    Ok(())
}

/// Install a stderr subscriber honouring `RUST_LOG`, defaulting to `info`.
fn init_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init()?;

    Ok(())
}

/// Print the residual tree and counts.
fn print_report(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{report}");
            if !report.failures.is_empty() {
                eprintln!();
                eprintln!("{} link(s) could not be created:", report.failures.len());
                for failure in &report.failures {
                    eprintln!("  {}: {}", failure.link, failure.message);
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
    }

    Ok(())
}
