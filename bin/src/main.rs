//! m73eta CLI - Print-time estimates from slicer-embedded M73 directives.

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{CommandFactory, Parser, Subcommand};
use m73eta_lib::{PrintMode, SettingsStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

#[derive(Parser)]
#[command(name = "m73eta")]
#[command(about = "Print-time estimates from slicer-embedded M73 directives", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output and warnings)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Settings file. Defaults to the platform configuration directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the initial print-time estimate from G-code files
    Analyze {
        /// Files to analyse, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Skip the per-line throttle
        #[arg(long)]
        high_priority: bool,

        /// In silent mode, stop at the first remaining time of either kind
        #[arg(long)]
        first_match: bool,

        /// Mode to analyse in (normal, silent). Defaults to the settings.
        #[arg(short, long)]
        mode: Option<PrintMode>,

        /// Print one JSON object per file
        #[arg(long)]
        json: bool,
    },

    /// Stream a file as if it was being printed and show the estimate
    Replay {
        /// G-code file to replay
        file: PathBuf,

        /// Refresh the estimate every N lines
        #[arg(long, default_value = "100", value_parser = clap::value_parser!(u64).range(1..))]
        every: u64,

        /// Pause after each line, in milliseconds
        #[arg(long, default_value = "0")]
        delay_ms: u64,
    },

    /// Show or change the settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Settings actions.
#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current settings
    Show,

    /// Honour silent-mode (S) remaining times
    SetSilent {
        /// true/false, yes/no, on/off or 1/0
        #[arg(value_parser = BoolishValueParser::new())]
        enabled: bool,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let settings = cli
        .config
        .map_or_else(SettingsStore::with_default_path, SettingsStore::open)
        .context("Failed to load settings")?;
    let settings = Arc::new(settings);

    match command {
        Commands::Analyze {
            files,
            high_priority,
            first_match,
            mode,
            json,
        } => {
            let mode = mode.unwrap_or_else(|| settings.print_mode());
            commands::analyze::analyze(&files, mode, high_priority, first_match, json).await
        }
        Commands::Replay {
            file,
            every,
            delay_ms,
        } => commands::replay::replay(settings, &file, every, delay_ms, cli.quiet).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&settings),
            ConfigAction::SetSilent { enabled } => commands::config::set_silent(&settings, enabled),
        },
    }
}
