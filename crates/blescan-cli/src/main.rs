mod cli;
mod commands;
mod config;
mod format;
mod pdf;
mod report;
mod style;
mod util;

use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{cmd_config, cmd_scan};
use config::Config;
use format::FormatOptions;

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "blescan", &mut io::stdout());
        return Ok(());
    }

    // Initialize tracing
    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so stdout stays clean for JSON/CSV output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::load();
    let opts =
        FormatOptions::new(cli.no_color || config.no_color, cli.style).with_compact(cli.compact);

    if let Some(args) = cli.scan_args() {
        return cmd_scan(args, cli.output.as_ref(), cli.quiet, &opts, &config).await;
    }

    match cli.command {
        Some(Commands::Config { action }) => cmd_config(action, opts.no_color)?,
        Some(Commands::Scan(_)) | Some(Commands::Completions { .. }) | None => {}
    }

    Ok(())
}
