//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use blescan_types::SignalTier;

/// Default scan duration in seconds.
pub const DEFAULT_DURATION_SECS: u64 = 10;

/// Default per-device probe timeout in seconds.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 15;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Visual styling mode for output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StyleMode {
    /// Compact table with colors
    Minimal,
    /// Numbered entries with icons and signal bars (default)
    #[default]
    Rich,
    /// Plain table with no decorations (for scripting)
    Plain,
}

#[derive(Parser)]
#[command(name = "blescan")]
#[command(
    author,
    version,
    about = "Scan for Bluetooth Low Energy devices and write a report",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Visual styling mode (minimal, rich, plain)
    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "rich",
        env = "BLESCAN_STYLE"
    )]
    pub style: StyleMode,

    /// Write console output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Scan options used when no subcommand is given
    #[command(flatten)]
    pub scan: ScanArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The scan arguments to run with: the `scan` subcommand's if present,
    /// otherwise the top-level ones.
    pub fn scan_args(&self) -> Option<&ScanArgs> {
        match &self.command {
            None => Some(&self.scan),
            Some(Commands::Scan(args)) => Some(args),
            Some(_) => None,
        }
    }
}

/// Arguments for a scan run.
#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Scan duration in seconds [default: 10]
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Do not run a second pass when few devices are found
    #[arg(long)]
    pub no_rescan: bool,

    /// Only report devices at or above this signal tier
    /// (very-strong, strong, medium, weak, very-weak)
    #[arg(long, value_parser = parse_signal_tier)]
    pub min_signal: Option<SignalTier>,

    /// Output format [default: text]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Omit header row in CSV output (useful for appending)
    #[arg(long)]
    pub no_header: bool,

    /// Skip the PDF report
    #[arg(long)]
    pub no_pdf: bool,

    /// Directory for the PDF report (default: current directory)
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Do not connect to devices when only a few are found
    #[arg(long)]
    pub no_probe: bool,

    /// Per-device connection timeout in seconds when probing
    #[arg(long, default_value_t = DEFAULT_PROBE_TIMEOUT_SECS)]
    pub probe_timeout: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan for nearby BLE devices (the default)
    Scan(ScanArgs),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Parse a signal tier name for clap.
fn parse_signal_tier(s: &str) -> Result<SignalTier, String> {
    s.parse::<SignalTier>().map_err(|e| e.to_string())
}

/// Configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// Scan duration in seconds
    Duration,
    /// Run a second pass when few devices are found
    Rescan,
    /// Device count below which the second pass runs
    RescanThreshold,
    /// Directory for PDF reports
    ReportDir,
    /// Write the PDF report
    Pdf,
    /// Probe devices when only a few are found
    Probe,
    /// Disable colored output
    NoColor,
    /// Default output format
    Format,
    /// Minimum signal tier to report
    MinSignal,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Configuration value
        value: String,
    },

    /// Unset (remove) a configuration value
    Unset {
        /// Configuration key to remove
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_uses_top_level_scan_args() {
        let cli = Cli::try_parse_from(["blescan", "--duration", "5", "--no-pdf"]).unwrap();
        let args = cli.scan_args().unwrap();
        assert_eq!(args.duration, Some(5));
        assert!(args.no_pdf);
        assert!(!args.no_probe);
    }

    #[test]
    fn test_scan_subcommand_args() {
        let cli = Cli::try_parse_from([
            "blescan",
            "scan",
            "--min-signal",
            "medium",
            "--format",
            "csv",
            "--no-rescan",
        ])
        .unwrap();
        let args = cli.scan_args().unwrap();
        assert_eq!(args.min_signal, Some(SignalTier::Medium));
        assert_eq!(args.format, Some(OutputFormat::Csv));
        assert!(args.no_rescan);
        assert_eq!(args.duration, None);
    }

    #[test]
    fn test_invalid_signal_tier_rejected() {
        assert!(Cli::try_parse_from(["blescan", "--min-signal", "loud"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["blescan", "scan", "--quiet", "--style", "plain"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.style, StyleMode::Plain);
    }

    #[test]
    fn test_config_subcommand_has_no_scan_args() {
        let cli = Cli::try_parse_from(["blescan", "config", "path"]).unwrap();
        assert!(cli.scan_args().is_none());
    }
}
