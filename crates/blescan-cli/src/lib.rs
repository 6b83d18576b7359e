//! Command-line scanner for Bluetooth Low Energy devices.
//!
//! `blescan` listens for BLE advertisements for a fixed window, classifies each
//! device by manufacturer and type, and prints the results. A PDF report is
//! written alongside the console output.
//!
//! # Features
//!
//! - **Two-pass discovery**: A shorter follow-up scan when few devices answer
//! - **Classification**: Company IDs, MAC OUIs, service UUIDs and name patterns
//! - **Connection test**: Brief GATT connections to the nearest devices
//! - **Multiple output formats**: Text, JSON, and CSV output support
//! - **PDF report**: Landscape table of every device plus scan statistics
//! - **Configuration file**: Persistent defaults for duration, report directory and output
//! - **Shell completions**: Generate completions for bash, zsh, fish, and PowerShell
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scan` | Scan for nearby BLE devices (also the default) |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |
//!
//! # Configuration
//!
//! The CLI stores configuration in `~/.config/blescan/config.toml` (or platform equivalent).
//! Configuration options include:
//!
//! - `duration`: Scan window in seconds
//! - `report_dir`: Where PDF reports are written
//! - `format`: Default output format
//! - `min_signal`: Weakest signal tier to report
//! - `no_color`: Disable colored output
//!
//! # Environment Variables
//!
//! - `BLESCAN_STYLE`: Visual style (`rich`, `minimal`, `plain`)
//! - `NO_COLOR`: Disable colored output when set
//!
//! # Examples
//!
//! Scan with defaults and write a PDF into the current directory:
//! ```bash
//! blescan
//! ```
//!
//! Scan for 20 seconds, only strong signals, as JSON:
//! ```bash
//! blescan scan --duration 20 --min-signal strong --format json --no-pdf
//! ```
//!
//! Keep reports in one place:
//! ```bash
//! blescan config set report-dir ~/ble-reports
//! ```

// This crate is primarily a binary CLI application.
// The command implementations live alongside main.rs.

// Re-export core dependencies for convenience
pub use blescan_core;
pub use blescan_types;
