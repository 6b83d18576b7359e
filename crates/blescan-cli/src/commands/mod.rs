//! Command implementations for the CLI.

mod config;
mod scan;

pub use config::cmd_config;
pub use scan::cmd_scan;
