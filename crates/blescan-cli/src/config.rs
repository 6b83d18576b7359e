//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use blescan_types::SignalTier;

use crate::cli::OutputFormat;

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Scan duration in seconds
    #[serde(default)]
    pub duration: Option<u64>,

    /// Run a second, shorter pass when few devices are found
    #[serde(default)]
    pub rescan: Option<bool>,

    /// Device count below which the second pass runs
    #[serde(default)]
    pub rescan_threshold: Option<usize>,

    /// Directory the PDF report is written to
    #[serde(default)]
    pub report_dir: Option<PathBuf>,

    /// Write the PDF report
    #[serde(default)]
    pub pdf: Option<bool>,

    /// Probe devices when a scan finds only a few
    #[serde(default)]
    pub probe: Option<bool>,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,

    /// Default output format ("text", "json" or "csv")
    #[serde(default)]
    pub format: Option<String>,

    /// Minimum signal tier to report, e.g. "medium"
    #[serde(default)]
    pub min_signal: Option<String>,
}

impl Config {
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("blescan")
            .join("config.toml")
    }

    /// Load the configuration from its default location.
    ///
    /// A missing file yields the defaults; an unreadable or invalid file
    /// yields the defaults with a warning.
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Like [`Config::load_from`], but an unreadable or invalid file is an
    /// error. Used before writing so a broken file is never overwritten.
    pub fn try_load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Parse an output format name as stored in the config file.
pub fn parse_format(value: &str) -> Option<OutputFormat> {
    match value.trim().to_ascii_lowercase().as_str() {
        "text" => Some(OutputFormat::Text),
        "json" => Some(OutputFormat::Json),
        "csv" => Some(OutputFormat::Csv),
        _ => None,
    }
}

pub fn resolve_duration(cmd_duration: Option<u64>, config: &Config, default: u64) -> u64 {
    cmd_duration.or(config.duration).unwrap_or(default)
}

pub fn resolve_format(cmd_format: Option<OutputFormat>, config: &Config) -> OutputFormat {
    if let Some(format) = cmd_format {
        return format;
    }
    match config.format.as_deref() {
        Some(value) => parse_format(value).unwrap_or_else(|| {
            warn!("Ignoring unknown format '{}' in config", value);
            OutputFormat::default()
        }),
        None => OutputFormat::default(),
    }
}

pub fn resolve_min_signal(cmd_min: Option<SignalTier>, config: &Config) -> Option<SignalTier> {
    cmd_min.or_else(|| {
        let value = config.min_signal.as_deref()?;
        match value.parse() {
            Ok(tier) => Some(tier),
            Err(e) => {
                warn!("Ignoring min_signal in config: {}", e);
                None
            }
        }
    })
}

/// A feature that is on by default: a `--no-*` flag disables it, otherwise
/// the config value decides.
pub fn resolve_enabled(disabled_flag: bool, config_value: Option<bool>) -> bool {
    !disabled_flag && config_value.unwrap_or(true)
}

pub fn resolve_report_dir(cmd_dir: Option<PathBuf>, config: &Config) -> PathBuf {
    cmd_dir
        .or_else(|| config.report_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_duration_uses_explicit_value() {
        let config = Config {
            duration: Some(30),
            ..Default::default()
        };
        assert_eq!(resolve_duration(Some(5), &config, 10), 5);
    }

    #[test]
    fn test_resolve_duration_explicit_default_beats_config() {
        let config = Config {
            duration: Some(30),
            ..Default::default()
        };
        assert_eq!(resolve_duration(Some(10), &config, 10), 10);
    }

    #[test]
    fn test_resolve_duration_uses_config_when_not_given() {
        let config = Config {
            duration: Some(30),
            ..Default::default()
        };
        assert_eq!(resolve_duration(None, &config, 10), 30);
    }

    #[test]
    fn test_resolve_duration_uses_default_when_no_config() {
        assert_eq!(resolve_duration(None, &Config::default(), 10), 10);
    }

    #[test]
    fn test_resolve_format() {
        let config = Config {
            format: Some("JSON".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_format(None, &config), OutputFormat::Json);
        assert_eq!(resolve_format(Some(OutputFormat::Csv), &config), OutputFormat::Csv);
        assert_eq!(resolve_format(None, &Config::default()), OutputFormat::Text);

        let bad = Config {
            format: Some("xml".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_format(None, &bad), OutputFormat::Text);
    }

    #[test]
    fn test_resolve_format_explicit_default_beats_config() {
        let config = Config {
            format: Some("json".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_format(Some(OutputFormat::Text), &config), OutputFormat::Text);
    }

    #[test]
    fn test_resolve_min_signal() {
        let config = Config {
            min_signal: Some("weak".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_min_signal(None, &config), Some(SignalTier::Weak));
        assert_eq!(
            resolve_min_signal(Some(SignalTier::Strong), &config),
            Some(SignalTier::Strong)
        );

        let bad = Config {
            min_signal: Some("loud".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_min_signal(None, &bad), None);
    }

    #[test]
    fn test_resolve_enabled() {
        assert!(resolve_enabled(false, None));
        assert!(!resolve_enabled(false, Some(false)));
        assert!(!resolve_enabled(true, Some(true)));
        assert!(resolve_enabled(false, Some(true)));
    }

    #[test]
    fn test_resolve_report_dir() {
        let config = Config {
            report_dir: Some(PathBuf::from("/tmp/reports")),
            ..Default::default()
        };
        assert_eq!(
            resolve_report_dir(Some(PathBuf::from("out")), &config),
            PathBuf::from("out")
        );
        assert_eq!(
            resolve_report_dir(None, &config),
            PathBuf::from("/tmp/reports")
        );
        assert_eq!(
            resolve_report_dir(None, &Config::default()),
            PathBuf::from(".")
        );
    }

    #[test]
    fn test_config_path_ends_with_blescan() {
        let path = Config::path();
        assert!(path.ends_with("blescan/config.toml"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            duration: Some(20),
            pdf: Some(false),
            min_signal: Some("medium".to_string()),
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            Config::load_from(&dir.path().join("absent.toml")),
            Config::default()
        );
    }

    #[test]
    fn test_load_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "duration = \"not a number\"").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_partial_config_parses() {
        let config: Config = toml::from_str("probe = false\nno_color = true\n").unwrap();
        assert_eq!(config.probe, Some(false));
        assert!(config.no_color);
        assert_eq!(config.duration, None);
    }
}
