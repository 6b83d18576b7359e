//! Config command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use blescan_types::SignalTier;

use crate::cli::{ConfigAction, ConfigKey};
use crate::config::{Config, parse_format};
use crate::style;

/// Parse boolean argument with flexible input
fn parse_bool_arg(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "enable" | "enabled" => Ok(true),
        "false" | "no" | "off" | "0" | "disable" | "disabled" => Ok(false),
        _ => bail!(
            "Invalid boolean value '{}'. Use: true/false, yes/no, on/off, 1/0",
            s
        ),
    }
}

/// Current value of `key`, or `None` when unset.
pub fn get_value(config: &Config, key: ConfigKey) -> Option<String> {
    match key {
        ConfigKey::Duration => config.duration.map(|v| v.to_string()),
        ConfigKey::Rescan => config.rescan.map(|v| v.to_string()),
        ConfigKey::RescanThreshold => config.rescan_threshold.map(|v| v.to_string()),
        ConfigKey::ReportDir => config.report_dir.as_ref().map(|p| p.display().to_string()),
        ConfigKey::Pdf => config.pdf.map(|v| v.to_string()),
        ConfigKey::Probe => config.probe.map(|v| v.to_string()),
        ConfigKey::NoColor => Some(config.no_color.to_string()),
        ConfigKey::Format => config.format.clone(),
        ConfigKey::MinSignal => config.min_signal.clone(),
    }
}

/// Validate `value` and store it under `key`.
pub fn set_value(config: &mut Config, key: ConfigKey, value: &str) -> Result<()> {
    match key {
        ConfigKey::Duration => {
            let secs: u64 = value
                .parse()
                .with_context(|| format!("Invalid duration '{}'", value))?;
            if secs == 0 {
                bail!("Duration must be at least 1 second");
            }
            config.duration = Some(secs);
        }
        ConfigKey::Rescan => config.rescan = Some(parse_bool_arg(value)?),
        ConfigKey::RescanThreshold => {
            config.rescan_threshold = Some(
                value
                    .parse()
                    .with_context(|| format!("Invalid threshold '{}'", value))?,
            );
        }
        ConfigKey::ReportDir => config.report_dir = Some(PathBuf::from(value)),
        ConfigKey::Pdf => config.pdf = Some(parse_bool_arg(value)?),
        ConfigKey::Probe => config.probe = Some(parse_bool_arg(value)?),
        ConfigKey::NoColor => config.no_color = parse_bool_arg(value)?,
        ConfigKey::Format => {
            if parse_format(value).is_none() {
                bail!("Invalid format '{}'. Use: text, json, csv", value);
            }
            config.format = Some(value.to_lowercase());
        }
        ConfigKey::MinSignal => {
            let tier: SignalTier = value.parse()?;
            config.min_signal = Some(tier.label().to_lowercase().replace(' ', "-"));
        }
    }
    Ok(())
}

/// Reset `key` to its default.
pub fn unset_value(config: &mut Config, key: ConfigKey) {
    match key {
        ConfigKey::Duration => config.duration = None,
        ConfigKey::Rescan => config.rescan = None,
        ConfigKey::RescanThreshold => config.rescan_threshold = None,
        ConfigKey::ReportDir => config.report_dir = None,
        ConfigKey::Pdf => config.pdf = None,
        ConfigKey::Probe => config.probe = None,
        ConfigKey::NoColor => config.no_color = false,
        ConfigKey::Format => config.format = None,
        ConfigKey::MinSignal => config.min_signal = None,
    }
}

/// Config written by `config init`, with every option spelled out.
fn initial_config() -> Config {
    Config {
        duration: Some(10),
        rescan: Some(true),
        rescan_threshold: Some(5),
        report_dir: None,
        pdf: Some(true),
        probe: Some(true),
        no_color: false,
        format: Some("text".to_string()),
        min_signal: None,
    }
}

/// Run a config action against the file at `path`, returning what to print.
pub fn run_config_action(action: ConfigAction, path: &Path, no_color: bool) -> Result<String> {
    let output = match action {
        ConfigAction::Path => format!("{}\n", path.display()),
        ConfigAction::Show => {
            let config = Config::load_from(path);
            let content =
                toml::to_string_pretty(&config).context("Failed to serialize config")?;
            format!(
                "{}\n{}",
                style::format_info(&format!("Config file: {}", path.display()), no_color),
                content
            )
        }
        ConfigAction::Get { key } => {
            let config = Config::load_from(path);
            match get_value(&config, key) {
                Some(value) => format!("{}\n", value),
                None => "(not set)\n".to_string(),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::try_load_from(path)?;
            set_value(&mut config, key, &value)?;
            config.save_to(path)?;
            format!(
                "{}\n",
                style::format_success(&format!("Set {:?} = {}", key, value), no_color)
            )
        }
        ConfigAction::Unset { key } => {
            let mut config = Config::try_load_from(path)?;
            unset_value(&mut config, key);
            config.save_to(path)?;
            format!(
                "{}\n",
                style::format_success(&format!("Unset {:?}", key), no_color)
            )
        }
        ConfigAction::Init => {
            if path.exists() {
                format!(
                    "{}\n",
                    style::format_warning(
                        &format!("Config already exists at {}", path.display()),
                        no_color
                    )
                )
            } else {
                initial_config().save_to(path)?;
                format!(
                    "{}\n",
                    style::format_success(
                        &format!("Created config at {}", path.display()),
                        no_color
                    )
                )
            }
        }
    };
    Ok(output)
}

pub fn cmd_config(action: ConfigAction, no_color: bool) -> Result<()> {
    let output = run_config_action(action, &Config::path(), no_color)?;
    print!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_arg() {
        assert!(parse_bool_arg("yes").unwrap());
        assert!(parse_bool_arg("ON").unwrap());
        assert!(!parse_bool_arg("0").unwrap());
        assert!(parse_bool_arg("maybe").is_err());
    }

    #[test]
    fn test_set_and_get_values() {
        let mut config = Config::default();

        set_value(&mut config, ConfigKey::Duration, "20").unwrap();
        set_value(&mut config, ConfigKey::Pdf, "off").unwrap();
        set_value(&mut config, ConfigKey::Format, "JSON").unwrap();
        set_value(&mut config, ConfigKey::MinSignal, "Very Strong").unwrap();

        assert_eq!(get_value(&config, ConfigKey::Duration).as_deref(), Some("20"));
        assert_eq!(get_value(&config, ConfigKey::Pdf).as_deref(), Some("false"));
        assert_eq!(get_value(&config, ConfigKey::Format).as_deref(), Some("json"));
        assert_eq!(
            get_value(&config, ConfigKey::MinSignal).as_deref(),
            Some("very-strong")
        );
        assert_eq!(get_value(&config, ConfigKey::Probe), None);
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = Config::default();
        assert!(set_value(&mut config, ConfigKey::Duration, "soon").is_err());
        assert!(set_value(&mut config, ConfigKey::Duration, "0").is_err());
        assert!(set_value(&mut config, ConfigKey::Format, "xml").is_err());
        assert!(set_value(&mut config, ConfigKey::MinSignal, "loud").is_err());
        assert!(set_value(&mut config, ConfigKey::Probe, "sometimes").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unset_value() {
        let mut config = initial_config();
        unset_value(&mut config, ConfigKey::Duration);
        unset_value(&mut config, ConfigKey::Pdf);
        assert_eq!(config.duration, None);
        assert_eq!(config.pdf, None);
        assert_eq!(config.probe, Some(true));
    }

    #[test]
    fn test_run_config_actions_against_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blescan").join("config.toml");

        let out = run_config_action(ConfigAction::Init, &path, true).unwrap();
        assert!(out.starts_with("[OK] Created config"));
        assert!(path.exists());

        let out = run_config_action(ConfigAction::Init, &path, true).unwrap();
        assert!(out.starts_with("[!!] Config already exists"));

        run_config_action(
            ConfigAction::Set {
                key: ConfigKey::Duration,
                value: "30".to_string(),
            },
            &path,
            true,
        )
        .unwrap();
        let out = run_config_action(
            ConfigAction::Get {
                key: ConfigKey::Duration,
            },
            &path,
            true,
        )
        .unwrap();
        assert_eq!(out, "30\n");

        run_config_action(
            ConfigAction::Unset {
                key: ConfigKey::Duration,
            },
            &path,
            true,
        )
        .unwrap();
        assert_eq!(Config::load_from(&path).duration, None);

        let out = run_config_action(ConfigAction::Show, &path, true).unwrap();
        assert!(out.contains("rescan_threshold = 5"));

        let out = run_config_action(ConfigAction::Path, &path, true).unwrap();
        assert!(out.trim_end().ends_with("config.toml"));
    }

    #[test]
    fn test_set_and_unset_keep_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let broken = "duration = 30\nformat = [not toml\n";
        std::fs::write(&path, broken).unwrap();

        let err = run_config_action(
            ConfigAction::Set {
                key: ConfigKey::Pdf,
                value: "false".to_string(),
            },
            &path,
            true,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config"));

        let err = run_config_action(
            ConfigAction::Unset {
                key: ConfigKey::Duration,
            },
            &path,
            true,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config"));

        assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
    }
}
