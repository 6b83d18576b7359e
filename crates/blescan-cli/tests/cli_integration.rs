//! CLI Integration Tests
//!
//! These tests run the compiled binary and check its output and exit codes.
//! Scanning needs a Bluetooth adapter, so the scan test is marked #[ignore].
//!
//! Run offline tests:
//! ```
//! cargo test --package blescan-cli --test cli_integration
//! ```
//!
//! Run the hardware test:
//! ```
//! cargo test --package blescan-cli --test cli_integration -- --ignored --nocapture
//! ```

#[cfg(target_os = "linux")]
use std::path::Path;
use std::process::{Command, Output};

/// Run blescan with `args` and return its output
fn run_blescan(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_blescan"))
        .args(args)
        .output()
        .expect("Failed to run blescan binary")
}

/// Run blescan with its config directory pointed at `config_home`
#[cfg(target_os = "linux")]
fn run_blescan_with_config(config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_blescan"))
        .env("XDG_CONFIG_HOME", config_home)
        .args(args)
        .output()
        .expect("Failed to run blescan binary")
}

// =============================================================================
// Help and Version Tests (no hardware required)
// =============================================================================

#[test]
fn test_help_command() {
    let output = run_blescan(&["--help"]);

    assert!(output.status.success(), "Help should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("blescan"), "Help should mention blescan");
    assert!(stdout.contains("scan"), "Help should list scan command");
    assert!(stdout.contains("config"), "Help should list config command");
    assert!(stdout.contains("--duration"), "Help should list scan flags");
}

#[test]
fn test_version_command() {
    let output = run_blescan(&["--version"]);

    assert!(output.status.success(), "Version should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("blescan"), "Version should contain blescan");
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_subcommand_help() {
    for cmd in ["scan", "config", "completions"] {
        let output = run_blescan(&[cmd, "--help"]);

        assert!(output.status.success(), "{} --help should succeed", cmd);

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(!stdout.is_empty(), "{} --help should produce output", cmd);
    }
}

#[test]
fn test_invalid_min_signal_rejected() {
    let output = run_blescan(&["scan", "--min-signal", "loud"]);

    assert!(!output.status.success(), "Unknown tier should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("loud"));
}

#[test]
fn test_completions_bash() {
    let output = run_blescan(&["completions", "bash"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("blescan"));
    assert!(stdout.contains("complete"));
}

// =============================================================================
// Config Commands (no device required)
// =============================================================================

#[test]
fn test_config_path() {
    let output = run_blescan(&["config", "path"]);

    assert!(output.status.success(), "config path should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.trim_end().ends_with("config.toml"));
    assert!(stdout.contains("blescan"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_set_get_unset() {
    let home = tempfile::tempdir().unwrap();

    let output = run_blescan_with_config(home.path(), &["config", "set", "duration", "25"]);
    assert!(output.status.success());
    assert!(home.path().join("blescan").join("config.toml").exists());

    let output = run_blescan_with_config(home.path(), &["config", "get", "duration"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "25");

    let output = run_blescan_with_config(home.path(), &["config", "unset", "duration"]);
    assert!(output.status.success());

    let output = run_blescan_with_config(home.path(), &["config", "get", "duration"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "(not set)");
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_set_rejects_bad_value() {
    let home = tempfile::tempdir().unwrap();

    let output = run_blescan_with_config(home.path(), &["config", "set", "format", "xml"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid format"));
}

// =============================================================================
// Hardware Tests (require a Bluetooth adapter)
// =============================================================================

#[test]
#[ignore]
fn test_scan_json_with_hardware() {
    let output = run_blescan(&["scan", "--duration", "3", "--format", "json", "--no-pdf"]);

    assert!(output.status.success(), "Scan should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Scan output is JSON");
    assert!(json["devices"].is_array());
    assert!(json["summary"].is_object());
}
