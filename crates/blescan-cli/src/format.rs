//! Output formatting utilities for text, JSON, and CSV output.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use time::OffsetDateTime;

use blescan_core::{ProbeOutcome, ProbeReport, RankedEntry, ScanSummary, resolve_company_name};
use blescan_types::{ClassifiedDevice, SignalTier};

use crate::cli::StyleMode;
use crate::report::ScanReport;
use crate::style;

/// Manufacturer names listed per device in the rich listing.
const MANUFACTURER_PREVIEW: usize = 2;

/// Entries shown in the "top" lines of the summary.
const TOP_ENTRIES: usize = 3;

/// Formatting options for output.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Omit header row in CSV output.
    pub no_header: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
    /// Visual styling mode.
    pub style: StyleMode,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            no_color: false,
            no_header: false,
            compact: false,
            style: StyleMode::Rich,
        }
    }
}

impl FormatOptions {
    pub fn new(no_color: bool, style: StyleMode) -> Self {
        // Plain mode automatically disables colors for pipe-friendliness
        let effective_no_color = no_color || style == StyleMode::Plain;
        Self {
            no_color: effective_no_color,
            no_header: false,
            compact: false,
            style,
        }
    }

    /// Check if rich styling is enabled.
    pub fn is_rich(&self) -> bool {
        self.style == StyleMode::Rich
    }

    /// Check if plain styling is enabled (no decorations).
    pub fn is_plain(&self) -> bool {
        self.style == StyleMode::Plain
    }

    /// Create with no_header option for CSV output.
    pub fn with_no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }

    /// Create with compact JSON option.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }
}

/// Escape a string for CSV output.
/// Wraps the value in quotes if it contains commas, quotes, or newlines.
/// Double quotes are escaped by doubling them.
#[must_use]
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn rssi_text(rssi: Option<i16>) -> String {
    rssi.map(|r| r.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

fn ranked_text(entries: &[RankedEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} ({}, {:.0}%)", e.label, e.count, e.percent))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Scan formatting
// ============================================================================

/// Troubleshooting hints shown when nothing was found.
#[must_use]
pub fn format_empty_scan(no_color: bool) -> String {
    let tip_label = if no_color {
        "Make sure that:".to_string()
    } else {
        format!("{}", "Make sure that:".yellow().bold())
    };
    format!(
        "No Bluetooth devices found nearby.\n\n{}\n   - Bluetooth is enabled on this computer\n   - Other devices have Bluetooth enabled and are discoverable\n   - You are within range of other Bluetooth devices\n   - Devices support Bluetooth Low Energy (BLE)\n",
        tip_label
    )
}

/// Format scan results as text.
///
/// Rich mode prints one numbered block per device; minimal and plain modes
/// print a table. A summary follows unless the style is plain.
#[must_use]
pub fn format_scan_text(report: &ScanReport, opts: &FormatOptions) -> String {
    if report.is_empty() {
        return format_empty_scan(opts.no_color);
    }

    let count_display = if opts.no_color {
        report.devices.len().to_string()
    } else {
        format!("{}", report.devices.len().to_string().green().bold())
    };
    let mut output = format!("Found {} Bluetooth device(s):\n", count_display);

    if opts.is_rich() {
        output.push_str(&"=".repeat(70));
        output.push('\n');
        for (index, device) in report.devices.iter().enumerate() {
            output.push_str(&format_device_block(index + 1, device, report, opts));
        }
    } else {
        output.push('\n');
        output.push_str(&format_device_table(&report.devices, opts));
        output.push('\n');
    }

    if !opts.is_plain() {
        output.push('\n');
        output.push_str(&format_summary_text(&report.summary, opts));
    }
    output
}

fn format_device_block(
    number: usize,
    device: &ClassifiedDevice,
    report: &ScanReport,
    opts: &FormatOptions,
) -> String {
    let name = if opts.no_color {
        device.display_name.clone()
    } else {
        format!("{}", device.display_name.cyan().bold())
    };

    let mut lines = vec![
        format!("{:2}. {} {}", number, device.device_type.icon(), name),
        format!("    MAC Address: {}", device.address),
        format!(
            "    Signal Strength (RSSI): {} dBm",
            rssi_text(device.rssi)
        ),
        format!(
            "    Signal Power: {} {}",
            style::format_tier_colored(device.signal, opts.no_color),
            device.signal.map(|t| t.bars()).unwrap_or_default()
        ),
    ];

    if let Some(adv) = report.advertisement(&device.address) {
        if !adv.manufacturer_data.is_empty() {
            lines.push(format!(
                "    Manufacturer data: {} entries",
                adv.manufacturer_data.len()
            ));
            for company_id in adv.manufacturer_data.keys().take(MANUFACTURER_PREVIEW) {
                lines.push(format!(
                    "       • {}",
                    resolve_company_name(u32::from(*company_id))
                ));
            }
        }
        if !adv.service_data.is_empty() {
            lines.push(format!(
                "    Service data: {} services",
                adv.service_data.len()
            ));
        }
    }

    if !device.services.is_empty() {
        lines.push(format!("    Service UUIDs: {} services", device.service_count));
        for name in &device.services.names {
            lines.push(format!("       • {}", name));
        }
        if device.services.overflow > 0 {
            lines.push(format!(
                "       • ... and {} more",
                device.services.overflow
            ));
        }
    }

    lines.push(format!("    Type: {}", device.device_type.label()));
    lines.push(style::format_separator(50, opts.no_color));

    let mut block = lines.join("\n");
    block.push('\n');
    block
}

fn format_device_table(devices: &[ClassifiedDevice], opts: &FormatOptions) -> String {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct DeviceRow {
        #[tabled(rename = "#")]
        number: usize,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Address")]
        address: String,
        #[tabled(rename = "Signal")]
        signal: String,
        #[tabled(rename = "Manufacturer")]
        manufacturer: String,
        #[tabled(rename = "Type")]
        device_type: String,
        #[tabled(rename = "Services")]
        services: usize,
    }

    let rows: Vec<DeviceRow> = devices
        .iter()
        .enumerate()
        .map(|(index, d)| DeviceRow {
            number: index + 1,
            name: if opts.no_color {
                d.display_name.clone()
            } else {
                format!("{}", d.display_name.cyan())
            },
            address: d.address.clone(),
            signal: if opts.is_plain() {
                rssi_text(d.rssi)
            } else {
                style::format_signal_bar(d.rssi, opts.no_color)
            },
            manufacturer: d.manufacturer.clone(),
            device_type: d.device_type.label().to_string(),
            services: d.service_count,
        })
        .collect();

    let mut table = Table::new(rows);
    style::apply_table_style(&mut table, opts.style);
    table.to_string()
}

/// Format the statistics block shown after the device list.
#[must_use]
pub fn format_summary_text(summary: &ScanSummary, opts: &FormatOptions) -> String {
    let mut lines = vec![
        style::format_title("Summary", opts.no_color),
        format!(
            "Devices: {}   Services: {}   Manufacturers: {}",
            summary.device_count,
            summary.total_services,
            summary.manufacturer_count()
        ),
    ];

    let mut tiers: Vec<String> = SignalTier::ALL
        .iter()
        .map(|tier| format!("{} {}", tier.label(), summary.signal_count(*tier)))
        .collect();
    if summary.no_signal > 0 {
        tiers.push(format!("No RSSI {}", summary.no_signal));
    }
    lines.push(format!("Signal: {}", tiers.join(", ")));

    if let Some(avg) = summary.average_rssi {
        lines.push(format!("Average RSSI: {:.1} dBm", avg));
    }

    let manufacturers = summary.top_manufacturers(TOP_ENTRIES);
    if !manufacturers.is_empty() {
        lines.push(format!("Top manufacturers: {}", ranked_text(&manufacturers)));
    }
    lines.push(format!(
        "Top device types: {}",
        ranked_text(&summary.top_device_types(TOP_ENTRIES))
    ));

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

pub fn format_scan_json(report: &ScanReport, opts: &FormatOptions) -> Result<String> {
    #[derive(Serialize)]
    struct ScanJson<'a> {
        #[serde(with = "time::serde::rfc3339")]
        scanned_at: OffsetDateTime,
        duration_secs: f64,
        passes: u32,
        count: usize,
        filtered_out: usize,
        error: Option<&'a str>,
        devices: &'a [ClassifiedDevice],
        summary: &'a ScanSummary,
        probes: &'a [ProbeReport],
    }

    let session = &report.session;
    opts.as_json(&ScanJson {
        scanned_at: session.started_at,
        duration_secs: session.duration.as_secs_f64(),
        passes: session.passes,
        count: report.devices.len(),
        filtered_out: session.filtered_out,
        error: session.error.as_deref(),
        devices: &report.devices,
        summary: &report.summary,
        probes: &report.probes,
    })
}

#[must_use]
pub fn format_scan_csv(report: &ScanReport, opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "address,name,rssi,signal,manufacturer,company_id,device_type,service_count,services,manufacturer_data_bytes,service_data_bytes\n".to_string()
    };
    for device in &report.devices {
        output.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{}\n",
            csv_escape(&device.address),
            csv_escape(&device.display_name),
            device.rssi.map(|r| r.to_string()).unwrap_or_default(),
            device.signal.map(|t| t.label()).unwrap_or_default(),
            csv_escape(&device.manufacturer),
            device.company_id.map(|id| id.to_string()).unwrap_or_default(),
            csv_escape(device.device_type.label()),
            device.service_count,
            csv_escape(&device.services.names.join("; ")),
            device.manufacturer_data_len,
            device.service_data_len,
        ));
    }
    output
}

// ============================================================================
// Probe formatting
// ============================================================================

#[must_use]
pub fn format_probe_text(probes: &[ProbeReport], opts: &FormatOptions) -> String {
    let mut output = String::new();
    for probe in probes {
        output.push_str(&format!(
            "Connecting to {} ({})... ",
            probe.name, probe.address
        ));
        let line = match &probe.outcome {
            ProbeOutcome::Connected(gatt) => style::format_success(
                &format!(
                    "Connected! Services: {}, Characteristics: {}",
                    gatt.services, gatt.characteristics
                ),
                opts.no_color,
            ),
            ProbeOutcome::Failed { reason } => {
                style::format_failure(&format!("Cannot connect: {}", reason), opts.no_color)
            }
        };
        output.push_str(&line);
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::{empty_report, sample_report};
    use blescan_core::GattSummary;

    fn test_opts() -> FormatOptions {
        FormatOptions::new(true, StyleMode::Rich)
    }

    #[test]
    fn test_plain_style_forces_no_color() {
        let opts = FormatOptions::new(false, StyleMode::Plain);
        assert!(opts.no_color);
        assert!(opts.is_plain());
        assert!(!FormatOptions::new(false, StyleMode::Rich).no_color);
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_empty_scan_shows_tips() {
        let text = format_scan_text(&empty_report(), &test_opts());
        assert!(text.starts_with("No Bluetooth devices found nearby."));
        assert!(text.contains("Bluetooth is enabled on this computer"));
        assert!(text.contains("Devices support Bluetooth Low Energy (BLE)"));
    }

    #[test]
    fn test_rich_text_lists_devices() {
        let text = format_scan_text(&sample_report(), &test_opts());

        assert!(text.starts_with("Found 3 Bluetooth device(s):"));
        assert!(text.contains(" 1. 🎧 AirPods Pro"));
        assert!(text.contains("MAC Address: AA:BB:CC:DD:EE:01"));
        assert!(text.contains("Signal Strength (RSSI): -42 dBm"));
        assert!(text.contains("Signal Power: Strong 📶📶📶"));
        assert!(text.contains("• Apple, Inc."));
        assert!(text.contains("Service UUIDs: 4 services"));
        assert!(text.contains("• ... and 1 more"));
        assert!(text.contains("Type: Audio Device"));
        assert!(text.contains("Service data: 1 services"));
        // Device without RSSI
        assert!(text.contains("Signal Strength (RSSI): N/A dBm"));
        assert!(text.contains("Summary"));
    }

    #[test]
    fn test_rich_text_no_color_has_no_escapes() {
        let text = format_scan_text(&sample_report(), &test_opts());
        assert!(!text.contains("\x1b["));
    }

    #[test]
    fn test_plain_text_is_a_table_without_summary() {
        let opts = FormatOptions::new(false, StyleMode::Plain);
        let text = format_scan_text(&sample_report(), &opts);

        assert!(text.contains("Manufacturer"));
        assert!(text.contains("AirPods Pro"));
        assert!(text.contains("-75"));
        assert!(!text.contains("Summary"));
        assert!(!text.contains("\x1b["));
    }

    #[test]
    fn test_minimal_text_uses_signal_bars() {
        let opts = FormatOptions::new(true, StyleMode::Minimal);
        let text = format_scan_text(&sample_report(), &opts);
        assert!(text.contains("█"));
        assert!(text.contains("Summary"));
    }

    #[test]
    fn test_summary_text() {
        let report = sample_report();
        let text = format_summary_text(&report.summary, &test_opts());

        assert!(text.contains("Devices: 3   Services: 4   Manufacturers: 2"));
        assert!(text.contains("Strong 1"));
        assert!(text.contains("No RSSI 1"));
        assert!(text.contains("Average RSSI: -58.5 dBm"));
        assert!(text.contains("Apple, Inc. (1, 33%)"));
    }

    #[test]
    fn test_format_scan_csv_header() {
        let csv = format_scan_csv(&sample_report(), &test_opts());
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some(
                "address,name,rssi,signal,manufacturer,company_id,device_type,service_count,services,manufacturer_data_bytes,service_data_bytes"
            )
        );
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_format_scan_csv_rows() {
        let csv = format_scan_csv(&sample_report(), &test_opts().with_no_header(true));
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("AA:BB:CC:DD:EE:01,AirPods Pro,-42,Strong,\"Apple, Inc.\",76,"));
        assert!(lines[1].contains("\"Kitchen, Sensor\""));
        assert!(lines[2].starts_with("AA:BB:CC:DD:EE:03,BLE Device (EE:03),,,Unknown,,"));
    }

    #[test]
    fn test_format_scan_json() {
        let report = sample_report();
        let json = format_scan_json(&report, &test_opts()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["count"], 3);
        assert_eq!(value["passes"], 2);
        assert_eq!(value["scanned_at"], "2026-03-14T09:26:53Z");
        assert_eq!(value["devices"][0]["display_name"], "AirPods Pro");
        assert_eq!(value["devices"][0]["signal"], "strong");
        assert_eq!(value["summary"]["device_count"], 3);
        assert!(value["error"].is_null());
    }

    #[test]
    fn test_format_scan_json_compact() {
        let json = format_scan_json(&sample_report(), &test_opts().with_compact(true)).unwrap();
        assert_eq!(json.lines().count(), 1);
    }

    #[test]
    fn test_format_probe_text() {
        let probes = vec![
            ProbeReport {
                address: "AA:BB:CC:DD:EE:01".to_string(),
                name: "AirPods Pro".to_string(),
                outcome: ProbeOutcome::Connected(GattSummary {
                    services: 5,
                    characteristics: 17,
                }),
            },
            ProbeReport {
                address: "AA:BB:CC:DD:EE:02".to_string(),
                name: "Kitchen, Sensor".to_string(),
                outcome: ProbeOutcome::Failed {
                    reason: "refused".to_string(),
                },
            },
        ];
        let text = format_probe_text(&probes, &test_opts());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Connecting to AirPods Pro (AA:BB:CC:DD:EE:01)... [OK] Connected! Services: 5, Characteristics: 17"
        );
        assert!(lines[1].ends_with("[XX] Cannot connect: refused"));
    }
}
