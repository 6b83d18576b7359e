//! Scan command implementation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use tracing::{debug, warn};

use blescan_core::{
    BtleplugScanner, ProbeOptions, ScanOptions, ScanSession, ScanSource, discover, probe_devices,
};

use crate::cli::{DEFAULT_DURATION_SECS, OutputFormat, ScanArgs};
use crate::config::{
    Config, resolve_duration, resolve_enabled, resolve_format, resolve_min_signal,
    resolve_report_dir,
};
use crate::format::{
    FormatOptions, format_probe_text, format_scan_csv, format_scan_json, format_scan_text,
};
use crate::pdf;
use crate::report::ScanReport;
use crate::style;
use crate::util::write_output;

/// Everything a scan run needs once flags and config are merged.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    pub scan: ScanOptions,
    pub probe: ProbeOptions,
    pub format: OutputFormat,
    pub pdf: bool,
    pub report_dir: PathBuf,
}

impl ScanPlan {
    /// Merge command-line arguments over the config file.
    pub fn resolve(args: &ScanArgs, config: &Config) -> Self {
        let defaults = ScanOptions::default();
        let scan = ScanOptions::new()
            .duration_secs(resolve_duration(args.duration, config, DEFAULT_DURATION_SECS))
            .rescan(resolve_enabled(args.no_rescan, config.rescan))
            .rescan_threshold(config.rescan_threshold.unwrap_or(defaults.rescan_threshold))
            .min_signal(resolve_min_signal(args.min_signal, config));

        let probe = ProbeOptions::new()
            .enabled(resolve_enabled(args.no_probe, config.probe))
            .timeout(Duration::from_secs(args.probe_timeout));

        Self {
            scan,
            probe,
            format: resolve_format(args.format, config),
            pdf: resolve_enabled(args.no_pdf, config.pdf),
            report_dir: resolve_report_dir(args.report_dir.clone(), config),
        }
    }
}

/// Scan, classify and (for small scans) probe, using `source`.
pub async fn run_scan<S>(source: &S, plan: &ScanPlan, show_progress: bool) -> ScanReport
where
    S: ScanSource + ?Sized,
{
    let spinner = show_progress.then(|| style::scanning_spinner(plan.scan.duration.as_secs()));
    let session = discover(source, &plan.scan).await;
    if let Some(sp) = spinner {
        sp.finish_and_clear();
    }

    let report = ScanReport::new(session);
    if !plan.probe.should_probe(report.devices.len()) {
        return report;
    }

    let spinner = show_progress.then(|| {
        style::operation_spinner(&format!(
            "Connecting to {} device(s)...",
            report.devices.len()
        ))
    });
    let probes = probe_devices(source, &report.devices, &plan.probe).await;
    if let Some(sp) = spinner {
        sp.finish_and_clear();
    }

    report.with_probes(probes)
}

fn banner(no_color: bool) -> String {
    let title = style::format_title(
        &format!("Bluetooth Scanner (blescan v{})", env!("CARGO_PKG_VERSION")),
        no_color,
    );
    format!(
        "{}\nDate: {}\n\n",
        title,
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

/// Render the console output for `report`.
pub fn render(
    report: &ScanReport,
    format: OutputFormat,
    opts: &FormatOptions,
    quiet: bool,
) -> Result<String> {
    let content = match format {
        OutputFormat::Json => format_scan_json(report, opts)?,
        OutputFormat::Csv => format_scan_csv(report, opts),
        OutputFormat::Text => {
            let mut text = String::new();
            if opts.is_rich() && !quiet {
                text.push_str(&banner(opts.no_color));
            }
            text.push_str(&format_scan_text(report, opts));
            if !report.probes.is_empty() {
                text.push('\n');
                text.push_str(&style::format_title("Connection Test", opts.no_color));
                text.push('\n');
                text.push_str(&format_probe_text(&report.probes, opts));
            }
            text
        }
    };
    Ok(content)
}

/// Write the PDF report and tell the user where it went. Failures are
/// reported, never returned.
fn write_pdf(report: &ScanReport, dir: &Path, quiet: bool, no_color: bool) {
    if report.is_empty() {
        if !quiet {
            eprintln!(
                "{}",
                style::format_info("No devices found to generate PDF report", no_color)
            );
        }
        return;
    }

    match pdf::write_report(report, dir, &Local::now()) {
        Ok(path) => {
            if !quiet {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let location = std::fs::canonicalize(&path).unwrap_or(path);
                eprintln!(
                    "{}",
                    style::format_success(&format!("PDF report generated: {}", name), no_color)
                );
                eprintln!("     Location: {}", location.display());
            }
        }
        Err(e) => {
            eprintln!(
                "{}",
                style::format_failure(&format!("Error generating PDF report: {:#}", e), no_color)
            );
        }
    }
}

pub async fn cmd_scan(
    args: &ScanArgs,
    output: Option<&PathBuf>,
    quiet: bool,
    opts: &FormatOptions,
    config: &Config,
) -> Result<()> {
    let plan = ScanPlan::resolve(args, config);
    let opts = opts.with_no_header(args.no_header);
    debug!("Scan plan: {:?}", plan);

    // Show spinners for text output (unless quiet)
    let show_progress = !quiet && plan.format == OutputFormat::Text;

    let report = match BtleplugScanner::new().await {
        Ok(scanner) => run_scan(&scanner, &plan, show_progress).await,
        Err(e) => {
            warn!("Bluetooth is not available: {}", e);
            ScanReport::new(ScanSession::aborted(plan.scan.duration, e.to_string()))
        }
    };

    if let Some(error) = &report.session.error
        && !quiet
    {
        eprintln!(
            "{}",
            style::format_warning(
                &format!(
                    "Error during scanning: {}. Make sure Bluetooth is enabled.",
                    error
                ),
                opts.no_color
            )
        );
    }

    let content = render(&report, plan.format, &opts, quiet)?;
    write_output(output, &content)?;

    if plan.pdf {
        write_pdf(&report, &plan.report_dir, quiet, opts.no_color);
    }

    Ok(())
}
