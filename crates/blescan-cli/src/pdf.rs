//! PDF scan report.
//!
//! The report is a landscape A4 document: a title, a summary block with the
//! scan statistics, one table row per device (the header row is repeated on
//! every page) and a footer describing how the report was produced.
//!
//! Only the built-in Helvetica fonts are used, so every string is reduced to
//! ASCII before it is drawn; other characters become `?`.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};
use tracing::{debug, info};

use blescan_core::registry::UNKNOWN_SERVICE;
use blescan_core::{RankedEntry, resolve_service_name};
use blescan_types::{AdvertisementRecord, ClassifiedDevice, SignalTier};

use crate::report::ScanReport;

const REPORT_TITLE: &str = "Professional Bluetooth Low Energy (BLE) Device Scan Report";

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
/// Half an inch.
const MARGIN: f32 = 12.7;

const TITLE_SIZE: f32 = 16.0;
const SUMMARY_SIZE: f32 = 9.0;
const HEADER_SIZE: f32 = 7.5;
const CELL_SIZE: f32 = 7.0;
const FOOTER_SIZE: f32 = 7.5;

const LINE_HEIGHT: f32 = 5.0;
const ROW_HEIGHT: f32 = 5.5;
const CELL_PADDING: f32 = 1.2;

const TOP_ENTRIES: usize = 3;

/// Table columns: header label and width in millimetres.
const COLUMNS: [(&str, f32); 12] = [
    ("#", 8.0),
    ("Device Name", 34.0),
    ("MAC Address", 30.0),
    ("RSSI", 14.0),
    ("Signal", 17.0),
    ("Manufacturer", 26.0),
    ("Company ID", 15.0),
    ("Services", 13.0),
    ("Device Type", 27.0),
    ("Primary Services", 50.0),
    ("Mfr Data", 18.0),
    ("Svc Data", 18.0),
];

/// File name for a report generated at `now`.
pub fn report_filename(now: &DateTime<Local>) -> String {
    format!("bluetooth_scan_report_{}.pdf", now.format("%Y%m%d_%H%M%S"))
}

/// Replace everything the built-in fonts cannot encode.
pub fn pdf_text(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

/// Keep the first `max` characters, appending "..." when anything was cut.
fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    shorten(s, max, max)
}

/// Shorten to `keep` characters plus "..." when longer than `limit`.
fn shorten(s: &str, limit: usize, keep: usize) -> String {
    if s.chars().count() > limit {
        let head: String = s.chars().take(keep).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

/// Tier label for the table; the two strongest tiers share one bucket.
fn signal_bucket(tier: SignalTier) -> &'static str {
    match tier {
        SignalTier::VeryStrong | SignalTier::Strong => "Strong",
        SignalTier::Medium => "Medium",
        SignalTier::Weak => "Weak",
        SignalTier::VeryWeak => "Very Weak",
    }
}

fn manufacturer_cell(device: &ClassifiedDevice) -> String {
    let name = match device.company_id {
        Some(id) if device.manufacturer.starts_with("Unknown") => format!("Unknown (ID:{})", id),
        _ => device.manufacturer.clone(),
    };
    truncate_with_ellipsis(&name, 15)
}

fn service_label(uuid: &str) -> String {
    let name = resolve_service_name(uuid);
    if name == UNKNOWN_SERVICE {
        let short: String = uuid.chars().take(8).collect();
        format!("{}...", short)
    } else {
        let base = name.split('(').next().unwrap_or(name).trim();
        shorten(base, 15, 12)
    }
}

fn primary_services_cell(adv: Option<&AdvertisementRecord>) -> String {
    let uuids = adv.map(|a| a.service_uuids.as_slice()).unwrap_or_default();
    if uuids.is_empty() {
        return "None".to_string();
    }

    let mut cell = uuids
        .iter()
        .take(3)
        .map(|uuid| service_label(uuid))
        .collect::<Vec<_>>()
        .join(", ");
    if uuids.len() > 3 {
        cell.push_str(&format!(" (+{})", uuids.len() - 3));
    }
    truncate_with_ellipsis(&cell, 30)
}

fn bytes_cell(len: usize) -> String {
    if len > 0 {
        format!("{} bytes", len)
    } else {
        "0".to_string()
    }
}

/// Cell texts for one table row.
fn table_row(
    number: usize,
    device: &ClassifiedDevice,
    adv: Option<&AdvertisementRecord>,
) -> [String; 12] {
    [
        number.to_string(),
        truncate_with_ellipsis(&device.display_name, 20),
        device.address.clone(),
        device
            .rssi
            .map(|r| r.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        device
            .signal
            .map(signal_bucket)
            .unwrap_or("N/A")
            .to_string(),
        manufacturer_cell(device),
        device
            .company_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        device.service_count.to_string(),
        shorten(device.device_type.label(), 18, 15),
        primary_services_cell(adv),
        bytes_cell(device.manufacturer_data_len),
        bytes_cell(device.service_data_len),
    ]
}

fn ranked_line(entries: &[RankedEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} ({}, {:.0}%)", e.label, e.count, e.percent))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn local_time(at: time::OffsetDateTime) -> String {
    DateTime::<Utc>::from_timestamp(at.unix_timestamp(), 0)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| at.to_string())
}

/// The summary block, one string per line.
fn summary_lines(report: &ScanReport, generated: &str) -> Vec<String> {
    let summary = &report.summary;
    let session = &report.session;

    let mut buckets: Vec<(&str, usize)> = Vec::new();
    for tier in SignalTier::ALL {
        let label = signal_bucket(tier);
        let count = summary.signal_count(tier);
        match buckets.iter_mut().find(|(l, _)| *l == label) {
            Some((_, total)) => *total += count,
            None => buckets.push((label, count)),
        }
    }
    let signal = buckets
        .iter()
        .map(|(label, count)| {
            format!(
                "{}: {} ({:.0}%)",
                label,
                count,
                summary.percent_of_devices(*count)
            )
        })
        .collect::<Vec<_>>()
        .join(" | ");
    let average = summary
        .average_rssi
        .map_or_else(|| "N/A".to_string(), |avg| format!("{:.1} dBm", avg));

    let manufacturers = summary.top_manufacturers(TOP_ENTRIES);
    let manufacturers = if manufacturers.is_empty() {
        "No manufacturer data available".to_string()
    } else {
        ranked_line(&manufacturers)
    };

    let mut lines = vec![
        format!(
            "Scan Information: {} | Duration: {}s | Passes: {} | BLE Protocol | Generated: {}",
            local_time(session.started_at),
            session.duration.as_secs(),
            session.passes,
            generated
        ),
        format!(
            "Discovery Results: {} devices found | {} services | {} manufacturers | Avg: {:.1} services/device",
            summary.device_count,
            summary.total_services,
            summary.manufacturer_count(),
            summary.average_services_per_device()
        ),
        format!("Signal Distribution: {} | RSSI: {} avg", signal, average),
        format!("Top Manufacturers: {}", manufacturers),
    ];

    let types = summary.top_device_types(TOP_ENTRIES);
    if !types.is_empty() {
        lines.push(format!("Device Types: {}", ranked_line(&types)));
    }
    lines
}

fn footer_lines(generated: &str) -> Vec<String> {
    vec![
        "Technical Report Information:".to_string(),
        format!(
            "- Report generated by: blescan v{}",
            env!("CARGO_PKG_VERSION")
        ),
        format!("- Generated on: {}", generated),
        format!(
            "- System Platform: {} | Bluetooth Library: btleplug (Rust)",
            std::env::consts::OS
        ),
        "- Report Format: PDF Landscape | Page Size: A4".to_string(),
        "- Scan Method: Bluetooth Low Energy (BLE) Advertisement Discovery".to_string(),
        "- Data Sources: Device advertisements, manufacturer data, service UUIDs, signal strength"
            .to_string(),
    ]
}

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// Cursor over the pages of the document being written.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Baseline of the next line, from the bottom edge.
    y: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .context("Failed to load Helvetica")?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .context("Failed to load Helvetica-Bold")?;
        let layer = doc.get_page(page).get_layer(layer);

        let mut writer = Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        };
        writer.page_number();
        Ok(writer)
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
        self.pages += 1;
        self.page_number();
    }

    fn page_number(&self) {
        self.layer.set_fill_color(rgb(0.4, 0.4, 0.4));
        self.layer.use_text(
            format!("Page {}", self.pages),
            FOOTER_SIZE,
            Mm(PAGE_WIDTH - MARGIN - 12.0),
            Mm(MARGIN / 2.0),
            &self.regular,
        );
        self.layer.set_fill_color(rgb(0.0, 0.0, 0.0));
    }

    /// Start a new page unless `height` more millimetres fit on this one.
    fn ensure_space(&mut self, height: f32) -> bool {
        if self.y - height < MARGIN {
            self.new_page();
            true
        } else {
            false
        }
    }

    fn text_at(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(pdf_text(text), size, Mm(x), Mm(self.y), font);
    }

    fn line(&mut self, text: &str, size: f32, bold: bool) {
        self.ensure_space(LINE_HEIGHT);
        self.text_at(text, size, MARGIN, bold);
        self.y -= LINE_HEIGHT;
    }

    fn rule(&self, y: f32, thickness: f32) {
        self.layer.set_outline_thickness(thickness);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(y)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(y)), false),
            ],
            is_closed: false,
        });
    }

    fn cells(&mut self, cells: &[String], size: f32, bold: bool) {
        let mut x = MARGIN;
        for (cell, (_, width)) in cells.iter().zip(COLUMNS.iter()) {
            self.text_at(cell, size, x + CELL_PADDING, bold);
            x += width;
        }
    }

    fn table_header(&mut self) {
        self.layer.set_fill_color(rgb(0.0, 0.0, 0.55));
        let labels: Vec<String> = COLUMNS.iter().map(|(label, _)| label.to_string()).collect();
        self.cells(&labels, HEADER_SIZE, true);
        self.layer.set_fill_color(rgb(0.0, 0.0, 0.0));
        self.rule(self.y - 1.5, 0.8);
        self.y -= ROW_HEIGHT;
    }

    fn table_row(&mut self, cells: &[String]) {
        if self.ensure_space(ROW_HEIGHT) {
            self.table_header();
        }
        self.cells(cells, CELL_SIZE, false);
        self.rule(self.y - 1.5, 0.2);
        self.y -= ROW_HEIGHT;
    }

    fn save(self, path: &Path) -> Result<usize> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create report: {}", path.display()))?;
        let pages = self.pages;
        self.doc
            .save(&mut BufWriter::new(file))
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(pages)
    }
}

/// Render `report` into a PDF file inside `dir`.
///
/// The file name is derived from `now`. Returns the path written.
pub fn write_report(report: &ScanReport, dir: &Path, now: &DateTime<Local>) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory: {}", dir.display()))?;
    let path = dir.join(report_filename(now));
    let generated = now.format("%Y-%m-%d %H:%M:%S").to_string();

    let mut writer = PageWriter::new("Bluetooth Scan Report")?;

    writer.text_at(REPORT_TITLE, TITLE_SIZE, MARGIN, true);
    writer.y -= LINE_HEIGHT * 2.0;

    for line in summary_lines(report, &generated) {
        writer.line(&line, SUMMARY_SIZE, false);
    }
    writer.y -= LINE_HEIGHT;

    if report.is_empty() {
        writer.line(
            "No Bluetooth devices found during the scan.",
            SUMMARY_SIZE,
            false,
        );
    } else {
        writer.ensure_space(ROW_HEIGHT * 2.0);
        writer.table_header();
        for (index, device) in report.devices.iter().enumerate() {
            let cells = table_row(index + 1, device, report.advertisement(&device.address));
            writer.table_row(&cells);
        }
    }

    let footer = footer_lines(&generated);
    writer.y -= LINE_HEIGHT;
    writer.ensure_space(LINE_HEIGHT * (footer.len() + 1) as f32);
    writer.rule(writer.y + LINE_HEIGHT / 2.0, 0.5);
    writer.y -= LINE_HEIGHT / 2.0;
    for (i, line) in footer.iter().enumerate() {
        writer.line(line, FOOTER_SIZE, i == 0);
    }

    let pages = writer.save(&path)?;
    debug!("Report has {} page(s)", pages);
    info!("PDF report written to {}", path.display());
    Ok(path)
}
