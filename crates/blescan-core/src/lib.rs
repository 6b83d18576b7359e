//! Core library for BLE device discovery and classification.
//!
//! This crate listens for Bluetooth Low Energy advertisements and turns the
//! raw fields into labels a person can read.
//!
//! # Features
//!
//! - **Classification**: display name, manufacturer, device type, signal tier
//!   and service names resolved from static tables ([`classify`])
//! - **Scanning**: a two-pass scan policy over any [`ScanSource`], with a
//!   btleplug-backed source for real hardware ([`scan`])
//! - **Statistics**: per-scan summaries for reports ([`summary`])
//! - **GATT probe**: service and characteristic counts for small scans
//!   ([`probe`])
//! - **Testing**: a scripted [`MockScanSource`] with failure injection
//!
//! # Platform Differences
//!
//! - **macOS**: CoreBluetooth hides MAC addresses and reports
//!   `00:00:00:00:00:00`. Devices are keyed by the CoreBluetooth peripheral
//!   UUID instead, so OUI lookup never matches and names fall back to the
//!   last two segments of that UUID.
//! - **Linux/Windows**: Devices are keyed by their Bluetooth MAC address
//!   (e.g., `AA:BB:CC:DD:EE:FF`).
//!
//! # Quick Start
//!
//! ```no_run
//! use blescan_core::{BtleplugScanner, ScanOptions, classify_all, discover};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scanner = BtleplugScanner::new().await?;
//!     let session = discover(&scanner, &ScanOptions::default()).await;
//!
//!     for device in classify_all(&session.results) {
//!         println!("{} ({})", device.display_name, device.device_type);
//!     }
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod error;
pub mod mock;
pub mod probe;
pub mod registry;
pub mod scan;
pub mod summary;
pub mod traits;
pub mod util;

// Re-export types and uuid modules from blescan-types
pub use blescan_types::types;
pub use blescan_types::uuid;

// Core exports
pub use classify::{
    UNKNOWN_MANUFACTURER, classify, classify_all, resolve_apple_subtype, resolve_company_name,
    resolve_device_type, resolve_display_name, resolve_manufacturer_hint,
    resolve_oui_manufacturer, resolve_service_name, resolve_signal_tier,
};
pub use error::{DeviceNotFoundReason, Error, Result};
pub use mock::MockScanSource;
pub use probe::{GattSummary, ProbeOptions, ProbeOutcome, ProbeReport, probe_devices};
pub use scan::{
    BtleplugScanner, ScanOptions, ScanResults, ScanSession, discover, get_adapter,
    records_from_properties,
};
pub use summary::{RankedEntry, ScanSummary};
pub use traits::ScanSource;
pub use util::{create_identifier, format_peripheral_id};

// Re-export from blescan-types
pub use blescan_types::{
    AdvertisementRecord, ClassifiedDevice, DeviceCategory, DeviceRecord, ParseError,
    ServicePreview, SignalTier,
};
