//! GATT probing of a handful of devices.
//!
//! When a scan turns up only a few devices, connecting to each one and
//! counting its services and characteristics tells the user a little more
//! about what is nearby. Probing is best-effort: every failure is captured in
//! the device's [`ProbeReport`] instead of aborting the run.

use std::time::Duration;

use btleplug::api::Service;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, info};

use blescan_types::ClassifiedDevice;

use crate::error::Error;
use crate::traits::ScanSource;

/// Counts gathered from a connected device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GattSummary {
    /// Number of primary services.
    pub services: usize,
    /// Number of characteristics across all services.
    pub characteristics: usize,
}

impl GattSummary {
    /// Count services and characteristics from btleplug's service list.
    pub fn from_services<'a>(services: impl IntoIterator<Item = &'a Service>) -> Self {
        services
            .into_iter()
            .fold(Self::default(), |mut summary, service| {
                summary.services += 1;
                summary.characteristics += service.characteristics.len();
                summary
            })
    }
}

/// Result of probing one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The device accepted a connection.
    Connected(GattSummary),
    /// Connecting or discovering services failed.
    Failed {
        /// Human-readable failure reason.
        reason: String,
    },
}

/// Probe result for a single device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    /// Address that was probed.
    pub address: String,
    /// Display name at the time of probing.
    pub name: String,
    /// What happened.
    pub outcome: ProbeOutcome,
}

/// Options controlling when and how devices are probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Whether probing is enabled at all.
    pub enabled: bool,
    /// Only probe when a scan found between 1 and this many devices.
    pub max_devices: usize,
    /// Per-device connection budget.
    pub timeout: Duration,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            max_devices: 3,
            timeout: Duration::from_secs(15),
        }
    }
}

impl ProbeOptions {
    /// Create new probe options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable probing.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the per-device timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the device count above which probing is skipped.
    #[must_use]
    pub fn max_devices(mut self, max: usize) -> Self {
        self.max_devices = max;
        self
    }

    /// Whether a scan that found `found` devices should be probed.
    pub fn should_probe(&self, found: usize) -> bool {
        self.enabled && (1..=self.max_devices).contains(&found)
    }
}

/// Probe every device in `devices`, one after another.
///
/// Returns an empty list when [`ProbeOptions::should_probe`] says no.
pub async fn probe_devices<S>(
    source: &S,
    devices: &[ClassifiedDevice],
    options: &ProbeOptions,
) -> Vec<ProbeReport>
where
    S: ScanSource + ?Sized,
{
    if !options.should_probe(devices.len()) {
        debug!("Skipping GATT probe for {} device(s)", devices.len());
        return Vec::new();
    }

    let mut reports = Vec::with_capacity(devices.len());
    for device in devices {
        info!("Probing {} ({})", device.display_name, device.address);

        let outcome = match timeout(options.timeout, source.probe(&device.address)).await {
            Ok(Ok(summary)) => ProbeOutcome::Connected(summary),
            Ok(Err(e)) => ProbeOutcome::Failed {
                reason: e.to_string(),
            },
            Err(_) => ProbeOutcome::Failed {
                reason: Error::timeout("probe", options.timeout).to_string(),
            },
        };

        debug!("Probe of {} finished: {:?}", device.address, outcome);
        reports.push(ProbeReport {
            address: device.address.clone(),
            name: device.display_name.clone(),
            outcome,
        });
    }

    reports
}
