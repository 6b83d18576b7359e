//! Device discovery and scanning.
//!
//! A scan is one or two sequential listening passes against a
//! [`ScanSource`]. When the first pass hears fewer devices than
//! [`ScanOptions::rescan_threshold`], a second pass of half the duration is
//! run and merged in; devices already heard keep their first-seen data.

use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{
    Central, Manager as _, Peripheral as _, PeripheralProperties, ScanFilter,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use indexmap::IndexMap;
use indexmap::map::Entry;
use time::OffsetDateTime;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use blescan_types::{AdvertisementRecord, DeviceRecord, SignalTier};

use crate::error::{DeviceNotFoundReason, Error, Result};
use crate::probe::GattSummary;
use crate::traits::ScanSource;
use crate::util::{create_identifier, format_peripheral_id};

/// Devices heard during a scan, keyed by address in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResults {
    entries: IndexMap<String, (DeviceRecord, AdvertisementRecord)>,
}

impl ScanResults {
    /// Create an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `device.address`.
    ///
    /// Within a single pass the latest advertisement wins; a replaced entry
    /// keeps its original position.
    pub fn insert(&mut self, device: DeviceRecord, adv: AdvertisementRecord) {
        self.entries.insert(device.address.clone(), (device, adv));
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, device: DeviceRecord, adv: AdvertisementRecord) -> Self {
        self.insert(device, adv);
        self
    }

    /// Number of distinct addresses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no device was heard.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a device by address.
    pub fn get(&self, address: &str) -> Option<(&DeviceRecord, &AdvertisementRecord)> {
        self.entries.get(address).map(|(d, a)| (d, a))
    }

    /// True if `address` was heard.
    pub fn contains(&self, address: &str) -> bool {
        self.entries.contains_key(address)
    }

    /// Iterate over records in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&DeviceRecord, &AdvertisementRecord)> {
        self.entries.values().map(|(d, a)| (d, a))
    }

    /// Addresses in discovery order.
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Add every device from `other` whose address is not already present.
    ///
    /// Existing entries are never overwritten. Returns how many were added.
    pub fn merge_missing(&mut self, other: ScanResults) -> usize {
        let mut added = 0;
        for (address, record) in other.entries {
            if let Entry::Vacant(slot) = self.entries.entry(address) {
                slot.insert(record);
                added += 1;
            }
        }
        added
    }

    /// Drop devices weaker than `min`, or with no RSSI at all.
    ///
    /// Returns how many were removed.
    pub fn retain_min_signal(&mut self, min: SignalTier) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, (device, adv)| {
            adv.effective_rssi(device)
                .is_some_and(|rssi| SignalTier::from_rssi(rssi) >= min)
        });
        before - self.entries.len()
    }
}

impl FromIterator<(DeviceRecord, AdvertisementRecord)> for ScanResults {
    fn from_iter<I: IntoIterator<Item = (DeviceRecord, AdvertisementRecord)>>(iter: I) -> Self {
        let mut results = Self::new();
        for (device, adv) in iter {
            results.insert(device, adv);
        }
        results
    }
}

impl IntoIterator for ScanResults {
    type Item = (DeviceRecord, AdvertisementRecord);
    type IntoIter = indexmap::map::IntoValues<String, (DeviceRecord, AdvertisementRecord)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

/// Options for scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// How long the primary pass listens.
    pub duration: Duration,
    /// Whether a sparse primary pass triggers a second pass.
    pub rescan: bool,
    /// Primary passes hearing fewer devices than this are followed by a rescan.
    pub rescan_threshold: usize,
    /// Drop devices weaker than this tier after merging.
    pub min_signal: Option<SignalTier>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(10),
            rescan: true,
            rescan_threshold: 5,
            min_signal: None,
        }
    }
}

impl ScanOptions {
    /// Create new scan options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scan duration.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set scan duration in seconds.
    #[must_use]
    pub fn duration_secs(mut self, secs: u64) -> Self {
        self.duration = Duration::from_secs(secs);
        self
    }

    /// Enable or disable the second pass.
    #[must_use]
    pub fn rescan(mut self, rescan: bool) -> Self {
        self.rescan = rescan;
        self
    }

    /// Set the device count below which a second pass runs.
    #[must_use]
    pub fn rescan_threshold(mut self, threshold: usize) -> Self {
        self.rescan_threshold = threshold;
        self
    }

    /// Only keep devices at or above `tier`.
    #[must_use]
    pub fn min_signal(mut self, tier: Option<SignalTier>) -> Self {
        self.min_signal = tier;
        self
    }

    /// Duration of the second pass.
    pub fn rescan_duration(&self) -> Duration {
        self.duration / 2
    }

    /// Whether a primary pass that heard `found` devices needs a second pass.
    pub fn needs_rescan(&self, found: usize) -> bool {
        self.rescan && found < self.rescan_threshold
    }
}

/// Outcome of [`discover`].
#[derive(Debug, Clone)]
pub struct ScanSession {
    /// When the primary pass started.
    pub started_at: OffsetDateTime,
    /// Configured primary pass duration.
    pub duration: Duration,
    /// Number of passes that completed successfully.
    pub passes: u32,
    /// Merged results.
    pub results: ScanResults,
    /// Devices dropped by the signal filter.
    pub filtered_out: usize,
    /// Error message from a failed pass, if any.
    pub error: Option<String>,
}

impl ScanSession {
    fn started(duration: Duration) -> Self {
        Self {
            started_at: OffsetDateTime::now_utc(),
            duration,
            passes: 0,
            results: ScanResults::new(),
            filtered_out: 0,
            error: None,
        }
    }

    /// A session whose scan never ran, e.g. because no adapter was found.
    pub fn aborted(duration: Duration, error: impl Into<String>) -> Self {
        let mut session = Self::started(duration);
        session.error = Some(error.into());
        session
    }

    /// True when a pass failed.
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Run the scan policy against `source`.
///
/// Never fails: a failed primary pass yields an empty session with
/// [`ScanSession::error`] set. A failed second pass keeps the primary results.
pub async fn discover<S>(source: &S, options: &ScanOptions) -> ScanSession
where
    S: ScanSource + ?Sized,
{
    let mut session = ScanSession::started(options.duration);

    info!(
        "Starting BLE scan for {} seconds...",
        options.duration.as_secs()
    );

    match source.scan(options.duration).await {
        Ok(results) => {
            session.passes = 1;
            session.results = results;
        }
        Err(e) => {
            warn!("Scan failed: {}", e);
            session.error = Some(e.to_string());
            return session;
        }
    }

    if options.needs_rescan(session.results.len()) {
        let rescan = options.rescan_duration();
        info!(
            "Found {} device(s), rescanning for {:?}...",
            session.results.len(),
            rescan
        );

        match source.scan(rescan).await {
            Ok(extra) => {
                session.passes += 1;
                let added = session.results.merge_missing(extra);
                debug!("Rescan added {} device(s)", added);
            }
            Err(e) => {
                warn!("Rescan failed, keeping first pass results: {}", e);
                session.error = Some(e.to_string());
            }
        }
    }

    if let Some(min) = options.min_signal {
        session.filtered_out = session.results.retain_min_signal(min);
        debug!(
            "Signal filter ({}) removed {} device(s)",
            min, session.filtered_out
        );
    }

    info!("Scan complete. Found {} device(s)", session.results.len());
    session
}

/// Get the first available Bluetooth adapter.
pub async fn get_adapter() -> Result<Adapter> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;

    adapters
        .into_iter()
        .next()
        .ok_or(Error::DeviceNotFound(DeviceNotFoundReason::NoAdapter))
}

/// Convert btleplug peripheral properties into scan records.
///
/// `identifier` becomes the record address; callers pass the peripheral ID
/// string on platforms that hide MAC addresses.
pub fn records_from_properties(
    identifier: String,
    props: &PeripheralProperties,
) -> (DeviceRecord, AdvertisementRecord) {
    let device = DeviceRecord {
        address: identifier,
        name: props.local_name.clone(),
        rssi: props.rssi,
    };

    let adv = AdvertisementRecord {
        local_name: props.local_name.clone(),
        manufacturer_data: props
            .manufacturer_data
            .iter()
            .map(|(id, payload)| (*id, payload.clone()))
            .collect(),
        service_data: props
            .service_data
            .iter()
            .map(|(uuid, payload)| (uuid.hyphenated().to_string(), payload.clone()))
            .collect(),
        service_uuids: props
            .services
            .iter()
            .map(|uuid| uuid.hyphenated().to_string())
            .collect(),
        rssi: props.rssi,
        tx_power: props.tx_power_level,
    };

    (device, adv)
}

/// Scan source backed by the first system Bluetooth adapter.
pub struct BtleplugScanner {
    adapter: Adapter,
}

impl std::fmt::Debug for BtleplugScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BtleplugScanner").finish_non_exhaustive()
    }
}

impl BtleplugScanner {
    /// Open the first available adapter.
    pub async fn new() -> Result<Self> {
        Ok(Self {
            adapter: get_adapter().await?,
        })
    }

    /// Search the adapter's known peripherals for `identifier`.
    async fn find_peripheral(&self, identifier: &str) -> Result<Peripheral> {
        let wanted = identifier.to_lowercase();

        for peripheral in self.adapter.peripherals().await? {
            if format_peripheral_id(&peripheral.id()).to_lowercase() == wanted {
                return Ok(peripheral);
            }
            if let Ok(Some(props)) = peripheral.properties().await
                && props.address.to_string().to_lowercase() == wanted
            {
                return Ok(peripheral);
            }
        }

        Err(Error::device_not_found(identifier))
    }
}

#[async_trait]
impl ScanSource for BtleplugScanner {
    async fn scan(&self, duration: Duration) -> Result<ScanResults> {
        self.adapter.start_scan(ScanFilter::default()).await?;
        sleep(duration).await;
        self.adapter.stop_scan().await?;

        let mut results = ScanResults::new();
        for peripheral in self.adapter.peripherals().await? {
            match peripheral.properties().await {
                Ok(Some(props)) => {
                    let address = props.address.to_string();
                    let identifier = create_identifier(&address, &peripheral.id());
                    let (device, adv) = records_from_properties(identifier, &props);
                    results.insert(device, adv);
                }
                Ok(None) => {}
                Err(e) => {
                    debug!("Error reading peripheral properties: {}", e);
                }
            }
        }

        debug!("Pass heard {} device(s)", results.len());
        Ok(results)
    }

    async fn probe(&self, address: &str) -> Result<GattSummary> {
        let peripheral = self.find_peripheral(address).await?;

        peripheral
            .connect()
            .await
            .map_err(|e| Error::connection_failed(address, e.to_string()))?;

        let discovered = peripheral.discover_services().await;
        let summary = discovered.map(|()| GattSummary::from_services(&peripheral.services()));

        if let Err(e) = peripheral.disconnect().await {
            debug!("Disconnect from {} failed: {}", address, e);
        }

        Ok(summary?)
    }
}


/// Property-based tests for the merge policy.
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn results_from(ids: &[u8], tag: &str) -> ScanResults {
        ids.iter()
            .map(|id| {
                (
                    DeviceRecord::new(format!("00:00:00:00:00:{:02X}", id)).with_name(tag),
                    AdvertisementRecord::new(),
                )
            })
            .collect()
    }

    proptest! {
        /// Merging never overwrites and never loses an address.
        #[test]
        fn merge_is_first_seen_wins(
            a in proptest::collection::vec(any::<u8>(), 0..20),
            b in proptest::collection::vec(any::<u8>(), 0..20),
        ) {
            let mut merged = results_from(&a, "first");
            let before = merged.len();
            let second = results_from(&b, "second");
            let added = merged.merge_missing(second.clone());

            prop_assert_eq!(merged.len(), before + added);
            for address in second.addresses() {
                prop_assert!(merged.contains(address));
            }
            for id in &a {
                let address = format!("00:00:00:00:00:{:02X}", id);
                let (device, _) = merged.get(&address).unwrap();
                prop_assert_eq!(device.name.as_deref(), Some("first"));
            }
        }
    }
}
