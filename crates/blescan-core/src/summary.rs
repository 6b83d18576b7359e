//! Aggregate statistics over one scan.
//!
//! Feeds the summary block of both the console report and the PDF report.

use std::collections::BTreeMap;

use serde::Serialize;

use blescan_types::{ClassifiedDevice, SignalTier};

use crate::registry::lookup_company;
use crate::scan::ScanResults;

/// One row of a ranked breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// Label being counted.
    pub label: String,
    /// Number of occurrences.
    pub count: usize,
    /// Share of all devices, in percent.
    pub percent: f64,
}

/// Statistics computed from classified devices and their raw records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSummary {
    /// Number of devices.
    pub device_count: usize,
    /// Total advertised service UUIDs across all devices.
    pub total_services: usize,
    /// Device count per signal tier. Every tier has an entry.
    pub signal_distribution: BTreeMap<SignalTier, usize>,
    /// Devices without any RSSI.
    pub no_signal: usize,
    /// Mean effective RSSI.
    pub average_rssi: Option<f64>,
    /// Weakest effective RSSI.
    pub min_rssi: Option<i16>,
    /// Strongest effective RSSI.
    pub max_rssi: Option<i16>,
    /// Occurrences of each company across all manufacturer data entries.
    pub manufacturers: BTreeMap<String, usize>,
    /// Occurrences of each device type label.
    pub device_types: BTreeMap<String, usize>,
}

/// Label used for a company in manufacturer statistics.
///
/// Unknown companies get a shorter label than the classifier's so they fit
/// in report tables.
pub fn company_stat_label(company_id: u16) -> String {
    lookup_company(u32::from(company_id))
        .map_or_else(|| format!("Unknown (ID: {})", company_id), str::to_string)
}

impl ScanSummary {
    /// Build a summary. `devices` and `results` must describe the same scan.
    pub fn from_devices(devices: &[ClassifiedDevice], results: &ScanResults) -> Self {
        let mut signal_distribution: BTreeMap<SignalTier, usize> =
            SignalTier::ALL.iter().map(|tier| (*tier, 0)).collect();
        let mut device_types = BTreeMap::new();
        let mut rssi_values = Vec::with_capacity(devices.len());
        let mut no_signal = 0;

        for device in devices {
            match (device.rssi, device.signal) {
                (Some(rssi), Some(tier)) => {
                    rssi_values.push(rssi);
                    *signal_distribution.entry(tier).or_insert(0) += 1;
                }
                _ => no_signal += 1,
            }
            *device_types
                .entry(device.device_type.label().to_string())
                .or_insert(0) += 1;
        }

        let mut manufacturers = BTreeMap::new();
        for (_, adv) in results.iter() {
            for company_id in adv.manufacturer_data.keys() {
                *manufacturers
                    .entry(company_stat_label(*company_id))
                    .or_insert(0) += 1;
            }
        }

        let average_rssi = if rssi_values.is_empty() {
            None
        } else {
            let sum: i64 = rssi_values.iter().map(|r| i64::from(*r)).sum();
            Some(sum as f64 / rssi_values.len() as f64)
        };

        Self {
            device_count: devices.len(),
            total_services: devices.iter().map(|d| d.service_count).sum(),
            signal_distribution,
            no_signal,
            average_rssi,
            min_rssi: rssi_values.iter().copied().min(),
            max_rssi: rssi_values.iter().copied().max(),
            manufacturers,
            device_types,
        }
    }

    /// Number of distinct manufacturer labels.
    pub fn manufacturer_count(&self) -> usize {
        self.manufacturers.len()
    }

    /// Devices in `tier`.
    pub fn signal_count(&self, tier: SignalTier) -> usize {
        self.signal_distribution.get(&tier).copied().unwrap_or(0)
    }

    /// `count` as a percentage of all devices; zero for an empty scan.
    pub fn percent_of_devices(&self, count: usize) -> f64 {
        if self.device_count == 0 {
            0.0
        } else {
            count as f64 / self.device_count as f64 * 100.0
        }
    }

    /// Mean advertised services per device; zero for an empty scan.
    pub fn average_services_per_device(&self) -> f64 {
        if self.device_count == 0 {
            0.0
        } else {
            self.total_services as f64 / self.device_count as f64
        }
    }

    /// The `n` most common manufacturers.
    pub fn top_manufacturers(&self, n: usize) -> Vec<RankedEntry> {
        self.rank(&self.manufacturers, n)
    }

    /// The `n` most common device types.
    pub fn top_device_types(&self, n: usize) -> Vec<RankedEntry> {
        self.rank(&self.device_types, n)
    }

    /// Sort by count descending, then label ascending, and keep `n`.
    fn rank(&self, counts: &BTreeMap<String, usize>, n: usize) -> Vec<RankedEntry> {
        let mut entries: Vec<(&String, &usize)> = counts.iter().collect();
        // BTreeMap iteration is already label-ascending; a stable sort keeps it.
        entries.sort_by(|a, b| b.1.cmp(a.1));
        entries
            .into_iter()
            .take(n)
            .map(|(label, count)| RankedEntry {
                label: label.clone(),
                count: *count,
                percent: self.percent_of_devices(*count),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_all;
    use blescan_types::{AdvertisementRecord, DeviceRecord};

    fn sample() -> ScanResults {
        ScanResults::new()
            .with(
                DeviceRecord::new("12:00:00:00:00:01")
                    .with_name("AirPods")
                    .with_rssi(-40),
                AdvertisementRecord::new()
                    .with_manufacturer_data(76, vec![0x07])
                    .with_service_uuid("0000180f-0000-1000-8000-00805f9b34fb")
                    .with_service_uuid("0000180a-0000-1000-8000-00805f9b34fb"),
            )
            .with(
                DeviceRecord::new("12:00:00:00:00:02")
                    .with_name("iPhone")
                    .with_rssi(-65),
                AdvertisementRecord::new()
                    .with_manufacturer_data(76, vec![0x02])
                    .with_manufacturer_data(0x0999, vec![0x01]),
            )
            .with(
                DeviceRecord::new("12:00:00:00:00:03")
                    .with_name("Speaker")
                    .with_rssi(-95),
                AdvertisementRecord::new().with_manufacturer_data(6, vec![0x01]),
            )
            .with(
                DeviceRecord::new("12:00:00:00:00:04"),
                AdvertisementRecord::new(),
            )
    }

    fn summary_of(results: &ScanResults) -> ScanSummary {
        ScanSummary::from_devices(&classify_all(results), results)
    }

    #[test]
    fn test_counts() {
        let summary = summary_of(&sample());
        assert_eq!(summary.device_count, 4);
        assert_eq!(summary.total_services, 2);
        assert_eq!(summary.manufacturer_count(), 3);
        assert!((summary.average_services_per_device() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_signal_distribution_covers_all_tiers() {
        let summary = summary_of(&sample());
        assert_eq!(summary.signal_distribution.len(), SignalTier::ALL.len());
        assert_eq!(summary.signal_count(SignalTier::Strong), 1);
        assert_eq!(summary.signal_count(SignalTier::Medium), 1);
        assert_eq!(summary.signal_count(SignalTier::VeryWeak), 1);
        assert_eq!(summary.signal_count(SignalTier::VeryStrong), 0);
        assert_eq!(summary.no_signal, 1);
    }

    #[test]
    fn test_rssi_statistics() {
        let summary = summary_of(&sample());
        assert_eq!(summary.min_rssi, Some(-95));
        assert_eq!(summary.max_rssi, Some(-40));
        let avg = summary.average_rssi.unwrap();
        assert!((avg - (-200.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_top_manufacturers() {
        let summary = summary_of(&sample());
        let top = summary.top_manufacturers(3);

        assert_eq!(top[0].label, "Apple, Inc.");
        assert_eq!(top[0].count, 2);
        assert!((top[0].percent - 50.0).abs() < f64::EPSILON);
        // Ties are broken alphabetically.
        assert_eq!(top[1].label, "Microsoft");
        assert_eq!(top[2].label, "Unknown (ID: 2457)");
    }

    #[test]
    fn test_top_device_types() {
        let summary = summary_of(&sample());
        let top = summary.top_device_types(3);
        assert_eq!(top[0].label, "Audio Device");
        assert_eq!(top[0].count, 2);
        assert_eq!(top.len(), 3);
    }

    #[test]
    fn test_top_n_truncates() {
        let summary = summary_of(&sample());
        assert_eq!(summary.top_manufacturers(1).len(), 1);
        assert!(summary.top_manufacturers(0).is_empty());
    }

    #[test]
    fn test_empty_scan() {
        let summary = summary_of(&ScanResults::new());
        assert_eq!(summary.device_count, 0);
        assert_eq!(summary.average_rssi, None);
        assert_eq!(summary.percent_of_devices(0), 0.0);
        assert_eq!(summary.average_services_per_device(), 0.0);
        assert!(summary.top_manufacturers(3).is_empty());
    }

    #[test]
    fn test_company_stat_label() {
        assert_eq!(company_stat_label(76), "Apple, Inc.");
        assert_eq!(company_stat_label(4000), "Unknown (ID: 4000)");
    }
}
