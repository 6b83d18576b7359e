//! Everything one scan run produced, gathered for the output writers.

use blescan_core::{ProbeReport, ScanSession, ScanSummary, classify_all};
use blescan_types::{AdvertisementRecord, ClassifiedDevice};

/// A finished scan: raw session, classified devices, statistics and any
/// probe results.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub session: ScanSession,
    pub devices: Vec<ClassifiedDevice>,
    pub summary: ScanSummary,
    pub probes: Vec<ProbeReport>,
}

impl ScanReport {
    /// Classify and summarize a session. Probes are attached later.
    pub fn new(session: ScanSession) -> Self {
        let devices = classify_all(&session.results);
        let summary = ScanSummary::from_devices(&devices, &session.results);
        Self {
            session,
            devices,
            summary,
            probes: Vec::new(),
        }
    }

    /// Raw advertisement for `address`.
    pub fn advertisement(&self, address: &str) -> Option<&AdvertisementRecord> {
        self.session.results.get(address).map(|(_, adv)| adv)
    }

    pub fn with_probes(mut self, probes: Vec<ProbeReport>) -> Self {
        self.probes = probes;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::time::Duration;

    use blescan_core::{ScanResults, ScanSession};
    use blescan_types::{AdvertisementRecord, DeviceRecord};
    use time::macros::datetime;

    use super::ScanReport;

    /// Three devices covering the common shapes: an Apple audio device with
    /// services, a named sensor, and an anonymous device without RSSI.
    pub fn sample_report() -> ScanReport {
        let results = ScanResults::new()
            .with(
                DeviceRecord::new("AA:BB:CC:DD:EE:01")
                    .with_name("AirPods Pro")
                    .with_rssi(-42),
                AdvertisementRecord::new()
                    .with_manufacturer_data(76, vec![0x07, 0x19, 0x01])
                    .with_service_uuid("0000180f-0000-1000-8000-00805f9b34fb")
                    .with_service_uuid("0000180a-0000-1000-8000-00805f9b34fb")
                    .with_service_uuid("0000110b-0000-1000-8000-00805f9b34fb")
                    .with_service_uuid("12345678-1234-1234-1234-123456789abc"),
            )
            .with(
                DeviceRecord::new("AA:BB:CC:DD:EE:02")
                    .with_name("Kitchen, Sensor")
                    .with_rssi(-75),
                AdvertisementRecord::new()
                    .with_manufacturer_data(0x0702, vec![0x01, 0x02])
                    .with_service_data("0000181a-0000-1000-8000-00805f9b34fb", vec![1, 2, 3]),
            )
            .with(
                DeviceRecord::new("AA:BB:CC:DD:EE:03"),
                AdvertisementRecord::new(),
            );

        ScanReport::new(ScanSession {
            started_at: datetime!(2026-03-14 09:26:53 UTC),
            duration: Duration::from_secs(10),
            passes: 2,
            results,
            filtered_out: 0,
            error: None,
        })
    }

    pub fn empty_report() -> ScanReport {
        ScanReport::new(ScanSession {
            started_at: datetime!(2026-03-14 09:26:53 UTC),
            duration: Duration::from_secs(10),
            passes: 2,
            results: ScanResults::new(),
            filtered_out: 0,
            error: None,
        })
    }
}
