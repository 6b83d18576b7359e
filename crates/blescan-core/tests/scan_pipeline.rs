//! End-to-end tests of scan, classify and summarise against a mock source.

use std::time::Duration;

use blescan_core::{
    AdvertisementRecord, DeviceCategory, DeviceRecord, GattSummary, MockScanSource, ProbeOptions,
    ProbeOutcome, ScanOptions, ScanResults, ScanSummary, SignalTier, classify_all, discover,
    probe_devices,
};

fn airpods() -> (DeviceRecord, AdvertisementRecord) {
    (
        DeviceRecord::new("12:34:56:00:00:01").with_rssi(-42),
        AdvertisementRecord::new().with_manufacturer_data(76, vec![0x07, 0x19]),
    )
}

fn heart_strap() -> (DeviceRecord, AdvertisementRecord) {
    (
        DeviceRecord::new("12:34:56:00:00:02").with_name("HRM-Pro"),
        AdvertisementRecord::new()
            .with_rssi(-71)
            .with_service_uuid("0000180d-0000-1000-8000-00805f9b34fb")
            .with_service_uuid("0000180f-0000-1000-8000-00805f9b34fb"),
    )
}

fn laptop() -> (DeviceRecord, AdvertisementRecord) {
    (
        DeviceRecord::new("A4:C3:61:00:00:03").with_rssi(-88),
        AdvertisementRecord::new(),
    )
}

#[tokio::test(start_paused = true)]
async fn test_sparse_scan_is_merged_classified_and_summarised() {
    let first: ScanResults = [airpods(), heart_strap()].into_iter().collect();
    // The rescan hears the strap again with a different name; first seen wins.
    let (mut strap, strap_adv) = heart_strap();
    strap.name = Some("Renamed".to_string());
    let second: ScanResults = [(strap, strap_adv), laptop()].into_iter().collect();

    let source = MockScanSource::new().with_pass(first).with_pass(second);
    let session = discover(&source, &ScanOptions::default()).await;

    assert_eq!(session.passes, 2);
    assert_eq!(
        source.requested_durations(),
        vec![Duration::from_secs(10), Duration::from_secs(5)]
    );

    let devices = classify_all(&session.results);
    let names: Vec<&str> = devices.iter().map(|d| d.display_name.as_str()).collect();
    assert_eq!(names, vec!["AirPods", "HRM-Pro", "Apple Device"]);

    assert_eq!(devices[0].device_type, DeviceCategory::Audio);
    assert_eq!(devices[1].device_type, DeviceCategory::HeartRateMonitor);
    assert_eq!(devices[1].signal, Some(SignalTier::Weak));
    assert_eq!(devices[2].manufacturer, "Unknown");

    let summary = ScanSummary::from_devices(&devices, &session.results);
    assert_eq!(summary.device_count, 3);
    assert_eq!(summary.total_services, 2);
    assert_eq!(summary.signal_count(SignalTier::Strong), 1);
    assert_eq!(summary.signal_count(SignalTier::Weak), 2);
}

#[tokio::test(start_paused = true)]
async fn test_small_scan_is_probed() {
    let source = MockScanSource::new()
        .with_pass([airpods()].into_iter().collect())
        .with_probe(
            "12:34:56:00:00:01",
            GattSummary {
                services: 5,
                characteristics: 18,
            },
        );

    let session = discover(&source, &ScanOptions::default().rescan(false)).await;
    let devices = classify_all(&session.results);
    let reports = probe_devices(&source, &devices, &ProbeOptions::default()).await;

    assert_eq!(reports.len(), 1);
    assert!(matches!(
        reports[0].outcome,
        ProbeOutcome::Connected(GattSummary {
            services: 5,
            characteristics: 18
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_failed_scan_degrades_to_no_devices() {
    let source = MockScanSource::new();
    source.set_should_fail(true, Some("Bluetooth adapter is powered off"));

    let session = discover(&source, &ScanOptions::default()).await;

    assert!(session.results.is_empty());
    assert!(classify_all(&session.results).is_empty());
    assert!(session.error.unwrap().contains("powered off"));
}
