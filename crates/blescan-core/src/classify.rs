//! Device classification.
//!
//! Turns raw advertisement fields into human-readable labels using only the
//! static tables in [`crate::registry`]. Every function here is pure, total
//! over its input, and cheap enough to call per device per render.
//!
//! # Display name resolution
//!
//! [`resolve_display_name`] walks an ordered list of resolvers and keeps the
//! first non-empty answer:
//!
//! 1. The platform-reported device name
//! 2. The advertised local name
//! 3. `"<Vendor> Device"` from the MAC address OUI
//! 4. A device hint from manufacturer data (e.g. `"AirPods"`)
//! 5. `"BLE Device (EE:FF)"` from the last two MAC octets
//!
//! The last step always produces a value, so a display name is never empty.

use std::borrow::Cow;

use blescan_types::{
    AdvertisementRecord, ClassifiedDevice, DeviceCategory, DeviceRecord, ServicePreview,
    SignalTier,
};

use crate::registry::{self, company};
use crate::scan::ScanResults;

/// Label used when a device carries no manufacturer data.
pub const UNKNOWN_MANUFACTURER: &str = "Unknown";

/// A single step of the display-name chain.
type NameResolver = fn(&DeviceRecord, &AdvertisementRecord) -> Option<String>;

/// Display-name resolvers in priority order.
const NAME_CHAIN: &[NameResolver] = &[
    name_from_device,
    name_from_advertisement,
    name_from_oui,
    name_from_manufacturer_data,
];

/// Name keyword sets, checked in order; first match wins.
const NAME_KEYWORDS: &[(DeviceCategory, &[&str])] = &[
    (
        DeviceCategory::Audio,
        &["airpods", "headphones", "earbuds", "speaker", "audio"],
    ),
    (
        DeviceCategory::MobilePhone,
        &["iphone", "samsung", "phone", "mobile"],
    ),
    (DeviceCategory::Wearable, &["watch", "band", "fitness"]),
    (
        DeviceCategory::InputDevice,
        &["mouse", "keyboard", "trackpad"],
    ),
    (DeviceCategory::Display, &["tv", "display", "monitor"]),
    (
        DeviceCategory::Sensor,
        &["sensor", "thermometer", "humidity"],
    ),
    (DeviceCategory::SmartLight, &["light", "bulb", "lamp"]),
];

/// Service-name fragments, checked in order across all advertised services.
const SERVICE_KEYWORDS: &[(DeviceCategory, &str)] = &[
    (DeviceCategory::HeartRateMonitor, "heart rate"),
    (DeviceCategory::BatteryDevice, "battery"),
    (DeviceCategory::AudioService, "audio"),
];

fn non_empty_trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn name_from_device(device: &DeviceRecord, _adv: &AdvertisementRecord) -> Option<String> {
    non_empty_trimmed(device.name.as_deref())
}

fn name_from_advertisement(_device: &DeviceRecord, adv: &AdvertisementRecord) -> Option<String> {
    non_empty_trimmed(adv.local_name.as_deref())
}

fn name_from_oui(device: &DeviceRecord, _adv: &AdvertisementRecord) -> Option<String> {
    resolve_oui_manufacturer(&device.address).map(|vendor| format!("{} Device", vendor))
}

fn name_from_manufacturer_data(
    _device: &DeviceRecord,
    adv: &AdvertisementRecord,
) -> Option<String> {
    resolve_manufacturer_hint(adv)
}

/// Fallback name built from the last two address octets.
///
/// Addresses with fewer than two octets use the whole address instead.
fn fallback_name(device: &DeviceRecord) -> String {
    let octets: Vec<&str> = device.octets().collect();
    let suffix = if octets.len() >= 2 {
        octets[octets.len() - 2..].join(":")
    } else if device.address.trim().is_empty() {
        "unknown".to_string()
    } else {
        device.address.clone()
    };
    format!("BLE Device ({})", suffix)
}

/// Resolve the name to show for a device. Never returns an empty string.
///
/// ```
/// use blescan_core::classify::resolve_display_name;
/// use blescan_types::{AdvertisementRecord, DeviceRecord};
///
/// let device = DeviceRecord::new("12:34:56:78:9A:BC");
/// let name = resolve_display_name(&device, &AdvertisementRecord::new());
/// assert_eq!(name, "BLE Device (9A:BC)");
/// ```
pub fn resolve_display_name(device: &DeviceRecord, adv: &AdvertisementRecord) -> String {
    NAME_CHAIN
        .iter()
        .find_map(|resolve| resolve(device, adv))
        .unwrap_or_else(|| fallback_name(device))
}

/// Map an RSSI in dBm to its signal tier.
pub fn resolve_signal_tier(rssi: i16) -> SignalTier {
    SignalTier::from_rssi(rssi)
}

/// Resolve a service UUID to a name, or `"Unknown service"`.
pub fn resolve_service_name(uuid: &str) -> &'static str {
    registry::service_name(uuid)
}

/// Resolve a company identifier to a name, or a label embedding the ID.
pub fn resolve_company_name(company_id: u32) -> Cow<'static, str> {
    registry::company_name(company_id)
}

/// Vendor name for the OUI of a MAC address.
pub fn resolve_oui_manufacturer(address: &str) -> Option<&'static str> {
    registry::lookup_oui(address)
}

/// Apple product family from the first byte of an Apple manufacturer payload.
///
/// Only the discriminator byte is read, so any non-empty payload qualifies.
///
/// ```
/// use blescan_core::classify::resolve_apple_subtype;
///
/// assert_eq!(resolve_apple_subtype(&[0x07, 0x01]), Some("AirPods"));
/// assert_eq!(resolve_apple_subtype(&[0x99]), Some("Apple Device"));
/// assert_eq!(resolve_apple_subtype(&[]), None);
/// ```
pub fn resolve_apple_subtype(payload: &[u8]) -> Option<&'static str> {
    let discriminator = *payload.first()?;
    Some(match discriminator {
        0x02 => "iPhone/iPad",
        0x07 => "AirPods",
        0x0A => "Apple Watch",
        0x0F => "Mac/MacBook",
        0x10 => "Apple TV",
        _ => "Apple Device",
    })
}

/// Device hint from manufacturer data, scanning company IDs in ascending order.
pub fn resolve_manufacturer_hint(adv: &AdvertisementRecord) -> Option<String> {
    adv.manufacturer_data
        .iter()
        .find_map(|(company_id, payload)| match *company_id {
            company::APPLE => resolve_apple_subtype(payload).map(str::to_string),
            company::MICROSOFT => Some("Microsoft Device".to_string()),
            company::SAMSUNG => Some("Samsung Device".to_string()),
            company::GOOGLE => Some("Google Device".to_string()),
            company::XIAOMI => Some("Xiaomi Device".to_string()),
            _ => None,
        })
}

/// Heuristic device category from the display name, then advertised services.
///
/// ```
/// use blescan_core::classify::resolve_device_type;
/// use blescan_types::{AdvertisementRecord, DeviceCategory};
///
/// let adv = AdvertisementRecord::new();
/// assert_eq!(resolve_device_type("AirPods Pro", &adv), DeviceCategory::Audio);
/// assert_eq!(resolve_device_type("Unknown Device", &adv), DeviceCategory::Generic);
/// ```
pub fn resolve_device_type(display_name: &str, adv: &AdvertisementRecord) -> DeviceCategory {
    let name = display_name.to_lowercase();

    if let Some((category, _)) = NAME_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| name.contains(k)))
    {
        return *category;
    }

    let services: Vec<String> = adv
        .service_uuids
        .iter()
        .map(|uuid| resolve_service_name(uuid).to_lowercase())
        .collect();

    SERVICE_KEYWORDS
        .iter()
        .find(|(_, fragment)| services.iter().any(|s| s.contains(fragment)))
        .map_or(DeviceCategory::Generic, |(category, _)| *category)
}

/// Classify a single device.
pub fn classify(device: &DeviceRecord, adv: &AdvertisementRecord) -> ClassifiedDevice {
    let display_name = resolve_display_name(device, adv);
    let device_type = resolve_device_type(&display_name, adv);
    let rssi = adv.effective_rssi(device);

    let first_company = adv.manufacturer_data.keys().next().copied();
    let manufacturer = first_company.map_or_else(
        || UNKNOWN_MANUFACTURER.to_string(),
        |id| resolve_company_name(u32::from(id)).into_owned(),
    );

    let services = ServicePreview::from_names(
        adv.service_uuids
            .iter()
            .map(|uuid| resolve_service_name(uuid)),
    );

    ClassifiedDevice {
        address: device.address.clone(),
        display_name,
        manufacturer,
        company_id: first_company,
        device_type,
        rssi,
        signal: rssi.map(resolve_signal_tier),
        services,
        service_count: adv.service_uuids.len(),
        manufacturer_entries: adv.manufacturer_data.len(),
        manufacturer_data_len: adv.manufacturer_data_len(),
        service_data_len: adv.service_data_len(),
    }
}

/// Classify every device in discovery order.
pub fn classify_all(results: &ScanResults) -> Vec<ClassifiedDevice> {
    results
        .iter()
        .map(|(device, adv)| classify(device, adv))
        .collect()
}
