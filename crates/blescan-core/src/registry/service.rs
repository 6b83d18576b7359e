//! Well-known service UUID to name table.

use std::sync::LazyLock;

use uuid::Uuid;

use blescan_types::uuid::{
    AUDIO_SINK, AUDIO_SOURCE, BATTERY_SERVICE, DEVICE_INFO_SERVICE, ENVIRONMENTAL_SENSING_SERVICE,
    HANDS_FREE, HEART_RATE_SERVICE, NORDIC_UART_SERVICE, USER_DATA_SERVICE,
};

/// Returned when a UUID matches nothing in the table.
pub const UNKNOWN_SERVICE: &str = "Unknown service";

const SERVICE_ENTRIES: &[(Uuid, &str)] = &[
    (BATTERY_SERVICE, "Battery Service"),
    (DEVICE_INFO_SERVICE, "Device Information"),
    (USER_DATA_SERVICE, "User Data"),
    (HEART_RATE_SERVICE, "Heart Rate"),
    (ENVIRONMENTAL_SENSING_SERVICE, "Environmental Sensing"),
    (AUDIO_SOURCE, "Audio Source"),
    (AUDIO_SINK, "Audio Sink"),
    (HANDS_FREE, "Hands-Free"),
    (NORDIC_UART_SERVICE, "Nordic UART Service"),
];

/// Canonical lowercase hyphenated keys, in table order.
static SERVICE_TABLE: LazyLock<Vec<(String, &'static str)>> = LazyLock::new(|| {
    SERVICE_ENTRIES
        .iter()
        .map(|(uuid, name)| (uuid.hyphenated().to_string(), *name))
        .collect()
});

/// Resolve a service UUID string to a human-readable name.
///
/// Exact match first; failing that, the first 8 hex characters (the 32-bit
/// segment) are matched against table keys in table order.
///
/// ```
/// use blescan_core::registry::service_name;
///
/// assert_eq!(service_name("0000180F-0000-1000-8000-00805F9B34FB"), "Battery Service");
/// assert_eq!(service_name("0000180d"), "Heart Rate");
/// assert_eq!(service_name("deadbeef-0000-0000-0000-000000000000"), "Unknown service");
/// ```
pub fn service_name(uuid: &str) -> &'static str {
    let normalized = uuid.trim().to_ascii_lowercase();

    if let Some((_, name)) = SERVICE_TABLE.iter().find(|(key, _)| *key == normalized) {
        return name;
    }

    let segment: String = normalized.chars().take(8).collect();
    if segment.is_empty() {
        return UNKNOWN_SERVICE;
    }

    SERVICE_TABLE
        .iter()
        .find(|(key, _)| key.starts_with(&segment))
        .map_or(UNKNOWN_SERVICE, |(_, name)| name)
}
