//! Core types for discovered BLE devices and their classification.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A discovered BLE peripheral as reported by the scan source.
///
/// One snapshot per scan; the address is the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceRecord {
    /// MAC address in colon-hex form (e.g. `AA:BB:CC:DD:EE:FF`).
    pub address: String,
    /// Name reported by the platform, possibly empty.
    pub name: Option<String>,
    /// Last-seen RSSI in dBm.
    pub rssi: Option<i16>,
}

impl DeviceRecord {
    /// Create a record with just an address.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: None,
            rssi: None,
        }
    }

    /// Set the platform-reported name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the last-seen RSSI.
    #[must_use]
    pub fn with_rssi(mut self, rssi: i16) -> Self {
        self.rssi = Some(rssi);
        self
    }

    /// The colon-separated octets of the address.
    ///
    /// Well-formed addresses yield six entries; malformed ones yield whatever
    /// splitting produces, which callers must tolerate.
    pub fn octets(&self) -> impl Iterator<Item = &str> {
        self.address.split(':')
    }
}

/// Advertisement payload captured alongside a [`DeviceRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdvertisementRecord {
    /// Advertised local name.
    pub local_name: Option<String>,
    /// Manufacturer-specific data keyed by Bluetooth SIG company identifier.
    pub manufacturer_data: BTreeMap<u16, Vec<u8>>,
    /// Service data keyed by lowercase dashed 128-bit UUID.
    pub service_data: BTreeMap<String, Vec<u8>>,
    /// Advertised service UUIDs, in the order the platform reported them.
    pub service_uuids: Vec<String>,
    /// RSSI from the advertisement itself, if the platform reports one.
    pub rssi: Option<i16>,
    /// Advertised transmit power level in dBm.
    pub tx_power: Option<i16>,
}

impl AdvertisementRecord {
    /// Create an empty advertisement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the advertised local name.
    #[must_use]
    pub fn with_local_name(mut self, name: impl Into<String>) -> Self {
        self.local_name = Some(name.into());
        self
    }

    /// Add a manufacturer data entry.
    #[must_use]
    pub fn with_manufacturer_data(mut self, company_id: u16, payload: impl Into<Vec<u8>>) -> Self {
        self.manufacturer_data.insert(company_id, payload.into());
        self
    }

    /// Add a service data entry. The UUID is stored lowercase.
    #[must_use]
    pub fn with_service_data(mut self, uuid: &str, payload: impl Into<Vec<u8>>) -> Self {
        self.service_data
            .insert(uuid.to_ascii_lowercase(), payload.into());
        self
    }

    /// Append an advertised service UUID. The UUID is stored lowercase.
    #[must_use]
    pub fn with_service_uuid(mut self, uuid: &str) -> Self {
        self.service_uuids.push(uuid.to_ascii_lowercase());
        self
    }

    /// Set the advertisement RSSI.
    #[must_use]
    pub fn with_rssi(mut self, rssi: i16) -> Self {
        self.rssi = Some(rssi);
        self
    }

    /// RSSI to report for this device.
    ///
    /// A zero advertisement RSSI is treated as "not reported" and falls back
    /// to the device's last-seen value.
    #[must_use]
    pub fn effective_rssi(&self, device: &DeviceRecord) -> Option<i16> {
        match self.rssi {
            Some(rssi) if rssi != 0 => Some(rssi),
            _ => device.rssi,
        }
    }

    /// Total payload bytes across all manufacturer data entries.
    #[must_use]
    pub fn manufacturer_data_len(&self) -> usize {
        self.manufacturer_data.values().map(Vec::len).sum()
    }

    /// Total payload bytes across all service data entries.
    #[must_use]
    pub fn service_data_len(&self) -> usize {
        self.service_data.values().map(Vec::len).sum()
    }
}

/// Signal strength tier derived from RSSI.
///
/// Tiers are ordered from weakest to strongest so that comparisons like
/// `tier >= SignalTier::Medium` read naturally.
///
/// ```
/// use blescan_types::SignalTier;
///
/// assert_eq!(SignalTier::from_rssi(-30), SignalTier::VeryStrong);
/// assert_eq!(SignalTier::from_rssi(-31), SignalTier::Strong);
/// assert_eq!(SignalTier::from_rssi(-91), SignalTier::VeryWeak);
/// assert!(SignalTier::Strong > SignalTier::Weak);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SignalTier {
    /// Below -90 dBm.
    VeryWeak,
    /// -90 to -71 dBm.
    Weak,
    /// -70 to -51 dBm.
    Medium,
    /// -50 to -31 dBm.
    Strong,
    /// -30 dBm and above.
    VeryStrong,
}

impl SignalTier {
    /// All tiers, strongest first (report order).
    pub const ALL: [SignalTier; 5] = [
        SignalTier::VeryStrong,
        SignalTier::Strong,
        SignalTier::Medium,
        SignalTier::Weak,
        SignalTier::VeryWeak,
    ];

    /// Inclusive lower bounds, evaluated strongest first.
    const THRESHOLDS: [(i32, SignalTier); 4] = [
        (-30, SignalTier::VeryStrong),
        (-50, SignalTier::Strong),
        (-70, SignalTier::Medium),
        (-90, SignalTier::Weak),
    ];

    /// Map an RSSI in dBm to its tier.
    #[must_use]
    pub fn from_rssi(rssi: i16) -> Self {
        Self::from_rssi_wide(i32::from(rssi))
    }

    /// Map an RSSI given as a wider integer to its tier.
    #[must_use]
    pub fn from_rssi_wide(rssi: i32) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(bound, _)| rssi >= *bound)
            .map_or(SignalTier::VeryWeak, |(_, tier)| *tier)
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SignalTier::VeryStrong => "Very Strong",
            SignalTier::Strong => "Strong",
            SignalTier::Medium => "Medium",
            SignalTier::Weak => "Weak",
            SignalTier::VeryWeak => "Very Weak",
        }
    }

    /// Console glyph for the tier.
    #[must_use]
    pub fn bars(&self) -> &'static str {
        match self {
            SignalTier::VeryStrong => "📶📶📶📶",
            SignalTier::Strong => "📶📶📶",
            SignalTier::Medium => "📶📶",
            SignalTier::Weak => "📶",
            SignalTier::VeryWeak => "📵",
        }
    }
}

impl fmt::Display for SignalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SignalTier {
    type Err = ParseError;

    /// Parse a tier name, ignoring case and treating `-`, `_` and spaces alike.
    ///
    /// ```
    /// use blescan_types::SignalTier;
    ///
    /// assert_eq!("very-strong".parse::<SignalTier>().unwrap(), SignalTier::VeryStrong);
    /// assert_eq!("Very Weak".parse::<SignalTier>().unwrap(), SignalTier::VeryWeak);
    /// assert!("loud".parse::<SignalTier>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "verystrong" => Ok(SignalTier::VeryStrong),
            "strong" => Ok(SignalTier::Strong),
            "medium" => Ok(SignalTier::Medium),
            "weak" => Ok(SignalTier::Weak),
            "veryweak" => Ok(SignalTier::VeryWeak),
            _ => Err(ParseError::InvalidSignalTier(s.to_string())),
        }
    }
}

/// Heuristic device category.
///
/// Name-based categories are checked first, then service-based ones; anything
/// unmatched is [`DeviceCategory::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DeviceCategory {
    /// Headphones, earbuds, speakers.
    Audio,
    /// Phones.
    MobilePhone,
    /// Watches, fitness bands.
    Wearable,
    /// Mice, keyboards, trackpads.
    InputDevice,
    /// TVs and monitors.
    Display,
    /// Environmental sensors.
    Sensor,
    /// Bulbs and lamps.
    SmartLight,
    /// Advertises the Heart Rate service.
    HeartRateMonitor,
    /// Advertises the Battery service.
    BatteryDevice,
    /// Advertises an audio source/sink service.
    AudioService,
    /// Nothing more specific is known.
    Generic,
}

impl DeviceCategory {
    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            DeviceCategory::Audio | DeviceCategory::AudioService => "Audio Device",
            DeviceCategory::MobilePhone => "Mobile Phone",
            DeviceCategory::Wearable => "Wearable Device",
            DeviceCategory::InputDevice => "Input Device",
            DeviceCategory::Display => "Display Device",
            DeviceCategory::Sensor => "Sensor",
            DeviceCategory::SmartLight => "Smart Light",
            DeviceCategory::HeartRateMonitor => "Heart Rate Monitor",
            DeviceCategory::BatteryDevice => "Battery Device",
            DeviceCategory::Generic => "Bluetooth Low Energy Device",
        }
    }

    /// Console glyph.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            DeviceCategory::Audio => "🎧",
            DeviceCategory::MobilePhone => "📱",
            DeviceCategory::Wearable => "⌚",
            DeviceCategory::InputDevice => "🖱️",
            DeviceCategory::Display => "📺",
            DeviceCategory::Sensor => "🌡️",
            DeviceCategory::SmartLight => "💡",
            DeviceCategory::HeartRateMonitor => "❤️",
            DeviceCategory::BatteryDevice => "🔋",
            DeviceCategory::AudioService => "🎵",
            DeviceCategory::Generic => "🔵",
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bounded list of resolved service names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ServicePreview {
    /// Names of the first advertised services, in advertised order.
    pub names: Vec<String>,
    /// How many advertised services were left out of `names`.
    pub overflow: usize,
}

impl ServicePreview {
    /// Maximum number of names kept in a preview.
    pub const LIMIT: usize = 3;

    /// Build a preview from resolved names, keeping the first [`Self::LIMIT`].
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut preview = Self::default();
        for name in names {
            if preview.names.len() < Self::LIMIT {
                preview.names.push(name.into());
            } else {
                preview.overflow += 1;
            }
        }
        preview
    }

    /// True when no services were advertised.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Classifier output for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassifiedDevice {
    /// MAC address of the device.
    pub address: String,
    /// Resolved display name; never empty.
    pub display_name: String,
    /// Company name of the first manufacturer data entry, or "Unknown".
    pub manufacturer: String,
    /// Company identifier of the first manufacturer data entry.
    pub company_id: Option<u16>,
    /// Heuristic category.
    pub device_type: DeviceCategory,
    /// Effective RSSI in dBm.
    pub rssi: Option<i16>,
    /// Tier for `rssi`; `None` only when RSSI is unavailable.
    pub signal: Option<SignalTier>,
    /// Resolved names of advertised services.
    pub services: ServicePreview,
    /// Number of advertised service UUIDs.
    pub service_count: usize,
    /// Number of manufacturer data entries.
    pub manufacturer_entries: usize,
    /// Total manufacturer data payload bytes.
    pub manufacturer_data_len: usize,
    /// Total service data payload bytes.
    pub service_data_len: usize,
}
