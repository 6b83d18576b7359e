//! Platform-agnostic types for BLE device discovery.
//!
//! This crate provides the data model shared by the scanner core
//! (blescan-core) and the command-line front end (blescan-cli). It has no
//! Bluetooth dependency, so records can be built by hand in tests.
//!
//! # Features
//!
//! - Raw scan records: [`DeviceRecord`] and [`AdvertisementRecord`]
//! - Classifier output: [`ClassifiedDevice`], [`SignalTier`], [`DeviceCategory`]
//! - UUID constants for well-known Bluetooth services
//! - Error types for parsing user input
//!
//! # Example
//!
//! ```
//! use blescan_types::{AdvertisementRecord, DeviceRecord, SignalTier};
//!
//! let device = DeviceRecord::new("AA:BB:CC:DD:EE:FF").with_rssi(-48);
//! let adv = AdvertisementRecord::new().with_manufacturer_data(76, vec![0x07, 0x01]);
//!
//! assert_eq!(adv.effective_rssi(&device), Some(-48));
//! assert_eq!(SignalTier::from_rssi(-48), SignalTier::Strong);
//! ```

pub mod error;
pub mod types;
pub mod uuid;

pub use error::ParseError;
pub use types::{
    AdvertisementRecord, ClassifiedDevice, DeviceCategory, DeviceRecord, ServicePreview,
    SignalTier,
};


/// Property-based tests for signal tier resolution.
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Higher RSSI never yields a weaker tier.
        #[test]
        fn signal_tier_is_monotonic(a: i16, b: i16) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(SignalTier::from_rssi(lo) <= SignalTier::from_rssi(hi));
        }

        /// Every RSSI lands in exactly one tier.
        #[test]
        fn signal_tier_is_total(rssi: i16) {
            let tier = SignalTier::from_rssi(rssi);
            prop_assert_eq!(SignalTier::ALL.iter().filter(|t| **t == tier).count(), 1);
        }

        /// Narrow and wide entry points agree.
        #[test]
        fn signal_tier_wide_agrees(rssi: i16) {
            prop_assert_eq!(SignalTier::from_rssi(rssi), SignalTier::from_rssi_wide(i32::from(rssi)));
        }
    }
}
