//! Well-known Bluetooth service UUIDs.
//!
//! These are the services the classifier can name. Assigned numbers from the
//! Bluetooth SIG are expanded onto the Bluetooth base UUID
//! (`0000xxxx-0000-1000-8000-00805f9b34fb`).

use uuid::{Uuid, uuid};

/// The Bluetooth base UUID that 16-bit assigned numbers are expanded onto.
pub const BLUETOOTH_BASE: Uuid = uuid!("00000000-0000-1000-8000-00805f9b34fb");

// --- GATT services ---

/// Device Information service.
pub const DEVICE_INFO_SERVICE: Uuid = uuid!("0000180a-0000-1000-8000-00805f9b34fb");

/// Heart Rate service.
pub const HEART_RATE_SERVICE: Uuid = uuid!("0000180d-0000-1000-8000-00805f9b34fb");

/// Battery service.
pub const BATTERY_SERVICE: Uuid = uuid!("0000180f-0000-1000-8000-00805f9b34fb");

/// Environmental Sensing service.
pub const ENVIRONMENTAL_SENSING_SERVICE: Uuid = uuid!("0000181a-0000-1000-8000-00805f9b34fb");

/// User Data service.
pub const USER_DATA_SERVICE: Uuid = uuid!("0000181c-0000-1000-8000-00805f9b34fb");

// --- Classic profile UUIDs that BLE devices still advertise ---

/// Audio Source (A2DP).
pub const AUDIO_SOURCE: Uuid = uuid!("0000110a-0000-1000-8000-00805f9b34fb");

/// Audio Sink (A2DP).
pub const AUDIO_SINK: Uuid = uuid!("0000110b-0000-1000-8000-00805f9b34fb");

/// Hands-Free profile.
pub const HANDS_FREE: Uuid = uuid!("0000111e-0000-1000-8000-00805f9b34fb");

// --- Vendor services ---

/// Nordic UART Service.
pub const NORDIC_UART_SERVICE: Uuid = uuid!("6e400001-b5a3-f393-e0a9-e50e24dcca9e");

/// Expand a 16-bit assigned number onto the Bluetooth base UUID.
///
/// ```
/// use blescan_types::uuid::{from_short, BATTERY_SERVICE};
///
/// assert_eq!(from_short(0x180F), BATTERY_SERVICE);
/// ```
#[must_use]
pub fn from_short(short: u16) -> Uuid {
    Uuid::from_u128(BLUETOOTH_BASE.as_u128() | (u128::from(short) << 96))
}
