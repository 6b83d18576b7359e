//! Error types for blescan-core.
//!
//! Only the radio side can fail. Classification never returns an error: every
//! resolver degrades to a documented fallback value instead.
//!
//! | Error Type | Typical cause | Handling in the CLI |
//! |------------|---------------|---------------------|
//! | [`Error::Bluetooth`] | Adapter powered off, permission denied | Logged, scan treated as empty |
//! | [`Error::DeviceNotFound`] | No adapter, or a probed device vanished | Logged, scan treated as empty |
//! | [`Error::Timeout`] | Probe connection never completed | Reported per device, non-fatal |
//! | [`Error::ConnectionFailed`] | Device refused the GATT connection | Reported per device, non-fatal |

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while scanning for or probing BLE devices.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Bluetooth Low Energy error.
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),

    /// Device or adapter not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(DeviceNotFoundReason),

    /// Operation timed out.
    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The timeout duration.
        duration: Duration,
    },

    /// Connection to a device failed.
    #[error("Connection to {address} failed: {reason}")]
    ConnectionFailed {
        /// Address of the device.
        address: String,
        /// Why the connection failed.
        reason: String,
    },

    /// The scan source was told to fail (mock sources only).
    #[error("Scan failed: {0}")]
    ScanFailed(String),
}

/// Reason why a device was not found.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeviceNotFoundReason {
    /// No Bluetooth adapter available.
    NoAdapter,
    /// Device with the given address is not known to the adapter.
    NotFound {
        /// Address that was looked up.
        address: String,
    },
}

impl std::fmt::Display for DeviceNotFoundReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAdapter => write!(f, "no Bluetooth adapter available"),
            Self::NotFound { address } => write!(f, "device '{}' not found", address),
        }
    }
}

impl Error {
    /// Create a device not found error for a specific address.
    pub fn device_not_found(address: impl Into<String>) -> Self {
        Self::DeviceNotFound(DeviceNotFoundReason::NotFound {
            address: address.into(),
        })
    }

    /// Create a timeout error with operation context.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a connection failure.
    pub fn connection_failed(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            address: address.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias using blescan-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
