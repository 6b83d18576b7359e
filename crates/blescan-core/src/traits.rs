//! Trait abstractions over the radio.
//!
//! [`ScanSource`] lets the scan policy in [`crate::scan`] and the GATT probe
//! in [`crate::probe`] run against real hardware ([`crate::BtleplugScanner`])
//! or a scripted source ([`crate::MockScanSource`]).

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::probe::GattSummary;
use crate::scan::ScanResults;

/// Something that can listen for BLE advertisements.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use blescan_core::{MockScanSource, ScanSource};
///
/// # #[tokio::main]
/// # async fn main() -> blescan_core::Result<()> {
/// let source = MockScanSource::new();
/// let results = source.scan(Duration::from_secs(1)).await?;
/// assert!(results.is_empty());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ScanSource: Send + Sync {
    /// Listen for `duration` and return every device heard, in discovery order.
    async fn scan(&self, duration: Duration) -> Result<ScanResults>;

    /// Connect to a device and count its GATT services and characteristics.
    ///
    /// Sources that cannot connect keep the default, which always fails.
    async fn probe(&self, address: &str) -> Result<GattSummary> {
        Err(Error::connection_failed(
            address,
            "GATT probing is not supported by this scan source",
        ))
    }
}
