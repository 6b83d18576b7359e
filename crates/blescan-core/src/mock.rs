//! Mock scan source for testing.
//!
//! [`MockScanSource`] implements [`ScanSource`] without touching a radio, so
//! the scan policy and everything downstream of it can be tested on any
//! machine.
//!
//! # Features
//!
//! - **Scripted passes**: each call to `scan` returns the next queued result
//! - **Failure injection**: fail every pass, the next N passes, or one pass
//! - **Call recording**: pass count and the durations requested
//! - **Scripted probes**: per-address GATT summaries or failures
//! - **Latency simulation**: slow probes, to exercise timeouts

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::probe::GattSummary;
use crate::scan::ScanResults;
use crate::traits::ScanSource;

/// A scripted scan source.
///
/// Passes are consumed in order; once the queue is empty every further pass
/// returns an empty result.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use blescan_core::{MockScanSource, ScanResults, ScanSource};
/// use blescan_types::{AdvertisementRecord, DeviceRecord};
///
/// # #[tokio::main]
/// # async fn main() {
/// let pass = ScanResults::new().with(
///     DeviceRecord::new("AA:BB:CC:DD:EE:FF").with_rssi(-50),
///     AdvertisementRecord::new(),
/// );
/// let source = MockScanSource::new().with_pass(pass);
///
/// let first = source.scan(Duration::from_secs(10)).await.unwrap();
/// assert_eq!(first.len(), 1);
/// assert_eq!(source.scan_count(), 1);
/// # }
/// ```
#[derive(Default)]
pub struct MockScanSource {
    passes: Mutex<VecDeque<ScanResults>>,
    requested: Mutex<Vec<Duration>>,
    probes: Mutex<HashMap<String, std::result::Result<GattSummary, String>>>,
    scan_count: AtomicU32,
    probe_count: AtomicU32,
    should_fail: AtomicBool,
    fail_message: Mutex<String>,
    /// Number of passes to fail before succeeding.
    remaining_failures: AtomicU32,
    /// A single 1-based pass number that fails (0 = none).
    fail_pass: AtomicU32,
    /// Simulated probe latency in milliseconds (0 = no delay).
    probe_latency_ms: AtomicU64,
}

impl std::fmt::Debug for MockScanSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockScanSource")
            .field("scan_count", &self.scan_count.load(Ordering::Relaxed))
            .field("should_fail", &self.should_fail.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl MockScanSource {
    /// Create a source with no queued passes.
    pub fn new() -> Self {
        Self {
            fail_message: Mutex::new("Mock failure".to_string()),
            ..Default::default()
        }
    }

    /// Queue the result of the next pass.
    #[must_use]
    pub fn with_pass(self, results: ScanResults) -> Self {
        self.push_pass(results);
        self
    }

    /// Queue a successful GATT probe result for `address`.
    #[must_use]
    pub fn with_probe(self, address: &str, summary: GattSummary) -> Self {
        lock(&self.probes).insert(address.to_string(), Ok(summary));
        self
    }

    /// Make probing `address` fail with `reason`.
    #[must_use]
    pub fn with_probe_failure(self, address: &str, reason: &str) -> Self {
        lock(&self.probes).insert(address.to_string(), Err(reason.to_string()));
        self
    }

    /// Queue the result of a future pass.
    pub fn push_pass(&self, results: ScanResults) {
        lock(&self.passes).push_back(results);
    }

    /// Make every pass fail (or stop failing).
    pub fn set_should_fail(&self, fail: bool, message: Option<&str>) {
        self.should_fail.store(fail, Ordering::Relaxed);
        if let Some(msg) = message {
            *lock(&self.fail_message) = msg.to_string();
        }
    }

    /// Fail the next `count` passes, then succeed.
    pub fn set_transient_failures(&self, count: u32) {
        self.remaining_failures.store(count, Ordering::Relaxed);
    }

    /// Fail only the pass with this 1-based number.
    pub fn fail_on_pass(&self, pass: u32) {
        self.fail_pass.store(pass, Ordering::Relaxed);
    }

    /// Delay every probe by `latency`.
    ///
    /// Set to `Duration::ZERO` to disable latency simulation.
    pub fn set_probe_latency(&self, latency: Duration) {
        self.probe_latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Number of `scan` calls made, including failed ones.
    pub fn scan_count(&self) -> u32 {
        self.scan_count.load(Ordering::Relaxed)
    }

    /// Number of `probe` calls made.
    pub fn probe_count(&self) -> u32 {
        self.probe_count.load(Ordering::Relaxed)
    }

    /// Durations passed to `scan`, in call order.
    pub fn requested_durations(&self) -> Vec<Duration> {
        lock(&self.requested).clone()
    }

    fn check_should_fail(&self, pass: u32) -> Result<()> {
        let message = || Error::ScanFailed(lock(&self.fail_message).clone());

        if self.remaining_failures.load(Ordering::Relaxed) > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
            return Err(message());
        }

        if self.fail_pass.load(Ordering::Relaxed) == pass {
            return Err(message());
        }

        if self.should_fail.load(Ordering::Relaxed) {
            Err(message())
        } else {
            Ok(())
        }
    }
}

/// Lock a mutex, recovering the data if a test thread panicked while holding it.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[async_trait]
impl ScanSource for MockScanSource {
    async fn scan(&self, duration: Duration) -> Result<ScanResults> {
        let pass = self.scan_count.fetch_add(1, Ordering::Relaxed) + 1;
        lock(&self.requested).push(duration);

        self.check_should_fail(pass)?;

        Ok(lock(&self.passes).pop_front().unwrap_or_default())
    }

    async fn probe(&self, address: &str) -> Result<GattSummary> {
        self.probe_count.fetch_add(1, Ordering::Relaxed);

        let latency = self.probe_latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        match lock(&self.probes).get(address) {
            Some(Ok(summary)) => Ok(*summary),
            Some(Err(reason)) => Err(Error::connection_failed(address, reason.clone())),
            None => Err(Error::device_not_found(address)),
        }
    }
}
