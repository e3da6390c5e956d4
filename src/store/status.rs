//! Status store holding the single latest battery report.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::types::{stringify_percentage, BatteryReport, TimestampFormat};
use crate::error::ApiError;

/// Holds the latest battery report and the first-connection flag.
///
/// Submits build the replacement report first and swap it in under the write
/// lock, so readers only ever see a whole report.
#[derive(Debug)]
pub struct StatusStore {
    report: RwLock<BatteryReport>,
    first_connection_seen: AtomicBool,
    timestamp_format: TimestampFormat,
}

impl StatusStore {
    /// Create a store with sentinel values and the given timestamp layout.
    pub fn new(timestamp_format: TimestampFormat) -> Self {
        Self {
            report: RwLock::new(BatteryReport::unknown()),
            first_connection_seen: AtomicBool::new(false),
            timestamp_format,
        }
    }

    /// Replace the stored report with `percentage`, stamped with local time.
    ///
    /// `None` means the client omitted the field; the stored report is left
    /// untouched. No range check is applied to present values.
    pub async fn submit(&self, percentage: Option<&Value>) -> Result<BatteryReport, ApiError> {
        let value = percentage.ok_or(ApiError::InvalidInput)?;

        let report = BatteryReport {
            percentage: stringify_percentage(value),
            updated_at: self.timestamp_format.render(&Local::now()),
        };

        *self.report.write().await = report.clone();
        debug!(
            percentage = %report.percentage,
            updated_at = %report.updated_at,
            "Battery report stored"
        );

        Ok(report)
    }

    /// Current report, or the sentinels if nothing was submitted yet.
    pub async fn fetch(&self) -> BatteryReport {
        self.report.read().await.clone()
    }

    /// Record a liveness probe.
    ///
    /// Returns `true` only for the first probe since the store was created,
    /// which is also the only one that logs.
    pub fn probe(&self) -> bool {
        let first = self
            .first_connection_seen
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();

        if first {
            info!("Phone connected to server.");
        }

        first
    }

    /// Whether any probe has been received.
    pub fn has_connected(&self) -> bool {
        self.first_connection_seen.load(Ordering::SeqCst)
    }
}

impl Default for StatusStore {
    fn default() -> Self {
        Self::new(TimestampFormat::default())
    }
}
