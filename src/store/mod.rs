//! In-memory store for the latest battery report.

pub mod status;
pub mod types;

pub use status::StatusStore;
pub use types::{stringify_percentage, BatteryReport, TimestampFormat};
