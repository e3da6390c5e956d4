//! Battery status relay.
//!
//! A phone periodically posts its battery percentage; any other client can
//! then read the most recent report. The service keeps exactly one report in
//! memory and nothing else:
//!
//! ```text
//! phone  ── POST /update-battery {"percentage": 87} ──▶ relay   (204)
//! widget ── GET  /battery ─────────────────────────────▶ relay   (200)
//!            {"percentage": "87", "updated_at": "10/19/2026, 3:04:05 PM"}
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`store`]: The in-memory battery report store
//! - [`api`]: HTTP routes, handlers and server lifecycle
//! - [`metrics`]: Prometheus counters and latency histograms
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{ApiError, RelayError, Result};
