//! HTTP API handlers.

use std::fmt;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use tracing::warn;

use crate::error::ApiError;
use crate::metrics;
use crate::store::{BatteryReport, StatusStore};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// The battery report store.
    pub store: Arc<StatusStore>,
    /// Prometheus handle, present when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around a store.
    pub fn new(store: StatusStore) -> Self {
        Self {
            store: Arc::new(store),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle so `/metrics` is served.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(StatusStore::default())
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

/// `percentage` field of a `POST /update-battery` body.
///
/// Only a JSON object can carry the field; arrays and scalars count as
/// missing. An explicit `null` is present.
pub fn percentage_field(body: &Value) -> Option<&Value> {
    body.as_object()?.get("percentage")
}

/// Store a battery report - 204 on success, 400 if `percentage` is missing.
pub async fn update_battery(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<StatusCode, ApiError> {
    let _timer = metrics::timer_http("/update-battery");

    match state.store.submit(percentage_field(&body)).await {
        Ok(_) => {
            metrics::inc_reports_accepted();
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            metrics::inc_reports_rejected();
            warn!("Rejected battery report: {}", e);
            Err(e)
        }
    }
}

/// Latest battery report - always returns 200.
pub async fn battery(State(state): State<AppState>) -> Json<BatteryReport> {
    let _timer = metrics::timer_http("/battery");
    metrics::inc_fetches();

    Json(state.store.fetch().await)
}

/// Liveness probe - always returns 204.
pub async fn ping(State(state): State<AppState>) -> StatusCode {
    let _timer = metrics::timer_http("/ping");
    metrics::inc_probes();

    state.store.probe();
    StatusCode::NO_CONTENT
}

/// Prometheus text exposition.
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
