//! HTTP API route definitions.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{battery, ping, render_metrics, update_battery, AppState};

/// Create the API router.
///
/// CORS allows any origin so the phone app and browser widgets can call the
/// relay directly. `/metrics` is only routed when a Prometheus handle is set.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        // Phone -> relay
        .route("/update-battery", post(update_battery))
        // Clients -> relay
        .route("/battery", get(battery))
        .route("/ping", get(ping));

    if state.metrics.is_some() {
        router = router.route("/metrics", get(render_metrics));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
