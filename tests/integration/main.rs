//! Integration tests for the battery relay.
//!
//! Most tests drive the router directly via `tower::ServiceExt`; the last one
//! binds a real listener on a loopback port and talks to it over HTTP.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use battery_relay::api::{self, create_router, AppState};
use battery_relay::store::{BatteryReport, StatusStore, TimestampFormat};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

fn post_battery(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/update-battery")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn fetch(app: &Router) -> Value {
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/battery").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn submit(app: &Router, body: &str) -> StatusCode {
    app.clone()
        .oneshot(post_battery(body))
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn report_lifecycle() {
    let app = create_router(AppState::default());

    assert_eq!(
        fetch(&app).await,
        json!({"percentage": "Unknown", "updated_at": "Never"})
    );

    assert_eq!(submit(&app, r#"{"percentage": 50}"#).await, StatusCode::NO_CONTENT);
    assert_eq!(submit(&app, r#"{"percentage": 20}"#).await, StatusCode::NO_CONTENT);

    let report = fetch(&app).await;
    assert_eq!(report["percentage"], "20");
    assert_ne!(report["updated_at"], "Never");
}

#[tokio::test]
async fn rejected_report_keeps_previous_value() {
    let app = create_router(AppState::default());

    assert_eq!(submit(&app, r#"{"percentage": 73.5}"#).await, StatusCode::NO_CONTENT);
    let before = fetch(&app).await;

    assert_eq!(submit(&app, "{}").await, StatusCode::BAD_REQUEST);
    assert_eq!(fetch(&app).await, before);
    assert_eq!(before["percentage"], "73.5");
}

#[tokio::test]
async fn explicit_null_is_stored() {
    let app = create_router(AppState::default());

    assert_eq!(submit(&app, r#"{"percentage": null}"#).await, StatusCode::NO_CONTENT);
    assert_eq!(fetch(&app).await["percentage"], "null");
}

#[tokio::test]
async fn configured_timestamp_layout_reaches_clients() {
    let store = StatusStore::new(TimestampFormat::new("%Y-%m-%d").unwrap());
    let app = create_router(AppState::new(store));

    submit(&app, r#"{"percentage": 99}"#).await;

    let updated_at = fetch(&app).await["updated_at"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(updated_at.len(), 10);
    assert_eq!(updated_at.matches('-').count(), 2);
}

#[tokio::test]
async fn repeated_pings_connect_once() {
    let state = AppState::default();
    let app = create_router(state.clone());

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    assert!(state.store.has_connected());
    // Already flipped by the requests above.
    assert!(!state.store.probe());
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let app = create_router(AppState::default());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/update-battery")
        .header(header::ORIGIN, "http://phone.local")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submits_and_fetches_see_whole_reports() {
    let state = AppState::default();
    let app = create_router(state.clone());

    let mut handles = Vec::new();
    for i in 0..16 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                let status = submit(&app, &format!(r#"{{"percentage": {}}}"#, i)).await;
                assert_eq!(status, StatusCode::NO_CONTENT);
            } else {
                let report: BatteryReport = serde_json::from_value(fetch(&app).await).unwrap();
                assert_eq!(report.is_unknown(), report.updated_at == "Never");
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    let final_report = state.store.fetch().await;
    let value: u32 = final_report.percentage.parse().unwrap();
    assert_eq!(value % 2, 0);
}

#[tokio::test]
async fn live_server_round_trip() {
    let state = AppState::default();
    let listener = api::bind("127.0.0.1", 0).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let store = Arc::clone(&state.store);

    tokio::spawn(api::serve(listener, state));

    let client = reqwest::Client::new();
    let base = format!("http://{}", addr);

    let ping = client.get(format!("{}/ping", base)).send().await.unwrap();
    assert_eq!(ping.status().as_u16(), 204);

    let update = client
        .post(format!("{}/update-battery", base))
        .json(&json!({"percentage": 87}))
        .send()
        .await
        .unwrap();
    assert_eq!(update.status().as_u16(), 204);

    let report: BatteryReport = client
        .get(format!("{}/battery", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report.percentage, "87");
    assert_eq!(report, store.fetch().await);

    let invalid = client
        .post(format!("{}/update-battery", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status().as_u16(), 400);
    let body: Value = invalid.json().await.unwrap();
    assert_eq!(body, json!({"error": "Invalid data"}));
}
