//! Integration tests for the booking flow.
//!
//! These tests drive the full router with the in-memory store; no external
//! services are required.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use domain::services::BookingService;
use domain::BookingStore;
use microwave_booking_api::app::create_app;
use microwave_booking_api::config::Config;
use persistence::MemoryStore;

async fn test_app() -> (Router, Arc<BookingService>) {
    let config = Config::load_for_test(&[]).expect("test config");
    let store: Arc<dyn BookingStore> = Arc::new(MemoryStore::new());
    let service = Arc::new(BookingService::load(store).await.expect("load service"));
    (create_app(config, Arc::clone(&service)), service)
}

fn request(method: Method, uri: &str, identity: Option<(&str, &str)>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((user_id, role)) = identity {
        builder = builder
            .header("X-User-Id", user_id)
            .header("X-User-Role", role);
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

async fn register_device(app: &Router, max_duration_minutes: i64) -> String {
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/admin/devices",
            Some(("admin@company.com", "admin")),
            Some(json!({
                "name": "Kitchen Microwave A",
                "location": "Main Kitchen - Floor 1",
                "powerWatts": 1000,
                "maxDurationMinutes": max_duration_minutes
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoints() {
    let (app, _service) = test_app().await;

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"]["connected"], true);

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/health/live", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_device_listing_requires_identity() {
    let (app, _service) = test_app().await;

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/v1/devices", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/v1/devices",
            Some(("alice@company.com", "user")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_device_registration_requires_admin_role() {
    let (app, _service) = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/admin/devices",
            Some(("alice@company.com", "user")),
            Some(json!({
                "name": "Rogue Microwave",
                "location": "Under a desk"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_device_registration_validates_ranges() {
    let (app, _service) = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/admin/devices",
            Some(("admin@company.com", "admin")),
            Some(json!({
                "name": "Overclocked Microwave",
                "location": "Server Room",
                "powerWatts": 5000
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_reserve_conflict_and_cancel_flow() {
    let (app, _service) = test_app().await;
    let device_id = register_device(&app, 30).await;

    // Alice reserves for ten minutes.
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            &format!("/api/v1/devices/{}/reservations", device_id),
            Some(("alice@company.com", "user")),
            Some(json!({"durationMinutes": 10, "purpose": "lunch"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let reservation = body_json(response).await;
    assert_eq!(reservation["status"], "active");
    assert_eq!(reservation["durationMinutes"], 10);
    assert_eq!(reservation["purpose"], "lunch");

    // The device now shows occupied with Alice's name.
    let response = app
        .clone()
        .oneshot(request(
            Method::GET,
            &format!("/api/v1/devices/{}", device_id),
            Some(("alice@company.com", "user")),
            None,
        ))
        .await
        .unwrap();
    let device = body_json(response).await;
    assert_eq!(device["status"], "occupied");
    assert_eq!(device["currentUserName"], "alice");

    // Bob cannot take it while occupied.
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            &format!("/api/v1/devices/{}/reservations", device_id),
            Some(("bob@company.com", "user")),
            Some(json!({"durationMinutes": 5})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_state");

    // Bob cannot cancel Alice's reservation either.
    let response = app
        .clone()
        .oneshot(request(
            Method::DELETE,
            &format!("/api/v1/devices/{}/reservation", device_id),
            Some(("bob@company.com", "user")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Alice cancels; the device frees up.
    let response = app
        .clone()
        .oneshot(request(
            Method::DELETE,
            &format!("/api/v1/devices/{}/reservation", device_id),
            Some(("alice@company.com", "user")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cancelled = body_json(response).await;
    assert_eq!(cancelled["status"], "cancelled");

    let response = app
        .clone()
        .oneshot(request(
            Method::GET,
            &format!("/api/v1/devices/{}", device_id),
            Some(("alice@company.com", "user")),
            None,
        ))
        .await
        .unwrap();
    let device = body_json(response).await;
    assert_eq!(device["status"], "available");
    assert!(device.get("currentUserName").is_none());

    // A second cancel finds nothing active.
    let response = app
        .clone()
        .oneshot(request(
            Method::DELETE,
            &format!("/api/v1/devices/{}/reservation", device_id),
            Some(("alice@company.com", "user")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reserve_rejects_duration_over_device_limit() {
    let (app, _service) = test_app().await;
    let device_id = register_device(&app, 15).await;

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            &format!("/api/v1/devices/{}/reservations", device_id),
            Some(("alice@company.com", "user")),
            Some(json!({"durationMinutes": 16})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_maintenance_blocks_reservations() {
    let (app, _service) = test_app().await;
    let device_id = register_device(&app, 30).await;

    let response = app
        .clone()
        .oneshot(request(
            Method::PUT,
            &format!("/api/v1/admin/devices/{}/maintenance", device_id),
            Some(("admin@company.com", "admin")),
            Some(json!({"inMaintenance": true})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let device = body_json(response).await;
    assert_eq!(device["status"], "maintenance");

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            &format!("/api/v1/devices/{}/reservations", device_id),
            Some(("alice@company.com", "user")),
            Some(json!({"durationMinutes": 5})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_remove_device_blocked_while_reserved() {
    let (app, _service) = test_app().await;
    let device_id = register_device(&app, 30).await;

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            &format!("/api/v1/devices/{}/reservations", device_id),
            Some(("alice@company.com", "user")),
            Some(json!({"durationMinutes": 10})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(request(
            Method::DELETE,
            &format!("/api/v1/admin/devices/{}", device_id),
            Some(("admin@company.com", "admin")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_expiry_frees_device_through_service() {
    let (app, service) = test_app().await;
    let device_id = register_device(&app, 30).await;

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            &format!("/api/v1/devices/{}/reservations", device_id),
            Some(("alice@company.com", "user")),
            Some(json!({"durationMinutes": 10})),
        ))
        .await
        .unwrap();
    let reservation = body_json(response).await;
    let end_time: chrono::DateTime<chrono::Utc> =
        reservation["endTime"].as_str().unwrap().parse().unwrap();

    // Run the sweep the background job would run.
    let completed = service
        .expire(end_time + chrono::Duration::milliseconds(1))
        .await
        .unwrap();
    assert_eq!(completed.len(), 1);

    let response = app
        .clone()
        .oneshot(request(
            Method::GET,
            &format!("/api/v1/devices/{}", device_id),
            Some(("alice@company.com", "user")),
            None,
        ))
        .await
        .unwrap();
    let device = body_json(response).await;
    assert_eq!(device["status"], "available");

    // The completed reservation shows up in the user's history.
    let response = app
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/v1/reservations",
            Some(("alice@company.com", "user")),
            None,
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["status"], "completed");
}

#[tokio::test]
async fn test_stats_reflect_fleet_state() {
    let (app, _service) = test_app().await;
    let first = register_device(&app, 30).await;
    let _second = register_device(&app, 30).await;

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            &format!("/api/v1/devices/{}/reservations", first),
            Some(("alice@company.com", "user")),
            Some(json!({"durationMinutes": 10})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/v1/stats",
            Some(("alice@company.com", "user")),
            None,
        ))
        .await
        .unwrap();
    let stats = body_json(response).await;
    assert_eq!(stats["totalDevices"], 2);
    assert_eq!(stats["availableDevices"], 1);
    assert_eq!(stats["occupiedDevices"], 1);
    assert_eq!(stats["activeReservations"], 1);
}
