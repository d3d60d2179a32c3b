//! End-to-end wire tests over the assembled router.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use devlock_devices::token::DEFAULT_TOKEN_TTL_SECS;
use devlockd::routes::{self, AppServices};
use http_body_util::BodyExt;
use tower::ServiceExt;

fn test_app() -> (Router, AppServices) {
    test_app_with_ttl(DEFAULT_TOKEN_TTL_SECS)
}

fn test_app_with_ttl(token_ttl_secs: i64) -> (Router, AppServices) {
    let kv: Arc<dyn devlock_kv::KVStore> = Arc::new(devlock_kv::MemoryStore::new());
    let services = routes::init_services(kv, "test-secret", token_ttl_secs);
    let app = routes::build_router(&services);
    (app, services)
}

async fn post(app: &Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

/// The enrollment credential as the device would read it out of the QR
/// payload; the stored token and the QR token are the same string.
fn qr_token(services: &AppServices, device_id: &str) -> String {
    services.devices.get(device_id).unwrap().token
}

#[tokio::test]
async fn generate_qr_then_duplicate_rejected() {
    let (app, _services) = test_app();

    let (status, body) = post(&app, "/api/devices/generate-qr", serde_json::json!({"deviceId": "D1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deviceId"], "D1");
    assert!(
        body["qrCodeUrl"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,")
    );

    let (status, body) = post(&app, "/api/devices/generate-qr", serde_json::json!({"deviceId": "D1"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Device already registered");
}

#[tokio::test]
async fn enrollment_round_trip() {
    let (app, services) = test_app();

    post(&app, "/api/devices/generate-qr", serde_json::json!({"deviceId": "D1"})).await;

    let (status, body) = get(&app, "/api/devices/D1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");

    let token = qr_token(&services, "D1");
    let (status, body) = post(
        &app,
        "/api/devices/enroll",
        serde_json::json!({"deviceId": "D1", "token": token}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Device enrolled successfully");

    let (status, body) = get(&app, "/api/devices/D1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn enroll_with_garbage_token_is_rejected() {
    let (app, _services) = test_app();

    post(&app, "/api/devices/generate-qr", serde_json::json!({"deviceId": "D1"})).await;

    let (status, body) = post(
        &app,
        "/api/devices/enroll",
        serde_json::json!({"deviceId": "D1", "token": "garbage"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid device or token");
}

#[tokio::test]
async fn enroll_with_other_devices_token_is_rejected() {
    let (app, services) = test_app();

    post(&app, "/api/devices/generate-qr", serde_json::json!({"deviceId": "D1"})).await;
    post(&app, "/api/devices/generate-qr", serde_json::json!({"deviceId": "D2"})).await;

    // D2's credential verifies and is not expired, but it is not D1's
    // stored token.
    let token = qr_token(&services, "D2");
    let (status, body) = post(
        &app,
        "/api/devices/enroll",
        serde_json::json!({"deviceId": "D1", "token": token}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid device or token");
}

#[tokio::test]
async fn enroll_with_expired_token_is_unauthorized() {
    let (app, services) = test_app_with_ttl(-3600);

    post(&app, "/api/devices/generate-qr", serde_json::json!({"deviceId": "D1"})).await;

    // The stored token matches exactly; only the expiry check fails.
    let token = qr_token(&services, "D1");
    let (status, body) = post(
        &app,
        "/api/devices/enroll",
        serde_json::json!({"deviceId": "D1", "token": token}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token is invalid or expired");
}

#[tokio::test]
async fn lock_is_idempotent_and_unlock_restores_active() {
    let (app, services) = test_app();

    post(&app, "/api/devices/generate-qr", serde_json::json!({"deviceId": "D1"})).await;
    let token = qr_token(&services, "D1");
    post(&app, "/api/devices/enroll", serde_json::json!({"deviceId": "D1", "token": token})).await;

    for _ in 0..3 {
        let (status, body) = post(&app, "/api/devices/lock", serde_json::json!({"deviceId": "D1"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Device locked successfully");
    }
    let (_, body) = get(&app, "/api/devices/D1").await;
    assert_eq!(body["status"], "locked");

    let (status, body) = post(&app, "/api/devices/unlock", serde_json::json!({"deviceId": "D1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Device unlocked successfully");

    let (_, body) = get(&app, "/api/devices/D1").await;
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn lock_unknown_device_is_not_found() {
    let (app, _services) = test_app();

    let (status, body) = post(&app, "/api/devices/lock", serde_json::json!({"deviceId": "NOPE"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Device not found");
}

#[tokio::test]
async fn status_of_unknown_device_is_not_found() {
    let (app, _services) = test_app();

    let (status, body) = get(&app, "/api/devices/NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Device not found");
}

#[tokio::test]
async fn customer_add_coerces_amounts_and_binds_both_ways() {
    let (app, services) = test_app();

    post(&app, "/api/devices/generate-qr", serde_json::json!({"deviceId": "D1"})).await;

    let (status, body) = post(
        &app,
        "/api/customers/add",
        serde_json::json!({
            "name": "A",
            "email": "a@x",
            "emiPerMonth": "100",
            "downpayment": "500",
            "deviceId": "D1",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Customer added successfully");
    // Coerced to numbers, not echoed back as strings.
    assert_eq!(body["customer"]["emiPerMonth"], serde_json::json!(100.0));
    assert_eq!(body["customer"]["downpayment"], serde_json::json!(500.0));

    // Bidirectional 1:1 binding.
    let customer_id = body["customer"]["customerId"].as_str().unwrap();
    let device = services.devices.get("D1").unwrap();
    assert_eq!(device.customer_id.as_deref(), Some(customer_id));
    let customer = services.customers.get(customer_id).unwrap();
    assert_eq!(customer.device_id, "D1");
}

#[tokio::test]
async fn customer_add_for_unknown_device_is_not_found() {
    let (app, _services) = test_app();

    let (status, body) = post(
        &app,
        "/api/customers/add",
        serde_json::json!({
            "name": "A",
            "email": "a@x",
            "emiPerMonth": 100,
            "downpayment": 500,
            "deviceId": "NOPE",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Device not found");
}

#[tokio::test]
async fn customer_add_rejects_non_numeric_amounts() {
    let (app, _services) = test_app();

    post(&app, "/api/devices/generate-qr", serde_json::json!({"deviceId": "D1"})).await;

    let (status, body) = post(
        &app,
        "/api/customers/add",
        serde_json::json!({
            "name": "A",
            "email": "a@x",
            "emiPerMonth": "lots",
            "downpayment": 500,
            "deviceId": "D1",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "emiPerMonth must be a non-negative number");
}

#[tokio::test]
async fn missing_fields_are_field_specific_400s() {
    let (app, _services) = test_app();

    let cases = [
        ("/api/devices/generate-qr", serde_json::json!({}), "Please provide a device ID"),
        ("/api/devices/enroll", serde_json::json!({"deviceId": "D1"}), "Device ID and token are required"),
        ("/api/devices/enroll", serde_json::json!({"token": "t"}), "Device ID and token are required"),
        ("/api/devices/lock", serde_json::json!({}), "Device ID is required"),
        ("/api/devices/unlock", serde_json::json!({}), "Device ID is required"),
        ("/api/customers/add", serde_json::json!({"name": "A"}), "All customer details are required"),
    ];

    for (uri, body, expected) in cases {
        let (status, response) = post(&app, uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(response["error"], expected, "{}", uri);
    }
}

#[tokio::test]
async fn empty_device_id_counts_as_missing() {
    let (app, _services) = test_app();

    let (status, body) = post(&app, "/api/devices/generate-qr", serde_json::json!({"deviceId": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please provide a device ID");
}

#[tokio::test]
async fn re_enroll_after_lock_reactivates() {
    let (app, services) = test_app();

    post(&app, "/api/devices/generate-qr", serde_json::json!({"deviceId": "D1"})).await;
    let token = qr_token(&services, "D1");
    post(&app, "/api/devices/enroll", serde_json::json!({"deviceId": "D1", "token": token})).await;
    post(&app, "/api/devices/lock", serde_json::json!({"deviceId": "D1"})).await;

    // The original QR credential still enrolls; lock does not clear the
    // stored token.
    let (status, _) = post(
        &app,
        "/api/devices/enroll",
        serde_json::json!({"deviceId": "D1", "token": token}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/api/devices/D1").await;
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn health_and_version_respond() {
    let (app, _services) = test_app();

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = get(&app, "/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "devlockd");
}
