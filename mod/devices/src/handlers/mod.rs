//! Hand-written device handlers, one file per action.

pub mod enroll;
pub mod generate_qr;
pub mod lock;
pub mod status;
pub mod unlock;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use serde::Serialize;

use crate::service::DeviceService;

/// Standard `{"message": …}` success body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn router(svc: Arc<DeviceService>) -> Router {
    Router::new()
        .route("/generate-qr", post(generate_qr::generate_qr))
        .route("/enroll", post(enroll::enroll))
        .route("/lock", post(lock::lock))
        .route("/unlock", post(unlock::unlock))
        .route("/{device_id}", get(status::status))
        .with_state(svc)
}
