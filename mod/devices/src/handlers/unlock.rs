//! POST /api/devices/unlock — operator-initiated unlock back to active.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use devlock_core::ServiceError;
use serde::Deserialize;

use super::MessageResponse;
use crate::service::DeviceService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRequest {
    #[serde(default)]
    pub device_id: Option<String>,
}

pub async fn unlock(
    State(svc): State<Arc<DeviceService>>,
    Json(body): Json<UnlockRequest>,
) -> Result<Json<MessageResponse>, ServiceError> {
    let device_id = match body.device_id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => return Err(ServiceError::Validation("Device ID is required".into())),
    };

    svc.unlock(device_id)?;

    Ok(Json(MessageResponse {
        message: "Device unlocked successfully".into(),
    }))
}
