//! POST /api/devices/generate-qr — register a device and issue its
//! enrollment QR.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use devlock_core::ServiceError;
use serde::{Deserialize, Serialize};

use crate::service::DeviceService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQrRequest {
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQrResponse {
    pub qr_code_url: String,
    pub device_id: String,
}

pub async fn generate_qr(
    State(svc): State<Arc<DeviceService>>,
    Json(body): Json<GenerateQrRequest>,
) -> Result<Json<GenerateQrResponse>, ServiceError> {
    let device_id = match body.device_id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => return Err(ServiceError::Validation("Please provide a device ID".into())),
    };

    let issued = svc.register(device_id).map_err(|e| match e {
        // Wire contract: duplicate registration reports as 400, not 409.
        ServiceError::Conflict(msg) => ServiceError::Validation(msg),
        other => other,
    })?;

    Ok(Json(GenerateQrResponse {
        qr_code_url: issued.qr_code_url,
        device_id: issued.device.device_id,
    }))
}
