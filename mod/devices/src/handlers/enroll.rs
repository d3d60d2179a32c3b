//! POST /api/devices/enroll — device-initiated enrollment with the
//! credential scanned from the QR.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use devlock_core::ServiceError;
use serde::Deserialize;

use super::MessageResponse;
use crate::service::DeviceService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

pub async fn enroll(
    State(svc): State<Arc<DeviceService>>,
    Json(body): Json<EnrollRequest>,
) -> Result<Json<MessageResponse>, ServiceError> {
    let (device_id, token) = match (body.device_id.as_deref(), body.token.as_deref()) {
        (Some(id), Some(token)) if !id.is_empty() && !token.is_empty() => (id, token),
        _ => {
            return Err(ServiceError::Validation(
                "Device ID and token are required".into(),
            ));
        }
    };

    svc.enroll(device_id, token)?;

    Ok(Json(MessageResponse {
        message: "Device enrolled successfully".into(),
    }))
}
