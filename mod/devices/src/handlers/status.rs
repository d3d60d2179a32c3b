//! GET /api/devices/{deviceId} — device status query.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use devlock_core::ServiceError;
use serde::Serialize;

use crate::model::DeviceStatus;
use crate::service::DeviceService;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: DeviceStatus,
}

pub async fn status(
    State(svc): State<Arc<DeviceService>>,
    Path(device_id): Path<String>,
) -> Result<Json<StatusResponse>, ServiceError> {
    let device = svc.get(&device_id)?;
    Ok(Json(StatusResponse { status: device.status }))
}
