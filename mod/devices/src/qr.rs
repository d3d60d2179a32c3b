//! QR payload rendering.
//!
//! The enrollment QR carries a UTF-8 JSON string `{"deviceId":…,"token":…}`
//! rendered to a PNG and embedded as a `data:image/png;base64,…` URI. Pure
//! functions, no shared state.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use devlock_core::ServiceError;
use image::Luma;
use qrcode::QrCode;
use serde::Serialize;

/// The JSON structure scanned by the device during enrollment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QrPayload<'a> {
    device_id: &'a str,
    token: &'a str,
}

/// Render the enrollment payload for a device into a PNG data URI.
pub fn enrollment_data_url(device_id: &str, token: &str) -> Result<String, ServiceError> {
    let payload = serde_json::to_string(&QrPayload { device_id, token })
        .map_err(|e| ServiceError::Internal(format!("QR payload encode failed: {}", e)))?;
    data_url(&payload)
}

/// Render an arbitrary string into a QR PNG data URI.
fn data_url(data: &str) -> Result<String, ServiceError> {
    let code = QrCode::new(data.as_bytes())
        .map_err(|e| ServiceError::Internal(format!("QR encode failed: {}", e)))?;
    let img = code.render::<Luma<u8>>().build();

    let mut png = Vec::new();
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageOutputFormat::Png)
        .map_err(|e| ServiceError::Internal(format!("PNG encode failed: {}", e)))?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}
