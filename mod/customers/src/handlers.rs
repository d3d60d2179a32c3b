//! POST /api/customers/add — create a customer and bind it to a device.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::routing::post;
use axum::Router;
use devlock_core::ServiceError;
use serde::{Deserialize, Serialize};

use crate::model::Customer;
use crate::service::{CreateCustomerInput, CustomerService};

pub fn router(svc: Arc<CustomerService>) -> Router {
    Router::new().route("/add", post(add)).with_state(svc)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCustomerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    // Amounts arrive as JSON numbers or numeric strings; both are
    // accepted and coerced on ingestion.
    #[serde(default)]
    pub emi_per_month: Option<serde_json::Value>,
    #[serde(default)]
    pub downpayment: Option<serde_json::Value>,
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddCustomerResponse {
    pub message: String,
    pub customer: Customer,
}

pub async fn add(
    State(svc): State<Arc<CustomerService>>,
    Json(body): Json<AddCustomerRequest>,
) -> Result<Json<AddCustomerResponse>, ServiceError> {
    let (name, email, device_id) = match (
        body.name.as_deref(),
        body.email.as_deref(),
        body.device_id.as_deref(),
    ) {
        (Some(name), Some(email), Some(device_id))
            if !name.is_empty() && !email.is_empty() && !device_id.is_empty() =>
        {
            (name, email, device_id)
        }
        _ => {
            return Err(ServiceError::Validation(
                "All customer details are required".into(),
            ));
        }
    };
    let (Some(emi), Some(down)) = (body.emi_per_month.as_ref(), body.downpayment.as_ref()) else {
        return Err(ServiceError::Validation(
            "All customer details are required".into(),
        ));
    };

    let customer = svc.create(CreateCustomerInput {
        name: name.to_string(),
        email: email.to_string(),
        emi_per_month: coerce_amount("emiPerMonth", emi)?,
        downpayment: coerce_amount("downpayment", down)?,
        device_id: device_id.to_string(),
    })?;

    Ok(Json(AddCustomerResponse {
        message: "Customer added successfully".into(),
        customer,
    }))
}

/// Coerce a JSON number or numeric string to a non-negative amount.
fn coerce_amount(field: &str, value: &serde_json::Value) -> Result<f64, ServiceError> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(ServiceError::Validation(format!(
            "{} must be a non-negative number",
            field
        ))),
    }
}
