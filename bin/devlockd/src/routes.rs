//! Route registration — collects all module routes + system endpoints.

use std::sync::Arc;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::get;
use devlock_core::Module;
use devlock_customers::CustomersModule;
use devlock_customers::service::CustomerService;
use devlock_devices::DevicesModule;
use devlock_devices::service::DeviceService;
use devlock_devices::token::TokenService;
use tower_http::trace::TraceLayer;

/// Shared service handles, built once at startup.
pub struct AppServices {
    pub devices: Arc<DeviceService>,
    pub customers: Arc<CustomerService>,
}

/// Wire up the registries and the token service over a KV backend.
pub fn init_services(
    kv: Arc<dyn devlock_kv::KVStore>,
    jwt_secret: &str,
    token_ttl_secs: i64,
) -> AppServices {
    let tokens = TokenService::new(jwt_secret, token_ttl_secs);
    let devices = Arc::new(DeviceService::new(Arc::clone(&kv), tokens));
    let customers = Arc::new(CustomerService::new(kv, Arc::clone(&devices)));
    AppServices { devices, customers }
}

/// Build the complete router with all routes.
///
/// Module routes are nested under `/api/{name}`; system endpoints sit at
/// the root.
pub fn build_router(services: &AppServices) -> Router {
    let modules: Vec<Box<dyn Module>> = vec![
        Box::new(DevicesModule::new(Arc::clone(&services.devices))),
        Box::new(CustomersModule::new(Arc::clone(&services.customers))),
    ];

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    for module in &modules {
        app = app.nest(&format!("/api/{}", module.name()), module.routes());
    }

    app.layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "devlockd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
