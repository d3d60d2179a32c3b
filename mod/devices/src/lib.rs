pub mod handlers;
pub mod model;
pub mod qr;
pub mod service;
pub mod token;

use std::sync::Arc;

use axum::Router;
use devlock_core::Module;

use service::DeviceService;

/// Devices module — device lifecycle and enrollment API.
pub struct DevicesModule {
    service: Arc<DeviceService>,
}

impl DevicesModule {
    pub fn new(service: Arc<DeviceService>) -> Self {
        Self { service }
    }
}

impl Module for DevicesModule {
    fn name(&self) -> &str {
        "devices"
    }

    fn routes(&self) -> Router {
        handlers::router(self.service.clone())
    }
}
