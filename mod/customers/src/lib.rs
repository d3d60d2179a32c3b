pub mod handlers;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;
use devlock_core::Module;

use service::CustomerService;

/// Customers module — repayment-party records bound 1:1 to devices.
pub struct CustomersModule {
    service: Arc<CustomerService>,
}

impl CustomersModule {
    pub fn new(service: Arc<CustomerService>) -> Self {
        Self { service }
    }
}

impl Module for CustomersModule {
    fn name(&self) -> &str {
        "customers"
    }

    fn routes(&self) -> Router {
        handlers::router(self.service.clone())
    }
}
