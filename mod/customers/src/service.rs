//! Customer registry service.

use std::sync::Arc;

use devlock_core::{ServiceError, new_id};
use devlock_devices::service::DeviceService;
use devlock_store::KvOps;
use tracing::info;

use crate::model::Customer;

pub struct CreateCustomerInput {
    pub name: String,
    pub email: String,
    pub emi_per_month: f64,
    pub downpayment: f64,
    pub device_id: String,
}

/// Customer registry + device binding.
pub struct CustomerService {
    ops: KvOps<Customer>,
    devices: Arc<DeviceService>,
}

impl CustomerService {
    pub fn new(kv: Arc<dyn devlock_kv::KVStore>, devices: Arc<DeviceService>) -> Self {
        Self {
            ops: KvOps::new(kv),
            devices,
        }
    }

    /// Create a customer bound to an existing device and write the
    /// device's back-reference.
    ///
    /// The device-existence precondition is enforced here; the customer
    /// store itself does not check it.
    pub fn create(&self, input: CreateCustomerInput) -> Result<Customer, ServiceError> {
        self.devices.get(&input.device_id)?;

        let customer_id = format!("customer-{}", new_id());
        let customer = Customer {
            customer_id,
            name: input.name,
            email: input.email,
            emi_per_month: input.emi_per_month,
            downpayment: input.downpayment,
            device_id: input.device_id,
            create_at: None,
        };

        // save_new still rejects id collisions, however unlikely.
        let customer = self.ops.save_new(customer)?;
        self.devices.set_customer(&customer.device_id, &customer.customer_id)?;

        info!(
            "customer {} bound to device {}",
            customer.customer_id, customer.device_id
        );
        Ok(customer)
    }

    /// Look up a customer. `NotFound` if missing.
    pub fn get(&self, customer_id: &str) -> Result<Customer, ServiceError> {
        self.ops
            .get(customer_id)?
            .ok_or_else(|| ServiceError::NotFound("Customer not found".into()))
    }
}
