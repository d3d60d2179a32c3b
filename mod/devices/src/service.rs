//! Device registry service — the authoritative device store plus the
//! enrollment protocol built on it.

use std::sync::Arc;

use devlock_core::ServiceError;
use devlock_store::KvOps;
use parking_lot::Mutex;
use tracing::info;

use crate::model::{Device, DeviceStatus};
use crate::qr;
use crate::token::TokenService;

/// A freshly registered device together with its renderable QR payload.
#[derive(Debug)]
pub struct IssuedDevice {
    pub device: Device,
    pub qr_code_url: String,
}

/// Device registry + lifecycle transitions.
///
/// Every read-modify-write on a device record runs under `write`, so
/// status transitions are linearizable per device. Creation relies on the
/// store's compare-and-set instead. The lock is never held across token
/// verification or QR rendering.
pub struct DeviceService {
    ops: KvOps<Device>,
    tokens: TokenService,
    write: Mutex<()>,
}

impl DeviceService {
    pub fn new(kv: Arc<dyn devlock_kv::KVStore>, tokens: TokenService) -> Self {
        Self {
            ops: KvOps::new(kv),
            tokens,
            write: Mutex::new(()),
        }
    }

    /// Register a new device: mint its enrollment credential, render the
    /// QR payload, and insert the record in `pending`.
    ///
    /// Duplicate registration is rejected; concurrent registrations of the
    /// same id produce exactly one winner.
    pub fn register(&self, device_id: &str) -> Result<IssuedDevice, ServiceError> {
        // Cheap reject before minting and rendering.
        if self.ops.get(device_id)?.is_some() {
            return Err(ServiceError::Conflict("Device already registered".into()));
        }

        let token = self.tokens.issue(device_id)?;
        let qr_code_url = qr::enrollment_data_url(device_id, &token)?;

        let device = self
            .ops
            .save_new(Device::new(device_id, token))
            .map_err(|e| match e {
                // Lost a creation race after the cheap check.
                ServiceError::Conflict(_) => {
                    ServiceError::Conflict("Device already registered".into())
                }
                other => other,
            })?;

        info!("device {} registered (pending)", device_id);
        Ok(IssuedDevice { device, qr_code_url })
    }

    /// Look up a device. `NotFound` if missing.
    pub fn get(&self, device_id: &str) -> Result<Device, ServiceError> {
        self.ops
            .get(device_id)?
            .ok_or_else(|| ServiceError::NotFound("Device not found".into()))
    }

    /// Enroll a device: the presented token must equal the stored one
    /// exactly AND carry a valid signature and expiry.
    ///
    /// Equality defends against replay of a superseded credential;
    /// verification defends against tampering. Both checks are required.
    /// Equality is checked first, so a token that was never issued for
    /// this device fails as "invalid device or token" even when its
    /// signature would verify.
    pub fn enroll(&self, device_id: &str, token: &str) -> Result<Device, ServiceError> {
        {
            let _guard = self.write.lock();
            let device = self
                .ops
                .get(device_id)?
                .ok_or_else(|| ServiceError::Validation("Invalid device or token".into()))?;
            if device.token != token {
                return Err(ServiceError::Validation("Invalid device or token".into()));
            }
        }

        // Signature/expiry check runs outside the critical section.
        self.tokens.verify(token)?;

        let _guard = self.write.lock();
        let mut device = self
            .ops
            .get(device_id)?
            .ok_or_else(|| ServiceError::Validation("Invalid device or token".into()))?;
        if device.token != token {
            // Credential was superseded while we were verifying.
            return Err(ServiceError::Validation("Invalid device or token".into()));
        }
        device.status = DeviceStatus::Active;
        let device = self.ops.save(device)?;

        info!("device {} enrolled (active)", device_id);
        Ok(device)
    }

    /// Lock a device. Idempotent; allowed from any state.
    pub fn lock(&self, device_id: &str) -> Result<Device, ServiceError> {
        let device = self.transition(device_id, DeviceStatus::Locked)?;
        info!("device {} locked", device_id);
        Ok(device)
    }

    /// Unlock a device back to `active`. Idempotent; allowed from any state.
    pub fn unlock(&self, device_id: &str) -> Result<Device, ServiceError> {
        let device = self.transition(device_id, DeviceStatus::Active)?;
        info!("device {} unlocked", device_id);
        Ok(device)
    }

    /// Bind the customer back-reference on a device.
    pub fn set_customer(&self, device_id: &str, customer_id: &str) -> Result<Device, ServiceError> {
        let _guard = self.write.lock();
        let mut device = self
            .ops
            .get(device_id)?
            .ok_or_else(|| ServiceError::NotFound("Device not found".into()))?;
        device.customer_id = Some(customer_id.to_string());
        self.ops.save(device)
    }

    fn transition(&self, device_id: &str, status: DeviceStatus) -> Result<Device, ServiceError> {
        let _guard = self.write.lock();
        let mut device = self
            .ops
            .get(device_id)?
            .ok_or_else(|| ServiceError::NotFound("Device not found".into()))?;
        device.status = status;
        self.ops.save(device)
    }
}
