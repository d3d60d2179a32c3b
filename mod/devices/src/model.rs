use devlock_core::now_rfc3339;
use devlock_store::KvRecord;
use serde::{Deserialize, Serialize};

/// Device status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Pending,
    Active,
    Locked,
}

impl Default for DeviceStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Device — a financed asset under lifecycle control.
/// PK = device_id (opaque, operator-chosen).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Device identifier — primary key.
    pub device_id: String,

    /// The most recently issued enrollment credential for this device.
    /// Enrollment requires exact equality with the presented token.
    pub token: String,

    /// Device status.
    #[serde(default)]
    pub status: DeviceStatus,

    /// Back-reference to the customer bound to this device.
    #[serde(default)]
    pub customer_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_at: Option<String>,
}

impl Device {
    /// A freshly registered device: pending, no customer.
    pub fn new(device_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            token: token.into(),
            status: DeviceStatus::Pending,
            customer_id: None,
            create_at: None,
            update_at: None,
        }
    }
}

impl KvRecord for Device {
    const RESOURCE: &'static str = "device";

    fn kv_prefix() -> &'static str {
        "devices:device:"
    }

    fn key_value(&self) -> String {
        self.device_id.clone()
    }

    fn before_create(&mut self) {
        let now = now_rfc3339();
        self.create_at = Some(now.clone());
        self.update_at = Some(now);
    }

    fn before_update(&mut self) {
        self.update_at = Some(now_rfc3339());
    }
}
