use devlock_core::now_rfc3339;
use devlock_store::KvRecord;
use serde::{Deserialize, Serialize};

/// Customer — the party repaying a financed device. Bound 1:1 to a
/// device; the device record carries the matching back-reference.
/// PK = customer_id (generated at creation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Customer identifier — primary key, `customer-<random>`.
    pub customer_id: String,

    pub name: String,

    /// Contact email. Format is not validated here.
    pub email: String,

    /// Monthly installment amount. Non-negative.
    pub emi_per_month: f64,

    /// Upfront payment. Non-negative.
    pub downpayment: f64,

    /// The financed device.
    pub device_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,
}

impl KvRecord for Customer {
    const RESOURCE: &'static str = "customer";

    fn kv_prefix() -> &'static str {
        "customers:customer:"
    }

    fn key_value(&self) -> String {
        self.customer_id.clone()
    }

    fn before_create(&mut self) {
        self.create_at = Some(now_rfc3339());
    }
}
