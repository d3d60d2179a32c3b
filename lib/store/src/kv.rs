use std::sync::Arc;

use devlock_core::ServiceError;
use serde::{Serialize, de::DeserializeOwned};

/// Trait implemented by models to declare KV storage behavior.
///
/// The key value is extracted from the model instance via `key_value()`.
/// Hooks have default no-op impls.
pub trait KvRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Resource name used in error messages ("device", "customer").
    const RESOURCE: &'static str;

    /// KV key prefix: "{module}:{resource}:".
    fn kv_prefix() -> &'static str;

    /// Extract the key value from this instance as a string.
    fn key_value(&self) -> String;

    /// Called before inserting a new record. Use for auto-fill (timestamps).
    fn before_create(&mut self) {}

    /// Called before updating an existing record.
    fn before_update(&mut self) {}
}

/// CRUD operations for a KvRecord model. Holds a reference to the KV backend.
pub struct KvOps<T: KvRecord> {
    kv: Arc<dyn devlock_kv::KVStore>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: KvRecord> KvOps<T> {
    pub fn new(kv: Arc<dyn devlock_kv::KVStore>) -> Self {
        Self {
            kv,
            _phantom: std::marker::PhantomData,
        }
    }

    fn make_key(id: &str) -> String {
        format!("{}{}", T::kv_prefix(), id)
    }

    fn kv_err(e: devlock_kv::KVError) -> ServiceError {
        ServiceError::Storage(e.to_string())
    }

    /// Get a record by key value. Returns None if not found.
    pub fn get(&self, id: &str) -> Result<Option<T>, ServiceError> {
        let key = Self::make_key(id);
        match self.kv.get(&key).map_err(Self::kv_err)? {
            Some(bytes) => {
                let record: T = serde_json::from_slice(&bytes)
                    .map_err(|e| ServiceError::Internal(format!("deserialize: {}", e)))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Create a new record. Calls the before_create hook; rejects
    /// duplicate keys. The duplicate check rides on the backend's
    /// compare-and-set, so concurrent creators get exactly one winner.
    pub fn save_new(&self, mut record: T) -> Result<T, ServiceError> {
        record.before_create();

        let id = record.key_value();
        let key = Self::make_key(&id);

        let bytes = serde_json::to_vec(&record)
            .map_err(|e| ServiceError::Internal(format!("serialize: {}", e)))?;

        let inserted = self.kv.set_if_absent(&key, &bytes).map_err(Self::kv_err)?;
        if !inserted {
            return Err(ServiceError::Conflict(format!(
                "{} '{}' already exists",
                T::RESOURCE,
                id
            )));
        }

        Ok(record)
    }

    /// Update an existing record. Calls the before_update hook.
    pub fn save(&self, mut record: T) -> Result<T, ServiceError> {
        record.before_update();

        let id = record.key_value();
        let key = Self::make_key(&id);

        let bytes = serde_json::to_vec(&record)
            .map_err(|e| ServiceError::Internal(format!("serialize: {}", e)))?;
        self.kv.set(&key, &bytes).map_err(Self::kv_err)?;

        Ok(record)
    }
}
