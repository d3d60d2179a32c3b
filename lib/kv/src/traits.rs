use crate::error::KVError;

/// KVStore provides a key-value storage interface.
///
/// Keys follow a namespaced convention: `devices:device:D1`,
/// `customers:customer:customer-ab12…`, etc. Registries are the only
/// mutable shared state in the system, so the write operations here are
/// the contention points: each implementation must make `set_if_absent`
/// atomic with respect to concurrent writers.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair, overwriting any existing value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Set a key-value pair only if the key is absent. Returns `true` if
    /// the value was written, `false` if the key already existed.
    /// Compare-and-set: the presence check and the write are one atomic
    /// step.
    fn set_if_absent(&self, key: &str, value: &[u8]) -> Result<bool, KVError>;
}
