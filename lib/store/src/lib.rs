//! KvRecord trait + KvOps CRUD operations.
//!
//! A model impls `KvRecord` to declare its key + hooks.
//! `KvOps<T>` provides the actual get/save against a KVStore backend.

mod kv;

pub use kv::{KvOps, KvRecord};
