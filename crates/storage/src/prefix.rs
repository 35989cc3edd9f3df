//! Module-scoped key space with typed records.
//!
//! Each on-chain module owns the keys that start with its own address. A
//! [`PrefixStore`] is built with that address at construction and builds every
//! key as `module ‖ record kind ‖ segments`, then encodes values with bincode.

use serde::{de::DeserializeOwned, Serialize};
use tracing::trace;
use zenith_core::{KvRead, KvStore, StoreError, StoreResult};
use zenith_types::Address;

/// Encode a record for storage.
pub fn encode<T: Serialize>(value: &T) -> StoreResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decode a stored record.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Key-value view restricted to one module's key space.
#[derive(Debug)]
pub struct PrefixStore<S> {
    inner: S,
    prefix: Vec<u8>,
}

impl<S> PrefixStore<S> {
    /// Scope `inner` to the keys of the module at `module`.
    pub fn new(inner: S, module: Address) -> Self {
        Self::with_prefix(inner, module.to_vec())
    }

    /// Scope `inner` to an arbitrary byte prefix.
    pub fn with_prefix(inner: S, prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    /// The key prefix of this view.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Build the full key for a record kind and its key segments.
    pub fn key(&self, kind: &str, segments: &[&[u8]]) -> Vec<u8> {
        let len = self.prefix.len()
            + kind.len()
            + segments.iter().map(|s| s.len()).sum::<usize>();
        let mut key = Vec::with_capacity(len);
        key.extend_from_slice(&self.prefix);
        key.extend_from_slice(kind.as_bytes());
        for segment in segments {
            key.extend_from_slice(segment);
        }
        key
    }

    /// Get a reference to the unscoped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Get a mutable reference to the unscoped store
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Release the unscoped store.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: KvRead> PrefixStore<S> {
    /// Read and decode a record; `Ok(None)` if absent.
    pub fn get<T: DeserializeOwned>(&self, key: &[u8]) -> StoreResult<Option<T>> {
        match self.inner.get(key)? {
            Some(bytes) => decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Check if a record exists.
    pub fn contains(&self, key: &[u8]) -> StoreResult<bool> {
        self.inner.contains(key)
    }
}

impl<S: KvStore> PrefixStore<S> {
    /// Encode and write a record.
    pub fn put<T: Serialize>(&mut self, key: &[u8], value: &T) -> StoreResult<()> {
        let bytes = encode(value)?;
        trace!(key = %hex::encode(key), len = bytes.len(), "Store put");
        self.inner.put(key, &bytes)
    }

    /// Delete a record.
    pub fn delete(&mut self, key: &[u8]) -> StoreResult<()> {
        trace!(key = %hex::encode(key), "Store delete");
        self.inner.delete(key)
    }
}
