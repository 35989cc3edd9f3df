//! Write-then-commit transaction overlay.
//!
//! Every node manager operation runs against a [`CacheStore`] wrapped around
//! the real state. Reads see pending writes first; nothing reaches the inner
//! store until [`CacheStore::commit`], so an operation that fails halfway
//! leaves no trace once the overlay is dropped.

use std::collections::BTreeMap;
use tracing::trace;
use zenith_core::{KvRead, KvStore, StoreResult, WriteBatch};

/// Buffered overlay over an inner [`KvStore`].
#[derive(Debug)]
pub struct CacheStore<S> {
    inner: S,
    /// Pending changes: `Some` for a put, `None` for a delete.
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<S> CacheStore<S> {
    /// Create an overlay with no pending changes.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pending: BTreeMap::new(),
        }
    }

    /// Get a reference to the inner store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Check if there are pending changes
    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of keys touched since the overlay was opened.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Clear all pending changes without committing
    pub fn rollback(&mut self) {
        self.pending.clear();
    }
}

impl<S: KvStore> CacheStore<S> {
    /// Flush pending changes to the inner store as one batch.
    pub fn commit(mut self) -> StoreResult<S> {
        if !self.pending.is_empty() {
            let mut batch = WriteBatch::new();
            for (key, value) in std::mem::take(&mut self.pending) {
                match value {
                    Some(value) => batch.put(key, value),
                    None => batch.delete(key),
                }
            }
            trace!(operations = batch.len(), "Committing overlay");
            self.inner.write_batch(batch)?;
        }
        Ok(self.inner)
    }
}

impl<S: KvRead> KvRead for CacheStore<S> {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        match self.pending.get(key) {
            Some(value) => Ok(value.clone()),
            None => self.inner.get(key),
        }
    }
}

impl<S: KvRead> KvStore for CacheStore<S> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.pending.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> StoreResult<()> {
        self.pending.insert(key.to_vec(), None);
        Ok(())
    }
}
