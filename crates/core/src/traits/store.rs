//! Key-value store traits consumed by the node manager.
//!
//! The node manager never talks to a database directly. It reads and writes
//! opaque byte keys through [`KvRead`] / [`KvStore`], and a missing key is
//! reported as `Ok(None)` rather than an error.

use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A database I/O error occurred.
    #[error("database I/O error: {0}")]
    Io(String),

    /// Data corruption was detected.
    #[error("data corruption: {0}")]
    Corruption(String),

    /// A stored record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Generic internal error.
    #[error("internal store error: {0}")]
    Internal(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A batch of write operations applied in order.
#[derive(Debug, Default, Clone)]
pub struct WriteBatch {
    /// Operations in this batch.
    pub operations: Vec<WriteOperation>,
}

impl WriteBatch {
    /// Create a new empty write batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a put operation to the batch.
    pub fn put(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) {
        self.operations.push(WriteOperation::Put {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Add a delete operation to the batch.
    pub fn delete(&mut self, key: impl Into<Bytes>) {
        self.operations
            .push(WriteOperation::Delete { key: key.into() });
    }

    /// Returns true if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns the number of operations in the batch.
    pub fn len(&self) -> usize {
        self.operations.len()
    }
}

/// A single write operation within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOperation {
    /// Insert or update a key-value pair.
    Put {
        /// Key to write.
        key: Bytes,
        /// Value to write.
        value: Bytes,
    },
    /// Delete a key.
    Delete {
        /// Key to delete.
        key: Bytes,
    },
}

/// Read access to a key-value store.
pub trait KvRead {
    /// Get a value by key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Check if a key exists.
    fn contains(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Read-write access to a key-value store.
///
/// All state transitions run sequentially, so writers take `&mut self`;
/// atomicity across a whole transition is provided by an overlay that buffers
/// writes and flushes them with [`KvStore::write_batch`] on success.
///
/// # Example
///
/// ```ignore
/// use zenith_core::{KvRead, KvStore, WriteBatch};
///
/// fn example(store: &mut impl KvStore) {
///     store.put(b"key", b"value").unwrap();
///     assert_eq!(store.get(b"key").unwrap(), Some(b"value".to_vec()));
///
///     let mut batch = WriteBatch::new();
///     batch.put(b"key1".to_vec(), b"value1".to_vec());
///     batch.delete(b"key".to_vec());
///     store.write_batch(batch).unwrap();
/// }
/// ```
pub trait KvStore: KvRead {
    /// Put a key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Delete a key.
    ///
    /// Returns `Ok(())` even if the key does not exist.
    fn delete(&mut self, key: &[u8]) -> StoreResult<()>;

    /// Apply a batch of write operations.
    ///
    /// The default applies operations one by one; durable backends override
    /// this with a native atomic batch.
    fn write_batch(&mut self, batch: WriteBatch) -> StoreResult<()> {
        for op in batch.operations {
            match op {
                WriteOperation::Put { key, value } => self.put(&key, &value)?,
                WriteOperation::Delete { key } => self.delete(&key)?,
            }
        }
        Ok(())
    }
}

impl<T: KvRead + ?Sized> KvRead for &T {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }
}

impl<T: KvRead + ?Sized> KvRead for &mut T {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }
}

impl<T: KvStore + ?Sized> KvStore for &mut T {
    fn put(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> StoreResult<()> {
        (**self).delete(key)
    }

    fn write_batch(&mut self, batch: WriteBatch) -> StoreResult<()> {
        (**self).write_batch(batch)
    }
}
