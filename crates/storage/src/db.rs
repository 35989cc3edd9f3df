//! RocksDB-backed state store
//!
//! This module provides the durable [`KvStore`] used by a running node. Node
//! manager state lives in the `state` column family; the `metadata` column
//! family records bookkeeping such as the last committed height.

use parking_lot::RwLock;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, MultiThreaded, Options,
    WriteBatchWithTransaction, WriteOptions, DB,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, trace};
use zenith_core::{KvRead, KvStore, StoreError, StoreResult, WriteBatch, WriteOperation};

/// Column family names
pub mod cf {
    /// State column family - node manager records and balances
    pub const STATE: &str = "state";
    /// Metadata column family - committed height and similar markers
    pub const METADATA: &str = "metadata";

    /// All column families
    pub const ALL: &[&str] = &[STATE, METADATA];
}

/// Metadata key holding the last committed block height.
const LAST_HEIGHT_KEY: &[u8] = b"last_committed_height";

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database directory
    pub path: String,
    /// Enable compression (LZ4)
    pub enable_compression: bool,
    /// Maximum number of open files
    pub max_open_files: i32,
    /// Write buffer size in bytes
    pub write_buffer_size: usize,
    /// Enable WAL (Write-Ahead Log)
    pub enable_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: String::from("./data/zenith"),
            enable_compression: true,
            max_open_files: 512,
            write_buffer_size: 64 * 1024 * 1024, // 64 MB
            enable_wal: true,
        }
    }
}

fn db_error(e: rocksdb::Error) -> StoreError {
    StoreError::Io(e.to_string())
}

/// RocksDB wrapper implementing [`KvStore`] over the state column family
pub struct RocksStore {
    inner: DBWithThreadMode<MultiThreaded>,
    config: DatabaseConfig,
    /// Lock for coordinating writes
    write_lock: RwLock<()>,
}

impl RocksStore {
    /// Open or create a database at the configured path
    pub fn open(config: DatabaseConfig) -> StoreResult<Self> {
        info!(path = %config.path, "Opening state database");

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_max_open_files(config.max_open_files);
        opts.set_write_buffer_size(config.write_buffer_size);

        if config.enable_compression {
            opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        }

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = cf::ALL
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                if config.enable_compression {
                    cf_opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
                }
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, Path::new(&config.path), cf_descriptors)
            .map_err(db_error)?;

        info!(column_families = cf::ALL.len(), "State database opened");

        Ok(Self {
            inner: db,
            config,
            write_lock: RwLock::new(()),
        })
    }

    /// Open database with default configuration
    pub fn open_default<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let config = DatabaseConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        };
        Self::open(config)
    }

    fn cf_handle(&self, name: &str) -> StoreResult<Arc<BoundColumnFamily<'_>>> {
        self.inner
            .cf_handle(name)
            .ok_or_else(|| StoreError::Internal(format!("column family not found: {name}")))
    }

    fn write_options(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        if self.config.enable_wal {
            write_opts.set_sync(false);
        } else {
            write_opts.disable_wal(true);
        }
        write_opts
    }

    /// Last block height recorded with [`RocksStore::set_last_height`].
    pub fn last_height(&self) -> StoreResult<Option<u64>> {
        let cf = self.cf_handle(cf::METADATA)?;
        let value = self
            .inner
            .get_cf(&cf, LAST_HEIGHT_KEY)
            .map_err(db_error)?;
        match value {
            None => Ok(None),
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Corruption(format!(
                        "last height has {} bytes, expected 8",
                        bytes.len()
                    ))
                })?;
                Ok(Some(u64::from_be_bytes(raw)))
            }
        }
    }

    /// Record the last committed block height.
    pub fn set_last_height(&self, height: u64) -> StoreResult<()> {
        let cf = self.cf_handle(cf::METADATA)?;
        let _guard = self.write_lock.write();
        self.inner
            .put_cf(&cf, LAST_HEIGHT_KEY, height.to_be_bytes())
            .map_err(db_error)
    }

    /// Flush all memtables to disk
    pub fn flush(&self) -> StoreResult<()> {
        for name in cf::ALL {
            let cf = self.cf_handle(name)?;
            self.inner.flush_cf(&cf).map_err(db_error)?;
        }
        Ok(())
    }

    /// Get the path to the database
    pub fn path(&self) -> &str {
        &self.config.path
    }
}

impl KvRead for RocksStore {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        let cf = self.cf_handle(cf::STATE)?;
        self.inner.get_cf(&cf, key).map_err(db_error)
    }
}

impl KvStore for RocksStore {
    fn put(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        let cf = self.cf_handle(cf::STATE)?;
        let _guard = self.write_lock.write();
        self.inner.put_cf(&cf, key, value).map_err(db_error)
    }

    fn delete(&mut self, key: &[u8]) -> StoreResult<()> {
        let cf = self.cf_handle(cf::STATE)?;
        let _guard = self.write_lock.write();
        self.inner.delete_cf(&cf, key).map_err(db_error)
    }

    fn write_batch(&mut self, batch: WriteBatch) -> StoreResult<()> {
        let cf = self.cf_handle(cf::STATE)?;
        let mut native = WriteBatchWithTransaction::<false>::default();
        for op in &batch.operations {
            match op {
                WriteOperation::Put { key, value } => native.put_cf(&cf, key, value),
                WriteOperation::Delete { key } => native.delete_cf(&cf, key),
            }
        }
        trace!(operations = batch.len(), "Writing state batch");

        let _guard = self.write_lock.write();
        self.inner
            .write_opt(native, &self.write_options())
            .map_err(db_error)
    }
}

impl Drop for RocksStore {
    fn drop(&mut self) {
        debug!(path = %self.config.path, "Closing state database");
    }
}
