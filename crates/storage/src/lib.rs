//! Zenith Storage Layer
//!
//! This crate provides the state store implementations behind the
//! [`zenith_core::KvStore`] trait:
//!
//! - **RocksStore**: durable RocksDB store with `state` and `metadata` column families
//! - **MemoryStore**: ordered in-memory store for simulations and tests
//! - **CacheStore**: write-then-commit overlay giving each operation all-or-nothing semantics
//! - **PrefixStore**: module-scoped key space with bincode-encoded records
//! - **StoreBalances**: native token balances kept in the same state store

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod balances;
pub mod cache;
pub mod db;
pub mod memory;
pub mod prefix;

// Re-exports for convenience
pub use balances::{StoreBalances, BALANCE_PREFIX};
pub use cache::CacheStore;
pub use db::{DatabaseConfig, RocksStore};
pub use memory::MemoryStore;
pub use prefix::{decode, encode, PrefixStore};
pub use zenith_core::{StoreError, StoreResult};
