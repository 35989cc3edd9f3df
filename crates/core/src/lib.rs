//! # Zenith Core - Core Abstractions
//!
//! This crate provides the traits the node manager is written against:
//!
//! - **Store**: [`KvRead`] / [`KvStore`], byte keys and values with `Ok(None)`
//!   for missing keys, plus [`WriteBatch`] for atomic flushes
//! - **Bank**: [`Balances`], read/transfer/mint of the native token
//!
//! # Swappable Components
//!
//! | Component | Trait | Default Impl | Alternatives |
//! |-----------|-------|--------------|--------------|
//! | Storage | `KvStore` | RocksDB | in-memory map |
//! | Balances | `Balances` | balances kept in the state store | host chain ledger |

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod traits;

// Re-export commonly used types
pub use traits::{
    // Bank
    BankError, BankResult, Balances,
    // Store
    KvRead, KvStore, StoreError, StoreResult, WriteBatch, WriteOperation,
};
