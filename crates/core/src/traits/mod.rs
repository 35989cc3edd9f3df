//! Core traits for the Zenith node manager.
//!
//! The node manager is written against two capabilities supplied by its
//! environment:
//!
//! - **Store**: a byte-oriented key-value store with a not-found sentinel
//! - **Bank**: native token balances with transfer and mint
//!
//! ```ignore
//! use zenith_core::traits::{Balances, KvStore};
//!
//! fn settle<S: KvStore, B: Balances>(store: &mut S, bank: &mut B) {
//!     // Works with any backend
//! }
//! ```

mod bank;
mod store;

pub use bank::*;
pub use store::*;
