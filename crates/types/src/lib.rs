//! # Zenith Types
//!
//! Primitive types shared by every Zenith crate:
//! - [`Dec`] - unsigned fixed-point decimal with 18 fractional digits
//! - basis-point rates checked against [`PERCENT_DECIMAL`]
//! - Keccak256 digests and composite store keys
//!
//! Identities and raw integers are the `alloy-primitives` types, re-exported
//! here so downstream crates agree on a single definition.
//!
//! ## Example
//!
//! ```rust
//! use zenith_types::{Dec, PERCENT_DECIMAL};
//!
//! let reward: Dec = "10".parse().unwrap();
//! let stake: Dec = "100".parse().unwrap();
//! assert_eq!(reward.checked_quo(stake).unwrap().to_string(), "0.1");
//!
//! let community = reward.mul_rate(PERCENT_DECIMAL / 2).unwrap();
//! assert_eq!(community.to_string(), "5");
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod dec;
pub mod hash;

pub use alloy_primitives::{address, Address, B256, U256};
pub use dec::{is_valid_rate, Dec, DecError, DEC_PRECISION, PERCENT_DECIMAL};
pub use hash::{concat_key, keccak256, keccak256_concat};

/// Result type alias for decimal arithmetic.
pub type DecResult<T> = std::result::Result<T, DecError>;
