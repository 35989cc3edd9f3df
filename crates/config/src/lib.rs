//! # Zenith Configuration
//!
//! This crate provides configuration parsing and genesis handling for the
//! Zenith node manager.
//!
//! All settings are defined in one `zenith.toml` file.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zenith_config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Path::new("zenith.toml"))?;
//!
//! println!("Chain ID: {}", config.chain.chain_id);
//! println!("Epoch length: {} blocks", config.staking.blocks_per_epoch);
//! ```
//!
//! ## Configuration Sections
//!
//! - `[chain]` - Chain identity, module addresses, genesis supply and block reward
//! - `[staking]` - Genesis defaults of the on-chain global configuration
//! - `[community]` - Community pool rate and address
//! - `[governance]` - Quorum rules for the signer and voter rosters
//! - `[storage]` - Data directory
//! - `[logging]` - Log level and format
//! - `[[genesis.accounts]]` - Initial account balances
//! - `[[genesis.validators]]` - Initial validator set

mod config;
mod error;
mod genesis;

pub use config::*;
pub use error::*;
pub use genesis::*;

/// Re-export alloy primitives for convenience
pub use alloy_primitives::{Address, U256};
