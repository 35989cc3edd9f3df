//! Zenith node manager
//!
//! Validator economics for a proof-of-stake chain, run as deterministic state
//! transitions on every block:
//!
//! - [`StakeLedger`]: delegations, unbonding queues and the total pool
//! - [`ValidatorRegistry`]: validator records and unique signer/proposal identities
//! - [`RewardAccountant`]: F1 lazy reward distribution and the lifecycle hooks
//! - [`EpochController`]: epoch numbering and roster rotation
//! - [`QuorumSignatureGate`]: threshold authorization reused by governance modules
//! - [`Economic`]: block reward issuance
//!
//! [`NodeManager`] ties them together and runs each operation as a
//! transaction over a [`zenith_storage::CacheStore`] overlay.
//!
//! # Example
//!
//! ```rust,ignore
//! use zenith_staking::NodeManager;
//! use zenith_storage::MemoryStore;
//!
//! let mut manager = NodeManager::from_config(MemoryStore::new(), &config)?;
//! manager.init_genesis(&config.genesis.accounts, &config.genesis.validators, 0)?;
//! for height in 1..=100 {
//!     manager.end_block(height)?;
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod economic;
pub mod epoch;
pub mod error;
#[allow(missing_docs)]
pub mod keys;
pub mod ledger;
pub mod manager;
pub mod params;
pub mod quorum;
pub mod registry;
pub mod rewards;
pub mod state;
pub mod types;

pub use economic::Economic;
pub use epoch::EpochController;
pub use error::{StakingError, StakingResult};
pub use ledger::StakeLedger;
pub use manager::{
    BlockOutcome, CreateValidatorParams, NodeManager, UpdateValidatorParams, ValidatorRewards,
};
pub use params::ModuleParams;
pub use quorum::{QuorumOutcome, QuorumSignatureGate, Roster, RosterSource};
pub use registry::ValidatorRegistry;
pub use rewards::RewardAccountant;
pub use state::NodeState;
pub use types::*;
