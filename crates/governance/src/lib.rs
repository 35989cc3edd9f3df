//! Zenith governance actions
//!
//! Consumers of the node manager's [`QuorumSignatureGate`]: each action is
//! applied only when enough members of the current epoch's roster submit it.
//!
//! - [`ChainBlacklist`]: blacklist and whitelist side chains (consensus roster)
//! - [`RootInfoSync`]: store relayed side-chain root infos (voter roster)
//!
//! [`QuorumSignatureGate`]: zenith_staking::QuorumSignatureGate

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod blacklist;
pub mod error;
pub mod info_sync;

pub use blacklist::{ChainBlacklist, METHOD_BLACK_CHAIN, METHOD_WHITE_CHAIN};
pub use error::{GovernanceError, GovernanceResult};
pub use info_sync::{
    address_of, recover_signer, RootInfo, RootInfoSync, SyncOutcome, SyncRootInfoParams,
    METHOD_SYNC_ROOT_INFO,
};
