//! Governance error types.

use thiserror::Error;
use zenith_core::StoreError;
use zenith_staking::StakingError;

/// Errors returned by governance actions.
#[derive(Debug, Error)]
pub enum GovernanceError {
    /// Quorum gate or node manager failure
    #[error(transparent)]
    Staking(#[from] StakingError),

    /// Underlying store failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Malformed or unrecoverable signature
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// The chain is blacklisted
    #[error("chain {0} is blacklisted")]
    ChainBlacked(u64),

    /// A sync request without root infos
    #[error("no root infos to sync for chain {0}")]
    EmptyRootInfos(u64),
}

impl GovernanceError {
    /// True if the error signals corrupted node manager bookkeeping.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GovernanceError::Staking(err) if err.is_fatal())
    }
}

/// Result type for governance actions.
pub type GovernanceResult<T> = std::result::Result<T, GovernanceError>;
