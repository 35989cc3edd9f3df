//! Node manager error types.

use crate::types::QuorumRole;
use thiserror::Error;
use zenith_core::{BankError, StoreError};
use zenith_types::{Address, Dec, DecError};

/// Errors returned by node manager operations.
///
/// Every error aborts the enclosing state transition. [`StakingError::Invariant`]
/// additionally signals corrupted bookkeeping: the block processor must stop
/// rather than skip the offending transaction (see [`StakingError::is_fatal`]).
#[derive(Debug, Error)]
pub enum StakingError {
    /// Underlying store failure, including record decode errors
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Decimal arithmetic failure
    #[error("arithmetic error: {0}")]
    Decimal(#[from] DecError),

    /// Balance transfer failure
    #[error("balance error: {0}")]
    Bank(#[from] BankError),

    /// No validator with this consensus address
    #[error("validator not found: {0}")]
    ValidatorNotFound(Address),

    /// A validator with this consensus address already exists
    #[error("validator already exists: {0}")]
    ValidatorAlreadyExists(Address),

    /// Signer address reserved by another validator
    #[error("signer address already in use: {0}")]
    SignerAlreadyExists(Address),

    /// Proposal address reserved by another validator
    #[error("proposal address already in use: {0}")]
    ProposalAlreadyExists(Address),

    /// The validator list is full
    #[error("validator count would exceed maximum {max}")]
    TooManyValidators {
        /// Maximum number of registered validators
        max: usize,
    },

    /// A staker's unlocking queue is full
    #[error("unlocking queue of {staker} would exceed maximum {max}")]
    UnlockingQueueFull {
        /// Staker whose queue is full
        staker: Address,
        /// Maximum queue length
        max: usize,
    },

    /// A basis-point value above 100%
    #[error("{name} of {value} basis points exceeds 100%")]
    RateAboveHundredPercent {
        /// Which rate was rejected
        name: &'static str,
        /// The rejected value
        value: u16,
    },

    /// Commission change larger than the configured cap
    #[error("commission change from {from} to {to} exceeds maximum change {max}")]
    CommissionChangeTooLarge {
        /// Current rate
        from: u16,
        /// Requested rate
        to: u16,
        /// Maximum change per epoch
        max: u16,
    },

    /// Commission already changed during this epoch
    #[error("commission already updated in epoch {0}")]
    CommissionUpdatedThisEpoch(u64),

    /// Stake amount below the required minimum
    #[error("stake {provided} below minimum {required}")]
    InsufficientStake {
        /// Minimum accepted
        required: Dec,
        /// Amount provided
        provided: Dec,
    },

    /// Withdrawal larger than the delegation
    #[error("delegation of {staker} to {validator} is {available}, cannot withdraw {requested}")]
    InsufficientDelegation {
        /// Delegator
        staker: Address,
        /// Validator consensus address
        validator: Address,
        /// Current delegation
        available: Dec,
        /// Requested withdrawal
        requested: Dec,
    },

    /// Zero amounts are not meaningful for this operation
    #[error("amount must be positive")]
    ZeroAmount,

    /// Validator is not accepting stake
    #[error("validator {0} is not active")]
    ValidatorNotActive(Address),

    /// Validator is not in the state the operation expects
    #[error("validator {validator} must be {expected} for this operation")]
    UnexpectedValidatorStatus {
        /// Validator consensus address
        validator: Address,
        /// Required status
        expected: &'static str,
    },

    /// Caller does not own the validator
    #[error("caller {caller} is not the owner of validator {validator}")]
    NotValidatorOwner {
        /// Caller
        caller: Address,
        /// Validator consensus address
        validator: Address,
    },

    /// Validator still sits in the current epoch roster
    #[error("validator {0} is still in the current epoch roster")]
    ValidatorInRoster(Address),

    /// Description too long
    #[error("description length {len} exceeds maximum {max}")]
    DescriptionTooLong {
        /// Actual length
        len: usize,
        /// Maximum length
        max: usize,
    },

    /// Signer outside the roster for the requested role
    #[error("{signer} is not in the {role} roster of epoch {epoch}")]
    IneligibleSigner {
        /// Rejected signer
        signer: Address,
        /// Role checked
        role: QuorumRole,
        /// Epoch whose roster was consulted
        epoch: u64,
    },

    /// Epoch record missing
    #[error("epoch {0} not found")]
    EpochNotFound(u64),

    /// Genesis already applied
    #[error("genesis already initialized at epoch {0}")]
    GenesisAlreadyInitialized(u64),

    /// Global configuration rejected at the write boundary
    #[error("invalid global config: {0}")]
    InvalidConfig(String),

    /// A record that must exist is missing
    #[error("missing {kind} record for {owner}")]
    MissingRecord {
        /// Record kind
        kind: &'static str,
        /// Address the record belongs to
        owner: Address,
    },

    /// Internal bookkeeping corrupted; the chain must halt
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

impl StakingError {
    /// True for errors that indicate corrupted state rather than a bad request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StakingError::Invariant(_))
    }
}

/// Result type for node manager operations.
pub type StakingResult<T> = Result<T, StakingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invariant_is_fatal() {
        assert!(StakingError::Invariant("ref count".into()).is_fatal());
        assert!(!StakingError::ZeroAmount.is_fatal());
        assert!(!StakingError::Decimal(DecError::Underflow).is_fatal());
    }

    #[test]
    fn test_error_messages() {
        let err = StakingError::RateAboveHundredPercent {
            name: "commission",
            value: 10_100,
        };
        assert_eq!(
            err.to_string(),
            "commission of 10100 basis points exceeds 100%"
        );
    }
}
