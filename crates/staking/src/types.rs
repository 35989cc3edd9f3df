//! Persistent records of the node manager module.

use serde::{Deserialize, Serialize};
use std::fmt;
use zenith_types::{keccak256_concat, Address, Dec, B256};

/// Maximum number of registered validators.
pub const MAX_VALIDATOR_NUM: usize = 300;

/// Maximum number of pending entries in one staker's unlocking queue.
pub const MAX_UNLOCKING_NUM: usize = 100;

/// Maximum validator description length in bytes.
pub const MAX_DESC_LENGTH: usize = 2_000;

/// Id of the genesis epoch.
pub const START_EPOCH_ID: u64 = 1;

/// Validator lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidatorStatus {
    /// Accepting stake and eligible for the next roster
    Active,
    /// Owner cancelled; leaves the roster at the next rotation
    Unlocking,
    /// Owner withdrew; removed once the last delegator leaves
    Removing,
}

impl ValidatorStatus {
    /// Lowercase name used in errors and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidatorStatus::Active => "active",
            ValidatorStatus::Unlocking => "unlocking",
            ValidatorStatus::Removing => "removing",
        }
    }
}

/// Commission settings of a validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commission {
    /// Rate in basis points
    pub rate: u16,
    /// Epoch of the last rate change
    pub updated_epoch: u64,
}

/// A registered validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    /// Consensus identity; primary key
    pub consensus_address: Address,
    /// Owner (stake) account
    pub owner: Address,
    /// Signer identity for quorum-gated actions
    pub signer_address: Address,
    /// Proposal identity
    pub proposal_address: Address,
    /// Commission settings
    pub commission: Commission,
    /// Lifecycle status
    pub status: ValidatorStatus,
    /// Total delegated stake, self stake included
    pub total_stake: Dec,
    /// Stake delegated by the owner
    pub self_stake: Dec,
    /// Registration sequence number, unique across the module's lifetime
    pub sequence: u64,
    /// Free-form description
    pub desc: String,
}

impl Validator {
    /// True while the validator accepts stake.
    pub fn is_active(&self) -> bool {
        self.status == ValidatorStatus::Active
    }

    /// Roster entry for this validator.
    pub fn peer(&self) -> Peer {
        Peer {
            consensus_address: self.consensus_address,
            signer_address: self.signer_address,
        }
    }
}

/// Delegation of one staker to one validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeInfo {
    /// Delegator
    pub staker: Address,
    /// Validator consensus address
    pub consensus_address: Address,
    /// Delegated amount
    pub amount: Dec,
}

/// One pending withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockingStake {
    /// Height at which the withdrawal was requested
    pub height: u64,
    /// Height from which the amount can be released
    pub complete_height: u64,
    /// Amount
    pub amount: Dec,
}

/// Ordered unlocking queue of one staker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockingInfo {
    /// Staker
    pub staker: Address,
    /// Pending withdrawals in request order
    pub unlocking_stake: Vec<UnlockingStake>,
}

/// Roster entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peer {
    /// Consensus identity
    pub consensus_address: Address,
    /// Signer identity
    pub signer_address: Address,
}

/// Validator rosters of one epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochInfo {
    /// Epoch id, starting at 1
    pub id: u64,
    /// Consensus roster, highest stake first
    pub validators: Vec<Peer>,
    /// Voter roster, a prefix of the consensus roster
    pub voters: Vec<Peer>,
    /// Height at which the epoch started
    pub start_height: u64,
}

impl EpochInfo {
    /// Signer identities of the roster for `role`.
    pub fn signers(&self, role: QuorumRole) -> Vec<Address> {
        let peers = match role {
            QuorumRole::Signer => &self.validators,
            QuorumRole::Voter => &self.voters,
        };
        peers.iter().map(|p| p.signer_address).collect()
    }

    /// Consensus identities of the consensus roster.
    pub fn consensus_addresses(&self) -> Vec<Address> {
        self.validators.iter().map(|p| p.consensus_address).collect()
    }

    /// True if the consensus roster contains `consensus`.
    pub fn contains(&self, consensus: &Address) -> bool {
        self.validators
            .iter()
            .any(|p| &p.consensus_address == consensus)
    }
}

/// Commission accrued by a validator and not yet withdrawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulatedCommission {
    /// Amount
    pub amount: Dec,
}

/// Delegator rewards accrued in the validator's current period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorAccumulatedRewards {
    /// Rewards not yet folded into a snapshot
    pub rewards: Dec,
    /// Current period; the latest snapshot is at `period - 1`
    pub period: u64,
}

/// Everything owed by a validator: delegator rewards plus commission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorOutstandingRewards {
    /// Amount
    pub rewards: Dec,
}

/// Sum of all validators' outstanding rewards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingRewards {
    /// Amount
    pub rewards: Dec,
}

/// Cumulative reward ratio of a validator at the end of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSnapshotRewards {
    /// Reward per unit of stake accumulated since period 0
    pub accumulated_rewards_ratio: Dec,
    /// Holders of this snapshot, in {0, 1, 2}
    pub reference_count: u8,
}

/// Anchor of a delegation in the validator's snapshot chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeStartingInfo {
    /// Period whose snapshot the delegation is anchored to
    pub start_period: u64,
    /// Stake at anchoring time
    pub stake: Dec,
    /// Height at anchoring time
    pub height: u64,
    /// Sequence number of the validator registration anchored to
    pub validator_sequence: u64,
}

/// On-chain global configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Maximum commission change per epoch, basis points
    pub max_commission_change: u16,
    /// Minimum stake to create a validator
    pub min_initial_stake: Dec,
    /// Minimum self stake to submit proposals.
    ///
    /// Read by the proposal module; the node manager only stores it.
    pub min_proposal_stake: Dec,
    /// Epoch length in blocks
    pub block_per_epoch: u64,
    /// Consensus roster size
    pub consensus_validator_num: u64,
    /// Voter roster size
    pub voter_validator_num: u64,
}

/// Community pool settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityInfo {
    /// Share of block rewards sent to the pool, basis points
    pub community_rate: u16,
    /// Pool account
    pub community_address: Address,
}

/// Action awaiting quorum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusSign {
    /// Action identifier
    pub method: String,
    /// Canonical action parameters
    pub input: Vec<u8>,
}

impl ConsensusSign {
    /// Digest identifying this action: keccak256(len(method) ‖ method ‖ input).
    pub fn hash(&self) -> B256 {
        let len = (self.method.len() as u64).to_be_bytes();
        keccak256_concat(&[&len, self.method.as_bytes(), &self.input])
    }
}

/// Distinct signers collected for one digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerList {
    /// Signers in arrival order
    pub signers: Vec<Address>,
}

/// Roster role a quorum-gated action is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuorumRole {
    /// Consensus roster signer identities
    Signer,
    /// Voter roster signer identities
    Voter,
}

impl fmt::Display for QuorumRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuorumRole::Signer => write!(f, "signer"),
            QuorumRole::Voter => write!(f, "voter"),
        }
    }
}
