//! Record kinds of the node manager key space.
//!
//! Every key is `module address ‖ kind ‖ segments`, where segments are
//! 20-byte addresses, 32-byte digests or 8-byte big-endian integers.

pub const GLOBAL_CONFIG: &str = "st_global_config";
pub const VALIDATOR: &str = "st_validator";
pub const VALIDATOR_SEQUENCE: &str = "st_validator_sequence";
pub const SIGNER_ADDR: &str = "st_signer_addr";
pub const PROPOSAL_ADDR: &str = "st_proposal_addr";
pub const ALL_VALIDATOR: &str = "st_all_validator";
pub const LOCK_POOL: &str = "st_lock_pool";
pub const STAKE_INFO: &str = "st_stake_info";
pub const UNLOCK_INFO: &str = "st_unlock_info";
pub const CURRENT_EPOCH: &str = "st_current_epoch";
pub const EPOCH_INFO: &str = "st_epoch_info";
pub const ACCUMULATED_COMMISSION: &str = "st_accumulated_commission";
pub const VALIDATOR_ACCUMULATED_REWARDS: &str = "st_validator_accumulated_rewards";
pub const VALIDATOR_OUTSTANDING_REWARDS: &str = "st_validator_outstanding_rewards";
pub const OUTSTANDING_REWARDS: &str = "st_outstanding_rewards";
pub const VALIDATOR_SNAPSHOT_REWARDS: &str = "st_validator_snapshot_rewards";
pub const STAKE_STARTING_INFO: &str = "st_stake_starting_info";
pub const SIGN: &str = "st_sign";
pub const SIGNER: &str = "st_signer";
pub const COMMUNITY_INFO: &str = "st_community_info";
