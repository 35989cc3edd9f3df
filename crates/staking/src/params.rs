//! Construction-time parameters of the node manager module.

use crate::error::{StakingError, StakingResult};
use crate::types::{CommunityInfo, GlobalConfig, QuorumRole};
use zenith_config::{Config, QuorumRule};
use zenith_types::{is_valid_rate, Address, Dec, U256};

/// Parameters fixed when the module is constructed.
///
/// The module address scopes every record key and owns the staked funds.
/// The genesis global config and community info are the read-through defaults
/// used until governance writes the on-chain records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleParams {
    /// Account and key prefix of the module
    pub module_address: Address,
    /// Default global config
    pub genesis_global_config: GlobalConfig,
    /// Default community info
    pub genesis_community: CommunityInfo,
    /// Threshold rule for the signer roster
    pub signer_quorum: QuorumRule,
    /// Threshold rule for the voter roster
    pub voter_quorum: QuorumRule,
    /// Tokens issued per block
    pub reward_per_block: U256,
    /// Supply at height 0
    pub genesis_supply: U256,
}

impl ModuleParams {
    /// Build parameters from a validated node configuration.
    pub fn from_config(config: &Config) -> StakingResult<Self> {
        let staking = &config.staking;
        Ok(Self {
            module_address: config.chain.node_manager_address,
            genesis_global_config: GlobalConfig {
                max_commission_change: staking.max_commission_change,
                min_initial_stake: Dec::from_int(staking.min_initial_stake)?,
                min_proposal_stake: Dec::from_int(staking.min_proposal_stake)?,
                block_per_epoch: staking.blocks_per_epoch,
                consensus_validator_num: staking.consensus_validator_num,
                voter_validator_num: staking.voter_validator_num,
            },
            genesis_community: CommunityInfo {
                community_rate: config.community.rate,
                community_address: config.community.address,
            },
            signer_quorum: config.governance.signer_quorum,
            voter_quorum: config.governance.voter_quorum,
            reward_per_block: config.chain.reward_per_block,
            genesis_supply: config.chain.genesis_supply,
        })
    }

    /// Threshold rule for `role`.
    pub fn quorum_rule(&self, role: QuorumRole) -> QuorumRule {
        match role {
            QuorumRole::Signer => self.signer_quorum,
            QuorumRole::Voter => self.voter_quorum,
        }
    }
}

impl GlobalConfig {
    /// Check the record before it is written.
    pub fn validate(&self) -> StakingResult<()> {
        if !is_valid_rate(self.max_commission_change) {
            return Err(StakingError::RateAboveHundredPercent {
                name: "max_commission_change",
                value: self.max_commission_change,
            });
        }
        if self.min_initial_stake.is_zero() {
            return Err(StakingError::InvalidConfig(
                "min_initial_stake must be positive".into(),
            ));
        }
        if self.block_per_epoch == 0 {
            return Err(StakingError::InvalidConfig(
                "block_per_epoch must be positive".into(),
            ));
        }
        if self.consensus_validator_num == 0
            || self.voter_validator_num == 0
            || self.voter_validator_num > self.consensus_validator_num
        {
            return Err(StakingError::InvalidConfig(format!(
                "need 1 <= voter_validator_num ({}) <= consensus_validator_num ({})",
                self.voter_validator_num, self.consensus_validator_num
            )));
        }
        Ok(())
    }
}

impl CommunityInfo {
    /// Check the record before it is written.
    pub fn validate(&self) -> StakingResult<()> {
        if !is_valid_rate(self.community_rate) {
            return Err(StakingError::RateAboveHundredPercent {
                name: "community_rate",
                value: self.community_rate,
            });
        }
        Ok(())
    }
}
