//! Block reward issuance.

use crate::error::{StakingError, StakingResult};
use crate::params::ModuleParams;
use crate::state::NodeState;
use tracing::trace;
use zenith_core::{Balances, KvStore};
use zenith_types::{Dec, U256, PERCENT_DECIMAL};

/// Issuance of new tokens at the end of each block.
pub struct Economic;

impl Economic {
    /// Total supply after block `height` has been rewarded.
    pub fn total_supply(params: &ModuleParams, height: u64) -> StakingResult<U256> {
        params
            .reward_per_block
            .checked_mul(U256::from(height))
            .and_then(|issued| issued.checked_add(params.genesis_supply))
            .ok_or_else(|| StakingError::InvalidConfig(format!("total supply overflows at height {height}")))
    }

    /// Mint the reward of block `height`.
    ///
    /// The community share is minted to the community address; the rest is
    /// minted to the module account and returned for allocation. Block 0
    /// issues nothing.
    pub fn issue_block_reward<S: KvStore>(state: &mut NodeState<S>, height: u64) -> StakingResult<Dec> {
        let reward = state.params().reward_per_block;
        if height == 0 || reward.is_zero() {
            return Ok(Dec::ZERO);
        }

        let community = state.community_info()?;
        let community_share = reward
            .checked_mul(U256::from(community.community_rate))
            .ok_or_else(|| StakingError::InvalidConfig("block reward too large".into()))?
            / U256::from(PERCENT_DECIMAL);
        let staking_share = reward.saturating_sub(community_share);

        let module = state.module_address();
        let mut balances = state.balances();
        if !community_share.is_zero() {
            balances.mint(&community.community_address, community_share)?;
        }
        if !staking_share.is_zero() {
            balances.mint(&module, staking_share)?;
        }

        trace!(height, %community_share, %staking_share, "Block reward issued");
        Ok(Dec::from_int(staking_share)?)
    }
}
