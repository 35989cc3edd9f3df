//! Delegations, unlocking queues and the total pool.

use crate::error::{StakingError, StakingResult};
use crate::state::NodeState;
use crate::types::{StakeInfo, UnlockingStake, Validator, MAX_UNLOCKING_NUM};
use tracing::debug;
use zenith_core::KvStore;
use zenith_types::{Address, Dec};

/// Stake bookkeeping.
///
/// Every change to a delegation moves the validator totals and the total pool
/// by the same amount in the same transition.
pub struct StakeLedger;

impl StakeLedger {
    /// Add `amount` to the delegation of `staker` to `validator`.
    ///
    /// Updates and writes `validator`; returns the resulting delegation.
    pub fn deposit<S: KvStore>(
        state: &mut NodeState<S>,
        staker: &Address,
        validator: &mut Validator,
        amount: Dec,
    ) -> StakingResult<StakeInfo> {
        let consensus = validator.consensus_address;
        let mut info = state.stake_info(staker, &consensus)?.unwrap_or(StakeInfo {
            staker: *staker,
            consensus_address: consensus,
            amount: Dec::ZERO,
        });
        info.amount = info.amount.checked_add(amount)?;

        validator.total_stake = validator.total_stake.checked_add(amount)?;
        if staker == &validator.owner {
            validator.self_stake = validator.self_stake.checked_add(amount)?;
        }

        let pool = state.total_pool()?.checked_add(amount)?;
        state.put_stake_info(&info)?;
        state.put_validator(validator)?;
        state.put_total_pool(pool)?;

        debug!(%staker, validator = %consensus, %amount, total = %validator.total_stake, "Stake deposited");
        Ok(info)
    }

    /// Remove `amount` from the delegation and queue it for release at
    /// `height + unlock_delay`.
    ///
    /// The delegation record is deleted when it reaches zero; the returned
    /// value then carries a zero amount.
    pub fn withdraw<S: KvStore>(
        state: &mut NodeState<S>,
        staker: &Address,
        validator: &mut Validator,
        amount: Dec,
        height: u64,
        unlock_delay: u64,
    ) -> StakingResult<StakeInfo> {
        let consensus = validator.consensus_address;
        let mut info = state.stake_info(staker, &consensus)?.unwrap_or(StakeInfo {
            staker: *staker,
            consensus_address: consensus,
            amount: Dec::ZERO,
        });
        if info.amount < amount {
            return Err(StakingError::InsufficientDelegation {
                staker: *staker,
                validator: consensus,
                available: info.amount,
                requested: amount,
            });
        }
        info.amount = info.amount.checked_sub(amount)?;

        validator.total_stake = validator.total_stake.checked_sub(amount)?;
        if staker == &validator.owner {
            validator.self_stake = validator.self_stake.checked_sub(amount)?;
        }

        let pool = state.total_pool()?.checked_sub(amount)?;
        if info.amount.is_zero() {
            state.delete_stake_info(staker, &consensus)?;
        } else {
            state.put_stake_info(&info)?;
        }
        state.put_validator(validator)?;
        state.put_total_pool(pool)?;

        let complete_height = height.checked_add(unlock_delay).ok_or_else(|| {
            StakingError::InvalidConfig(format!("unlock height overflows at {height}"))
        })?;
        Self::enqueue_unlocking(
            state,
            staker,
            UnlockingStake {
                height,
                complete_height,
                amount,
            },
        )?;

        debug!(%staker, validator = %consensus, %amount, complete_height, "Stake unlocking");
        Ok(info)
    }

    /// Append an entry to the unlocking queue of `staker`.
    pub fn enqueue_unlocking<S: KvStore>(
        state: &mut NodeState<S>,
        staker: &Address,
        entry: UnlockingStake,
    ) -> StakingResult<()> {
        let mut queue = state.unlocking_info(staker)?;
        if queue.unlocking_stake.len() >= MAX_UNLOCKING_NUM {
            return Err(StakingError::UnlockingQueueFull {
                staker: *staker,
                max: MAX_UNLOCKING_NUM,
            });
        }
        queue.unlocking_stake.push(entry);
        state.put_unlocking_info(&queue)
    }

    /// Drop every entry of the queue with `complete_height <= height` and
    /// return their sum.
    ///
    /// Remaining entries keep their order. The queue record is deleted once
    /// empty.
    pub fn sweep_matured<S: KvStore>(
        state: &mut NodeState<S>,
        staker: &Address,
        height: u64,
    ) -> StakingResult<Dec> {
        let mut queue = state.unlocking_info(staker)?;
        let mut matured = Dec::ZERO;
        let mut kept = 0;
        for i in 0..queue.unlocking_stake.len() {
            let entry = queue.unlocking_stake[i];
            if entry.complete_height > height {
                queue.unlocking_stake[kept] = entry;
                kept += 1;
            } else {
                matured = matured.checked_add(entry.amount)?;
            }
        }
        queue.unlocking_stake.truncate(kept);

        if queue.unlocking_stake.is_empty() {
            state.delete_unlocking_info(staker)?;
        } else {
            state.put_unlocking_info(&queue)?;
        }
        Ok(matured)
    }
}
