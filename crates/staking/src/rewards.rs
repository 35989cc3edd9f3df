//! F1 lazy reward distribution.
//!
//! Block rewards are credited to a validator in O(1): the commission share
//! goes to its [`AccumulatedCommission`], the rest to the current-period
//! rewards in [`ValidatorAccumulatedRewards`]. Delegators are never touched
//! at allocation time.
//!
//! Whenever stake on a validator changes, the current period is closed: its
//! rewards divided by the validator's total stake are added to the cumulative
//! ratio of the previous snapshot and stored as the snapshot of the closed
//! period. A delegation remembers the period it was anchored at, so what it is
//! owed is `(ratio(end) - ratio(start)) * stake`.
//!
//! Snapshots are reference counted. The latest closed snapshot is held by the
//! validator itself; every starting info holds the snapshot it is anchored to.
//! A snapshot therefore has at most two holders and is deleted when the last
//! one releases it.
//!
//! Only integer token amounts are ever transferred. Fractional remainders stay
//! in the validator's outstanding rewards and are swept to the community pool
//! when the validator is removed.

use crate::error::{StakingError, StakingResult};
use crate::state::NodeState;
use crate::types::{
    AccumulatedCommission, StakeStartingInfo, Validator, ValidatorAccumulatedRewards,
    ValidatorOutstandingRewards, ValidatorSnapshotRewards,
};
use tracing::{debug, info, warn};
use zenith_core::{KvRead, KvStore};
use zenith_types::{Address, Dec, U256};

const MAX_REFERENCE_COUNT: u8 = 2;

/// Reward bookkeeping and the lifecycle hooks that drive it.
pub struct RewardAccountant;

impl RewardAccountant {
    // =========================================================================
    // Lifecycle hooks
    // =========================================================================

    /// Seed the reward records of a new validator.
    ///
    /// Snapshot 0 is held by the validator; the first period is 1.
    pub fn after_validator_created<S: KvStore>(
        state: &mut NodeState<S>,
        consensus: &Address,
    ) -> StakingResult<()> {
        state.put_snapshot(
            consensus,
            0,
            &ValidatorSnapshotRewards {
                accumulated_rewards_ratio: Dec::ZERO,
                reference_count: 1,
            },
        )?;
        state.put_accumulated_rewards(
            consensus,
            &ValidatorAccumulatedRewards {
                rewards: Dec::ZERO,
                period: 1,
            },
        )?;
        state.put_accumulated_commission(consensus, &AccumulatedCommission::default())?;
        state.put_validator_outstanding(consensus, &ValidatorOutstandingRewards::default())
    }

    /// Sweep what the validator still owes to the community pool and delete
    /// all of its reward records.
    ///
    /// Identity reservations belong to the registry and are released by
    /// [`ValidatorRegistry::deregister`](crate::registry::ValidatorRegistry::deregister).
    ///
    /// Undrawn commission is part of the outstanding rewards, so callers that
    /// want to pay it to the owner must do so first.
    pub fn after_validator_removed<S: KvStore>(
        state: &mut NodeState<S>,
        validator: &Validator,
    ) -> StakingResult<()> {
        let consensus = validator.consensus_address;
        let outstanding = state
            .validator_outstanding(&consensus)?
            .unwrap_or_default()
            .rewards;

        if !outstanding.is_zero() {
            let mut global = state.outstanding_rewards()?;
            global.rewards = global.rewards.checked_sub(outstanding)?;
            state.put_outstanding_rewards(&global)?;

            let community = state.community_info()?.community_address;
            state.pay_from_module(&community, outstanding.truncate())?;
        }

        state.delete_validator_outstanding(&consensus)?;
        state.delete_accumulated_commission(&consensus)?;

        let accumulated = Self::require_accumulated(state, &consensus)?;
        state.delete_accumulated_rewards(&consensus)?;
        if let Some(last) = accumulated.period.checked_sub(1) {
            state.delete_snapshot(&consensus, last)?;
        }

        info!(validator = %consensus, swept = %outstanding, "Validator reward records removed");
        Ok(())
    }

    /// Close the current period before the first delegation of a staker.
    pub fn before_stake_created<S: KvStore>(
        state: &mut NodeState<S>,
        validator: &Validator,
    ) -> StakingResult<u64> {
        Self::increment_period(state, validator)
    }

    /// Settle the rewards of an existing delegation before it changes.
    ///
    /// Closes the current period, pays what the delegation earned since its
    /// anchor, releases the anchor snapshot and deletes the starting info.
    /// Returns the amount paid.
    pub fn before_stake_modified<S: KvStore>(
        state: &mut NodeState<S>,
        validator: &Validator,
        staker: &Address,
    ) -> StakingResult<Dec> {
        let consensus = validator.consensus_address;
        let starting = state
            .starting_info(staker, &consensus)?
            .ok_or(StakingError::MissingRecord {
                kind: "stake starting info",
                owner: *staker,
            })?;

        let ended = Self::increment_period(state, validator)?;
        let owed = Self::owed_between(state, &consensus, &starting, ended)?;
        let paid = owed.floor();

        if !paid.is_zero() {
            let mut outstanding = state
                .validator_outstanding(&consensus)?
                .unwrap_or_default();
            outstanding.rewards = outstanding.rewards.checked_sub(paid)?;
            state.put_validator_outstanding(&consensus, &outstanding)?;

            let mut global = state.outstanding_rewards()?;
            global.rewards = global.rewards.checked_sub(paid)?;
            state.put_outstanding_rewards(&global)?;

            state.pay_from_module(staker, paid.truncate())?;
        }

        Self::decrease_reference_count(state, &consensus, starting.start_period)?;
        state.delete_starting_info(staker, &consensus)?;

        debug!(%staker, validator = %consensus, %paid, from = starting.start_period, to = ended, "Stake rewards settled");
        Ok(paid)
    }

    /// Anchor a delegation of `stake` at the validator's latest snapshot.
    pub fn after_stake_modified<S: KvStore>(
        state: &mut NodeState<S>,
        validator: &Validator,
        staker: &Address,
        stake: Dec,
        height: u64,
    ) -> StakingResult<()> {
        let consensus = validator.consensus_address;
        let accumulated = Self::require_accumulated(state, &consensus)?;
        let previous = Self::last_closed(&accumulated, &consensus)?;

        Self::increase_reference_count(state, &consensus, previous)?;
        state.put_starting_info(
            staker,
            &consensus,
            &StakeStartingInfo {
                start_period: previous,
                stake,
                height,
                validator_sequence: validator.sequence,
            },
        )
    }

    /// The starting info of `staker` on `validator`, if it belongs to the
    /// validator's current registration.
    ///
    /// A validator that is removed and registered again under the same
    /// consensus address starts a new snapshot chain; anchors into the old
    /// chain are stale.
    pub fn live_anchor<S: KvRead>(
        state: &NodeState<S>,
        validator: &Validator,
        staker: &Address,
    ) -> StakingResult<Option<StakeStartingInfo>> {
        Ok(state
            .starting_info(staker, &validator.consensus_address)?
            .filter(|info| info.validator_sequence == validator.sequence))
    }

    // =========================================================================
    // Periods
    // =========================================================================

    /// Close the validator's current period and return its number.
    ///
    /// With zero total stake there is nobody to credit, so the period's
    /// rewards go to the community pool and the ratio does not move.
    pub fn increment_period<S: KvStore>(
        state: &mut NodeState<S>,
        validator: &Validator,
    ) -> StakingResult<u64> {
        let consensus = validator.consensus_address;
        let accumulated = Self::require_accumulated(state, &consensus)?;
        let period = accumulated.period;

        let increment = if validator.total_stake.is_zero() {
            let swept = accumulated.rewards.floor();
            if !swept.is_zero() {
                let mut outstanding = state
                    .validator_outstanding(&consensus)?
                    .unwrap_or_default();
                outstanding.rewards = outstanding.rewards.checked_sub(swept)?;
                state.put_validator_outstanding(&consensus, &outstanding)?;

                let mut global = state.outstanding_rewards()?;
                global.rewards = global.rewards.checked_sub(swept)?;
                state.put_outstanding_rewards(&global)?;

                let community = state.community_info()?.community_address;
                state.pay_from_module(&community, swept.truncate())?;
                debug!(validator = %consensus, period, %swept, "Period without stake swept to community");
            }
            Dec::ZERO
        } else {
            accumulated.rewards.checked_quo(validator.total_stake)?
        };

        let previous = Self::last_closed(&accumulated, &consensus)?;
        let prior = Self::require_snapshot(state, &consensus, previous)?;
        Self::decrease_reference_count(state, &consensus, previous)?;

        state.put_snapshot(
            &consensus,
            period,
            &ValidatorSnapshotRewards {
                accumulated_rewards_ratio: prior.accumulated_rewards_ratio.checked_add(increment)?,
                reference_count: 1,
            },
        )?;
        let next = period
            .checked_add(1)
            .ok_or_else(|| StakingError::Invariant(format!("period overflow on {consensus}")))?;
        state.put_accumulated_rewards(
            &consensus,
            &ValidatorAccumulatedRewards {
                rewards: Dec::ZERO,
                period: next,
            },
        )?;

        Ok(period)
    }

    // =========================================================================
    // Allocation and withdrawal
    // =========================================================================

    /// Split `amount` over `roster` pro rata to total stake.
    ///
    /// The module account must already hold `amount`. If the roster carries
    /// no stake the whole amount goes to the community pool.
    pub fn allocate_block_rewards<S: KvStore>(
        state: &mut NodeState<S>,
        roster: &[Address],
        amount: Dec,
    ) -> StakingResult<()> {
        if amount.is_zero() {
            return Ok(());
        }

        let mut validators = Vec::with_capacity(roster.len());
        let mut total = Dec::ZERO;
        for consensus in roster {
            match state.validator(consensus)? {
                Some(v) => {
                    total = total.checked_add(v.total_stake)?;
                    validators.push(v);
                }
                None => warn!(validator = %consensus, "Roster member no longer registered, skipped"),
            }
        }

        if total.is_zero() {
            let community = state.community_info()?.community_address;
            state.pay_from_module(&community, amount.truncate())?;
            debug!(%amount, "No stake in roster, block reward sent to community");
            return Ok(());
        }

        // The last validator takes the rounding remainder so the shares sum to `amount`
        let mut remaining = amount;
        for (i, validator) in validators.iter().enumerate() {
            let share = if i + 1 == validators.len() {
                remaining
            } else {
                amount.checked_mul_div(validator.total_stake, total)?
            };
            remaining = remaining.checked_sub(share)?;
            Self::allocate_to_validator(state, validator, share)?;
        }
        debug!(%amount, validators = validators.len(), "Block rewards allocated");
        Ok(())
    }

    /// Credit `share` to one validator, splitting off its commission.
    pub fn allocate_to_validator<S: KvStore>(
        state: &mut NodeState<S>,
        validator: &Validator,
        share: Dec,
    ) -> StakingResult<()> {
        let consensus = validator.consensus_address;
        let commission = share.mul_rate(validator.commission.rate)?;
        let delegated = share.checked_sub(commission)?;

        let mut accumulated_commission = state
            .accumulated_commission(&consensus)?
            .ok_or(StakingError::MissingRecord {
                kind: "accumulated commission",
                owner: consensus,
            })?;
        accumulated_commission.amount = accumulated_commission.amount.checked_add(commission)?;
        state.put_accumulated_commission(&consensus, &accumulated_commission)?;

        let mut accumulated = Self::require_accumulated(state, &consensus)?;
        accumulated.rewards = accumulated.rewards.checked_add(delegated)?;
        state.put_accumulated_rewards(&consensus, &accumulated)?;

        let mut outstanding = state
            .validator_outstanding(&consensus)?
            .unwrap_or_default();
        outstanding.rewards = outstanding.rewards.checked_add(share)?;
        state.put_validator_outstanding(&consensus, &outstanding)?;

        let mut global = state.outstanding_rewards()?;
        global.rewards = global.rewards.checked_add(share)?;
        state.put_outstanding_rewards(&global)
    }

    /// Pay the integer part of the validator's commission to its owner.
    pub fn withdraw_commission<S: KvStore>(
        state: &mut NodeState<S>,
        validator: &Validator,
    ) -> StakingResult<U256> {
        let consensus = validator.consensus_address;
        let mut commission = state
            .accumulated_commission(&consensus)?
            .ok_or(StakingError::MissingRecord {
                kind: "accumulated commission",
                owner: consensus,
            })?;
        let paid = commission.amount.floor();
        if paid.is_zero() {
            return Ok(U256::ZERO);
        }

        commission.amount = commission.amount.checked_sub(paid)?;
        state.put_accumulated_commission(&consensus, &commission)?;

        let mut outstanding = state
            .validator_outstanding(&consensus)?
            .unwrap_or_default();
        outstanding.rewards = outstanding.rewards.checked_sub(paid)?;
        state.put_validator_outstanding(&consensus, &outstanding)?;

        let mut global = state.outstanding_rewards()?;
        global.rewards = global.rewards.checked_sub(paid)?;
        state.put_outstanding_rewards(&global)?;

        let amount = paid.truncate();
        state.pay_from_module(&validator.owner, amount)?;
        info!(validator = %consensus, owner = %validator.owner, %amount, "Commission withdrawn");
        Ok(amount)
    }

    /// Rewards `staker` would receive from `validator` if settled now.
    ///
    /// Includes the current, not yet closed, period. Read-only.
    pub fn pending_stake_rewards<S: KvRead>(
        state: &NodeState<S>,
        validator: &Validator,
        staker: &Address,
    ) -> StakingResult<Dec> {
        let Some(starting) = Self::live_anchor(state, validator, staker)? else {
            return Ok(Dec::ZERO);
        };
        let consensus = validator.consensus_address;
        let accumulated = Self::require_accumulated(state, &consensus)?;
        let latest = Self::require_snapshot(state, &consensus, Self::last_closed(&accumulated, &consensus)?)?;

        let mut ratio = latest.accumulated_rewards_ratio;
        if !validator.total_stake.is_zero() {
            ratio = ratio.checked_add(accumulated.rewards.checked_quo(validator.total_stake)?)?;
        }
        let start = Self::require_snapshot(state, &consensus, starting.start_period)?;
        Ok(ratio
            .checked_sub(start.accumulated_rewards_ratio)?
            .checked_mul(starting.stake)?
            .floor())
    }

    // =========================================================================
    // Snapshot references
    // =========================================================================

    /// Take a reference on the snapshot of `consensus` at `period`.
    pub fn increase_reference_count<S: KvStore>(
        state: &mut NodeState<S>,
        consensus: &Address,
        period: u64,
    ) -> StakingResult<()> {
        let mut snapshot = Self::require_snapshot(state, consensus, period)?;
        if snapshot.reference_count >= MAX_REFERENCE_COUNT {
            return Err(StakingError::Invariant(format!(
                "reference count of snapshot {period} of {consensus} would exceed {MAX_REFERENCE_COUNT}"
            )));
        }
        snapshot.reference_count += 1;
        state.put_snapshot(consensus, period, &snapshot)
    }

    /// Release a reference on the snapshot of `consensus` at `period`,
    /// deleting it when no holder is left.
    pub fn decrease_reference_count<S: KvStore>(
        state: &mut NodeState<S>,
        consensus: &Address,
        period: u64,
    ) -> StakingResult<()> {
        let mut snapshot = Self::require_snapshot(state, consensus, period)?;
        if snapshot.reference_count == 0 {
            return Err(StakingError::Invariant(format!(
                "reference count of snapshot {period} of {consensus} is already zero"
            )));
        }
        snapshot.reference_count -= 1;
        if snapshot.reference_count == 0 {
            state.delete_snapshot(consensus, period)
        } else {
            state.put_snapshot(consensus, period, &snapshot)
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn owed_between<S: KvRead>(
        state: &NodeState<S>,
        consensus: &Address,
        starting: &StakeStartingInfo,
        ended: u64,
    ) -> StakingResult<Dec> {
        if starting.start_period > ended {
            return Err(StakingError::Invariant(format!(
                "starting period {} after ending period {ended} on {consensus}",
                starting.start_period
            )));
        }
        let start = Self::require_snapshot(state, consensus, starting.start_period)?;
        let end = Self::require_snapshot(state, consensus, ended)?;
        let difference = end
            .accumulated_rewards_ratio
            .checked_sub(start.accumulated_rewards_ratio)
            .map_err(|_| {
                StakingError::Invariant(format!("reward ratio decreased on {consensus}"))
            })?;
        Ok(difference.checked_mul(starting.stake)?)
    }

    fn last_closed(accumulated: &ValidatorAccumulatedRewards, consensus: &Address) -> StakingResult<u64> {
        accumulated
            .period
            .checked_sub(1)
            .ok_or_else(|| StakingError::Invariant(format!("period 0 is not a valid current period on {consensus}")))
    }

    fn require_accumulated<S: KvRead>(
        state: &NodeState<S>,
        consensus: &Address,
    ) -> StakingResult<ValidatorAccumulatedRewards> {
        state
            .accumulated_rewards(consensus)?
            .ok_or(StakingError::MissingRecord {
                kind: "validator accumulated rewards",
                owner: *consensus,
            })
    }

    fn require_snapshot<S: KvRead>(
        state: &NodeState<S>,
        consensus: &Address,
        period: u64,
    ) -> StakingResult<ValidatorSnapshotRewards> {
        state
            .snapshot(consensus, period)?
            .ok_or(StakingError::MissingRecord {
                kind: "validator snapshot rewards",
                owner: *consensus,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ModuleParams;
    use crate::types::{Commission, ValidatorStatus};
    use std::sync::Arc;
    use zenith_config::Config;
    use zenith_core::Balances;
    use zenith_storage::MemoryStore;

    fn state() -> NodeState<MemoryStore> {
        let params = ModuleParams::from_config(&Config::default()).unwrap();
        NodeState::new(MemoryStore::new(), Arc::new(params))
    }

    fn validator(rate: u16) -> Validator {
        Validator {
            consensus_address: Address::repeat_byte(1),
            owner: Address::repeat_byte(2),
            signer_address: Address::repeat_byte(3),
            proposal_address: Address::repeat_byte(4),
            commission: Commission {
                rate,
                updated_epoch: 1,
            },
            status: ValidatorStatus::Active,
            total_stake: Dec::ZERO,
            self_stake: Dec::ZERO,
            sequence: 1,
            desc: String::new(),
        }
    }

    fn fund_module(state: &mut NodeState<MemoryStore>, amount: u64) {
        let module = state.module_address();
        state.balances().mint(&module, U256::from(amount)).unwrap();
    }

    #[test]
    fn test_creation_seeds_records() {
        let mut state = state();
        let v = validator(0);
        RewardAccountant::after_validator_created(&mut state, &v.consensus_address).unwrap();

        let snap = state.snapshot(&v.consensus_address, 0).unwrap().unwrap();
        assert_eq!(snap.reference_count, 1);
        assert_eq!(
            state.accumulated_rewards(&v.consensus_address).unwrap().unwrap().period,
            1
        );
        assert!(state
            .accumulated_commission(&v.consensus_address)
            .unwrap()
            .unwrap()
            .amount
            .is_zero());
    }

    #[test]
    fn test_reference_count_bounds_are_fatal() {
        let mut state = state();
        let v = validator(0);
        RewardAccountant::after_validator_created(&mut state, &v.consensus_address).unwrap();
        let c = v.consensus_address;

        RewardAccountant::increase_reference_count(&mut state, &c, 0).unwrap();
        let err = RewardAccountant::increase_reference_count(&mut state, &c, 0).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(state.snapshot(&c, 0).unwrap().unwrap().reference_count, 2);

        RewardAccountant::decrease_reference_count(&mut state, &c, 0).unwrap();
        RewardAccountant::decrease_reference_count(&mut state, &c, 0).unwrap();
        assert!(state.snapshot(&c, 0).unwrap().is_none());

        // Zero-count snapshot written directly to exercise the underflow guard
        state
            .put_snapshot(
                &c,
                7,
                &ValidatorSnapshotRewards {
                    accumulated_rewards_ratio: Dec::ZERO,
                    reference_count: 0,
                },
            )
            .unwrap();
        assert!(RewardAccountant::decrease_reference_count(&mut state, &c, 7)
            .unwrap_err()
            .is_fatal());
    }

    #[test]
    fn test_missing_snapshot_is_not_fatal() {
        let mut state = state();
        let err =
            RewardAccountant::increase_reference_count(&mut state, &Address::repeat_byte(1), 3)
                .unwrap_err();
        assert!(matches!(err, StakingError::MissingRecord { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_allocation_splits_commission() {
        let mut state = state();
        let mut v = validator(1_000);
        v.total_stake = Dec::from_u64(100);
        state.put_validator(&v).unwrap();
        RewardAccountant::after_validator_created(&mut state, &v.consensus_address).unwrap();

        RewardAccountant::allocate_block_rewards(&mut state, &[v.consensus_address], Dec::from_u64(50))
            .unwrap();

        let c = v.consensus_address;
        assert_eq!(
            state.accumulated_commission(&c).unwrap().unwrap().amount,
            Dec::from_u64(5)
        );
        assert_eq!(
            state.accumulated_rewards(&c).unwrap().unwrap().rewards,
            Dec::from_u64(45)
        );
        assert_eq!(
            state.validator_outstanding(&c).unwrap().unwrap().rewards,
            Dec::from_u64(50)
        );
        assert_eq!(state.outstanding_rewards().unwrap().rewards, Dec::from_u64(50));
    }

    #[test]
    fn test_allocation_without_stake_goes_to_community() {
        let mut state = state();
        fund_module(&mut state, 30);
        let v = validator(0);
        state.put_validator(&v).unwrap();
        RewardAccountant::after_validator_created(&mut state, &v.consensus_address).unwrap();

        RewardAccountant::allocate_block_rewards(&mut state, &[v.consensus_address], Dec::from_u64(30))
            .unwrap();

        let community = state.community_info().unwrap().community_address;
        assert_eq!(state.balance_of(&community).unwrap(), U256::from(30));
        assert!(state.outstanding_rewards().unwrap().rewards.is_zero());
    }

    #[test]
    fn test_pro_rata_split() {
        let mut state = state();
        let mut a = validator(0);
        a.total_stake = Dec::from_u64(300);
        let mut b = validator(0);
        b.consensus_address = Address::repeat_byte(9);
        b.total_stake = Dec::from_u64(100);
        for v in [&a, &b] {
            state.put_validator(v).unwrap();
            RewardAccountant::after_validator_created(&mut state, &v.consensus_address).unwrap();
        }

        RewardAccountant::allocate_block_rewards(
            &mut state,
            &[a.consensus_address, b.consensus_address],
            Dec::from_u64(40),
        )
        .unwrap();

        assert_eq!(
            state.accumulated_rewards(&a.consensus_address).unwrap().unwrap().rewards,
            Dec::from_u64(30)
        );
        assert_eq!(
            state.accumulated_rewards(&b.consensus_address).unwrap().unwrap().rewards,
            Dec::from_u64(10)
        );
    }

    #[test]
    fn test_removal_clears_reward_records_only() {
        let mut state = state();
        let v = validator(0);
        state.put_validator(&v).unwrap();
        state.put_signer_reservation(&v.signer_address).unwrap();
        RewardAccountant::after_validator_created(&mut state, &v.consensus_address).unwrap();

        RewardAccountant::after_validator_removed(&mut state, &v).unwrap();

        let c = v.consensus_address;
        assert!(state.accumulated_rewards(&c).unwrap().is_none());
        assert!(state.accumulated_commission(&c).unwrap().is_none());
        assert!(state.validator_outstanding(&c).unwrap().is_none());
        assert!(state.snapshot(&c, 0).unwrap().is_none());
        assert!(state.is_signer_reserved(&v.signer_address).unwrap());
    }

    #[test]
    fn test_uneven_split_allocates_whole_amount() {
        let mut state = state();
        let mut roster = Vec::new();
        for byte in [1u8, 5, 9] {
            let mut v = validator(0);
            v.consensus_address = Address::repeat_byte(byte);
            v.total_stake = Dec::from_u64(1);
            state.put_validator(&v).unwrap();
            RewardAccountant::after_validator_created(&mut state, &v.consensus_address).unwrap();
            roster.push(v.consensus_address);
        }

        RewardAccountant::allocate_block_rewards(&mut state, &roster, Dec::from_u64(10)).unwrap();

        let mut sum = Dec::ZERO;
        for consensus in &roster {
            let share = state.validator_outstanding(consensus).unwrap().unwrap().rewards;
            sum = sum.checked_add(share).unwrap();
        }
        assert_eq!(sum, Dec::from_u64(10));
        assert_eq!(state.outstanding_rewards().unwrap().rewards, Dec::from_u64(10));
        assert!(
            state.validator_outstanding(&roster[2]).unwrap().unwrap().rewards
                > state.validator_outstanding(&roster[0]).unwrap().unwrap().rewards
        );
    }

    #[test]
    fn test_commission_withdrawal_keeps_fraction() {
        let mut state = state();
        fund_module(&mut state, 100);
        let mut v = validator(333);
        v.total_stake = Dec::from_u64(1);
        state.put_validator(&v).unwrap();
        RewardAccountant::after_validator_created(&mut state, &v.consensus_address).unwrap();
        RewardAccountant::allocate_to_validator(&mut state, &v, Dec::from_u64(100)).unwrap();

        // 3.33 accrued, 3 paid
        let paid = RewardAccountant::withdraw_commission(&mut state, &v).unwrap();
        assert_eq!(paid, U256::from(3));
        assert_eq!(state.balance_of(&v.owner).unwrap(), U256::from(3));

        let left = state
            .accumulated_commission(&v.consensus_address)
            .unwrap()
            .unwrap()
            .amount;
        assert_eq!(left, "0.33".parse().unwrap());
        assert_eq!(
            state.outstanding_rewards().unwrap().rewards,
            Dec::from_u64(97)
        );
    }
}
