//! Node manager operations.
//!
//! [`NodeManager`] owns the state store and runs every operation inside a
//! [`CacheStore`] overlay: the overlay is committed when the operation returns
//! `Ok` and dropped otherwise, so a failed operation leaves no partial writes.

use crate::economic::Economic;
use crate::epoch::EpochController;
use crate::error::{StakingError, StakingResult};
use crate::ledger::StakeLedger;
use crate::params::ModuleParams;
use crate::registry::ValidatorRegistry;
use crate::rewards::RewardAccountant;
use crate::state::NodeState;
use crate::types::{
    AccumulatedCommission, Commission, CommunityInfo, EpochInfo, GlobalConfig, OutstandingRewards,
    StakeInfo, UnlockingInfo, Validator, ValidatorAccumulatedRewards, ValidatorOutstandingRewards,
    ValidatorStatus, MAX_DESC_LENGTH, START_EPOCH_ID,
};
use std::sync::Arc;
use tracing::{debug, error, info};
use zenith_config::{Config, GenesisAccount, GenesisValidator};
use zenith_core::{Balances, KvRead, KvStore, StoreError};
use zenith_storage::CacheStore;
use zenith_types::{is_valid_rate, Address, Dec, U256};

/// Parameters of [`NodeManager::create_validator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateValidatorParams {
    /// Consensus identity
    pub consensus_address: Address,
    /// Signer identity
    pub signer_address: Address,
    /// Proposal identity
    pub proposal_address: Address,
    /// Commission rate in basis points
    pub commission: u16,
    /// Self stake, taken from the owner's balance
    pub initial_stake: U256,
    /// Free-form description
    pub desc: String,
}

/// Parameters of [`NodeManager::update_validator`]. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateValidatorParams {
    /// New signer identity
    pub signer_address: Option<Address>,
    /// New proposal identity
    pub proposal_address: Option<Address>,
    /// New description
    pub desc: Option<String>,
}

/// Reward records of one validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorRewards {
    /// Current-period delegator rewards and period counter
    pub accumulated: ValidatorAccumulatedRewards,
    /// Everything the validator still owes
    pub outstanding: ValidatorOutstandingRewards,
    /// Undrawn commission
    pub commission: AccumulatedCommission,
}

/// What [`NodeManager::end_block`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOutcome {
    /// Amount allocated to the roster
    pub allocated: Dec,
    /// Id of the epoch started at this block, if any
    pub rotated_to: Option<u64>,
}

/// Node manager module.
///
/// Queries read the committed store; every state-changing operation is a
/// transaction.
#[derive(Debug)]
pub struct NodeManager<S> {
    store: S,
    params: Arc<ModuleParams>,
}

impl<S: KvStore> NodeManager<S> {
    /// Create a module over `store`.
    pub fn new(store: S, params: ModuleParams) -> Self {
        Self {
            store,
            params: Arc::new(params),
        }
    }

    /// Create a module with parameters from a node configuration.
    pub fn from_config(store: S, config: &Config) -> StakingResult<Self> {
        Ok(Self::new(store, ModuleParams::from_config(config)?))
    }

    /// Construction-time parameters.
    pub fn params(&self) -> &ModuleParams {
        &self.params
    }

    /// The committed store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Release the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Run `f` against a write overlay, committing only if it succeeds.
    ///
    /// Other modules use this to apply quorum-gated actions atomically with
    /// the gate's own bookkeeping.
    pub fn transact<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut NodeState<CacheStore<&mut S>>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let params = Arc::clone(&self.params);
        let mut state = NodeState::new(CacheStore::new(&mut self.store), params);
        let value = f(&mut state)?;
        state.into_store().commit()?;
        Ok(value)
    }

    /// Run `f` against the committed store.
    pub fn query<T, F>(&self, f: F) -> StakingResult<T>
    where
        F: FnOnce(&NodeState<&S>) -> StakingResult<T>,
    {
        let state = NodeState::new(&self.store, Arc::clone(&self.params));
        f(&state)
    }

    fn run<T, F>(&mut self, operation: &'static str, f: F) -> StakingResult<T>
    where
        F: FnOnce(&mut NodeState<CacheStore<&mut S>>) -> StakingResult<T>,
    {
        let result = self.transact(f);
        if let Err(err) = &result {
            if err.is_fatal() {
                error!(operation, error = %err, "Node manager state corrupted");
            } else {
                debug!(operation, error = %err, "Operation rejected");
            }
        }
        result
    }

    // =========================================================================
    // Genesis
    // =========================================================================

    /// Fund genesis accounts, create genesis validators and write epoch 1.
    ///
    /// Each validator's stake is minted to its owner and then delegated.
    pub fn init_genesis(
        &mut self,
        accounts: &[GenesisAccount],
        validators: &[GenesisValidator],
        height: u64,
    ) -> StakingResult<EpochInfo> {
        self.run("init_genesis", |state| {
            if let Some(id) = state.current_epoch_id()? {
                return Err(StakingError::GenesisAlreadyInitialized(id));
            }
            for account in accounts {
                state.balances().mint(&account.address, account.balance)?;
            }
            for gv in validators {
                state.balances().mint(&gv.owner, gv.stake)?;
                create_validator(
                    state,
                    &gv.owner,
                    CreateValidatorParams {
                        consensus_address: gv.consensus_address,
                        signer_address: gv.signer_address,
                        proposal_address: gv.proposal_address,
                        commission: gv.commission,
                        initial_stake: gv.stake,
                        desc: gv.desc.clone(),
                    },
                    height,
                )?;
            }
            EpochController::init_genesis(state, height)
        })
    }

    // =========================================================================
    // Validator lifecycle
    // =========================================================================

    /// Register a validator owned by `owner` with its initial self stake.
    pub fn create_validator(
        &mut self,
        owner: &Address,
        params: CreateValidatorParams,
        height: u64,
    ) -> StakingResult<()> {
        self.run("create_validator", |state| {
            create_validator(state, owner, params, height)
        })
    }

    /// Change a validator's identities or description.
    pub fn update_validator(
        &mut self,
        owner: &Address,
        consensus: &Address,
        update: UpdateValidatorParams,
    ) -> StakingResult<()> {
        self.run("update_validator", |state| {
            let mut validator = owned_validator(state, owner, consensus)?;
            if let Some(desc) = update.desc {
                check_desc(&desc)?;
                validator.desc = desc;
            }
            ValidatorRegistry::update_identities(
                state,
                &mut validator,
                update.signer_address,
                update.proposal_address,
            )?;
            state.put_validator(&validator)
        })
    }

    /// Change a validator's commission rate.
    ///
    /// At most once per epoch and by at most the configured maximum change.
    pub fn update_commission(
        &mut self,
        owner: &Address,
        consensus: &Address,
        rate: u16,
    ) -> StakingResult<()> {
        self.run("update_commission", |state| {
            let mut validator = owned_validator(state, owner, consensus)?;
            if !validator.is_active() {
                return Err(StakingError::ValidatorNotActive(*consensus));
            }
            if !is_valid_rate(rate) {
                return Err(StakingError::RateAboveHundredPercent {
                    name: "commission",
                    value: rate,
                });
            }
            let epoch = current_epoch_id(state)?;
            if validator.commission.updated_epoch == epoch {
                return Err(StakingError::CommissionUpdatedThisEpoch(epoch));
            }
            let max = state.global_config()?.max_commission_change;
            if rate.abs_diff(validator.commission.rate) > max {
                return Err(StakingError::CommissionChangeTooLarge {
                    from: validator.commission.rate,
                    to: rate,
                    max,
                });
            }

            info!(validator = %consensus, from = validator.commission.rate, to = rate, epoch, "Commission updated");
            validator.commission = Commission {
                rate,
                updated_epoch: epoch,
            };
            state.put_validator(&validator)
        })
    }

    /// Stop accepting stake; the validator leaves the roster at the next rotation.
    pub fn cancel_validator(&mut self, owner: &Address, consensus: &Address) -> StakingResult<()> {
        self.run("cancel_validator", |state| {
            let mut validator = owned_validator(state, owner, consensus)?;
            if validator.status != ValidatorStatus::Active {
                return Err(StakingError::UnexpectedValidatorStatus {
                    validator: *consensus,
                    expected: ValidatorStatus::Active.as_str(),
                });
            }
            validator.status = ValidatorStatus::Unlocking;
            state.put_validator(&validator)?;
            info!(validator = %consensus, "Validator cancelled");
            Ok(())
        })
    }

    /// Unstake the owner's self stake from a cancelled validator that has left
    /// the roster, and pay out its commission.
    ///
    /// The validator is removed once no stake is left on it; otherwise it
    /// waits in `Removing` for its remaining delegators to leave.
    pub fn withdraw_validator(
        &mut self,
        owner: &Address,
        consensus: &Address,
        height: u64,
    ) -> StakingResult<()> {
        self.run("withdraw_validator", |state| {
            let mut validator = owned_validator(state, owner, consensus)?;
            if validator.status != ValidatorStatus::Unlocking {
                return Err(StakingError::UnexpectedValidatorStatus {
                    validator: *consensus,
                    expected: ValidatorStatus::Unlocking.as_str(),
                });
            }
            if EpochController::current(state)?.contains(consensus) {
                return Err(StakingError::ValidatorInRoster(*consensus));
            }

            let self_stake = state
                .stake_info(owner, consensus)?
                .map(|info| info.amount)
                .unwrap_or(Dec::ZERO);
            if !self_stake.is_zero() {
                unstake_from(state, owner, &mut validator, self_stake, height)?;
            }
            RewardAccountant::withdraw_commission(state, &validator)?;

            if validator.total_stake.is_zero() {
                remove_validator(state, &validator)
            } else {
                validator.status = ValidatorStatus::Removing;
                state.put_validator(&validator)?;
                info!(validator = %consensus, remaining = %validator.total_stake, "Validator removing");
                Ok(())
            }
        })
    }

    // =========================================================================
    // Stake
    // =========================================================================

    /// Delegate `amount` from `staker`'s balance to an active validator.
    pub fn stake(
        &mut self,
        staker: &Address,
        consensus: &Address,
        amount: U256,
        height: u64,
    ) -> StakingResult<()> {
        self.run("stake", |state| {
            if amount.is_zero() {
                return Err(StakingError::ZeroAmount);
            }
            let mut validator = state.require_validator(consensus)?;
            if !validator.is_active() {
                return Err(StakingError::ValidatorNotActive(*consensus));
            }
            state.collect_to_module(staker, amount)?;
            stake_into(state, staker, &mut validator, Dec::from_int(amount)?, height)
        })
    }

    /// Start unbonding `amount` of `staker`'s delegation.
    ///
    /// The owner of an active validator must keep at least the minimum
    /// initial stake; to leave entirely it cancels the validator instead.
    pub fn unstake(
        &mut self,
        staker: &Address,
        consensus: &Address,
        amount: U256,
        height: u64,
    ) -> StakingResult<()> {
        self.run("unstake", |state| {
            if amount.is_zero() {
                return Err(StakingError::ZeroAmount);
            }
            let amount = Dec::from_int(amount)?;
            let mut validator = state.require_validator(consensus)?;

            if staker == &validator.owner && validator.is_active() {
                let required = state.global_config()?.min_initial_stake;
                let remaining = validator.self_stake.checked_sub(amount).unwrap_or(Dec::ZERO);
                if remaining < required {
                    return Err(StakingError::InsufficientStake {
                        required,
                        provided: remaining,
                    });
                }
            }

            unstake_from(state, staker, &mut validator, amount, height)?;

            if validator.status == ValidatorStatus::Removing && validator.total_stake.is_zero() {
                remove_validator(state, &validator)?;
            }
            Ok(())
        })
    }

    /// Release all of `staker`'s matured unbonding stake. Returns the amount paid.
    pub fn withdraw(&mut self, staker: &Address, height: u64) -> StakingResult<U256> {
        self.run("withdraw", |state| {
            let matured = StakeLedger::sweep_matured(state, staker, height)?;
            let amount = matured.truncate();
            if !amount.is_zero() {
                state.pay_from_module(staker, amount)?;
                info!(%staker, %amount, height, "Unlocked stake withdrawn");
            }
            Ok(amount)
        })
    }

    /// Pay `staker` the rewards earned by its delegation. Returns the amount paid.
    pub fn withdraw_stake_rewards(
        &mut self,
        staker: &Address,
        consensus: &Address,
        height: u64,
    ) -> StakingResult<U256> {
        self.run("withdraw_stake_rewards", |state| {
            let validator = state.require_validator(consensus)?;
            if RewardAccountant::live_anchor(state, &validator, staker)?.is_none() {
                return Err(StakingError::MissingRecord {
                    kind: "stake starting info",
                    owner: *staker,
                });
            }
            let paid = RewardAccountant::before_stake_modified(state, &validator, staker)?;
            let stake = state
                .stake_info(staker, consensus)?
                .map(|info| info.amount)
                .unwrap_or(Dec::ZERO);
            RewardAccountant::after_stake_modified(state, &validator, staker, stake, height)?;
            Ok(paid.truncate())
        })
    }

    /// Pay the owner its validator's accumulated commission. Returns the amount paid.
    pub fn withdraw_commission(&mut self, owner: &Address, consensus: &Address) -> StakingResult<U256> {
        self.run("withdraw_commission", |state| {
            let validator = owned_validator(state, owner, consensus)?;
            RewardAccountant::withdraw_commission(state, &validator)
        })
    }

    // =========================================================================
    // Block processing and governance
    // =========================================================================

    /// Issue the block reward, allocate it to the current roster and rotate
    /// the epoch when due.
    pub fn end_block(&mut self, height: u64) -> StakingResult<BlockOutcome> {
        self.run("end_block", |state| {
            let allocated = Economic::issue_block_reward(state, height)?;
            if !allocated.is_zero() {
                let roster = EpochController::current(state)?.consensus_addresses();
                RewardAccountant::allocate_block_rewards(state, &roster, allocated)?;
            }

            let rotated_to = if EpochController::should_rotate(state, height)? {
                Some(EpochController::rotate(state, height)?.id)
            } else {
                None
            };
            Ok(BlockOutcome {
                allocated,
                rotated_to,
            })
        })
    }

    /// Replace the global configuration.
    pub fn set_global_config(&mut self, config: GlobalConfig) -> StakingResult<()> {
        self.run("set_global_config", |state| {
            state.put_global_config(&config)?;
            info!(?config, "Global config updated");
            Ok(())
        })
    }

    /// Replace the community pool settings.
    pub fn set_community_info(&mut self, community: CommunityInfo) -> StakingResult<()> {
        self.run("set_community_info", |state| {
            state.put_community_info(&community)?;
            info!(rate = community.community_rate, address = %community.community_address, "Community info updated");
            Ok(())
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Global configuration, with genesis defaults.
    pub fn global_config(&self) -> StakingResult<GlobalConfig> {
        self.query(|state| state.global_config())
    }

    /// Community pool settings, with genesis defaults.
    pub fn community_info(&self) -> StakingResult<CommunityInfo> {
        self.query(|state| state.community_info())
    }

    /// The current epoch.
    pub fn current_epoch_info(&self) -> StakingResult<EpochInfo> {
        self.query(|state| EpochController::current(state))
    }

    /// Epoch `id`.
    pub fn epoch_info(&self, id: u64) -> StakingResult<Option<EpochInfo>> {
        self.query(|state| EpochController::epoch(state, id))
    }

    /// Total stake across all validators.
    pub fn total_pool(&self) -> StakingResult<Dec> {
        self.query(|state| state.total_pool())
    }

    /// Validator by consensus address.
    pub fn validator(&self, consensus: &Address) -> StakingResult<Option<Validator>> {
        self.query(|state| ValidatorRegistry::get(state, consensus))
    }

    /// All registered validators.
    pub fn all_validators(&self) -> StakingResult<Vec<Validator>> {
        self.query(|state| ValidatorRegistry::all(state))
    }

    /// Reward records of a validator.
    pub fn validator_rewards(&self, consensus: &Address) -> StakingResult<ValidatorRewards> {
        self.query(|state| {
            let accumulated =
                state
                    .accumulated_rewards(consensus)?
                    .ok_or(StakingError::MissingRecord {
                        kind: "validator accumulated rewards",
                        owner: *consensus,
                    })?;
            Ok(ValidatorRewards {
                accumulated,
                outstanding: state.validator_outstanding(consensus)?.unwrap_or_default(),
                commission: state.accumulated_commission(consensus)?.unwrap_or_default(),
            })
        })
    }

    /// Sum of all validators' outstanding rewards.
    pub fn outstanding_rewards(&self) -> StakingResult<OutstandingRewards> {
        self.query(|state| state.outstanding_rewards())
    }

    /// Delegation of `staker` to `consensus`.
    pub fn stake_info(&self, staker: &Address, consensus: &Address) -> StakingResult<Option<StakeInfo>> {
        self.query(|state| state.stake_info(staker, consensus))
    }

    /// Unbonding queue of `staker`.
    pub fn unlocking_info(&self, staker: &Address) -> StakingResult<UnlockingInfo> {
        self.query(|state| state.unlocking_info(staker))
    }

    /// Rewards `staker` would receive from `consensus` if settled now.
    pub fn pending_stake_rewards(&self, staker: &Address, consensus: &Address) -> StakingResult<Dec> {
        self.query(|state| {
            let validator = state.require_validator(consensus)?;
            RewardAccountant::pending_stake_rewards(state, &validator, staker)
        })
    }

    /// Native token balance of `account`.
    pub fn balance_of(&self, account: &Address) -> StakingResult<U256> {
        self.query(|state| state.balance_of(account))
    }

    /// Total supply after block `height`.
    pub fn total_supply(&self, height: u64) -> StakingResult<U256> {
        Economic::total_supply(&self.params, height)
    }
}

// =============================================================================
// Operation bodies shared between entry points
// =============================================================================

fn current_epoch_id<S: KvRead>(state: &NodeState<S>) -> StakingResult<u64> {
    Ok(state.current_epoch_id()?.unwrap_or(START_EPOCH_ID))
}

fn check_desc(desc: &str) -> StakingResult<()> {
    if desc.len() > MAX_DESC_LENGTH {
        return Err(StakingError::DescriptionTooLong {
            len: desc.len(),
            max: MAX_DESC_LENGTH,
        });
    }
    Ok(())
}

fn owned_validator<S: KvRead>(
    state: &NodeState<S>,
    owner: &Address,
    consensus: &Address,
) -> StakingResult<Validator> {
    let validator = state.require_validator(consensus)?;
    if &validator.owner != owner {
        return Err(StakingError::NotValidatorOwner {
            caller: *owner,
            validator: *consensus,
        });
    }
    Ok(validator)
}

fn create_validator<S: KvStore>(
    state: &mut NodeState<S>,
    owner: &Address,
    params: CreateValidatorParams,
    height: u64,
) -> StakingResult<()> {
    check_desc(&params.desc)?;
    if !is_valid_rate(params.commission) {
        return Err(StakingError::RateAboveHundredPercent {
            name: "commission",
            value: params.commission,
        });
    }
    let stake = Dec::from_int(params.initial_stake)?;
    let required = state.global_config()?.min_initial_stake;
    if stake < required {
        return Err(StakingError::InsufficientStake {
            required,
            provided: stake,
        });
    }

    let mut validator = Validator {
        consensus_address: params.consensus_address,
        owner: *owner,
        signer_address: params.signer_address,
        proposal_address: params.proposal_address,
        commission: Commission {
            rate: params.commission,
            updated_epoch: current_epoch_id(state)?,
        },
        status: ValidatorStatus::Active,
        total_stake: Dec::ZERO,
        self_stake: Dec::ZERO,
        sequence: 0,
        desc: params.desc,
    };
    ValidatorRegistry::register(state, &mut validator)?;
    RewardAccountant::after_validator_created(state, &validator.consensus_address)?;

    state.collect_to_module(owner, params.initial_stake)?;
    stake_into(state, owner, &mut validator, stake, height)?;

    info!(
        validator = %validator.consensus_address,
        %owner,
        stake = %validator.total_stake,
        commission = validator.commission.rate,
        "Validator created"
    );
    Ok(())
}

/// Delegate funds already held by the module, keeping the reward ledger in step.
fn stake_into<S: KvStore>(
    state: &mut NodeState<S>,
    staker: &Address,
    validator: &mut Validator,
    amount: Dec,
    height: u64,
) -> StakingResult<()> {
    if RewardAccountant::live_anchor(state, validator, staker)?.is_some() {
        RewardAccountant::before_stake_modified(state, validator, staker)?;
    } else {
        // Anchors into the chain of an earlier registration hold nothing
        state.delete_starting_info(staker, &validator.consensus_address)?;
        RewardAccountant::before_stake_created(state, validator)?;
    }
    let info = StakeLedger::deposit(state, staker, validator, amount)?;
    RewardAccountant::after_stake_modified(state, validator, staker, info.amount, height)
}

fn unstake_from<S: KvStore>(
    state: &mut NodeState<S>,
    staker: &Address,
    validator: &mut Validator,
    amount: Dec,
    height: u64,
) -> StakingResult<()> {
    let consensus = validator.consensus_address;
    let available = state
        .stake_info(staker, &consensus)?
        .map(|info| info.amount)
        .unwrap_or(Dec::ZERO);
    if available < amount {
        return Err(StakingError::InsufficientDelegation {
            staker: *staker,
            validator: consensus,
            available,
            requested: amount,
        });
    }

    let delay = state.global_config()?.block_per_epoch;
    RewardAccountant::before_stake_modified(state, validator, staker)?;
    let info = StakeLedger::withdraw(state, staker, validator, amount, height, delay)?;
    RewardAccountant::after_stake_modified(state, validator, staker, info.amount, height)
}

fn remove_validator<S: KvStore>(state: &mut NodeState<S>, validator: &Validator) -> StakingResult<()> {
    RewardAccountant::withdraw_commission(state, validator)?;
    RewardAccountant::after_validator_removed(state, validator)?;
    ValidatorRegistry::deregister(state, validator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zenith_storage::MemoryStore;

    fn token(n: u64) -> U256 {
        U256::from(n)
    }

    fn manager() -> NodeManager<MemoryStore> {
        let mut config = Config::default();
        config.staking.min_initial_stake = token(100);
        config.staking.blocks_per_epoch = 10;
        config.chain.reward_per_block = token(10);
        config.community.rate = 0;
        NodeManager::from_config(MemoryStore::new(), &config).unwrap()
    }

    fn params(byte: u8, stake: u64) -> CreateValidatorParams {
        CreateValidatorParams {
            consensus_address: Address::repeat_byte(byte),
            signer_address: Address::repeat_byte(byte.wrapping_add(100)),
            proposal_address: Address::repeat_byte(byte.wrapping_add(200)),
            commission: 1_000,
            initial_stake: token(stake),
            desc: "node".into(),
        }
    }

    fn fund(m: &mut NodeManager<MemoryStore>, who: &Address, amount: u64) {
        m.transact(|state| -> StakingResult<()> {
            state.balances().mint(who, token(amount))?;
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_failed_operation_leaves_no_writes() {
        let mut m = manager();
        let owner = Address::repeat_byte(50);
        fund(&mut m, &owner, 1_000);
        m.create_validator(&owner, params(1, 100), 1).unwrap();
        let before = m.store().clone();

        let err = m
            .transact(|state| -> StakingResult<()> {
                state.balances().mint(&owner, token(5))?;
                Err(StakingError::ZeroAmount)
            })
            .unwrap_err();
        assert!(matches!(err, StakingError::ZeroAmount));
        assert_eq!(m.store(), &before);

        let mut dup = params(2, 100);
        dup.signer_address = Address::repeat_byte(101);
        let err = m.create_validator(&owner, dup, 2).unwrap_err();
        assert!(matches!(err, StakingError::SignerAlreadyExists(_)));
        assert_eq!(m.store(), &before);
        assert_eq!(m.balance_of(&owner).unwrap(), token(900));
    }

    #[test]
    fn test_commission_above_hundred_percent_rejected() {
        let mut m = manager();
        let owner = Address::repeat_byte(50);
        fund(&mut m, &owner, 1_000);

        let mut p = params(1, 100);
        p.commission = 10_100;
        assert!(matches!(
            m.create_validator(&owner, p, 1),
            Err(StakingError::RateAboveHundredPercent { value: 10_100, .. })
        ));

        let before = m.global_config().unwrap();
        let mut config = before.clone();
        config.max_commission_change = 10_100;
        assert!(m.set_global_config(config).is_err());
        assert_eq!(m.global_config().unwrap(), before);
    }

    #[test]
    fn test_owner_checks() {
        let mut m = manager();
        let owner = Address::repeat_byte(50);
        let other = Address::repeat_byte(51);
        fund(&mut m, &owner, 1_000);
        m.create_validator(&owner, params(1, 100), 1).unwrap();

        let consensus = Address::repeat_byte(1);
        assert!(matches!(
            m.cancel_validator(&other, &consensus),
            Err(StakingError::NotValidatorOwner { .. })
        ));
        assert!(matches!(
            m.withdraw_commission(&other, &consensus),
            Err(StakingError::NotValidatorOwner { .. })
        ));
    }

    #[test]
    fn test_owner_keeps_minimum_self_stake() {
        let mut m = manager();
        let owner = Address::repeat_byte(50);
        fund(&mut m, &owner, 1_000);
        m.create_validator(&owner, params(1, 150), 1).unwrap();
        let consensus = Address::repeat_byte(1);

        m.unstake(&owner, &consensus, token(50), 2).unwrap();
        assert!(matches!(
            m.unstake(&owner, &consensus, token(1), 3),
            Err(StakingError::InsufficientStake { .. })
        ));
    }

    #[test]
    fn test_commission_update_rules() {
        let mut m = manager();
        let owner = Address::repeat_byte(50);
        fund(&mut m, &owner, 1_000);
        m.init_genesis(&[], &[], 0).unwrap();
        m.create_validator(&owner, params(1, 100), 1).unwrap();
        let consensus = Address::repeat_byte(1);

        // Created in epoch 1
        assert!(matches!(
            m.update_commission(&owner, &consensus, 1_100),
            Err(StakingError::CommissionUpdatedThisEpoch(1))
        ));

        m.end_block(10).unwrap();
        assert!(matches!(
            m.update_commission(&owner, &consensus, 2_000),
            Err(StakingError::CommissionChangeTooLarge { .. })
        ));
        m.update_commission(&owner, &consensus, 1_500).unwrap();
        assert_eq!(m.validator(&consensus).unwrap().unwrap().commission.rate, 1_500);
    }

    #[test]
    fn test_update_validator_moves_identities() {
        let mut m = manager();
        let owner = Address::repeat_byte(50);
        fund(&mut m, &owner, 1_000);
        m.create_validator(&owner, params(1, 100), 1).unwrap();
        let consensus = Address::repeat_byte(1);

        m.update_validator(
            &owner,
            &consensus,
            UpdateValidatorParams {
                signer_address: Some(Address::repeat_byte(77)),
                desc: Some("renamed".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let v = m.validator(&consensus).unwrap().unwrap();
        assert_eq!(v.signer_address, Address::repeat_byte(77));
        assert_eq!(v.desc, "renamed");

        let long = "x".repeat(MAX_DESC_LENGTH + 1);
        assert!(matches!(
            m.update_validator(
                &owner,
                &consensus,
                UpdateValidatorParams {
                    desc: Some(long),
                    ..Default::default()
                }
            ),
            Err(StakingError::DescriptionTooLong { .. })
        ));
    }
}
