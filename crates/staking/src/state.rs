//! Typed view of the node manager's key space.
//!
//! [`NodeState`] is the only place that knows how records are keyed. The
//! components (ledger, registry, rewards, epochs, quorum gate) work on top of
//! it and never build keys themselves.

use crate::error::{StakingError, StakingResult};
use crate::keys;
use crate::params::ModuleParams;
use crate::types::{
    AccumulatedCommission, CommunityInfo, ConsensusSign, EpochInfo, GlobalConfig,
    OutstandingRewards, SignerList, StakeInfo, StakeStartingInfo, UnlockingInfo, Validator,
    ValidatorAccumulatedRewards, ValidatorOutstandingRewards, ValidatorSnapshotRewards,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use zenith_core::{Balances, KvRead, KvStore};
use zenith_storage::{PrefixStore, StoreBalances};
use zenith_types::{Address, Dec, B256, U256};

/// Node manager records over a key-value store.
#[derive(Debug)]
pub struct NodeState<S> {
    store: PrefixStore<S>,
    params: Arc<ModuleParams>,
}

impl<S> NodeState<S> {
    /// Scope `store` to the module address in `params`.
    pub fn new(store: S, params: Arc<ModuleParams>) -> Self {
        Self {
            store: PrefixStore::new(store, params.module_address),
            params,
        }
    }

    /// Construction-time parameters.
    pub fn params(&self) -> &ModuleParams {
        &self.params
    }

    /// Shared handle to the parameters.
    pub fn params_arc(&self) -> Arc<ModuleParams> {
        Arc::clone(&self.params)
    }

    /// Account of the module.
    pub fn module_address(&self) -> Address {
        self.params.module_address
    }

    /// The unscoped store, for modules that keep their own records alongside.
    pub fn raw_store(&self) -> &S {
        self.store.inner()
    }

    /// Mutable access to the unscoped store.
    pub fn raw_store_mut(&mut self) -> &mut S {
        self.store.inner_mut()
    }

    /// Release the unscoped store.
    pub fn into_store(self) -> S {
        self.store.into_inner()
    }
}

fn period_key(period: u64) -> [u8; 8] {
    period.to_be_bytes()
}

// =============================================================================
// Reads
// =============================================================================

impl<S: KvRead> NodeState<S> {
    fn read<T: DeserializeOwned>(&self, kind: &str, segments: &[&[u8]]) -> StakingResult<Option<T>> {
        let key = self.store.key(kind, segments);
        Ok(self.store.get(&key)?)
    }

    fn exists(&self, kind: &str, segments: &[&[u8]]) -> StakingResult<bool> {
        let key = self.store.key(kind, segments);
        Ok(self.store.contains(&key)?)
    }

    /// Native token balance of `account`.
    pub fn balance_of(&self, account: &Address) -> StakingResult<U256> {
        Ok(StoreBalances::new(self.store.inner()).balance_of(account)?)
    }

    /// Global configuration, falling back to the genesis defaults.
    pub fn global_config(&self) -> StakingResult<GlobalConfig> {
        Ok(self
            .read(keys::GLOBAL_CONFIG, &[])?
            .unwrap_or_else(|| self.params.genesis_global_config.clone()))
    }

    /// Community pool settings, falling back to the genesis defaults.
    pub fn community_info(&self) -> StakingResult<CommunityInfo> {
        Ok(self
            .read(keys::COMMUNITY_INFO, &[])?
            .unwrap_or(self.params.genesis_community))
    }

    /// Validator by consensus address.
    pub fn validator(&self, consensus: &Address) -> StakingResult<Option<Validator>> {
        self.read(keys::VALIDATOR, &[consensus.as_slice()])
    }

    /// Validator by consensus address, or [`StakingError::ValidatorNotFound`].
    pub fn require_validator(&self, consensus: &Address) -> StakingResult<Validator> {
        self.validator(consensus)?
            .ok_or(StakingError::ValidatorNotFound(*consensus))
    }

    /// Whether a validator already uses `signer` as its signer identity.
    pub fn is_signer_reserved(&self, signer: &Address) -> StakingResult<bool> {
        self.exists(keys::SIGNER_ADDR, &[signer.as_slice()])
    }

    /// Whether a validator already uses `proposal` as its proposal identity.
    pub fn is_proposal_reserved(&self, proposal: &Address) -> StakingResult<bool> {
        self.exists(keys::PROPOSAL_ADDR, &[proposal.as_slice()])
    }

    /// Consensus addresses of all registered validators, in registration order.
    pub fn all_validators(&self) -> StakingResult<Vec<Address>> {
        Ok(self.read(keys::ALL_VALIDATOR, &[])?.unwrap_or_default())
    }

    /// Number of validator registrations ever made.
    pub fn validator_sequence(&self) -> StakingResult<u64> {
        Ok(self.read(keys::VALIDATOR_SEQUENCE, &[])?.unwrap_or(0))
    }

    /// Total stake across all validators.
    pub fn total_pool(&self) -> StakingResult<Dec> {
        Ok(self.read(keys::LOCK_POOL, &[])?.unwrap_or(Dec::ZERO))
    }

    /// Delegation of `staker` to `consensus`.
    pub fn stake_info(&self, staker: &Address, consensus: &Address) -> StakingResult<Option<StakeInfo>> {
        self.read(keys::STAKE_INFO, &[staker.as_slice(), consensus.as_slice()])
    }

    /// Unlocking queue of `staker`, empty if absent.
    pub fn unlocking_info(&self, staker: &Address) -> StakingResult<UnlockingInfo> {
        Ok(self
            .read(keys::UNLOCK_INFO, &[staker.as_slice()])?
            .unwrap_or_else(|| UnlockingInfo {
                staker: *staker,
                unlocking_stake: Vec::new(),
            }))
    }

    /// Id of the current epoch, `None` before genesis.
    pub fn current_epoch_id(&self) -> StakingResult<Option<u64>> {
        self.read(keys::CURRENT_EPOCH, &[])
    }

    /// Rosters of epoch `id`.
    pub fn epoch_info(&self, id: u64) -> StakingResult<Option<EpochInfo>> {
        self.read(keys::EPOCH_INFO, &[&id.to_be_bytes()])
    }

    /// Undrawn commission of a validator.
    pub fn accumulated_commission(&self, consensus: &Address) -> StakingResult<Option<AccumulatedCommission>> {
        self.read(keys::ACCUMULATED_COMMISSION, &[consensus.as_slice()])
    }

    /// Current-period rewards and period counter of a validator.
    pub fn accumulated_rewards(&self, consensus: &Address) -> StakingResult<Option<ValidatorAccumulatedRewards>> {
        self.read(keys::VALIDATOR_ACCUMULATED_REWARDS, &[consensus.as_slice()])
    }

    /// Everything a validator still owes.
    pub fn validator_outstanding(&self, consensus: &Address) -> StakingResult<Option<ValidatorOutstandingRewards>> {
        self.read(keys::VALIDATOR_OUTSTANDING_REWARDS, &[consensus.as_slice()])
    }

    /// Sum of all validators' outstanding rewards.
    pub fn outstanding_rewards(&self) -> StakingResult<OutstandingRewards> {
        Ok(self.read(keys::OUTSTANDING_REWARDS, &[])?.unwrap_or_default())
    }

    /// Snapshot of a validator at `period`.
    pub fn snapshot(&self, consensus: &Address, period: u64) -> StakingResult<Option<ValidatorSnapshotRewards>> {
        self.read(
            keys::VALIDATOR_SNAPSHOT_REWARDS,
            &[consensus.as_slice(), &period_key(period)],
        )
    }

    /// Anchor of the delegation of `staker` to `consensus`.
    pub fn starting_info(&self, staker: &Address, consensus: &Address) -> StakingResult<Option<StakeStartingInfo>> {
        self.read(
            keys::STAKE_STARTING_INFO,
            &[staker.as_slice(), consensus.as_slice()],
        )
    }

    /// Action awaiting quorum under `digest`.
    pub fn sign_record(&self, digest: &B256) -> StakingResult<Option<ConsensusSign>> {
        self.read(keys::SIGN, &[digest.as_slice()])
    }

    /// Signers collected for `digest`, empty if none.
    pub fn signer_list(&self, digest: &B256) -> StakingResult<SignerList> {
        Ok(self.read(keys::SIGNER, &[digest.as_slice()])?.unwrap_or_default())
    }
}

// =============================================================================
// Writes
// =============================================================================

impl<S: KvStore> NodeState<S> {
    fn write<T: Serialize>(&mut self, kind: &str, segments: &[&[u8]], value: &T) -> StakingResult<()> {
        let key = self.store.key(kind, segments);
        Ok(self.store.put(&key, value)?)
    }

    fn remove(&mut self, kind: &str, segments: &[&[u8]]) -> StakingResult<()> {
        let key = self.store.key(kind, segments);
        Ok(self.store.delete(&key)?)
    }

    /// Balance capability over the same store.
    pub fn balances(&mut self) -> StoreBalances<&mut S> {
        StoreBalances::new(self.store.inner_mut())
    }

    /// Pay `amount` from the module account to `to`.
    pub fn pay_from_module(&mut self, to: &Address, amount: U256) -> StakingResult<()> {
        let module = self.module_address();
        self.balances().transfer(&module, to, amount)?;
        Ok(())
    }

    /// Collect `amount` from `from` into the module account.
    pub fn collect_to_module(&mut self, from: &Address, amount: U256) -> StakingResult<()> {
        let module = self.module_address();
        self.balances().transfer(from, &module, amount)?;
        Ok(())
    }

    /// Write the global configuration after validating it.
    pub fn put_global_config(&mut self, config: &GlobalConfig) -> StakingResult<()> {
        config.validate()?;
        self.write(keys::GLOBAL_CONFIG, &[], config)
    }

    /// Write the community settings after validating them.
    pub fn put_community_info(&mut self, info: &CommunityInfo) -> StakingResult<()> {
        info.validate()?;
        self.write(keys::COMMUNITY_INFO, &[], info)
    }

    /// Write a validator record.
    pub fn put_validator(&mut self, validator: &Validator) -> StakingResult<()> {
        self.write(
            keys::VALIDATOR,
            &[validator.consensus_address.as_slice()],
            validator,
        )
    }

    /// Delete a validator record.
    pub fn delete_validator(&mut self, consensus: &Address) -> StakingResult<()> {
        self.remove(keys::VALIDATOR, &[consensus.as_slice()])
    }

    /// Mark `signer` as taken.
    pub fn put_signer_reservation(&mut self, signer: &Address) -> StakingResult<()> {
        self.write(keys::SIGNER_ADDR, &[signer.as_slice()], &1u8)
    }

    /// Free `signer`.
    pub fn delete_signer_reservation(&mut self, signer: &Address) -> StakingResult<()> {
        self.remove(keys::SIGNER_ADDR, &[signer.as_slice()])
    }

    /// Mark `proposal` as taken.
    pub fn put_proposal_reservation(&mut self, proposal: &Address) -> StakingResult<()> {
        self.write(keys::PROPOSAL_ADDR, &[proposal.as_slice()], &1u8)
    }

    /// Free `proposal`.
    pub fn delete_proposal_reservation(&mut self, proposal: &Address) -> StakingResult<()> {
        self.remove(keys::PROPOSAL_ADDR, &[proposal.as_slice()])
    }

    /// Replace the validator list.
    pub fn put_all_validators(&mut self, all: &[Address]) -> StakingResult<()> {
        self.write(keys::ALL_VALIDATOR, &[], &all.to_vec())
    }

    /// Record the registration counter.
    pub fn put_validator_sequence(&mut self, sequence: u64) -> StakingResult<()> {
        self.write(keys::VALIDATOR_SEQUENCE, &[], &sequence)
    }

    /// Record total stake.
    pub fn put_total_pool(&mut self, total: Dec) -> StakingResult<()> {
        self.write(keys::LOCK_POOL, &[], &total)
    }

    /// Write a delegation.
    pub fn put_stake_info(&mut self, info: &StakeInfo) -> StakingResult<()> {
        self.write(
            keys::STAKE_INFO,
            &[info.staker.as_slice(), info.consensus_address.as_slice()],
            info,
        )
    }

    /// Delete a delegation.
    pub fn delete_stake_info(&mut self, staker: &Address, consensus: &Address) -> StakingResult<()> {
        self.remove(keys::STAKE_INFO, &[staker.as_slice(), consensus.as_slice()])
    }

    /// Write an unlocking queue.
    pub fn put_unlocking_info(&mut self, info: &UnlockingInfo) -> StakingResult<()> {
        self.write(keys::UNLOCK_INFO, &[info.staker.as_slice()], info)
    }

    /// Delete an unlocking queue.
    pub fn delete_unlocking_info(&mut self, staker: &Address) -> StakingResult<()> {
        self.remove(keys::UNLOCK_INFO, &[staker.as_slice()])
    }

    /// Point at the current epoch.
    pub fn put_current_epoch_id(&mut self, id: u64) -> StakingResult<()> {
        self.write(keys::CURRENT_EPOCH, &[], &id)
    }

    /// Write epoch rosters.
    pub fn put_epoch_info(&mut self, info: &EpochInfo) -> StakingResult<()> {
        self.write(keys::EPOCH_INFO, &[&info.id.to_be_bytes()], info)
    }

    /// Write undrawn commission.
    pub fn put_accumulated_commission(&mut self, consensus: &Address, commission: &AccumulatedCommission) -> StakingResult<()> {
        self.write(keys::ACCUMULATED_COMMISSION, &[consensus.as_slice()], commission)
    }

    /// Delete undrawn commission.
    pub fn delete_accumulated_commission(&mut self, consensus: &Address) -> StakingResult<()> {
        self.remove(keys::ACCUMULATED_COMMISSION, &[consensus.as_slice()])
    }

    /// Write current-period rewards.
    pub fn put_accumulated_rewards(&mut self, consensus: &Address, rewards: &ValidatorAccumulatedRewards) -> StakingResult<()> {
        self.write(keys::VALIDATOR_ACCUMULATED_REWARDS, &[consensus.as_slice()], rewards)
    }

    /// Delete current-period rewards.
    pub fn delete_accumulated_rewards(&mut self, consensus: &Address) -> StakingResult<()> {
        self.remove(keys::VALIDATOR_ACCUMULATED_REWARDS, &[consensus.as_slice()])
    }

    /// Write a validator's outstanding rewards.
    pub fn put_validator_outstanding(&mut self, consensus: &Address, rewards: &ValidatorOutstandingRewards) -> StakingResult<()> {
        self.write(keys::VALIDATOR_OUTSTANDING_REWARDS, &[consensus.as_slice()], rewards)
    }

    /// Delete a validator's outstanding rewards.
    pub fn delete_validator_outstanding(&mut self, consensus: &Address) -> StakingResult<()> {
        self.remove(keys::VALIDATOR_OUTSTANDING_REWARDS, &[consensus.as_slice()])
    }

    /// Write the global outstanding total.
    pub fn put_outstanding_rewards(&mut self, rewards: &OutstandingRewards) -> StakingResult<()> {
        self.write(keys::OUTSTANDING_REWARDS, &[], rewards)
    }

    /// Write a snapshot.
    pub fn put_snapshot(&mut self, consensus: &Address, period: u64, snapshot: &ValidatorSnapshotRewards) -> StakingResult<()> {
        self.write(
            keys::VALIDATOR_SNAPSHOT_REWARDS,
            &[consensus.as_slice(), &period_key(period)],
            snapshot,
        )
    }

    /// Delete a snapshot.
    pub fn delete_snapshot(&mut self, consensus: &Address, period: u64) -> StakingResult<()> {
        self.remove(
            keys::VALIDATOR_SNAPSHOT_REWARDS,
            &[consensus.as_slice(), &period_key(period)],
        )
    }

    /// Write a delegation anchor.
    pub fn put_starting_info(&mut self, staker: &Address, consensus: &Address, info: &StakeStartingInfo) -> StakingResult<()> {
        self.write(
            keys::STAKE_STARTING_INFO,
            &[staker.as_slice(), consensus.as_slice()],
            info,
        )
    }

    /// Delete a delegation anchor.
    pub fn delete_starting_info(&mut self, staker: &Address, consensus: &Address) -> StakingResult<()> {
        self.remove(
            keys::STAKE_STARTING_INFO,
            &[staker.as_slice(), consensus.as_slice()],
        )
    }

    /// Write the action awaiting quorum.
    pub fn put_sign_record(&mut self, digest: &B256, sign: &ConsensusSign) -> StakingResult<()> {
        self.write(keys::SIGN, &[digest.as_slice()], sign)
    }

    /// Delete the action awaiting quorum.
    pub fn delete_sign_record(&mut self, digest: &B256) -> StakingResult<()> {
        self.remove(keys::SIGN, &[digest.as_slice()])
    }

    /// Write collected signers.
    pub fn put_signer_list(&mut self, digest: &B256, list: &SignerList) -> StakingResult<()> {
        self.write(keys::SIGNER, &[digest.as_slice()], list)
    }

    /// Delete collected signers.
    pub fn delete_signer_list(&mut self, digest: &B256) -> StakingResult<()> {
        self.remove(keys::SIGNER, &[digest.as_slice()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zenith_config::Config;
    use zenith_storage::MemoryStore;

    fn state() -> NodeState<MemoryStore> {
        let params = ModuleParams::from_config(&Config::default()).unwrap();
        NodeState::new(MemoryStore::new(), Arc::new(params))
    }

    #[test]
    fn test_global_config_reads_through_to_genesis() {
        let mut state = state();
        let genesis = state.params().genesis_global_config.clone();
        assert_eq!(state.global_config().unwrap(), genesis);

        let mut updated = genesis.clone();
        updated.block_per_epoch = 7;
        updated.min_proposal_stake = Dec::from_u64(42);
        state.put_global_config(&updated).unwrap();
        assert_eq!(state.global_config().unwrap(), updated);
    }

    #[test]
    fn test_rejected_global_config_leaves_record_unchanged() {
        let mut state = state();
        let mut bad = state.global_config().unwrap();
        bad.max_commission_change = 10_100;

        let err = state.put_global_config(&bad).unwrap_err();
        assert!(matches!(
            err,
            StakingError::RateAboveHundredPercent { value: 10_100, .. }
        ));
        assert_eq!(
            state.global_config().unwrap(),
            state.params().genesis_global_config
        );
    }

    #[test]
    fn test_keys_live_under_module_prefix() {
        let mut state = state();
        let module = state.module_address();
        state.put_total_pool(Dec::from_u64(5)).unwrap();

        let store = state.into_store();
        let (key, _) = store.scan_prefix(module.as_slice()).next().unwrap();
        assert!(key.ends_with(keys::LOCK_POOL.as_bytes()));
    }

    #[test]
    fn test_defaults_for_absent_records() {
        let state = state();
        let who = Address::repeat_byte(9);
        assert_eq!(state.total_pool().unwrap(), Dec::ZERO);
        assert!(state.unlocking_info(&who).unwrap().unlocking_stake.is_empty());
        assert!(state.all_validators().unwrap().is_empty());
        assert_eq!(state.current_epoch_id().unwrap(), None);
        assert!(state.stake_info(&who, &who).unwrap().is_none());
    }
}
