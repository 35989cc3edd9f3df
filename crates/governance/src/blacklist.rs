//! Chain blacklist.
//!
//! Blacklisting or whitelisting a chain takes a quorum of the current
//! consensus roster. Each roster member submits the same action; the action
//! is applied by the submission that completes the quorum.

use crate::error::GovernanceResult;
use tracing::info;
use zenith_config::Config;
use zenith_core::{KvRead, KvStore};
use zenith_staking::{NodeManager, NodeState, QuorumOutcome, QuorumRole, QuorumSignatureGate};
use zenith_storage::PrefixStore;
use zenith_types::Address;

/// Quorum action name for blacklisting a chain.
pub const METHOD_BLACK_CHAIN: &str = "blackChain";
/// Quorum action name for lifting a blacklist entry.
pub const METHOD_WHITE_CHAIN: &str = "whiteChain";

const BLACK_CHAIN: &str = "blackChain";

/// Blacklist of chains refused by cross-chain modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainBlacklist {
    module: Address,
}

impl ChainBlacklist {
    /// Blacklist stored under the keys of the module at `module`.
    pub fn new(module: Address) -> Self {
        Self { module }
    }

    /// Blacklist stored under the configured cross-chain manager address.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.chain.cross_chain_manager_address)
    }

    /// Address owning the blacklist records.
    pub fn module_address(&self) -> Address {
        self.module
    }

    /// Vote to blacklist `chain_id` as `sender`, in its own transaction.
    pub fn black_chain<S: KvStore>(
        &self,
        manager: &mut NodeManager<S>,
        chain_id: u64,
        sender: &Address,
    ) -> GovernanceResult<QuorumOutcome> {
        manager.transact(|state| self.black_chain_in(state, chain_id, sender))
    }

    /// Vote to lift the blacklist entry of `chain_id` as `sender`, in its own transaction.
    pub fn white_chain<S: KvStore>(
        &self,
        manager: &mut NodeManager<S>,
        chain_id: u64,
        sender: &Address,
    ) -> GovernanceResult<QuorumOutcome> {
        manager.transact(|state| self.white_chain_in(state, chain_id, sender))
    }

    /// Vote to blacklist `chain_id` inside an open transaction.
    pub fn black_chain_in<S: KvStore>(
        &self,
        state: &mut NodeState<S>,
        chain_id: u64,
        sender: &Address,
    ) -> GovernanceResult<QuorumOutcome> {
        let outcome = QuorumSignatureGate::check(
            state,
            METHOD_BLACK_CHAIN,
            &chain_id.to_be_bytes(),
            sender,
            QuorumRole::Signer,
        )?;
        if outcome.is_authorized() {
            let mut store = PrefixStore::new(state.raw_store_mut(), self.module);
            let key = store.key(BLACK_CHAIN, &[&chain_id.to_be_bytes()]);
            store.put(&key, &chain_id)?;
            info!(chain_id, "Chain blacklisted");
        }
        Ok(outcome)
    }

    /// Vote to lift the blacklist entry of `chain_id` inside an open transaction.
    pub fn white_chain_in<S: KvStore>(
        &self,
        state: &mut NodeState<S>,
        chain_id: u64,
        sender: &Address,
    ) -> GovernanceResult<QuorumOutcome> {
        let outcome = QuorumSignatureGate::check(
            state,
            METHOD_WHITE_CHAIN,
            &chain_id.to_be_bytes(),
            sender,
            QuorumRole::Signer,
        )?;
        if outcome.is_authorized() {
            let mut store = PrefixStore::new(state.raw_store_mut(), self.module);
            let key = store.key(BLACK_CHAIN, &[&chain_id.to_be_bytes()]);
            store.delete(&key)?;
            info!(chain_id, "Chain whitelisted");
        }
        Ok(outcome)
    }

    /// True if `chain_id` is blacklisted in the committed state.
    pub fn is_blacked<S: KvStore>(&self, manager: &NodeManager<S>, chain_id: u64) -> GovernanceResult<bool> {
        self.is_blacked_in(manager.store(), chain_id)
    }

    /// True if `chain_id` is blacklisted in `store`.
    pub fn is_blacked_in<S: KvRead>(&self, store: &S, chain_id: u64) -> GovernanceResult<bool> {
        let store = PrefixStore::new(store, self.module);
        let key = store.key(BLACK_CHAIN, &[&chain_id.to_be_bytes()]);
        Ok(store.contains(&key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zenith_config::GenesisValidator;
    use zenith_staking::StakingError;
    use zenith_storage::MemoryStore;
    use zenith_types::U256;

    fn manager(validators: u8) -> NodeManager<MemoryStore> {
        let mut config = Config::default();
        config.staking.min_initial_stake = U256::from(1u64);
        config.genesis.validators = (1..=validators)
            .map(|i| GenesisValidator {
                owner: Address::repeat_byte(0x40 + i),
                consensus_address: Address::repeat_byte(i),
                signer_address: Address::repeat_byte(0x10 + i),
                proposal_address: Address::repeat_byte(0x20 + i),
                commission: 0,
                stake: U256::from(10u64),
                desc: String::new(),
            })
            .collect();
        let mut m = NodeManager::from_config(MemoryStore::new(), &config).unwrap();
        m.init_genesis(&[], &config.genesis.validators, 0).unwrap();
        m
    }

    #[test]
    fn test_blacklist_needs_quorum() {
        let mut m = manager(3);
        let list = ChainBlacklist::new(Address::repeat_byte(0xCC));

        let first = list.black_chain(&mut m, 7, &Address::repeat_byte(0x11)).unwrap();
        assert!(!first.is_authorized());
        assert!(!list.is_blacked(&m, 7).unwrap());

        let repeat = list.black_chain(&mut m, 7, &Address::repeat_byte(0x11)).unwrap();
        assert!(!repeat.is_authorized());

        let second = list.black_chain(&mut m, 7, &Address::repeat_byte(0x12)).unwrap();
        assert!(second.is_authorized());
        assert!(list.is_blacked(&m, 7).unwrap());
        assert!(!list.is_blacked(&m, 8).unwrap());
    }

    #[test]
    fn test_whitelist_lifts_entry() {
        let mut m = manager(1);
        let list = ChainBlacklist::new(Address::repeat_byte(0xCC));
        let signer = Address::repeat_byte(0x11);

        assert!(list.black_chain(&mut m, 9, &signer).unwrap().is_authorized());
        assert!(list.is_blacked(&m, 9).unwrap());
        assert!(list.white_chain(&mut m, 9, &signer).unwrap().is_authorized());
        assert!(!list.is_blacked(&m, 9).unwrap());
    }

    #[test]
    fn test_outsider_rejected() {
        let mut m = manager(2);
        let list = ChainBlacklist::new(Address::repeat_byte(0xCC));
        let err = list.black_chain(&mut m, 7, &Address::repeat_byte(0x99)).unwrap_err();
        assert!(matches!(
            err,
            crate::GovernanceError::Staking(StakingError::IneligibleSigner { .. })
        ));
    }
}
