//! Root-info synchronization.
//!
//! Relayers submit the root infos of a side chain (for example block
//! headers) signed with their voter key. Every root info is gated
//! independently by the voter roster, and is stored once the voter quorum
//! for that exact `(chain, height, info)` triple is reached.

use crate::blacklist::ChainBlacklist;
use crate::error::{GovernanceError, GovernanceResult};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zenith_config::Config;
use zenith_core::{KvRead, KvStore};
use zenith_staking::{NodeManager, NodeState, QuorumRole, QuorumSignatureGate};
use zenith_storage::{encode, PrefixStore};
use zenith_types::{keccak256, Address, B256};

/// Quorum action name for root-info synchronization.
pub const METHOD_SYNC_ROOT_INFO: &str = "syncRootInfo";

const ROOT_INFO: &str = "rootInfo";
const CURRENT_HEIGHT: &str = "currentHeight";

/// One root info of a side chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootInfo {
    /// Side-chain height the info belongs to
    pub height: u32,
    /// Opaque payload
    pub info: Vec<u8>,
}

impl RootInfo {
    /// Quorum input identifying this info on `chain_id`: `chain_id ‖ height ‖ info`.
    pub fn unique_input(&self, chain_id: u64) -> Vec<u8> {
        let mut input = Vec::with_capacity(12 + self.info.len());
        input.extend_from_slice(&chain_id.to_be_bytes());
        input.extend_from_slice(&self.height.to_be_bytes());
        input.extend_from_slice(&self.info);
        input
    }
}

/// Signed body of a sync request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRootInfoParams {
    /// Side chain
    pub chain_id: u64,
    /// Root infos to store
    pub root_infos: Vec<RootInfo>,
}

impl SyncRootInfoParams {
    /// Digest the relayer signs.
    pub fn digest(&self) -> GovernanceResult<B256> {
        Ok(keccak256(encode(self)?))
    }
}

/// Result of one sync request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Recovered relayer address
    pub signer: Address,
    /// Heights whose quorum completed with this request
    pub stored: Vec<u32>,
}

/// Recover the address that produced a 65-byte `r ‖ s ‖ v` signature over `digest`.
///
/// `v` may be given as 0/1 or 27/28.
pub fn recover_signer(digest: &B256, signature: &[u8]) -> GovernanceResult<Address> {
    if signature.len() != 65 {
        return Err(GovernanceError::InvalidSignature(format!(
            "expected 65 bytes, got {}",
            signature.len()
        )));
    }
    let sig = Signature::from_slice(&signature[..64])
        .map_err(|e| GovernanceError::InvalidSignature(e.to_string()))?;
    let v = signature[64];
    let recovery_id = RecoveryId::from_byte(if v >= 27 { v - 27 } else { v })
        .ok_or_else(|| GovernanceError::InvalidSignature(format!("invalid recovery id {v}")))?;

    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &sig, recovery_id)
        .map_err(|e| GovernanceError::InvalidSignature(e.to_string()))?;
    Ok(address_of(&key))
}

/// Ethereum-style address of a public key.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    // Skip the 0x04 prefix
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Voter-gated store of side-chain root infos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootInfoSync {
    module: Address,
    blacklist: ChainBlacklist,
}

impl RootInfoSync {
    /// Root infos stored under the keys of `module`, refusing chains on `blacklist`.
    pub fn new(module: Address, blacklist: ChainBlacklist) -> Self {
        Self { module, blacklist }
    }

    /// Module at the configured info-sync address.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.chain.info_sync_address,
            ChainBlacklist::from_config(config),
        )
    }

    /// Submit a signed sync request in its own transaction.
    pub fn sync_root_info<S: KvStore>(
        &self,
        manager: &mut NodeManager<S>,
        params: &SyncRootInfoParams,
        signature: &[u8],
    ) -> GovernanceResult<SyncOutcome> {
        manager.transact(|state| self.sync_root_info_in(state, params, signature))
    }

    /// Submit a signed sync request inside an open transaction.
    ///
    /// The relayer must be in the current voter roster. Root infos already
    /// signed by this relayer are skipped without error.
    pub fn sync_root_info_in<S: KvStore>(
        &self,
        state: &mut NodeState<S>,
        params: &SyncRootInfoParams,
        signature: &[u8],
    ) -> GovernanceResult<SyncOutcome> {
        let chain_id = params.chain_id;
        if params.root_infos.is_empty() {
            return Err(GovernanceError::EmptyRootInfos(chain_id));
        }
        if self.blacklist.is_blacked_in(state.raw_store(), chain_id)? {
            return Err(GovernanceError::ChainBlacked(chain_id));
        }
        let signer = recover_signer(&params.digest()?, signature)?;

        let mut stored = Vec::new();
        for root in &params.root_infos {
            let outcome = QuorumSignatureGate::check(
                state,
                METHOD_SYNC_ROOT_INFO,
                &root.unique_input(chain_id),
                &signer,
                QuorumRole::Voter,
            )?;
            if outcome.is_authorized() {
                self.put_root_info(state.raw_store_mut(), chain_id, root)?;
                stored.push(root.height);
            } else {
                debug!(chain_id, height = root.height, %signer, ?outcome, "Root info vote recorded");
            }
        }
        Ok(SyncOutcome { signer, stored })
    }

    /// Stored root info of `chain_id` at `height`.
    pub fn root_info<S: KvStore>(
        &self,
        manager: &NodeManager<S>,
        chain_id: u64,
        height: u32,
    ) -> GovernanceResult<Option<Vec<u8>>> {
        self.root_info_in(manager.store(), chain_id, height)
    }

    /// Highest synced height of `chain_id`, 0 if none.
    pub fn current_height<S: KvStore>(&self, manager: &NodeManager<S>, chain_id: u64) -> GovernanceResult<u32> {
        self.current_height_in(manager.store(), chain_id)
    }

    /// Stored root info of `chain_id` at `height` in `store`.
    pub fn root_info_in<S: KvRead>(
        &self,
        store: &S,
        chain_id: u64,
        height: u32,
    ) -> GovernanceResult<Option<Vec<u8>>> {
        let store = PrefixStore::new(store, self.module);
        let key = store.key(ROOT_INFO, &[&chain_id.to_be_bytes(), &height.to_be_bytes()]);
        Ok(store.get(&key)?)
    }

    /// Highest synced height of `chain_id` in `store`, 0 if none.
    pub fn current_height_in<S: KvRead>(&self, store: &S, chain_id: u64) -> GovernanceResult<u32> {
        let store = PrefixStore::new(store, self.module);
        let key = store.key(CURRENT_HEIGHT, &[&chain_id.to_be_bytes()]);
        Ok(store.get(&key)?.unwrap_or(0))
    }

    fn put_root_info<S: KvStore>(&self, store: &mut S, chain_id: u64, root: &RootInfo) -> GovernanceResult<()> {
        let current = self.current_height_in(&*store, chain_id)?;

        let mut store = PrefixStore::new(store, self.module);
        let key = store.key(ROOT_INFO, &[&chain_id.to_be_bytes(), &root.height.to_be_bytes()]);
        store.put(&key, &root.info)?;
        if root.height > current {
            let key = store.key(CURRENT_HEIGHT, &[&chain_id.to_be_bytes()]);
            store.put(&key, &root.height)?;
        }
        info!(chain_id, height = root.height, "Root info synced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;

    fn sign(key: &SigningKey, digest: &B256) -> Vec<u8> {
        let (sig, recovery_id) = key.sign_prehash_recoverable(digest.as_slice()).unwrap();
        let mut bytes = sig.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte() + 27);
        bytes
    }

    #[test]
    fn test_recover_signer() {
        let key = SigningKey::from_slice(&[7u8; 32]).unwrap();
        let digest = keccak256(b"root info");
        let signature = sign(&key, &digest);

        let expected = address_of(key.verifying_key());
        assert_eq!(recover_signer(&digest, &signature).unwrap(), expected);

        // Raw recovery ids work too
        let mut raw = signature.clone();
        raw[64] -= 27;
        assert_eq!(recover_signer(&digest, &raw).unwrap(), expected);

        // A different digest recovers a different key
        assert_ne!(recover_signer(&keccak256(b"other"), &signature).unwrap(), expected);
    }

    #[test]
    fn test_malformed_signature() {
        let digest = keccak256(b"root info");
        assert!(matches!(
            recover_signer(&digest, &[0u8; 64]),
            Err(GovernanceError::InvalidSignature(_))
        ));
        let mut bad_v = vec![1u8; 65];
        bad_v[64] = 9;
        assert!(matches!(
            recover_signer(&digest, &bad_v),
            Err(GovernanceError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_unique_input_layout() {
        let root = RootInfo {
            height: 2,
            info: vec![0xAB],
        };
        assert_eq!(
            root.unique_input(1),
            vec![0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 2, 0xAB]
        );
    }
}
