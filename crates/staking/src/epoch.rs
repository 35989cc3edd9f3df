//! Epoch numbering and roster rotation.

use crate::error::{StakingError, StakingResult};
use crate::quorum::{Roster, RosterSource};
use crate::registry::ValidatorRegistry;
use crate::state::NodeState;
use crate::types::{EpochInfo, Peer, QuorumRole, START_EPOCH_ID};
use tracing::{info, warn};
use zenith_core::{KvRead, KvStore};

/// Epoch controller.
///
/// Epoch ids start at [`START_EPOCH_ID`] and grow by exactly one per
/// rotation. The epoch record is written before the current-epoch pointer;
/// both land in the same transaction.
pub struct EpochController;

impl EpochController {
    /// Write the genesis epoch from the registered validators.
    pub fn init_genesis<S: KvStore>(state: &mut NodeState<S>, height: u64) -> StakingResult<EpochInfo> {
        if let Some(id) = state.current_epoch_id()? {
            return Err(StakingError::GenesisAlreadyInitialized(id));
        }
        let (validators, voters) = Self::select(state)?;
        let epoch = EpochInfo {
            id: START_EPOCH_ID,
            validators,
            voters,
            start_height: height,
        };
        state.put_epoch_info(&epoch)?;
        state.put_current_epoch_id(epoch.id)?;

        info!(
            epoch = epoch.id,
            validators = epoch.validators.len(),
            voters = epoch.voters.len(),
            "Genesis epoch initialized"
        );
        Ok(epoch)
    }

    /// The current epoch.
    pub fn current<S: KvRead>(state: &NodeState<S>) -> StakingResult<EpochInfo> {
        let id = state
            .current_epoch_id()?
            .ok_or(StakingError::EpochNotFound(START_EPOCH_ID))?;
        state.epoch_info(id)?.ok_or(StakingError::EpochNotFound(id))
    }

    /// Epoch `id`, if it was ever written.
    pub fn epoch<S: KvRead>(state: &NodeState<S>, id: u64) -> StakingResult<Option<EpochInfo>> {
        state.epoch_info(id)
    }

    /// True once the current epoch has lasted `block_per_epoch` blocks.
    pub fn should_rotate<S: KvRead>(state: &NodeState<S>, height: u64) -> StakingResult<bool> {
        let current = Self::current(state)?;
        let config = state.global_config()?;
        Ok(height.saturating_sub(current.start_height) >= config.block_per_epoch)
    }

    /// Start the next epoch at `height`.
    ///
    /// If no validator qualifies, the previous rosters are carried forward so
    /// the chain keeps a signer set.
    pub fn rotate<S: KvStore>(state: &mut NodeState<S>, height: u64) -> StakingResult<EpochInfo> {
        let current = Self::current(state)?;
        let (mut validators, mut voters) = Self::select(state)?;
        if validators.is_empty() {
            warn!(epoch = current.id, "No eligible validators, carrying rosters forward");
            validators = current.validators.clone();
            voters = current.voters.clone();
        }

        let id = current
            .id
            .checked_add(1)
            .ok_or_else(|| StakingError::Invariant("epoch id overflow".into()))?;
        let next = EpochInfo {
            id,
            validators,
            voters,
            start_height: height,
        };
        state.put_epoch_info(&next)?;
        state.put_current_epoch_id(id)?;

        info!(
            epoch = id,
            height,
            validators = next.validators.len(),
            voters = next.voters.len(),
            "Epoch rotated"
        );
        Ok(next)
    }

    /// Consensus and voter rosters from the current validator set.
    ///
    /// Active validators with stake, highest stake first, ties broken by
    /// consensus address.
    pub fn select<S: KvRead>(state: &NodeState<S>) -> StakingResult<(Vec<Peer>, Vec<Peer>)> {
        let config = state.global_config()?;
        let mut candidates: Vec<_> = ValidatorRegistry::all(state)?
            .into_iter()
            .filter(|v| v.is_active() && !v.total_stake.is_zero())
            .collect();
        candidates.sort_by(|a, b| {
            b.total_stake
                .cmp(&a.total_stake)
                .then_with(|| a.consensus_address.cmp(&b.consensus_address))
        });

        let validators: Vec<Peer> = candidates
            .iter()
            .take(usize::try_from(config.consensus_validator_num).unwrap_or(usize::MAX))
            .map(|v| v.peer())
            .collect();
        let voters = validators
            .iter()
            .take(usize::try_from(config.voter_validator_num).unwrap_or(usize::MAX))
            .copied()
            .collect();
        Ok((validators, voters))
    }
}

impl<S: KvRead> RosterSource for NodeState<S> {
    fn roster(&self, role: QuorumRole) -> StakingResult<Roster> {
        let epoch = EpochController::current(self)?;
        Ok(Roster {
            epoch: epoch.id,
            signers: epoch.signers(role),
        })
    }
}
