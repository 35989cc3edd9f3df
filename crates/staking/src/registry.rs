//! Validator records and identity reservations.

use crate::error::{StakingError, StakingResult};
use crate::state::NodeState;
use crate::types::{Validator, MAX_VALIDATOR_NUM};
use tracing::{debug, info};
use zenith_core::{KvRead, KvStore};
use zenith_types::Address;

/// Validator registry.
///
/// Consensus, signer and proposal identities are each unique across all
/// registered validators. Signer and proposal uniqueness is enforced through
/// reservation records that live as long as the validator.
pub struct ValidatorRegistry;

impl ValidatorRegistry {
    /// Register `validator`, assigning its sequence number.
    pub fn register<S: KvStore>(
        state: &mut NodeState<S>,
        validator: &mut Validator,
    ) -> StakingResult<()> {
        let consensus = validator.consensus_address;
        if state.validator(&consensus)?.is_some() {
            return Err(StakingError::ValidatorAlreadyExists(consensus));
        }
        if state.is_signer_reserved(&validator.signer_address)? {
            return Err(StakingError::SignerAlreadyExists(validator.signer_address));
        }
        if state.is_proposal_reserved(&validator.proposal_address)? {
            return Err(StakingError::ProposalAlreadyExists(validator.proposal_address));
        }

        Self::add_to_all(state, consensus)?;

        let sequence = state
            .validator_sequence()?
            .checked_add(1)
            .ok_or_else(|| StakingError::Invariant("validator sequence overflow".into()))?;
        state.put_validator_sequence(sequence)?;
        validator.sequence = sequence;

        state.put_signer_reservation(&validator.signer_address)?;
        state.put_proposal_reservation(&validator.proposal_address)?;
        state.put_validator(validator)?;

        info!(
            validator = %consensus,
            owner = %validator.owner,
            sequence,
            "Validator registered"
        );
        Ok(())
    }

    /// Remove the validator record and its list entry, releasing its identities.
    pub fn deregister<S: KvStore>(state: &mut NodeState<S>, validator: &Validator) -> StakingResult<()> {
        Self::release_identities(state, validator)?;
        Self::remove_from_all(state, &validator.consensus_address)?;
        state.delete_validator(&validator.consensus_address)?;
        info!(validator = %validator.consensus_address, "Validator deregistered");
        Ok(())
    }

    /// Release the signer and proposal reservations of `validator`.
    fn release_identities<S: KvStore>(
        state: &mut NodeState<S>,
        validator: &Validator,
    ) -> StakingResult<()> {
        state.delete_signer_reservation(&validator.signer_address)?;
        state.delete_proposal_reservation(&validator.proposal_address)
    }

    /// Move `validator` to new signer and/or proposal identities.
    ///
    /// Both new identities are checked before any reservation changes, so a
    /// rejected update leaves the old reservations in place. Passing the
    /// current identity is a no-op for that identity.
    pub fn update_identities<S: KvStore>(
        state: &mut NodeState<S>,
        validator: &mut Validator,
        signer: Option<Address>,
        proposal: Option<Address>,
    ) -> StakingResult<()> {
        let signer = signer.filter(|s| *s != validator.signer_address);
        let proposal = proposal.filter(|p| *p != validator.proposal_address);

        if let Some(signer) = signer {
            if state.is_signer_reserved(&signer)? {
                return Err(StakingError::SignerAlreadyExists(signer));
            }
        }
        if let Some(proposal) = proposal {
            if state.is_proposal_reserved(&proposal)? {
                return Err(StakingError::ProposalAlreadyExists(proposal));
            }
        }

        if let Some(signer) = signer {
            state.delete_signer_reservation(&validator.signer_address)?;
            state.put_signer_reservation(&signer)?;
            debug!(validator = %validator.consensus_address, from = %validator.signer_address, to = %signer, "Signer changed");
            validator.signer_address = signer;
        }
        if let Some(proposal) = proposal {
            state.delete_proposal_reservation(&validator.proposal_address)?;
            state.put_proposal_reservation(&proposal)?;
            debug!(validator = %validator.consensus_address, from = %validator.proposal_address, to = %proposal, "Proposal address changed");
            validator.proposal_address = proposal;
        }
        Ok(())
    }

    /// Append `consensus` to the validator list.
    pub fn add_to_all<S: KvStore>(state: &mut NodeState<S>, consensus: Address) -> StakingResult<()> {
        let mut all = state.all_validators()?;
        if all.len() >= MAX_VALIDATOR_NUM {
            return Err(StakingError::TooManyValidators {
                max: MAX_VALIDATOR_NUM,
            });
        }
        all.push(consensus);
        state.put_all_validators(&all)
    }

    /// Drop `consensus` from the validator list, keeping the order of the rest.
    pub fn remove_from_all<S: KvStore>(state: &mut NodeState<S>, consensus: &Address) -> StakingResult<()> {
        let mut all = state.all_validators()?;
        all.retain(|a| a != consensus);
        state.put_all_validators(&all)
    }

    /// Validator by consensus address.
    pub fn get<S: KvRead>(state: &NodeState<S>, consensus: &Address) -> StakingResult<Option<Validator>> {
        state.validator(consensus)
    }

    /// All registered validators in registration order.
    pub fn all<S: KvRead>(state: &NodeState<S>) -> StakingResult<Vec<Validator>> {
        state
            .all_validators()?
            .iter()
            .map(|addr| state.require_validator(addr))
            .collect()
    }
}
