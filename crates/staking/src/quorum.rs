//! Threshold authorization for governance actions.
//!
//! An action is identified by its method name and canonical input bytes. Each
//! eligible signer registers at most once per action digest; the call that
//! reaches the threshold clears the collected signers and reports
//! [`QuorumOutcome::Authorized`]. The caller performs the action on that call
//! and only on that call.

use crate::error::{StakingError, StakingResult};
use crate::state::NodeState;
use crate::types::{ConsensusSign, QuorumRole};
use tracing::{debug, info};
use zenith_core::{KvRead, KvStore};
use zenith_types::{Address, B256};

/// Signer identities allowed to sign for a role in one epoch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    /// Epoch the roster belongs to
    pub epoch: u64,
    /// Eligible signer identities
    pub signers: Vec<Address>,
}

/// Where the quorum gate looks up rosters.
pub trait RosterSource {
    /// Current roster for `role`.
    fn roster(&self, role: QuorumRole) -> StakingResult<Roster>;
}

impl RosterSource for Roster {
    fn roster(&self, _role: QuorumRole) -> StakingResult<Roster> {
        Ok(self.clone())
    }
}

/// Result of registering a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuorumOutcome {
    /// Threshold reached on this call; the signer set has been cleared
    Authorized,
    /// Not yet authorized
    Pending {
        /// Distinct signers collected so far
        collected: usize,
        /// Signers required
        required: usize,
    },
}

impl QuorumOutcome {
    /// True only for [`QuorumOutcome::Authorized`].
    pub fn is_authorized(&self) -> bool {
        matches!(self, QuorumOutcome::Authorized)
    }
}

/// Quorum signature gate.
pub struct QuorumSignatureGate;

impl QuorumSignatureGate {
    /// Register `signer` for `(method, input)` against the current epoch's
    /// roster for `role`.
    pub fn check<S: KvStore>(
        state: &mut NodeState<S>,
        method: &str,
        input: &[u8],
        signer: &Address,
        role: QuorumRole,
    ) -> StakingResult<QuorumOutcome> {
        let roster = state.roster(role)?;
        Self::check_against(state, &roster, method, input, signer, role)
    }

    /// Like [`check`](Self::check) with rosters from `source`.
    pub fn check_with<S: KvStore, R: RosterSource + ?Sized>(
        state: &mut NodeState<S>,
        source: &R,
        method: &str,
        input: &[u8],
        signer: &Address,
        role: QuorumRole,
    ) -> StakingResult<QuorumOutcome> {
        let roster = source.roster(role)?;
        Self::check_against(state, &roster, method, input, signer, role)
    }

    /// Digest under which signatures for `(method, input)` are collected.
    pub fn digest(method: &str, input: &[u8]) -> B256 {
        ConsensusSign {
            method: method.to_string(),
            input: input.to_vec(),
        }
        .hash()
    }

    /// Signers collected so far for `(method, input)`.
    pub fn signers<S: KvRead>(
        state: &NodeState<S>,
        method: &str,
        input: &[u8],
    ) -> StakingResult<Vec<Address>> {
        Ok(state.signer_list(&Self::digest(method, input))?.signers)
    }

    fn check_against<S: KvStore>(
        state: &mut NodeState<S>,
        roster: &Roster,
        method: &str,
        input: &[u8],
        signer: &Address,
        role: QuorumRole,
    ) -> StakingResult<QuorumOutcome> {
        if !roster.signers.contains(signer) {
            return Err(StakingError::IneligibleSigner {
                signer: *signer,
                role,
                epoch: roster.epoch,
            });
        }

        let sign = ConsensusSign {
            method: method.to_string(),
            input: input.to_vec(),
        };
        let digest = sign.hash();
        let required = state
            .params()
            .quorum_rule(role)
            .threshold(roster.signers.len())
            .max(1);

        if state.sign_record(&digest)?.is_none() {
            state.put_sign_record(&digest, &sign)?;
        }

        let mut list = state.signer_list(&digest)?;
        // Signers collected under an earlier roster only count while still eligible
        let before = list.signers.len();
        list.signers.retain(|s| roster.signers.contains(s));
        if list.signers.len() != before {
            debug!(method, %digest, dropped = before - list.signers.len(), "Signers outside the current roster dropped");
        }
        if list.signers.contains(signer) {
            if list.signers.len() != before {
                state.put_signer_list(&digest, &list)?;
            }
            return Ok(QuorumOutcome::Pending {
                collected: list.signers.len(),
                required,
            });
        }
        list.signers.push(*signer);

        if list.signers.len() >= required {
            state.delete_signer_list(&digest)?;
            state.delete_sign_record(&digest)?;
            info!(method, %digest, %role, signers = list.signers.len(), "Quorum reached");
            return Ok(QuorumOutcome::Authorized);
        }

        state.put_signer_list(&digest, &list)?;
        debug!(method, %digest, %signer, collected = list.signers.len(), required, "Signature collected");
        Ok(QuorumOutcome::Pending {
            collected: list.signers.len(),
            required,
        })
    }
}
