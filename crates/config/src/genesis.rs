//! Genesis configuration
//!
//! This module describes the initial state of the node manager: funded
//! accounts and the validators that form the roster of epoch 1.

use crate::config::{deserialize_u256, serialize_u256, ChainConfig, StakingConfig, MAX_BASIS_POINTS};
use crate::error::{ConfigError, ConfigResult};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Genesis configuration containing initial state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Initial accounts with balances
    #[serde(default)]
    pub accounts: Vec<GenesisAccount>,

    /// Initial validators
    #[serde(default)]
    pub validators: Vec<GenesisValidator>,
}

impl GenesisConfig {
    /// Load genesis configuration from a JSON file.
    ///
    /// This is an alternative to embedding genesis in the TOML config,
    /// useful for sharing genesis state across multiple nodes.
    pub fn load_json(path: &Path) -> ConfigResult<Self> {
        info!("Loading genesis from JSON file: {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let genesis: GenesisConfig = serde_json::from_str(&content)?;
        Ok(genesis)
    }

    /// Save genesis configuration to a JSON file.
    pub fn save_json(&self, path: &Path) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// True if neither accounts nor validators are configured.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.validators.is_empty()
    }

    /// Validate the genesis configuration.
    pub fn validate(&self, chain: &ChainConfig, staking: &StakingConfig) -> ConfigResult<()> {
        debug!("Validating genesis configuration");

        if self.validators.is_empty() {
            return Err(ConfigError::NoValidators);
        }

        let mut seen_accounts = HashSet::new();
        for account in &self.accounts {
            if !seen_accounts.insert(account.address) {
                return Err(ConfigError::DuplicateAccount(account.address.to_string()));
            }
        }

        // Consensus, signer and proposal identities are each globally unique
        let mut seen_consensus = HashSet::new();
        let mut seen_signers = HashSet::new();
        let mut seen_proposals = HashSet::new();

        for validator in &self.validators {
            validator.validate()?;

            if !seen_consensus.insert(validator.consensus_address) {
                return Err(ConfigError::DuplicateValidator {
                    field: "consensus_address",
                    address: validator.consensus_address.to_string(),
                });
            }
            if !seen_signers.insert(validator.signer_address) {
                return Err(ConfigError::DuplicateValidator {
                    field: "signer_address",
                    address: validator.signer_address.to_string(),
                });
            }
            if !seen_proposals.insert(validator.proposal_address) {
                return Err(ConfigError::DuplicateValidator {
                    field: "proposal_address",
                    address: validator.proposal_address.to_string(),
                });
            }

            if validator.stake < staking.min_initial_stake {
                return Err(ConfigError::ValidatorStakeBelowMinimum {
                    address: validator.consensus_address.to_string(),
                    stake: validator.stake.to_string(),
                    min_stake: staking.min_initial_stake.to_string(),
                });
            }
        }

        let distributed = self
            .total_account_balance()
            .checked_add(self.total_validator_stake())
            .ok_or_else(|| ConfigError::InvalidBalance("genesis allocation overflows".into()))?;
        if distributed > chain.genesis_supply {
            return Err(ConfigError::SupplyMismatch {
                total_supply: chain.genesis_supply.to_string(),
                distributed: distributed.to_string(),
            });
        }

        debug!(
            accounts = self.accounts.len(),
            validators = self.validators.len(),
            "Genesis validation passed"
        );

        Ok(())
    }

    /// Calculate total stake from genesis validators.
    pub fn total_validator_stake(&self) -> U256 {
        self.validators
            .iter()
            .fold(U256::ZERO, |acc, v| acc.saturating_add(v.stake))
    }

    /// Calculate total balance from genesis accounts.
    pub fn total_account_balance(&self) -> U256 {
        self.accounts
            .iter()
            .fold(U256::ZERO, |acc, a| acc.saturating_add(a.balance))
    }
}

/// Genesis account with initial balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisAccount {
    /// Account address
    pub address: Address,

    /// Initial balance (in smallest unit)
    #[serde(deserialize_with = "deserialize_u256", serialize_with = "serialize_u256")]
    pub balance: U256,
}

/// Genesis validator.
///
/// The stake is minted to the owner and then delegated, so the owner needs
/// no separate genesis balance for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisValidator {
    /// Owner (stake) account
    pub owner: Address,

    /// Consensus identity
    pub consensus_address: Address,

    /// Signer identity used for quorum-gated actions
    pub signer_address: Address,

    /// Proposal identity
    pub proposal_address: Address,

    /// Commission rate in basis points
    pub commission: u16,

    /// Initial self stake (in smallest unit)
    #[serde(deserialize_with = "deserialize_u256", serialize_with = "serialize_u256")]
    pub stake: U256,

    /// Free-form description
    #[serde(default)]
    pub desc: String,
}

impl GenesisValidator {
    /// Validate a single genesis validator.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.commission > MAX_BASIS_POINTS {
            return Err(ConfigError::InvalidBasisPoints {
                name: "commission",
                value: self.commission,
            });
        }
        if self.owner.is_zero() {
            return Err(ConfigError::MissingField("genesis.validators.owner"));
        }
        if self.consensus_address.is_zero() {
            return Err(ConfigError::MissingField("genesis.validators.consensus_address"));
        }
        Ok(())
    }
}
