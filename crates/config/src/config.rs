//! Main configuration module for Zenith
//!
//! All node manager settings live in one `zenith.toml` file. Sections map to
//! the on-chain modules they parameterize; `[staking]` doubles as the genesis
//! default for the on-chain global configuration record.

use crate::error::{ConfigError, ConfigResult};
use crate::genesis::GenesisConfig;
use alloy_primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// 100% in basis points.
pub const MAX_BASIS_POINTS: u16 = 10_000;

/// Main configuration struct containing all Zenith settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Chain identity and issuance
    pub chain: ChainConfig,

    /// Validator and epoch parameters
    pub staking: StakingConfig,

    /// Community pool parameters
    pub community: CommunityConfig,

    /// Quorum rules for gated governance actions
    pub governance: GovernanceConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Genesis configuration (accounts and validators)
    #[serde(default)]
    pub genesis: GenesisConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use zenith_config::Config;
    /// use std::path::Path;
    ///
    /// let config = Config::load(Path::new("zenith.toml"))?;
    /// ```
    pub fn load(path: &Path) -> ConfigResult<Self> {
        info!("Loading configuration from {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)?;

        debug!("Configuration parsed successfully, validating...");
        config.validate()?;

        info!(
            chain_id = config.chain.chain_id,
            chain_name = %config.chain.chain_name,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Load configuration from a TOML string.
    ///
    /// Useful for testing or when configuration is provided as a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.chain.validate()?;
        self.staking.validate()?;
        self.community.validate()?;
        self.governance.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;

        // An empty genesis is allowed for tooling; a populated one must be consistent
        if !self.genesis.is_empty() {
            self.genesis.validate(&self.chain, &self.staking)?;
        }

        debug!("Configuration validation passed");
        Ok(())
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }
}

// =============================================================================
// Chain Configuration
// =============================================================================

/// Chain identity, module addresses and issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Unique chain identifier
    pub chain_id: u64,

    /// Human-readable chain name
    pub chain_name: String,

    /// Account of the node manager module
    pub node_manager_address: Address,

    /// Account of the cross-chain manager module (chain blacklist)
    pub cross_chain_manager_address: Address,

    /// Account of the info sync module (root info)
    pub info_sync_address: Address,

    /// Total supply at genesis (in smallest unit)
    #[serde(deserialize_with = "deserialize_u256", serialize_with = "serialize_u256")]
    pub genesis_supply: U256,

    /// Tokens issued per block (in smallest unit)
    #[serde(deserialize_with = "deserialize_u256", serialize_with = "serialize_u256")]
    pub reward_per_block: U256,
}

impl ChainConfig {
    /// Validate chain settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.chain_id == 0 {
            return Err(ConfigError::InvalidChainId);
        }

        let modules = [
            ("node_manager_address", self.node_manager_address),
            ("cross_chain_manager_address", self.cross_chain_manager_address),
            ("info_sync_address", self.info_sync_address),
        ];
        for (i, (name, addr)) in modules.iter().enumerate() {
            if addr.is_zero() || modules[..i].iter().any(|(_, other)| other == addr) {
                return Err(ConfigError::InvalidModuleAddress(name));
            }
        }

        Ok(())
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            chain_name: "Zenith Local".to_string(),
            node_manager_address: address!("0000000000000000000000000000000000001000"),
            cross_chain_manager_address: address!("0000000000000000000000000000000000001003"),
            info_sync_address: address!("0000000000000000000000000000000000001002"),
            genesis_supply: U256::from(1_000_000_000u64) * U256::from(10u64).pow(U256::from(18u64)),
            reward_per_block: U256::from(10u64).pow(U256::from(18u64)),
        }
    }
}

// =============================================================================
// Staking Configuration
// =============================================================================

/// Staking parameters.
///
/// These are the genesis values of the on-chain global configuration; reads
/// of the on-chain record fall back to them while it has never been written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakingConfig {
    /// Maximum commission change per epoch in basis points
    pub max_commission_change: u16,

    /// Minimum stake to create a validator (in smallest unit)
    #[serde(deserialize_with = "deserialize_u256", serialize_with = "serialize_u256")]
    pub min_initial_stake: U256,

    /// Minimum self stake to submit a proposal (in smallest unit)
    #[serde(deserialize_with = "deserialize_u256", serialize_with = "serialize_u256")]
    pub min_proposal_stake: U256,

    /// Epoch length in blocks
    pub blocks_per_epoch: u64,

    /// Size of the consensus validator roster
    pub consensus_validator_num: u64,

    /// Size of the voter roster (taken from the top of the consensus roster)
    pub voter_validator_num: u64,
}

impl StakingConfig {
    /// Validate staking settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_commission_change > MAX_BASIS_POINTS {
            return Err(ConfigError::InvalidBasisPoints {
                name: "max_commission_change",
                value: self.max_commission_change,
            });
        }

        if self.min_initial_stake.is_zero() {
            return Err(ConfigError::InvalidMinStake);
        }

        if self.blocks_per_epoch == 0 {
            return Err(ConfigError::InvalidEpochLength);
        }

        if self.consensus_validator_num == 0
            || self.voter_validator_num == 0
            || self.voter_validator_num > self.consensus_validator_num
        {
            return Err(ConfigError::InvalidValidatorCounts {
                consensus: self.consensus_validator_num,
                voter: self.voter_validator_num,
            });
        }

        Ok(())
    }
}

impl Default for StakingConfig {
    fn default() -> Self {
        let token = U256::from(10u64).pow(U256::from(18u64));
        Self {
            max_commission_change: 500,                            // 5%
            min_initial_stake: U256::from(100_000u64) * token,     // 100,000 tokens
            min_proposal_stake: U256::from(1_000u64) * token,      // 1,000 tokens
            blocks_per_epoch: 400_000,
            consensus_validator_num: 21,
            voter_validator_num: 14,
        }
    }
}

// =============================================================================
// Community Configuration
// =============================================================================

/// Community pool parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityConfig {
    /// Share of each block reward sent to the community pool, in basis points
    pub rate: u16,

    /// Community pool account
    pub address: Address,
}

impl CommunityConfig {
    /// Validate community settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.rate > MAX_BASIS_POINTS {
            return Err(ConfigError::InvalidBasisPoints {
                name: "community.rate",
                value: self.rate,
            });
        }
        if self.address.is_zero() {
            return Err(ConfigError::MissingField("community.address"));
        }
        Ok(())
    }
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            rate: 2_000, // 20%
            address: address!("00000000000000000000000000000000000c0000"),
        }
    }
}

// =============================================================================
// Governance Configuration
// =============================================================================

/// Threshold rule for a quorum-gated action.
///
/// In TOML: `"two-thirds"`, `"majority"` or `{ fixed = 3 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuorumRule {
    /// ceil(2n / 3) of the roster
    TwoThirds,
    /// floor(n / 2) + 1 of the roster
    Majority,
    /// A fixed number of distinct signers
    Fixed(u64),
}

impl QuorumRule {
    /// Number of distinct signers required for a roster of `roster_len`.
    pub fn threshold(&self, roster_len: usize) -> usize {
        match self {
            QuorumRule::TwoThirds => (2 * roster_len + 2) / 3,
            QuorumRule::Majority => roster_len / 2 + 1,
            QuorumRule::Fixed(n) => usize::try_from(*n).unwrap_or(usize::MAX),
        }
    }
}

/// Quorum rules per roster role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Rule applied to the consensus (signer) roster
    pub signer_quorum: QuorumRule,

    /// Rule applied to the voter roster
    pub voter_quorum: QuorumRule,
}

impl GovernanceConfig {
    /// Validate governance settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.signer_quorum == QuorumRule::Fixed(0) {
            return Err(ConfigError::InvalidQuorumRule { name: "signer" });
        }
        if self.voter_quorum == QuorumRule::Fixed(0) {
            return Err(ConfigError::InvalidQuorumRule { name: "voter" });
        }
        Ok(())
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            signer_quorum: QuorumRule::TwoThirds,
            voter_quorum: QuorumRule::TwoThirds,
        }
    }
}

// =============================================================================
// Storage Configuration
// =============================================================================

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory path
    pub data_dir: String,
}

impl StorageConfig {
    /// Validate storage settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.is_empty() {
            return Err(ConfigError::MissingField("storage.data_dir"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl LoggingConfig {
    /// Validate logging settings.
    pub fn validate(&self) -> ConfigResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.level.clone()));
        }

        let valid_formats = ["json", "pretty", "compact"];
        if !valid_formats.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogFormat(self.format.clone()));
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

// =============================================================================
// Amount helpers
// =============================================================================

/// Custom deserializer for U256 from a decimal string
pub(crate) fn deserialize_u256<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = serde::Deserialize::deserialize(deserializer)?;
    U256::from_str_radix(&s, 10).map_err(serde::de::Error::custom)
}

/// Custom serializer for U256 to a decimal string
pub(crate) fn serialize_u256<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&value.to_string())
}
