//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write configuration file
    #[error("Failed to write config file at {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML configuration
    #[error("Failed to serialize TOML config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Failed to parse JSON (genesis)
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Invalid chain ID (must be non-zero)
    #[error("Invalid chain ID: chain_id must be non-zero")]
    InvalidChainId,

    /// Module addresses must be distinct and non-zero
    #[error("Invalid module address for {0}")]
    InvalidModuleAddress(&'static str),

    /// Invalid minimum stake
    #[error("Invalid minimum stake: min_initial_stake cannot be zero")]
    InvalidMinStake,

    /// Invalid epoch length
    #[error("Invalid epoch length: blocks_per_epoch must be positive")]
    InvalidEpochLength,

    /// Invalid validator roster sizes
    #[error("Invalid validator counts: consensus={consensus}, voter={voter} (need 1 <= voter <= consensus)")]
    InvalidValidatorCounts { consensus: u64, voter: u64 },

    /// Invalid basis points value
    #[error("Invalid {name}: must be <= 10000 basis points, got {value}")]
    InvalidBasisPoints { name: &'static str, value: u16 },

    /// Invalid balance string
    #[error("Invalid balance value: {0}")]
    InvalidBalance(String),

    /// Duplicate genesis account
    #[error("Duplicate genesis account: {0}")]
    DuplicateAccount(String),

    /// Duplicate genesis validator identity
    #[error("Duplicate genesis validator {field}: {address}")]
    DuplicateValidator { field: &'static str, address: String },

    /// No genesis validators configured
    #[error("No genesis validators configured: at least one validator required")]
    NoValidators,

    /// Genesis validator stake below minimum
    #[error("Genesis validator {address} has stake {stake} below minimum {min_stake}")]
    ValidatorStakeBelowMinimum {
        address: String,
        stake: String,
        min_stake: String,
    },

    /// Total genesis allocation exceeds supply
    #[error("Genesis supply mismatch: genesis_supply={total_supply}, distributed={distributed}")]
    SupplyMismatch {
        total_supply: String,
        distributed: String,
    },

    /// Invalid quorum rule
    #[error("Invalid {name} quorum rule: fixed thresholds must be at least 1")]
    InvalidQuorumRule { name: &'static str },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Invalid log level
    #[error("Invalid log level: {0}. Valid values: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Invalid log format
    #[error("Invalid log format: {0}. Valid values: json, pretty, compact")]
    InvalidLogFormat(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
