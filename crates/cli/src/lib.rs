//! # Zenith CLI
//!
//! Command-line tools for the Zenith node manager.
//!
//! ## Available Commands
//!
//! - `init` - Write a configuration with a devnet genesis and validator keys
//! - `simulate` - Run genesis and a number of blocks through the node manager
//! - `version` - Display version information
//!
//! ## Example Usage
//!
//! ```bash
//! # Create ./devnet/zenith.toml with four validators
//! zenith init --data-dir ./devnet --validators 4
//!
//! # Run 1000 blocks in memory and print the reward summary
//! zenith simulate --config ./devnet/zenith.toml --blocks 1000
//!
//! # Persist the run; a later run continues from the last height
//! zenith simulate --config ./devnet/zenith.toml --blocks 1000 --db ./devnet/state
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod commands;
pub mod utils;

pub use commands::{run_cli, Cli, Commands};
pub use utils::{CliError, CliResult, OutputFormat};

/// Version information for the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI application name
pub const APP_NAME: &str = "zenith";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "zenith.toml";

/// Default data directory name
pub const DEFAULT_DATA_DIR: &str = ".zenith";

/// Directory under the data directory holding generated keys
pub const DEFAULT_KEYS_DIR: &str = "keys";

/// Get the default data directory path
pub fn default_data_dir() -> std::path::PathBuf {
    std::env::var_os("HOME")
        .map(|home| std::path::PathBuf::from(home).join(DEFAULT_DATA_DIR))
        .unwrap_or_else(|| std::path::PathBuf::from(DEFAULT_DATA_DIR))
}

/// Get the default configuration file path
pub fn default_config_path() -> std::path::PathBuf {
    default_data_dir().join(DEFAULT_CONFIG_FILE)
}
