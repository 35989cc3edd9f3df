//! Node initialization command.
//!
//! This module handles the `zenith init` command, which writes a
//! configuration file with a devnet genesis: one freshly generated key set
//! per validator, each validator self-staking the same amount.

use clap::Parser;
use k256::ecdsa::SigningKey;
use k256::SecretKey;
use rand::rngs::OsRng;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use zenith_config::{Config, GenesisValidator};
use zenith_governance::address_of;
use zenith_types::Address;

use crate::utils::{
    format_balance, parse_amount, print_info, print_success, print_warning, CliError, CliResult,
    OutputFormat,
};
use crate::{DEFAULT_CONFIG_FILE, DEFAULT_KEYS_DIR};

/// Arguments for the init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Data directory for the configuration, keys and state
    #[arg(short, long)]
    pub data_dir: Option<String>,

    /// Chain ID for the network
    #[arg(long, default_value = "1")]
    pub chain_id: u64,

    /// Number of genesis validators
    #[arg(long, default_value = "4")]
    pub validators: u32,

    /// Self stake of each genesis validator (base units, or tokens with a `zen` suffix)
    #[arg(long, default_value = "100000zen")]
    pub stake: String,

    /// Commission rate of each genesis validator in basis points
    #[arg(long, default_value = "1000")]
    pub commission: u16,

    /// Epoch length in blocks
    #[arg(long)]
    pub blocks_per_epoch: Option<u64>,

    /// Overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

/// Private keys of one genesis validator, hex encoded.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatorKeys {
    /// Owner (stake) account
    pub owner: KeyPair,
    /// Consensus identity
    pub consensus: KeyPair,
    /// Signer identity for quorum-gated actions
    pub signer: KeyPair,
    /// Proposal identity
    pub proposal: KeyPair,
}

/// A generated key and its address.
#[derive(Debug, Clone, Serialize)]
pub struct KeyPair {
    /// Address derived from the key
    pub address: Address,
    /// Hex-encoded private key
    pub private_key: String,
}

impl KeyPair {
    fn generate() -> Self {
        let key = SigningKey::from(SecretKey::random(&mut OsRng));
        Self {
            address: address_of(key.verifying_key()),
            private_key: hex::encode(key.to_bytes()),
        }
    }
}

/// Result of the init command
#[derive(Debug, Serialize)]
struct InitResult {
    data_dir: String,
    config_file: String,
    keys_dir: String,
    chain_id: u64,
    validators: Vec<Address>,
}

/// Execute the init command
pub fn execute(args: InitArgs, output_format: OutputFormat) -> CliResult<()> {
    let data_dir = args
        .data_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(crate::default_data_dir);

    print_info(&format!("Initializing Zenith devnet at: {}", data_dir.display()));

    let config_path = data_dir.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() {
        if !args.force {
            return Err(CliError::InvalidArgument(format!(
                "Configuration already exists at {}. Use --force to overwrite.",
                config_path.display()
            )));
        }
        print_warning("Overwriting existing configuration and keys");
    }

    let (config, keys) = devnet_config(&args, &data_dir)?;

    let keys_dir = data_dir.join(DEFAULT_KEYS_DIR);
    fs::create_dir_all(&keys_dir)?;
    config.save(&config_path)?;
    write_keys(&keys_dir, &keys)?;

    let result = InitResult {
        data_dir: data_dir.to_string_lossy().to_string(),
        config_file: config_path.to_string_lossy().to_string(),
        keys_dir: keys_dir.to_string_lossy().to_string(),
        chain_id: config.chain.chain_id,
        validators: keys.iter().map(|k| k.consensus.address).collect(),
    };

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            print_success("Zenith devnet initialized");
            println!();
            println!("Configuration:");
            println!("  Data Directory: {}", result.data_dir);
            println!("  Config File:    {}", result.config_file);
            println!("  Keys:           {}", result.keys_dir);
            println!("  Chain ID:       {}", result.chain_id);
            println!();
            println!("Genesis validators:");
            for (i, v) in config.genesis.validators.iter().enumerate() {
                println!(
                    "  {:>2}. {}  stake {}  commission {}bp",
                    i + 1,
                    v.consensus_address,
                    format_balance(v.stake),
                    v.commission
                );
            }
        }
    }

    Ok(())
}

/// Build a validated devnet configuration with freshly generated validator keys.
pub fn devnet_config(args: &InitArgs, data_dir: &Path) -> CliResult<(Config, Vec<ValidatorKeys>)> {
    if args.validators == 0 {
        return Err(CliError::InvalidArgument(
            "at least one genesis validator is required".into(),
        ));
    }
    let stake = parse_amount(&args.stake)?;

    let mut config = Config::default();
    config.chain.chain_id = args.chain_id;
    config.storage.data_dir = data_dir.join("state").to_string_lossy().to_string();
    if let Some(blocks) = args.blocks_per_epoch {
        config.staking.blocks_per_epoch = blocks;
    }

    let keys: Vec<ValidatorKeys> = (0..args.validators)
        .map(|_| ValidatorKeys {
            owner: KeyPair::generate(),
            consensus: KeyPair::generate(),
            signer: KeyPair::generate(),
            proposal: KeyPair::generate(),
        })
        .collect();
    config.genesis.validators = keys
        .iter()
        .enumerate()
        .map(|(i, k)| GenesisValidator {
            owner: k.owner.address,
            consensus_address: k.consensus.address,
            signer_address: k.signer.address,
            proposal_address: k.proposal.address,
            commission: args.commission,
            stake,
            desc: format!("devnet validator {}", i + 1),
        })
        .collect();

    config.validate()?;
    Ok((config, keys))
}

fn write_keys(keys_dir: &Path, keys: &[ValidatorKeys]) -> CliResult<()> {
    for (i, key) in keys.iter().enumerate() {
        let path = keys_dir.join(format!("validator-{}.json", i + 1));
        fs::write(&path, serde_json::to_string_pretty(key)?)?;
    }
    Ok(())
}
