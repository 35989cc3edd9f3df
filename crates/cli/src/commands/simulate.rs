//! Local block simulation.
//!
//! This module handles the `zenith simulate` command: it loads a
//! configuration, initializes genesis if the store is fresh, and runs
//! `end_block` for a range of heights, reporting epoch rotations and the
//! reward state of every validator.

use clap::Parser;
use serde::{Serialize, Serializer};
use std::path::PathBuf;
use tracing::info;
use zenith_config::Config;
use zenith_core::KvStore;
use zenith_staking::{NodeManager, StakingError};
use zenith_storage::{MemoryStore, RocksStore};
use zenith_types::{Address, Dec, U256};

use crate::commands::LogSettings;
use crate::utils::{format_balance, print_info, print_success, CliError, CliResult, OutputFormat};

/// Arguments for the simulate command
#[derive(Parser, Debug)]
pub struct SimulateArgs {
    /// Configuration file (default: ~/.zenith/zenith.toml)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Number of blocks to run
    #[arg(short, long, default_value = "100")]
    pub blocks: u64,

    /// Persist state in a RocksDB database at this path
    #[arg(long)]
    pub db: Option<String>,

    /// Persist state in the configured data directory
    #[arg(long, conflicts_with = "db")]
    pub persist: bool,
}

/// An epoch rotation observed during the run
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RotationRecord {
    /// Height of the block that ended the previous epoch
    pub height: u64,
    /// Id of the new epoch
    pub epoch: u64,
    /// Size of the new consensus roster
    pub validators: usize,
    /// Size of the new voter roster
    pub voters: usize,
}

/// Reward state of one validator at the end of the run
#[derive(Debug, Clone, Serialize)]
pub struct ValidatorReport {
    /// Consensus identity
    pub consensus_address: Address,
    /// Lifecycle status
    pub status: &'static str,
    /// Total delegated stake
    #[serde(serialize_with = "display")]
    pub total_stake: Dec,
    /// Rewards the validator still owes
    #[serde(serialize_with = "display")]
    pub outstanding: Dec,
    /// Undrawn commission
    #[serde(serialize_with = "display")]
    pub commission: Dec,
    /// Rewards the owner would receive for its self stake
    #[serde(serialize_with = "display")]
    pub owner_rewards: Dec,
}

/// Result of a simulation run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// First height run
    pub start_height: u64,
    /// Last height run
    pub end_height: u64,
    /// Whether genesis was initialized by this run
    pub genesis: bool,
    /// Current epoch at the end of the run
    pub epoch: u64,
    /// Rotations during the run
    pub rotations: Vec<RotationRecord>,
    /// Rewards allocated to validators during the run
    #[serde(serialize_with = "display")]
    pub allocated: Dec,
    /// Total supply at the end of the run
    #[serde(serialize_with = "display")]
    pub total_supply: U256,
    /// Total stake
    #[serde(serialize_with = "display")]
    pub total_pool: Dec,
    /// Sum of all outstanding rewards
    #[serde(serialize_with = "display")]
    pub outstanding: Dec,
    /// Per-validator reward state
    pub validators: Vec<ValidatorReport>,
}

fn display<T: std::fmt::Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Execute the simulate command
pub fn execute(args: SimulateArgs, output_format: OutputFormat, logging: LogSettings) -> CliResult<()> {
    let config_path = args
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(crate::default_config_path);
    if !config_path.exists() {
        return Err(CliError::FileNotFound(config_path.display().to_string()));
    }
    let config = Config::load(&config_path)?;
    logging.init(Some(&config.logging));

    let db_path = match (&args.db, args.persist) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(config.storage.data_dir.clone()),
        (None, false) => None,
    };

    let report = match db_path {
        Some(path) => {
            print_info(&format!("Simulating {} blocks on {}", args.blocks, path));
            let store = RocksStore::open_default(&path)?;
            let from = store.last_height()?.map_or(1, |h| h + 1);
            let mut manager = NodeManager::from_config(store, &config)?;
            let report = run(&mut manager, &config, from, args.blocks)?;
            manager.store().set_last_height(report.end_height)?;
            manager.store().flush()?;
            report
        }
        None => {
            print_info(&format!("Simulating {} blocks in memory", args.blocks));
            let mut manager = NodeManager::from_config(MemoryStore::new(), &config)?;
            run(&mut manager, &config, 1, args.blocks)?
        }
    };

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_report(&report),
    }
    Ok(())
}

/// Run `blocks` blocks starting at height `from`, initializing genesis first
/// if the store has none.
pub fn run<S: KvStore>(
    manager: &mut NodeManager<S>,
    config: &Config,
    from: u64,
    blocks: u64,
) -> CliResult<SimulationReport> {
    if from == 0 {
        return Err(CliError::InvalidArgument("blocks start at height 1".into()));
    }

    let genesis = match manager.current_epoch_info() {
        Ok(_) => false,
        Err(StakingError::EpochNotFound(_)) => {
            manager.init_genesis(&config.genesis.accounts, &config.genesis.validators, from - 1)?;
            info!(validators = config.genesis.validators.len(), "Genesis initialized");
            true
        }
        Err(e) => return Err(e.into()),
    };

    let mut rotations = Vec::new();
    let mut allocated = Dec::ZERO;
    let end_height = from.saturating_add(blocks).saturating_sub(1);
    for height in from..=end_height {
        let outcome = manager.end_block(height)?;
        allocated = allocated.checked_add(outcome.allocated).map_err(StakingError::from)?;
        if let Some(id) = outcome.rotated_to {
            let epoch = manager.current_epoch_info()?;
            rotations.push(RotationRecord {
                height,
                epoch: id,
                validators: epoch.validators.len(),
                voters: epoch.voters.len(),
            });
        }
    }

    let mut validators = Vec::new();
    for v in manager.all_validators()? {
        let rewards = manager.validator_rewards(&v.consensus_address)?;
        validators.push(ValidatorReport {
            consensus_address: v.consensus_address,
            status: v.status.as_str(),
            total_stake: v.total_stake,
            outstanding: rewards.outstanding.rewards,
            commission: rewards.commission.amount,
            owner_rewards: manager.pending_stake_rewards(&v.owner, &v.consensus_address)?,
        });
    }

    Ok(SimulationReport {
        start_height: from,
        end_height,
        genesis,
        epoch: manager.current_epoch_info()?.id,
        rotations,
        allocated,
        total_supply: manager.total_supply(end_height)?,
        total_pool: manager.total_pool()?,
        outstanding: manager.outstanding_rewards()?.rewards,
        validators,
    })
}

fn print_report(report: &SimulationReport) {
    print_success(&format!(
        "Ran blocks {}..={}",
        report.start_height, report.end_height
    ));
    println!();
    if report.genesis {
        println!("Genesis initialized at height {}", report.start_height - 1);
    }
    for r in &report.rotations {
        println!(
            "  height {:>8}: epoch {:>4}  validators {:>3}  voters {:>3}",
            r.height, r.epoch, r.validators, r.voters
        );
    }
    println!();
    println!("Summary:");
    println!("  Epoch:         {}", report.epoch);
    println!("  Total supply:  {}", format_balance(report.total_supply));
    println!("  Total stake:   {}", format_balance(report.total_pool.truncate()));
    println!("  Allocated:     {}", format_balance(report.allocated.truncate()));
    println!("  Outstanding:   {}", format_balance(report.outstanding.truncate()));
    println!();
    println!("Validators:");
    for v in &report.validators {
        println!("  {} ({})", v.consensus_address, v.status);
        println!("    stake       {}", format_balance(v.total_stake.truncate()));
        println!("    outstanding {}", format_balance(v.outstanding.truncate()));
        println!("    commission  {}", format_balance(v.commission.truncate()));
        println!("    owner share {}", format_balance(v.owner_rewards.truncate()));
    }
}
