//! Tests for Genesis module

use alloy_primitives::{Address, U256};
use tempfile::TempDir;
use zenith_config::{
    ChainConfig, ConfigError, GenesisAccount, GenesisConfig, GenesisValidator, StakingConfig,
};

fn test_validator(byte: u8) -> GenesisValidator {
    GenesisValidator {
        owner: Address::repeat_byte(byte),
        consensus_address: Address::repeat_byte(byte.wrapping_add(0x40)),
        signer_address: Address::repeat_byte(byte.wrapping_add(0x80)),
        proposal_address: Address::repeat_byte(byte.wrapping_add(0xc0)),
        commission: 1000,
        stake: StakingConfig::default().min_initial_stake,
        desc: "genesis".to_string(),
    }
}

fn test_account(byte: u8) -> GenesisAccount {
    GenesisAccount {
        address: Address::repeat_byte(byte),
        balance: U256::from(1_000u64),
    }
}

fn genesis() -> GenesisConfig {
    GenesisConfig {
        accounts: vec![test_account(1), test_account(2)],
        validators: vec![test_validator(1), test_validator(2)],
    }
}

#[test]
fn test_valid_genesis() {
    let genesis = genesis();
    assert!(genesis
        .validate(&ChainConfig::default(), &StakingConfig::default())
        .is_ok());
}

#[test]
fn test_no_validators() {
    let genesis = GenesisConfig {
        accounts: vec![test_account(1)],
        validators: Vec::new(),
    };
    assert!(matches!(
        genesis.validate(&ChainConfig::default(), &StakingConfig::default()),
        Err(ConfigError::NoValidators)
    ));
}

#[test]
fn test_duplicate_account() {
    let mut genesis = genesis();
    genesis.accounts.push(test_account(1));
    assert!(matches!(
        genesis.validate(&ChainConfig::default(), &StakingConfig::default()),
        Err(ConfigError::DuplicateAccount(_))
    ));
}

#[test]
fn test_duplicate_signer_across_validators() {
    let mut genesis = genesis();
    genesis.validators[1].signer_address = genesis.validators[0].signer_address;
    assert!(matches!(
        genesis.validate(&ChainConfig::default(), &StakingConfig::default()),
        Err(ConfigError::DuplicateValidator {
            field: "signer_address",
            ..
        })
    ));
}

#[test]
fn test_stake_below_minimum() {
    let mut genesis = genesis();
    genesis.validators[0].stake = U256::from(1u64);
    assert!(matches!(
        genesis.validate(&ChainConfig::default(), &StakingConfig::default()),
        Err(ConfigError::ValidatorStakeBelowMinimum { .. })
    ));
}

#[test]
fn test_commission_over_hundred_percent() {
    let mut validator = test_validator(1);
    validator.commission = 10_100;
    assert!(matches!(
        validator.validate(),
        Err(ConfigError::InvalidBasisPoints {
            name: "commission",
            value: 10_100
        })
    ));
}

#[test]
fn test_allocation_exceeds_supply() {
    let genesis = genesis();
    let mut chain = ChainConfig::default();
    chain.genesis_supply = U256::from(10u64);
    assert!(matches!(
        genesis.validate(&chain, &StakingConfig::default()),
        Err(ConfigError::SupplyMismatch { .. })
    ));
}

#[test]
fn test_totals() {
    let genesis = genesis();
    assert_eq!(genesis.total_account_balance(), U256::from(2_000u64));
    assert_eq!(
        genesis.total_validator_stake(),
        StakingConfig::default().min_initial_stake * U256::from(2u64)
    );
}

#[test]
fn test_json_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("genesis.json");

    let genesis = genesis();
    genesis.save_json(&path).unwrap();
    let loaded = GenesisConfig::load_json(&path).unwrap();

    assert_eq!(loaded.validators.len(), 2);
    assert_eq!(loaded.validators[0].consensus_address, genesis.validators[0].consensus_address);
    assert_eq!(loaded.accounts[1].balance, U256::from(1_000u64));
}
