//! Tests for Config module

use alloy_primitives::U256;
use tempfile::TempDir;
use zenith_config::{
    ChainConfig, CommunityConfig, Config, ConfigError, GovernanceConfig, LoggingConfig,
    QuorumRule, StakingConfig,
};

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.chain.chain_id, 1);
    assert_eq!(config.staking.blocks_per_epoch, 400_000);
    assert_eq!(config.community.rate, 2_000);
    assert_eq!(config.governance.signer_quorum, QuorumRule::TwoThirds);
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_chain_id() {
    let mut config = ChainConfig::default();
    config.chain_id = 0;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidChainId)));
}

#[test]
fn test_module_addresses_must_differ() {
    let mut config = ChainConfig::default();
    config.info_sync_address = config.node_manager_address;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidModuleAddress("info_sync_address"))
    ));
}

#[test]
fn test_max_commission_change_over_hundred_percent() {
    let mut config = StakingConfig::default();
    config.max_commission_change = 10_001;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidBasisPoints {
            name: "max_commission_change",
            value: 10_001
        })
    ));
}

#[test]
fn test_zero_min_stake() {
    let mut config = StakingConfig::default();
    config.min_initial_stake = U256::ZERO;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidMinStake)));
}

#[test]
fn test_voters_cannot_exceed_consensus_roster() {
    let mut config = StakingConfig::default();
    config.consensus_validator_num = 4;
    config.voter_validator_num = 5;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValidatorCounts {
            consensus: 4,
            voter: 5
        })
    ));
}

#[test]
fn test_community_rate_bound() {
    let mut config = CommunityConfig::default();
    config.rate = 10_100;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidBasisPoints { value: 10_100, .. })
    ));
}

#[test]
fn test_quorum_thresholds() {
    assert_eq!(QuorumRule::TwoThirds.threshold(1), 1);
    assert_eq!(QuorumRule::TwoThirds.threshold(3), 2);
    assert_eq!(QuorumRule::TwoThirds.threshold(4), 3);
    assert_eq!(QuorumRule::TwoThirds.threshold(21), 14);
    assert_eq!(QuorumRule::Majority.threshold(4), 3);
    assert_eq!(QuorumRule::Majority.threshold(5), 3);
    assert_eq!(QuorumRule::Fixed(2).threshold(10), 2);
}

#[test]
fn test_fixed_zero_quorum_rejected() {
    let mut config = GovernanceConfig::default();
    config.voter_quorum = QuorumRule::Fixed(0);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidQuorumRule { name: "voter" })
    ));
}

#[test]
fn test_invalid_log_format() {
    let mut config = LoggingConfig::default();
    config.format = "xml".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidLogFormat(_))
    ));
}

#[test]
fn test_parse_toml() {
    let toml = r#"
        [chain]
        chain_id = 77
        chain_name = "zenith-test"
        node_manager_address = "0x0000000000000000000000000000000000001000"
        cross_chain_manager_address = "0x0000000000000000000000000000000000001003"
        info_sync_address = "0x0000000000000000000000000000000000001002"
        genesis_supply = "1000000"
        reward_per_block = "10"

        [staking]
        max_commission_change = 100
        min_initial_stake = "1000"
        min_proposal_stake = "10"
        blocks_per_epoch = 20
        consensus_validator_num = 4
        voter_validator_num = 3

        [community]
        rate = 1000
        address = "0x00000000000000000000000000000000000c0000"

        [governance]
        signer_quorum = "majority"
        voter_quorum = { fixed = 2 }

        [storage]
        data_dir = "/tmp/zenith"

        [logging]
        level = "debug"
        format = "json"
    "#;

    let config = Config::from_str(toml).unwrap();
    assert_eq!(config.chain.chain_id, 77);
    assert_eq!(config.chain.reward_per_block, U256::from(10u64));
    assert_eq!(config.staking.min_initial_stake, U256::from(1000u64));
    assert_eq!(config.governance.signer_quorum, QuorumRule::Majority);
    assert_eq!(config.governance.voter_quorum, QuorumRule::Fixed(2));
    assert!(config.genesis.is_empty());
}

#[test]
fn test_save_and_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zenith.toml");

    let mut config = Config::default();
    config.chain.chain_name = "roundtrip".to_string();
    config.governance.voter_quorum = QuorumRule::Fixed(3);
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.chain.chain_name, "roundtrip");
    assert_eq!(loaded.chain.genesis_supply, config.chain.genesis_supply);
    assert_eq!(loaded.governance.voter_quorum, QuorumRule::Fixed(3));
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = Config::load(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::FileRead { .. })));
}
