//! Tests for commands/simulate.rs

use tempfile::tempdir;
use zenith_cli::commands::init::{devnet_config, InitArgs};
use zenith_cli::commands::simulate::run;
use zenith_config::Config;
use zenith_staking::NodeManager;
use zenith_storage::{MemoryStore, RocksStore};
use zenith_types::{Dec, U256};

fn config(dir: &std::path::Path) -> Config {
    let args = InitArgs {
        data_dir: None,
        chain_id: 1,
        validators: 4,
        stake: "100000zen".to_string(),
        commission: 1000,
        blocks_per_epoch: Some(10),
        force: false,
    };
    devnet_config(&args, dir).unwrap().0
}

#[test]
fn test_simulation_rotates_and_conserves_supply() {
    let temp_dir = tempdir().unwrap();
    let config = config(temp_dir.path());
    let mut manager = NodeManager::from_config(MemoryStore::new(), &config).unwrap();

    let report = run(&mut manager, &config, 1, 35).unwrap();
    assert!(report.genesis);
    assert_eq!(report.end_height, 35);
    assert_eq!(report.epoch, 4);
    assert_eq!(
        report.rotations.iter().map(|r| r.height).collect::<Vec<_>>(),
        vec![10, 20, 30]
    );
    assert_eq!(report.validators.len(), 4);

    // Every validator has the same stake, so every validator owes the same
    let owed = report.validators[0].outstanding;
    assert!(!owed.is_zero());
    assert!(report.validators.iter().all(|v| v.outstanding == owed));
    assert_eq!(report.outstanding, report.allocated);

    let reward = config.chain.reward_per_block;
    assert_eq!(
        report.total_supply,
        config.chain.genesis_supply + reward * U256::from(35u64)
    );
    let staking_share = reward - reward * U256::from(config.community.rate) / U256::from(10_000u64);
    assert_eq!(
        report.allocated,
        Dec::from_int(staking_share * U256::from(35u64)).unwrap()
    );
}

#[test]
fn test_simulation_continues_on_disk() {
    let temp_dir = tempdir().unwrap();
    let config = config(temp_dir.path());
    let db = temp_dir.path().join("state");

    {
        let store = RocksStore::open_default(&db).unwrap();
        let mut manager = NodeManager::from_config(store, &config).unwrap();
        let report = run(&mut manager, &config, 1, 12).unwrap();
        assert!(report.genesis);
        manager.store().set_last_height(report.end_height).unwrap();
    }

    let store = RocksStore::open_default(&db).unwrap();
    let from = store.last_height().unwrap().unwrap() + 1;
    let mut manager = NodeManager::from_config(store, &config).unwrap();
    let report = run(&mut manager, &config, from, 8).unwrap();
    assert!(!report.genesis);
    assert_eq!(report.start_height, 13);
    assert_eq!(report.end_height, 20);
    assert_eq!(report.epoch, 3);
}
