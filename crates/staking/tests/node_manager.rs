//! Validator lifecycle, epoch and quorum tests through the node manager

use zenith_config::{Config, GenesisValidator};
use zenith_core::Balances;
use zenith_staking::{
    CreateValidatorParams, NodeManager, QuorumRole, QuorumSignatureGate, StakingError,
    StakingResult, ValidatorStatus,
};
use zenith_storage::MemoryStore;
use zenith_types::{Address, Dec, U256};

const EPOCH: u64 = 10;

fn token(n: u64) -> U256 {
    U256::from(n)
}

fn genesis_validator(byte: u8, stake: u64) -> GenesisValidator {
    GenesisValidator {
        owner: Address::repeat_byte(byte + 0x50),
        consensus_address: Address::repeat_byte(byte),
        signer_address: Address::repeat_byte(byte + 0x10),
        proposal_address: Address::repeat_byte(byte + 0x20),
        commission: 1_000,
        stake: token(stake),
        desc: format!("validator {byte}"),
    }
}

fn manager(validators: Vec<GenesisValidator>) -> NodeManager<MemoryStore> {
    let mut config = Config::default();
    config.staking.min_initial_stake = token(100);
    config.staking.blocks_per_epoch = EPOCH;
    config.staking.consensus_validator_num = 4;
    config.staking.voter_validator_num = 2;
    config.chain.reward_per_block = token(10);
    config.genesis.validators = validators;

    let mut manager = NodeManager::from_config(MemoryStore::new(), &config).unwrap();
    manager
        .init_genesis(&config.genesis.accounts, &config.genesis.validators, 0)
        .unwrap();
    manager
}

fn fund(m: &mut NodeManager<MemoryStore>, who: &Address, amount: u64) {
    m.transact(|state| -> StakingResult<()> {
        state.balances().mint(who, token(amount))?;
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_genesis_epoch() {
    let m = manager(vec![
        genesis_validator(1, 100),
        genesis_validator(2, 300),
        genesis_validator(3, 200),
    ]);

    let epoch = m.current_epoch_info().unwrap();
    assert_eq!(epoch.id, 1);
    assert_eq!(
        epoch.consensus_addresses(),
        vec![
            Address::repeat_byte(2),
            Address::repeat_byte(3),
            Address::repeat_byte(1)
        ]
    );
    assert_eq!(epoch.voters.len(), 2);
    assert_eq!(m.total_pool().unwrap(), Dec::from_u64(600));
    assert_eq!(m.all_validators().unwrap().len(), 3);
}

#[test]
fn test_genesis_runs_once() {
    let mut m = manager(vec![genesis_validator(1, 100)]);
    assert!(matches!(
        m.init_genesis(&[], &[], 0),
        Err(StakingError::GenesisAlreadyInitialized(1))
    ));
}

#[test]
fn test_epochs_rotate_on_schedule() {
    let mut m = manager(vec![genesis_validator(1, 100)]);

    let mut rotations = Vec::new();
    for height in 1..=35 {
        if let Some(id) = m.end_block(height).unwrap().rotated_to {
            rotations.push((height, id));
        }
    }
    assert_eq!(rotations, vec![(10, 2), (20, 3), (30, 4)]);
    for id in 1..=4 {
        assert_eq!(m.epoch_info(id).unwrap().unwrap().id, id);
    }
    assert!(m.epoch_info(5).unwrap().is_none());
}

#[test]
fn test_new_validator_joins_at_next_epoch() {
    let mut m = manager(vec![genesis_validator(1, 100)]);
    let owner = Address::repeat_byte(0x99);
    fund(&mut m, &owner, 500);

    m.create_validator(
        &owner,
        CreateValidatorParams {
            consensus_address: Address::repeat_byte(9),
            signer_address: Address::repeat_byte(0x19),
            proposal_address: Address::repeat_byte(0x29),
            commission: 0,
            initial_stake: token(500),
            desc: String::new(),
        },
        3,
    )
    .unwrap();
    assert!(!m.current_epoch_info().unwrap().contains(&Address::repeat_byte(9)));

    for height in 1..=EPOCH {
        m.end_block(height).unwrap();
    }
    let epoch = m.current_epoch_info().unwrap();
    assert_eq!(epoch.id, 2);
    assert_eq!(epoch.validators[0].consensus_address, Address::repeat_byte(9));
}

#[test]
fn test_validator_removal_wipes_bookkeeping() {
    let mut m = manager(vec![genesis_validator(1, 100), genesis_validator(2, 100)]);
    let owner = Address::repeat_byte(0x51);
    let consensus = Address::repeat_byte(1);
    let delegator = Address::repeat_byte(0xD0);
    fund(&mut m, &delegator, 50);

    m.stake(&delegator, &consensus, token(50), 1).unwrap();
    for height in 1..=5 {
        m.end_block(height).unwrap();
    }

    m.cancel_validator(&owner, &consensus).unwrap();
    assert!(matches!(
        m.stake(&delegator, &consensus, token(1), 6),
        Err(StakingError::ValidatorNotActive(_))
    ));
    assert!(matches!(
        m.withdraw_validator(&owner, &consensus, 6),
        Err(StakingError::ValidatorInRoster(_))
    ));

    for height in 6..=EPOCH {
        m.end_block(height).unwrap();
    }
    assert!(!m.current_epoch_info().unwrap().contains(&consensus));

    // The owner leaves; the delegator keeps the validator alive
    m.withdraw_validator(&owner, &consensus, 11).unwrap();
    let v = m.validator(&consensus).unwrap().unwrap();
    assert_eq!(v.status, ValidatorStatus::Removing);
    assert_eq!(v.total_stake, Dec::from_u64(50));
    assert!(m.balance_of(&owner).unwrap() > U256::ZERO);

    let last_period = m.validator_rewards(&consensus).unwrap().accumulated.period;
    m.unstake(&delegator, &consensus, token(50), 12).unwrap();

    assert!(m.validator(&consensus).unwrap().is_none());
    assert!(!m
        .all_validators()
        .unwrap()
        .iter()
        .any(|v| v.consensus_address == consensus));
    assert!(matches!(
        m.validator_rewards(&consensus),
        Err(StakingError::MissingRecord { .. })
    ));
    m.query(|state| {
        assert!(state.accumulated_commission(&consensus)?.is_none());
        assert!(state.validator_outstanding(&consensus)?.is_none());
        assert!(state.snapshot(&consensus, last_period)?.is_none());
        assert!(!state.is_signer_reserved(&Address::repeat_byte(0x11))?);
        assert!(!state.is_proposal_reserved(&Address::repeat_byte(0x21))?);
        Ok(())
    })
    .unwrap();

    // Both unbonding entries mature one epoch after they were queued
    assert_eq!(m.withdraw(&delegator, 21).unwrap(), U256::ZERO);
    assert_eq!(m.withdraw(&delegator, 22).unwrap(), token(50));
    assert_eq!(m.withdraw(&owner, 21).unwrap(), token(100));
}

#[test]
fn test_reregistered_validator_ignores_stale_anchor() {
    let mut m = manager(vec![genesis_validator(1, 100), genesis_validator(2, 100)]);
    let owner = Address::repeat_byte(0x51);
    let consensus = Address::repeat_byte(1);
    let delegator = Address::repeat_byte(0xD0);
    fund(&mut m, &delegator, 100);

    m.stake(&delegator, &consensus, token(40), 1).unwrap();
    m.unstake(&delegator, &consensus, token(40), 2).unwrap();
    m.cancel_validator(&owner, &consensus).unwrap();
    for height in 1..=EPOCH {
        m.end_block(height).unwrap();
    }
    m.withdraw_validator(&owner, &consensus, 11).unwrap();
    assert!(m.validator(&consensus).unwrap().is_none());

    // Same consensus address, same identities, new owner
    let new_owner = Address::repeat_byte(0x77);
    fund(&mut m, &new_owner, 100);
    m.create_validator(
        &new_owner,
        CreateValidatorParams {
            consensus_address: consensus,
            signer_address: Address::repeat_byte(0x11),
            proposal_address: Address::repeat_byte(0x21),
            commission: 0,
            initial_stake: token(100),
            desc: String::new(),
        },
        12,
    )
    .unwrap();
    assert_eq!(m.validator(&consensus).unwrap().unwrap().sequence, 3);
    assert_eq!(m.pending_stake_rewards(&delegator, &consensus).unwrap(), Dec::ZERO);

    m.stake(&delegator, &consensus, token(60), 13).unwrap();
    assert_eq!(m.withdraw_stake_rewards(&delegator, &consensus, 14).unwrap(), U256::ZERO);
    assert_eq!(
        m.stake_info(&delegator, &consensus).unwrap().unwrap().amount,
        Dec::from_u64(60)
    );
}

#[test]
fn test_unstake_validation() {
    let mut m = manager(vec![genesis_validator(1, 100)]);
    let consensus = Address::repeat_byte(1);
    let delegator = Address::repeat_byte(0xD0);
    fund(&mut m, &delegator, 10);
    m.stake(&delegator, &consensus, token(10), 1).unwrap();

    assert!(matches!(
        m.unstake(&delegator, &consensus, U256::ZERO, 2),
        Err(StakingError::ZeroAmount)
    ));
    assert!(matches!(
        m.unstake(&delegator, &consensus, token(11), 2),
        Err(StakingError::InsufficientDelegation { .. })
    ));
    assert!(matches!(
        m.stake(&delegator, &Address::repeat_byte(42), token(1), 2),
        Err(StakingError::ValidatorNotFound(_))
    ));
    assert!(matches!(
        m.stake(&delegator, &consensus, token(1), 2),
        Err(StakingError::Bank(_))
    ));
}

#[test]
fn test_quorum_gate_uses_current_roster() {
    let mut m = manager(vec![
        genesis_validator(1, 300),
        genesis_validator(2, 200),
        genesis_validator(3, 100),
    ]);
    let input = 7u64.to_be_bytes();
    let signer = |byte: u8| Address::repeat_byte(byte + 0x10);

    // Two thirds of three signers
    let first = m
        .transact(|state| {
            QuorumSignatureGate::check(state, "blackChain", &input, &signer(1), QuorumRole::Signer)
        })
        .unwrap();
    assert!(!first.is_authorized());
    let second = m
        .transact(|state| {
            QuorumSignatureGate::check(state, "blackChain", &input, &signer(3), QuorumRole::Signer)
        })
        .unwrap();
    assert!(second.is_authorized());

    // Validator 3 is outside the two-member voter roster
    let err = m
        .transact(|state| {
            QuorumSignatureGate::check(state, "syncRootInfo", &input, &signer(3), QuorumRole::Voter)
        })
        .unwrap_err();
    assert!(matches!(err, StakingError::IneligibleSigner { epoch: 1, .. }));
}

#[test]
fn test_rotated_out_voter_no_longer_counts() {
    let mut m = manager(vec![
        genesis_validator(1, 300),
        genesis_validator(2, 200),
        genesis_validator(3, 100),
    ]);
    let input = 9u64.to_be_bytes();
    let signer = |byte: u8| Address::repeat_byte(byte + 0x10);
    let vote = |m: &mut NodeManager<MemoryStore>, byte: u8| {
        m.transact(|state| {
            QuorumSignatureGate::check(state, "syncRootInfo", &input, &signer(byte), QuorumRole::Voter)
        })
        .unwrap()
    };

    // Voters of epoch 1 are validators 1 and 2
    assert!(!vote(&mut m, 2).is_authorized());

    let owner = Address::repeat_byte(0x54);
    fund(&mut m, &owner, 400);
    m.create_validator(
        &owner,
        CreateValidatorParams {
            consensus_address: Address::repeat_byte(4),
            signer_address: signer(4),
            proposal_address: Address::repeat_byte(0x24),
            commission: 1_000,
            initial_stake: token(400),
            desc: "validator 4".into(),
        },
        3,
    )
    .unwrap();
    assert_eq!(m.end_block(EPOCH).unwrap().rotated_to, Some(2));

    let voters: Vec<Address> = m
        .current_epoch_info()
        .unwrap()
        .voters
        .iter()
        .map(|p| p.consensus_address)
        .collect();
    assert_eq!(voters, vec![Address::repeat_byte(4), Address::repeat_byte(1)]);

    // Validator 2's earlier vote is dropped, so validator 1 alone is not enough
    let after = vote(&mut m, 1);
    assert!(!after.is_authorized());
    let signers = m
        .query(|state| QuorumSignatureGate::signers(state, "syncRootInfo", &input))
        .unwrap();
    assert_eq!(signers, vec![signer(1)]);

    assert!(vote(&mut m, 4).is_authorized());
}
