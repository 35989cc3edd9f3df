//! Integration tests for the RocksDB state store

use tempfile::TempDir;
use zenith_core::{Balances, KvRead, KvStore, WriteBatch};
use zenith_storage::{CacheStore, DatabaseConfig, RocksStore, StoreBalances};
use zenith_types::{Address, U256};

fn create_test_db() -> (RocksStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        path: temp_dir.path().to_string_lossy().to_string(),
        ..Default::default()
    };
    let db = RocksStore::open(config).unwrap();
    (db, temp_dir)
}

#[test]
fn test_open_database() {
    let (_db, _temp_dir) = create_test_db();
}

#[test]
fn test_put_get_delete() {
    let (mut db, _temp_dir) = create_test_db();

    db.put(b"key1", b"value1").unwrap();
    assert_eq!(db.get(b"key1").unwrap(), Some(b"value1".to_vec()));

    db.delete(b"key1").unwrap();
    assert_eq!(db.get(b"key1").unwrap(), None);
}

#[test]
fn test_write_batch() {
    let (mut db, _temp_dir) = create_test_db();
    db.put(b"stale", b"x").unwrap();

    let mut batch = WriteBatch::new();
    batch.put(b"key1".to_vec(), b"value1".to_vec());
    batch.put(b"key2".to_vec(), b"value2".to_vec());
    batch.delete(b"stale".to_vec());
    db.write_batch(batch).unwrap();

    assert_eq!(db.get(b"key1").unwrap(), Some(b"value1".to_vec()));
    assert_eq!(db.get(b"key2").unwrap(), Some(b"value2".to_vec()));
    assert_eq!(db.get(b"stale").unwrap(), None);
}

#[test]
fn test_overlay_commit_reaches_disk() {
    let (mut db, _temp_dir) = create_test_db();

    let mut cache = CacheStore::new(&mut db);
    {
        let mut bank = StoreBalances::new(&mut cache);
        bank.mint(&Address::repeat_byte(1), U256::from(50u64)).unwrap();
    }
    cache.commit().unwrap();

    let bank = StoreBalances::new(&db);
    assert_eq!(
        bank.balance_of(&Address::repeat_byte(1)).unwrap(),
        U256::from(50u64)
    );
}

#[test]
fn test_last_height_persists_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    {
        let db = RocksStore::open_default(temp_dir.path()).unwrap();
        assert_eq!(db.last_height().unwrap(), None);
        db.set_last_height(42).unwrap();
        db.flush().unwrap();
    }
    let db = RocksStore::open_default(temp_dir.path()).unwrap();
    assert_eq!(db.last_height().unwrap(), Some(42));
}
