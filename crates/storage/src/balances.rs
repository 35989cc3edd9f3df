//! Native token balances kept in the state store.
//!
//! Balances live in the same [`KvStore`] as module records, so a transfer made
//! inside a [`CacheStore`](crate::CacheStore) overlay is committed or discarded
//! together with the rest of the operation.

use tracing::trace;
use zenith_core::{BankError, BankResult, Balances, KvRead, KvStore, StoreError};
use zenith_types::{Address, U256};

/// Key prefix for account balances.
pub const BALANCE_PREFIX: &[u8] = b"zenith_balance";

/// [`Balances`] implementation over a key-value store.
#[derive(Debug)]
pub struct StoreBalances<S> {
    store: S,
}

impl<S> StoreBalances<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Release the store.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn key(account: &Address) -> Vec<u8> {
        let mut key = Vec::with_capacity(BALANCE_PREFIX.len() + 20);
        key.extend_from_slice(BALANCE_PREFIX);
        key.extend_from_slice(account.as_slice());
        key
    }
}

impl<S: KvRead> StoreBalances<S> {
    /// Read the balance of `account`, zero if never credited.
    pub fn balance_of(&self, account: &Address) -> BankResult<U256> {
        match self.store.get(&Self::key(account))? {
            None => Ok(U256::ZERO),
            Some(bytes) => U256::try_from_be_slice(&bytes).ok_or_else(|| {
                BankError::Store(StoreError::Corruption(format!(
                    "balance of {account} has {} bytes",
                    bytes.len()
                )))
            }),
        }
    }
}

impl<S: KvStore> StoreBalances<S> {
    fn set(&mut self, account: &Address, amount: U256) -> BankResult<()> {
        let key = Self::key(account);
        if amount.is_zero() {
            self.store.delete(&key)?;
        } else {
            self.store.put(&key, &amount.to_be_bytes::<32>())?;
        }
        Ok(())
    }
}

impl<S: KvStore> Balances for StoreBalances<S> {
    fn balance(&self, account: &Address) -> BankResult<U256> {
        self.balance_of(account)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: U256) -> BankResult<()> {
        if amount.is_zero() || from == to {
            return Ok(());
        }
        let available = self.balance_of(from)?;
        if available < amount {
            return Err(BankError::InsufficientBalance {
                account: *from,
                required: amount,
                available,
            });
        }
        let credited = self
            .balance_of(to)?
            .checked_add(amount)
            .ok_or(BankError::Overflow(*to))?;

        self.set(from, available - amount)?;
        self.set(to, credited)?;
        trace!(from = %from, to = %to, amount = %amount, "Transfer");
        Ok(())
    }

    fn mint(&mut self, account: &Address, amount: U256) -> BankResult<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let credited = self
            .balance_of(account)?
            .checked_add(amount)
            .ok_or(BankError::Overflow(*account))?;
        self.set(account, credited)?;
        trace!(account = %account, amount = %amount, "Mint");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn test_mint_and_transfer() {
        let mut bank = StoreBalances::new(MemoryStore::new());
        bank.mint(&addr(1), U256::from(100u64)).unwrap();
        bank.transfer(&addr(1), &addr(2), U256::from(40u64)).unwrap();

        assert_eq!(bank.balance(&addr(1)).unwrap(), U256::from(60u64));
        assert_eq!(bank.balance(&addr(2)).unwrap(), U256::from(40u64));
    }

    #[test]
    fn test_insufficient_balance() {
        let mut bank = StoreBalances::new(MemoryStore::new());
        bank.mint(&addr(1), U256::from(10u64)).unwrap();
        let err = bank
            .transfer(&addr(1), &addr(2), U256::from(11u64))
            .unwrap_err();
        assert!(matches!(err, BankError::InsufficientBalance { .. }));
        assert_eq!(bank.balance(&addr(1)).unwrap(), U256::from(10u64));
    }

    #[test]
    fn test_emptied_account_is_deleted() {
        let mut bank = StoreBalances::new(MemoryStore::new());
        bank.mint(&addr(1), U256::from(5u64)).unwrap();
        bank.transfer(&addr(1), &addr(2), U256::from(5u64)).unwrap();

        let store = bank.into_inner();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_zero_transfer_is_noop() {
        let mut bank = StoreBalances::new(MemoryStore::new());
        bank.transfer(&addr(1), &addr(2), U256::ZERO).unwrap();
        assert!(bank.into_inner().is_empty());
    }
}
