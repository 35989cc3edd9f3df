//! Native token balance capability.
//!
//! The node manager holds staked tokens and undistributed rewards in its own
//! module account. It needs exactly three things from the ledger: read a
//! balance, move value between accounts, and mint block issuance.

use crate::traits::StoreError;
use thiserror::Error;
use zenith_types::{Address, U256};

/// Errors that can occur while moving balances.
#[derive(Error, Debug)]
pub enum BankError {
    /// The sending account does not hold enough tokens.
    #[error("insufficient balance for {account}: required {required}, available {available}")]
    InsufficientBalance {
        /// Account being debited.
        account: Address,
        /// Amount requested.
        required: U256,
        /// Amount held.
        available: U256,
    },

    /// Crediting the account would overflow.
    #[error("balance overflow for {0}")]
    Overflow(Address),

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for balance operations.
pub type BankResult<T> = Result<T, BankError>;

/// Value transfer capability.
pub trait Balances {
    /// Current balance of `account`.
    fn balance(&self, account: &Address) -> BankResult<U256>;

    /// Move `amount` from `from` to `to`.
    ///
    /// A zero amount is a no-op and always succeeds.
    fn transfer(&mut self, from: &Address, to: &Address, amount: U256) -> BankResult<()>;

    /// Create `amount` new tokens in `account`.
    fn mint(&mut self, account: &Address, amount: U256) -> BankResult<()>;
}

impl<T: Balances + ?Sized> Balances for &mut T {
    fn balance(&self, account: &Address) -> BankResult<U256> {
        (**self).balance(account)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: U256) -> BankResult<()> {
        (**self).transfer(from, to, amount)
    }

    fn mint(&mut self, account: &Address, amount: U256) -> BankResult<()> {
        (**self).mint(account, amount)
    }
}
