//! Fixed-point decimal arithmetic.
//!
//! [`Dec`] stores an unsigned value scaled by 10^18 inside a `U256`. Every
//! operation is checked: overflow, underflow and division by zero surface as
//! [`DecError`] instead of wrapping or panicking, so a bad reward computation
//! aborts the enclosing state transition rather than corrupting balances.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of fractional digits carried by [`Dec`].
pub const DEC_PRECISION: usize = 18;

/// Basis points representing 100%.
///
/// Commission rates, the commission-change cap and the community rate are all
/// expressed in basis points and must never exceed this value.
pub const PERCENT_DECIMAL: u16 = 10_000;

/// Raw representation of `1.0`.
const ONE_RAW: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Returns true if `bps` does not exceed 100%.
#[inline]
pub const fn is_valid_rate(bps: u16) -> bool {
    bps <= PERCENT_DECIMAL
}

/// Errors produced by decimal arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecError {
    /// Result does not fit in 256 bits.
    #[error("decimal overflow")]
    Overflow,

    /// Subtraction would go below zero.
    #[error("decimal underflow")]
    Underflow,

    /// Division by a zero decimal.
    #[error("decimal division by zero")]
    DivisionByZero,

    /// Malformed decimal literal.
    #[error("invalid decimal literal: {0}")]
    Parse(String),
}

/// Unsigned fixed-point decimal with 18 fractional digits.
///
/// # Example
///
/// ```rust
/// use zenith_types::Dec;
///
/// let a: Dec = "1.5".parse().unwrap();
/// let b = Dec::from_u64(2);
/// assert_eq!(a.checked_mul(b).unwrap(), Dec::from_u64(3));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dec(U256);

impl Dec {
    /// Zero.
    pub const ZERO: Self = Self(U256::ZERO);

    /// One.
    pub const ONE: Self = Self(ONE_RAW);

    /// Wraps an already scaled raw value.
    #[inline]
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Returns the scaled raw value.
    #[inline]
    pub const fn raw(self) -> U256 {
        self.0
    }

    /// Converts an integer amount into a decimal.
    pub fn from_int(value: U256) -> Result<Self, DecError> {
        value.checked_mul(ONE_RAW).map(Self).ok_or(DecError::Overflow)
    }

    /// Converts a `u64` into a decimal. Never overflows.
    pub fn from_u64(value: u64) -> Self {
        Self(U256::from(value) * ONE_RAW)
    }

    /// Returns true if the value is zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Checked addition.
    pub fn checked_add(self, rhs: Self) -> Result<Self, DecError> {
        self.0.checked_add(rhs.0).map(Self).ok_or(DecError::Overflow)
    }

    /// Checked subtraction.
    pub fn checked_sub(self, rhs: Self) -> Result<Self, DecError> {
        self.0.checked_sub(rhs.0).map(Self).ok_or(DecError::Underflow)
    }

    /// Checked multiplication, truncating below 10^-18.
    pub fn checked_mul(self, rhs: Self) -> Result<Self, DecError> {
        let product = self.0.checked_mul(rhs.0).ok_or(DecError::Overflow)?;
        Ok(Self(product / ONE_RAW))
    }

    /// Checked division, truncating below 10^-18.
    pub fn checked_quo(self, rhs: Self) -> Result<Self, DecError> {
        if rhs.is_zero() {
            return Err(DecError::DivisionByZero);
        }
        let scaled = self.0.checked_mul(ONE_RAW).ok_or(DecError::Overflow)?;
        Ok(Self(scaled / rhs.0))
    }

    /// Computes `self * num / den` with a single rounding step.
    ///
    /// Used for pro-rata splits where `num / den` alone would lose precision.
    pub fn checked_mul_div(self, num: Self, den: Self) -> Result<Self, DecError> {
        if den.is_zero() {
            return Err(DecError::DivisionByZero);
        }
        let product = self.0.checked_mul(num.0).ok_or(DecError::Overflow)?;
        Ok(Self(product / den.0))
    }

    /// Multiplies by a rate given in basis points.
    pub fn mul_rate(self, bps: u16) -> Result<Self, DecError> {
        let product = self
            .0
            .checked_mul(U256::from(bps))
            .ok_or(DecError::Overflow)?;
        Ok(Self(product / U256::from(PERCENT_DECIMAL)))
    }

    /// Integer part, as a raw token amount.
    #[inline]
    pub fn truncate(self) -> U256 {
        self.0 / ONE_RAW
    }

    /// Integer part, as a decimal.
    #[inline]
    pub fn floor(self) -> Self {
        Self(self.0 - self.0 % ONE_RAW)
    }

    /// Fractional part.
    #[inline]
    pub fn fract(self) -> Self {
        Self(self.0 % ONE_RAW)
    }
}

impl From<u64> for Dec {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.0 / ONE_RAW;
        let frac = self.0 % ONE_RAW;
        if frac.is_zero() {
            return write!(f, "{int}");
        }
        let digits = format!("{:0>width$}", frac.to_string(), width = DEC_PRECISION);
        write!(f, "{int}.{}", digits.trim_end_matches('0'))
    }
}

impl fmt::Debug for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dec({self})")
    }
}

impl FromStr for Dec {
    type Err = DecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecError::Parse(s.to_string());
        let (int_part, frac_part) = match s.split_once('.') {
            Some((int, frac)) => (int, frac),
            None => (s, ""),
        };
        if int_part.is_empty() || frac_part.len() > DEC_PRECISION {
            return Err(invalid());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let int = U256::from_str_radix(int_part, 10).map_err(|_| invalid())?;
        let mut value = Self::from_int(int)?;
        if !frac_part.is_empty() {
            let padded = format!("{frac_part:0<width$}", width = DEC_PRECISION);
            let frac = U256::from_str_radix(&padded, 10).map_err(|_| invalid())?;
            value = value.checked_add(Self(frac))?;
        }
        Ok(value)
    }
}
