//! Shared utilities for CLI commands.
//!
//! This module provides common functionality used across CLI commands:
//! - Error types and result handling
//! - Output formatting
//! - Amount parsing and display helpers

use clap::ValueEnum;
use thiserror::Error;
use zenith_config::ConfigError;
use zenith_staking::StakingError;
use zenith_storage::StoreError;
use zenith_types::U256;

// ============================================================================
// Error Types
// ============================================================================

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Node manager error
    #[error("Node manager error: {0}")]
    Staking(#[from] StakingError),

    /// State store error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// CLI result type alias
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Output Formatting
// ============================================================================

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

/// Print an info message to stderr (so JSON output stays clean)
pub fn print_info(msg: &str) {
    use console::style;
    eprintln!("{} {}", style("[INFO]").cyan().bold(), msg);
}

/// Print a success message to stderr
pub fn print_success(msg: &str) {
    use console::style;
    eprintln!("{} {}", style("[OK]").green().bold(), msg);
}

/// Print a warning message to stderr
pub fn print_warning(msg: &str) {
    use console::style;
    eprintln!("{} {}", style("[WARN]").yellow().bold(), msg);
}

// ============================================================================
// Amount Parsing and Formatting
// ============================================================================

/// Number of decimals of the native token.
pub const TOKEN_DECIMALS: usize = 18;

/// Display symbol of the native token.
pub const TOKEN_SYMBOL: &str = "ZEN";

/// Parse an amount in base units, or in whole tokens with a `zen` suffix
/// (`"1.5zen"`, `"100000 zen"`).
pub fn parse_amount(s: &str) -> CliResult<U256> {
    let s = s.trim().to_lowercase();
    let invalid = || CliError::InvalidArgument(format!("Invalid amount: {}", s));

    let Some(tokens) = s.strip_suffix("zen") else {
        return U256::from_str_radix(&s, 10).map_err(|_| invalid());
    };
    let tokens = tokens.trim();
    let (whole, frac) = tokens.split_once('.').unwrap_or((tokens, ""));
    if whole.is_empty() || frac.len() > TOKEN_DECIMALS || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let digits = format!("{whole}{frac:0<width$}", width = TOKEN_DECIMALS);
    U256::from_str_radix(&digits, 10).map_err(|_| invalid())
}

/// Format a base-unit amount as tokens, with thousand separators and at most
/// six decimals.
pub fn format_balance(amount: U256) -> String {
    let digits = format!("{:0>width$}", amount.to_string(), width = TOKEN_DECIMALS + 1);
    let (whole, frac) = digits.split_at(digits.len() - TOKEN_DECIMALS);
    let frac = frac[..6].trim_end_matches('0');

    if frac.is_empty() {
        format!("{} {}", format_with_commas(whole), TOKEN_SYMBOL)
    } else {
        format!("{}.{} {}", format_with_commas(whole), frac, TOKEN_SYMBOL)
    }
}

/// Insert thousand separators into a string of digits
pub fn format_with_commas(digits: &str) -> String {
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("42").unwrap(), U256::from(42u64));
        assert_eq!(
            parse_amount("1.5zen").unwrap(),
            U256::from(1_500_000_000_000_000_000u128)
        );
        assert_eq!(
            parse_amount("100000 ZEN").unwrap(),
            U256::from(100_000u64) * U256::from(10u64).pow(U256::from(18u64))
        );
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount(".5zen").is_err());
        assert!(parse_amount("1.0000000000000000001zen").is_err());
    }

    #[test]
    fn test_format_balance() {
        assert_eq!(format_balance(U256::ZERO), "0 ZEN");
        assert_eq!(
            format_balance(U256::from(1_234_500_000_000_000_000_000u128)),
            "1,234.5 ZEN"
        );
        assert_eq!(format_balance(U256::from(1u64)), "0 ZEN");
        assert_eq!(
            format_balance(U256::from(1_000_000_000_000u64)),
            "0.000001 ZEN"
        );
    }
}
