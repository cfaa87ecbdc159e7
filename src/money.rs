//! Money Conversion Module
//!
//! Unified conversion between the internal u64 minor-unit representation and
//! client-facing string/Decimal representation. All conversions MUST go
//! through this module.
//!
//! ## Internal Representation
//! - All amounts are stored as `u64` minor units (`i64` for signed deltas)
//! - The scale factor is `10^decimals` per currency (e.g., 10^2 for USD cents)
//! - Money is never represented as a floating type
//!
//! ## Usage
//! ```ignore
//! // Client sends "12.50" USD
//! let internal = parse_amount("12.50", 2)?;
//! assert_eq!(internal, 1250);
//!
//! // Display balance to client
//! let display = format_amount(1250, 2);
//! assert_eq!(display, "12.50");
//! ```

use rust_decimal::prelude::*;
use thiserror::Error;

/// Money conversion errors
#[derive(Debug, Error)]
pub enum MoneyError {
    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Amount too large, would overflow")]
    Overflow,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

/// Decimal places for a supported currency code.
///
/// The reference provider settles fiat rails only; minor units are cents.
pub fn currency_decimals(currency: &str) -> Result<u32, MoneyError> {
    match currency {
        "USD" | "EUR" | "GBP" | "BRL" | "MXN" => Ok(2),
        other => Err(MoneyError::UnknownCurrency(other.to_string())),
    }
}

/// Convert a client amount string to internal u64 minor units.
///
/// # Errors
/// * `PrecisionOverflow` - input has more decimal places than the currency allows
/// * `InvalidAmount` - amount is zero or negative
/// * `Overflow` - result would overflow u64
/// * `InvalidFormat` - string format is invalid
pub fn parse_amount(amount_str: &str, decimals: u32) -> Result<u64, MoneyError> {
    let amount_str = amount_str.trim();
    if amount_str.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }

    // Signs are rejected outright; amounts are unsigned by construction
    if amount_str.starts_with('-') || amount_str.starts_with('+') {
        return Err(MoneyError::InvalidAmount);
    }

    // Strict format: both sides of the dot must be present ("0.5", never ".5" or "5.")
    if amount_str.starts_with('.') || amount_str.ends_with('.') {
        return Err(MoneyError::InvalidFormat(
            "missing digits around decimal point (use 0.5, not .5)".into(),
        ));
    }

    let decimal = Decimal::from_str(amount_str)
        .map_err(|e| MoneyError::InvalidFormat(e.to_string()))?;

    parse_decimal(decimal, decimals)
}

/// Convert a validated Decimal to internal u64 minor units.
///
/// Used at the gateway boundary where `rust_decimal::Decimal` handles JSON
/// deserialization.
pub fn parse_decimal(decimal: Decimal, decimals: u32) -> Result<u64, MoneyError> {
    if decimal.is_sign_negative() || decimal.is_zero() {
        return Err(MoneyError::InvalidAmount);
    }

    // Precision validation: REJECT if too many decimals (no silent truncation)
    if decimal.scale() > decimals {
        return Err(MoneyError::PrecisionOverflow {
            provided: decimal.scale(),
            max: decimals,
        });
    }

    let multiplier = Decimal::from(10u64.pow(decimals));
    let result = decimal * multiplier;

    if !result.fract().is_zero() {
        return Err(MoneyError::PrecisionOverflow {
            provided: decimal.scale(),
            max: decimals,
        });
    }

    result.to_u64().ok_or(MoneyError::Overflow)
}

/// Convert internal u64 minor units to a display string with full precision.
pub fn format_amount(value: u64, decimals: u32) -> String {
    let decimal_value = Decimal::from(value) / Decimal::from(10u64.pow(decimals));
    format!("{:.prec$}", decimal_value, prec = decimals as usize)
}

/// Convert internal i64 to a display string (for signed values like ledger deltas).
pub fn format_amount_signed(value: i64, decimals: u32) -> String {
    let formatted = format_amount(value.unsigned_abs(), decimals);
    if value < 0 {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_basic() {
        assert_eq!(parse_amount("12.50", 2).unwrap(), 1250);
        assert_eq!(parse_amount("100", 2).unwrap(), 10000);
        assert_eq!(parse_amount("0.01", 2).unwrap(), 1);
    }

    #[test]
    fn test_parse_amount_rejects_zero_and_negative() {
        assert!(matches!(
            parse_amount("0", 2),
            Err(MoneyError::InvalidAmount)
        ));
        assert!(matches!(
            parse_amount("-5", 2),
            Err(MoneyError::InvalidAmount)
        ));
        assert!(matches!(
            parse_amount("+5", 2),
            Err(MoneyError::InvalidAmount)
        ));
    }

    #[test]
    fn test_parse_amount_rejects_excess_precision() {
        assert!(matches!(
            parse_amount("1.555", 2),
            Err(MoneyError::PrecisionOverflow { provided: 3, max: 2 })
        ));
    }

    #[test]
    fn test_parse_amount_strict_format() {
        assert!(parse_amount(".5", 2).is_err());
        assert!(parse_amount("5.", 2).is_err());
        assert!(parse_amount("", 2).is_err());
        assert!(parse_amount("abc", 2).is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1250, 2), "12.50");
        assert_eq!(format_amount(0, 2), "0.00");
        assert_eq!(format_amount_signed(-1250, 2), "-12.50");
    }

    #[test]
    fn test_parse_format_roundtrip() {
        let raw = parse_amount("9876.54", 2).unwrap();
        assert_eq!(format_amount(raw, 2), "9876.54");
    }

    #[test]
    fn test_currency_decimals() {
        assert_eq!(currency_decimals("USD").unwrap(), 2);
        assert!(matches!(
            currency_decimals("DOGE"),
            Err(MoneyError::UnknownCurrency(_))
        ));
    }
}
