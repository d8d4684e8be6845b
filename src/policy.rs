//! Policy
//!
//! Billing policy: the late fee charged per overdue day and the default
//! rental period offered at creation. Both were hardcoded constants in the
//! shop's original workflow; here they are configuration with documented
//! defaults, loadable from a YAML file.

use std::{fs, path::Path};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;
use thiserror::Error;

/// Late fee charged per overdue day unless configured otherwise.
pub const DEFAULT_LATE_FEE_PER_DAY_MINOR: i64 = 1500;

/// Rental period offered by default, in days.
pub const DEFAULT_RENTAL_DAYS: u32 = 3;

/// Policy loading and validation errors.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// IO error reading the policy file.
    #[error("Failed to read policy file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid amount format.
    #[error("Invalid amount format: {0}")]
    InvalidAmount(String),

    /// Unknown currency code.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Negative late fee.
    #[error("Late fee per day must not be negative: {0}")]
    NegativeFee(String),

    /// Zero-length default rental period.
    #[error("Default rental period must be at least 1 day")]
    ZeroPeriod,
}

/// Billing policy for a shop.
#[derive(Debug, Clone)]
pub struct BillingPolicy<'a> {
    /// Penalty charged for each billable late day.
    pub late_fee_per_day: Money<'a, Currency>,

    /// Rental period offered when the caller does not pick one, in days.
    pub default_rental_days: u32,
}

impl Default for BillingPolicy<'_> {
    fn default() -> Self {
        Self {
            late_fee_per_day: Money::from_minor(DEFAULT_LATE_FEE_PER_DAY_MINOR, USD),
            default_rental_days: DEFAULT_RENTAL_DAYS,
        }
    }
}

/// On-disk shape of a billing policy.
#[derive(Debug, Deserialize)]
struct PolicyFile {
    /// Late fee per day (e.g., "15.00 USD").
    late_fee_per_day: String,

    /// Default rental period in days.
    default_rental_days: u32,
}

impl<'a> BillingPolicy<'a> {
    /// Load a billing policy from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, the amount is
    /// malformed or negative, the currency is unknown, or the default period
    /// is zero.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let contents = fs::read_to_string(path)?;
        let file: PolicyFile = serde_norway::from_str(&contents)?;

        let (minor_units, currency) = parse_amount(&file.late_fee_per_day)?;

        if minor_units < 0 {
            return Err(PolicyError::NegativeFee(file.late_fee_per_day));
        }

        if file.default_rental_days == 0 {
            return Err(PolicyError::ZeroPeriod);
        }

        Ok(Self {
            late_fee_per_day: Money::from_minor(minor_units, currency),
            default_rental_days: file.default_rental_days,
        })
    }
}

/// Parse an amount string (e.g., "15.00 USD") into minor units and currency.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code is
/// not recognized.
fn parse_amount(s: &str) -> Result<(i64, &'static Currency), PolicyError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(PolicyError::InvalidAmount(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| PolicyError::InvalidAmount(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| PolicyError::InvalidAmount(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| PolicyError::InvalidAmount(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| PolicyError::InvalidAmount(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(PolicyError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn default_policy_is_fifteen_dollars_and_three_days() {
        let policy = BillingPolicy::default();

        assert_eq!(policy.late_fee_per_day, Money::from_minor(1500, USD));
        assert_eq!(policy.default_rental_days, 3);
    }

    #[test]
    fn parse_amount_accepts_major_units() -> TestResult {
        let (minor, currency) = parse_amount("15.00 USD")?;

        assert_eq!(minor, 1500);
        assert_eq!(currency, USD);

        Ok(())
    }

    #[test]
    fn parse_amount_rejects_missing_currency() {
        assert!(matches!(
            parse_amount("15.00"),
            Err(PolicyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn parse_amount_rejects_unknown_currency() {
        assert!(matches!(
            parse_amount("15.00 XYZ"),
            Err(PolicyError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        assert!(matches!(
            parse_amount("fifteen USD"),
            Err(PolicyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn from_file_loads_a_policy() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "late_fee_per_day: \"12.50 GBP\"")?;
        writeln!(file, "default_rental_days: 7")?;

        let policy = BillingPolicy::from_file(file.path())?;

        assert_eq!(policy.late_fee_per_day, Money::from_minor(1250, GBP));
        assert_eq!(policy.default_rental_days, 7);

        Ok(())
    }

    #[test]
    fn from_file_rejects_negative_fee() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "late_fee_per_day: \"-1.00 USD\"")?;
        writeln!(file, "default_rental_days: 3")?;

        let result = BillingPolicy::from_file(file.path());

        assert!(matches!(result, Err(PolicyError::NegativeFee(_))));

        Ok(())
    }

    #[test]
    fn from_file_rejects_zero_period() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "late_fee_per_day: \"15.00 USD\"")?;
        writeln!(file, "default_rental_days: 0")?;

        let result = BillingPolicy::from_file(file.path());

        assert!(matches!(result, Err(PolicyError::ZeroPeriod)));

        Ok(())
    }
}
