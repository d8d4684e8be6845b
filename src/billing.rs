//! Billing
//!
//! Money math for rentals. All arithmetic is checked minor-unit arithmetic;
//! overflow is an error, never a wrap.

use chrono::{DateTime, TimeDelta, Utc};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors that can occur while computing rental charges.
#[derive(Debug, Error)]
pub enum BillingError {
    /// A charge did not fit in minor units.
    #[error("charge overflowed minor-unit arithmetic")]
    AmountOverflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the base price of a rental: daily rate times rental days.
///
/// Fixed at creation time; the engine never recomputes it.
///
/// # Errors
///
/// Returns [`BillingError::AmountOverflow`] if the multiplication does not
/// fit in minor units.
pub fn rental_total<'a>(
    daily_rate: Money<'a, Currency>,
    rental_days: u32,
) -> Result<Money<'a, Currency>, BillingError> {
    let minor = daily_rate
        .to_minor_units()
        .checked_mul(i64::from(rental_days))
        .ok_or(BillingError::AmountOverflow)?;

    Ok(Money::from_minor(minor, daily_rate.currency()))
}

/// Counts billable late days between a due timestamp and a return timestamp.
///
/// A return at or before the due timestamp is on time. Past it, any fraction
/// of a day counts as a whole day: this is the ceiling of the elapsed time
/// in days, never a truncation.
pub fn days_late(due_at: DateTime<Utc>, returned_at: DateTime<Utc>) -> i64 {
    let late = returned_at.signed_duration_since(due_at);

    if late <= TimeDelta::zero() {
        return 0;
    }

    let whole = late.num_days();

    if late > TimeDelta::days(whole) {
        whole + 1
    } else {
        whole
    }
}

/// Calculates the late fee for a number of billable late days.
///
/// # Errors
///
/// Returns [`BillingError::AmountOverflow`] if the multiplication does not
/// fit in minor units.
pub fn late_fee<'a>(
    fee_per_day: Money<'a, Currency>,
    days_late: i64,
) -> Result<Money<'a, Currency>, BillingError> {
    let minor = fee_per_day
        .to_minor_units()
        .checked_mul(days_late)
        .ok_or(BillingError::AmountOverflow)?;

    Ok(Money::from_minor(minor, fee_per_day.currency()))
}

/// Calculates the amount owed at return: base price plus late fee.
///
/// # Errors
///
/// Returns [`BillingError::Money`] on currency mismatch between the base
/// price and the fee.
pub fn total_due<'a>(
    total_price: Money<'a, Currency>,
    late_fee: Money<'a, Currency>,
) -> Result<Money<'a, Currency>, BillingError> {
    Ok(total_price.add(late_fee)?)
}
