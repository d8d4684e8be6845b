//! Lifecycle
//!
//! The rental lifecycle engine: opening a rental (due-date and price
//! derivation) and closing it (late-fee accrual). Both operations are pure
//! functions of their inputs; the clock is a parameter, and persistence
//! belongs to the caller.

use chrono::{DateTime, Days, Utc};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    billing::{self, BillingError},
    customers::CustomerId,
    inventory::ItemId,
    policy::BillingPolicy,
    rentals::{Rental, RentalId, RentalStatus},
};

/// Errors enforcing the rental lifecycle.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Rental period shorter than one day.
    #[error("rental period must be at least 1 day, got {days}")]
    InvalidPeriod {
        /// The rejected period length.
        days: u32,
    },

    /// Negative daily rate.
    #[error("daily rate must not be negative, got {minor_units} minor units")]
    InvalidRate {
        /// The rejected rate, in minor units.
        minor_units: i64,
    },

    /// The due date fell outside the representable range.
    #[error("due date is not representable for a period of {days} days")]
    DateOverflow {
        /// The period that pushed the due date out of range.
        days: u32,
    },

    /// The rental has already been returned; returns happen exactly once.
    #[error("rental {rental} has already been returned")]
    AlreadyReturned {
        /// The rental whose return was re-attempted.
        rental: RentalId,
    },

    /// Wrapped billing arithmetic error.
    #[error(transparent)]
    Billing(#[from] BillingError),
}

/// Opens a new rental: due date at the same wall-clock time `rental_days`
/// calendar days after `now`, total price fixed at daily rate times days.
///
/// The caller owns the side effects this declares: persisting the rental,
/// marking the item rented, and bumping the customer's rental count, all in
/// one committed unit of work.
///
/// # Errors
///
/// - [`LifecycleError::InvalidPeriod`]: `rental_days` is zero.
/// - [`LifecycleError::InvalidRate`]: `daily_rate` is negative.
/// - [`LifecycleError::DateOverflow`]: the due date is out of range.
/// - [`LifecycleError::Billing`]: the total price overflowed.
pub fn open_rental<'a>(
    id: RentalId,
    customer_id: CustomerId,
    item_id: ItemId,
    rental_days: u32,
    daily_rate: Money<'a, Currency>,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<Rental<'a>, LifecycleError> {
    if rental_days < 1 {
        return Err(LifecycleError::InvalidPeriod { days: rental_days });
    }

    let rate_minor = daily_rate.to_minor_units();
    if rate_minor < 0 {
        return Err(LifecycleError::InvalidRate {
            minor_units: rate_minor,
        });
    }

    // Calendar-day arithmetic: the due date lands on the same wall-clock
    // time `rental_days` days later.
    let due_at = now
        .checked_add_days(Days::new(u64::from(rental_days)))
        .ok_or(LifecycleError::DateOverflow { days: rental_days })?;

    let total_price = billing::rental_total(daily_rate, rental_days)?;

    Ok(Rental {
        id,
        customer_id,
        item_id,
        started_at: now,
        due_at,
        returned_at: None,
        total_price,
        late_fee: Money::from_minor(0, daily_rate.currency()),
        status: RentalStatus::Active,
        notes: notes.unwrap_or_default(),
    })
}

/// Result of closing a rental.
#[derive(Debug, Clone)]
pub struct ReturnOutcome<'a> {
    /// The rental, now returned, with its late fee populated.
    pub rental: Rental<'a>,

    /// Billable late days charged.
    pub days_late: i64,

    /// Base price plus late fee.
    pub total_due: Money<'a, Currency>,
}

/// Closes an active rental at `now`, accruing the late fee.
///
/// A return at or before the due timestamp charges nothing; past it, each
/// started day charges [`BillingPolicy::late_fee_per_day`]. Notes are
/// overwritten only when `return_notes` is provided.
///
/// # Errors
///
/// - [`LifecycleError::AlreadyReturned`]: the rental is not active. The
///   stored late fee is left untouched; a return is never double-charged.
/// - [`LifecycleError::Billing`]: fee arithmetic overflowed, or the policy
///   currency does not match the rental currency.
pub fn close_rental<'a>(
    rental: Rental<'a>,
    policy: &BillingPolicy<'a>,
    return_notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<ReturnOutcome<'a>, LifecycleError> {
    if rental.status != RentalStatus::Active {
        return Err(LifecycleError::AlreadyReturned { rental: rental.id });
    }

    let days_late = billing::days_late(rental.due_at, now);

    // An on-time return owes nothing regardless of the policy currency.
    let late_fee = if days_late == 0 {
        Money::from_minor(0, rental.total_price.currency())
    } else {
        billing::late_fee(policy.late_fee_per_day, days_late)?
    };

    let total_due = billing::total_due(rental.total_price, late_fee)?;

    let mut rental = rental;
    rental.status = RentalStatus::Returned;
    rental.returned_at = Some(now);
    rental.late_fee = late_fee;

    if let Some(notes) = return_notes {
        rental.notes = notes;
    }

    Ok(ReturnOutcome {
        rental,
        days_late,
        total_due,
    })
}
