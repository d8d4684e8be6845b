//! Rentals

use std::fmt;

use chrono::{DateTime, Utc};
use rusty_money::{Money, iso::Currency};

use crate::{customers::CustomerId, inventory::ItemId};

/// Identifier of a rental, assigned by the record store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RentalId(pub i64);

impl fmt::Display for RentalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a rental.
///
/// A rental transitions exactly once, `Active` to `Returned`, and is never
/// re-opened or deleted by the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RentalStatus {
    /// Out with the customer.
    Active,

    /// Returned and billed.
    Returned,
}

impl RentalStatus {
    /// Stable lowercase name, matching the record store's status field.
    pub fn as_str(self) -> &'static str {
        match self {
            RentalStatus::Active => "active",
            RentalStatus::Returned => "returned",
        }
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rental of one item by one customer.
///
/// Holds references (ids) to the customer and item, not ownership: many
/// rentals may reference the same item over time, sequentially.
#[derive(Debug, Clone)]
pub struct Rental<'a> {
    /// Record identifier.
    pub id: RentalId,

    /// The renting customer.
    pub customer_id: CustomerId,

    /// The rented item.
    pub item_id: ItemId,

    /// When the rental began.
    pub started_at: DateTime<Utc>,

    /// When the item is due back. Always after `started_at`.
    pub due_at: DateTime<Utc>,

    /// When the item came back. Absent iff the rental is `Active`.
    pub returned_at: Option<DateTime<Utc>>,

    /// Daily rate times rental days, fixed at creation and never recomputed.
    pub total_price: Money<'a, Currency>,

    /// Late-return penalty. Zero until the return is processed.
    pub late_fee: Money<'a, Currency>,

    /// Lifecycle state.
    pub status: RentalStatus,

    /// Free-text notes.
    pub notes: String,
}

impl Rental<'_> {
    /// Whether the rental is still out and past its due timestamp.
    ///
    /// A rental due exactly now is not overdue; only strictly later counts.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == RentalStatus::Active && now > self.due_at
    }
}
