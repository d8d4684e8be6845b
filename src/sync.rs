//! Sync
//!
//! The inventory status synchronizer: keeps an item's availability
//! consistent with the rental lifecycle. The status machine is
//! `Available -> Rented` on rental creation and `Rented -> Available` or
//! `Rented -> Maintenance` on return; `Maintenance -> Available` is an
//! administrative transition outside the engine.

use thiserror::Error;

use crate::inventory::{Condition, ItemStatus};

/// Errors from the item status machine.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The item cannot take a new rental in its current status.
    ///
    /// This rule is the authority for the no-double-booking invariant.
    #[error("item is {status}, not available for rental")]
    ItemUnavailable {
        /// The status that blocked the rental.
        status: ItemStatus,
    },

    /// The requested status change is not part of the machine.
    #[error("invalid item status transition: {from} -> {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: ItemStatus,
        /// Requested status.
        to: ItemStatus,
    },
}

/// Status an item takes when a rental is created for it.
///
/// # Errors
///
/// Returns [`SyncError::ItemUnavailable`] unless the item is `Available`.
pub fn on_rental_created(status: ItemStatus) -> Result<ItemStatus, SyncError> {
    match status {
        ItemStatus::Available => Ok(ItemStatus::Rented),
        other => Err(SyncError::ItemUnavailable { status: other }),
    }
}

/// Status an item takes when its rental is returned.
///
/// A poor-condition return routes the item to maintenance instead of back
/// to the rentable pool.
///
/// # Errors
///
/// Returns [`SyncError::InvalidStatusTransition`] unless the item is
/// `Rented`.
pub fn on_rental_returned(
    status: ItemStatus,
    condition: Condition,
) -> Result<ItemStatus, SyncError> {
    let to = match condition {
        Condition::Poor => ItemStatus::Maintenance,
        _ => ItemStatus::Available,
    };

    match status {
        ItemStatus::Rented => Ok(to),
        other => Err(SyncError::InvalidStatusTransition { from: other, to }),
    }
}
