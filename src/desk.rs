//! Desk
//!
//! The rental desk: the two operations the engine exposes to the calling
//! workflow. Each one composes the pure lifecycle engine, the status
//! synchronizer, and one atomic store commit, so no partial state is ever
//! observable, on any exit path.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::{
    customers::CustomerId,
    inventory::{Condition, ItemId},
    lifecycle::{self, LifecycleError, ReturnOutcome},
    policy::BillingPolicy,
    rentals::{Rental, RentalId},
    store::{RentalStore, StorageError},
    sync::{self, SyncError},
};

/// Errors surfaced by the rental desk.
///
/// Transparent over the underlying taxonomy: callers match on
/// [`LifecycleError`] for malformed input and re-returns, [`SyncError`] for
/// availability conflicts, and [`StorageError`] for unknown ids.
#[derive(Debug, Error)]
pub enum DeskError {
    /// Lifecycle rule violation.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Availability conflict.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// Storage failure or unknown reference.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The rental desk for one shop: a billing policy over a record store.
#[derive(Debug)]
pub struct RentalDesk<'a, S> {
    store: S,
    policy: BillingPolicy<'a>,
}

impl<'a, S: RentalStore<'a>> RentalDesk<'a, S> {
    /// Create a desk over the given store and policy.
    pub fn new(store: S, policy: BillingPolicy<'a>) -> Self {
        Self { store, policy }
    }

    /// The underlying record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The billing policy in force.
    pub fn policy(&self) -> &BillingPolicy<'a> {
        &self.policy
    }

    /// Create a rental of `item_id` for `customer_id` over `rental_days`
    /// days starting at `now`, at the item's daily rate.
    ///
    /// On success the rental is persisted, the item is marked rented, and
    /// the customer's rental count is bumped, all in one store commit. A
    /// concurrent create for the same item loses with
    /// [`SyncError::ItemUnavailable`]; the availability check that decides
    /// the winner runs inside the store's critical section, not here.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::InvalidPeriod`] / [`LifecycleError::InvalidRate`]
    ///   for malformed input, before anything is written.
    /// - [`SyncError::ItemUnavailable`] if the item is rented or in
    ///   maintenance.
    /// - [`StorageError::CustomerNotFound`] / [`StorageError::ItemNotFound`]
    ///   for unknown ids.
    #[tracing::instrument(name = "desk.create_rental", skip(self, notes), err)]
    pub fn create_rental(
        &self,
        customer_id: CustomerId,
        item_id: ItemId,
        rental_days: u32,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Rental<'a>, DeskError> {
        self.store.customer(customer_id)?;
        let item = self.store.item(item_id)?;

        // Early exit while the item is visibly unavailable; the commit
        // below re-checks under the store's lock and is the authority.
        sync::on_rental_created(item.status)?;

        let id = self.store.allocate_rental_id()?;

        let rental = lifecycle::open_rental(
            id,
            customer_id,
            item_id,
            rental_days,
            item.daily_rate,
            notes,
            now,
        )?;

        self.store
            .commit_rental_created(&rental)
            .map_err(|err| match err {
                StorageError::StatusConflict { status, .. } => {
                    DeskError::Sync(SyncError::ItemUnavailable { status })
                }
                other => DeskError::Storage(other),
            })?;

        info!(
            rental_id = %rental.id,
            due_at = %rental.due_at,
            total_price = %rental.total_price,
            "created rental"
        );

        Ok(rental)
    }

    /// Process the return of `rental_id` at `now`, with the condition
    /// observed at the counter.
    ///
    /// The rental transitions to returned with its late fee populated, and
    /// the item goes back to available, or to maintenance when the observed
    /// condition is poor. Notes are overwritten only when `return_notes` is
    /// provided.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::AlreadyReturned`] on a second return, whether
    ///   detected up front or by losing a concurrent-return race; the first
    ///   return's fee is never altered.
    /// - [`StorageError::RentalNotFound`] for an unknown id.
    #[tracing::instrument(name = "desk.process_return", skip(self, return_notes), err)]
    pub fn process_return(
        &self,
        rental_id: RentalId,
        condition: Condition,
        return_notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<ReturnOutcome<'a>, DeskError> {
        let rental = self.store.rental(rental_id)?;

        let outcome = lifecycle::close_rental(rental, &self.policy, return_notes, now)?;

        let item = self.store.item(outcome.rental.item_id)?;
        let next_status = sync::on_rental_returned(item.status, condition)?;

        self.store
            .commit_rental_returned(&outcome.rental, next_status, condition)
            .map_err(|err| match err {
                StorageError::StaleRental { rental } => {
                    DeskError::Lifecycle(LifecycleError::AlreadyReturned { rental })
                }
                other => DeskError::Storage(other),
            })?;

        info!(
            rental_id = %rental_id,
            days_late = outcome.days_late,
            late_fee = %outcome.rental.late_fee,
            total_due = %outcome.total_due,
            item_status = %next_status,
            "processed return"
        );

        Ok(outcome)
    }
}
