//! Store
//!
//! The repository seam between the engine and the hosted record store. The
//! trait exposes lookups plus two atomic commit operations, so the
//! check-then-mark status update that was a read/write race in the original
//! workflow becomes a single conditional transition. [`InMemoryStore`] is
//! the mutex-guarded implementation used by tests and by deployments
//! without a hosted backend.

use std::sync::{Mutex, MutexGuard};

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    customers::{Customer, CustomerId},
    inventory::{Condition, InventoryItem, ItemId, ItemStatus},
    rentals::{Rental, RentalId, RentalStatus},
};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Referenced item does not exist.
    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    /// Referenced customer does not exist.
    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),

    /// Referenced rental does not exist.
    #[error("rental {0} not found")]
    RentalNotFound(RentalId),

    /// The item was no longer available when the rental commit ran.
    #[error("item {item} is {status}; rental commit refused")]
    StatusConflict {
        /// The contested item.
        item: ItemId,
        /// Its status at commit time.
        status: ItemStatus,
    },

    /// The rental was no longer active when the return commit ran.
    #[error("rental {rental} is no longer active; return commit refused")]
    StaleRental {
        /// The contested rental.
        rental: RentalId,
    },

    /// The store's lock was poisoned by a panicking writer.
    #[error("record store lock poisoned")]
    Poisoned,
}

/// Record store operations the engine needs.
///
/// The two `commit_*` operations must be atomic: their precondition check
/// and their writes happen in one critical section (or one conditional
/// remote update), and either everything is applied or nothing is.
pub trait RentalStore<'a> {
    /// Look up an inventory item.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ItemNotFound`] for an unknown id.
    fn item(&self, id: ItemId) -> Result<InventoryItem<'a>, StorageError>;

    /// Look up a customer.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::CustomerNotFound`] for an unknown id.
    fn customer(&self, id: CustomerId) -> Result<Customer, StorageError>;

    /// Look up a rental.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::RentalNotFound`] for an unknown id.
    fn rental(&self, id: RentalId) -> Result<Rental<'a>, StorageError>;

    /// Reserve an identifier for a rental about to be created.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot allocate one.
    fn allocate_rental_id(&self) -> Result<RentalId, StorageError>;

    /// Commit a freshly opened rental: verify the item is still available,
    /// insert the rental, mark the item rented, and bump the customer's
    /// rental count, atomically.
    ///
    /// # Errors
    ///
    /// - [`StorageError::StatusConflict`]: the item was not available; the
    ///   store is left untouched. This closes the create/create race.
    /// - [`StorageError::ItemNotFound`] / [`StorageError::CustomerNotFound`]
    ///   for dangling references.
    fn commit_rental_created(&self, rental: &Rental<'a>) -> Result<(), StorageError>;

    /// Commit a processed return: verify the stored rental is still active,
    /// persist the returned rental, set the item's post-return status, and
    /// record the observed condition on the item, atomically.
    ///
    /// # Errors
    ///
    /// - [`StorageError::StaleRental`]: the rental was already returned; the
    ///   store is left untouched. This closes the return/return race.
    /// - [`StorageError::RentalNotFound`] / [`StorageError::ItemNotFound`]
    ///   for dangling references.
    fn commit_rental_returned(
        &self,
        rental: &Rental<'a>,
        item_status: ItemStatus,
        condition: Condition,
    ) -> Result<(), StorageError>;
}

/// Records behind the in-memory store's lock.
#[derive(Debug)]
struct Records<'a> {
    items: FxHashMap<ItemId, InventoryItem<'a>>,
    customers: FxHashMap<CustomerId, Customer>,
    rentals: FxHashMap<RentalId, Rental<'a>>,
    next_rental_id: i64,
}

impl Default for Records<'_> {
    fn default() -> Self {
        Self {
            items: FxHashMap::default(),
            customers: FxHashMap::default(),
            rentals: FxHashMap::default(),
            next_rental_id: 1,
        }
    }
}

/// Map-backed record store guarded by one mutex.
///
/// One lock for all three collections keeps the commit operations trivially
/// atomic; this store holds a few shop's worth of records, not a dataset.
#[derive(Debug, Default)]
pub struct InMemoryStore<'a> {
    records: Mutex<Records<'a>>,
}

impl<'a> InMemoryStore<'a> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an inventory item, replacing any record with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Poisoned`] if the lock is poisoned.
    pub fn insert_item(&self, item: InventoryItem<'a>) -> Result<(), StorageError> {
        let mut records = self.lock()?;
        records.items.insert(item.id, item);

        Ok(())
    }

    /// Seed a customer, replacing any record with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Poisoned`] if the lock is poisoned.
    pub fn insert_customer(&self, customer: Customer) -> Result<(), StorageError> {
        let mut records = self.lock()?;
        records.customers.insert(customer.id, customer);

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Records<'a>>, StorageError> {
        self.records.lock().map_err(|_err| StorageError::Poisoned)
    }
}

impl<'a> RentalStore<'a> for InMemoryStore<'a> {
    fn item(&self, id: ItemId) -> Result<InventoryItem<'a>, StorageError> {
        let records = self.lock()?;

        records
            .items
            .get(&id)
            .cloned()
            .ok_or(StorageError::ItemNotFound(id))
    }

    fn customer(&self, id: CustomerId) -> Result<Customer, StorageError> {
        let records = self.lock()?;

        records
            .customers
            .get(&id)
            .cloned()
            .ok_or(StorageError::CustomerNotFound(id))
    }

    fn rental(&self, id: RentalId) -> Result<Rental<'a>, StorageError> {
        let records = self.lock()?;

        records
            .rentals
            .get(&id)
            .cloned()
            .ok_or(StorageError::RentalNotFound(id))
    }

    fn allocate_rental_id(&self) -> Result<RentalId, StorageError> {
        let mut records = self.lock()?;
        let id = RentalId(records.next_rental_id);
        records.next_rental_id += 1;

        Ok(id)
    }

    fn commit_rental_created(&self, rental: &Rental<'a>) -> Result<(), StorageError> {
        let mut records = self.lock()?;

        if !records.customers.contains_key(&rental.customer_id) {
            return Err(StorageError::CustomerNotFound(rental.customer_id));
        }

        let status = records
            .items
            .get(&rental.item_id)
            .map(|item| item.status)
            .ok_or(StorageError::ItemNotFound(rental.item_id))?;

        // The authoritative availability check: status is re-read under the
        // same lock that flips it, so two creates cannot both pass.
        if status != ItemStatus::Available {
            return Err(StorageError::StatusConflict {
                item: rental.item_id,
                status,
            });
        }

        if let Some(item) = records.items.get_mut(&rental.item_id) {
            item.status = ItemStatus::Rented;
        }

        if let Some(customer) = records.customers.get_mut(&rental.customer_id) {
            customer.rentals_to_date = customer.rentals_to_date.saturating_add(1);
        }

        records.rentals.insert(rental.id, rental.clone());

        Ok(())
    }

    fn commit_rental_returned(
        &self,
        rental: &Rental<'a>,
        item_status: ItemStatus,
        condition: Condition,
    ) -> Result<(), StorageError> {
        let mut records = self.lock()?;

        let stored_status = records
            .rentals
            .get(&rental.id)
            .map(|stored| stored.status)
            .ok_or(StorageError::RentalNotFound(rental.id))?;

        if stored_status != RentalStatus::Active {
            return Err(StorageError::StaleRental { rental: rental.id });
        }

        if !records.items.contains_key(&rental.item_id) {
            return Err(StorageError::ItemNotFound(rental.item_id));
        }

        if let Some(item) = records.items.get_mut(&rental.item_id) {
            item.status = item_status;
            item.condition = condition;
        }

        records.rentals.insert(rental.id, rental.clone());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone, Utc};
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use super::*;

    fn test_item(id: i64) -> InventoryItem<'static> {
        InventoryItem {
            id: ItemId(id),
            name: "Velvet Blazer".to_string(),
            sku: format!("VB-{id:04}"),
            category: "jackets".to_string(),
            size: "M".to_string(),
            color: "navy".to_string(),
            brand: "Atelier North".to_string(),
            condition: Condition::Excellent,
            daily_rate: Money::from_minor(2000, USD),
            weekly_rate: Money::from_minor(10000, USD),
            monthly_rate: Money::from_minor(30000, USD),
            status: ItemStatus::Available,
        }
    }

    fn test_customer(id: i64) -> Customer {
        Customer {
            id: CustomerId(id),
            name: "Ada Vaughn".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0199".to_string(),
            address: "12 Mercer St".to_string(),
            joined_at: Utc
                .with_ymd_and_hms(2023, 6, 1, 12, 0, 0)
                .single()
                .unwrap_or_default(),
            rentals_to_date: 0,
        }
    }

    fn test_rental(id: i64, customer: i64, item: i64) -> Rental<'static> {
        let started_at = Utc
            .with_ymd_and_hms(2024, 1, 7, 9, 0, 0)
            .single()
            .unwrap_or_default();

        Rental {
            id: RentalId(id),
            customer_id: CustomerId(customer),
            item_id: ItemId(item),
            started_at,
            due_at: started_at + TimeDelta::days(3),
            returned_at: None,
            total_price: Money::from_minor(6000, USD),
            late_fee: Money::from_minor(0, USD),
            status: RentalStatus::Active,
            notes: String::new(),
        }
    }

    fn seeded_store() -> Result<InMemoryStore<'static>, StorageError> {
        let store = InMemoryStore::new();
        store.insert_item(test_item(100))?;
        store.insert_customer(test_customer(10))?;

        Ok(store)
    }

    #[test]
    fn lookups_surface_not_found() -> TestResult {
        let store = InMemoryStore::new();

        assert!(matches!(
            store.item(ItemId(1)),
            Err(StorageError::ItemNotFound(ItemId(1)))
        ));
        assert!(matches!(
            store.customer(CustomerId(1)),
            Err(StorageError::CustomerNotFound(CustomerId(1)))
        ));
        assert!(matches!(
            store.rental(RentalId(1)),
            Err(StorageError::RentalNotFound(RentalId(1)))
        ));

        Ok(())
    }

    #[test]
    fn allocated_rental_ids_are_sequential() -> TestResult {
        let store = InMemoryStore::new();

        assert_eq!(store.allocate_rental_id()?, RentalId(1));
        assert_eq!(store.allocate_rental_id()?, RentalId(2));

        Ok(())
    }

    #[test]
    fn commit_created_flips_status_and_bumps_count() -> TestResult {
        let store = seeded_store()?;

        store.commit_rental_created(&test_rental(1, 10, 100))?;

        assert_eq!(store.item(ItemId(100))?.status, ItemStatus::Rented);
        assert_eq!(store.customer(CustomerId(10))?.rentals_to_date, 1);
        assert_eq!(store.rental(RentalId(1))?.status, RentalStatus::Active);

        Ok(())
    }

    #[test]
    fn second_commit_for_the_same_item_is_refused_untouched() -> TestResult {
        let store = seeded_store()?;
        store.commit_rental_created(&test_rental(1, 10, 100))?;

        let refused = store.commit_rental_created(&test_rental(2, 10, 100));

        assert!(matches!(
            refused,
            Err(StorageError::StatusConflict {
                item: ItemId(100),
                status: ItemStatus::Rented
            })
        ));

        // The losing rental must not be inserted, and the count not bumped.
        assert!(matches!(
            store.rental(RentalId(2)),
            Err(StorageError::RentalNotFound(RentalId(2)))
        ));
        assert_eq!(store.customer(CustomerId(10))?.rentals_to_date, 1);

        Ok(())
    }

    #[test]
    fn commit_created_rejects_dangling_references() -> TestResult {
        let store = seeded_store()?;

        assert!(matches!(
            store.commit_rental_created(&test_rental(1, 99, 100)),
            Err(StorageError::CustomerNotFound(CustomerId(99)))
        ));
        assert!(matches!(
            store.commit_rental_created(&test_rental(1, 10, 999)),
            Err(StorageError::ItemNotFound(ItemId(999)))
        ));

        Ok(())
    }

    #[test]
    fn commit_returned_updates_item_and_rental() -> TestResult {
        let store = seeded_store()?;
        let rental = test_rental(1, 10, 100);
        store.commit_rental_created(&rental)?;

        let mut returned = rental;
        returned.status = RentalStatus::Returned;
        returned.returned_at = Some(returned.due_at);

        store.commit_rental_returned(&returned, ItemStatus::Available, Condition::Fair)?;

        let item = store.item(ItemId(100))?;
        assert_eq!(item.status, ItemStatus::Available);
        assert_eq!(item.condition, Condition::Fair);
        assert_eq!(store.rental(RentalId(1))?.status, RentalStatus::Returned);

        Ok(())
    }

    #[test]
    fn commit_returned_refuses_a_stale_rental() -> TestResult {
        let store = seeded_store()?;
        let rental = test_rental(1, 10, 100);
        store.commit_rental_created(&rental)?;

        let mut returned = rental;
        returned.status = RentalStatus::Returned;
        returned.returned_at = Some(returned.due_at);

        store.commit_rental_returned(&returned, ItemStatus::Available, Condition::Good)?;

        let again = store.commit_rental_returned(&returned, ItemStatus::Available, Condition::Good);

        assert!(matches!(
            again,
            Err(StorageError::StaleRental {
                rental: RentalId(1)
            })
        ));

        Ok(())
    }
}
