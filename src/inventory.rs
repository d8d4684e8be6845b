//! Inventory

use std::fmt;

use rusty_money::{Money, iso::Currency};

/// Identifier of an inventory item, assigned by the record store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Availability of an inventory item.
///
/// `Available` and `Rented` are owned by this engine; `Maintenance` is
/// entered when an item comes back in [`Condition::Poor`] and is cleared by
/// an administrative action outside the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ItemStatus {
    /// No active rental references the item.
    Available,

    /// Exactly one active rental references the item.
    Rented,

    /// Withdrawn from the rentable pool after a poor-condition return.
    Maintenance,
}

impl ItemStatus {
    /// Stable lowercase name, matching the record store's status field.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Available => "available",
            ItemStatus::Rented => "rented",
            ItemStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical condition of a garment, as observed at intake or return.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    /// Like new.
    Excellent,

    /// Light wear.
    Good,

    /// Visible wear.
    Fair,

    /// Needs repair or cleaning before it can go out again.
    Poor,
}

impl Condition {
    /// Stable lowercase name, matching the record store's condition field.
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Excellent => "excellent",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Poor => "poor",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A garment in the shop's catalogue.
///
/// The engine only ever mutates `status` and `condition`; every other field
/// belongs to the catalogue-management collaborator.
#[derive(Debug, Clone)]
pub struct InventoryItem<'a> {
    /// Record identifier.
    pub id: ItemId,

    /// Display name.
    pub name: String,

    /// Stock-keeping unit.
    pub sku: String,

    /// Catalogue category (dress, suit, accessory, ...).
    pub category: String,

    /// Labelled size.
    pub size: String,

    /// Colour.
    pub color: String,

    /// Brand.
    pub brand: String,

    /// Current physical condition.
    pub condition: Condition,

    /// Rate charged per rental day.
    pub daily_rate: Money<'a, Currency>,

    /// Rate quoted for a week; data only, billing uses the daily rate.
    pub weekly_rate: Money<'a, Currency>,

    /// Rate quoted for a month; data only, billing uses the daily rate.
    pub monthly_rate: Money<'a, Currency>,

    /// Availability.
    pub status: ItemStatus,
}
