//! Customers

use std::fmt;

use chrono::{DateTime, Utc};

/// Identifier of a customer, assigned by the record store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomerId(pub i64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A customer record.
///
/// Created and edited by the customer-management collaborator; the engine
/// only bumps `rentals_to_date`, and only as part of the committed unit of
/// work that creates a rental, so the count always equals the number of
/// rentals ever created for the customer.
#[derive(Debug, Clone)]
pub struct Customer {
    /// Record identifier.
    pub id: CustomerId,

    /// Full name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// Phone number.
    pub phone: String,

    /// Postal address.
    pub address: String,

    /// When the customer joined.
    pub joined_at: DateTime<Utc>,

    /// Number of rentals ever created for this customer.
    pub rentals_to_date: u32,
}
