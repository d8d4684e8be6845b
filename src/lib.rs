//! Wardrobe
//!
//! Wardrobe is the rental lifecycle and billing engine behind a clothing
//! rental shop: rental state transitions, due-date and price derivation,
//! late-fee accrual on return, and synchronization of inventory availability
//! with outstanding rentals. Persistence and transport belong to the calling
//! layer, which plugs in through [`store::RentalStore`].

pub mod billing;
pub mod customers;
pub mod desk;
pub mod inventory;
pub mod lifecycle;
pub mod policy;
pub mod rentals;
pub mod store;
pub mod sync;
