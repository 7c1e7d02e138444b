//! Inventory

pub mod errors;
pub mod ledger;
pub mod models;
pub mod transaction;

pub use errors::InventoryError;
pub use ledger::*;
