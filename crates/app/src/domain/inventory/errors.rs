//! Inventory ledger errors.

use thiserror::Error;

use crate::domain::{inventory::models::StockShortfall, products::models::ProductUuid};

#[derive(Debug, Error)]
pub enum InventoryError {
    /// At least one requested product cannot be satisfied. Every failing
    /// product is listed, not only the first.
    #[error("insufficient stock for {} product(s)", .0.len())]
    InsufficientStock(Vec<StockShortfall>),

    #[error("quantity for product {product} must be positive")]
    InvalidQuantity { product: ProductUuid },

    #[error("product {product} has never been stocked")]
    NotStocked { product: ProductUuid },

    #[error("stock level for product {product} would overflow")]
    Overflow { product: ProductUuid },
}
