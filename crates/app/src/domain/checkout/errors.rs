//! Checkout errors.

use thiserror::Error;

use crate::domain::{
    carts::CartsServiceError,
    discounts::errors::DiscountsServiceError,
    inventory::{InventoryError, models::StockShortfall},
    orders::errors::OrdersServiceError,
    products::{ProductsServiceError, models::ProductUuid},
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("delivery address is required")]
    MissingAddress,

    #[error(transparent)]
    Coupon(#[from] DiscountsServiceError),

    /// Every product the ledger could not cover.
    #[error("insufficient stock for {} product(s)", .0.len())]
    InsufficientStock(Vec<StockShortfall>),

    #[error("product {0} is no longer in the catalog")]
    ProductNotFound(ProductUuid),

    #[error("failed to record order")]
    PersistenceFailure(#[source] OrdersServiceError),

    #[error(transparent)]
    Carts(#[from] CartsServiceError),

    #[error("inventory error")]
    Inventory(#[source] InventoryError),

    #[error("catalog error")]
    Products(#[source] ProductsServiceError),
}

impl From<InventoryError> for CheckoutError {
    fn from(error: InventoryError) -> Self {
        match error {
            InventoryError::InsufficientStock(shortfalls) => Self::InsufficientStock(shortfalls),
            other => Self::Inventory(other),
        }
    }
}
