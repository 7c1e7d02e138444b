//! Carts service errors.

use thiserror::Error;

use crate::domain::products::{ProductsServiceError, models::ProductUuid};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),

    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("product {0} is not in the cart")]
    ItemNotFound(ProductUuid),

    #[error("catalog error")]
    Products(#[source] ProductsServiceError),
}
