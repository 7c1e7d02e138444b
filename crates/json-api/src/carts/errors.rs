//! Errors

use salvo::http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use sweetcart_app::domain::carts::CartsServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: CartsServiceError) -> ApiError {
    match error {
        CartsServiceError::InvalidQuantity(quantity) => invalid_quantity(quantity),
        CartsServiceError::ProductNotFound(product) => {
            ApiError::new(StatusCode::NOT_FOUND, "ProductNotFound", "Product not found")
                .with_detail("product_uuid", product)
        }
        CartsServiceError::ItemNotFound(product) => {
            ApiError::new(StatusCode::NOT_FOUND, "ItemNotFound", "Product is not in the cart")
                .with_detail("product_uuid", product)
        }
        CartsServiceError::Products(source) => {
            error!("failed to read catalog: {source}");

            ApiError::internal()
        }
    }
}

fn invalid_quantity(quantity: impl Serialize) -> ApiError {
    ApiError::new(
        StatusCode::BAD_REQUEST,
        "InvalidQuantity",
        "Quantity must be a positive integer",
    )
    .with_detail("quantity", quantity)
}

/// Read a request's `quantity`, rejecting anything that is not a JSON integer
/// the same way the cart rejects a non-positive one.
pub(crate) fn requested_quantity(quantity: &Value) -> Result<i64, ApiError> {
    quantity.as_i64().ok_or_else(|| invalid_quantity(quantity))
}
