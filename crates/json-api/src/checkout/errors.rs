//! Checkout Errors

use salvo::http::StatusCode;
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use sweetcart_app::domain::{checkout::CheckoutError, inventory::models::StockShortfall};

use crate::{carts, discounts, errors::ApiError};

/// A product the ledger could not cover.
#[derive(Debug, Serialize)]
struct ShortfallDetail {
    product_uuid: Uuid,
    available: u64,
    requested: u64,
}

impl From<StockShortfall> for ShortfallDetail {
    fn from(shortfall: StockShortfall) -> Self {
        Self {
            product_uuid: shortfall.product.into(),
            available: shortfall.available,
            requested: shortfall.requested,
        }
    }
}

pub(crate) fn into_api_error(error: CheckoutError) -> ApiError {
    match error {
        CheckoutError::EmptyCart => {
            ApiError::new(StatusCode::BAD_REQUEST, "EmptyCart", "Cart is empty")
        }
        CheckoutError::MissingAddress => ApiError::new(
            StatusCode::BAD_REQUEST,
            "MissingAddress",
            "Delivery address is required",
        ),
        CheckoutError::Coupon(source) => discounts::into_api_error(source),
        CheckoutError::InsufficientStock(shortfalls) => ApiError::new(
            StatusCode::CONFLICT,
            "InsufficientStock",
            "Not enough stock for one or more products",
        )
        .with_detail(
            "shortfalls",
            shortfalls
                .into_iter()
                .map(ShortfallDetail::from)
                .collect::<Vec<_>>(),
        ),
        CheckoutError::ProductNotFound(product) => ApiError::new(
            StatusCode::NOT_FOUND,
            "ProductNotFound",
            "Product is no longer available",
        )
        .with_detail("product_uuid", product),
        CheckoutError::PersistenceFailure(source) => {
            error!("failed to record order: {source}");

            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "PersistenceFailure",
                "Order could not be recorded; no stock was taken",
            )
        }
        CheckoutError::Carts(source) => carts::into_api_error(source),
        CheckoutError::Inventory(source) => {
            error!("inventory error during checkout: {source}");

            ApiError::internal()
        }
        CheckoutError::Products(source) => {
            error!("catalog error during checkout: {source}");

            ApiError::internal()
        }
    }
}
