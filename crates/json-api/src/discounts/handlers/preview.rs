//! Discount Preview Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{carts, discounts::into_api_error, errors::ApiError, extensions::*, state::State};

/// Discount Preview Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountPreviewRequest {
    /// Coupon code; case and surrounding whitespace are ignored
    pub code: String,
}

/// Discount Preview Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountPreviewResponse {
    /// Discount the coupon would take off, in minor units
    pub discount_amount: u64,

    /// Cart display subtotal the discount was computed against
    pub subtotal: u64,
}

/// Discount Preview Handler
///
/// Evaluates a coupon against the caller's cart without applying or
/// consuming it. Checkout evaluates the coupon again against catalog prices.
#[endpoint(
    tags("carts"),
    summary = "Preview Discount",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Discount preview"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::CONFLICT, description = "Coupon expired"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Coupon minimum not met"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<DiscountPreviewRequest>,
    depot: &mut Depot,
) -> Result<Json<DiscountPreviewResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let subtotal = state
        .app
        .carts
        .total(user)
        .await
        .map_err(carts::into_api_error)?;

    let discount_amount = state
        .app
        .discounts
        .evaluate(&json.into_inner().code, subtotal, Timestamp::now())
        .await
        .map_err(into_api_error)?;

    Ok(Json(DiscountPreviewResponse {
        discount_amount,
        subtotal,
    }))
}
