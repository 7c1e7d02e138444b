//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{CartResponse, into_api_error},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Remove Cart Item Handler
///
/// Removing a product that is not in the cart succeeds and leaves the cart
/// unchanged.
#[endpoint(
    tags("carts"),
    summary = "Remove Cart Item",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    )
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let cart = state
        .app
        .carts
        .remove_item(user, product.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(Json(cart.into()))
}
