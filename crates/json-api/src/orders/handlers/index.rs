//! List Orders Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    errors::ApiError,
    extensions::*,
    orders::{OrderResponse, into_api_error},
    state::State,
};

/// List Orders Handler
///
/// Returns the caller's orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("user_uuid" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let orders = state
        .app
        .orders
        .list_orders(user)
        .await
        .map_err(into_api_error)?;

    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}
