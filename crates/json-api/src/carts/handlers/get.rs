//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sweetcart_app::domain::carts::models::{Cart, CartItem};

use crate::{carts::into_api_error, errors::ApiError, extensions::*, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The items in the cart, in the order they were first added
    pub items: Vec<CartItemResponse>,

    /// Number of units across all items
    pub item_count: u64,

    /// Display total in minor units, from prices cached when items were added
    pub total: u64,

    /// The date and time the cart last changed
    pub updated_at: Option<String>,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        CartResponse {
            item_count: cart.item_count(),
            total: cart.total(),
            updated_at: cart.updated_at.as_ref().map(ToString::to_string),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the product
    pub product_uuid: Uuid,

    /// Product name when it was added
    pub name: String,

    /// Units in the cart
    pub quantity: u64,

    /// Unit price in minor units when the product was added
    pub unit_price: u64,

    /// Unit price times quantity
    pub line_total: u64,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            line_total: item.line_total(),
            product_uuid: item.product_uuid.into(),
            name: item.name,
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

/// Get Cart Handler
///
/// Returns the caller's cart; callers without one get an empty cart.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    security(("user_uuid" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(user)
        .await
        .map_err(into_api_error)?;

    Ok(Json(cart.into()))
}
