//! Checkout Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sweetcart_app::domain::{checkout::models::CheckoutRequest, orders::models::Order};

use crate::{
    checkout::into_api_error,
    errors::ApiError,
    extensions::*,
    observability::{observe_checkout, observe_order},
    orders::LineItemResponse,
    state::State,
};

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequestBody {
    /// Where to deliver the order
    #[serde(default)]
    pub delivery_address: String,

    /// Optional notes for the shop
    #[serde(default)]
    pub notes: Option<String>,

    /// Optional coupon code
    #[serde(default)]
    pub coupon_code: Option<String>,
}

impl From<CheckoutRequestBody> for CheckoutRequest {
    fn from(body: CheckoutRequestBody) -> Self {
        CheckoutRequest {
            delivery_address: body.delivery_address,
            notes: body.notes,
            coupon_code: body.coupon_code,
        }
    }
}

/// Checkout Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutResponse {
    /// The unique identifier of the new order
    pub order_uuid: Uuid,

    /// Sum of line totals at catalog prices, in minor units
    pub subtotal: u64,

    /// Discount applied, in minor units
    pub discount: u64,

    /// Amount charged, in minor units
    pub total: u64,

    /// Products, quantities and prices recorded on the order
    pub line_items: Vec<LineItemResponse>,
}

impl From<Order> for CheckoutResponse {
    fn from(order: Order) -> Self {
        Self {
            order_uuid: order.uuid.into(),
            subtotal: order.subtotal,
            discount: order.discount,
            total: order.total,
            line_items: order
                .line_items
                .into_iter()
                .map(LineItemResponse::from)
                .collect(),
        }
    }
}

/// Checkout Handler
///
/// Turns the caller's cart into an order. Stock is taken for every line or
/// for none; prices and the discount come from the catalog and coupon rules,
/// never from the request.
#[endpoint(
    tags("checkout"),
    summary = "Checkout",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart or missing address"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon or product not found"),
        (status_code = StatusCode::CONFLICT, description = "Insufficient stock or coupon expired"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Coupon minimum not met"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Order could not be recorded"),
    ),
)]
#[tracing::instrument(
    name = "checkout.create",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequestBody>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));

    let order = match state
        .app
        .checkout
        .checkout(user, json.into_inner().into())
        .await
    {
        Ok(order) => order,
        Err(error) => {
            let error = into_api_error(error);

            observe_checkout(error.code());

            return Err(error);
        }
    };

    observe_checkout("placed");
    observe_order(order.total, order.discount);

    span.record("order_uuid", tracing::field::display(order.uuid));

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
