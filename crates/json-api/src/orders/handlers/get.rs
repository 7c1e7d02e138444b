//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sweetcart_app::domain::orders::models::{LineItem, Order};

use crate::{errors::ApiError, extensions::*, orders::into_api_error, state::State};

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    /// Fulfilment status
    pub status: String,

    /// Products, quantities and prices at the time of ordering
    pub line_items: Vec<LineItemResponse>,

    /// Sum of line totals, in minor units
    pub subtotal: u64,

    /// Discount applied, in minor units
    pub discount: u64,

    /// Coupon that granted the discount
    pub coupon_code: Option<String>,

    /// Amount charged, in minor units
    pub total: u64,

    /// Where the order is delivered
    pub delivery_address: String,

    /// Customer notes
    pub notes: Option<String>,

    /// The date and time the order was placed
    pub ordered_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            uuid: order.uuid.into(),
            status: order.status.to_string(),
            line_items: order
                .line_items
                .into_iter()
                .map(LineItemResponse::from)
                .collect(),
            subtotal: order.subtotal,
            discount: order.discount,
            coupon_code: order.coupon_code,
            total: order.total,
            delivery_address: order.delivery_address,
            notes: order.notes,
            ordered_at: order.ordered_at.to_string(),
        }
    }
}

/// Line Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LineItemResponse {
    /// The unique identifier of the product
    pub product_uuid: Uuid,

    /// Product name at the time of ordering
    pub name: String,

    /// Units ordered
    pub quantity: u64,

    /// Unit price at the time of ordering, in minor units
    pub unit_price: u64,

    /// Unit price times quantity
    pub line_total: u64,
}

impl From<LineItem> for LineItemResponse {
    fn from(item: LineItem) -> Self {
        Self {
            product_uuid: item.product_uuid.into(),
            name: item.name,
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: item.line_total,
        }
    }
}

/// Get Order Handler
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let order = state
        .app
        .orders
        .get_order(user, order.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use sweetcart_app::domain::orders::{OrdersServiceError, models::OrderUuid};

    use crate::test_helpers::{MockApp, TEST_USER_UUID, make_order};

    use super::*;

    fn make_service(app: MockApp) -> Service {
        app.service(Router::with_path("orders/{order}").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_order() -> TestResult {
        let mut app = MockApp::default();
        let order = make_order(100_00, 20_00);
        let uuid = order.uuid;

        app.orders
            .expect_get_order()
            .once()
            .withf(move |user, o| *user == TEST_USER_UUID && *o == uuid)
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(app))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.status, "placed");
        assert_eq!(body.total, 80_00);
        assert_eq!(body.coupon_code.as_deref(), Some("SAVE20"));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_order_returns_404() -> TestResult {
        let mut app = MockApp::default();
        let uuid = OrderUuid::new();

        app.orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(app))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.pointer("/error/code"), Some(&json!("OrderNotFound")));

        Ok(())
    }
}
