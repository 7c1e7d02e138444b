//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    carts::{CartResponse, into_api_error, requested_quantity},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New quantity; zero or less removes the item
    #[serde(default)]
    #[salvo(schema(value_type = i64))]
    pub quantity: Value,
}

/// Update Cart Item Handler
///
/// Replaces the quantity of a product already in the cart.
#[endpoint(
    tags("carts"),
    summary = "Update Cart Item",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity"),
        (status_code = StatusCode::NOT_FOUND, description = "Product is not in the cart"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let quantity = requested_quantity(&json.into_inner().quantity)?;

    let cart = state
        .app
        .carts
        .update_item(user, product.into_inner().into(), quantity)
        .await
        .map_err(into_api_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use sweetcart_app::domain::{carts::CartsServiceError, products::models::ProductUuid};

    use crate::test_helpers::{MockApp, TEST_USER_UUID, make_cart};

    use super::*;

    fn make_service(app: MockApp) -> Service {
        app.service(Router::with_path("cart/items/{product}").put(handler))
    }

    #[tokio::test]
    async fn test_update_to_zero_returns_cart_without_item() -> TestResult {
        let mut app = MockApp::default();
        let product = ProductUuid::new();

        app.carts
            .expect_update_item()
            .once()
            .withf(move |user, p, quantity| {
                *user == TEST_USER_UUID && *p == product && *quantity == 0
            })
            .return_once(|_, _, _| Ok(make_cart(Vec::new())));

        let mut res = TestClient::put(format!("http://example.com/cart/items/{product}"))
            .json(&json!({ "quantity": 0 }))
            .send(&make_service(app))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_item_returns_404() -> TestResult {
        let mut app = MockApp::default();
        let product = ProductUuid::new();

        app.carts
            .expect_update_item()
            .once()
            .return_once(move |_, p, _| Err(CartsServiceError::ItemNotFound(p)));

        let mut res = TestClient::put(format!("http://example.com/cart/items/{product}"))
            .json(&json!({ "quantity": 4 }))
            .send(&make_service(app))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.pointer("/error/code"), Some(&json!("ItemNotFound")));

        Ok(())
    }

    #[tokio::test]
    async fn test_fractional_quantity_returns_400() -> TestResult {
        let mut app = MockApp::default();
        let product = ProductUuid::new();

        app.carts.expect_update_item().never();

        let mut res = TestClient::put(format!("http://example.com/cart/items/{product}"))
            .json(&json!({ "quantity": 2.5 }))
            .send(&make_service(app))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.pointer("/error/code"), Some(&json!("InvalidQuantity")));
        assert_eq!(body.pointer("/error/quantity"), Some(&json!(2.5)));

        Ok(())
    }
}
