//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
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

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
    /// Product to add
    pub product_uuid: Uuid,

    /// Units to add; must be positive
    #[serde(default)]
    #[salvo(schema(value_type = i64))]
    pub quantity: Value,
}

/// Add Cart Item Handler
///
/// Adds units of a product, incrementing the line when the product is
/// already in the cart. Stock is not checked until checkout.
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let request = json.into_inner();
    let quantity = requested_quantity(&request.quantity)?;

    let cart = state
        .app
        .carts
        .add_item(user, request.product_uuid.into(), quantity)
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

    use crate::test_helpers::{MockApp, TEST_USER_UUID, make_cart, make_cart_item};

    use super::*;

    fn make_service(app: MockApp) -> Service {
        app.service(Router::with_path("cart/items").post(handler))
    }

    #[tokio::test]
    async fn test_add_item_returns_updated_cart() -> TestResult {
        let mut app = MockApp::default();
        let product = ProductUuid::new();
        let cart = make_cart(vec![make_cart_item(product, 3, 10_00)]);

        app.carts
            .expect_add_item()
            .once()
            .withf(move |user, p, quantity| {
                *user == TEST_USER_UUID && *p == product && *quantity == 3
            })
            .return_once(move |_, _, _| Ok(cart));

        let mut res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_uuid": product.into_uuid(), "quantity": 3 }))
            .send(&make_service(app))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.total, 30_00);

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_quantity_returns_400() -> TestResult {
        let mut app = MockApp::default();
        let product = ProductUuid::new();

        app.carts
            .expect_add_item()
            .once()
            .return_once(|_, _, quantity| Err(CartsServiceError::InvalidQuantity(quantity)));

        let mut res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_uuid": product.into_uuid(), "quantity": -2 }))
            .send(&make_service(app))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.pointer("/error/code"), Some(&json!("InvalidQuantity")));
        assert_eq!(body.pointer("/error/quantity"), Some(&json!(-2)));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_product_returns_404() -> TestResult {
        let mut app = MockApp::default();
        let product = ProductUuid::new();

        app.carts
            .expect_add_item()
            .once()
            .return_once(move |_, p, _| Err(CartsServiceError::ProductNotFound(p)));

        let mut res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_uuid": product.into_uuid(), "quantity": 1 }))
            .send(&make_service(app))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.pointer("/error/code"), Some(&json!("ProductNotFound")));
        assert_eq!(
            body.pointer("/error/product_uuid"),
            Some(&json!(product.to_string()))
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_non_integer_quantity_returns_400_without_touching_cart() -> TestResult {
        let product = ProductUuid::new();

        for quantity in [json!(1.5), json!("two")] {
            let mut app = MockApp::default();

            app.carts.expect_add_item().never();

            let mut res = TestClient::post("http://example.com/cart/items")
                .json(&json!({ "product_uuid": product.into_uuid(), "quantity": quantity }))
                .send(&make_service(app))
                .await;

            let body: Value = res.take_json().await?;

            assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
            assert_eq!(body.pointer("/error/code"), Some(&json!("InvalidQuantity")));
            assert_eq!(body.pointer("/error/quantity"), Some(&quantity));
        }

        Ok(())
    }
}
