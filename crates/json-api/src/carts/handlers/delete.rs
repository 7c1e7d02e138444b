//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{carts::into_api_error, errors::ApiError, extensions::*, state::State};

/// Clear Cart Handler
#[endpoint(
    tags("carts"),
    summary = "Clear Cart",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Cart cleared"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.clear",
    skip(depot),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    tracing::Span::current().record("user_uuid", tracing::field::display(user));

    state
        .app
        .carts
        .clear_cart(user)
        .await
        .map_err(into_api_error)?;

    tracing::info!("cleared cart");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use crate::test_helpers::{MockApp, TEST_USER_UUID};

    use super::*;

    #[tokio::test]
    async fn test_clear_returns_204() -> TestResult {
        let mut app = MockApp::default();

        app.carts
            .expect_clear_cart()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| Ok(()));

        let res = TestClient::delete("http://example.com/cart")
            .send(&app.service(Router::with_path("cart").delete(handler)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }
}
