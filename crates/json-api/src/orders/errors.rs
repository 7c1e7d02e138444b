//! Order Errors

use salvo::http::StatusCode;
use tracing::error;

use sweetcart_app::domain::orders::OrdersServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: OrdersServiceError) -> ApiError {
    match error {
        OrdersServiceError::NotFound => {
            ApiError::new(StatusCode::NOT_FOUND, "OrderNotFound", "Order not found")
        }
        OrdersServiceError::AlreadyExists => {
            ApiError::new(StatusCode::CONFLICT, "OrderExists", "Order already exists")
        }
        OrdersServiceError::Persistence(source) => {
            error!("failed to read orders: {source}");

            ApiError::internal()
        }
    }
}
