//! Checkout

mod errors;
mod handlers;

pub(crate) use errors::into_api_error;
pub(crate) use handlers::*;
