//! Carts

mod errors;
mod handlers;
pub(crate) mod items;

pub(crate) use errors::{into_api_error, requested_quantity};
pub(crate) use handlers::*;
