//! Orders

pub mod errors;
pub mod models;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;
