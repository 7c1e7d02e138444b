//! Discounts service errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscountsServiceError {
    #[error("coupon {0} not found")]
    CouponNotFound(String),

    #[error("coupon {0} is not valid at this time")]
    CouponExpired(String),

    #[error("coupon {code} needs a subtotal of at least {minimum}, got {subtotal}")]
    CouponMinimumNotMet {
        code: String,
        minimum: u64,
        subtotal: u64,
    },

    #[error("coupon {0} already exists")]
    AlreadyExists(String),

    #[error("invalid coupon: {0}")]
    InvalidCoupon(&'static str),
}
