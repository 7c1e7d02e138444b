//! Coupon evaluation.
//!
//! Everything here is a pure function of its arguments: the current time is
//! passed in rather than read, and nothing records that a coupon was used.

use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::domain::discounts::{
    errors::DiscountsServiceError,
    models::{Coupon, DiscountRule},
};

/// Canonical form of a coupon code: trimmed and upper-cased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Check a coupon against a subtotal at a point in time and return the
/// discount amount, which never exceeds the subtotal.
///
/// # Errors
///
/// - [`DiscountsServiceError::CouponExpired`] when `point_in_time` falls
///   outside `[starts_at, expires_at)`.
/// - [`DiscountsServiceError::CouponMinimumNotMet`] when the subtotal is
///   below the coupon's minimum.
pub fn evaluate_coupon(
    coupon: &Coupon,
    subtotal: u64,
    point_in_time: Timestamp,
) -> Result<u64, DiscountsServiceError> {
    let not_started = coupon
        .starts_at
        .is_some_and(|starts_at| point_in_time < starts_at);

    let expired = coupon
        .expires_at
        .is_some_and(|expires_at| point_in_time >= expires_at);

    if not_started || expired {
        return Err(DiscountsServiceError::CouponExpired(coupon.code.clone()));
    }

    if let Some(minimum) = coupon.minimum_subtotal
        && subtotal < minimum
    {
        return Err(DiscountsServiceError::CouponMinimumNotMet {
            code: coupon.code.clone(),
            minimum,
            subtotal,
        });
    }

    let discount = match coupon.rule {
        DiscountRule::AmountOff { amount } => amount,
        DiscountRule::PercentageOff { percentage } => percentage_of(subtotal, percentage),
    };

    Ok(discount.min(subtotal))
}

/// Validate a coupon definition before it is stored.
///
/// # Errors
///
/// Returns [`DiscountsServiceError::InvalidCoupon`] for a blank code, a
/// percentage above 100 or an empty validity window.
pub fn validate_coupon(coupon: &Coupon) -> Result<(), DiscountsServiceError> {
    if coupon.code.trim().is_empty() {
        return Err(DiscountsServiceError::InvalidCoupon("code must not be blank"));
    }

    if let DiscountRule::PercentageOff { percentage } = coupon.rule
        && percentage > 100
    {
        return Err(DiscountsServiceError::InvalidCoupon(
            "percentage must be between 0 and 100",
        ));
    }

    if let (Some(starts_at), Some(expires_at)) = (coupon.starts_at, coupon.expires_at)
        && expires_at <= starts_at
    {
        return Err(DiscountsServiceError::InvalidCoupon(
            "expiry must be after the start",
        ));
    }

    Ok(())
}

/// Percentage of an amount in minor units, rounded half away from zero.
fn percentage_of(amount: u64, percentage: u16) -> u64 {
    let applied = Decimal::from(amount) * Decimal::from(percentage) / Decimal::ONE_HUNDRED;

    applied
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(amount)
}
