//! Coupon Errors

use salvo::http::StatusCode;

use sweetcart_app::domain::discounts::DiscountsServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: DiscountsServiceError) -> ApiError {
    match error {
        DiscountsServiceError::CouponNotFound(code) => {
            ApiError::new(StatusCode::NOT_FOUND, "CouponNotFound", "Coupon not found")
                .with_detail("coupon_code", code)
        }
        DiscountsServiceError::CouponExpired(code) => ApiError::new(
            StatusCode::CONFLICT,
            "CouponExpired",
            "Coupon is not valid at this time",
        )
        .with_detail("coupon_code", code),
        DiscountsServiceError::CouponMinimumNotMet {
            code,
            minimum,
            subtotal,
        } => ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "CouponMinimumNotMet",
            "Subtotal is below the coupon minimum",
        )
        .with_detail("coupon_code", code)
        .with_detail("minimum", minimum)
        .with_detail("subtotal", subtotal),
        DiscountsServiceError::AlreadyExists(code) => {
            ApiError::new(StatusCode::CONFLICT, "CouponExists", "Coupon already exists")
                .with_detail("coupon_code", code)
        }
        DiscountsServiceError::InvalidCoupon(reason) => {
            ApiError::new(StatusCode::BAD_REQUEST, "InvalidCoupon", reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coupon_errors_map_to_documented_statuses() {
        let cases = [
            (
                DiscountsServiceError::CouponNotFound("X".to_string()),
                "CouponNotFound",
            ),
            (
                DiscountsServiceError::CouponExpired("X".to_string()),
                "CouponExpired",
            ),
            (
                DiscountsServiceError::CouponMinimumNotMet {
                    code: "X".to_string(),
                    minimum: 10,
                    subtotal: 5,
                },
                "CouponMinimumNotMet",
            ),
        ];

        for (error, code) in cases {
            assert_eq!(into_api_error(error).code(), code);
        }
    }
}
