//! Discounts service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

use crate::domain::discounts::{
    errors::DiscountsServiceError,
    models::Coupon,
    rules::{evaluate_coupon, normalize_code, validate_coupon},
};

/// Active coupons held in process memory, keyed by normalised code.
#[derive(Debug, Default)]
pub struct InMemoryDiscountsService {
    coupons: RwLock<FxHashMap<String, Coupon>>,
}

impl InMemoryDiscountsService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DiscountsService for InMemoryDiscountsService {
    async fn get_active_coupon(&self, code: &str) -> Result<Coupon, DiscountsServiceError> {
        let code = normalize_code(code);

        self.coupons
            .read()
            .await
            .get(&code)
            .cloned()
            .ok_or(DiscountsServiceError::CouponNotFound(code))
    }

    async fn create_coupon(&self, coupon: Coupon) -> Result<Coupon, DiscountsServiceError> {
        validate_coupon(&coupon)?;

        let coupon = Coupon {
            code: normalize_code(&coupon.code),
            ..coupon
        };

        let mut coupons = self.coupons.write().await;

        if coupons.contains_key(&coupon.code) {
            return Err(DiscountsServiceError::AlreadyExists(coupon.code));
        }

        coupons.insert(coupon.code.clone(), coupon.clone());

        Ok(coupon)
    }

    async fn evaluate(
        &self,
        code: &str,
        subtotal: u64,
        point_in_time: Timestamp,
    ) -> Result<u64, DiscountsServiceError> {
        let coupon = self.get_active_coupon(code).await?;

        evaluate_coupon(&coupon, subtotal, point_in_time)
    }
}

#[automock]
#[async_trait]
pub trait DiscountsService: Send + Sync {
    /// Look up an active coupon by code, ignoring case and surrounding space.
    async fn get_active_coupon(&self, code: &str) -> Result<Coupon, DiscountsServiceError>;

    /// Register a coupon.
    async fn create_coupon(&self, coupon: Coupon) -> Result<Coupon, DiscountsServiceError>;

    /// Discount the coupon grants on `subtotal` at `point_in_time`.
    ///
    /// Read-only: evaluating never consumes or records the coupon.
    async fn evaluate(
        &self,
        code: &str,
        subtotal: u64,
        point_in_time: Timestamp,
    ) -> Result<u64, DiscountsServiceError>;
}
