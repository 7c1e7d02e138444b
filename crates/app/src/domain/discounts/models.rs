//! Coupon Models

use jiff::Timestamp;
use serde::Deserialize;

/// Coupon Model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Coupon {
    /// Stored upper-case; lookups are case-insensitive.
    pub code: String,
    pub rule: DiscountRule,
    #[serde(default)]
    pub minimum_subtotal: Option<u64>,
    #[serde(default)]
    pub starts_at: Option<Timestamp>,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

/// How much a coupon takes off the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountRule {
    /// Whole percent of the subtotal, 0 to 100.
    PercentageOff { percentage: u16 },

    /// Flat amount in minor units.
    AmountOff { amount: u64 },
}

impl DiscountRule {
    #[must_use]
    pub const fn to_str(&self) -> &'static str {
        match self {
            Self::PercentageOff { .. } => "percentage_off",
            Self::AmountOff { .. } => "amount_off",
        }
    }
}
