//! Checkout Models

use std::fmt;

/// What the customer submits at checkout. Prices and discounts are never
/// taken from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub delivery_address: String,
    pub notes: Option<String>,
    pub coupon_code: Option<String>,
}

impl CheckoutRequest {
    /// Trimmed delivery address.
    pub fn address(&self) -> &str {
        self.delivery_address.trim()
    }

    /// Trimmed notes; blank notes are treated as absent.
    pub fn notes(&self) -> Option<&str> {
        non_blank(self.notes.as_deref())
    }

    /// Trimmed coupon code; a blank code means no coupon.
    pub fn coupon_code(&self) -> Option<&str> {
        non_blank(self.coupon_code.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Stages of a single checkout attempt.
///
/// An attempt only moves forward through `Validating`, `Reserving`,
/// `Pricing` and `Committing` to `Done`, and may drop to `Failed` from any of
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    Validating,
    Reserving,
    Pricing,
    Committing,
    Done,
    Failed,
}

impl CheckoutStage {
    #[must_use]
    pub const fn to_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Reserving => "reserving",
            Self::Pricing => "pricing",
            Self::Committing => "committing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Whether the attempt may move from `self` to `next`.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Validating, Self::Reserving)
                | (Self::Reserving, Self::Pricing)
                | (Self::Pricing, Self::Committing)
                | (Self::Committing, Self::Done)
                | (
                    Self::Validating | Self::Reserving | Self::Pricing | Self::Committing,
                    Self::Failed
                )
        )
    }
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_only_move_forward() {
        use CheckoutStage::{Committing, Done, Failed, Pricing, Reserving, Validating};

        assert!(Validating.can_advance_to(Reserving));
        assert!(Committing.can_advance_to(Done));
        assert!(Pricing.can_advance_to(Failed));

        assert!(!Reserving.can_advance_to(Validating));
        assert!(!Validating.can_advance_to(Committing));
        assert!(!Done.can_advance_to(Failed));
        assert!(!Failed.can_advance_to(Validating));
    }

    #[test]
    fn blank_optional_fields_are_absent() {
        let request = CheckoutRequest {
            delivery_address: "  12 MG Road ".to_string(),
            notes: Some("   ".to_string()),
            coupon_code: Some(" save20 ".to_string()),
        };

        assert_eq!(request.address(), "12 MG Road");
        assert_eq!(request.notes(), None);
        assert_eq!(request.coupon_code(), Some("save20"));
    }
}
