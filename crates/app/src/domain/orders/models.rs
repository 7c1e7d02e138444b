//! Order Models

use std::fmt;

use jiff::Timestamp;

use crate::{
    domain::{products::models::ProductUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Model
///
/// Immutable once created: prices and names are copied from the catalog at
/// checkout and do not follow later catalog changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user: UserUuid,
    pub line_items: Vec<LineItem>,
    pub subtotal: u64,
    pub discount: u64,
    pub coupon_code: Option<String>,
    pub total: u64,
    pub delivery_address: String,
    pub notes: Option<String>,
    pub status: OrderStatus,
    pub ordered_at: Timestamp,
}

/// Line Item Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub quantity: u64,
    pub unit_price: u64,
    pub line_total: u64,
}

/// Order fulfilment status. Orders leave checkout as [`OrderStatus::Placed`];
/// later transitions belong to fulfilment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Placed,
}

impl OrderStatus {
    #[must_use]
    pub const fn to_str(&self) -> &'static str {
        match self {
            Self::Placed => "placed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}
