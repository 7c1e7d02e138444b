//! Inventory Models

use smallvec::SmallVec;

use crate::domain::products::models::ProductUuid;

/// A quantity of one product to take out of stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockRequest {
    pub product: ProductUuid,
    pub quantity: u64,
}

/// A product whose available stock could not cover the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockShortfall {
    pub product: ProductUuid,
    pub available: u64,
    pub requested: u64,
}

/// Receipt for stock that has been decremented.
///
/// Handing it back to the ledger's `release` restores exactly these units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    items: SmallVec<[StockRequest; 4]>,
}

impl Reservation {
    pub(crate) fn new(items: impl IntoIterator<Item = StockRequest>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    /// Reserved lines, one per product, ordered by product uuid.
    pub fn items(&self) -> &[StockRequest] {
        &self.items
    }

    /// Total units held by this reservation.
    pub fn units(&self) -> u64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
