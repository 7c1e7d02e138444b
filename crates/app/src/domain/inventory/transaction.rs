//! Stock transactions.
//!
//! A [`StockTransaction`] is the unit of work behind a multi-product stock
//! decrement. It holds the lock of every product it touches, acquired in
//! ascending product order, so two transactions over overlapping products
//! serialise while transactions over disjoint products never wait on each
//! other. Dropping a transaction without committing it leaves stock as it was.

use std::{collections::BTreeMap, fmt, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    inventory::{
        errors::InventoryError,
        models::{Reservation, StockRequest, StockShortfall},
    },
    products::models::ProductUuid,
};

/// Shared, lockable stock level for one product.
pub(crate) type StockCell = Arc<Mutex<u64>>;

struct TransactionLine {
    product: ProductUuid,
    requested: u64,
    // `None` when the ledger has never stocked the product.
    guard: Option<OwnedMutexGuard<u64>>,
}

impl TransactionLine {
    fn available(&self) -> u64 {
        self.guard.as_deref().copied().unwrap_or(0)
    }
}

/// Locked view over the stock of a set of products.
pub struct StockTransaction {
    lines: Vec<TransactionLine>,
}

impl fmt::Debug for StockTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.lines
                    .iter()
                    .map(|line| (line.product, line.requested, line.available())),
            )
            .finish()
    }
}

impl StockTransaction {
    /// Lock every cell in order. `cells` must already be sorted by product.
    pub(crate) async fn lock(cells: Vec<(ProductUuid, u64, Option<StockCell>)>) -> Self {
        let mut lines = Vec::with_capacity(cells.len());

        for (product, requested, cell) in cells {
            let guard = match cell {
                Some(cell) => Some(cell.lock_owned().await),
                None => None,
            };

            lines.push(TransactionLine {
                product,
                requested,
                guard,
            });
        }

        Self { lines }
    }

    /// Products that cannot be satisfied at the locked stock levels.
    pub fn shortfalls(&self) -> Vec<StockShortfall> {
        self.lines
            .iter()
            .filter(|line| line.available() < line.requested)
            .map(|line| StockShortfall {
                product: line.product,
                available: line.available(),
                requested: line.requested,
            })
            .collect()
    }

    /// Decrement every product, or none of them.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InsufficientStock`] naming every product
    /// whose available stock is below the requested quantity.
    pub fn commit(mut self) -> Result<Reservation, InventoryError> {
        let shortfalls = self.shortfalls();

        if !shortfalls.is_empty() {
            return Err(InventoryError::InsufficientStock(shortfalls));
        }

        for line in &mut self.lines {
            if let Some(level) = line.guard.as_deref_mut() {
                *level -= line.requested;
            }
        }

        Ok(Reservation::new(self.lines.iter().map(|line| StockRequest {
            product: line.product,
            quantity: line.requested,
        })))
    }
}

/// Merge duplicate products and order the result by product uuid, which is
/// the lock acquisition order.
///
/// # Errors
///
/// Returns an error for a zero quantity or when merged quantities overflow.
pub(crate) fn consolidate(
    items: &[StockRequest],
) -> Result<BTreeMap<ProductUuid, u64>, InventoryError> {
    let mut merged = BTreeMap::new();

    for item in items {
        if item.quantity == 0 {
            return Err(InventoryError::InvalidQuantity {
                product: item.product,
            });
        }

        let total: &mut u64 = merged.entry(item.product).or_default();

        *total = total
            .checked_add(item.quantity)
            .ok_or(InventoryError::Overflow {
                product: item.product,
            })?;
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn cell(level: u64) -> Option<StockCell> {
        Some(Arc::new(Mutex::new(level)))
    }

    #[test]
    fn consolidate_merges_duplicates_in_product_order() -> TestResult {
        let a = ProductUuid::new();
        let b = ProductUuid::new();

        let merged = consolidate(&[
            StockRequest {
                product: b,
                quantity: 1,
            },
            StockRequest {
                product: a,
                quantity: 2,
            },
            StockRequest {
                product: b,
                quantity: 3,
            },
        ])?;

        assert_eq!(merged.into_iter().collect::<Vec<_>>(), vec![(a, 2), (b, 4)]);

        Ok(())
    }

    #[test]
    fn consolidate_rejects_zero_quantity() {
        let product = ProductUuid::new();

        let result = consolidate(&[StockRequest {
            product,
            quantity: 0,
        }]);

        assert!(
            matches!(result, Err(InventoryError::InvalidQuantity { product: p }) if p == product),
            "expected InvalidQuantity, got {result:?}"
        );
    }

    #[tokio::test]
    async fn commit_decrements_every_line() -> TestResult {
        let a = ProductUuid::new();
        let b = ProductUuid::new();
        let a_cell = cell(5);
        let b_cell = cell(1);

        let tx = StockTransaction::lock(vec![(a, 2, a_cell.clone()), (b, 1, b_cell.clone())]).await;
        let reservation = tx.commit()?;

        assert_eq!(reservation.units(), 3);

        if let (Some(a_cell), Some(b_cell)) = (a_cell, b_cell) {
            assert_eq!(*a_cell.lock().await, 3);
            assert_eq!(*b_cell.lock().await, 0);
        }

        Ok(())
    }

    #[tokio::test]
    async fn failed_commit_leaves_every_line_untouched() {
        let a = ProductUuid::new();
        let b = ProductUuid::new();
        let missing = ProductUuid::new();
        let a_cell = cell(5);
        let b_cell = cell(1);

        let tx = StockTransaction::lock(vec![
            (a, 2, a_cell.clone()),
            (b, 4, b_cell.clone()),
            (missing, 1, None),
        ])
        .await;

        let result = tx.commit();

        let Err(InventoryError::InsufficientStock(shortfalls)) = result else {
            unreachable!("expected InsufficientStock, got {result:?}");
        };

        assert_eq!(
            shortfalls,
            vec![
                StockShortfall {
                    product: b,
                    available: 1,
                    requested: 4,
                },
                StockShortfall {
                    product: missing,
                    available: 0,
                    requested: 1,
                },
            ]
        );

        if let (Some(a_cell), Some(b_cell)) = (a_cell, b_cell) {
            assert_eq!(*a_cell.lock().await, 5, "a must not be decremented");
            assert_eq!(*b_cell.lock().await, 1, "b must not be decremented");
        }
    }
}
