//! Inventory ledger.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::domain::{
    inventory::{
        errors::InventoryError,
        models::{Reservation, StockRequest},
        transaction::{StockCell, StockTransaction, consolidate},
    },
    products::models::ProductUuid,
};

/// Stock levels held in process memory, one lock per product.
#[derive(Debug, Default)]
pub struct InMemoryInventoryLedger {
    stock: RwLock<FxHashMap<ProductUuid, StockCell>>,
}

impl InMemoryInventoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the stock of every requested product without changing it.
    ///
    /// # Errors
    ///
    /// Returns an error for zero quantities or overflowing merged quantities.
    pub async fn begin(&self, items: &[StockRequest]) -> Result<StockTransaction, InventoryError> {
        let requested = consolidate(items)?;

        let cells = {
            let stock = self.stock.read().await;

            requested
                .into_iter()
                .map(|(product, quantity)| (product, quantity, stock.get(&product).cloned()))
                .collect::<Vec<_>>()
        };

        Ok(StockTransaction::lock(cells).await)
    }

    async fn cell(&self, product: ProductUuid) -> Option<StockCell> {
        self.stock.read().await.get(&product).cloned()
    }

    async fn cell_or_insert(&self, product: ProductUuid) -> StockCell {
        self.stock
            .write()
            .await
            .entry(product)
            .or_insert_with(|| Arc::new(Mutex::new(0)))
            .clone()
    }
}

#[async_trait]
impl InventoryLedger for InMemoryInventoryLedger {
    async fn available(&self, product: ProductUuid) -> Result<u64, InventoryError> {
        let Some(cell) = self.cell(product).await else {
            return Ok(0);
        };

        Ok(*cell.lock().await)
    }

    async fn restock(&self, product: ProductUuid, quantity: u64) -> Result<u64, InventoryError> {
        let cell = self.cell_or_insert(product).await;
        let mut level = cell.lock().await;

        *level = level
            .checked_add(quantity)
            .ok_or(InventoryError::Overflow { product })?;

        debug!(%product, quantity, level = *level, "stock replenished");

        Ok(*level)
    }

    async fn reserve_and_decrement(
        &self,
        items: Vec<StockRequest>,
    ) -> Result<Reservation, InventoryError> {
        let transaction = self.begin(&items).await?;

        match transaction.commit() {
            Ok(reservation) => {
                debug!(units = reservation.units(), "stock reserved");

                Ok(reservation)
            }
            Err(InventoryError::InsufficientStock(shortfalls)) => {
                for shortfall in &shortfalls {
                    warn!(
                        product = %shortfall.product,
                        available = shortfall.available,
                        requested = shortfall.requested,
                        "insufficient stock"
                    );
                }

                Err(InventoryError::InsufficientStock(shortfalls))
            }
            Err(error) => Err(error),
        }
    }

    async fn release(&self, reservation: Reservation) -> Result<(), InventoryError> {
        let cells = {
            let stock = self.stock.read().await;

            reservation
                .items()
                .iter()
                .map(|item| (*item, stock.get(&item.product).cloned()))
                .collect::<Vec<_>>()
        };

        // Check every line before touching any, so a failed release is a no-op.
        let mut guards = Vec::with_capacity(cells.len());

        for (item, cell) in cells {
            let Some(cell) = cell else {
                return Err(InventoryError::NotStocked {
                    product: item.product,
                });
            };

            let guard = cell.lock_owned().await;

            if guard.checked_add(item.quantity).is_none() {
                return Err(InventoryError::Overflow {
                    product: item.product,
                });
            }

            guards.push((item, guard));
        }

        for (item, mut guard) in guards {
            *guard += item.quantity;
        }

        debug!(units = reservation.units(), "stock released");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait InventoryLedger: Send + Sync {
    /// Units of the product currently available; zero for unknown products.
    async fn available(&self, product: ProductUuid) -> Result<u64, InventoryError>;

    /// Add stock for a product and return the new level.
    async fn restock(&self, product: ProductUuid, quantity: u64) -> Result<u64, InventoryError>;

    /// Check every request against available stock and, only if all of them
    /// fit, decrement all of them together.
    async fn reserve_and_decrement(
        &self,
        items: Vec<StockRequest>,
    ) -> Result<Reservation, InventoryError>;

    /// Put the units of a previous reservation back into stock.
    async fn release(&self, reservation: Reservation) -> Result<(), InventoryError>;
}
