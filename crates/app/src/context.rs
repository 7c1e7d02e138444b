//! App Context

use std::{path::Path, sync::Arc};

use thiserror::Error;
use tracing::info;

use crate::{
    domain::{
        carts::{CartsService, InMemoryCartsService},
        checkout::{CheckoutService, DefaultCheckoutService},
        discounts::{DiscountsService, DiscountsServiceError, InMemoryDiscountsService},
        inventory::{InMemoryInventoryLedger, InventoryError, InventoryLedger},
        orders::{InMemoryOrdersService, OrdersService},
        products::{InMemoryProductsService, ProductsService, ProductsServiceError},
    },
    fixtures::{CatalogFixture, FixtureError},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to load catalog")]
    Catalog(#[from] FixtureError),

    #[error("failed to seed product")]
    Products(#[source] ProductsServiceError),

    #[error("failed to seed stock")]
    Inventory(#[source] InventoryError),

    #[error("failed to seed coupon")]
    Discounts(#[source] DiscountsServiceError),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub inventory: Arc<dyn InventoryLedger>,
    pub carts: Arc<dyn CartsService>,
    pub discounts: Arc<dyn DiscountsService>,
    pub orders: Arc<dyn OrdersService>,
    pub checkout: Arc<dyn CheckoutService>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build an empty application context backed by process memory.
    #[must_use]
    pub fn in_memory() -> Self {
        let products: Arc<dyn ProductsService> = Arc::new(InMemoryProductsService::new());
        let inventory: Arc<dyn InventoryLedger> = Arc::new(InMemoryInventoryLedger::new());
        let discounts: Arc<dyn DiscountsService> = Arc::new(InMemoryDiscountsService::new());
        let orders: Arc<dyn OrdersService> = Arc::new(InMemoryOrdersService::new());
        let carts: Arc<dyn CartsService> =
            Arc::new(InMemoryCartsService::new(Arc::clone(&products)));

        let checkout = Arc::new(DefaultCheckoutService::new(
            Arc::clone(&carts),
            Arc::clone(&products),
            Arc::clone(&inventory),
            Arc::clone(&discounts),
            Arc::clone(&orders),
        ));

        Self {
            products,
            inventory,
            carts,
            discounts,
            orders,
            checkout,
        }
    }

    /// Build application context seeded from a YAML catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be read or contains invalid
    /// or duplicate entries.
    pub async fn from_catalog_path(path: impl AsRef<Path>) -> Result<Self, AppInitError> {
        let catalog = CatalogFixture::load(path)?;
        let context = Self::in_memory();

        context.seed(catalog).await?;

        Ok(context)
    }

    /// Add a catalog's products, stock and coupons.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid or duplicate entries. Entries seeded
    /// before the failing one are kept.
    pub async fn seed(&self, catalog: CatalogFixture) -> Result<(), AppInitError> {
        for fixture in &catalog.products {
            let product = self
                .products
                .create_product(fixture.to_new_product()?)
                .await
                .map_err(AppInitError::Products)?;

            self.inventory
                .restock(product.uuid, fixture.stock)
                .await
                .map_err(AppInitError::Inventory)?;
        }

        for coupon in catalog.coupons {
            self.discounts
                .create_coupon(coupon)
                .await
                .map_err(AppInitError::Discounts)?;
        }

        info!(products = catalog.products.len(), "catalog seeded");

        Ok(())
    }
}
