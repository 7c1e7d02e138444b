//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::domain::{
    carts::{errors::CartsServiceError, models::Cart},
    products::{ProductsService, ProductsServiceError, models::ProductUuid},
    users::UserUuid,
};

/// Carts held in process memory.
///
/// Each user's cart sits behind its own lock, so one user's mutations are
/// applied one at a time and never wait on another user's cart.
pub struct InMemoryCartsService {
    products: Arc<dyn ProductsService>,
    carts: RwLock<FxHashMap<UserUuid, Arc<Mutex<Cart>>>>,
}

impl std::fmt::Debug for InMemoryCartsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCartsService").finish_non_exhaustive()
    }
}

impl InMemoryCartsService {
    #[must_use]
    pub fn new(products: Arc<dyn ProductsService>) -> Self {
        Self {
            products,
            carts: RwLock::default(),
        }
    }

    async fn existing(&self, user: UserUuid) -> Option<Arc<Mutex<Cart>>> {
        self.carts.read().await.get(&user).cloned()
    }

    async fn get_or_create(&self, user: UserUuid) -> Arc<Mutex<Cart>> {
        if let Some(cart) = self.existing(user).await {
            return cart;
        }

        Arc::clone(
            self.carts
                .write()
                .await
                .entry(user)
                .or_insert_with(|| Arc::new(Mutex::new(Cart::empty(user)))),
        )
    }

    /// Forget an empty cart nobody else is holding, so the map only keeps
    /// users with something in their cart.
    async fn prune(&self, user: UserUuid) {
        let mut carts = self.carts.write().await;

        let idle_and_empty = carts.get(&user).is_some_and(|cart| {
            Arc::strong_count(cart) == 1 && cart.try_lock().is_ok_and(|cart| cart.is_empty())
        });

        if idle_and_empty {
            carts.remove(&user);
        }
    }
}

#[async_trait]
impl CartsService for InMemoryCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        match self.existing(user).await {
            Some(cart) => Ok(cart.lock().await.clone()),
            None => Ok(Cart::empty(user)),
        }
    }

    async fn add_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError> {
        if quantity <= 0 {
            return Err(CartsServiceError::InvalidQuantity(quantity));
        }

        let product = self
            .products
            .get_product(product)
            .await
            .map_err(|error| match error {
                ProductsServiceError::NotFound => CartsServiceError::ProductNotFound(product),
                other => CartsServiceError::Products(other),
            })?;

        let cart = self.get_or_create(user).await;
        let mut cart = cart.lock().await;

        cart.add(&product, quantity)?;

        debug!(%user, product = %product.uuid, quantity, "cart item added");

        Ok(cart.clone())
    }

    async fn update_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError> {
        let Some(cart) = self.existing(user).await else {
            return if quantity <= 0 {
                Ok(Cart::empty(user))
            } else {
                Err(CartsServiceError::ItemNotFound(product))
            };
        };

        let mut cart = cart.lock().await;

        cart.set_quantity(product, quantity)?;

        debug!(%user, %product, quantity, "cart item updated");

        Ok(cart.clone())
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<Cart, CartsServiceError> {
        let Some(cart) = self.existing(user).await else {
            return Ok(Cart::empty(user));
        };

        let mut cart = cart.lock().await;

        cart.remove(product);

        Ok(cart.clone())
    }

    async fn total(&self, user: UserUuid) -> Result<u64, CartsServiceError> {
        Ok(self.get_cart(user).await?.total())
    }

    async fn remove_ordered(
        &self,
        user: UserUuid,
        ordered: Vec<(ProductUuid, u64)>,
    ) -> Result<Cart, CartsServiceError> {
        let Some(cart) = self.existing(user).await else {
            return Ok(Cart::empty(user));
        };

        let remaining = {
            let mut cart = cart.lock().await;

            for (product, units) in ordered {
                cart.subtract(product, units);
            }

            cart.clone()
        };

        drop(cart);

        self.prune(user).await;

        Ok(remaining)
    }

    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        if let Some(cart) = self.existing(user).await {
            cart.lock().await.clear();

            debug!(%user, "cart cleared");
        }

        self.prune(user).await;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart; users without one get an empty cart.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Add units of a product, caching its current catalog price.
    async fn add_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError>;

    /// Replace the quantity of a line; zero or less removes it.
    async fn update_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a line. Removing an absent product is not an error.
    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<Cart, CartsServiceError>;

    /// Display total from cached cart prices.
    async fn total(&self, user: UserUuid) -> Result<u64, CartsServiceError>;

    /// Take checked-out units off the user's cart. Units added after the
    /// checkout read the cart stay in it.
    async fn remove_ordered(
        &self,
        user: UserUuid,
        ordered: Vec<(ProductUuid, u64)>,
    ) -> Result<Cart, CartsServiceError>;

    /// Empty the user's cart.
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::inventory::InventoryLedger, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn cart_is_created_lazily_on_first_add() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product("Barfi", 30_00, 10).await?;

        let before = ctx.carts.get_cart(ctx.user).await?;

        assert!(before.is_empty());
        assert!(before.updated_at.is_none());

        let cart = ctx.carts.add_item(ctx.user, product, 2).await?;

        assert_eq!(cart.user, ctx.user);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total(), 60_00);
        assert!(cart.updated_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn add_item_does_not_check_or_touch_stock() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product("Jalebi", 5_00, 1).await?;

        let cart = ctx.carts.add_item(ctx.user, product, 50).await?;

        assert_eq!(cart.item_count(), 50);
        assert_eq!(ctx.inventory.available(product).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_with_invalid_quantity_skips_catalog_lookup() -> TestResult {
        let mut products = crate::domain::products::MockProductsService::new();

        products.expect_get_product().never();

        let carts = InMemoryCartsService::new(Arc::new(products));

        let result = carts.add_item(UserUuid::new(), ProductUuid::new(), 0).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity(0))),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_unknown_product_returns_product_not_found() -> TestResult {
        let ctx = TestContext::new();
        let product = ProductUuid::new();

        let result = ctx.carts.add_item(ctx.user, product, 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound(p)) if p == product),
            "expected ProductNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_is_idempotent() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product("Peda", 8_00, 10).await?;

        ctx.carts.remove_item(ctx.user, product).await?;
        ctx.carts.add_item(ctx.user, product, 1).await?;
        ctx.carts.remove_item(ctx.user, product).await?;

        let cart = ctx.carts.remove_item(ctx.user, product).await?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn update_item_without_cart() -> TestResult {
        let ctx = TestContext::new();
        let product = ProductUuid::new();

        let removed = ctx.carts.update_item(ctx.user, product, 0).await?;

        assert!(removed.is_empty());

        let result = ctx.carts.update_item(ctx.user, product, 3).await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound(p)) if p == product),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn carts_are_isolated_per_user() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product("Halwa", 15_00, 10).await?;
        let other = UserUuid::new();

        ctx.carts.add_item(ctx.user, product, 2).await?;
        ctx.carts.add_item(other, product, 5).await?;
        ctx.carts.clear_cart(other).await?;

        assert_eq!(ctx.carts.total(ctx.user).await?, 30_00);
        assert_eq!(ctx.carts.total(other).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_adds_from_one_user_are_all_applied() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product("Soan Papdi", 4_00, 10).await?;
        let carts = Arc::clone(&ctx.carts);
        let user = ctx.user;

        let adds = (0..16)
            .map(|_| {
                let carts = Arc::clone(&carts);

                tokio::spawn(async move { carts.add_item(user, product, 1).await })
            })
            .collect::<Vec<_>>();

        for add in adds {
            add.await??;
        }

        let cart = ctx.carts.get_cart(user).await?;

        assert_eq!(cart.item(product).map(|item| item.quantity), Some(16));

        Ok(())
    }

    #[tokio::test]
    async fn emptied_carts_are_dropped_from_the_store() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product("Rasgulla", 6_00, 10).await?;
        let other = UserUuid::new();

        ctx.carts.add_item(ctx.user, product, 1).await?;
        ctx.carts.add_item(other, product, 2).await?;
        ctx.carts.clear_cart(ctx.user).await?;
        ctx.carts.remove_ordered(other, vec![(product, 2)]).await?;

        assert!(
            ctx.carts.carts.read().await.is_empty(),
            "empty carts should not be retained"
        );
        assert!(ctx.carts.get_cart(ctx.user).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn remove_ordered_keeps_units_added_after_checkout_read_the_cart() -> TestResult {
        let ctx = TestContext::new();
        let ordered = ctx.create_product("Ladoo", 10_00, 10).await?;
        let later = ctx.create_product("Kaju Katli", 20_00, 10).await?;

        ctx.carts.add_item(ctx.user, ordered, 2).await?;

        let snapshot = ctx.carts.get_cart(ctx.user).await?;

        ctx.carts.add_item(ctx.user, ordered, 1).await?;
        ctx.carts.add_item(ctx.user, later, 1).await?;

        let lines = snapshot
            .items
            .iter()
            .map(|item| (item.product_uuid, item.quantity))
            .collect();

        let cart = ctx.carts.remove_ordered(ctx.user, lines).await?;

        assert_eq!(cart.item(ordered).map(|item| item.quantity), Some(1));
        assert_eq!(cart.item(later).map(|item| item.quantity), Some(1));
        assert_eq!(ctx.carts.total(ctx.user).await?, 30_00);

        Ok(())
    }
}
