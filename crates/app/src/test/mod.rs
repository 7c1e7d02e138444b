//! Test context for service-level tests.

use std::sync::Arc;

use testresult::TestResult;

use crate::domain::{
    carts::InMemoryCartsService,
    checkout::DefaultCheckoutService,
    discounts::InMemoryDiscountsService,
    inventory::{InMemoryInventoryLedger, InventoryLedger},
    orders::InMemoryOrdersService,
    products::{
        InMemoryProductsService, ProductsService,
        models::{NewProduct, ProductUuid},
    },
    users::UserUuid,
};

pub struct TestContext {
    pub user: UserUuid,
    pub products: Arc<InMemoryProductsService>,
    pub inventory: Arc<InMemoryInventoryLedger>,
    pub carts: Arc<InMemoryCartsService>,
    pub discounts: Arc<InMemoryDiscountsService>,
    pub orders: Arc<InMemoryOrdersService>,
    pub checkout: Arc<DefaultCheckoutService>,
}

impl TestContext {
    pub fn new() -> Self {
        let products = Arc::new(InMemoryProductsService::new());
        let inventory = Arc::new(InMemoryInventoryLedger::new());
        let discounts = Arc::new(InMemoryDiscountsService::new());
        let orders = Arc::new(InMemoryOrdersService::new());
        let carts = Arc::new(InMemoryCartsService::new(products.clone()));

        let checkout = Arc::new(DefaultCheckoutService::new(
            carts.clone(),
            products.clone(),
            inventory.clone(),
            discounts.clone(),
            orders.clone(),
        ));

        Self {
            user: UserUuid::new(),
            products,
            inventory,
            carts,
            discounts,
            orders,
            checkout,
        }
    }

    /// Add a product to the catalog with the given opening stock.
    pub async fn create_product(
        &self,
        name: &str,
        price: u64,
        stock: u64,
    ) -> TestResult<ProductUuid> {
        let product = self
            .products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                name: name.to_string(),
                price,
            })
            .await?;

        self.inventory.restock(product.uuid, stock).await?;

        Ok(product.uuid)
    }
}
