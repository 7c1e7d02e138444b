//! Products service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

use crate::domain::products::{
    errors::ProductsServiceError,
    models::{NewProduct, Product, ProductUuid},
};

/// Catalog backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryProductsService {
    products: RwLock<FxHashMap<ProductUuid, Product>>,
}

impl InMemoryProductsService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductsService for InMemoryProductsService {
    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError> {
        self.products
            .read()
            .await
            .get(&product)
            .cloned()
            .ok_or(ProductsServiceError::NotFound)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        let name = product.name.trim();

        if name.is_empty() {
            return Err(ProductsServiceError::MissingRequiredData);
        }

        let mut products = self.products.write().await;

        if products.contains_key(&product.uuid) {
            return Err(ProductsServiceError::AlreadyExists);
        }

        let now = Timestamp::now();

        let created = Product {
            uuid: product.uuid,
            name: name.to_string(),
            price: product.price,
            created_at: now,
            updated_at: now,
        };

        products.insert(created.uuid, created.clone());

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieve a single product with its current canonical price.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError>;

    /// Add a product to the catalog.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;
}
