//! Cart Models

use jiff::Timestamp;

use crate::domain::{
    carts::errors::CartsServiceError,
    products::models::{Product, ProductUuid},
    users::UserUuid,
};

/// Cart Model
///
/// At most one item per product, kept in the order products were first added.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub user: UserUuid,
    pub items: Vec<CartItem>,
    pub updated_at: Option<Timestamp>,
}

/// CartItem Model
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub quantity: u64,
    /// Catalog price when the product was first added. Display only.
    pub unit_price: u64,
}

impl CartItem {
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(self.quantity)
    }
}

impl Cart {
    #[must_use]
    pub fn empty(user: UserUuid) -> Self {
        Self {
            user,
            items: Vec::new(),
            updated_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of cached unit price times quantity.
    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .map(CartItem::line_total)
            .fold(0, u64::saturating_add)
    }

    /// Number of units across all items.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| item.quantity)
            .fold(0, u64::saturating_add)
    }

    pub fn item(&self, product: ProductUuid) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_uuid == product)
    }

    /// Add units of a product, incrementing an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::InvalidQuantity`] for a non-positive
    /// quantity or when the line quantity would overflow.
    pub fn add(&mut self, product: &Product, quantity: i64) -> Result<(), CartsServiceError> {
        let units = positive(quantity)?;

        match self
            .items
            .iter_mut()
            .find(|item| item.product_uuid == product.uuid)
        {
            Some(item) => {
                item.quantity = item
                    .quantity
                    .checked_add(units)
                    .ok_or(CartsServiceError::InvalidQuantity(quantity))?;
            }
            None => self.items.push(CartItem {
                product_uuid: product.uuid,
                name: product.name.clone(),
                quantity: units,
                unit_price: product.price,
            }),
        }

        self.touch();

        Ok(())
    }

    /// Replace the quantity of an existing line; zero or less removes it.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::ItemNotFound`] when a positive quantity
    /// is set for a product that is not in the cart.
    pub fn set_quantity(
        &mut self,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<(), CartsServiceError> {
        let Ok(units) = positive(quantity) else {
            self.remove(product);

            return Ok(());
        };

        let item = self
            .items
            .iter_mut()
            .find(|item| item.product_uuid == product)
            .ok_or(CartsServiceError::ItemNotFound(product))?;

        item.quantity = units;

        self.touch();

        Ok(())
    }

    /// Remove a product; absent products are ignored.
    pub fn remove(&mut self, product: ProductUuid) {
        let before = self.items.len();

        self.items.retain(|item| item.product_uuid != product);

        if self.items.len() != before {
            self.touch();
        }
    }

    /// Take `units` off a product's line, removing the line once it reaches
    /// zero. Absent products are ignored.
    pub fn subtract(&mut self, product: ProductUuid, units: u64) {
        let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_uuid == product)
        else {
            return;
        };

        item.quantity = item.quantity.saturating_sub(units);

        if item.quantity == 0 {
            self.items.retain(|item| item.product_uuid != product);
        }

        self.touch();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Some(Timestamp::now());
    }
}

fn positive(quantity: i64) -> Result<u64, CartsServiceError> {
    u64::try_from(quantity)
        .ok()
        .filter(|units| *units > 0)
        .ok_or(CartsServiceError::InvalidQuantity(quantity))
}
