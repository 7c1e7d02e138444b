//! Catalog Fixtures
//!
//! A YAML description of the products, opening stock and coupons a fresh
//! process should start with:
//!
//! ```yaml
//! products:
//!   - uuid: 0199f0d2-5c1e-7d4a-9a55-2f1c3e4b5a01
//!     name: Kaju Katli
//!     price: "50.00"
//!     stock: 25
//! coupons:
//!   - code: SAVE20
//!     rule:
//!       type: amount_off
//!       amount: 2000
//! ```

use std::{fs, path::Path, str::FromStr};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{
    discounts::models::Coupon,
    products::models::{NewProduct, ProductUuid},
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading the fixture file
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Price that is not a non-negative amount with at most two decimals
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),
}

/// Catalog Fixture
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFixture {
    #[serde(default)]
    pub products: Vec<ProductFixture>,

    #[serde(default)]
    pub coupons: Vec<Coupon>,
}

/// Product Fixture
#[derive(Debug, Clone, Deserialize)]
pub struct ProductFixture {
    pub uuid: ProductUuid,
    pub name: String,

    /// Major units as a decimal string, e.g. `"12.50"`.
    pub price: String,

    /// Opening stock.
    #[serde(default)]
    pub stock: u64,
}

impl CatalogFixture {
    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML does not describe a catalog.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }
}

impl ProductFixture {
    /// Convert into a catalog entry, parsing the price into minor units.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::InvalidPrice`] for malformed prices.
    pub fn to_new_product(&self) -> Result<NewProduct, FixtureError> {
        Ok(NewProduct {
            uuid: self.uuid,
            name: self.name.clone(),
            price: parse_price(&self.price)?,
        })
    }
}

/// Parse a major-unit decimal string such as `"12.50"` into minor units.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] for negative amounts, more than two
/// decimal places or values that do not fit.
pub fn parse_price(price: &str) -> Result<u64, FixtureError> {
    let amount = Decimal::from_str(price.trim())
        .map_err(|error| FixtureError::InvalidPrice(format!("{price}: {error}")))?
        .normalize();

    if amount.is_sign_negative() || amount.scale() > 2 {
        return Err(FixtureError::InvalidPrice(price.to_string()));
    }

    (amount * Decimal::ONE_HUNDRED)
        .to_u64()
        .ok_or_else(|| FixtureError::InvalidPrice(price.to_string()))
}
