//! Sweet Shop Domain Concerns

pub mod carts;
pub mod checkout;
pub mod discounts;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod users;
