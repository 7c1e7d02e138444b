//! Cart, inventory, discount and order services behind the sweet shop API.

pub mod context;
pub mod domain;
pub mod fixtures;
pub mod uuids;

#[cfg(test)]
mod test;
