//! Discount Handlers

pub(crate) mod preview;
