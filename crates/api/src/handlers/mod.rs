//! HTTP handlers, grouped by resource.

pub mod cart;
pub mod product;
