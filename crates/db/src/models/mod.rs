//! Row models and create/update DTOs, one module per table.

pub mod cart_item;
pub mod product;
pub mod user;
