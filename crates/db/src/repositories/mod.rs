//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod cart_item_repo;
pub mod product_repo;
pub mod user_repo;

pub use cart_item_repo::CartItemRepo;
pub use product_repo::ProductRepo;
pub use user_repo::UserRepo;
