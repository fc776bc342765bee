//! Product catalog models.
//!
//! Products are read-only from the cart's perspective: `stock` is only ever
//! read to compute availability, never mutated by a cart operation.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storefront_core::types::{DbId, Timestamp};

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    /// Total units available; in-cart quantities reserve against this.
    pub stock: i32,
    /// Size variants this product is offered in (empty = no sizes).
    pub sizes: Vec<String>,
    pub image_urls: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new product (seeding and tests).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub image_urls: Vec<String>,
}
