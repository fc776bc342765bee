//! Cart line models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storefront_core::types::{DbId, Timestamp};

/// A row from the `cart_items` table: one reservation of a quantity of one
/// product variant for one user. (user_id, product_id, size_variant) is
/// unique; `size_variant` is `""` for the default variant.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CartItem {
    pub id: DbId,
    pub user_id: DbId,
    pub product_id: DbId,
    pub size_variant: String,
    pub quantity: i32,
    /// Refreshed on every mutation; lines older than the TTL are stale.
    pub added_at: Timestamp,
}

/// A cart line joined with the product data the storefront renders it with.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CartLineView {
    pub product_id: DbId,
    pub size_variant: String,
    pub quantity: i32,
    pub added_at: Timestamp,
    pub name: String,
    pub price_cents: i64,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub image_urls: Vec<String>,
}

/// Request body for adding units of a product variant to the cart.
#[derive(Debug, Clone, Deserialize)]
pub struct ReserveRequest {
    pub product_id: DbId,
    /// Units to add on top of whatever the line already holds.
    pub quantity: i32,
    /// Size variant; omitted means the default variant.
    pub variant: Option<String>,
}

/// Request body for setting a line's absolute quantity, optionally moving
/// it to a different size variant.
#[derive(Debug, Clone, Deserialize)]
pub struct SetQuantityRequest {
    pub product_id: DbId,
    /// Absolute quantity; zero deletes the line at the given variant key.
    pub quantity: i32,
    /// Target size variant. When omitted, the line keeps its stored variant.
    pub variant: Option<String>,
}

/// A user's cart with its derived aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct CartContents {
    pub items: Vec<CartLineView>,
    pub total_cents: i64,
    pub item_count: i64,
}

/// Lightweight cart aggregates for badge polling.
#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
    pub total_cents: i64,
    pub item_count: i64,
}
