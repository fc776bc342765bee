//! Repository for the `cart_items` table.
//!
//! Cart lines are soft stock reservations keyed by (user, product, size
//! variant); `uq_cart_items_user_product_variant` backs INV-2. Availability
//! is recomputed as a live sum on every check rather than kept in a counter,
//! so it cannot drift. Concurrent create-vs-update races land on the unique
//! constraint and surface as a retryable conflict upstream.

use sqlx::PgPool;
use storefront_core::types::{DbId, Timestamp};

use crate::models::cart_item::{CartItem, CartLineView};

/// Column list for cart_items queries.
const CART_ITEM_COLUMNS: &str = "id, user_id, product_id, size_variant, quantity, added_at";

/// Provides reservation operations for cart lines.
pub struct CartItemRepo;

impl CartItemRepo {
    /// Delete every line whose `added_at` is before `cutoff`, across all
    /// users. Returns the number of purged rows.
    pub async fn purge_stale(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE added_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Sum the reserved quantity for a product over all users and variants,
    /// counting only lines at or after `cutoff` (stale lines never count
    /// toward availability, whether or not they have been purged yet).
    pub async fn reserved_for_product(
        pool: &PgPool,
        product_id: DbId,
        cutoff: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let (reserved,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(quantity), 0)
             FROM cart_items
             WHERE product_id = $1 AND added_at >= $2",
        )
        .bind(product_id)
        .bind(cutoff)
        .fetch_one(pool)
        .await?;
        Ok(reserved)
    }

    /// Find the line at an exact (user, product, variant) key.
    pub async fn find_line(
        pool: &PgPool,
        user_id: DbId,
        product_id: DbId,
        variant: &str,
    ) -> Result<Option<CartItem>, sqlx::Error> {
        let query = format!(
            "SELECT {CART_ITEM_COLUMNS} FROM cart_items
             WHERE user_id = $1 AND product_id = $2 AND size_variant = $3"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(user_id)
            .bind(product_id)
            .bind(variant)
            .fetch_optional(pool)
            .await
    }

    /// Find any line for (user, product) regardless of variant, most
    /// recently touched first. Supports size-switching onto a variant that
    /// does not yet have its own row.
    pub async fn find_any_for_product(
        pool: &PgPool,
        user_id: DbId,
        product_id: DbId,
    ) -> Result<Option<CartItem>, sqlx::Error> {
        let query = format!(
            "SELECT {CART_ITEM_COLUMNS} FROM cart_items
             WHERE user_id = $1 AND product_id = $2
             ORDER BY added_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(user_id)
            .bind(product_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new line. A concurrent insert at the same key violates the
    /// unique constraint; the caller maps that to a retryable conflict.
    pub async fn insert_line(
        pool: &PgPool,
        user_id: DbId,
        product_id: DbId,
        variant: &str,
        quantity: i32,
    ) -> Result<CartItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO cart_items (user_id, product_id, size_variant, quantity)
             VALUES ($1, $2, $3, $4)
             RETURNING {CART_ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(user_id)
            .bind(product_id)
            .bind(variant)
            .bind(quantity)
            .fetch_one(pool)
            .await
    }

    /// Set a line's quantity and refresh its timestamp.
    pub async fn update_quantity(
        pool: &PgPool,
        id: DbId,
        quantity: i32,
    ) -> Result<CartItem, sqlx::Error> {
        let query = format!(
            "UPDATE cart_items
             SET quantity = $2, added_at = now()
             WHERE id = $1
             RETURNING {CART_ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(id)
            .bind(quantity)
            .fetch_one(pool)
            .await
    }

    /// Move a line to a new variant key, setting quantity and refreshing
    /// the timestamp in the same statement. The single UPDATE means there
    /// is never a moment with two rows at the same key.
    pub async fn rekey_line(
        pool: &PgPool,
        id: DbId,
        variant: &str,
        quantity: i32,
    ) -> Result<CartItem, sqlx::Error> {
        let query = format!(
            "UPDATE cart_items
             SET size_variant = $2, quantity = $3, added_at = now()
             WHERE id = $1
             RETURNING {CART_ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(id)
            .bind(variant)
            .bind(quantity)
            .fetch_one(pool)
            .await
    }

    /// Delete the line at an exact (user, product, variant) key. Returns
    /// the number of rows removed (0 when no such line exists).
    pub async fn delete_line(
        pool: &PgPool,
        user_id: DbId,
        product_id: DbId,
        variant: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM cart_items
             WHERE user_id = $1 AND product_id = $2 AND size_variant = $3",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(variant)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete every line a user holds for a product, across all variants.
    pub async fn delete_all_for_product(
        pool: &PgPool,
        user_id: DbId,
        product_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete every line a user holds. Idempotent.
    pub async fn clear_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// List a user's cart lines joined with current product data, oldest
    /// line first. Callers purge stale lines before reading.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CartLineView>, sqlx::Error> {
        sqlx::query_as::<_, CartLineView>(
            "SELECT
                ci.product_id,
                ci.size_variant,
                ci.quantity,
                ci.added_at,
                p.name,
                p.price_cents,
                p.stock,
                p.sizes,
                p.image_urls
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.user_id = $1
             ORDER BY ci.added_at ASC, ci.id ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
