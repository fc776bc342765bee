//! Repository-level tests for cart line reservations against a real
//! database: uniqueness constraint, stale-line handling, reserved sums,
//! re-keying, and deletion semantics.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use storefront_db::models::product::CreateProduct;
use storefront_db::models::user::CreateUser;
use storefront_db::repositories::{CartItemRepo, ProductRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, email: &str) -> i64 {
    let input = CreateUser {
        email: email.to_string(),
        display_name: "Test User".to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
        .id
}

async fn create_product(pool: &PgPool, name: &str, stock: i32) -> i64 {
    let input = CreateProduct {
        name: name.to_string(),
        description: None,
        price_cents: 1999,
        stock,
        sizes: vec!["S".to_string(), "M".to_string(), "L".to_string()],
        image_urls: vec![],
    };
    ProductRepo::create(pool, &input)
        .await
        .expect("product creation should succeed")
        .id
}

/// Backdate a cart line so it falls outside the freshness window.
async fn backdate_line(pool: &PgPool, line_id: i64, hours: i32) {
    sqlx::query("UPDATE cart_items SET added_at = now() - make_interval(hours => $2) WHERE id = $1")
        .bind(line_id)
        .bind(hours)
        .execute(pool)
        .await
        .expect("backdating should succeed");
}

// ---------------------------------------------------------------------------
// Uniqueness
// ---------------------------------------------------------------------------

/// A second insert at the same (user, product, variant) key violates the
/// unique constraint instead of silently duplicating the reservation.
#[sqlx::test]
async fn duplicate_key_insert_hits_unique_constraint(pool: PgPool) {
    let user_id = create_user(&pool, "dup@test.com").await;
    let product_id = create_product(&pool, "Tee", 10).await;

    CartItemRepo::insert_line(&pool, user_id, product_id, "M", 1)
        .await
        .expect("first insert should succeed");

    let err = CartItemRepo::insert_line(&pool, user_id, product_id, "M", 2)
        .await
        .expect_err("second insert at the same key must fail");

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(
                db_err.constraint(),
                Some("uq_cart_items_user_product_variant")
            );
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

/// Different variants of the same product are distinct keys.
#[sqlx::test]
async fn distinct_variants_coexist(pool: PgPool) {
    let user_id = create_user(&pool, "variants@test.com").await;
    let product_id = create_product(&pool, "Tee", 10).await;

    CartItemRepo::insert_line(&pool, user_id, product_id, "M", 1)
        .await
        .unwrap();
    CartItemRepo::insert_line(&pool, user_id, product_id, "L", 2)
        .await
        .unwrap();
    // The default variant is the empty string and is its own key.
    CartItemRepo::insert_line(&pool, user_id, product_id, "", 3)
        .await
        .unwrap();

    let lines = CartItemRepo::list_for_user(&pool, user_id).await.unwrap();
    assert_eq!(lines.len(), 3);
}

// ---------------------------------------------------------------------------
// Reserved sums and staleness
// ---------------------------------------------------------------------------

/// The reserved sum spans all users and variants of a product.
#[sqlx::test]
async fn reserved_sum_spans_users_and_variants(pool: PgPool) {
    let alice = create_user(&pool, "alice@test.com").await;
    let bob = create_user(&pool, "bob@test.com").await;
    let product_id = create_product(&pool, "Tee", 100).await;
    let other_product = create_product(&pool, "Hat", 100).await;

    CartItemRepo::insert_line(&pool, alice, product_id, "M", 3)
        .await
        .unwrap();
    CartItemRepo::insert_line(&pool, alice, product_id, "L", 2)
        .await
        .unwrap();
    CartItemRepo::insert_line(&pool, bob, product_id, "M", 4)
        .await
        .unwrap();
    CartItemRepo::insert_line(&pool, bob, other_product, "", 50)
        .await
        .unwrap();

    let cutoff = Utc::now() - Duration::hours(2);
    let reserved = CartItemRepo::reserved_for_product(&pool, product_id, cutoff)
        .await
        .unwrap();
    assert_eq!(reserved, 9);
}

/// Lines older than the cutoff do not count toward the reserved sum even
/// before a purge has run.
#[sqlx::test]
async fn stale_lines_excluded_from_reserved_sum(pool: PgPool) {
    let user_id = create_user(&pool, "stale@test.com").await;
    let product_id = create_product(&pool, "Tee", 100).await;

    let fresh = CartItemRepo::insert_line(&pool, user_id, product_id, "M", 3)
        .await
        .unwrap();
    let stale = CartItemRepo::insert_line(&pool, user_id, product_id, "L", 5)
        .await
        .unwrap();
    backdate_line(&pool, stale.id, 3).await;

    let cutoff = Utc::now() - Duration::hours(2);
    let reserved = CartItemRepo::reserved_for_product(&pool, product_id, cutoff)
        .await
        .unwrap();
    assert_eq!(reserved, i64::from(fresh.quantity));
}

/// The purge deletes exactly the lines older than the cutoff.
#[sqlx::test]
async fn purge_removes_only_stale_lines(pool: PgPool) {
    let user_id = create_user(&pool, "purge@test.com").await;
    let product_id = create_product(&pool, "Tee", 100).await;

    CartItemRepo::insert_line(&pool, user_id, product_id, "M", 1)
        .await
        .unwrap();
    let stale = CartItemRepo::insert_line(&pool, user_id, product_id, "L", 1)
        .await
        .unwrap();
    backdate_line(&pool, stale.id, 5).await;

    let cutoff = Utc::now() - Duration::hours(2);
    let purged = CartItemRepo::purge_stale(&pool, cutoff).await.unwrap();
    assert_eq!(purged, 1);

    let lines = CartItemRepo::list_for_user(&pool, user_id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].size_variant, "M");
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Updating a quantity refreshes the line's timestamp.
#[sqlx::test]
async fn update_quantity_refreshes_added_at(pool: PgPool) {
    let user_id = create_user(&pool, "touch@test.com").await;
    let product_id = create_product(&pool, "Tee", 10).await;

    let line = CartItemRepo::insert_line(&pool, user_id, product_id, "M", 1)
        .await
        .unwrap();
    backdate_line(&pool, line.id, 1).await;

    let updated = CartItemRepo::update_quantity(&pool, line.id, 4).await.unwrap();
    assert_eq!(updated.quantity, 4);
    assert!(updated.added_at > Utc::now() - Duration::minutes(1));
}

/// Re-keying moves the row to the new variant without creating a second row.
#[sqlx::test]
async fn rekey_moves_line_in_place(pool: PgPool) {
    let user_id = create_user(&pool, "rekey@test.com").await;
    let product_id = create_product(&pool, "Tee", 10).await;

    let line = CartItemRepo::insert_line(&pool, user_id, product_id, "M", 2)
        .await
        .unwrap();

    let moved = CartItemRepo::rekey_line(&pool, line.id, "L", 4).await.unwrap();
    assert_eq!(moved.id, line.id);
    assert_eq!(moved.size_variant, "L");
    assert_eq!(moved.quantity, 4);

    let lines = CartItemRepo::list_for_user(&pool, user_id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].size_variant, "L");
}

/// Deleting all lines for a product removes every variant; deleting by key
/// removes exactly one.
#[sqlx::test]
async fn delete_semantics(pool: PgPool) {
    let user_id = create_user(&pool, "delete@test.com").await;
    let product_id = create_product(&pool, "Tee", 10).await;

    CartItemRepo::insert_line(&pool, user_id, product_id, "S", 1)
        .await
        .unwrap();
    CartItemRepo::insert_line(&pool, user_id, product_id, "M", 1)
        .await
        .unwrap();

    let removed = CartItemRepo::delete_line(&pool, user_id, product_id, "S")
        .await
        .unwrap();
    assert_eq!(removed, 1);

    // Deleting a key that does not exist affects zero rows.
    let removed = CartItemRepo::delete_line(&pool, user_id, product_id, "S")
        .await
        .unwrap();
    assert_eq!(removed, 0);

    CartItemRepo::insert_line(&pool, user_id, product_id, "S", 1)
        .await
        .unwrap();
    let removed = CartItemRepo::delete_all_for_product(&pool, user_id, product_id)
        .await
        .unwrap();
    assert_eq!(removed, 2);
}

/// Clearing a cart is idempotent.
#[sqlx::test]
async fn clear_is_idempotent(pool: PgPool) {
    let user_id = create_user(&pool, "clear@test.com").await;
    let product_id = create_product(&pool, "Tee", 10).await;

    CartItemRepo::insert_line(&pool, user_id, product_id, "M", 2)
        .await
        .unwrap();

    let first = CartItemRepo::clear_for_user(&pool, user_id).await.unwrap();
    assert_eq!(first, 1);

    let second = CartItemRepo::clear_for_user(&pool, user_id).await.unwrap();
    assert_eq!(second, 0);

    let lines = CartItemRepo::list_for_user(&pool, user_id).await.unwrap();
    assert!(lines.is_empty());
}
