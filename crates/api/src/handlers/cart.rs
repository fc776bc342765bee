//! Handlers for the cart reservation endpoints.
//!
//! In-cart quantities are soft reservations against product stock: adding
//! to the cart checks availability against the live reserved sum, and a
//! size switch moves the reservation from one variant key to another rather
//! than re-validating stock, so a pure size change never alters the
//! reserved-for-product total.
//!
//! The availability check is advisory: two concurrent reservations can both
//! pass against the same snapshot. The unique constraint on
//! (user, product, variant) is what races actually land on, and it surfaces
//! as a retryable 409.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use storefront_core::cart::{self, SetQuantityPlan};
use storefront_core::error::CoreError;
use storefront_core::types::DbId;
use storefront_db::models::cart_item::{
    CartContents, CartLineView, CartSummary, ReserveRequest, SetQuantityRequest,
};
use storefront_db::models::product::Product;
use storefront_db::repositories::{CartItemRepo, ProductRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

/// Query string for DELETE /cart/items/{product_id}.
///
/// `variant` omitted and `variant=` (explicit empty string) are different
/// requests: the former removes every variant of the product, the latter
/// removes exactly the default-variant line.
#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    pub variant: Option<String>,
}

/// Look up a product or fail with 404.
async fn require_product(pool: &storefront_db::DbPool, id: DbId) -> AppResult<Product> {
    ProductRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        })
    })
}

/// POST /api/v1/cart
///
/// Reserve `quantity` more units of a product variant for the calling user,
/// creating the cart line if absent.
pub async fn add_to_cart(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ReserveRequest>,
) -> AppResult<impl IntoResponse> {
    cart::validate_quantity_delta(input.quantity)?;

    let cutoff = cart::staleness_cutoff(Utc::now());
    CartItemRepo::purge_stale(&state.pool, cutoff).await?;

    let product = require_product(&state.pool, input.product_id).await?;

    // Availability is the live sum over every user's fresh lines, so one
    // shopper's reservation limits what the next can add.
    let reserved = CartItemRepo::reserved_for_product(&state.pool, product.id, cutoff).await?;
    let available = i64::from(product.stock) - reserved;
    if available < i64::from(input.quantity) {
        return Err(CoreError::InsufficientStock {
            available: available.max(0),
        }
        .into());
    }

    let variant = cart::storage_variant(input.variant.as_deref());
    let line = match CartItemRepo::find_line(&state.pool, auth.user_id, product.id, variant).await?
    {
        None => {
            CartItemRepo::insert_line(&state.pool, auth.user_id, product.id, variant, input.quantity)
                .await?
        }
        Some(existing) => {
            let new_quantity = existing.quantity + input.quantity;
            // Second guard: the user's own accumulated total for this
            // variant must not exceed raw stock.
            if product.stock < new_quantity {
                return Err(CoreError::InsufficientStock {
                    available: i64::from(product.stock),
                }
                .into());
            }
            CartItemRepo::update_quantity(&state.pool, existing.id, new_quantity).await?
        }
    };

    tracing::info!(
        user_id = auth.user_id,
        product_id = product.id,
        variant = %line.size_variant,
        quantity = line.quantity,
        "Cart line reserved"
    );

    Ok(Json(DataResponse { data: line }))
}

/// PATCH /api/v1/cart/items
///
/// Set the absolute quantity for a product line, optionally switching it to
/// a different size variant. Quantity zero deletes the line at the given
/// variant key.
pub async fn set_quantity(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SetQuantityRequest>,
) -> AppResult<impl IntoResponse> {
    cart::validate_quantity(input.quantity)?;

    let cutoff = cart::staleness_cutoff(Utc::now());
    CartItemRepo::purge_stale(&state.pool, cutoff).await?;

    // Resolve the line to act on: the exact (user, product, variant) key
    // when the caller named a variant, falling back to any line for the
    // product. The fallback is what lets the UI switch an existing line's
    // size to a variant that has no row of its own yet.
    let requested = input.variant.as_deref();
    let found = match requested {
        Some(v) => {
            match CartItemRepo::find_line(&state.pool, auth.user_id, input.product_id, v).await? {
                Some(line) => Some(line),
                None => {
                    CartItemRepo::find_any_for_product(&state.pool, auth.user_id, input.product_id)
                        .await?
                }
            }
        }
        None => {
            CartItemRepo::find_any_for_product(&state.pool, auth.user_id, input.product_id).await?
        }
    };
    let Some(found) = found else {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CartLine",
            id: input.product_id,
        }));
    };

    if input.quantity == 0 {
        // Deletion always targets the caller's variant key (default key
        // when omitted), not the line the fallback resolved to. The key
        // may not exist; deleting nothing is still success.
        let key = cart::storage_variant(requested);
        let removed =
            CartItemRepo::delete_line(&state.pool, auth.user_id, input.product_id, key).await?;
        tracing::info!(
            user_id = auth.user_id,
            product_id = input.product_id,
            variant = %key,
            removed,
            "Cart line removed via zero quantity"
        );
        return Ok(Json(SuccessResponse::ok()));
    }

    let product = require_product(&state.pool, input.product_id).await?;
    if input.quantity > product.stock {
        return Err(CoreError::InsufficientStock {
            available: i64::from(product.stock),
        }
        .into());
    }

    // When the variant is changing, check whether the target key already
    // has its own line; that decides between merge and re-key.
    let target = match requested {
        Some(v) if v != found.size_variant => {
            CartItemRepo::find_line(&state.pool, auth.user_id, input.product_id, v).await?
        }
        _ => None,
    };

    match (
        cart::plan_set_quantity(requested, &found.size_variant, target.is_some()),
        target,
        requested,
    ) {
        (SetQuantityPlan::UpdateInPlace, _, _) => {
            CartItemRepo::update_quantity(&state.pool, found.id, input.quantity).await?;
        }
        // The target line takes the new quantity; the found line's old
        // quantity is discarded, not summed.
        (SetQuantityPlan::MergeInto, Some(target), _) => {
            CartItemRepo::update_quantity(&state.pool, target.id, input.quantity).await?;
            CartItemRepo::delete_line(
                &state.pool,
                auth.user_id,
                input.product_id,
                &found.size_variant,
            )
            .await?;
        }
        (SetQuantityPlan::Rekey, _, Some(variant)) => {
            CartItemRepo::rekey_line(&state.pool, found.id, variant, input.quantity).await?;
        }
        (plan, _, _) => {
            return Err(AppError::InternalError(format!(
                "set-quantity plan {plan:?} is inconsistent with the resolved lines"
            )));
        }
    }

    tracing::info!(
        user_id = auth.user_id,
        product_id = input.product_id,
        variant = ?requested,
        quantity = input.quantity,
        "Cart line quantity set"
    );

    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /api/v1/cart/items/{product_id}
///
/// With `?variant=` (including the explicit empty string), remove exactly
/// that variant's line; without the parameter, remove every variant of the
/// product from the cart.
pub async fn remove_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(product_id): Path<DbId>,
    Query(query): Query<RemoveQuery>,
) -> AppResult<impl IntoResponse> {
    let removed = match query.variant.as_deref() {
        Some(variant) => {
            CartItemRepo::delete_line(&state.pool, auth.user_id, product_id, variant).await?
        }
        None => CartItemRepo::delete_all_for_product(&state.pool, auth.user_id, product_id).await?,
    };

    if removed == 0 {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CartLine",
            id: product_id,
        }));
    }

    tracing::info!(
        user_id = auth.user_id,
        product_id,
        variant = ?query.variant,
        removed,
        "Cart lines removed"
    );

    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /api/v1/cart
///
/// Remove every line in the calling user's cart. Idempotent.
pub async fn clear_cart(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let removed = CartItemRepo::clear_for_user(&state.pool, auth.user_id).await?;

    tracing::info!(user_id = auth.user_id, removed, "Cart cleared");

    Ok(Json(SuccessResponse::ok()))
}

/// GET /api/v1/cart
///
/// The user's cart lines joined with current product data, plus the derived
/// total and count.
pub async fn list_cart(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let items = fresh_lines(&state, auth.user_id).await?;
    let (total_cents, item_count) = aggregate(&items);

    Ok(Json(DataResponse {
        data: CartContents {
            items,
            total_cents,
            item_count,
        },
    }))
}

/// GET /api/v1/cart/summary
///
/// Just the derived aggregates, for navbar badge polling.
pub async fn cart_summary(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let items = fresh_lines(&state, auth.user_id).await?;
    let (total_cents, item_count) = aggregate(&items);

    Ok(Json(DataResponse {
        data: CartSummary {
            total_cents,
            item_count,
        },
    }))
}

/// Purge stale lines globally, then fetch the user's remaining lines.
async fn fresh_lines(state: &AppState, user_id: DbId) -> AppResult<Vec<CartLineView>> {
    let cutoff = cart::staleness_cutoff(Utc::now());
    let purged = CartItemRepo::purge_stale(&state.pool, cutoff).await?;
    if purged > 0 {
        tracing::debug!(purged, "Purged stale cart lines before read");
    }
    Ok(CartItemRepo::list_for_user(&state.pool, user_id).await?)
}

/// Derived aggregates: (Σ quantity × price, Σ quantity).
fn aggregate(items: &[CartLineView]) -> (i64, i64) {
    let total_cents = items
        .iter()
        .map(|line| i64::from(line.quantity) * line.price_cents)
        .sum();
    let item_count = items.iter().map(|line| i64::from(line.quantity)).sum();
    (total_cents, item_count)
}
