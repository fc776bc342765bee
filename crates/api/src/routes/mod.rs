pub mod cart;
pub mod health;
pub mod product;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /cart                          GET list, POST reserve, DELETE clear
/// /cart/summary                  GET derived totals
/// /cart/items                    PATCH set quantity / switch variant
/// /cart/items/{product_id}       DELETE one variant (?variant=) or all
///
/// /products                      GET list
/// /products/{id}                 GET detail
/// ```
///
/// All `/cart` routes require a Bearer session token; `/products` is public.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/cart", cart::router())
        .nest("/products", product::router())
}
