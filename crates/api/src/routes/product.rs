//! Route definitions for the catalog, merged under `/products`.
//!
//! ```text
//! GET    /          list_products
//! GET    /{id}      get_product
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::product;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(product::list_products))
        .route("/{id}", get(product::get_product))
}
