//! Route definitions for the cart, merged under `/cart`.
//!
//! ```text
//! GET    /                       list_cart
//! POST   /                       add_to_cart
//! DELETE /                       clear_cart
//! GET    /summary                cart_summary
//! PATCH  /items                  set_quantity
//! DELETE /items/{product_id}     remove_item
//! ```

use axum::routing::{delete, get, patch};
use axum::Router;

use crate::handlers::cart;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cart::list_cart)
                .post(cart::add_to_cart)
                .delete(cart::clear_cart),
        )
        .route("/summary", get(cart::cart_summary))
        .route("/items", patch(cart::set_quantity))
        .route("/items/{product_id}", delete(cart::remove_item))
}
