//! Read-only catalog handlers.
//!
//! The cart treats products as an external, read-only collaborator; these
//! endpoints expose the catalog data the storefront renders. Creation and
//! stock management happen through the repository layer (seeding, tests),
//! not over HTTP.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use storefront_core::error::CoreError;
use storefront_core::types::DbId;
use storefront_db::repositories::ProductRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/products
pub async fn list_products(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let products = ProductRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;
    Ok(Json(DataResponse { data: product }))
}
