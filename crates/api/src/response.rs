//! Shared response envelope types for API handlers.
//!
//! Reads use a `{ "data": ... }` envelope; bare mutations (deletes, clears)
//! answer `{ "success": true }`. Use these instead of ad-hoc
//! `serde_json::json!` so responses stay consistent and type-checked.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Standard `{ "success": true }` acknowledgement for mutations that have
/// no meaningful payload.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
