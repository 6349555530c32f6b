//! REST API module.
//!
//! Every JSON handler answers with the `{ success, data, revisionId }`
//! envelope so the client can tell whether its cached user state is stale.

mod autocomplete;
mod comparison;
mod dashboard;
mod export;
mod favorites;
mod medicines;
mod preferences;
mod reviews;
mod search;
mod stores;
mod tools;
mod tracker;

pub use autocomplete::*;
pub use comparison::*;
pub use dashboard::*;
pub use export::*;
pub use favorites::*;
pub use medicines::*;
pub use preferences::*;
pub use reviews::*;
pub use search::*;
pub use stores::*;
pub use tools::*;
pub use tracker::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::{AppError, AppErrorWithRevision};
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision_id: i64) -> Self {
        Self {
            success: true,
            data,
            revision_id,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithRevision>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision_id: i64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision_id))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, revision_id: i64) -> ApiResult<T> {
    Err(AppErrorWithRevision::new(err, revision_id))
}

/// Adapter for `map_err` so handlers can use `?` on repository calls.
pub fn fail(revision_id: i64) -> impl FnOnce(AppError) -> AppErrorWithRevision {
    move |err| AppErrorWithRevision::new(err, revision_id)
}

/// Revision before the handler runs. Reads failing here are not fatal.
pub async fn current_revision(state: &AppState) -> i64 {
    state.repo.get_revision_id().await.unwrap_or(0)
}

/// Revision after a write, falling back to the one read earlier.
pub async fn revision_after(state: &AppState, fallback: i64) -> i64 {
    state.repo.get_revision_id().await.unwrap_or(fallback)
}
