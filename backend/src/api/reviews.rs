//! Review API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use super::{current_revision, error, fail, revision_after, success, ApiResult};
use crate::models::{ActivityType, MedicineReviews, ReviewView, SubmitReviewRequest};
use crate::reviews;
use crate::AppState;

/// GET /api/medicines/{id}/reviews - Reviews with aggregate rating.
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<MedicineReviews> {
    let revision_id = current_revision(&state).await;

    state.catalog.require(id).map_err(fail(revision_id))?;
    let prefs = state.repo.get_preferences().await.map_err(fail(revision_id))?;

    match state.repo.list_reviews(id).await {
        Ok(list) => success(
            reviews::summarize(id, list, &prefs.user_id, Utc::now()),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/medicines/{id}/reviews - Submit or replace the current user's review.
pub async fn submit_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<SubmitReviewRequest>,
) -> ApiResult<ReviewView> {
    let revision_id = current_revision(&state).await;

    let medicine = state.catalog.require(id).map_err(fail(revision_id))?;
    reviews::validate(&request).map_err(fail(revision_id))?;

    let prefs = state.repo.get_preferences().await.map_err(fail(revision_id))?;
    let now = Utc::now();
    let review = reviews::build_review(id, &request, &prefs, now);
    let stored = state.repo.upsert_review(&review).await.map_err(fail(revision_id))?;

    let description = format!("Reviewed {} ({}/5)", medicine.name, stored.rating);
    if let Err(e) = state
        .repo
        .log_activity(ActivityType::ReviewAdded, &description)
        .await
    {
        tracing::warn!("Failed to log activity: {}", e);
    }

    success(
        ReviewView {
            time_ago: reviews::time_ago_str(&stored.created_at, now),
            is_own: true,
            review: stored,
        },
        revision_after(&state, revision_id).await,
    )
}

/// DELETE /api/medicines/{id}/reviews - Delete the current user's review.
pub async fn delete_review(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    let revision_id = current_revision(&state).await;

    let prefs = state.repo.get_preferences().await.map_err(fail(revision_id))?;
    match state.repo.delete_review(id, &prefs.user_id).await {
        Ok(()) => success((), revision_after(&state, revision_id).await),
        Err(e) => error(e, revision_id),
    }
}
