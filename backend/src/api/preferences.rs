//! User preferences and saved advanced searches.

use axum::{extract::State, Json};
use chrono::Utc;
use uuid::Uuid;

use super::{current_revision, error, fail, revision_after, success, ApiResult};
use crate::catalog::AdvancedFilter;
use crate::models::{Preferences, SavedSearch, UpdatePreferencesRequest};
use crate::AppState;

/// GET /api/preferences - Anonymous identity and UI flags.
pub async fn get_preferences(State(state): State<AppState>) -> ApiResult<Preferences> {
    let revision_id = current_revision(&state).await;

    match state.repo.get_preferences().await {
        // The first read may have created the user id.
        Ok(prefs) => success(prefs, revision_after(&state, revision_id).await),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/preferences - Update the fields present in the request.
pub async fn update_preferences(
    State(state): State<AppState>,
    Json(request): Json<UpdatePreferencesRequest>,
) -> ApiResult<Preferences> {
    let revision_id = current_revision(&state).await;

    match state.repo.update_preferences(&request).await {
        Ok(prefs) => success(prefs, revision_after(&state, revision_id).await),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/saved-searches - Saved advanced searches, newest first.
pub async fn list_saved_searches(State(state): State<AppState>) -> ApiResult<Vec<SavedSearch>> {
    let revision_id = current_revision(&state).await;

    match state.repo.list_saved_searches().await {
        Ok(searches) => success(searches, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/saved-searches - Snapshot the given advanced filter.
pub async fn save_search(
    State(state): State<AppState>,
    Json(filter): Json<AdvancedFilter>,
) -> ApiResult<SavedSearch> {
    let revision_id = current_revision(&state).await;

    let now = Utc::now();
    let results_count = filter.apply(state.catalog.all()).len() as i64;
    let search = SavedSearch {
        id: Uuid::new_v4().to_string(),
        drug_class: filter.drug_class.clone(),
        sort_by: filter.sort_by.clone(),
        contains_text: filter.contains_text.clone(),
        side_effects: filter.side_effects.as_str().to_string(),
        results_count,
        saved_at: now.to_rfc3339(),
    };

    let saved = state.repo.save_search(&search).await.map_err(fail(revision_id))?;
    tracing::debug!(id = %saved.id, results = saved.results_count, "Search saved");

    success(saved, revision_after(&state, revision_id).await)
}
