//! Autocomplete and recent-search endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{current_revision, error, fail, revision_after, success, ApiResult};
use crate::autocomplete::{CursorAction, NavigationKey, RankedSuggestion, Suggestion, SuggestionCursor};
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/autocomplete?q= - Ranked suggestions with highlight spans.
pub async fn autocomplete(
    State(state): State<AppState>,
    Query(params): Query<AutocompleteQuery>,
) -> ApiResult<Vec<RankedSuggestion>> {
    let revision_id = current_revision(&state).await;
    success(state.autocomplete.suggest_ranked(&params.q), revision_id)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateRequest {
    pub q: String,
    #[serde(default)]
    pub active: Option<usize>,
    pub key: NavigationKey,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResponse {
    pub active: Option<usize>,
    pub open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<Suggestion>,
}

/// POST /api/autocomplete/navigate - Apply a key press to the suggestion list.
///
/// Selecting a suggestion records it as a recent search.
pub async fn navigate_suggestions(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> ApiResult<NavigateResponse> {
    let revision_id = current_revision(&state).await;

    let suggestions = state.autocomplete.suggest(&request.q);
    let mut cursor = SuggestionCursor::resume(suggestions.len(), request.active);
    let action = cursor.press(request.key);

    let selected = match action {
        CursorAction::Selected(i) => suggestions.get(i).cloned(),
        _ => None,
    };
    if let Some(suggestion) = &selected {
        state
            .repo
            .add_recent_search(&suggestion.label)
            .await
            .map_err(fail(revision_id))?;
    }

    success(
        NavigateResponse {
            active: cursor.active(),
            open: cursor.is_open(),
            selected,
        },
        revision_after(&state, revision_id).await,
    )
}

/// GET /api/recent-searches - Newest first.
pub async fn list_recent_searches(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let revision_id = current_revision(&state).await;

    match state.repo.list_recent_searches().await {
        Ok(terms) => success(terms, revision_id),
        Err(e) => error(e, revision_id),
    }
}

#[derive(Debug, Deserialize)]
pub struct RecentSearchRequest {
    pub term: String,
}

/// POST /api/recent-searches - Record a search term.
pub async fn add_recent_search(
    State(state): State<AppState>,
    Json(request): Json<RecentSearchRequest>,
) -> ApiResult<Vec<String>> {
    let revision_id = current_revision(&state).await;

    let term = request.term.trim();
    if term.is_empty() {
        return error(
            AppError::Validation("Search term is required".to_string()),
            revision_id,
        );
    }

    match state.repo.add_recent_search(term).await {
        Ok(terms) => success(terms, revision_after(&state, revision_id).await),
        Err(e) => error(e, revision_id),
    }
}
