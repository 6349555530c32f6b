//! Comparison list and drug-interaction selection endpoints.
//!
//! Both are capped id lists kept in the `selections` table; they differ in
//! their limits and in what is computed from them.

use axum::extract::{Path, State};
use serde::Serialize;

use super::{current_revision, error, fail, revision_after, success, ApiResult};
use crate::comparison::{compare, ComparisonTable};
use crate::db::SelectionKind;
use crate::models::MedicineCard;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub ids: Vec<i64>,
    pub medicines: Vec<MedicineCard>,
    pub capacity: usize,
}

fn selection(state: &AppState, kind: SelectionKind, ids: Vec<i64>) -> Selection {
    Selection {
        medicines: state
            .catalog
            .resolve(&ids)
            .iter()
            .map(MedicineCard::from)
            .collect(),
        ids,
        capacity: kind.capacity(),
    }
}

async fn list(state: AppState, kind: SelectionKind) -> ApiResult<Selection> {
    let revision_id = current_revision(&state).await;

    match state.repo.list_selection(kind).await {
        Ok(ids) => success(selection(&state, kind, ids), revision_id),
        Err(e) => error(e, revision_id),
    }
}

async fn toggle(state: AppState, kind: SelectionKind, id: i64) -> ApiResult<Selection> {
    let revision_id = current_revision(&state).await;

    state.catalog.require(id).map_err(fail(revision_id))?;
    match state.repo.toggle_selection(kind, id).await {
        Ok(ids) => success(
            selection(&state, kind, ids),
            revision_after(&state, revision_id).await,
        ),
        Err(e) => error(e, revision_id),
    }
}

async fn clear(state: AppState, kind: SelectionKind) -> ApiResult<()> {
    let revision_id = current_revision(&state).await;

    match state.repo.clear_selection(kind).await {
        Ok(()) => success((), revision_after(&state, revision_id).await),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/comparison - Medicines queued for comparison.
pub async fn list_comparison(State(state): State<AppState>) -> ApiResult<Selection> {
    list(state, SelectionKind::Comparison).await
}

/// POST /api/comparison/{id} - Add or remove a medicine (max 4).
pub async fn toggle_comparison(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Selection> {
    toggle(state, SelectionKind::Comparison, id).await
}

/// DELETE /api/comparison - Empty the comparison list.
pub async fn clear_comparison(State(state): State<AppState>) -> ApiResult<()> {
    clear(state, SelectionKind::Comparison).await
}

/// GET /api/comparison/table - Side-by-side table (needs at least 2).
pub async fn comparison_table(State(state): State<AppState>) -> ApiResult<ComparisonTable> {
    let revision_id = current_revision(&state).await;

    let ids = state
        .repo
        .list_selection(SelectionKind::Comparison)
        .await
        .map_err(fail(revision_id))?;

    match compare(&state.catalog.resolve(&ids)) {
        Ok(table) => success(table, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/interactions/selection - Medicines selected for checking.
pub async fn list_interaction_selection(State(state): State<AppState>) -> ApiResult<Selection> {
    list(state, SelectionKind::Interaction).await
}

/// POST /api/interactions/selection/{id} - Add or remove a medicine (max 10).
pub async fn toggle_interaction_selection(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Selection> {
    toggle(state, SelectionKind::Interaction, id).await
}

/// DELETE /api/interactions/selection - Empty the selection.
pub async fn clear_interaction_selection(State(state): State<AppState>) -> ApiResult<()> {
    clear(state, SelectionKind::Interaction).await
}
