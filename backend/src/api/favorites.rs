//! Favorites API endpoints.

use axum::extract::{Path, State};
use serde::Serialize;

use super::{current_revision, error, fail, revision_after, success, ApiResult};
use crate::models::{ActivityType, MedicineCard};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesList {
    pub ids: Vec<i64>,
    pub medicines: Vec<MedicineCard>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub medicine_id: i64,
    pub is_favorite: bool,
}

/// GET /api/favorites - Favorites in the order they were added.
pub async fn list_favorites(State(state): State<AppState>) -> ApiResult<FavoritesList> {
    let revision_id = current_revision(&state).await;

    match state.repo.list_favorites().await {
        Ok(ids) => {
            let medicines = state
                .catalog
                .resolve(&ids)
                .iter()
                .map(MedicineCard::from)
                .collect();
            success(FavoritesList { ids, medicines }, revision_id)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/favorites/{id} - Membership check.
pub async fn get_favorite(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<FavoriteStatus> {
    let revision_id = current_revision(&state).await;

    match state.repo.list_favorites().await {
        Ok(ids) => success(
            FavoriteStatus {
                medicine_id: id,
                is_favorite: ids.contains(&id),
            },
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/favorites/{id} - Add if absent, remove if present.
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<FavoriteStatus> {
    let revision_id = current_revision(&state).await;

    let medicine = state.catalog.require(id).map_err(fail(revision_id))?;
    let is_favorite = state.repo.toggle_favorite(id).await.map_err(fail(revision_id))?;

    if is_favorite {
        let description = format!("Added {} to favorites", medicine.name);
        if let Err(e) = state
            .repo
            .log_activity(ActivityType::FavoriteAdded, &description)
            .await
        {
            tracing::warn!("Failed to log activity: {}", e);
        }
    }

    success(
        FavoriteStatus {
            medicine_id: id,
            is_favorite,
        },
        revision_after(&state, revision_id).await,
    )
}
