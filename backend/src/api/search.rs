//! Ranked search API endpoint.

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{current_revision, fail, success, ApiResult};
use crate::models::MedicineCard;
use crate::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    20
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub medicine: MedicineCard,
    pub score: f32,
}

const MAX_SEARCH_LIMIT: usize = 100;

/// GET /api/search - Relevance-ranked medicine search.
pub async fn search_medicines(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<SearchResponse> {
    let revision_id = current_revision(&state).await;
    let limit = params.limit.min(MAX_SEARCH_LIMIT);

    let hits = state
        .search
        .search(&params.q, limit, params.offset)
        .map_err(fail(revision_id))?;

    let results: Vec<SearchResultItem> = hits
        .into_iter()
        .filter_map(|hit| {
            let medicine = state.catalog.get(hit.medicine_id)?;
            Some(SearchResultItem {
                medicine: MedicineCard::from(medicine),
                score: hit.score,
            })
        })
        .collect();

    success(
        SearchResponse {
            total: results.len(),
            results,
            limit,
            offset: params.offset,
        },
        revision_id,
    )
}
