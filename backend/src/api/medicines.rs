//! Catalog API endpoints.

use axum::extract::{Path, Query, State};
use serde::Serialize;

use super::{current_revision, error, fail, success, ApiResult};
use crate::catalog::{paginate, share_link, AdvancedFilter, CatalogQuery, Page};
use crate::errors::AppError;
use crate::models::{Medicine, MedicineCard};
use crate::reviews::{average_rating, round_one};
use crate::AppState;

/// A listing page plus the link that reproduces its free-text query.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineListing {
    #[serde(flatten)]
    pub page: Page<MedicineCard>,
    pub share_link: String,
}

/// Everything the detail view shows for one medicine.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineDetail {
    pub medicine: Medicine,
    pub icon: &'static str,
    pub drug_classes: Vec<String>,
    pub is_favorite: bool,
    pub has_schedule: bool,
    pub average_rating: f64,
    pub review_count: usize,
}

fn to_page(medicines: &[Medicine], page: Option<usize>) -> Page<MedicineCard> {
    let cards: Vec<MedicineCard> = medicines.iter().map(MedicineCard::from).collect();
    paginate(&cards, page.unwrap_or(1))
}

/// GET /api/medicines - Filter, sort and paginate the catalog.
pub async fn list_medicines(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> ApiResult<MedicineListing> {
    let revision_id = current_revision(&state).await;

    let results = state.catalog.query(&query);
    tracing::debug!("Catalog query {:?} matched {}", query.q, results.len());

    success(
        MedicineListing {
            page: to_page(&results, query.page),
            share_link: share_link(&query.q),
        },
        revision_id,
    )
}

/// GET /api/medicines/advanced - Advanced filter panel.
pub async fn advanced_search(
    State(state): State<AppState>,
    Query(filter): Query<AdvancedFilter>,
) -> ApiResult<Page<MedicineCard>> {
    let revision_id = current_revision(&state).await;

    let results = filter.apply(state.catalog.all());
    success(to_page(&results, filter.page), revision_id)
}

/// GET /api/medicines/drug-classes - Distinct drug classes.
pub async fn list_drug_classes(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let revision_id = current_revision(&state).await;
    success(state.catalog.drug_classes(), revision_id)
}

/// GET /api/medicines/types - Distinct medicine types.
pub async fn list_types(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let revision_id = current_revision(&state).await;
    success(state.catalog.types(), revision_id)
}

/// GET /api/medicines/random - A random medicine.
pub async fn random_medicine(State(state): State<AppState>) -> ApiResult<Medicine> {
    let revision_id = current_revision(&state).await;

    match state.catalog.random() {
        Some(medicine) => success(medicine.clone(), revision_id),
        None => error(
            AppError::NotFound("The catalog is empty".to_string()),
            revision_id,
        ),
    }
}

/// GET /api/medicines/{id} - Medicine detail with per-user flags.
pub async fn get_medicine(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<MedicineDetail> {
    let revision_id = current_revision(&state).await;

    let medicine = state.catalog.require(id).map_err(fail(revision_id))?;
    let favorites = state.repo.list_favorites().await.map_err(fail(revision_id))?;
    let schedule = state.repo.get_schedule(id).await.map_err(fail(revision_id))?;
    let reviews = state.repo.list_reviews(id).await.map_err(fail(revision_id))?;

    success(
        MedicineDetail {
            icon: medicine.type_icon(),
            drug_classes: medicine.drug_classes().into_iter().map(str::to_string).collect(),
            is_favorite: favorites.contains(&id),
            has_schedule: schedule.is_some(),
            average_rating: round_one(average_rating(&reviews)),
            review_count: reviews.len(),
            medicine: medicine.clone(),
        },
        revision_id,
    )
}
