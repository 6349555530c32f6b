//! Store locator endpoints. The store list is static; no database access
//! beyond the revision lookup.

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use super::{current_revision, error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{MapCenter, StoreView};
use crate::stores;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreListing {
    pub city: String,
    pub city_name: String,
    pub center: MapCenter,
    pub stores: Vec<StoreView>,
}

/// GET /api/stores?city= - Stores for a city ("all" for every store).
pub async fn list_stores(
    State(state): State<AppState>,
    Query(params): Query<CityQuery>,
) -> ApiResult<StoreListing> {
    let revision_id = current_revision(&state).await;

    let city = match params.city.trim() {
        "" => "all".to_string(),
        other => other.to_string(),
    };
    let stores = stores::stores_in_city(&city)
        .into_iter()
        .map(|s| stores::view(s, None))
        .collect();

    success(
        StoreListing {
            city_name: if city == "all" {
                "All Cities".to_string()
            } else {
                stores::city_name(&city)
            },
            center: stores::city_center(&city),
            city,
            stores,
        },
        revision_id,
    )
}

/// GET /api/stores/{id} - One store.
pub async fn get_store(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StoreView> {
    let revision_id = current_revision(&state).await;

    match stores::get_store(id) {
        Some(store) => success(stores::view(store, None), revision_id),
        None => error(
            AppError::NotFound(format!("Store {} not found", id)),
            revision_id,
        ),
    }
}

#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    pub lat: f64,
    pub lng: f64,
}

/// GET /api/stores/nearest?lat=&lng= - Closest stores with distances.
pub async fn nearest_stores(
    State(state): State<AppState>,
    Query(params): Query<NearestQuery>,
) -> ApiResult<Vec<StoreView>> {
    let revision_id = current_revision(&state).await;

    if !(-90.0..=90.0).contains(&params.lat) || !(-180.0..=180.0).contains(&params.lng) {
        return error(
            AppError::Validation("Coordinates out of range".to_string()),
            revision_id,
        );
    }

    let ranked = stores::nearest(params.lat, params.lng)
        .into_iter()
        .map(|(store, distance)| stores::view(store, Some(distance)))
        .collect();
    success(ranked, revision_id)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityInfo {
    pub slug: &'static str,
    pub name: &'static str,
    pub center: MapCenter,
    pub store_count: usize,
}

/// GET /api/stores/cities - City filter options with map centers.
pub async fn list_cities(State(state): State<AppState>) -> ApiResult<Vec<CityInfo>> {
    let revision_id = current_revision(&state).await;

    let cities = stores::cities()
        .into_iter()
        .map(|(slug, name)| CityInfo {
            slug,
            name,
            center: stores::city_center(slug),
            store_count: stores::stores_in_city(slug).len(),
        })
        .collect();
    success(cities, revision_id)
}
