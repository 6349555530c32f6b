//! Catalog export and print endpoints.

use axum::{
    extract::{Path, Query, State},
    response::Html,
};
use chrono::Utc;
use serde::Deserialize;

use super::{current_revision, fail, success, ApiResult};
use crate::catalog::{CatalogQuery, SearchField};
use crate::errors::AppErrorWithRevision;
use crate::export::{self, print, ExportFile, ExportFormat};
use crate::AppState;

/// Catalog filters shared by export and list printing. Pagination is ignored.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default = "default_format")]
    pub format: ExportFormat,
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub field: SearchField,
    #[serde(rename = "type", default)]
    pub medicine_type: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

fn default_format() -> ExportFormat {
    ExportFormat::Json
}

impl ExportQuery {
    fn catalog_query(&self) -> CatalogQuery {
        CatalogQuery {
            q: self.q.clone(),
            field: self.field,
            medicine_type: self.medicine_type.clone(),
            sort: self.sort.clone(),
            page: None,
        }
    }
}

/// GET /api/export?format= - Download the filtered catalog as CSV, JSON or text.
pub async fn export_medicines(
    State(state): State<AppState>,
    Query(params): Query<ExportQuery>,
) -> ApiResult<ExportFile> {
    let revision_id = current_revision(&state).await;

    let medicines = state.catalog.query(&params.catalog_query());
    let file = export::export(&medicines, params.format, Utc::now()).map_err(fail(revision_id))?;
    tracing::info!("Exported {} medicines as {}", medicines.len(), file.filename);

    success(file, revision_id)
}

/// GET /api/export/print - Printable HTML table of the filtered catalog.
pub async fn print_medicine_list(
    State(state): State<AppState>,
    Query(params): Query<ExportQuery>,
) -> Result<Html<String>, AppErrorWithRevision> {
    let revision_id = current_revision(&state).await;

    let medicines = state.catalog.query(&params.catalog_query());
    if medicines.is_empty() {
        return Err(AppErrorWithRevision::new(
            crate::errors::AppError::Validation("No medicines to print".to_string()),
            revision_id,
        ));
    }
    Ok(Html(print::medicine_list_print_html(&medicines, Utc::now())))
}

/// GET /api/medicines/{id}/print - Printable HTML page for one medicine.
pub async fn print_medicine(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppErrorWithRevision> {
    let revision_id = current_revision(&state).await;

    let medicine = state.catalog.require(id).map_err(fail(revision_id))?;
    Ok(Html(print::medicine_print_html(medicine, Utc::now())))
}
