//! Dosage calculator and interaction checker endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{current_revision, error, fail, revision_after, success, ApiResult};
use crate::db::SelectionKind;
use crate::dosage::{self, DosageOutcome, PatientProfile};
use crate::errors::AppError;
use crate::interactions::{self, InteractionReport, MAX_SELECTED, MIN_TO_CHECK};
use crate::models::{ActivityType, Medicine};
use crate::AppState;

async fn log(state: &AppState, activity_type: ActivityType, description: &str) {
    if let Err(e) = state.repo.log_activity(activity_type, description).await {
        tracing::warn!("Failed to log activity: {}", e);
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DosageRequest {
    pub medicine_id: i64,
    #[serde(flatten)]
    pub patient: PatientProfile,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DosageResponse {
    pub medicine_id: i64,
    pub medicine_name: String,
    #[serde(flatten)]
    pub outcome: DosageOutcome,
}

/// POST /api/dosage - Weight-based dose range for one medicine.
pub async fn calculate_dosage(
    State(state): State<AppState>,
    Json(request): Json<DosageRequest>,
) -> ApiResult<DosageResponse> {
    let revision_id = current_revision(&state).await;

    let medicine = state
        .catalog
        .require(request.medicine_id)
        .map_err(fail(revision_id))?;
    request.patient.validate().map_err(fail(revision_id))?;

    let outcome = dosage::calculate(medicine, &request.patient);
    tracing::debug!(
        medicine = %medicine.name,
        contraindicated = outcome.is_contraindicated(),
        "Dosage calculated"
    );
    log(
        &state,
        ActivityType::DosageCalculated,
        &format!("Calculated dosage for {}", medicine.name),
    )
    .await;

    success(
        DosageResponse {
            medicine_id: medicine.id,
            medicine_name: medicine.name.clone(),
            outcome,
        },
        revision_after(&state, revision_id).await,
    )
}

async fn check(state: &AppState, medicines: &[Medicine], revision_id: i64) -> ApiResult<InteractionReport> {
    if medicines.len() < MIN_TO_CHECK {
        return error(
            AppError::Validation(format!(
                "Select at least {} medicines to check interactions",
                MIN_TO_CHECK
            )),
            revision_id,
        );
    }
    if medicines.len() > MAX_SELECTED {
        return error(
            AppError::LimitReached(format!(
                "Maximum {} medicines can be checked for interactions",
                MAX_SELECTED
            )),
            revision_id,
        );
    }

    let report = interactions::report(medicines);
    log(
        state,
        ActivityType::InteractionChecked,
        &format!(
            "Checked interactions between {} medicines ({} found)",
            medicines.len(),
            report.interactions.len()
        ),
    )
    .await;

    success(report, revision_after(state, revision_id).await)
}

/// POST /api/interactions/check - Check the stored selection.
pub async fn check_selected_interactions(
    State(state): State<AppState>,
) -> ApiResult<InteractionReport> {
    let revision_id = current_revision(&state).await;

    let ids = state
        .repo
        .list_selection(SelectionKind::Interaction)
        .await
        .map_err(fail(revision_id))?;
    let medicines = state.catalog.resolve(&ids);
    check(&state, &medicines, revision_id).await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInteractionsRequest {
    pub medicine_ids: Vec<i64>,
}

/// POST /api/interactions/analyze - Check an explicit list of medicine ids.
pub async fn analyze_interactions(
    State(state): State<AppState>,
    Json(request): Json<CheckInteractionsRequest>,
) -> ApiResult<InteractionReport> {
    let revision_id = current_revision(&state).await;

    let mut medicines = Vec::with_capacity(request.medicine_ids.len());
    for id in &request.medicine_ids {
        if medicines.iter().any(|m: &Medicine| m.id == *id) {
            continue;
        }
        let medicine = state.catalog.require(*id).map_err(fail(revision_id))?;
        medicines.push(medicine.clone());
    }
    check(&state, &medicines, revision_id).await
}
