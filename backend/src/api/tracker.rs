//! Medicine tracker endpoints: schedules, doses and reminders.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Local, Utc};

use super::{current_revision, error, fail, revision_after, success, ApiResult};
use crate::errors::AppError;
use crate::models::{ActivityType, Reminder, SaveScheduleRequest, Schedule, TakeDoseRequest, TodayDose};
use crate::tracker;
use crate::AppState;

/// GET /api/schedules - All schedules.
pub async fn list_schedules(State(state): State<AppState>) -> ApiResult<Vec<Schedule>> {
    let revision_id = current_revision(&state).await;

    match state.repo.list_schedules().await {
        Ok(schedules) => success(schedules, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/schedules/{id} - Schedule for one medicine.
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Schedule> {
    let revision_id = current_revision(&state).await;

    match state.repo.get_schedule(id).await {
        Ok(Some(schedule)) => success(schedule, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("No schedule for medicine {}", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/schedules - Create or replace the schedule for a medicine.
pub async fn save_schedule(
    State(state): State<AppState>,
    Json(request): Json<SaveScheduleRequest>,
) -> ApiResult<Schedule> {
    let revision_id = current_revision(&state).await;

    let schedule =
        tracker::build_schedule(&request, &state.catalog, Utc::now()).map_err(fail(revision_id))?;
    let saved = state.repo.save_schedule(&schedule).await.map_err(fail(revision_id))?;

    if let Some(medicine) = state.catalog.get(saved.medicine_id) {
        let description = format!("Scheduled {} ({})", medicine.name, saved.dosage);
        if let Err(e) = state
            .repo
            .log_activity(ActivityType::MedicineAdded, &description)
            .await
        {
            tracing::warn!("Failed to log activity: {}", e);
        }
    }

    success(saved, revision_after(&state, revision_id).await)
}

/// DELETE /api/schedules/{id} - Remove a schedule and its dose history.
pub async fn delete_schedule(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    let revision_id = current_revision(&state).await;

    match state.repo.delete_schedule(id).await {
        Ok(()) => success((), revision_after(&state, revision_id).await),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/schedules/{id}/doses - Mark a scheduled dose as taken.
pub async fn take_dose(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<TakeDoseRequest>,
) -> ApiResult<Schedule> {
    let revision_id = current_revision(&state).await;

    let schedule = state
        .repo
        .record_dose(id, &request.time, request.expected_version, &Local::now())
        .await
        .map_err(fail(revision_id))?;

    let name = state
        .catalog
        .get(id)
        .map(|m| m.name.clone())
        .unwrap_or_else(|| format!("medicine {}", id));
    let description = tracker::dose_description(&name, &schedule.dosage, &request.time);
    if let Err(e) = state
        .repo
        .log_activity(ActivityType::DoseTaken, &description)
        .await
    {
        tracing::warn!("Failed to log activity: {}", e);
    }

    success(schedule, revision_after(&state, revision_id).await)
}

/// GET /api/schedules/today - One slot per scheduled time today.
pub async fn today_schedule(State(state): State<AppState>) -> ApiResult<Vec<TodayDose>> {
    let revision_id = current_revision(&state).await;

    match state.repo.list_schedules().await {
        Ok(schedules) => success(
            tracker::today_doses(&schedules, &state.catalog, &Local::now()),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/reminders - Reminders fired by the background task, newest first.
pub async fn list_reminders(State(state): State<AppState>) -> ApiResult<Vec<Reminder>> {
    let revision_id = current_revision(&state).await;
    success(state.reminders.recent(), revision_id)
}

/// DELETE /api/reminders - Dismiss all fired reminders.
pub async fn clear_reminders(State(state): State<AppState>) -> ApiResult<()> {
    let revision_id = current_revision(&state).await;
    state.reminders.clear();
    success((), revision_id)
}
