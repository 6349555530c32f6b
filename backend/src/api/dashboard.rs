//! Dashboard, activity log and user-data export endpoints.

use axum::extract::{Path, State};
use chrono::{Local, Utc};
use serde::Serialize;

use super::{current_revision, error, fail, revision_after, success, ApiResult};
use crate::dashboard::{self, Dashboard, HealthTip, UserState};
use crate::errors::AppError;
use crate::models::{Activity, ActivityType, BackupCode, RevisionInfo, UserDataExport};
use crate::AppState;

async fn load_user_state(state: &AppState) -> Result<UserState, AppError> {
    Ok(UserState {
        schedules: state.repo.list_schedules().await?,
        favorites: state.repo.list_favorites().await?,
        reviews: state.repo.list_all_reviews().await?,
        activity: state.repo.list_activity().await?,
    })
}

/// GET /api/dashboard - Stats, today's doses, recent activity and insights.
pub async fn get_dashboard(State(state): State<AppState>) -> ApiResult<Dashboard> {
    let revision_id = current_revision(&state).await;

    let user_state = load_user_state(&state).await.map_err(fail(revision_id))?;
    success(
        dashboard::build(&user_state, &state.catalog, &Local::now()),
        revision_id,
    )
}

/// GET /api/activity - Activity log, oldest first.
pub async fn list_activity(State(state): State<AppState>) -> ApiResult<Vec<Activity>> {
    let revision_id = current_revision(&state).await;

    match state.repo.list_activity().await {
        Ok(activity) => success(activity, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/activity - Clear the activity log.
pub async fn clear_activity(State(state): State<AppState>) -> ApiResult<()> {
    let revision_id = current_revision(&state).await;

    match state.repo.clear_activity().await {
        Ok(()) => success((), revision_after(&state, revision_id).await),
        Err(e) => error(e, revision_id),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataDownload {
    pub filename: String,
    pub data: UserDataExport,
}

/// GET /api/dashboard/export - All user data as a downloadable document.
pub async fn export_user_data(State(state): State<AppState>) -> ApiResult<UserDataDownload> {
    let revision_id = current_revision(&state).await;

    let user_state = load_user_state(&state).await.map_err(fail(revision_id))?;
    let now = Utc::now();
    let download = UserDataDownload {
        filename: dashboard::export_filename(now),
        data: dashboard::user_data_export(user_state, now),
    };

    if let Err(e) = state
        .repo
        .log_activity(ActivityType::DataExported, "Dashboard data exported")
        .await
    {
        tracing::warn!("Failed to log activity: {}", e);
    }

    success(download, revision_after(&state, revision_id).await)
}

/// POST /api/dashboard/backup - Encode all user data as a backup code.
pub async fn backup(State(state): State<AppState>) -> ApiResult<BackupCode> {
    let revision_id = current_revision(&state).await;

    let user_state = load_user_state(&state).await.map_err(fail(revision_id))?;
    let prefs = state.repo.get_preferences().await.map_err(fail(revision_id))?;

    match dashboard::backup_code(user_state, &prefs, Utc::now()) {
        Ok(code) => success(code, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/health-tips/{index} - Health tip, wrapping around the list.
pub async fn health_tip(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<HealthTip> {
    let revision_id = current_revision(&state).await;
    success(dashboard::health_tip(index), revision_id)
}

/// GET /api/revision - Current revision of the user state.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    let revision_id = current_revision(&state).await;

    match state.repo.get_revision_info().await {
        Ok(info) => {
            let latest = info.revision_id;
            success(info, latest)
        }
        Err(e) => error(e, revision_id),
    }
}
