//! Whole-user data export and backup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Activity, Review, Schedule};

/// Dashboard export document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataExport {
    pub schedules: Vec<Schedule>,
    pub favorites: Vec<i64>,
    /// Reviews keyed by medicine id.
    pub reviews: BTreeMap<String, Vec<Review>>,
    pub activity: Vec<Activity>,
    pub export_date: String,
    pub version: String,
}

/// Payload encoded into a backup code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPayload {
    pub schedules: Vec<Schedule>,
    pub favorites: Vec<i64>,
    pub reviews: BTreeMap<String, Vec<Review>>,
    pub activity: Vec<Activity>,
    pub user_id: String,
    pub user_name: String,
    pub backup_date: String,
}

/// Backup code as returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupCode {
    pub code: String,
    pub display: String,
}

/// Current revision of the persisted user state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub schema_version: i64,
    pub revision_id: i64,
    pub generated_at: String,
}
