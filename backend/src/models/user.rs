//! Per-user preferences and saved searches.

use serde::{Deserialize, Serialize};

/// Display name used until the user picks one.
pub const DEFAULT_USER_NAME: &str = "Anonymous User";

/// Anonymous identity and UI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub user_id: String,
    pub user_name: String,
    pub disclaimer_acknowledged: bool,
    pub shortcuts_shown: bool,
}

/// Partial preferences update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub disclaimer_acknowledged: Option<bool>,
    #[serde(default)]
    pub shortcuts_shown: Option<bool>,
}

/// Snapshot of an advanced-filter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub id: String,
    pub drug_class: String,
    pub sort_by: String,
    pub contains_text: String,
    pub side_effects: String,
    pub results_count: i64,
    pub saved_at: String,
}
