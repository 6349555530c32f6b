//! Activity log models.

use serde::{Deserialize, Serialize};

/// Kind of user action recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityType {
    DoseTaken,
    MedicineAdded,
    ReviewAdded,
    FavoriteAdded,
    InteractionChecked,
    DosageCalculated,
    DataExported,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::DoseTaken => "dose-taken",
            ActivityType::MedicineAdded => "medicine-added",
            ActivityType::ReviewAdded => "review-added",
            ActivityType::FavoriteAdded => "favorite-added",
            ActivityType::InteractionChecked => "interaction-checked",
            ActivityType::DosageCalculated => "dosage-calculated",
            ActivityType::DataExported => "data-exported",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "dose-taken" => Some(ActivityType::DoseTaken),
            "medicine-added" => Some(ActivityType::MedicineAdded),
            "review-added" => Some(ActivityType::ReviewAdded),
            "favorite-added" => Some(ActivityType::FavoriteAdded),
            "interaction-checked" => Some(ActivityType::InteractionChecked),
            "dosage-calculated" => Some(ActivityType::DosageCalculated),
            "data-exported" => Some(ActivityType::DataExported),
            _ => None,
        }
    }

    /// Font Awesome icon shown next to the entry.
    pub fn icon(&self) -> &'static str {
        match self {
            ActivityType::DoseTaken => "fa-check-circle",
            ActivityType::MedicineAdded => "fa-plus-circle",
            ActivityType::ReviewAdded => "fa-star",
            ActivityType::FavoriteAdded => "fa-heart",
            ActivityType::InteractionChecked => "fa-exclamation-triangle",
            ActivityType::DosageCalculated => "fa-calculator",
            ActivityType::DataExported => "fa-download",
        }
    }
}

/// One activity log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub description: String,
    pub timestamp: String,
}
