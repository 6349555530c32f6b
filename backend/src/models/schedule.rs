//! Dose schedule models for the medicine tracker.

use serde::{Deserialize, Serialize};

/// How often a scheduled medicine is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Once,
    Twice,
    Thrice,
    Four,
    Custom,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Once => "once",
            Frequency::Twice => "twice",
            Frequency::Thrice => "thrice",
            Frequency::Four => "four",
            Frequency::Custom => "custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "once" => Some(Frequency::Once),
            "twice" => Some(Frequency::Twice),
            "thrice" => Some(Frequency::Thrice),
            "four" => Some(Frequency::Four),
            "custom" => Some(Frequency::Custom),
            _ => None,
        }
    }

    /// Default times of day; `Custom` has none.
    pub fn default_times(&self) -> Vec<String> {
        let times: &[&str] = match self {
            Frequency::Once => &["08:00"],
            Frequency::Twice => &["08:00", "20:00"],
            Frequency::Thrice => &["08:00", "14:00", "20:00"],
            Frequency::Four => &["08:00", "12:00", "16:00", "20:00"],
            Frequency::Custom => &[],
        };
        times.iter().map(|t| t.to_string()).collect()
    }
}

/// A dose logged against one of the schedule's times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedDose {
    pub time: String,
    pub taken_at: String,
}

/// A recurring dosing plan. One per medicine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub medicine_id: i64,
    pub dosage: String,
    pub frequency: Frequency,
    pub times: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    pub duration: i64,
    pub reminders: bool,
    #[serde(default)]
    pub notes: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_taken: Option<String>,
    #[serde(default)]
    pub completed_doses: Vec<CompletedDose>,
    /// Internal version for optimistic concurrency control
    #[serde(default)]
    pub version: i64,
}

/// Request body for saving (creating or replacing) a schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveScheduleRequest {
    pub medicine_id: i64,
    pub dosage: String,
    pub frequency: Frequency,
    /// Only read when `frequency` is `custom`.
    #[serde(default)]
    pub custom_times: Vec<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default = "default_duration")]
    pub duration: i64,
    #[serde(default = "default_reminders")]
    pub reminders: bool,
    #[serde(default)]
    pub notes: String,
}

fn default_duration() -> i64 {
    7
}

fn default_reminders() -> bool {
    true
}

/// Request body for logging a dose.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeDoseRequest {
    pub time: String,
    /// Expected version for optimistic concurrency control
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// One slot of today's schedule.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayDose {
    pub medicine_id: i64,
    pub medicine_name: String,
    pub dosage: String,
    pub time: String,
    pub taken: bool,
    pub is_past: bool,
}

/// A reminder fired by the background poll.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub medicine_id: i64,
    pub medicine_name: String,
    pub dosage: String,
    pub time: String,
    pub message: String,
    pub fired_at: String,
}

/// Check a `HH:MM` time-of-day string.
pub fn is_valid_time(time: &str) -> bool {
    chrono::NaiveTime::parse_from_str(time, "%H:%M").is_ok() && time.len() == 5
}
