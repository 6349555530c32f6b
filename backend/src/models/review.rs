//! Medicine review models.

use serde::{Deserialize, Serialize};

/// How well the medicine worked for the reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Effectiveness {
    VeryEffective,
    Effective,
    SomewhatEffective,
    NotEffective,
}

impl Effectiveness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effectiveness::VeryEffective => "very-effective",
            Effectiveness::Effective => "effective",
            Effectiveness::SomewhatEffective => "somewhat-effective",
            Effectiveness::NotEffective => "not-effective",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "very-effective" => Some(Effectiveness::VeryEffective),
            "effective" => Some(Effectiveness::Effective),
            "somewhat-effective" => Some(Effectiveness::SomewhatEffective),
            "not-effective" => Some(Effectiveness::NotEffective),
            _ => None,
        }
    }
}

/// Side effects the reviewer experienced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideEffectLevel {
    None,
    Mild,
    Moderate,
    Severe,
}

impl SideEffectLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SideEffectLevel::None => "none",
            SideEffectLevel::Mild => "mild",
            SideEffectLevel::Moderate => "moderate",
            SideEffectLevel::Severe => "severe",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(SideEffectLevel::None),
            "mild" => Some(SideEffectLevel::Mild),
            "moderate" => Some(SideEffectLevel::Moderate),
            "severe" => Some(SideEffectLevel::Severe),
            _ => None,
        }
    }
}

/// A user's review of one medicine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub medicine_id: i64,
    pub user_id: String,
    pub user_name: String,
    pub rating: i64,
    pub title: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effectiveness: Option<Effectiveness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<SideEffectLevel>,
    pub recommend: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Request body for submitting a review. The author is the current user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
    pub rating: i64,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub effectiveness: Option<Effectiveness>,
    #[serde(default)]
    pub side_effects: Option<SideEffectLevel>,
    #[serde(default)]
    pub recommend: bool,
    /// Overrides the stored display name when present.
    #[serde(default)]
    pub user_name: Option<String>,
}

/// A review decorated for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: Review,
    pub time_ago: String,
    pub is_own: bool,
}

/// Five-star display split into full, half and empty stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarBreakdown {
    pub full: u8,
    pub half: u8,
    pub empty: u8,
}

/// All reviews for one medicine plus the aggregate rating.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineReviews {
    pub medicine_id: i64,
    pub average_rating: f64,
    pub review_count: usize,
    pub stars: StarBreakdown,
    pub reviews: Vec<ReviewView>,
}
