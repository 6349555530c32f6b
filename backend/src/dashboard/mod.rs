//! Personal dashboard: counters, today's schedule, insights, tips, and
//! whole-user data export and backup.

use std::collections::{BTreeMap, HashMap};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::errors::AppError;
use crate::models::{
    Activity, BackupCode, BackupPayload, MedicineCard, Preferences, Review, Schedule, TodayDose,
    UserDataExport,
};
use crate::reviews::{average_rating, time_ago_str};
use crate::tracker;

/// Entries shown in the recent-activity panel.
pub const RECENT_ACTIVITY_COUNT: usize = 5;

/// Favorites shown in the dashboard preview.
pub const FAVORITE_PREVIEW_COUNT: usize = 5;

/// Version tag written into user data exports.
pub const EXPORT_VERSION: &str = "1.0";

const DEFAULT_MEDICINE_TYPE: &str = "Tablet";
const BACKUP_DISPLAY_CHARS: usize = 20;

pub const HEALTH_TIPS: [&str; 10] = [
    "Always take medicines with a full glass of water unless otherwise directed by your healthcare provider.",
    "Store medicines in a cool, dry place away from direct sunlight and out of reach of children.",
    "Never share prescription medicines with others, even if they have similar symptoms.",
    "Complete the full course of antibiotics even if you feel better before finishing them.",
    "Keep a list of all your medicines and show it to every healthcare provider you visit.",
    "Check expiration dates regularly and dispose of expired medicines safely.",
    "Take medicines at the same time each day to maintain consistent levels in your body.",
    "Don't crush or break tablets unless your pharmacist says it's safe to do so.",
    "Be aware of potential food and drug interactions that could affect medicine effectiveness.",
    "Always inform your healthcare provider about any side effects you experience.",
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthTip {
    pub index: usize,
    pub total: usize,
    pub text: &'static str,
}

/// Tip at `index`, wrapping around the list.
pub fn health_tip(index: usize) -> HealthTip {
    let index = index % HEALTH_TIPS.len();
    HealthTip {
        index,
        total: HEALTH_TIPS.len(),
        text: HEALTH_TIPS[index],
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub scheduled_medicines: usize,
    pub favorite_medicines: usize,
    pub reviewed_medicines: usize,
    pub doses_today: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityView {
    #[serde(flatten)]
    pub activity: Activity,
    pub icon: &'static str,
    pub time_ago: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePreview {
    pub medicines: Vec<MedicineCard>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub most_used_type: String,
    /// One decimal place, "0.0" without reviews.
    pub average_rating: String,
    pub adherence_rate: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub today_schedule: Vec<TodayDose>,
    pub recent_activity: Vec<ActivityView>,
    pub favorites: FavoritePreview,
    pub insights: Insights,
}

/// Persisted user state the dashboard is computed from.
pub struct UserState {
    pub schedules: Vec<Schedule>,
    pub favorites: Vec<i64>,
    pub reviews: Vec<Review>,
    pub activity: Vec<Activity>,
}

/// Assemble the dashboard. `now` decides what "today" means.
pub fn build<Tz: TimeZone>(state: &UserState, catalog: &Catalog, now: &DateTime<Tz>) -> Dashboard {
    let now_utc = now.with_timezone(&Utc);

    let stats = DashboardStats {
        scheduled_medicines: state.schedules.len(),
        favorite_medicines: state.favorites.len(),
        reviewed_medicines: reviews_by_medicine(&state.reviews).len(),
        doses_today: tracker::doses_taken_today(&state.schedules, now),
    };

    let recent_activity = state
        .activity
        .iter()
        .rev()
        .take(RECENT_ACTIVITY_COUNT)
        .map(|activity| ActivityView {
            icon: activity.activity_type.icon(),
            time_ago: time_ago_str(&activity.timestamp, now_utc),
            activity: activity.clone(),
        })
        .collect();

    let preview_ids: Vec<i64> = state
        .favorites
        .iter()
        .take(FAVORITE_PREVIEW_COUNT)
        .copied()
        .collect();
    let favorites = FavoritePreview {
        medicines: catalog
            .resolve(&preview_ids)
            .iter()
            .map(MedicineCard::from)
            .collect(),
        total: state.favorites.len(),
    };

    let insights = Insights {
        most_used_type: most_used_type(&state.schedules, catalog),
        average_rating: format!("{:.1}", average_rating(&state.reviews)),
        adherence_rate: tracker::adherence_rate(&state.schedules, now),
    };

    Dashboard {
        stats,
        today_schedule: tracker::today_doses(&state.schedules, catalog, now),
        recent_activity,
        favorites,
        insights,
    }
}

/// Most frequent type among scheduled medicines. Ties go to the type seen
/// last; with nothing scheduled the answer is "Tablet".
pub fn most_used_type(schedules: &[Schedule], catalog: &Catalog) -> String {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for schedule in schedules {
        if let Some(medicine) = catalog.get(schedule.medicine_id) {
            let kind = medicine.medicine_type.as_str();
            let count = counts.entry(kind).or_insert(0);
            if *count == 0 {
                order.push(kind);
            }
            *count += 1;
        }
    }

    order
        .into_iter()
        .fold(None::<(&str, usize)>, |best, kind| {
            let count = counts[kind];
            match best {
                Some((_, best_count)) if best_count > count => best,
                _ => Some((kind, count)),
            }
        })
        .map(|(kind, _)| kind)
        .filter(|kind| !kind.is_empty())
        .unwrap_or(DEFAULT_MEDICINE_TYPE)
        .to_string()
}

/// Group reviews by medicine id, keeping per-medicine order.
pub fn reviews_by_medicine(reviews: &[Review]) -> BTreeMap<String, Vec<Review>> {
    let mut grouped: BTreeMap<String, Vec<Review>> = BTreeMap::new();
    for review in reviews {
        grouped
            .entry(review.medicine_id.to_string())
            .or_default()
            .push(review.clone());
    }
    grouped
}

/// The downloadable dashboard export document.
pub fn user_data_export(state: UserState, now: DateTime<Utc>) -> UserDataExport {
    UserDataExport {
        reviews: reviews_by_medicine(&state.reviews),
        schedules: state.schedules,
        favorites: state.favorites,
        activity: state.activity,
        export_date: now.to_rfc3339(),
        version: EXPORT_VERSION.to_string(),
    }
}

/// Suggested file name for a dashboard export made at `now`.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("pharmadices-dashboard-{}.json", now.format("%Y-%m-%d"))
}

/// Encode all user data as a base64 backup code.
pub fn backup_code(
    state: UserState,
    prefs: &Preferences,
    now: DateTime<Utc>,
) -> Result<BackupCode, AppError> {
    let payload = BackupPayload {
        reviews: reviews_by_medicine(&state.reviews),
        schedules: state.schedules,
        favorites: state.favorites,
        activity: state.activity,
        user_id: prefs.user_id.clone(),
        user_name: prefs.user_name.clone(),
        backup_date: now.to_rfc3339(),
    };
    let code = STANDARD.encode(serde_json::to_vec(&payload)?);
    let display = shorten_code(&code);
    Ok(BackupCode { code, display })
}

fn shorten_code(code: &str) -> String {
    // base64 output is ASCII, so byte slicing is safe
    if code.len() <= BACKUP_DISPLAY_CHARS * 2 {
        return code.to_string();
    }
    format!(
        "{}...{}",
        &code[..BACKUP_DISPLAY_CHARS],
        &code[code.len() - BACKUP_DISPLAY_CHARS..]
    )
}
