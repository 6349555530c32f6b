//! Database repository for user state.
//!
//! Each logical entity is read-modified-written inside one transaction, and
//! every committed write bumps the revision counter in `meta`.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use serde::de::DeserializeOwned;
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::autocomplete::{push_recent, MAX_RECENT};
use crate::errors::AppError;
use crate::models::{
    Activity, ActivityType, CompletedDose, Effectiveness, Frequency, Preferences, Review,
    RevisionInfo, SavedSearch, Schedule, SideEffectLevel, UpdatePreferencesRequest,
    DEFAULT_USER_NAME,
};
use crate::tracker;

/// Activity entries kept; older ones are trimmed.
pub const MAX_ACTIVITY: i64 = 50;

/// Saved searches kept; older ones are trimmed.
pub const MAX_SAVED_SEARCHES: i64 = 10;

const PREF_USER_ID: &str = "user_id";
const PREF_USER_NAME: &str = "user_name";
const PREF_DISCLAIMER: &str = "disclaimer_acknowledged";
const PREF_SHORTCUTS: &str = "shortcuts_shown";

const SCHEDULE_COLUMNS: &str = "medicine_id, dosage, frequency, times, start_date, duration, \
     reminders, notes, created_at, last_taken, completed_doses, version";

const REVIEW_COLUMNS: &str = "medicine_id, user_id, user_name, rating, title, text, \
     effectiveness, side_effects, recommend, created_at, updated_at";

/// Capped per-user medicine selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Comparison,
    Interaction,
}

impl SelectionKind {
    fn as_str(&self) -> &'static str {
        match self {
            SelectionKind::Comparison => "comparison",
            SelectionKind::Interaction => "interaction",
        }
    }

    /// Most medicines the selection may hold.
    pub fn capacity(&self) -> usize {
        match self {
            SelectionKind::Comparison => crate::comparison::MAX_COMPARE,
            SelectionKind::Interaction => crate::interactions::MAX_SELECTED,
        }
    }

    fn full_message(&self) -> String {
        match self {
            SelectionKind::Comparison => {
                format!("Maximum {} medicines can be compared", self.capacity())
            }
            SelectionKind::Interaction => format!(
                "Maximum {} medicines can be checked for interactions",
                self.capacity()
            ),
        }
    }
}

/// Database repository for all user-state operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row =
            sqlx::query("SELECT schema_version, revision_id, generated_at FROM meta WHERE id = 1")
                .fetch_one(&self.pool)
                .await?;
        Ok(RevisionInfo {
            schema_version: row.get("schema_version"),
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    // ==================== PREFERENCES ====================

    /// Current preferences; the anonymous user id is created on first read.
    pub async fn get_preferences(&self) -> Result<Preferences, AppError> {
        let mut tx = self.pool.begin().await?;
        let prefs = load_preferences(&mut tx).await?;
        tx.commit().await?;
        Ok(prefs)
    }

    pub async fn update_preferences(
        &self,
        request: &UpdatePreferencesRequest,
    ) -> Result<Preferences, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut prefs = load_preferences(&mut tx).await?;

        if let Some(name) = &request.user_name {
            let name = name.trim();
            prefs.user_name = if name.is_empty() {
                DEFAULT_USER_NAME.to_string()
            } else {
                name.to_string()
            };
            set_preference(&mut tx, PREF_USER_NAME, &prefs.user_name).await?;
        }
        if let Some(flag) = request.disclaimer_acknowledged {
            prefs.disclaimer_acknowledged = flag;
            set_preference(&mut tx, PREF_DISCLAIMER, bool_str(flag)).await?;
        }
        if let Some(flag) = request.shortcuts_shown {
            prefs.shortcuts_shown = flag;
            set_preference(&mut tx, PREF_SHORTCUTS, bool_str(flag)).await?;
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(prefs)
    }

    // ==================== FAVORITES ====================

    /// Favorite medicine ids in insertion order.
    pub async fn list_favorites(&self) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar("SELECT medicine_id FROM favorites ORDER BY seq")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    /// Add the medicine if absent, remove it if present. Returns the new membership.
    pub async fn toggle_favorite(&self, medicine_id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query("SELECT seq FROM favorites WHERE medicine_id = ?")
            .bind(medicine_id)
            .fetch_optional(&mut *tx)
            .await?;

        let now_favorite = if existing.is_some() {
            sqlx::query("DELETE FROM favorites WHERE medicine_id = ?")
                .bind(medicine_id)
                .execute(&mut *tx)
                .await?;
            false
        } else {
            sqlx::query("INSERT INTO favorites (medicine_id, added_at) VALUES (?, ?)")
                .bind(medicine_id)
                .bind(Utc::now().to_rfc3339())
                .execute(&mut *tx)
                .await?;
            true
        };

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(now_favorite)
    }

    // ==================== SCHEDULES ====================

    pub async fn list_schedules(&self) -> Result<Vec<Schedule>, AppError> {
        let sql = format!(
            "SELECT {} FROM schedules ORDER BY created_at, medicine_id",
            SCHEDULE_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(schedule_from_row).collect())
    }

    pub async fn get_schedule(&self, medicine_id: i64) -> Result<Option<Schedule>, AppError> {
        let sql = format!(
            "SELECT {} FROM schedules WHERE medicine_id = ?",
            SCHEDULE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(medicine_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(schedule_from_row))
    }

    /// Store a schedule, replacing any existing one for the same medicine
    /// (dose history included).
    pub async fn save_schedule(&self, schedule: &Schedule) -> Result<Schedule, AppError> {
        let mut tx = self.pool.begin().await?;

        let previous: Option<i64> =
            sqlx::query_scalar("SELECT version FROM schedules WHERE medicine_id = ?")
                .bind(schedule.medicine_id)
                .fetch_optional(&mut *tx)
                .await?;

        let mut saved = schedule.clone();
        saved.version = previous.map(|v| v + 1).unwrap_or(1);

        sqlx::query(
            "INSERT OR REPLACE INTO schedules (medicine_id, dosage, frequency, times, start_date, duration, reminders, notes, created_at, last_taken, completed_doses, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(saved.medicine_id)
        .bind(&saved.dosage)
        .bind(saved.frequency.as_str())
        .bind(serde_json::to_string(&saved.times)?)
        .bind(&saved.start_date)
        .bind(saved.duration)
        .bind(saved.reminders as i32)
        .bind(&saved.notes)
        .bind(&saved.created_at)
        .bind(&saved.last_taken)
        .bind(serde_json::to_string(&saved.completed_doses)?)
        .bind(saved.version)
        .execute(&mut *tx)
        .await?;

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(saved)
    }

    pub async fn delete_schedule(&self, medicine_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM schedules WHERE medicine_id = ?")
            .bind(medicine_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "No schedule for medicine {}",
                medicine_id
            )));
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Append a completed dose with optimistic concurrency control.
    ///
    /// The slot checks run against the schedule read in this transaction,
    /// so two requests for the same slot cannot both record it.
    pub async fn record_dose<Tz: TimeZone>(
        &self,
        medicine_id: i64,
        time: &str,
        expected_version: Option<i64>,
        now: &DateTime<Tz>,
    ) -> Result<Schedule, AppError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "SELECT {} FROM schedules WHERE medicine_id = ?",
            SCHEDULE_COLUMNS
        );
        let mut schedule = sqlx::query(&sql)
            .bind(medicine_id)
            .fetch_optional(&mut *tx)
            .await?
            .as_ref()
            .map(schedule_from_row)
            .ok_or_else(|| {
                AppError::NotFound(format!("No schedule for medicine {}", medicine_id))
            })?;

        if let Some(expected) = expected_version {
            if schedule.version != expected {
                return Err(AppError::Conflict {
                    message: format!(
                        "Version mismatch: expected {}, current {}",
                        expected, schedule.version
                    ),
                    current_version: schedule.version,
                });
            }
        }

        tracker::check_dose(&schedule, time, now)?;

        let taken_at = now.with_timezone(&Utc).to_rfc3339();
        schedule.completed_doses.push(CompletedDose {
            time: time.to_string(),
            taken_at: taken_at.clone(),
        });
        schedule.last_taken = Some(taken_at);
        let current_version = schedule.version;
        schedule.version += 1;

        let result = sqlx::query(
            "UPDATE schedules SET completed_doses = ?, last_taken = ?, version = ? WHERE medicine_id = ? AND version = ?",
        )
        .bind(serde_json::to_string(&schedule.completed_doses)?)
        .bind(&schedule.last_taken)
        .bind(schedule.version)
        .bind(medicine_id)
        .bind(current_version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict {
                message: "Concurrent modification detected".to_string(),
                current_version,
            });
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(schedule)
    }

    // ==================== REVIEWS ====================

    /// Reviews for one medicine, oldest first.
    pub async fn list_reviews(&self, medicine_id: i64) -> Result<Vec<Review>, AppError> {
        let sql = format!(
            "SELECT {} FROM reviews WHERE medicine_id = ? ORDER BY seq",
            REVIEW_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(medicine_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(review_from_row).collect())
    }

    pub async fn list_all_reviews(&self) -> Result<Vec<Review>, AppError> {
        let sql = format!(
            "SELECT {} FROM reviews ORDER BY medicine_id, seq",
            REVIEW_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(review_from_row).collect())
    }

    /// Store a review, replacing the same user's earlier review of the medicine.
    pub async fn upsert_review(&self, review: &Review) -> Result<Review, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM reviews WHERE medicine_id = ? AND user_id = ?")
            .bind(review.medicine_id)
            .bind(&review.user_id)
            .execute(&mut *tx)
            .await?;

        insert_review(&mut tx, review).await?;

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(review.clone())
    }

    pub async fn delete_review(&self, medicine_id: i64, user_id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM reviews WHERE medicine_id = ? AND user_id = ?")
            .bind(medicine_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "No review of medicine {} by the current user",
                medicine_id
            )));
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Insert `reviews` only when the table is empty. Returns how many were written.
    pub async fn seed_reviews_if_empty(&self, reviews: &[Review]) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
            .fetch_one(&mut *tx)
            .await?;
        if count > 0 {
            return Ok(0);
        }

        for review in reviews {
            insert_review(&mut tx, review).await?;
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(reviews.len())
    }

    // ==================== ACTIVITY ====================

    /// Append to the activity log, trimming it to the newest entries.
    pub async fn log_activity(
        &self,
        activity_type: ActivityType,
        description: &str,
    ) -> Result<Activity, AppError> {
        let mut tx = self.pool.begin().await?;
        let timestamp = Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO activity (activity_type, description, timestamp) VALUES (?, ?, ?)")
            .bind(activity_type.as_str())
            .bind(description)
            .bind(&timestamp)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "DELETE FROM activity WHERE seq NOT IN (SELECT seq FROM activity ORDER BY seq DESC LIMIT ?)",
        )
        .bind(MAX_ACTIVITY)
        .execute(&mut *tx)
        .await?;

        bump_revision(&mut tx).await?;
        tx.commit().await?;

        Ok(Activity {
            activity_type,
            description: description.to_string(),
            timestamp,
        })
    }

    /// Activity log, oldest first.
    pub async fn list_activity(&self) -> Result<Vec<Activity>, AppError> {
        let rows = sqlx::query(
            "SELECT activity_type, description, timestamp FROM activity ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().filter_map(activity_from_row).collect())
    }

    pub async fn clear_activity(&self) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM activity").execute(&mut *tx).await?;
        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    // ==================== SAVED & RECENT SEARCHES ====================

    pub async fn save_search(&self, search: &SavedSearch) -> Result<SavedSearch, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO saved_searches (id, drug_class, sort_by, contains_text, side_effects, results_count, saved_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&search.id)
        .bind(&search.drug_class)
        .bind(&search.sort_by)
        .bind(&search.contains_text)
        .bind(&search.side_effects)
        .bind(search.results_count)
        .bind(&search.saved_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM saved_searches WHERE seq NOT IN (SELECT seq FROM saved_searches ORDER BY seq DESC LIMIT ?)",
        )
        .bind(MAX_SAVED_SEARCHES)
        .execute(&mut *tx)
        .await?;

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(search.clone())
    }

    /// Saved searches, newest first.
    pub async fn list_saved_searches(&self) -> Result<Vec<SavedSearch>, AppError> {
        let rows = sqlx::query(
            "SELECT id, drug_class, sort_by, contains_text, side_effects, results_count, saved_at FROM saved_searches ORDER BY seq DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| SavedSearch {
                id: row.get("id"),
                drug_class: row.get("drug_class"),
                sort_by: row.get("sort_by"),
                contains_text: row.get("contains_text"),
                side_effects: row.get("side_effects"),
                results_count: row.get("results_count"),
                saved_at: row.get("saved_at"),
            })
            .collect())
    }

    /// Recent search terms, newest first.
    pub async fn list_recent_searches(&self) -> Result<Vec<String>, AppError> {
        let terms = sqlx::query_scalar("SELECT term FROM recent_searches ORDER BY seq DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(terms)
    }

    /// Move `term` to the front of the recent list.
    pub async fn add_recent_search(&self, term: &str) -> Result<Vec<String>, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut recent: Vec<String> =
            sqlx::query_scalar("SELECT term FROM recent_searches ORDER BY seq DESC")
                .fetch_all(&mut *tx)
                .await?;
        push_recent(&mut recent, term);
        debug_assert!(recent.len() <= MAX_RECENT);

        sqlx::query("DELETE FROM recent_searches")
            .execute(&mut *tx)
            .await?;
        for stored in recent.iter().rev() {
            sqlx::query("INSERT INTO recent_searches (term) VALUES (?)")
                .bind(stored)
                .execute(&mut *tx)
                .await?;
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(recent)
    }

    // ==================== SELECTIONS ====================

    pub async fn list_selection(&self, kind: SelectionKind) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar("SELECT medicine_id FROM selections WHERE kind = ? ORDER BY seq")
            .bind(kind.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    /// Add or remove a medicine. Adding to a full selection fails with `LimitReached`.
    pub async fn toggle_selection(
        &self,
        kind: SelectionKind,
        medicine_id: i64,
    ) -> Result<Vec<i64>, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut ids: Vec<i64> =
            sqlx::query_scalar("SELECT medicine_id FROM selections WHERE kind = ? ORDER BY seq")
                .bind(kind.as_str())
                .fetch_all(&mut *tx)
                .await?;

        if let Some(pos) = ids.iter().position(|id| *id == medicine_id) {
            sqlx::query("DELETE FROM selections WHERE kind = ? AND medicine_id = ?")
                .bind(kind.as_str())
                .bind(medicine_id)
                .execute(&mut *tx)
                .await?;
            ids.remove(pos);
        } else {
            if ids.len() >= kind.capacity() {
                return Err(AppError::LimitReached(kind.full_message()));
            }
            sqlx::query("INSERT INTO selections (kind, medicine_id) VALUES (?, ?)")
                .bind(kind.as_str())
                .bind(medicine_id)
                .execute(&mut *tx)
                .await?;
            ids.push(medicine_id);
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(ids)
    }

    pub async fn clear_selection(&self, kind: SelectionKind) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM selections WHERE kind = ?")
            .bind(kind.as_str())
            .execute(&mut *tx)
            .await?;
        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(())
    }
}

// Helpers shared by the transactional operations

async fn bump_revision(conn: &mut SqliteConnection) -> Result<(), AppError> {
    sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
        .bind(Utc::now().to_rfc3339())
        .execute(conn)
        .await?;
    Ok(())
}

async fn set_preference(conn: &mut SqliteConnection, key: &str, value: &str) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO preferences (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(conn)
    .await?;
    Ok(())
}

async fn load_preferences(conn: &mut SqliteConnection) -> Result<Preferences, AppError> {
    let rows = sqlx::query("SELECT key, value FROM preferences")
        .fetch_all(&mut *conn)
        .await?;
    let values: HashMap<String, String> = rows
        .iter()
        .map(|row| (row.get("key"), row.get("value")))
        .collect();

    let user_id = match values.get(PREF_USER_ID) {
        Some(id) => id.clone(),
        None => {
            let id = generate_user_id();
            set_preference(&mut *conn, PREF_USER_ID, &id).await?;
            bump_revision(&mut *conn).await?;
            tracing::info!("Created anonymous user id {}", id);
            id
        }
    };

    Ok(Preferences {
        user_id,
        user_name: values
            .get(PREF_USER_NAME)
            .cloned()
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
        disclaimer_acknowledged: values.get(PREF_DISCLAIMER).map(String::as_str) == Some("true"),
        shortcuts_shown: values.get(PREF_SHORTCUTS).map(String::as_str) == Some("true"),
    })
}

async fn insert_review(conn: &mut SqliteConnection, review: &Review) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO reviews (medicine_id, user_id, user_name, rating, title, text, effectiveness, side_effects, recommend, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(review.medicine_id)
    .bind(&review.user_id)
    .bind(&review.user_name)
    .bind(review.rating)
    .bind(&review.title)
    .bind(&review.text)
    .bind(review.effectiveness.map(|e| e.as_str()))
    .bind(review.side_effects.map(|s| s.as_str()))
    .bind(review.recommend as i32)
    .bind(&review.created_at)
    .bind(&review.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

fn bool_str(flag: bool) -> &'static str {
    if flag {
        "true"
    } else {
        "false"
    }
}

/// `user_` followed by nine lowercase base-36 characters.
fn generate_user_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("user_{}", suffix)
}

// Row conversion

fn schedule_from_row(row: &sqlx::sqlite::SqliteRow) -> Schedule {
    let frequency: String = row.get("frequency");
    let times: String = row.get("times");
    let completed: String = row.get("completed_doses");
    let reminders: i32 = row.get("reminders");

    Schedule {
        medicine_id: row.get("medicine_id"),
        dosage: row.get("dosage"),
        frequency: Frequency::from_str(&frequency).unwrap_or(Frequency::Custom),
        times: parse_json(&times),
        start_date: row.get("start_date"),
        duration: row.get("duration"),
        reminders: reminders != 0,
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        last_taken: row.get("last_taken"),
        completed_doses: parse_json(&completed),
        version: row.get("version"),
    }
}

fn review_from_row(row: &sqlx::sqlite::SqliteRow) -> Review {
    let effectiveness: Option<String> = row.get("effectiveness");
    let side_effects: Option<String> = row.get("side_effects");
    let recommend: i32 = row.get("recommend");

    Review {
        medicine_id: row.get("medicine_id"),
        user_id: row.get("user_id"),
        user_name: row.get("user_name"),
        rating: row.get("rating"),
        title: row.get("title"),
        text: row.get("text"),
        effectiveness: effectiveness.and_then(|e| Effectiveness::from_str(&e)),
        side_effects: side_effects.and_then(|s| SideEffectLevel::from_str(&s)),
        recommend: recommend != 0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Rows with an unknown type are skipped.
fn activity_from_row(row: &sqlx::sqlite::SqliteRow) -> Option<Activity> {
    let kind: String = row.get("activity_type");
    Some(Activity {
        activity_type: ActivityType::from_str(&kind)?,
        description: row.get("description"),
        timestamp: row.get("timestamp"),
    })
}

/// Unparseable JSON columns read back as empty.
fn parse_json<T: DeserializeOwned + Default>(s: &str) -> T {
    serde_json::from_str(s).unwrap_or_default()
}
