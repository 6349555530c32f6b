//! Background reminder poll.
//!
//! Once per interval the task compares the wall clock against every schedule
//! with reminders on. Anything due is logged and pushed into a capped buffer
//! the API reads from.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::catalog::Catalog;
use crate::db::Repository;
use crate::models::{Reminder, Schedule};

use super::is_taken_today;

/// Most reminders kept in memory.
pub const REMINDER_BUFFER_CAPACITY: usize = 50;

/// Reminders due at `now`: slots matching the current HH:MM that have not
/// been logged today.
pub fn due_reminders<Tz: TimeZone>(
    schedules: &[Schedule],
    catalog: &Catalog,
    now: &DateTime<Tz>,
) -> Vec<Reminder> {
    let current = now.time().format("%H:%M").to_string();
    let fired_at = now.with_timezone(&Utc).to_rfc3339();

    schedules
        .iter()
        .filter(|s| s.reminders)
        .flat_map(|schedule| {
            schedule
                .times
                .iter()
                .filter(|t| **t == current)
                .map(move |time| (schedule, time))
        })
        .filter(|(schedule, time)| !is_taken_today(schedule, time, now))
        .filter_map(|(schedule, time)| {
            let medicine = catalog.get(schedule.medicine_id)?;
            Some(Reminder {
                medicine_id: schedule.medicine_id,
                medicine_name: medicine.name.clone(),
                dosage: schedule.dosage.clone(),
                time: time.clone(),
                message: format!("Time to take {} ({})", medicine.name, schedule.dosage),
                fired_at: fired_at.clone(),
            })
        })
        .collect()
}

/// Shared ring of recently fired reminders, oldest first.
#[derive(Clone, Default)]
pub struct ReminderBuffer {
    inner: Arc<Mutex<VecDeque<Reminder>>>,
}

impl ReminderBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reminder: Reminder) {
        let mut queue = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if queue.len() == REMINDER_BUFFER_CAPACITY {
            queue.pop_front();
        }
        queue.push_back(reminder);
    }

    /// Snapshot, newest first.
    pub fn recent(&self) -> Vec<Reminder> {
        let queue = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        queue.iter().rev().cloned().collect()
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

/// Run one poll against the repository.
pub async fn check_reminders(repo: &Repository, catalog: &Catalog, buffer: &ReminderBuffer) {
    let schedules = match repo.list_schedules().await {
        Ok(schedules) => schedules,
        Err(e) => {
            tracing::warn!("Reminder check skipped: {}", e);
            return;
        }
    };

    for reminder in due_reminders(&schedules, catalog, &Local::now()) {
        tracing::info!(
            medicine_id = reminder.medicine_id,
            time = %reminder.time,
            "{}",
            reminder.message
        );
        buffer.push(reminder);
    }
}

/// Spawn the reminder poll. It stops when `token` is cancelled.
pub fn spawn_reminder_task(
    repo: Arc<Repository>,
    catalog: Arc<Catalog>,
    buffer: ReminderBuffer,
    every: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!("Reminder task started (every {:?})", every);

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("Reminder task stopped");
                    break;
                }
                _ = interval.tick() => {
                    check_reminders(&repo, &catalog, &buffer).await;
                }
            }
        }
    })
}
