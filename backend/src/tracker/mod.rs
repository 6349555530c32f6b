//! Medicine tracker: dose schedules, today's slots and adherence.
//!
//! Stored timestamps are UTC; "today" is judged in whatever time zone the
//! caller's `now` carries (local time in the server, UTC in tests).

mod reminder;

pub use reminder::*;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::catalog::Catalog;
use crate::errors::AppError;
use crate::models::{is_valid_time, CompletedDose, Frequency, SaveScheduleRequest, Schedule, TodayDose};

/// Window used for the adherence rate.
pub const ADHERENCE_DAYS: i64 = 7;

/// Turn a save request into a fresh schedule with an empty dose history.
pub fn build_schedule(
    request: &SaveScheduleRequest,
    catalog: &Catalog,
    now: DateTime<Utc>,
) -> Result<Schedule, AppError> {
    catalog.require(request.medicine_id)?;

    let dosage = request.dosage.trim();
    if dosage.is_empty() {
        return Err(AppError::Validation("Dosage is required".to_string()));
    }
    if request.duration < 1 {
        return Err(AppError::Validation(
            "Duration must be at least 1 day".to_string(),
        ));
    }

    let times = match request.frequency {
        Frequency::Custom => {
            let times: Vec<String> = request
                .custom_times
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            if let Some(bad) = times.iter().find(|t| !is_valid_time(t)) {
                return Err(AppError::Validation(format!(
                    "Invalid time '{}', expected HH:MM",
                    bad
                )));
            }
            if times.is_empty() {
                return Err(AppError::Validation(
                    "Add at least one time for a custom schedule".to_string(),
                ));
            }
            times
        }
        preset => preset.default_times(),
    };

    let start_date = request
        .start_date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());
    if let Some(date) = start_date {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            AppError::Validation(format!("Invalid start date '{}', expected YYYY-MM-DD", date))
        })?;
    }

    Ok(Schedule {
        medicine_id: request.medicine_id,
        dosage: dosage.to_string(),
        frequency: request.frequency,
        times,
        start_date: start_date.map(str::to_string),
        duration: request.duration,
        reminders: request.reminders,
        notes: request.notes.trim().to_string(),
        created_at: now.to_rfc3339(),
        last_taken: None,
        completed_doses: Vec::new(),
        version: 0,
    })
}

/// Calendar date of a dose in the zone of `tz`, or `None` if unparseable.
fn dose_date<Tz: TimeZone>(dose: &CompletedDose, tz: &Tz) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(&dose.taken_at)
        .ok()
        .map(|t| t.with_timezone(tz).date_naive())
}

/// Doses logged on `now`'s calendar day.
pub fn doses_on_day<'a, Tz: TimeZone>(
    schedule: &'a Schedule,
    now: &DateTime<Tz>,
) -> Vec<&'a CompletedDose> {
    let today = now.date_naive();
    let tz = now.timezone();
    schedule
        .completed_doses
        .iter()
        .filter(|d| dose_date(d, &tz) == Some(today))
        .collect()
}

/// Whether the `time` slot was already logged today.
pub fn is_taken_today<Tz: TimeZone>(schedule: &Schedule, time: &str, now: &DateTime<Tz>) -> bool {
    doses_on_day(schedule, now).iter().any(|d| d.time == time)
}

/// Check a take-dose request against the schedule before recording it.
pub fn check_dose<Tz: TimeZone>(
    schedule: &Schedule,
    time: &str,
    now: &DateTime<Tz>,
) -> Result<(), AppError> {
    if !schedule.times.iter().any(|t| t == time) {
        return Err(AppError::Validation(format!(
            "{} is not a scheduled time for this medicine",
            time
        )));
    }
    if is_taken_today(schedule, time, now) {
        return Err(AppError::Validation(format!(
            "Dose at {} already taken today",
            time
        )));
    }
    Ok(())
}

/// Whether `time` (HH:MM) is strictly before `now` on `now`'s day.
pub fn is_time_past<Tz: TimeZone>(time: &str, now: &DateTime<Tz>) -> bool {
    match NaiveTime::parse_from_str(time, "%H:%M") {
        Ok(slot) => now.time() > slot,
        Err(_) => false,
    }
}

/// One entry per (schedule, time) for today, in schedule order.
/// Schedules for medicines missing from the catalog are skipped.
pub fn today_doses<Tz: TimeZone>(
    schedules: &[Schedule],
    catalog: &Catalog,
    now: &DateTime<Tz>,
) -> Vec<TodayDose> {
    let mut slots = Vec::new();
    for schedule in schedules {
        let Some(medicine) = catalog.get(schedule.medicine_id) else {
            continue;
        };
        let taken_today = doses_on_day(schedule, now);
        for time in &schedule.times {
            slots.push(TodayDose {
                medicine_id: schedule.medicine_id,
                medicine_name: medicine.name.clone(),
                dosage: schedule.dosage.clone(),
                time: time.clone(),
                taken: taken_today.iter().any(|d| &d.time == time),
                is_past: is_time_past(time, now),
            });
        }
    }
    slots
}

/// Total doses logged today across all schedules.
pub fn doses_taken_today<Tz: TimeZone>(schedules: &[Schedule], now: &DateTime<Tz>) -> usize {
    schedules.iter().map(|s| doses_on_day(s, now).len()).sum()
}

/// Percentage of expected doses taken over the last seven calendar days,
/// today included. 0 when nothing is scheduled.
pub fn adherence_rate<Tz: TimeZone>(schedules: &[Schedule], now: &DateTime<Tz>) -> u32 {
    let today = now.date_naive();
    let earliest = today - Duration::days(ADHERENCE_DAYS - 1);
    let tz = now.timezone();

    let mut expected = 0usize;
    let mut taken = 0usize;
    for schedule in schedules {
        expected += schedule.times.len() * ADHERENCE_DAYS as usize;
        taken += schedule
            .completed_doses
            .iter()
            .filter_map(|d| dose_date(d, &tz))
            .filter(|date| *date >= earliest && *date <= today)
            .count();
    }

    if expected == 0 {
        return 0;
    }
    (taken as f64 / expected as f64 * 100.0).round() as u32
}

/// Activity description for a logged dose.
pub fn dose_description(medicine_name: &str, dosage: &str, time: &str) -> String {
    format!("Took {} ({}) at {}", medicine_name, dosage, time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample::sample_medicines;

    fn catalog() -> Catalog {
        Catalog::new(sample_medicines())
    }

    fn request(frequency: Frequency, custom: &[&str]) -> SaveScheduleRequest {
        SaveScheduleRequest {
            medicine_id: 1,
            dosage: "500mg".to_string(),
            frequency,
            custom_times: custom.iter().map(|t| t.to_string()).collect(),
            start_date: Some("2024-05-01".to_string()),
            duration: 7,
            reminders: true,
            notes: String::new(),
        }
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn dosed(times: &[&str], taken: &[(&str, &str)]) -> Schedule {
        let mut schedule = build_schedule(
            &request(Frequency::Custom, times),
            &catalog(),
            at("2024-05-01T07:00:00Z"),
        )
        .unwrap();
        schedule.completed_doses = taken
            .iter()
            .map(|(time, taken_at)| CompletedDose {
                time: time.to_string(),
                taken_at: taken_at.to_string(),
            })
            .collect();
        schedule
    }

    #[test]
    fn test_preset_times() {
        let now = at("2024-05-01T07:00:00Z");
        let schedule = build_schedule(&request(Frequency::Thrice, &["09:00"]), &catalog(), now).unwrap();
        assert_eq!(schedule.times, vec!["08:00", "14:00", "20:00"]);
        assert!(schedule.completed_doses.is_empty());
    }

    #[test]
    fn test_custom_times_validated() {
        let now = at("2024-05-01T07:00:00Z");
        let ok = build_schedule(&request(Frequency::Custom, &["09:30", " ", "21:00"]), &catalog(), now)
            .unwrap();
        assert_eq!(ok.times, vec!["09:30", "21:00"]);

        assert!(build_schedule(&request(Frequency::Custom, &["9pm"]), &catalog(), now).is_err());
        assert!(build_schedule(&request(Frequency::Custom, &[""]), &catalog(), now).is_err());
    }

    #[test]
    fn test_unknown_medicine_rejected() {
        let mut req = request(Frequency::Once, &[]);
        req.medicine_id = 999;
        let result = build_schedule(&req, &catalog(), Utc::now());
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_today_slots() {
        let schedule = dosed(
            &["08:00", "20:00"],
            &[("08:00", "2024-05-02T08:05:00Z"), ("20:00", "2024-05-01T20:01:00Z")],
        );
        let now = at("2024-05-02T12:00:00Z");

        let slots = today_doses(&[schedule.clone()], &catalog(), &now);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].medicine_name, "Paracetamol");
        assert!(slots[0].taken && slots[0].is_past);
        assert!(!slots[1].taken && !slots[1].is_past);
        assert_eq!(doses_taken_today(&[schedule.clone()], &now), 1);

        assert!(check_dose(&schedule, "08:00", &now).is_err());
        assert!(check_dose(&schedule, "20:00", &now).is_ok());
        assert!(check_dose(&schedule, "12:00", &now).is_err());
    }

    #[test]
    fn test_adherence_window() {
        let schedule = dosed(
            &["08:00", "20:00"],
            &[
                ("08:00", "2024-05-10T08:00:00Z"),
                ("20:00", "2024-05-10T20:00:00Z"),
                ("08:00", "2024-05-04T08:00:00Z"),
                // outside the seven-day window
                ("08:00", "2024-05-03T08:00:00Z"),
            ],
        );
        let now = at("2024-05-10T21:00:00Z");
        // 3 of 14
        assert_eq!(adherence_rate(&[schedule], &now), 21);
        assert_eq!(adherence_rate(&[], &now), 0);
    }

    #[test]
    fn test_dose_description() {
        assert_eq!(
            dose_description("Paracetamol", "500mg", "08:00"),
            "Took Paracetamol (500mg) at 08:00"
        );
    }
}
