//! Medicine reviews: validation, aggregates and display helpers.

use chrono::{DateTime, Duration, Utc};

use crate::errors::AppError;
use crate::models::{
    Effectiveness, MedicineReviews, Preferences, Review, ReviewView, SideEffectLevel,
    StarBreakdown, SubmitReviewRequest,
};

const MAX_STARS: u8 = 5;

/// Check a submitted review before it is stored.
pub fn validate(request: &SubmitReviewRequest) -> Result<(), AppError> {
    if request.rating == 0 || request.title.trim().is_empty() || request.text.trim().is_empty() {
        return Err(AppError::Validation(
            "Please fill in all required fields".to_string(),
        ));
    }
    if !(1..=MAX_STARS as i64).contains(&request.rating) {
        return Err(AppError::Validation(format!(
            "Rating must be between 1 and {}",
            MAX_STARS
        )));
    }
    Ok(())
}

/// Build the stored review for the current user.
pub fn build_review(
    medicine_id: i64,
    request: &SubmitReviewRequest,
    prefs: &Preferences,
    now: DateTime<Utc>,
) -> Review {
    let user_name = request
        .user_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(prefs.user_name.as_str())
        .to_string();
    let timestamp = now.to_rfc3339();

    Review {
        medicine_id,
        user_id: prefs.user_id.clone(),
        user_name,
        rating: request.rating,
        title: request.title.trim().to_string(),
        text: request.text.trim().to_string(),
        effectiveness: request.effectiveness,
        side_effects: request.side_effects,
        recommend: request.recommend,
        created_at: timestamp.clone(),
        updated_at: Some(timestamp),
    }
}

/// Mean rating, 0 when there are no reviews.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: i64 = reviews.iter().map(|r| r.rating).sum();
    sum as f64 / reviews.len() as f64
}

/// Round to one decimal place for display.
pub fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Split a rating into full, half and empty stars out of five.
pub fn stars(rating: f64) -> StarBreakdown {
    let mut breakdown = StarBreakdown {
        full: 0,
        half: 0,
        empty: 0,
    };
    for i in 1..=MAX_STARS {
        let position = i as f64;
        if position <= rating {
            breakdown.full += 1;
        } else if position - 0.5 <= rating {
            breakdown.half += 1;
        } else {
            breakdown.empty += 1;
        }
    }
    breakdown
}

/// Coarse elapsed-time label such as "3 days ago".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "Just now".to_string();
    }
    let (count, unit) = if seconds < 3_600 {
        (seconds / 60, "minutes")
    } else if seconds < 86_400 {
        (seconds / 3_600, "hours")
    } else if seconds < 2_592_000 {
        (seconds / 86_400, "days")
    } else if seconds < 31_536_000 {
        (seconds / 2_592_000, "months")
    } else {
        (seconds / 31_536_000, "years")
    };
    format!("{} {} ago", count, unit)
}

/// `time_ago` for a stored RFC 3339 timestamp. Unparseable values read as "Just now".
pub fn time_ago_str(timestamp: &str, now: DateTime<Utc>) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(then) => time_ago(then.with_timezone(&Utc), now),
        Err(_) => "Just now".to_string(),
    }
}

/// Aggregate and decorate one medicine's reviews for display.
pub fn summarize(
    medicine_id: i64,
    reviews: Vec<Review>,
    current_user: &str,
    now: DateTime<Utc>,
) -> MedicineReviews {
    let average = average_rating(&reviews);
    let review_count = reviews.len();
    let views = reviews
        .into_iter()
        .map(|review| ReviewView {
            time_ago: time_ago_str(&review.created_at, now),
            is_own: review.user_id == current_user,
            review,
        })
        .collect();

    MedicineReviews {
        medicine_id,
        average_rating: round_one(average),
        review_count,
        stars: stars(average),
        reviews: views,
    }
}

/// Demonstration reviews seeded into an empty database.
pub fn sample_reviews(now: DateTime<Utc>) -> Vec<Review> {
    let sample = |medicine_id: i64,
                  user: (&str, &str),
                  rating: i64,
                  title: &str,
                  text: &str,
                  effectiveness: Effectiveness,
                  side_effects: SideEffectLevel,
                  days_ago: i64| Review {
        medicine_id,
        user_id: user.0.to_string(),
        user_name: user.1.to_string(),
        rating,
        title: title.to_string(),
        text: text.to_string(),
        effectiveness: Some(effectiveness),
        side_effects: Some(side_effects),
        recommend: true,
        created_at: (now - Duration::days(days_ago)).to_rfc3339(),
        updated_at: None,
    };

    vec![
        sample(
            1,
            ("sample_user_1", "Sarah M."),
            5,
            "Very effective for headaches",
            "This medicine works great for my headaches. No side effects and fast relief.",
            Effectiveness::VeryEffective,
            SideEffectLevel::None,
            7,
        ),
        sample(
            1,
            ("sample_user_2", "John D."),
            4,
            "Good pain relief",
            "Works well for pain relief. Takes about 30 minutes to kick in.",
            Effectiveness::Effective,
            SideEffectLevel::Mild,
            3,
        ),
        sample(
            2,
            ("sample_user_3", "Emily R."),
            4,
            "Effective antibiotic",
            "Cleared up my infection quickly. Had some stomach upset but manageable.",
            Effectiveness::Effective,
            SideEffectLevel::Mild,
            5,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(rating: i64, title: &str, text: &str) -> SubmitReviewRequest {
        SubmitReviewRequest {
            rating,
            title: title.to_string(),
            text: text.to_string(),
            effectiveness: None,
            side_effects: None,
            recommend: false,
            user_name: None,
        }
    }

    fn prefs() -> Preferences {
        Preferences {
            user_id: "user_abc123def".to_string(),
            user_name: "Anonymous User".to_string(),
            disclaimer_acknowledged: false,
            shortcuts_shown: false,
        }
    }

    #[test]
    fn test_required_fields() {
        assert!(validate(&request(4, "Good", "Worked")).is_ok());
        for bad in [request(0, "Good", "Worked"), request(4, "  ", "Worked"), request(4, "Good", "")] {
            let err = validate(&bad).unwrap_err();
            assert_eq!(err.message(), "Please fill in all required fields");
        }
        assert!(validate(&request(6, "Good", "Worked")).is_err());
    }

    #[test]
    fn test_build_review_uses_current_user() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut req = request(5, " Great ", "Fast relief");
        let review = build_review(1, &req, &prefs(), now);
        assert_eq!(review.user_id, "user_abc123def");
        assert_eq!(review.user_name, "Anonymous User");
        assert_eq!(review.title, "Great");
        assert_eq!(review.updated_at.as_deref(), Some(review.created_at.as_str()));

        req.user_name = Some("Ayesha".to_string());
        assert_eq!(build_review(1, &req, &prefs(), now).user_name, "Ayesha");
    }

    #[test]
    fn test_average_and_stars() {
        let now = Utc::now();
        let reviews = sample_reviews(now);
        let first: Vec<Review> = reviews.iter().filter(|r| r.medicine_id == 1).cloned().collect();
        assert_eq!(average_rating(&first), 4.5);
        assert_eq!(average_rating(&[]), 0.0);

        assert_eq!(stars(4.5), StarBreakdown { full: 4, half: 1, empty: 0 });
        assert_eq!(stars(3.2), StarBreakdown { full: 3, half: 0, empty: 2 });
        assert_eq!(stars(0.0), StarBreakdown { full: 0, half: 0, empty: 5 });
        assert_eq!(round_one(4.333), 4.3);
    }

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(time_ago(now - Duration::seconds(30), now), "Just now");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(2), now), "2 hours ago");
        assert_eq!(time_ago(now - Duration::days(3), now), "3 days ago");
        assert_eq!(time_ago(now - Duration::days(65), now), "2 months ago");
        assert_eq!(time_ago(now - Duration::days(800), now), "2 years ago");
        assert_eq!(time_ago_str("garbage", now), "Just now");
    }

    #[test]
    fn test_summarize_marks_own_review() {
        let now = Utc::now();
        let mut reviews = sample_reviews(now);
        reviews.truncate(2);
        let summary = summarize(1, reviews, "sample_user_2", now);
        assert_eq!(summary.review_count, 2);
        assert_eq!(summary.average_rating, 4.5);
        assert!(!summary.reviews[0].is_own);
        assert!(summary.reviews[1].is_own);
        assert_eq!(summary.reviews[0].time_ago, "7 days ago");
    }
}
