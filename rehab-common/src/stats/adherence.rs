//! Weekly schedule adherence
//!
//! Scheduled occurrences are counted per exercise per day of the Monday–Sunday
//! week. Completed counts every session logged in that week, whether or not
//! it lands on a scheduled day for its exercise.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::debug;

use super::weekday::{sunday0_of, week_bounds};
use super::{ActivitySource, DateRange};
use crate::models::{Exercise, Session};
use crate::Result;

/// Adherence summary for one Monday–Sunday week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyAdherence {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub scheduled_count: u32,
    pub completed_count: u32,
    pub adherence_pct: f64,
}

/// Load exercises and the week's sessions from `source` and compute adherence
/// for the week containing `reference_date`
pub async fn weekly_adherence<S: ActivitySource + Sync>(
    source: &S,
    reference_date: NaiveDate,
) -> Result<WeeklyAdherence> {
    let (monday, sunday) = week_bounds(reference_date);
    let exercises = source.list_exercises().await?;
    let sessions = source
        .list_sessions(Some(DateRange::new(monday, sunday)))
        .await?;

    let adherence = compute_weekly_adherence(&exercises, &sessions, reference_date);
    debug!(
        "Adherence for week of {}: {}/{} = {}%",
        adherence.week_start,
        adherence.completed_count,
        adherence.scheduled_count,
        adherence.adherence_pct
    );
    Ok(adherence)
}

/// Compute adherence from already-loaded data
///
/// Sessions outside the week are ignored, so callers may pass an unfiltered
/// list.
pub fn compute_weekly_adherence(
    exercises: &[Exercise],
    sessions: &[Session],
    reference_date: NaiveDate,
) -> WeeklyAdherence {
    let (monday, sunday) = week_bounds(reference_date);
    let week = DateRange::new(monday, sunday);

    let scheduled_count: u32 = exercises
        .iter()
        .map(|exercise| scheduled_occurrences(exercise, monday))
        .sum();

    let completed_count = sessions
        .iter()
        .filter(|session| week.contains(session.date))
        .count() as u32;

    WeeklyAdherence {
        week_start: monday,
        week_end: sunday,
        scheduled_count,
        completed_count,
        adherence_pct: adherence_pct(completed_count, scheduled_count),
    }
}

/// Number of days in the week starting `monday` on which `exercise` is scheduled
fn scheduled_occurrences(exercise: &Exercise, monday: NaiveDate) -> u32 {
    (0..7)
        .map(|offset| monday + Duration::days(offset))
        .filter(|day| exercise.schedule_dow.contains(sunday0_of(*day)))
        .count() as u32
}

/// Percentage rounded to two decimals; 0.0 when nothing was scheduled
pub fn adherence_pct(completed: u32, scheduled: u32) -> f64 {
    if scheduled == 0 {
        return 0.0;
    }
    let pct = 100.0 * f64::from(completed) / f64::from(scheduled);
    (pct * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Schedule, Side};
    use chrono::Utc;
    use uuid::Uuid;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn exercise(days: &[u8]) -> Exercise {
        Exercise {
            id: Uuid::new_v4(),
            name: "Straight Leg Raise".to_string(),
            side: Side::Right,
            category: Category::Strength,
            target_sets: None,
            target_reps: None,
            target_hold_sec: None,
            schedule_dow: Schedule::new(days.iter().copied()).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn session(exercise_id: Uuid, day: &str) -> Session {
        Session {
            id: Uuid::new_v4(),
            exercise_id,
            date: date(day),
            sets: None,
            reps: None,
            hold_sec: None,
            pain_0_10: None,
            rom_deg: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_monday_wednesday_one_session_is_half() {
        // Week of Monday 2024-05-06; schedule Mon(1) and Wed(3)
        let ex = exercise(&[1, 3]);
        let sessions = vec![session(ex.id, "2024-05-06")];

        let result = compute_weekly_adherence(&[ex], &sessions, date("2024-05-08"));
        assert_eq!(result.week_start, date("2024-05-06"));
        assert_eq!(result.week_end, date("2024-05-12"));
        assert_eq!(result.scheduled_count, 2);
        assert_eq!(result.completed_count, 1);
        assert_eq!(result.adherence_pct, 50.0);
    }

    #[test]
    fn test_occurrences_not_exercises() {
        let exercises = vec![exercise(&[0, 1, 2, 3, 4, 5, 6]), exercise(&[2, 4, 6])];
        let result = compute_weekly_adherence(&exercises, &[], date("2024-05-06"));
        assert_eq!(result.scheduled_count, 10);
        assert_eq!(result.adherence_pct, 0.0);
    }

    #[test]
    fn test_empty_schedule_contributes_nothing() {
        let ex = exercise(&[]);
        let sessions = vec![session(ex.id, "2024-05-07"), session(ex.id, "2024-05-09")];

        let result = compute_weekly_adherence(&[ex], &sessions, date("2024-05-07"));
        assert_eq!(result.scheduled_count, 0);
        assert_eq!(result.completed_count, 2);
        assert_eq!(result.adherence_pct, 0.0);
    }

    #[test]
    fn test_sunday_schedule_counts_week_end() {
        // Sunday (0) falls at the end of the Monday-first window
        let ex = exercise(&[0]);
        let sessions = vec![session(ex.id, "2024-05-12")];

        let result = compute_weekly_adherence(&[ex], &sessions, date("2024-05-12"));
        assert_eq!(result.week_start, date("2024-05-06"));
        assert_eq!(result.scheduled_count, 1);
        assert_eq!(result.completed_count, 1);
        assert_eq!(result.adherence_pct, 100.0);
    }

    #[test]
    fn test_sessions_outside_week_ignored_and_unscheduled_days_count() {
        let ex = exercise(&[1]);
        let sessions = vec![
            session(ex.id, "2024-05-05"), // previous Sunday
            session(ex.id, "2024-05-13"), // next Monday
            session(ex.id, "2024-05-10"), // Friday, not scheduled, still counts
        ];

        let result = compute_weekly_adherence(&[ex], &sessions, date("2024-05-06"));
        assert_eq!(result.completed_count, 1);
        assert_eq!(result.adherence_pct, 100.0);
    }

    #[test]
    fn test_over_completion_exceeds_hundred() {
        let ex = exercise(&[1]);
        let sessions: Vec<Session> = ["2024-05-06", "2024-05-07", "2024-05-08"]
            .iter()
            .map(|d| session(ex.id, d))
            .collect();

        let result = compute_weekly_adherence(&[ex], &sessions, date("2024-05-06"));
        assert_eq!(result.adherence_pct, 300.0);
    }

    #[test]
    fn test_adherence_pct_rounding() {
        assert_eq!(adherence_pct(1, 3), 33.33);
        assert_eq!(adherence_pct(2, 3), 66.67);
        assert_eq!(adherence_pct(5, 0), 0.0);
    }
}
