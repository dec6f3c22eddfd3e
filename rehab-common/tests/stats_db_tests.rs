//! Statistics computed against the SQLite store
//!
//! Exercises the full path: repositories write rows, the pool acts as the
//! activity source, and the calculators read them back.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rehab_common::db::{exercises, init_memory_database, sessions};
use rehab_common::models::{Category, NewExercise, NewSession, Schedule, Side};
use rehab_common::stats::{progress_series, weekly_adherence, Metric};
use sqlx::SqlitePool;
use uuid::Uuid;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

async fn add_exercise(pool: &SqlitePool, name: &str, days: &[u8]) -> Uuid {
    exercises::create_exercise(
        pool,
        NewExercise {
            name: name.to_string(),
            side: Side::Left,
            category: Category::Mobility,
            target_sets: Some(3),
            target_reps: Some(12),
            target_hold_sec: Some(2),
            schedule_dow: Schedule::new(days.iter().copied()).unwrap(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn log(pool: &SqlitePool, exercise_id: Uuid, day: NaiveDate, pain: Option<u8>, rom: Option<u16>) {
    sessions::create_session(
        pool,
        NewSession {
            exercise_id,
            date: day,
            sets: None,
            reps: None,
            hold_sec: None,
            pain_0_10: pain,
            rom_deg: rom,
            notes: None,
        },
    )
    .await
    .expect("exercise exists");
}

#[tokio::test]
async fn test_monday_wednesday_schedule_half_done() {
    let pool = init_memory_database().await.unwrap();
    let heel_slides = add_exercise(&pool, "Heel Slides", &[1, 3]).await;
    log(&pool, heel_slides, date("2024-05-06"), None, None).await;

    let result = weekly_adherence(&pool, date("2024-05-09")).await.unwrap();
    assert_eq!(result.week_start, date("2024-05-06"));
    assert_eq!(result.week_start.weekday(), Weekday::Mon);
    assert_eq!(result.week_end, date("2024-05-12"));
    assert_eq!(result.scheduled_count, 2);
    assert_eq!(result.completed_count, 1);
    assert_eq!(result.adherence_pct, 50.0);
}

#[tokio::test]
async fn test_pain_series_with_gap() {
    let pool = init_memory_database().await.unwrap();
    let today = date("2024-05-10");
    let quad_set = add_exercise(&pool, "Quad Set", &[]).await;
    log(&pool, quad_set, today, Some(4), None).await;
    log(&pool, quad_set, today - Duration::days(2), Some(6), None).await;

    let series = progress_series(&pool, Metric::Pain0To10, 3, today).await.unwrap();
    let json = serde_json::to_value(&series).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "metric": "pain_0_10",
            "points": [
                {"date": "2024-05-08", "value": 6.0},
                {"date": "2024-05-09", "value": null},
                {"date": "2024-05-10", "value": 4.0},
            ]
        })
    );
}

#[tokio::test]
async fn test_rom_average_across_exercises() {
    let pool = init_memory_database().await.unwrap();
    let today = date("2024-05-10");
    let a = add_exercise(&pool, "Heel Slides", &[]).await;
    let b = add_exercise(&pool, "Wall Slides", &[]).await;
    log(&pool, a, today, None, Some(100)).await;
    log(&pool, b, today, None, Some(120)).await;

    let series = progress_series(&pool, Metric::RomDeg, 7, today).await.unwrap();
    assert_eq!(series.points.len(), 7);
    assert_eq!(series.points[6].value, Some(110.0));
}

#[tokio::test]
async fn test_deleting_exercise_updates_stats() {
    let pool = init_memory_database().await.unwrap();
    let today = date("2024-05-08");
    let keep = add_exercise(&pool, "Step Ups", &[3]).await;
    let remove = add_exercise(&pool, "Mini Squats", &[1, 3]).await;
    log(&pool, keep, today, Some(2), Some(90)).await;
    log(&pool, remove, today, Some(8), Some(60)).await;
    log(&pool, remove, date("2024-05-06"), Some(7), None).await;

    let before = weekly_adherence(&pool, today).await.unwrap();
    assert_eq!(before.scheduled_count, 3);
    assert_eq!(before.completed_count, 3);

    exercises::delete_exercise(&pool, remove).await.unwrap();

    let after = weekly_adherence(&pool, today).await.unwrap();
    assert_eq!(after.scheduled_count, 1);
    assert_eq!(after.completed_count, 1);
    assert_eq!(after.adherence_pct, 100.0);

    let pain = progress_series(&pool, Metric::Pain0To10, 1, today).await.unwrap();
    assert_eq!(pain.points[0].value, Some(2.0));
}
