//! Exercise database operations

use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{Exercise, ExerciseUpdate, NewExercise, Schedule};
use crate::{time, uuid_utils, Error, Result};

macro_rules! select_exercises {
    ($tail:literal) => {
        concat!(
            "SELECT guid, name, side, category, target_sets, target_reps, ",
            "target_hold_sec, schedule_dow, created_at FROM exercises ",
            $tail
        )
    };
}

/// Insert a new exercise (payload must already be validated)
pub async fn create_exercise(pool: &SqlitePool, payload: NewExercise) -> Result<Exercise> {
    let exercise = Exercise {
        id: uuid_utils::generate(),
        name: payload.name,
        side: payload.side,
        category: payload.category,
        target_sets: payload.target_sets,
        target_reps: payload.target_reps,
        target_hold_sec: payload.target_hold_sec,
        schedule_dow: payload.schedule_dow,
        created_at: time::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO exercises (
            guid, name, side, category, target_sets, target_reps,
            target_hold_sec, schedule_dow, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(exercise.id.to_string())
    .bind(&exercise.name)
    .bind(exercise.side.as_str())
    .bind(exercise.category.as_str())
    .bind(exercise.target_sets)
    .bind(exercise.target_reps)
    .bind(exercise.target_hold_sec)
    .bind(exercise.schedule_dow.to_json())
    .bind(exercise.created_at)
    .execute(pool)
    .await?;

    info!("Created exercise {} ({})", exercise.id, exercise.name);
    Ok(exercise)
}

/// List all exercises in creation order
pub async fn list_exercises(pool: &SqlitePool) -> Result<Vec<Exercise>> {
    let rows = sqlx::query(select_exercises!("ORDER BY created_at ASC, rowid ASC"))
        .fetch_all(pool)
        .await?;

    debug!("Loaded {} exercises", rows.len());
    rows.iter().map(row_to_exercise).collect()
}

pub async fn get_exercise(pool: &SqlitePool, id: Uuid) -> Result<Exercise> {
    fetch_exercise(pool, id).await
}

async fn fetch_exercise<'e, E>(executor: E, id: Uuid) -> Result<Exercise>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(select_exercises!("WHERE guid = ?"))
        .bind(id.to_string())
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| Error::exercise_not_found(id))?;

    row_to_exercise(&row)
}

/// Works on the pool or inside a transaction
pub async fn exercise_exists<'e, E>(executor: E, id: Uuid) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM exercises WHERE guid = ?")
        .bind(id.to_string())
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

/// Apply a partial update and return the stored result
///
/// Absent fields keep their column value via `COALESCE`, so concurrent
/// updates to different fields do not overwrite each other.
pub async fn update_exercise(
    pool: &SqlitePool,
    id: Uuid,
    update: ExerciseUpdate,
) -> Result<Exercise> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE exercises SET
            name = COALESCE(?, name),
            side = COALESCE(?, side),
            category = COALESCE(?, category),
            target_sets = COALESCE(?, target_sets),
            target_reps = COALESCE(?, target_reps),
            target_hold_sec = COALESCE(?, target_hold_sec),
            schedule_dow = COALESCE(?, schedule_dow)
        WHERE guid = ?
        "#,
    )
    .bind(update.name)
    .bind(update.side.map(|s| s.as_str()))
    .bind(update.category.map(|c| c.as_str()))
    .bind(update.target_sets)
    .bind(update.target_reps)
    .bind(update.target_hold_sec)
    .bind(update.schedule_dow.map(|s| s.to_json()))
    .bind(id.to_string())
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::exercise_not_found(id));
    }

    let exercise = fetch_exercise(&mut *tx, id).await?;
    tx.commit().await?;

    info!("Updated exercise {}", id);
    Ok(exercise)
}

/// Delete an exercise and, by cascade, all of its sessions
pub async fn delete_exercise(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM exercises WHERE guid = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::exercise_not_found(id));
    }
    info!("Deleted exercise {} and its sessions", id);
    Ok(())
}

fn row_to_exercise(row: &SqliteRow) -> Result<Exercise> {
    let guid: String = row.try_get("guid")?;
    let side: String = row.try_get("side")?;
    let category: String = row.try_get("category")?;
    let schedule: String = row.try_get("schedule_dow")?;

    Ok(Exercise {
        id: uuid_utils::parse_stored("exercises.guid", &guid)?,
        name: row.try_get("name")?,
        side: side
            .parse()
            .map_err(|e| Error::corrupt("exercises.side", &side, e))?,
        category: category
            .parse()
            .map_err(|e| Error::corrupt("exercises.category", &category, e))?,
        target_sets: row.try_get("target_sets")?,
        target_reps: row.try_get("target_reps")?,
        target_hold_sec: row.try_get("target_hold_sec")?,
        schedule_dow: Schedule::from_json(&schedule)?,
        created_at: row.try_get("created_at")?,
    })
}
