//! Session database operations

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::exercises::exercise_exists;
use crate::models::{NewSession, Session, SessionUpdate};
use crate::{time, uuid_utils, Error, Result};

macro_rules! select_sessions {
    ($tail:literal) => {
        concat!(
            "SELECT guid, exercise_id, date, sets, reps, hold_sec, ",
            "pain_0_10, rom_deg, notes, created_at FROM sessions ",
            $tail
        )
    };
}

/// Optional filters for listing sessions; bounds are inclusive
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionFilter {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub exercise_id: Option<Uuid>,
}

/// Log a session against an existing exercise
pub async fn create_session(pool: &SqlitePool, payload: NewSession) -> Result<Session> {
    let mut tx = pool.begin().await?;

    if !exercise_exists(&mut *tx, payload.exercise_id).await? {
        debug!("Rejected session for unknown exercise {}", payload.exercise_id);
        return Err(Error::UnknownExercise(payload.exercise_id));
    }

    let session = Session {
        id: uuid_utils::generate(),
        exercise_id: payload.exercise_id,
        date: payload.date,
        sets: payload.sets,
        reps: payload.reps,
        hold_sec: payload.hold_sec,
        pain_0_10: payload.pain_0_10,
        rom_deg: payload.rom_deg,
        notes: payload.notes,
        created_at: time::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO sessions (
            guid, exercise_id, date, sets, reps, hold_sec,
            pain_0_10, rom_deg, notes, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(session.id.to_string())
    .bind(session.exercise_id.to_string())
    .bind(session.date)
    .bind(session.sets)
    .bind(session.reps)
    .bind(session.hold_sec)
    .bind(session.pain_0_10)
    .bind(session.rom_deg)
    .bind(&session.notes)
    .bind(session.created_at)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    info!(
        "Logged session {} for exercise {} on {}",
        session.id, session.exercise_id, session.date
    );
    Ok(session)
}

pub async fn get_session(pool: &SqlitePool, id: Uuid) -> Result<Session> {
    fetch_session(pool, id).await
}

async fn fetch_session<'e, E>(executor: E, id: Uuid) -> Result<Session>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(select_sessions!("WHERE guid = ?"))
        .bind(id.to_string())
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| Error::session_not_found(id))?;

    row_to_session(&row)
}

/// List sessions, newest date first, then most recently logged first
pub async fn list_sessions(pool: &SqlitePool, filter: &SessionFilter) -> Result<Vec<Session>> {
    let exercise_id = filter.exercise_id.map(|id| id.to_string());

    let rows = sqlx::query(select_sessions!(
        "WHERE (? IS NULL OR date >= ?)
           AND (? IS NULL OR date <= ?)
           AND (? IS NULL OR exercise_id = ?)
         ORDER BY date DESC, created_at DESC, rowid DESC"
    ))
    .bind(filter.from_date)
    .bind(filter.from_date)
    .bind(filter.to_date)
    .bind(filter.to_date)
    .bind(&exercise_id)
    .bind(&exercise_id)
    .fetch_all(pool)
    .await?;

    debug!("Loaded {} sessions for {:?}", rows.len(), filter);
    rows.iter().map(row_to_session).collect()
}

/// Apply a partial update and return the stored result
///
/// A missing session is reported before a missing target exercise. Absent
/// fields keep their column value via `COALESCE`.
pub async fn update_session(
    pool: &SqlitePool,
    id: Uuid,
    update: SessionUpdate,
) -> Result<Session> {
    let mut tx = pool.begin().await?;

    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM sessions WHERE guid = ?")
        .bind(id.to_string())
        .fetch_optional(&mut *tx)
        .await?;
    if found.is_none() {
        return Err(Error::session_not_found(id));
    }

    if let Some(exercise_id) = update.exercise_id {
        if !exercise_exists(&mut *tx, exercise_id).await? {
            return Err(Error::UnknownExercise(exercise_id));
        }
    }

    sqlx::query(
        r#"
        UPDATE sessions SET
            exercise_id = COALESCE(?, exercise_id),
            date = COALESCE(?, date),
            sets = COALESCE(?, sets),
            reps = COALESCE(?, reps),
            hold_sec = COALESCE(?, hold_sec),
            pain_0_10 = COALESCE(?, pain_0_10),
            rom_deg = COALESCE(?, rom_deg),
            notes = COALESCE(?, notes)
        WHERE guid = ?
        "#,
    )
    .bind(update.exercise_id.map(|id| id.to_string()))
    .bind(update.date)
    .bind(update.sets)
    .bind(update.reps)
    .bind(update.hold_sec)
    .bind(update.pain_0_10)
    .bind(update.rom_deg)
    .bind(update.notes)
    .bind(id.to_string())
    .execute(&mut *tx)
    .await?;

    let session = fetch_session(&mut *tx, id).await?;
    tx.commit().await?;

    info!("Updated session {}", id);
    Ok(session)
}

pub async fn delete_session(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM sessions WHERE guid = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::session_not_found(id));
    }
    info!("Deleted session {}", id);
    Ok(())
}

fn row_to_session(row: &SqliteRow) -> Result<Session> {
    let guid: String = row.try_get("guid")?;
    let exercise_id: String = row.try_get("exercise_id")?;

    Ok(Session {
        id: uuid_utils::parse_stored("sessions.guid", &guid)?,
        exercise_id: uuid_utils::parse_stored("sessions.exercise_id", &exercise_id)?,
        date: row.try_get("date")?,
        sets: row.try_get("sets")?,
        reps: row.try_get("reps")?,
        hold_sec: row.try_get("hold_sec")?,
        pain_0_10: row.try_get("pain_0_10")?,
        rom_deg: row.try_get("rom_deg")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
    })
}
