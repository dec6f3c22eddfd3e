//! Database access: schema initialization and entity repositories

pub mod exercises;
pub mod init;
pub mod sessions;

pub use init::{create_schema, init_database, init_memory_database};
pub use sessions::SessionFilter;

use sqlx::SqlitePool;

use crate::models::{Exercise, Session};
use crate::stats::{ActivitySource, DateRange};
use crate::Result;

impl ActivitySource for SqlitePool {
    async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        exercises::list_exercises(self).await
    }

    async fn list_sessions(&self, range: Option<DateRange>) -> Result<Vec<Session>> {
        let filter = SessionFilter {
            from_date: range.map(|r| r.start),
            to_date: range.map(|r| r.end),
            exercise_id: None,
        };
        sessions::list_sessions(self, &filter).await
    }
}
