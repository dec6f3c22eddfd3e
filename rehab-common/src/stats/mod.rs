//! Adherence and progress statistics
//!
//! The calculators are pure functions over exercises and sessions. Data is
//! pulled through the read-only [`ActivitySource`] interface so the same code
//! runs against SQLite in production and an in-memory source in tests.

pub mod adherence;
pub mod progress;
pub mod weekday;

pub use adherence::{compute_weekly_adherence, weekly_adherence, WeeklyAdherence};
pub use progress::{
    build_progress_series, progress_series, DailyPoints, Metric, ProgressPoint, ProgressSeries,
};
pub use weekday::{sunday0_of, to_sunday0, week_bounds};

use chrono::NaiveDate;
use std::future::Future;

use crate::models::{Exercise, Session};
use crate::Result;

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Read-only view of the exercise/session store
pub trait ActivitySource {
    /// Every exercise (full scan)
    fn list_exercises(&self) -> impl Future<Output = Result<Vec<Exercise>>> + Send;

    /// Sessions dated within `range`, or all sessions when `None`
    fn list_sessions(
        &self,
        range: Option<DateRange>,
    ) -> impl Future<Output = Result<Vec<Session>>> + Send;
}

/// In-memory activity source
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub exercises: Vec<Exercise>,
    pub sessions: Vec<Session>,
}

impl MemorySource {
    pub fn new(exercises: Vec<Exercise>, sessions: Vec<Session>) -> Self {
        Self {
            exercises,
            sessions,
        }
    }
}

impl ActivitySource for MemorySource {
    async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        Ok(self.exercises.clone())
    }

    async fn list_sessions(&self, range: Option<DateRange>) -> Result<Vec<Session>> {
        Ok(self
            .sessions
            .iter()
            .filter(|s| range.map_or(true, |r| r.contains(s.date)))
            .cloned()
            .collect())
    }
}
