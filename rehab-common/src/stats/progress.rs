//! Daily progress series for a session metric
//!
//! Produces one point per calendar day of a trailing window ending today.
//! Each point carries the mean of the metric over that day's sessions, or
//! `null` when no session on that day recorded the metric.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::{ActivitySource, DateRange};
use crate::models::Session;
use crate::{Error, Result};

/// Session measurement that can be charted over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "rom_deg")]
    RomDeg,
    #[serde(rename = "pain_0_10")]
    Pain0To10,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::RomDeg => "rom_deg",
            Metric::Pain0To10 => "pain_0_10",
        }
    }

    /// The session's value for this metric, if recorded
    pub fn value_of(&self, session: &Session) -> Option<f64> {
        match self {
            Metric::RomDeg => session.rom_deg.map(f64::from),
            Metric::Pain0To10 => session.pain_0_10.map(f64::from),
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rom_deg" => Ok(Metric::RomDeg),
            "pain_0_10" => Ok(Metric::Pain0To10),
            other => Err(Error::InvalidInput(format!(
                "Unsupported metric '{}' (expected rom_deg or pain_0_10)",
                other
            ))),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day of the series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    /// Always serialized; `null` marks a day without data
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSeries {
    pub metric: Metric,
    pub points: Vec<ProgressPoint>,
}

/// Window of `days` calendar dates ending on `today`, inclusive
pub fn progress_window(today: NaiveDate, days: u32) -> Result<DateRange> {
    let back = u64::from(days.saturating_sub(1));
    let start = today
        .checked_sub_days(Days::new(back))
        .ok_or_else(|| Error::InvalidInput(format!("{} days before {} is out of range", days, today)))?;
    Ok(DateRange::new(start, today))
}

/// Load the window's sessions from `source` and build the series
pub async fn progress_series<S: ActivitySource + Sync>(
    source: &S,
    metric: Metric,
    days: u32,
    today: NaiveDate,
) -> Result<ProgressSeries> {
    let window = progress_window(today, days)?;
    let sessions = source.list_sessions(Some(window)).await?;
    build_progress_series(metric, days, today, &sessions)
}

/// Build the series from already-loaded sessions
///
/// Sessions outside the window are ignored. `days == 0` yields no points.
pub fn build_progress_series(
    metric: Metric,
    days: u32,
    today: NaiveDate,
    sessions: &[Session],
) -> Result<ProgressSeries> {
    let points = if days == 0 {
        Vec::new()
    } else {
        let window = progress_window(today, days)?;
        DailyPoints::new(window, daily_means(metric, window, sessions)).collect()
    };

    Ok(ProgressSeries { metric, points })
}

/// Mean of the metric per date, for dates inside `window` that have a value
pub fn daily_means(metric: Metric, window: DateRange, sessions: &[Session]) -> BTreeMap<NaiveDate, f64> {
    let mut sums: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();

    for session in sessions.iter().filter(|s| window.contains(s.date)) {
        if let Some(value) = metric.value_of(session) {
            let entry = sums.entry(session.date).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(date, (sum, count))| (date, sum / f64::from(count)))
        .collect()
}

/// Dense, ascending iterator over every date of a window
///
/// Consumes its per-day means as it goes, so it can be walked only once.
#[derive(Debug)]
pub struct DailyPoints {
    next: Option<NaiveDate>,
    end: NaiveDate,
    means: BTreeMap<NaiveDate, f64>,
}

impl DailyPoints {
    pub fn new(window: DateRange, means: BTreeMap<NaiveDate, f64>) -> Self {
        Self {
            next: Some(window.start),
            end: window.end,
            means,
        }
    }
}

impl Iterator for DailyPoints {
    type Item = ProgressPoint;

    fn next(&mut self) -> Option<ProgressPoint> {
        let date = self.next.filter(|d| *d <= self.end)?;
        self.next = date.succ_opt();
        Some(ProgressPoint {
            date,
            value: self.means.remove(&date),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(d) if d <= self.end => (self.end - d).num_days() as usize + 1,
            _ => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DailyPoints {}

impl std::iter::FusedIterator for DailyPoints {}
