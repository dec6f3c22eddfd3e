//! Timestamp and calendar-date utilities

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Today's calendar date in the server's local timezone
///
/// Sessions are logged against local calendar days, so "today" for the
/// statistics windows is the local date, not the UTC one.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
