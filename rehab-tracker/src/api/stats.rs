//! Statistics endpoints: weekly adherence and progress series

use axum::{extract::State, routing::get, Json, Router};
use chrono::NaiveDate;
use rehab_common::stats::{self, Metric, ProgressSeries, WeeklyAdherence};
use serde::Deserialize;

use crate::extract::ApiQuery;
use crate::{ApiError, ApiResult, AppState};

pub const DEFAULT_PROGRESS_DAYS: u32 = 30;
pub const MAX_PROGRESS_DAYS: u32 = 120;

#[derive(Debug, Deserialize)]
pub struct AdherenceQuery {
    /// Any date in the week of interest; defaults to today
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    pub metric: Option<String>,
    pub days: Option<u32>,
}

/// GET /stats/adherence?date=YYYY-MM-DD
pub async fn get_adherence(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AdherenceQuery>,
) -> ApiResult<Json<WeeklyAdherence>> {
    let reference = query.date.unwrap_or_else(state.today);
    Ok(Json(stats::weekly_adherence(&state.db, reference).await?))
}

/// GET /stats/progress?metric=rom_deg|pain_0_10&days=1..=120
pub async fn get_progress(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProgressQuery>,
) -> ApiResult<Json<ProgressSeries>> {
    let (metric, days) = validate_progress_query(&query)?;
    let today = (state.today)();
    Ok(Json(stats::progress_series(&state.db, metric, days, today).await?))
}

/// Parse the metric and check the day window bounds
fn validate_progress_query(query: &ProgressQuery) -> ApiResult<(Metric, u32)> {
    let metric = query
        .metric
        .as_deref()
        .ok_or_else(|| ApiError::Validation("metric is required".to_string()))?
        .parse::<Metric>()?;

    let days = query.days.unwrap_or(DEFAULT_PROGRESS_DAYS);
    if !(1..=MAX_PROGRESS_DAYS).contains(&days) {
        return Err(ApiError::Validation(format!(
            "days must be 1..={} (got {})",
            MAX_PROGRESS_DAYS, days
        )));
    }

    Ok((metric, days))
}

pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/stats/adherence", get(get_adherence))
        .route("/stats/progress", get(get_progress))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(metric: Option<&str>, days: Option<u32>) -> ProgressQuery {
        ProgressQuery {
            metric: metric.map(str::to_string),
            days,
        }
    }

    #[test]
    fn test_defaults_to_thirty_days() {
        let (metric, days) = validate_progress_query(&query(Some("rom_deg"), None)).unwrap();
        assert_eq!(metric, Metric::RomDeg);
        assert_eq!(days, DEFAULT_PROGRESS_DAYS);
    }

    #[test]
    fn test_day_bounds() {
        assert!(validate_progress_query(&query(Some("pain_0_10"), Some(1))).is_ok());
        assert!(validate_progress_query(&query(Some("pain_0_10"), Some(120))).is_ok());
        assert!(validate_progress_query(&query(Some("pain_0_10"), Some(0))).is_err());
        assert!(validate_progress_query(&query(Some("pain_0_10"), Some(121))).is_err());
    }

    #[test]
    fn test_metric_required_and_known() {
        assert!(matches!(
            validate_progress_query(&query(None, Some(7))),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            validate_progress_query(&query(Some("sets"), Some(7))),
            Err(ApiError::Common(rehab_common::Error::InvalidInput(_)))
        ));
    }
}
