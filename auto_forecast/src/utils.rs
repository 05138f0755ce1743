//! Utility functions for the auto_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};

/// Timestamp parsing for loaded data
pub mod date_parser {
    use crate::error::{ForecastError, Result};
    use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

    /// Parse a timestamp written as RFC 3339, `YYYY-MM-DD HH:MM:SS`,
    /// `YYYY-MM-DD` (midnight UTC) or integer epoch seconds
    pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
        let s = raw.trim();

        if let Ok(secs) = s.parse::<i64>() {
            return Utc.timestamp_opt(secs, 0).single().ok_or_else(|| {
                ForecastError::DataError(format!("Epoch seconds out of range: {}", s))
            });
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }

        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(Utc.from_utc_datetime(&naive));
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(Utc.from_utc_datetime(&naive));
            }
        }

        Err(ForecastError::DataError(format!(
            "Unrecognized timestamp: {}",
            raw
        )))
    }
}

/// Create future timestamps for forecasting, `step` apart after `last_timestamp`
pub fn future_timestamps(
    last_timestamp: DateTime<Utc>,
    horizon: usize,
    step: Duration,
) -> Result<Vec<DateTime<Utc>>> {
    if step <= Duration::zero() {
        return Err(ForecastError::InvalidParameter(format!(
            "Timestamp step must be positive, got {}",
            step
        )));
    }

    let mut timestamps = Vec::with_capacity(horizon);
    let mut current = last_timestamp;

    for _ in 0..horizon {
        current = current.checked_add_signed(step).ok_or_else(|| {
            ForecastError::DataError("Timestamp overflow while building horizon".to_string())
        })?;
        timestamps.push(current);
    }

    Ok(timestamps)
}

/// Median spacing between consecutive timestamps
pub fn median_spacing(timestamps: &[DateTime<Utc>]) -> Option<Duration> {
    let mut gaps: Vec<Duration> = timestamps.windows(2).map(|w| w[1] - w[0]).collect();
    if gaps.is_empty() {
        return None;
    }

    gaps.sort();
    Some(gaps[gaps.len() / 2])
}
