//! Time series data handling for forecasting

use crate::error::{ForecastError, Result};
use crate::utils::{date_parser, future_timestamps, median_spacing};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A single observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Observation time
    pub timestamp: DateTime<Utc>,
    /// Observed (or forecast) value
    pub value: f64,
}

impl DataPoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Chronologically ordered sequence of observations
///
/// Timestamps are strictly increasing. Points after the end of a model's
/// trained history form the forecast horizon that `predict` fills in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataSequence {
    points: Vec<DataPoint>,
}

impl DataSequence {
    /// Create a sequence, rejecting out-of-order or duplicate timestamps
    pub fn new(points: Vec<DataPoint>) -> Result<Self> {
        if let Some(i) = points
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(ForecastError::DataError(format!(
                "Timestamps must be strictly increasing: {} is not after {}",
                points[i + 1].timestamp,
                points[i].timestamp
            )));
        }

        Ok(Self { points })
    }

    /// Create an evenly spaced sequence starting at `start`
    pub fn from_values(start: DateTime<Utc>, step: Duration, values: &[f64]) -> Result<Self> {
        if step <= Duration::zero() {
            return Err(ForecastError::InvalidParameter(format!(
                "Sequence step must be positive, got {}",
                step
            )));
        }

        let mut points = Vec::with_capacity(values.len());
        let mut timestamp = start;
        for (i, &value) in values.iter().enumerate() {
            if i > 0 {
                timestamp = timestamp.checked_add_signed(step).ok_or_else(|| {
                    ForecastError::DataError("Timestamp overflow while building sequence".to_string())
                })?;
            }
            points.push(DataPoint::new(timestamp, value));
        }

        Ok(Self { points })
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in time order
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Observed values in time order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Timestamps in time order
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Timestamp of the first point
    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.first().map(|p| p.timestamp)
    }

    /// Timestamp of the last point
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|p| p.timestamp)
    }

    /// Median spacing between consecutive points
    pub fn interval(&self) -> Option<Duration> {
        median_spacing(&self.timestamps())
    }

    /// Build `steps` future points after this sequence, spaced by [`interval`](Self::interval).
    /// Their values are NaN until a model predicts them.
    pub fn horizon(&self, steps: usize) -> Result<DataSequence> {
        let last = self
            .last_timestamp()
            .ok_or_else(|| ForecastError::DataError("Empty time series data".to_string()))?;
        let step = self.interval().ok_or_else(|| {
            ForecastError::DataError(
                "Need at least two points to infer the sampling interval".to_string(),
            )
        })?;

        let points = future_timestamps(last, steps, step)?
            .into_iter()
            .map(|t| DataPoint::new(t, f64::NAN))
            .collect();

        Ok(Self { points })
    }

    /// Get a slice of the data from start to end index
    pub fn slice(&self, start: usize, end: Option<usize>) -> Result<Self> {
        let end = end.unwrap_or(self.points.len());
        if start > end || end > self.points.len() {
            return Err(ForecastError::DataError(format!(
                "Invalid slice {}..{} of a sequence with {} points",
                start,
                end,
                self.points.len()
            )));
        }

        Ok(Self {
            points: self.points[start..end].to_vec(),
        })
    }

    /// Mutable values of the points strictly after `after`, in time order
    pub fn values_after_mut(&mut self, after: DateTime<Utc>) -> impl Iterator<Item = &mut f64> {
        let start = self.points.partition_point(|p| p.timestamp <= after);
        self.points[start..].iter_mut().map(|p| &mut p.value)
    }
}

/// Data loader for time series data
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a sequence from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<DataSequence> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a sequence from any CSV source with a header row
    ///
    /// Rows must already be in time order.
    pub fn from_reader<R: Read>(reader: R) -> Result<DataSequence> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.to_lowercase())
            .collect();

        let time_idx = Self::detect_time_column(&headers);
        let value_idx = Self::detect_value_column(&headers, time_idx)?;

        let mut points = Vec::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let line = row + 2;

            let raw_time = record.get(time_idx).ok_or_else(|| {
                ForecastError::DataError(format!("Line {}: missing time column", line))
            })?;
            let raw_value = record.get(value_idx).ok_or_else(|| {
                ForecastError::DataError(format!("Line {}: missing value column", line))
            })?;

            let timestamp = date_parser::parse_timestamp(raw_time)?;
            let value = raw_value.parse::<f64>().map_err(|e| {
                ForecastError::DataError(format!("Line {}: invalid value {:?}: {}", line, raw_value, e))
            })?;

            points.push(DataPoint::new(timestamp, value));
        }

        if points.is_empty() {
            return Err(ForecastError::DataError("No rows found in data".to_string()));
        }

        DataSequence::new(points)
    }

    /// Detect the time column by name, defaulting to the first column
    fn detect_time_column(headers: &[String]) -> usize {
        headers
            .iter()
            .position(|h| h.contains("time") || h.contains("date"))
            .unwrap_or(0)
    }

    /// Detect the value column by name, defaulting to the first non-time column
    fn detect_value_column(headers: &[String], time_idx: usize) -> Result<usize> {
        let by_name = ["value", "close", "price"].iter().find_map(|wanted| {
            headers
                .iter()
                .enumerate()
                .position(|(i, h)| i != time_idx && h.contains(*wanted))
        });

        by_name
            .or_else(|| (0..headers.len()).find(|&i| i != time_idx))
            .ok_or_else(|| ForecastError::DataError("No value column found in data".to_string()))
    }
}
