//! Moving average calculation implementations
//!
//! Contains implementations of the window averages used by the forecasting
//! candidates:
//! - Simple Moving Average (SMA)
//! - Weighted Moving Average (WMA), linearly increasing weights
//! - Trimmed mean (drop the highest and lowest values before averaging)

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple Moving Average (SMA) implementation
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
        })
    }

    /// Update the SMA with a new value
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);

        if self.values.len() > self.period {
            self.values.pop_front();
        }
    }

    /// Get the current SMA value
    ///
    /// The sum is recomputed over the window on every call so the result does
    /// not accumulate rounding drift over long series.
    pub fn value(&self) -> Result<f64> {
        if self.values.len() < self.period {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for SMA calculation. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        Ok(self.values.iter().sum::<f64>() / self.period as f64)
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the SMA, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
    }
}

/// Weighted Moving Average (WMA) implementation
///
/// The oldest value in the window has weight 1 and the most recent value has
/// weight `period`.
#[derive(Debug, Clone)]
pub struct WeightedMovingAverage {
    period: usize,
    values: VecDeque<f64>,
    weight_sum: f64,
}

impl WeightedMovingAverage {
    /// Create a new Weighted Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            weight_sum: (period * (period + 1) / 2) as f64,
        })
    }

    /// Update the WMA with a new value
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);

        if self.values.len() > self.period {
            self.values.pop_front();
        }
    }

    /// Get the current WMA value
    pub fn value(&self) -> Result<f64> {
        if self.values.len() < self.period {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for WMA calculation. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        let weighted: f64 = self
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| (i + 1) as f64 * v)
            .sum();

        Ok(weighted / self.weight_sum)
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the WMA, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
    }
}

/// Mean of `values` after dropping the `drop` highest and `drop` lowest.
///
/// When fewer than `2 * drop + 1` values are available nothing is dropped.
pub fn trimmed_mean(values: &[f64], drop: usize) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot average an empty window".to_string(),
        ));
    }

    if values.len() <= 2 * drop {
        return Ok(values.iter().sum::<f64>() / values.len() as f64);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let kept = &sorted[drop..sorted.len() - drop];

    Ok(kept.iter().sum::<f64>() / kept.len() as f64)
}
