//! Exponential smoothing recurrences
//!
//! Contains streaming implementations of:
//! - Simple Exponential Smoothing (level only)
//! - Double Exponential Smoothing (Holt's method, level and trend)
//! - Triple Exponential Smoothing (additive Holt-Winters, level, trend and season)

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

fn check_coefficient(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(MathError::InvalidInput(format!(
            "{} must be between 0 and 1 (exclusive), got {}",
            name, value
        )));
    }
    Ok(())
}

/// Exponential Smoothing implementation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExponentialSmoothing {
    alpha: f64,
    level: Option<f64>,
}

impl ExponentialSmoothing {
    /// Create a new Exponential Smoothing with the specified alpha (smoothing factor)
    pub fn new(alpha: f64) -> Result<Self> {
        check_coefficient("Alpha", alpha)?;

        Ok(Self { alpha, level: None })
    }

    /// Update the Exponential Smoothing with a new value
    pub fn update(&mut self, value: f64) {
        self.level = Some(match self.level {
            None => value,
            Some(level) => self.alpha * value + (1.0 - self.alpha) * level,
        });
    }

    /// Get the current smoothed value
    pub fn value(&self) -> Result<f64> {
        self.level.ok_or_else(|| {
            MathError::InsufficientData("No data available for exponential smoothing".to_string())
        })
    }

    /// Forecast the next value (in simple exponential smoothing, the forecast equals the last level)
    pub fn forecast(&self) -> Result<f64> {
        self.value()
    }

    /// Get the current alpha value
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Reset the Exponential Smoothing, clearing all values
    pub fn reset(&mut self) {
        self.level = None;
    }
}

/// Double Exponential Smoothing (Holt's Method) implementation
///
/// The first value seeds the level, the second seeds the trend as the first
/// difference; the smoothing recurrences apply from the third value on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoubleExponentialSmoothing {
    alpha: f64,
    beta: f64,
    level: Option<f64>,
    trend: Option<f64>,
}

impl DoubleExponentialSmoothing {
    /// Create a new Double Exponential Smoothing with the specified parameters
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        check_coefficient("Alpha", alpha)?;
        check_coefficient("Beta", beta)?;

        Ok(Self {
            alpha,
            beta,
            level: None,
            trend: None,
        })
    }

    /// Update the Double Exponential Smoothing with a new value
    pub fn update(&mut self, value: f64) {
        match (self.level, self.trend) {
            (None, _) => {
                self.level = Some(value);
            }
            (Some(level), None) => {
                self.trend = Some(value - level);
                self.level = Some(value);
            }
            (Some(prev_level), Some(prev_trend)) => {
                let new_level = self.alpha * value + (1.0 - self.alpha) * (prev_level + prev_trend);
                let new_trend =
                    self.beta * (new_level - prev_level) + (1.0 - self.beta) * prev_trend;

                self.level = Some(new_level);
                self.trend = Some(new_trend);
            }
        }
    }

    /// Forecast h steps ahead
    pub fn forecast(&self, h: usize) -> Result<f64> {
        match (self.level, self.trend) {
            (Some(level), Some(trend)) => Ok(level + (h as f64) * trend),
            _ => Err(MathError::InsufficientData(
                "Not enough data to make a forecast".to_string(),
            )),
        }
    }

    /// Get the current level
    pub fn level(&self) -> Result<f64> {
        self.level
            .ok_or_else(|| MathError::InsufficientData("Level not calculated yet".to_string()))
    }

    /// Get the current trend
    pub fn trend(&self) -> Result<f64> {
        self.trend
            .ok_or_else(|| MathError::InsufficientData("Trend not calculated yet".to_string()))
    }

    /// Reset the Double Exponential Smoothing, clearing all values
    pub fn reset(&mut self) {
        self.level = None;
        self.trend = None;
    }
}

/// Additive Holt-Winters (Triple Exponential Smoothing) implementation
///
/// Seeded from the first two seasons by [`HoltWinters::initialize`]; the
/// resulting state describes the end of the FIRST season, so updates continue
/// with the value at index `period`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoltWinters {
    alpha: f64,
    beta: f64,
    gamma: f64,
    period: usize,
    level: Option<f64>,
    trend: f64,
    /// Seasonal offsets, front is the offset for the next observation
    seasonals: VecDeque<f64>,
}

impl HoltWinters {
    /// Create a new additive Holt-Winters smoother
    pub fn new(alpha: f64, beta: f64, gamma: f64, period: usize) -> Result<Self> {
        check_coefficient("Alpha", alpha)?;
        check_coefficient("Beta", beta)?;
        check_coefficient("Gamma", gamma)?;
        if period < 2 {
            return Err(MathError::InvalidInput(
                "Seasonal period must be at least 2".to_string(),
            ));
        }

        Ok(Self {
            alpha,
            beta,
            gamma,
            period,
            level: None,
            trend: 0.0,
            seasonals: VecDeque::with_capacity(period),
        })
    }

    /// Seed level, trend and seasonal offsets from the first two seasons
    pub fn initialize(&mut self, values: &[f64]) -> Result<()> {
        let p = self.period;
        if values.len() < 2 * p {
            return Err(MathError::InsufficientData(format!(
                "Holt-Winters needs two full seasons ({} values), have {}",
                2 * p,
                values.len()
            )));
        }

        let first_mean = values[..p].iter().sum::<f64>() / p as f64;
        let second_mean = values[p..2 * p].iter().sum::<f64>() / p as f64;

        self.level = Some(first_mean);
        self.trend = (second_mean - first_mean) / p as f64;
        self.seasonals = values[..p].iter().map(|v| v - first_mean).collect();

        Ok(())
    }

    /// Update the smoother with the next observation
    pub fn update(&mut self, value: f64) -> Result<()> {
        let level = self.level.ok_or_else(|| {
            MathError::CalculationError("Holt-Winters used before initialization".to_string())
        })?;
        let seasonal = self.seasonals.pop_front().unwrap_or(0.0);

        let new_level = self.alpha * (value - seasonal) + (1.0 - self.alpha) * (level + self.trend);
        let new_trend = self.beta * (new_level - level) + (1.0 - self.beta) * self.trend;
        let new_seasonal = self.gamma * (value - new_level) + (1.0 - self.gamma) * seasonal;

        self.level = Some(new_level);
        self.trend = new_trend;
        self.seasonals.push_back(new_seasonal);

        Ok(())
    }

    /// Forecast h steps ahead (h >= 1)
    pub fn forecast(&self, h: usize) -> Result<f64> {
        let level = self.level.ok_or_else(|| {
            MathError::InsufficientData("Not enough data to make a forecast".to_string())
        })?;
        if h == 0 {
            return Err(MathError::InvalidInput(
                "Forecast horizon must be at least 1".to_string(),
            ));
        }

        let seasonal = self
            .seasonals
            .get((h - 1) % self.period)
            .copied()
            .unwrap_or(0.0);

        Ok(level + h as f64 * self.trend + seasonal)
    }

    /// Get the seasonal period
    pub fn period(&self) -> usize {
        self.period
    }
}
