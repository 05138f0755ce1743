//! Configuration for model selection and for every candidate algorithm

use crate::error::{ForecastError, Result};
use crate::metrics::SelectionMetric;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Largest polynomial degree accepted; higher degrees make the normal equations unusable
pub const MAX_POLYNOMIAL_DEGREE: usize = 8;

/// Top-level configuration: how to select, and how to build each candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoForecastConfig {
    pub selection: SelectionConfig,
    pub models: ModelConfig,
}

impl AutoForecastConfig {
    /// Parse a configuration from JSON text; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check every option before any candidate is built
    pub fn validate(&self) -> Result<()> {
        self.selection.validate()?;
        self.models.validate()
    }
}

/// How candidates are trained and compared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Metric deciding which candidate fits better
    pub metric: SelectionMetric,
    /// Train candidates on the rayon pool
    pub parallel: bool,
    /// Per-candidate training budget in milliseconds
    pub timeout_ms: Option<u64>,
    /// Log the winner's tab-separated metrics line
    pub debug: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            metric: SelectionMetric::default(),
            parallel: true,
            timeout_ms: None,
            debug: false,
        }
    }
}

impl SelectionConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<()> {
        if let SelectionMetric::Weighted(weights) = &self.metric {
            weights.validate()?;
        }
        if self.timeout_ms == Some(0) {
            return Err(ForecastError::InvalidParameter(
                "timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Options of the windowed-average (Olympic) candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OlympicConfig {
    /// Observations per cycle; the value one cycle back is `window` points earlier
    pub window: usize,
    /// Number of past cycles averaged
    pub cycles: usize,
    /// Highest and lowest values dropped from each average
    pub drop: usize,
}

impl Default for OlympicConfig {
    fn default() -> Self {
        Self {
            window: 7,
            cycles: 4,
            drop: 0,
        }
    }
}

/// Window length of a moving-average candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub window: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { window: 3 }
    }
}

/// Degree of the polynomial regression candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolynomialConfig {
    pub degree: usize,
}

impl Default for PolynomialConfig {
    fn default() -> Self {
        Self { degree: 3 }
    }
}

/// Level smoothing coefficient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub alpha: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self { alpha: 0.3 }
    }
}

/// Level and trend smoothing coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendSmoothingConfig {
    pub alpha: f64,
    pub beta: f64,
}

impl Default for TrendSmoothingConfig {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            beta: 0.1,
        }
    }
}

/// Level, trend and seasonal smoothing coefficients plus the season length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalSmoothingConfig {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub period: usize,
}

impl Default for SeasonalSmoothingConfig {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            beta: 0.1,
            gamma: 0.1,
            period: 7,
        }
    }
}

/// Options bundle handed, unchanged, to every candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub olympic: OlympicConfig,
    pub moving_average: WindowConfig,
    pub weighted_moving_average: WindowConfig,
    pub polynomial_regression: PolynomialConfig,
    pub simple_exponential: SmoothingConfig,
    pub double_exponential: TrendSmoothingConfig,
    pub triple_exponential: SeasonalSmoothingConfig,
}

fn check_window(name: &str, window: usize) -> Result<()> {
    if window == 0 {
        return Err(ForecastError::InvalidParameter(format!(
            "{} must be positive",
            name
        )));
    }
    Ok(())
}

fn check_coefficient(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(ForecastError::InvalidParameter(format!(
            "{} must be between 0 and 1 (exclusive), got {}",
            name, value
        )));
    }
    Ok(())
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        check_window("olympic.window", self.olympic.window)?;
        check_window("olympic.cycles", self.olympic.cycles)?;
        if 2 * self.olympic.drop >= self.olympic.cycles {
            return Err(ForecastError::InvalidParameter(format!(
                "olympic.drop ({}) must leave at least one of {} cycles",
                self.olympic.drop, self.olympic.cycles
            )));
        }

        check_window("moving_average.window", self.moving_average.window)?;
        check_window(
            "weighted_moving_average.window",
            self.weighted_moving_average.window,
        )?;

        let degree = self.polynomial_regression.degree;
        if degree == 0 || degree > MAX_POLYNOMIAL_DEGREE {
            return Err(ForecastError::InvalidParameter(format!(
                "polynomial_regression.degree must be in 1..={}, got {}",
                MAX_POLYNOMIAL_DEGREE, degree
            )));
        }

        check_coefficient("simple_exponential.alpha", self.simple_exponential.alpha)?;
        check_coefficient("double_exponential.alpha", self.double_exponential.alpha)?;
        check_coefficient("double_exponential.beta", self.double_exponential.beta)?;

        let seasonal = &self.triple_exponential;
        check_coefficient("triple_exponential.alpha", seasonal.alpha)?;
        check_coefficient("triple_exponential.beta", seasonal.beta)?;
        check_coefficient("triple_exponential.gamma", seasonal.gamma)?;
        if seasonal.period < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "triple_exponential.period must be at least 2, got {}",
                seasonal.period
            )));
        }

        Ok(())
    }
}
