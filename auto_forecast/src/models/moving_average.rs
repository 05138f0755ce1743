//! Moving average models for time series forecasting

use super::{check_steps, not_fitted, require_observations, ForecastModel, InSampleFit, ModelKind};
use crate::error::{ForecastError, Result};
use forecast_math::{SimpleMovingAverage, WeightedMovingAverage};
use serde::{Deserialize, Serialize};

fn check_window(window: usize) -> Result<()> {
    if window == 0 {
        return Err(ForecastError::InvalidParameter(
            "Window size must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Simple Moving Average model
///
/// Predicts each value as the mean of the previous `window` values; the
/// forecast is constant at the last average.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingAverageModel {
    window: usize,
    last_average: Option<f64>,
}

impl MovingAverageModel {
    /// Create a new Simple Moving Average model
    pub fn new(window: usize) -> Result<Self> {
        check_window(window)?;

        Ok(Self {
            window,
            last_average: None,
        })
    }
}

impl ForecastModel for MovingAverageModel {
    fn kind(&self) -> ModelKind {
        ModelKind::MovingAverage
    }

    fn min_observations(&self) -> usize {
        self.window + 1
    }

    fn fit(&mut self, values: &[f64]) -> Result<InSampleFit> {
        require_observations(self.kind(), self.min_observations(), values.len())?;

        let mut sma = SimpleMovingAverage::new(self.window)?;
        let mut fitted = Vec::with_capacity(values.len() - self.window);
        for (t, &value) in values.iter().enumerate() {
            if t >= self.window {
                fitted.push(sma.value()?);
            }
            sma.update(value);
        }

        self.last_average = Some(sma.value()?);
        Ok(InSampleFit::new(self.window, fitted))
    }

    fn forecast(&self, steps: usize) -> Result<f64> {
        let average = self.last_average.ok_or_else(not_fitted)?;
        check_steps(steps)?;
        Ok(average)
    }

    fn state(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Weighted Moving Average model
///
/// Like [`MovingAverageModel`] but the previous `window` values are weighted
/// `1..=window`, most recent heaviest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedMovingAverageModel {
    window: usize,
    last_average: Option<f64>,
}

impl WeightedMovingAverageModel {
    /// Create a new Weighted Moving Average model
    pub fn new(window: usize) -> Result<Self> {
        check_window(window)?;

        Ok(Self {
            window,
            last_average: None,
        })
    }
}

impl ForecastModel for WeightedMovingAverageModel {
    fn kind(&self) -> ModelKind {
        ModelKind::WeightedMovingAverage
    }

    fn min_observations(&self) -> usize {
        self.window + 1
    }

    fn fit(&mut self, values: &[f64]) -> Result<InSampleFit> {
        require_observations(self.kind(), self.min_observations(), values.len())?;

        let mut wma = WeightedMovingAverage::new(self.window)?;
        let mut fitted = Vec::with_capacity(values.len() - self.window);
        for (t, &value) in values.iter().enumerate() {
            if t >= self.window {
                fitted.push(wma.value()?);
            }
            wma.update(value);
        }

        self.last_average = Some(wma.value()?);
        Ok(InSampleFit::new(self.window, fitted))
    }

    fn forecast(&self, steps: usize) -> Result<f64> {
        let average = self.last_average.ok_or_else(not_fitted)?;
        check_steps(steps)?;
        Ok(average)
    }

    fn state(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
