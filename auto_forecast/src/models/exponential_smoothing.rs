//! Exponential smoothing models for time series forecasting

use super::{check_steps, not_fitted, require_observations, ForecastModel, InSampleFit, ModelKind};
use crate::config::{SeasonalSmoothingConfig, TrendSmoothingConfig};
use crate::error::Result;
use forecast_math::{DoubleExponentialSmoothing, ExponentialSmoothing, HoltWinters};
use serde::{Deserialize, Serialize};

/// Simple exponential smoothing model (level only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleExponentialSmoothingModel {
    alpha: f64,
    smoother: Option<ExponentialSmoothing>,
}

impl SimpleExponentialSmoothingModel {
    pub fn new(alpha: f64) -> Result<Self> {
        ExponentialSmoothing::new(alpha)?;
        Ok(Self {
            alpha,
            smoother: None,
        })
    }
}

impl ForecastModel for SimpleExponentialSmoothingModel {
    fn kind(&self) -> ModelKind {
        ModelKind::SimpleExponentialSmoothing
    }

    fn min_observations(&self) -> usize {
        2
    }

    fn fit(&mut self, values: &[f64]) -> Result<InSampleFit> {
        require_observations(self.kind(), self.min_observations(), values.len())?;

        let mut smoother = ExponentialSmoothing::new(self.alpha)?;
        let mut fitted = Vec::with_capacity(values.len() - 1);
        for (t, &value) in values.iter().enumerate() {
            if t >= 1 {
                fitted.push(smoother.forecast()?);
            }
            smoother.update(value);
        }

        self.smoother = Some(smoother);
        Ok(InSampleFit::new(1, fitted))
    }

    fn forecast(&self, steps: usize) -> Result<f64> {
        let smoother = self.smoother.as_ref().ok_or_else(not_fitted)?;
        check_steps(steps)?;
        Ok(smoother.forecast()?)
    }

    fn state(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Holt's linear trend model
///
/// The first observation seeds the level and the second seeds the trend, so
/// in-sample predictions start at the third observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoubleExponentialSmoothingModel {
    alpha: f64,
    beta: f64,
    smoother: Option<DoubleExponentialSmoothing>,
}

impl DoubleExponentialSmoothingModel {
    pub fn new(config: TrendSmoothingConfig) -> Result<Self> {
        DoubleExponentialSmoothing::new(config.alpha, config.beta)?;
        Ok(Self {
            alpha: config.alpha,
            beta: config.beta,
            smoother: None,
        })
    }
}

impl ForecastModel for DoubleExponentialSmoothingModel {
    fn kind(&self) -> ModelKind {
        ModelKind::DoubleExponentialSmoothing
    }

    fn min_observations(&self) -> usize {
        3
    }

    fn fit(&mut self, values: &[f64]) -> Result<InSampleFit> {
        require_observations(self.kind(), self.min_observations(), values.len())?;

        let mut smoother = DoubleExponentialSmoothing::new(self.alpha, self.beta)?;
        let mut fitted = Vec::with_capacity(values.len() - 2);
        for (t, &value) in values.iter().enumerate() {
            if t >= 2 {
                fitted.push(smoother.forecast(1)?);
            }
            smoother.update(value);
        }

        self.smoother = Some(smoother);
        Ok(InSampleFit::new(2, fitted))
    }

    fn forecast(&self, steps: usize) -> Result<f64> {
        let smoother = self.smoother.as_ref().ok_or_else(not_fitted)?;
        check_steps(steps)?;
        Ok(smoother.forecast(steps)?)
    }

    fn state(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Additive Holt-Winters model (level, trend and season)
///
/// Needs two full seasons to seed its state; in-sample predictions start
/// one season in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripleExponentialSmoothingModel {
    config: SeasonalSmoothingConfig,
    smoother: Option<HoltWinters>,
}

impl TripleExponentialSmoothingModel {
    pub fn new(config: SeasonalSmoothingConfig) -> Result<Self> {
        HoltWinters::new(config.alpha, config.beta, config.gamma, config.period)?;
        Ok(Self {
            config,
            smoother: None,
        })
    }
}

impl ForecastModel for TripleExponentialSmoothingModel {
    fn kind(&self) -> ModelKind {
        ModelKind::TripleExponentialSmoothing
    }

    fn min_observations(&self) -> usize {
        2 * self.config.period
    }

    fn fit(&mut self, values: &[f64]) -> Result<InSampleFit> {
        require_observations(self.kind(), self.min_observations(), values.len())?;

        let c = &self.config;
        let mut smoother = HoltWinters::new(c.alpha, c.beta, c.gamma, c.period)?;
        smoother.initialize(values)?;

        let mut fitted = Vec::with_capacity(values.len() - c.period);
        for &value in &values[c.period..] {
            fitted.push(smoother.forecast(1)?);
            smoother.update(value)?;
        }

        let offset = c.period;
        self.smoother = Some(smoother);
        Ok(InSampleFit::new(offset, fitted))
    }

    fn forecast(&self, steps: usize) -> Result<f64> {
        let smoother = self.smoother.as_ref().ok_or_else(not_fitted)?;
        check_steps(steps)?;
        Ok(smoother.forecast(steps)?)
    }

    fn state(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
