//! Windowed-average model over past cycles, with optional trimming

use super::{horizon_index, not_fitted, require_observations, ForecastModel, InSampleFit, ModelKind};
use crate::config::OlympicConfig;
use crate::error::{ForecastError, Result};
use forecast_math::trimmed_mean;
use serde::{Deserialize, Serialize};

/// Olympic average model
///
/// The value at `t` is predicted by averaging the values one, two, ...
/// `cycles` windows earlier (`window` observations per cycle), after dropping
/// the `drop` highest and `drop` lowest of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OlympicModel {
    window: usize,
    cycles: usize,
    drop: usize,
    /// Last `window * cycles` observations of the fitted history
    recent: Option<Vec<f64>>,
}

impl OlympicModel {
    pub fn new(config: OlympicConfig) -> Result<Self> {
        if config.window == 0 || config.cycles == 0 {
            return Err(ForecastError::InvalidParameter(
                "Olympic window and cycles must be positive".to_string(),
            ));
        }
        if 2 * config.drop >= config.cycles {
            return Err(ForecastError::InvalidParameter(format!(
                "Olympic drop ({}) must leave at least one of {} cycles",
                config.drop, config.cycles
            )));
        }

        Ok(Self {
            window: config.window,
            cycles: config.cycles,
            drop: config.drop,
            recent: None,
        })
    }

    fn lagged_average(&self, lags: &[f64]) -> Result<f64> {
        Ok(trimmed_mean(lags, self.drop)?)
    }
}

impl ForecastModel for OlympicModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Olympic
    }

    fn min_observations(&self) -> usize {
        self.window + 1
    }

    fn fit(&mut self, values: &[f64]) -> Result<InSampleFit> {
        require_observations(self.kind(), self.min_observations(), values.len())?;

        let mut fitted = Vec::with_capacity(values.len() - self.window);
        let mut lags = Vec::with_capacity(self.cycles);
        for t in self.window..values.len() {
            lags.clear();
            lags.extend(
                (1..=self.cycles)
                    .map(|j| j * self.window)
                    .take_while(|&back| back <= t)
                    .map(|back| values[t - back]),
            );
            fitted.push(self.lagged_average(&lags)?);
        }

        let keep = self.window * self.cycles;
        self.recent = Some(values[values.len().saturating_sub(keep)..].to_vec());

        Ok(InSampleFit::new(self.window, fitted))
    }

    fn forecast(&self, steps: usize) -> Result<f64> {
        let recent = self.recent.as_ref().ok_or_else(not_fitted)?;
        // target position relative to the start of `recent`
        let target = horizon_index(recent.len().saturating_sub(1), steps)?;

        // lags landing in the future are skipped; start at the first one inside `recent`
        let first = (steps - 1).checked_div(self.window).ok_or_else(|| {
            ForecastError::InvalidParameter("Olympic window must be positive".to_string())
        })? + 1;
        let mut lags = Vec::with_capacity(self.cycles);
        for j in first.. {
            let back = match j.checked_mul(self.window) {
                Some(back) if back <= target => back,
                _ => break,
            };
            if lags.len() == self.cycles {
                break;
            }
            if let Some(&value) = recent.get(target - back) {
                lags.push(value);
            }
        }

        self.lagged_average(&lags)
    }

    fn state(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
