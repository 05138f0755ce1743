//! Naive carry-forward model

use super::{check_steps, not_fitted, require_observations, ForecastModel, InSampleFit, ModelKind};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Predicts every value as the previous observation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NaiveForecastingModel {
    last_value: Option<f64>,
}

impl NaiveForecastingModel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ForecastModel for NaiveForecastingModel {
    fn kind(&self) -> ModelKind {
        ModelKind::NaiveForecasting
    }

    fn min_observations(&self) -> usize {
        2
    }

    fn fit(&mut self, values: &[f64]) -> Result<InSampleFit> {
        require_observations(self.kind(), self.min_observations(), values.len())?;

        self.last_value = values.last().copied();
        Ok(InSampleFit::new(1, values[..values.len() - 1].to_vec()))
    }

    fn forecast(&self, steps: usize) -> Result<f64> {
        let last = self.last_value.ok_or_else(not_fitted)?;
        check_steps(steps)?;
        Ok(last)
    }

    fn state(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naive_carries_forward() {
        let mut model = NaiveForecastingModel::new();
        let fit = model.fit(&[4.0, 7.0, 5.0]).unwrap();

        assert_eq!(fit.offset, 1);
        assert_eq!(fit.fitted, vec![4.0, 7.0]);
        assert_eq!(model.forecast(3).unwrap(), 5.0);
        assert!(model.forecast(0).is_err());
        assert!(model.fit(&[1.0]).is_err());
    }
}
