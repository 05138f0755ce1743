//! Trend models fitted by least squares on the observation index

use super::{horizon_index, not_fitted, require_observations, ForecastModel, InSampleFit, ModelKind};
use crate::config::MAX_POLYNOMIAL_DEGREE;
use crate::error::{ForecastError, Result};
use forecast_math::{LinearFit, PolynomialFit};
use serde::{Deserialize, Serialize};

/// Straight line through the history, extrapolated forward
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearRegressionModel {
    line: Option<LinearFit>,
    observations: usize,
}

impl LinearRegressionModel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ForecastModel for LinearRegressionModel {
    fn kind(&self) -> ModelKind {
        ModelKind::LinearRegression
    }

    fn min_observations(&self) -> usize {
        2
    }

    fn fit(&mut self, values: &[f64]) -> Result<InSampleFit> {
        require_observations(self.kind(), self.min_observations(), values.len())?;

        let xs: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
        let line = LinearFit::fit(&xs, values)?;
        let fitted = xs.iter().map(|&x| line.value_at(x)).collect();

        self.line = Some(line);
        self.observations = values.len();
        Ok(InSampleFit::new(0, fitted))
    }

    fn forecast(&self, steps: usize) -> Result<f64> {
        let line = self.line.as_ref().ok_or_else(not_fitted)?;
        let x = horizon_index(self.observations.saturating_sub(1), steps)?;
        Ok(line.value_at(x as f64))
    }

    fn state(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Least-squares polynomial of the observation index
///
/// The index is scaled to `[0, 1]` over the history to keep the normal
/// equations well conditioned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolynomialRegressionModel {
    degree: usize,
    curve: Option<PolynomialFit>,
    observations: usize,
}

impl PolynomialRegressionModel {
    pub fn new(degree: usize) -> Result<Self> {
        if degree == 0 || degree > MAX_POLYNOMIAL_DEGREE {
            return Err(ForecastError::InvalidParameter(format!(
                "Polynomial degree must be in 1..={}, got {}",
                MAX_POLYNOMIAL_DEGREE, degree
            )));
        }

        Ok(Self {
            degree,
            curve: None,
            observations: 0,
        })
    }

    fn scale(observations: usize) -> f64 {
        observations.saturating_sub(1).max(1) as f64
    }
}

impl ForecastModel for PolynomialRegressionModel {
    fn kind(&self) -> ModelKind {
        ModelKind::PolynomialRegression
    }

    fn min_observations(&self) -> usize {
        self.degree + 1
    }

    fn fit(&mut self, values: &[f64]) -> Result<InSampleFit> {
        require_observations(self.kind(), self.min_observations(), values.len())?;

        let scale = Self::scale(values.len());
        let xs: Vec<f64> = (0..values.len()).map(|i| i as f64 / scale).collect();
        let curve = PolynomialFit::fit(&xs, values, self.degree)?;
        let fitted = xs.iter().map(|&x| curve.value_at(x)).collect();

        self.curve = Some(curve);
        self.observations = values.len();
        Ok(InSampleFit::new(0, fitted))
    }

    fn forecast(&self, steps: usize) -> Result<f64> {
        let curve = self.curve.as_ref().ok_or_else(not_fitted)?;
        let x = horizon_index(self.observations.saturating_sub(1), steps)?;
        Ok(curve.value_at(x as f64 / Self::scale(self.observations)))
    }

    fn state(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_regression_exact_on_a_line() {
        let values: Vec<f64> = (0..20).map(|i| 2.0 + 3.0 * i as f64).collect();
        let mut model = LinearRegressionModel::new();
        let fit = model.fit(&values).unwrap();

        assert_eq!(fit.offset, 0);
        assert_eq!(fit.fitted, values);
        assert_relative_eq!(model.forecast(1).unwrap(), 62.0, epsilon = 1e-9);
        assert_relative_eq!(model.forecast(5).unwrap(), 74.0, epsilon = 1e-9);
    }

    #[test]
    fn test_polynomial_recovers_a_parabola() {
        let values: Vec<f64> = (0..12)
            .map(|i| {
                let x = i as f64;
                1.0 - 2.0 * x + 0.5 * x * x
            })
            .collect();
        let mut model = PolynomialRegressionModel::new(2).unwrap();
        let fit = model.fit(&values).unwrap();

        for (f, v) in fit.fitted.iter().zip(&values) {
            assert_relative_eq!(*f, *v, epsilon = 1e-6);
        }
        // x = 12
        assert_relative_eq!(model.forecast(1).unwrap(), 49.0, epsilon = 1e-6);
    }

    #[test]
    fn test_forecast_rejects_unreachable_horizon() {
        let values = [1.0, 2.0, 4.0, 8.0];
        let mut line = LinearRegressionModel::new();
        line.fit(&values).unwrap();
        let mut curve = PolynomialRegressionModel::new(2).unwrap();
        curve.fit(&values).unwrap();

        assert!(matches!(
            line.forecast(usize::MAX),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(matches!(
            curve.forecast(usize::MAX),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_polynomial_degree_bounds() {
        assert!(PolynomialRegressionModel::new(0).is_err());
        assert!(PolynomialRegressionModel::new(MAX_POLYNOMIAL_DEGREE + 1).is_err());

        let mut model = PolynomialRegressionModel::new(3).unwrap();
        assert!(matches!(
            model.fit(&[1.0, 2.0, 3.0]),
            Err(ForecastError::InsufficientData { required: 4, .. })
        ));
    }
}
