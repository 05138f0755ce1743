//! Candidate forecasting algorithms
//!
//! Every algorithm implements [`ForecastModel`]. The set of algorithms is
//! closed and enumerated by [`ModelKind`], whose declaration order is the
//! registry order used when folding candidates to a winner.

use crate::config::ModelConfig;
use crate::error::{ForecastError, Result};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

pub mod exponential_smoothing;
pub mod moving_average;
pub mod naive;
pub mod olympic;
pub mod regression;

pub use exponential_smoothing::{
    DoubleExponentialSmoothingModel, SimpleExponentialSmoothingModel,
    TripleExponentialSmoothingModel,
};
pub use moving_average::{MovingAverageModel, WeightedMovingAverageModel};
pub use naive::NaiveForecastingModel;
pub use olympic::OlympicModel;
pub use regression::{LinearRegressionModel, PolynomialRegressionModel};

/// In-sample one-step-ahead predictions produced while fitting
///
/// `fitted[k]` is the prediction for the observation at index `offset + k`.
#[derive(Debug, Clone, PartialEq)]
pub struct InSampleFit {
    pub offset: usize,
    pub fitted: Vec<f64>,
}

impl InSampleFit {
    pub fn new(offset: usize, fitted: Vec<f64>) -> Self {
        Self { offset, fitted }
    }
}

/// Uniform contract of a forecasting algorithm
pub trait ForecastModel: Debug + Send {
    /// Registry entry this algorithm belongs to
    fn kind(&self) -> ModelKind;

    /// Shortest history the algorithm can be fitted on
    fn min_observations(&self) -> usize;

    /// Fit the algorithm to `values`, replacing any previous fit
    fn fit(&mut self, values: &[f64]) -> Result<InSampleFit>;

    /// Forecast `steps` observations past the end of the fitted history (`steps >= 1`)
    fn forecast(&self, steps: usize) -> Result<f64>;

    /// Parameters and fitted state as a JSON value
    fn state(&self) -> Result<serde_json::Value>;
}

/// Fail with [`ForecastError::InsufficientData`] when fewer than `required` values are given
pub(crate) fn require_observations(kind: ModelKind, required: usize, actual: usize) -> Result<()> {
    if actual < required {
        return Err(ForecastError::InsufficientData {
            model: kind.name().to_string(),
            required,
            actual,
        });
    }
    Ok(())
}

/// The closed registry of candidate algorithms, in fold order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
pub enum ModelKind {
    #[strum(serialize = "OlympicModel")]
    Olympic,
    #[strum(serialize = "MovingAverageModel")]
    MovingAverage,
    #[strum(serialize = "LinearRegressionModel")]
    LinearRegression,
    #[strum(serialize = "NaiveForecastingModel")]
    NaiveForecasting,
    #[strum(serialize = "PolynomialRegressionModel")]
    PolynomialRegression,
    #[strum(serialize = "SimpleExponentialSmoothingModel")]
    SimpleExponentialSmoothing,
    #[strum(serialize = "TripleExponentialSmoothingModel")]
    TripleExponentialSmoothing,
    #[strum(serialize = "WeightedMovingAverageModel")]
    WeightedMovingAverage,
    #[strum(serialize = "DoubleExponentialSmoothingModel")]
    DoubleExponentialSmoothing,
}

impl ModelKind {
    /// Every registered kind in fold order
    pub fn all() -> Vec<ModelKind> {
        ModelKind::iter().collect()
    }

    /// Stable name used for reporting and persistence
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Look a kind up by its stable name
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| ForecastError::UnknownModel(name.to_string()))
    }

    /// Construct an unfitted algorithm from the shared options bundle
    pub fn build(self, config: &ModelConfig) -> Result<Box<dyn ForecastModel>> {
        Ok(match self {
            ModelKind::Olympic => Box::new(OlympicModel::new(config.olympic)?),
            ModelKind::MovingAverage => {
                Box::new(MovingAverageModel::new(config.moving_average.window)?)
            }
            ModelKind::LinearRegression => Box::new(LinearRegressionModel::new()),
            ModelKind::NaiveForecasting => Box::new(NaiveForecastingModel::new()),
            ModelKind::PolynomialRegression => Box::new(PolynomialRegressionModel::new(
                config.polynomial_regression.degree,
            )?),
            ModelKind::SimpleExponentialSmoothing => Box::new(
                SimpleExponentialSmoothingModel::new(config.simple_exponential.alpha)?,
            ),
            ModelKind::TripleExponentialSmoothing => Box::new(
                TripleExponentialSmoothingModel::new(config.triple_exponential)?,
            ),
            ModelKind::WeightedMovingAverage => Box::new(WeightedMovingAverageModel::new(
                config.weighted_moving_average.window,
            )?),
            ModelKind::DoubleExponentialSmoothing => Box::new(
                DoubleExponentialSmoothingModel::new(config.double_exponential)?,
            ),
        })
    }

    /// Rebuild an algorithm of this kind from the output of [`ForecastModel::state`]
    pub fn restore(self, state: serde_json::Value) -> Result<Box<dyn ForecastModel>> {
        Ok(match self {
            ModelKind::Olympic => restore_as::<OlympicModel>(state)?,
            ModelKind::MovingAverage => restore_as::<MovingAverageModel>(state)?,
            ModelKind::LinearRegression => restore_as::<LinearRegressionModel>(state)?,
            ModelKind::NaiveForecasting => restore_as::<NaiveForecastingModel>(state)?,
            ModelKind::PolynomialRegression => restore_as::<PolynomialRegressionModel>(state)?,
            ModelKind::SimpleExponentialSmoothing => {
                restore_as::<SimpleExponentialSmoothingModel>(state)?
            }
            ModelKind::TripleExponentialSmoothing => {
                restore_as::<TripleExponentialSmoothingModel>(state)?
            }
            ModelKind::WeightedMovingAverage => restore_as::<WeightedMovingAverageModel>(state)?,
            ModelKind::DoubleExponentialSmoothing => {
                restore_as::<DoubleExponentialSmoothingModel>(state)?
            }
        })
    }
}

fn restore_as<M>(state: serde_json::Value) -> Result<Box<dyn ForecastModel>>
where
    M: ForecastModel + DeserializeOwned + 'static,
{
    let model: M = serde_json::from_value(state)?;
    Ok(Box::new(model))
}

/// Error returned by `forecast` on an unfitted algorithm
pub(crate) fn not_fitted() -> ForecastError {
    ForecastError::PredictBeforeTrain
}

/// Reject a zero forecast horizon
pub(crate) fn check_steps(steps: usize) -> Result<()> {
    if steps == 0 {
        return Err(ForecastError::InvalidParameter(
            "Forecast steps must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Index of the point `steps` past `last`, rejecting a zero or unrepresentable horizon
pub(crate) fn horizon_index(last: usize, steps: usize) -> Result<usize> {
    check_steps(steps)?;
    last.checked_add(steps).ok_or_else(|| {
        ForecastError::InvalidParameter(format!("Forecast steps {} out of range", steps))
    })
}
