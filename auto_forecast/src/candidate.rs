//! A forecasting algorithm together with its trained history and fit metrics

use crate::config::ModelConfig;
use crate::data::DataSequence;
use crate::error::{ForecastError, Result};
use crate::metrics::ErrorMetrics;
use crate::models::{ForecastModel, ModelKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted form of a trained candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    pub model_name: String,
    pub metrics: ErrorMetrics,
    pub inner_state: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InnerState {
    history_end: DateTime<Utc>,
    observations: usize,
    model: serde_json::Value,
}

#[derive(Debug, Clone, Copy)]
struct TrainedState {
    metrics: ErrorMetrics,
    /// Timestamp of the last observation the model was trained on
    history_end: DateTime<Utc>,
    observations: usize,
}

/// A candidate model: one algorithm, trained at most once per selection run
#[derive(Debug)]
pub struct Candidate {
    model: Box<dyn ForecastModel>,
    trained: Option<TrainedState>,
}

impl Candidate {
    pub fn new(model: Box<dyn ForecastModel>) -> Self {
        Self {
            model,
            trained: None,
        }
    }

    /// Build an untrained candidate of `kind` from the shared options bundle
    pub fn build(kind: ModelKind, config: &ModelConfig) -> Result<Self> {
        Ok(Self::new(kind.build(config)?))
    }

    pub fn kind(&self) -> ModelKind {
        self.model.kind()
    }

    /// Stable identifying name
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn is_trained(&self) -> bool {
        self.trained.is_some()
    }

    /// Number of observations the candidate was trained on
    pub fn observations(&self) -> Option<usize> {
        self.trained.map(|t| t.observations)
    }

    /// Fit the algorithm to the whole sequence and score its in-sample predictions
    pub fn train(&mut self, data: &DataSequence) -> Result<ErrorMetrics> {
        self.trained = None;

        let values = data.values();
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::DataError(format!(
                "Observation {} is not a finite number ({})",
                i, values[i]
            )));
        }
        let history_end = data
            .last_timestamp()
            .ok_or_else(|| ForecastError::DataError("Empty time series data".to_string()))?;

        let fit = self.model.fit(&values)?;
        let actual = values.get(fit.offset..).unwrap_or_default();
        let metrics = ErrorMetrics::compute(&fit.fitted, actual)?;

        self.trained = Some(TrainedState {
            metrics,
            history_end,
            observations: values.len(),
        });
        Ok(metrics)
    }

    /// Write forecasts into every point of `sequence` after the trained history
    ///
    /// The k-th such point receives the k-step-ahead forecast; points at or
    /// before the end of the history are left untouched.
    pub fn predict(&self, sequence: &mut DataSequence) -> Result<()> {
        let trained = self.trained.ok_or(ForecastError::PredictBeforeTrain)?;

        for (i, value) in sequence.values_after_mut(trained.history_end).enumerate() {
            *value = self.model.forecast(i + 1)?;
        }
        Ok(())
    }

    /// The next `steps` forecasts after the trained history
    pub fn forecast(&self, steps: usize) -> Result<Vec<f64>> {
        if self.trained.is_none() {
            return Err(ForecastError::PredictBeforeTrain);
        }
        (1..=steps).map(|h| self.model.forecast(h)).collect()
    }

    /// In-sample error metrics of the last training
    pub fn errors(&self) -> Result<ErrorMetrics> {
        self.trained
            .map(|t| t.metrics)
            .ok_or(ForecastError::NotTrained("report error metrics"))
    }

    pub fn to_record(&self) -> Result<ModelRecord> {
        let trained = self.trained.ok_or(ForecastError::NotTrained("serialize"))?;

        let inner = InnerState {
            history_end: trained.history_end,
            observations: trained.observations,
            model: self.model.state()?,
        };

        Ok(ModelRecord {
            model_name: self.name().to_string(),
            metrics: trained.metrics,
            inner_state: serde_json::to_value(inner)?,
        })
    }

    /// Rebuild a trained candidate; the variant is chosen by `model_name`
    pub fn from_record(record: ModelRecord) -> Result<Self> {
        let kind = ModelKind::from_name(&record.model_name)?;
        let inner: InnerState = serde_json::from_value(record.inner_state)?;

        Ok(Self {
            model: kind.restore(inner.model)?,
            trained: Some(TrainedState {
                metrics: record.metrics,
                history_end: inner.history_end,
                observations: inner.observations,
            }),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_record()?)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_record(serde_json::from_str(json)?)
    }
}
