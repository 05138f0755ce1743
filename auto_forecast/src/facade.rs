//! Public forecasting interface backed by the automatically selected model

use crate::candidate::{Candidate, ModelRecord};
use crate::config::AutoForecastConfig;
use crate::data::DataSequence;
use crate::error::{ForecastError, Result};
use crate::metrics::ErrorMetrics;
use crate::models::ModelKind;
use crate::report::{LogReporter, SelectionReporter};
use crate::selector::{ModelSelector, Selection};
use std::sync::Arc;

/// Name reported before any model has been selected
pub const UNSELECTED: &str = "Unselected";

/// Forecast model that picks the best-fitting candidate on every `train`
///
/// Holds at most one trained candidate: none before training (or after a
/// failed training), the winner afterwards.
#[derive(Debug)]
pub struct AutoForecastModel {
    selector: ModelSelector,
    reporter: Arc<dyn SelectionReporter>,
    model: Option<Candidate>,
}

impl AutoForecastModel {
    /// Create an untrained facade; the configuration is validated up front
    pub fn new(config: AutoForecastConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            selector: ModelSelector::new(&config),
            reporter: Arc::new(LogReporter),
            model: None,
        })
    }

    /// Publish chosen models to `reporter` instead of the log
    pub fn with_reporter(mut self, reporter: Arc<dyn SelectionReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Restrict the candidates considered, in fold order
    pub fn with_registry(mut self, registry: Vec<ModelKind>) -> Self {
        self.selector = self.selector.with_registry(registry);
        self
    }

    /// Select the best candidate for `data` and keep it
    ///
    /// On failure the facade holds no model.
    pub fn train(&mut self, data: &DataSequence) -> Result<Selection> {
        self.model = None;

        let outcome = self.selector.select(data)?;
        self.model = Some(outcome.winner);
        self.reporter.record_chosen_model(&outcome.selection.winner);

        Ok(outcome.selection)
    }

    /// Incremental retraining hook; currently leaves the held model untouched
    pub fn update(&mut self, _data: &DataSequence) -> Result<()> {
        Ok(())
    }

    /// Fill the points of `sequence` after the trained history with forecasts
    pub fn predict(&self, sequence: &mut DataSequence) -> Result<()> {
        self.winner()?.predict(sequence)
    }

    /// The next `steps` forecasts
    pub fn forecast(&self, steps: usize) -> Result<Vec<f64>> {
        self.winner()?.forecast(steps)
    }

    /// Name of the held model, or [`UNSELECTED`]
    pub fn name(&self) -> &str {
        self.model.as_ref().map_or(UNSELECTED, Candidate::name)
    }

    /// In-sample metrics of the held model
    pub fn errors(&self) -> Result<ErrorMetrics> {
        match &self.model {
            Some(model) => model.errors(),
            None => Err(ForecastError::NotTrained("report error metrics")),
        }
    }

    pub fn model(&self) -> Option<&Candidate> {
        self.model.as_ref()
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Persisted form of the held model
    pub fn to_record(&self) -> Result<ModelRecord> {
        match &self.model {
            Some(model) => model.to_record(),
            None => Err(ForecastError::NotTrained("serialize")),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_record()?)?)
    }

    /// Replace the held model with a persisted one
    pub fn load_record(&mut self, record: ModelRecord) -> Result<()> {
        self.model = Some(Candidate::from_record(record)?);
        Ok(())
    }

    pub fn load_json(&mut self, json: &str) -> Result<()> {
        self.load_record(serde_json::from_str(json)?)
    }

    fn winner(&self) -> Result<&Candidate> {
        self.model.as_ref().ok_or(ForecastError::PredictBeforeTrain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::LastChosenModel;
    use chrono::{Duration, TimeZone, Utc};

    fn sequence(values: &[f64]) -> DataSequence {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        DataSequence::from_values(start, Duration::days(1), values).unwrap()
    }

    #[test]
    fn test_untrained_facade() {
        let facade = AutoForecastModel::new(AutoForecastConfig::default()).unwrap();
        let mut data = sequence(&[1.0, 2.0, 3.0]);

        assert_eq!(facade.name(), UNSELECTED);
        assert!(matches!(
            facade.predict(&mut data),
            Err(ForecastError::PredictBeforeTrain)
        ));
        assert!(matches!(
            facade.errors(),
            Err(ForecastError::NotTrained(_))
        ));
        assert!(facade.to_json().is_err());
    }

    #[test]
    fn test_failed_training_clears_the_model() {
        let reporter = Arc::new(LastChosenModel::new());
        let mut facade = AutoForecastModel::new(AutoForecastConfig::default())
            .unwrap()
            .with_reporter(reporter.clone());

        facade.train(&sequence(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        assert!(facade.is_trained());

        assert!(matches!(
            facade.train(&sequence(&[1.0])),
            Err(ForecastError::SelectionExhausted { .. })
        ));
        assert!(!facade.is_trained());
        assert_eq!(facade.name(), UNSELECTED);
        assert_eq!(reporter.count(), 1);
    }

    #[test]
    fn test_update_keeps_the_winner() {
        let mut facade = AutoForecastModel::new(AutoForecastConfig::default()).unwrap();
        let data = sequence(&[2.0, 4.0, 6.0, 8.0, 10.0]);
        let selection = facade.train(&data).unwrap();

        facade.update(&sequence(&[100.0, -3.0, 7.0])).unwrap();
        assert_eq!(facade.name(), selection.winner);
        assert_eq!(facade.errors().unwrap(), selection.metrics);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AutoForecastConfig::default();
        config.models.triple_exponential.period = 1;
        assert!(AutoForecastModel::new(config).is_err());
    }
}
