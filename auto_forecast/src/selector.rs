//! Train every registered candidate and fold them to the best fit

use crate::candidate::Candidate;
use crate::config::{AutoForecastConfig, ModelConfig, SelectionConfig};
use crate::data::DataSequence;
use crate::error::{CandidateFailure, ForecastError, Result};
use crate::metrics::{ErrorMetrics, SelectionMetric};
use crate::models::ModelKind;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// Score of one successfully trained candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub model: String,
    pub metrics: ErrorMetrics,
    /// Value of the selection metric (lower is better)
    pub score: f64,
}

/// Summary of a selection run
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Name of the chosen candidate
    pub winner: String,
    /// Metrics of the chosen candidate
    pub metrics: ErrorMetrics,
    /// Metric the candidates were compared on
    pub metric: SelectionMetric,
    /// Every candidate that entered the comparison, in registry order
    pub scores: Vec<CandidateScore>,
    /// Every candidate excluded from the comparison, in registry order
    pub failures: Vec<CandidateFailure>,
}

impl Selection {
    pub fn score_of(&self, model: &str) -> Option<&CandidateScore> {
        self.scores.iter().find(|s| s.model == model)
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<34} {:>14}", "model", self.metric.label())?;
        for score in &self.scores {
            let marker = if score.model == self.winner { "*" } else { " " };
            writeln!(f, "{}{:<33} {:>14.6}", marker, score.model, score.score)?;
        }
        for failure in &self.failures {
            writeln!(f, " {:<33} {:>14}  {}", failure.model, "-", failure.reason)?;
        }
        Ok(())
    }
}

/// Result of a successful selection: the trained winner and the run summary
#[derive(Debug)]
pub struct SelectionOutcome {
    pub winner: Candidate,
    pub selection: Selection,
}

/// Trains candidates from the registry and reduces them to a single winner
#[derive(Debug, Clone)]
pub struct ModelSelector {
    config: SelectionConfig,
    models: ModelConfig,
    registry: Vec<ModelKind>,
}

impl ModelSelector {
    /// Selector over the full registry
    pub fn new(config: &AutoForecastConfig) -> Self {
        Self {
            config: config.selection.clone(),
            models: config.models.clone(),
            registry: ModelKind::all(),
        }
    }

    /// Restrict (and reorder) the candidates; the fold follows the given order
    pub fn with_registry(mut self, registry: Vec<ModelKind>) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &[ModelKind] {
        &self.registry
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Train every candidate on `data` and keep the one with the lowest score
    ///
    /// Candidates that fail to train are logged and excluded. Ties keep the
    /// candidate that comes first in the registry.
    pub fn select(&self, data: &DataSequence) -> Result<SelectionOutcome> {
        self.config.validate()?;
        self.models.validate()?;
        if self.registry.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Candidate registry is empty".to_string(),
            ));
        }

        debug!(
            "Training {} candidates on {} observations ({})",
            self.registry.len(),
            data.len(),
            if self.config.parallel {
                "parallel"
            } else {
                "sequential"
            }
        );

        let train = |&kind: &ModelKind| (kind, self.train_candidate(kind, data));
        // collect() keeps registry order regardless of completion order
        let results: Vec<_> = if self.config.parallel {
            self.registry.par_iter().map(train).collect()
        } else {
            self.registry.iter().map(train).collect()
        };

        self.reduce(results)
    }

    fn train_candidate(
        &self,
        kind: ModelKind,
        data: &DataSequence,
    ) -> Result<(Candidate, ErrorMetrics)> {
        let mut candidate = Candidate::build(kind, &self.models)?;

        match self.config.timeout() {
            None => {
                let metrics = candidate.train(data)?;
                Ok((candidate, metrics))
            }
            Some(limit) => train_with_timeout(candidate, data.clone(), limit),
        }
    }

    fn reduce(
        &self,
        results: Vec<(ModelKind, Result<(Candidate, ErrorMetrics)>)>,
    ) -> Result<SelectionOutcome> {
        let metric = self.config.metric;
        let mut incumbent: Option<(Candidate, ErrorMetrics)> = None;
        let mut scores = Vec::with_capacity(results.len());
        let mut failures = Vec::new();

        for (kind, result) in results {
            let (candidate, metrics) = match result {
                Ok(trained) => trained,
                Err(err) => {
                    warn!("Candidate {} excluded: {}", kind, err);
                    failures.push(CandidateFailure {
                        model: kind.name().to_string(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let score = metric.score(&metrics);
            if !score.is_finite() {
                warn!("Candidate {} excluded: {} score is {}", kind, metric.label(), score);
                failures.push(CandidateFailure {
                    model: kind.name().to_string(),
                    reason: format!("{} score is not finite", metric.label()),
                });
                continue;
            }

            debug!("Candidate {} trained: {}", kind, metrics);
            scores.push(CandidateScore {
                model: kind.name().to_string(),
                metrics,
                score,
            });

            if metric.better_than(&metrics, incumbent.as_ref().map(|(_, m)| m)) {
                incumbent = Some((candidate, metrics));
            }
        }

        let Some((winner, metrics)) = incumbent else {
            warn!("All {} candidates failed to train", failures.len());
            return Err(ForecastError::SelectionExhausted { failures });
        };

        info!(
            "Selected {} ({} = {:.6}, {} of {} candidates trained)",
            winner.name(),
            metric.label(),
            metric.score(&metrics),
            scores.len(),
            self.registry.len()
        );
        if self.config.debug {
            debug!("{}", metrics.debug_line());
        }

        let selection = Selection {
            winner: winner.name().to_string(),
            metrics,
            metric,
            scores,
            failures,
        };
        Ok(SelectionOutcome { winner, selection })
    }
}

/// Train on a dedicated thread, giving up after `limit`
///
/// A timed-out training thread is detached and its result discarded.
fn train_with_timeout(
    mut candidate: Candidate,
    data: DataSequence,
    limit: Duration,
) -> Result<(Candidate, ErrorMetrics)> {
    let name = candidate.name();
    let (tx, rx) = mpsc::channel();

    thread::Builder::new()
        .name(format!("train-{}", name))
        .spawn(move || {
            let result = candidate.train(&data).map(|metrics| (candidate, metrics));
            // the receiver is gone once the caller timed out
            let _ = tx.send(result);
        })?;

    match rx.recv_timeout(limit) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(ForecastError::TrainingTimeout {
            model: name.to_string(),
            limit,
        }),
        Err(RecvTimeoutError::Disconnected) => {
            Err(ForecastError::TrainingAborted(name.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastModel, InSampleFit};
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};

    fn sequence(values: &[f64]) -> DataSequence {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        DataSequence::from_values(start, ChronoDuration::days(1), values).unwrap()
    }

    /// Fits the history exactly, but only after `delay`
    #[derive(Debug)]
    struct SlowModel {
        delay: Duration,
    }

    impl ForecastModel for SlowModel {
        fn kind(&self) -> ModelKind {
            ModelKind::Olympic
        }

        fn min_observations(&self) -> usize {
            1
        }

        fn fit(&mut self, values: &[f64]) -> Result<InSampleFit> {
            thread::sleep(self.delay);
            Ok(InSampleFit::new(0, values.to_vec()))
        }

        fn forecast(&self, _steps: usize) -> Result<f64> {
            Ok(0.0)
        }

        fn state(&self) -> Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }
    }

    #[derive(Debug)]
    struct PanickingModel;

    impl ForecastModel for PanickingModel {
        fn kind(&self) -> ModelKind {
            ModelKind::NaiveForecasting
        }

        fn min_observations(&self) -> usize {
            1
        }

        fn fit(&mut self, _values: &[f64]) -> Result<InSampleFit> {
            panic!("fit blew up");
        }

        fn forecast(&self, _steps: usize) -> Result<f64> {
            Ok(0.0)
        }

        fn state(&self) -> Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }
    }

    fn slow(delay: Duration) -> Candidate {
        Candidate::new(Box::new(SlowModel { delay }))
    }

    #[test]
    fn test_slow_training_times_out() {
        let data = sequence(&[1.0, 2.0, 3.0]);
        let result = train_with_timeout(
            slow(Duration::from_millis(500)),
            data,
            Duration::from_millis(5),
        );

        match result {
            Err(ForecastError::TrainingTimeout { model, limit }) => {
                assert_eq!(model, "OlympicModel");
                assert_eq!(limit, Duration::from_millis(5));
            }
            other => panic!("expected TrainingTimeout, got {:?}", other.map(|(_, m)| m)),
        }
    }

    #[test]
    fn test_fast_training_beats_the_limit() {
        let data = sequence(&[1.0, 2.0, 3.0]);
        let (candidate, metrics) =
            train_with_timeout(slow(Duration::ZERO), data, Duration::from_secs(10)).unwrap();

        assert!(candidate.is_trained());
        assert_eq!(metrics.mse, 0.0);
    }

    #[test]
    fn test_panicking_training_is_aborted() {
        let data = sequence(&[1.0, 2.0, 3.0]);
        let result = train_with_timeout(
            Candidate::new(Box::new(PanickingModel)),
            data,
            Duration::from_secs(10),
        );

        assert!(matches!(
            result,
            Err(ForecastError::TrainingAborted(ref model)) if model == "NaiveForecastingModel"
        ));
    }

    #[test]
    fn test_timed_out_candidate_is_a_failure_not_fatal() {
        let mut config = AutoForecastConfig::default();
        config.selection.timeout_ms = Some(5);
        let selector = ModelSelector::new(&config);
        assert_eq!(selector.config().timeout(), Some(Duration::from_millis(5)));

        let data = sequence(&[1.0, 3.0, 5.0, 7.0, 9.0]);
        let timed_out = train_with_timeout(
            slow(Duration::from_millis(500)),
            data.clone(),
            Duration::from_millis(5),
        );
        let trained = Candidate::build(ModelKind::LinearRegression, &config.models).and_then(
            |mut candidate| -> Result<(Candidate, ErrorMetrics)> {
                let metrics = candidate.train(&data)?;
                Ok((candidate, metrics))
            },
        );

        let outcome = selector
            .reduce(vec![
                (ModelKind::Olympic, timed_out),
                (ModelKind::LinearRegression, trained),
            ])
            .unwrap();
        let selection = &outcome.selection;

        assert_eq!(selection.winner, "LinearRegressionModel");
        assert_eq!(selection.scores.len(), 1);
        assert_eq!(selection.failures.len(), 1);
        assert_eq!(selection.failures[0].model, "OlympicModel");
        assert!(selection.failures[0].reason.contains("OlympicModel"));
    }

    #[test]
    fn test_short_series_excludes_long_window_candidates() {
        let selector = ModelSelector::new(&AutoForecastConfig::default());
        let outcome = selector.select(&sequence(&[1.0, 2.0, 4.0])).unwrap();
        let selection = &outcome.selection;

        let failed: Vec<&str> = selection.failures.iter().map(|f| f.model.as_str()).collect();
        assert!(failed.contains(&"OlympicModel"));
        assert!(failed.contains(&"TripleExponentialSmoothingModel"));
        assert!(failed.contains(&"PolynomialRegressionModel"));
        assert_eq!(selection.scores.len() + selection.failures.len(), 9);
        assert!(outcome.winner.is_trained());
    }

    #[test]
    fn test_all_candidates_failing_exhausts_selection() {
        let selector = ModelSelector::new(&AutoForecastConfig::default());
        match selector.select(&sequence(&[1.0])) {
            Err(ForecastError::SelectionExhausted { failures }) => assert_eq!(failures.len(), 9),
            other => panic!("expected SelectionExhausted, got {:?}", other.map(|o| o.selection)),
        }
    }

    #[test]
    fn test_empty_registry_is_rejected() {
        let selector = ModelSelector::new(&AutoForecastConfig::default()).with_registry(vec![]);
        assert!(matches!(
            selector.select(&sequence(&[1.0, 2.0, 3.0])),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_timeout_budget_still_selects() {
        let mut config = AutoForecastConfig::default();
        config.selection.timeout_ms = Some(10_000);
        let values: Vec<f64> = (0..30).map(|i| i as f64).collect();

        let outcome = ModelSelector::new(&config).select(&sequence(&values)).unwrap();
        assert_eq!(outcome.selection.winner, "LinearRegressionModel");
    }
}
