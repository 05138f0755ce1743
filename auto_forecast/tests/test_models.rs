use auto_forecast::config::ModelConfig;
use auto_forecast::error::ForecastError;
use auto_forecast::models::{ForecastModel, ModelKind};
use rstest::rstest;

fn wavy(n: usize) -> Vec<f64> {
    (0..n).map(|i| 10.0 + (i as f64 * 1.3).sin()).collect()
}

#[rstest]
#[case(ModelKind::Olympic, 8)]
#[case(ModelKind::MovingAverage, 4)]
#[case(ModelKind::LinearRegression, 2)]
#[case(ModelKind::NaiveForecasting, 2)]
#[case(ModelKind::PolynomialRegression, 4)]
#[case(ModelKind::SimpleExponentialSmoothing, 2)]
#[case(ModelKind::TripleExponentialSmoothing, 14)]
#[case(ModelKind::WeightedMovingAverage, 4)]
#[case(ModelKind::DoubleExponentialSmoothing, 3)]
fn test_minimum_observations(#[case] kind: ModelKind, #[case] minimum: usize) {
    let mut model = kind.build(&ModelConfig::default()).unwrap();
    assert_eq!(model.min_observations(), minimum);

    match model.fit(&wavy(minimum - 1)) {
        Err(ForecastError::InsufficientData {
            model,
            required,
            actual,
        }) => {
            assert_eq!(model, kind.name());
            assert_eq!(required, minimum);
            assert_eq!(actual, minimum - 1);
        }
        other => panic!("expected InsufficientData, got {:?}", other),
    }

    let fit = model.fit(&wavy(minimum)).unwrap();
    assert!(!fit.fitted.is_empty());
    assert_eq!(fit.offset + fit.fitted.len(), minimum);
}

#[rstest]
fn test_multi_step_forecasts_are_finite(
    #[values(
        ModelKind::Olympic,
        ModelKind::MovingAverage,
        ModelKind::LinearRegression,
        ModelKind::NaiveForecasting,
        ModelKind::PolynomialRegression,
        ModelKind::SimpleExponentialSmoothing,
        ModelKind::TripleExponentialSmoothing,
        ModelKind::WeightedMovingAverage,
        ModelKind::DoubleExponentialSmoothing
    )]
    kind: ModelKind,
) {
    let mut model = kind.build(&ModelConfig::default()).unwrap();
    model.fit(&wavy(60)).unwrap();

    for steps in 1..=30 {
        assert!(model.forecast(steps).unwrap().is_finite());
    }
    assert!(model.forecast(0).is_err());
}

#[test]
fn test_refit_replaces_previous_state() {
    let mut model = ModelKind::NaiveForecasting
        .build(&ModelConfig::default())
        .unwrap();

    model.fit(&[1.0, 2.0]).unwrap();
    model.fit(&[5.0, 7.0, 9.0]).unwrap();

    assert_eq!(model.forecast(1).unwrap(), 9.0);
}

#[test]
fn test_configured_olympic_window() {
    let mut config = ModelConfig::default();
    config.olympic.window = 12;
    config.olympic.cycles = 3;

    let mut model = ModelKind::Olympic.build(&config).unwrap();
    let values: Vec<f64> = (0..36).map(|i| (i % 12) as f64).collect();
    let fit = model.fit(&values).unwrap();

    assert_eq!(fit.offset, 12);
    assert!(fit.fitted.iter().zip(&values[12..]).all(|(f, v)| f == v));
    assert_eq!(model.forecast(1).unwrap(), 0.0);
    assert_eq!(model.forecast(12).unwrap(), 11.0);
}
