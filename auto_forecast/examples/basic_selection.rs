use auto_forecast::{AutoForecastConfig, AutoForecastModel, DataSequence, LastChosenModel};
use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Auto Forecast: Basic Selection Example");
    println!("======================================\n");

    // Two years of weekly data with a 13-week season on top of a slow trend
    let start = Utc.with_ymd_and_hms(2022, 1, 3, 0, 0, 0).unwrap();
    let values: Vec<f64> = (0..104)
        .map(|i| {
            let week = i as f64;
            100.0 + 0.2 * week + 8.0 * (2.0 * std::f64::consts::PI * week / 13.0).sin()
        })
        .collect();
    let history = DataSequence::from_values(start, Duration::weeks(1), &values)?;
    println!("Sample data created: {} weekly points\n", history.len());

    let mut config = AutoForecastConfig::default();
    config.models.olympic.window = 13;
    config.models.olympic.cycles = 3;
    config.models.triple_exponential.period = 13;

    let reporter = Arc::new(LastChosenModel::new());
    let mut model = AutoForecastModel::new(config)?.with_reporter(reporter.clone());

    println!("Training candidates...");
    let selection = model.train(&history)?;
    println!("{}", selection);
    println!(
        "Reporter saw: {}\n",
        reporter.last().unwrap_or_else(|| "nothing".to_string())
    );

    let mut horizon = history.horizon(8)?;
    model.predict(&mut horizon)?;
    println!("Forecast for the next 8 weeks:");
    for point in horizon.points() {
        println!("  {}  {:.2}", point.timestamp.format("%Y-%m-%d"), point.value);
    }

    println!("\nPersisted model:\n{}", model.to_json()?);
    Ok(())
}
