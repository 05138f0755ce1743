use anyhow::{Context, Result};
use auto_forecast::{AutoForecastConfig, AutoForecastModel, DataLoader};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Select the best forecasting model for a series and forecast it", long_about = None)]
struct Cli {
    /// CSV file with a timestamp column and a value column
    #[arg(long)]
    input: PathBuf,

    /// JSON configuration; defaults apply to anything omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of future points to forecast
    #[arg(long, default_value_t = 5)]
    horizon: usize,

    /// Write the chosen model to this JSON file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Train candidates one after another instead of in parallel
    #[arg(long, default_value_t = false)]
    sequential: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();
    log::debug!("Parsed arguments: {:?}", args);

    let mut config = match &args.config {
        Some(path) => AutoForecastConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration {:?}", path))?,
        None => AutoForecastConfig::default(),
    };
    if args.sequential {
        config.selection.parallel = false;
    }

    let history = DataLoader::from_csv(&args.input)
        .with_context(|| format!("Failed to load series {:?}", args.input))?;
    log::info!("Loaded {} observations from {:?}", history.len(), args.input);

    let mut model = AutoForecastModel::new(config)?;
    let selection = model.train(&history)?;
    println!("{}", selection);
    println!("Selected: {} ({})", selection.winner, selection.metrics);

    let mut horizon = history.horizon(args.horizon)?;
    model.predict(&mut horizon)?;
    for point in horizon.points() {
        println!("{}\t{:.6}", point.timestamp.to_rfc3339(), point.value);
    }

    if let Some(path) = &args.save {
        std::fs::write(path, model.to_json()?)
            .with_context(|| format!("Failed to write model {:?}", path))?;
        log::info!("Saved {} to {:?}", model.name(), path);
    }

    Ok(())
}
