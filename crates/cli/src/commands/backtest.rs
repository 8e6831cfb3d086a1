//! Player-prop backtest CLI command.
//!
//! Replays one player's game logs over a date range, prints the summary and
//! optionally writes the per-game results artifact.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::Args;

use nba_props_backtest::{format_text_report, write_results_csv, BacktestConfig, BacktestEngine};
use nba_props_core::{ConfigLoader, DataConfig, PredictionSink, StatType};
use nba_props_data::{
    CsvGameLogStore, CsvPredictionSink, JsonFileCache, LayeredGameLogSource, NullPredictionSink,
    PlayerDirectory,
};

/// Arguments for the backtest command.
#[derive(Args, Debug, Clone)]
pub struct BacktestArgs {
    /// Player full name (e.g. "LeBron James")
    #[arg(long)]
    pub player: String,

    /// First game date evaluated (YYYY-MM-DD)
    #[arg(long)]
    pub start: String,

    /// Last game date evaluated (YYYY-MM-DD)
    #[arg(long)]
    pub end: String,

    /// Stat to predict: points, assists, rebounds (default from config)
    #[arg(long)]
    pub stat: Option<String>,

    /// Fixed sportsbook line; omit to use the model estimate
    #[arg(long)]
    pub line: Option<f64>,

    /// Rolling window size (default from config)
    #[arg(long)]
    pub window: Option<usize>,

    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Write per-game results CSV to this path
    #[arg(long)]
    pub output: Option<String>,

    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Append predictions to this CSV (overrides config)
    #[arg(long)]
    pub predictions: Option<String>,
}

/// Output format for backtest reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parses an output format from string.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!(
                "Unknown format: '{}'. Valid formats: text, json",
                s
            )),
        }
    }
}

/// Parses a `YYYY-MM-DD` date argument.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Expected YYYY-MM-DD", s))
}

/// Builds the game-log lookup: JSON cache first, then the CSV exports.
pub fn build_source(data: &DataConfig) -> Result<LayeredGameLogSource> {
    let directory = PlayerDirectory::from_csv(&data.players_file)
        .with_context(|| format!("Failed to load player directory {}", data.players_file))?;
    let source = LayeredGameLogSource::new(directory)
        .with_tier(Box::new(JsonFileCache::new(&data.cache_dir)))
        .with_tier(Box::new(CsvGameLogStore::new(&data.games_dir)));
    tracing::debug!(tiers = ?source.tier_names(), "Game log source ready");
    Ok(source)
}

/// Runs the backtest command.
pub fn run_backtest(args: BacktestArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;
    let start = parse_date(&args.start)?;
    let end = parse_date(&args.end)?;

    let app_config = ConfigLoader::load_from(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;

    let mut config = BacktestConfig::from_defaults(start, end, &app_config.backtest);
    if let Some(stat) = &args.stat {
        config.stat_type = stat.parse::<StatType>()?;
    }
    if let Some(line) = args.line {
        config = config.with_line(line);
    }
    let window = args.window.unwrap_or(app_config.backtest.window);

    tracing::info!(
        player = %args.player,
        start = %start,
        end = %end,
        stat = %config.stat_type,
        window,
        "Running player-prop backtest"
    );

    let data = &app_config.data;
    let source = build_source(data)?;

    let predictions = args
        .predictions
        .clone()
        .or_else(|| Some(data.predictions_file.clone()).filter(|p| !p.is_empty()));
    let sink: Box<dyn PredictionSink> = match &predictions {
        Some(path) => {
            tracing::info!("Recording predictions to {}", path);
            Box::new(CsvPredictionSink::new(path))
        }
        None => Box::new(NullPredictionSink),
    };

    let mut engine = BacktestEngine::new(config, Box::new(source), sink)?;
    tracing::debug!(
        start = %engine.config().start,
        end = %engine.config().end,
        lookback = engine.config().lookback_games,
        "Validated backtest period"
    );
    let run = engine.run_backtest(&args.player, window)?;

    tracing::info!(
        games = run.summary.total_games,
        bets = run.summary.bets_made,
        "Backtest complete"
    );

    match format {
        OutputFormat::Text => {
            println!("{}", format_text_report(&run));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&run)?;
            println!("{}", json);
        }
    }

    if let Some(output_path) = &args.output {
        write_results_csv(Path::new(output_path), &run.records)?;
        tracing::info!("Results written to {}", output_path);
    }

    Ok(())
}
