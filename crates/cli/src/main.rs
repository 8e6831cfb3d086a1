use clap::{Parser, Subcommand};

mod commands;

use commands::{BacktestArgs, BenchmarkArgs, PredictArgs};

#[derive(Parser)]
#[command(name = "nba-props")]
#[command(about = "Backtest NBA player-prop predictions against historical game logs", long_about = None)]
struct Cli {
    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay one player's games over a date range
    Backtest(BacktestArgs),
    /// Run the synthetic baseline benchmark across rolling windows
    Benchmark(BenchmarkArgs),
    /// Price one upcoming game against the book
    Predict(PredictArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Backtest(args) => commands::run_backtest(args)?,
        Commands::Benchmark(args) => commands::run_benchmark(args)?,
        Commands::Predict(args) => commands::run_predict(args)?,
    }

    Ok(())
}
