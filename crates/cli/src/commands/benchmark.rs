//! Synthetic baseline benchmark CLI command.

use std::path::Path;

use anyhow::{bail, Result};
use chrono::Local;
use clap::Args;

use nba_props_backtest::{run_baseline_benchmark, write_benchmark_artifacts};

use super::backtest::parse_date;

/// Arguments for the benchmark command.
#[derive(Args, Debug, Clone)]
pub struct BenchmarkArgs {
    /// Comma-separated rolling windows to compare
    #[arg(long, value_delimiter = ',', default_values_t = [7, 10])]
    pub windows: Vec<usize>,

    /// First game date evaluated (YYYY-MM-DD)
    #[arg(long, default_value = "2024-12-01")]
    pub start: String,

    /// Last game date evaluated (YYYY-MM-DD)
    #[arg(long, default_value = "2025-03-15")]
    pub end: String,

    /// Directory for the CSV and markdown artifacts
    #[arg(long, default_value = "artifacts")]
    pub output_dir: String,
}

/// Runs the benchmark command.
pub fn run_benchmark(args: BenchmarkArgs) -> Result<()> {
    if args.windows.is_empty() {
        bail!("At least one window is required");
    }
    let start = parse_date(&args.start)?;
    let end = parse_date(&args.end)?;

    tracing::info!(
        windows = ?args.windows,
        start = %start,
        end = %end,
        "Running baseline benchmark"
    );

    let report = run_baseline_benchmark(&args.windows, start, end, Local::now().date_naive())?;
    let (csv_path, summary_path) = write_benchmark_artifacts(Path::new(&args.output_dir), &report)?;

    println!("\nBaseline benchmark {} to {}", report.start, report.end);
    println!("---------------------------------------------------------------");
    for summary in &report.summary {
        println!(
            "window={:<3} avg_roi={:>7.2}%  avg_win_rate={:>6.2}%  bets={:<4} games={}",
            summary.window,
            summary.avg_roi * 100.0,
            summary.avg_win_rate * 100.0,
            summary.total_bets,
            summary.total_games
        );
    }
    if let Some(best) = report.best_window() {
        println!("\nBest window by average ROI: {}", best);
    }
    println!("\nWrote {}", csv_path.display());
    println!("Wrote {}", summary_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(dir: &Path) -> BenchmarkArgs {
        BenchmarkArgs {
            windows: vec![7, 10],
            start: "2024-12-01".to_string(),
            end: "2025-01-15".to_string(),
            output_dir: dir.display().to_string(),
        }
    }

    #[test]
    fn writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        run_benchmark(args(dir.path())).unwrap();

        let csv = std::fs::read_to_string(dir.path().join("baseline_benchmark.csv")).unwrap();
        assert_eq!(csv.lines().count(), 7);
        assert!(dir.path().join("baseline_benchmark_summary.md").exists());
    }

    #[test]
    fn rejects_empty_window_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path());
        args.windows.clear();
        assert!(run_benchmark(args).is_err());
    }

    #[test]
    fn rejects_bad_dates() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path());
        args.start = "December 1".to_string();
        assert!(run_benchmark(args).is_err());
    }
}
