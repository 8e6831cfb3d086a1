//! Baseline benchmark over synthetic players and several rolling windows.
//!
//! Every (window, player) pair runs a full backtest against in-memory logs, so
//! the benchmark exercises the same engine, features and policy as a real run.

#![allow(clippy::format_push_string)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use csv::Writer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use nba_props_core::{GameTable, PlayerId, StatType};
use nba_props_data::{
    InMemoryGameLogStore, LayeredGameLogSource, NullPredictionSink, PlayerDirectory,
};

use crate::engine::{BacktestConfig, BacktestEngine};
use crate::synthetic::{default_profiles, synthetic_history, SyntheticProfile};

/// Synthetic seasons start this many days before the benchmark period.
pub const SEASON_LEAD_DAYS: u64 = 61;

/// Minimum synthetic games generated per player.
pub const SEASON_GAMES: usize = 180;

/// Base of the synthetic player ids.
const FIRST_PLAYER_ID: u64 = 1000;

/// File name of the per-player CSV artifact.
pub const CSV_ARTIFACT: &str = "baseline_benchmark.csv";

/// File name of the markdown summary artifact.
pub const SUMMARY_ARTIFACT: &str = "baseline_benchmark_summary.md";

/// One (window, player) backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRow {
    pub player_name: String,
    pub window: usize,
    pub line_value: f64,
    pub total_games: usize,
    pub bets_made: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub roi: f64,
    pub total_profit: Decimal,
    pub brier_score: f64,
}

/// Averages for one window across players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub window: usize,
    pub avg_roi: f64,
    pub avg_win_rate: f64,
    pub total_bets: usize,
    pub total_games: usize,
}

/// Benchmark results, rows sorted by (window, player) and windows by ROI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub windows: Vec<usize>,
    pub players: Vec<String>,
    pub rows: Vec<BenchmarkRow>,
    pub summary: Vec<WindowSummary>,
}

impl BenchmarkReport {
    /// Window with the highest average ROI.
    #[must_use]
    pub fn best_window(&self) -> Option<usize> {
        self.summary.first().map(|s| s.window)
    }
}

/// Runs the default synthetic players through each window.
///
/// # Errors
/// Returns error if the period is invalid or a backtest fails.
pub fn run_baseline_benchmark(
    windows: &[usize],
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<BenchmarkReport> {
    run_benchmark_with_profiles(&default_profiles(), windows, start, end, today)
}

/// Runs the given synthetic players through each window.
///
/// # Errors
/// Returns error if the period is invalid or a backtest fails.
pub fn run_benchmark_with_profiles(
    profiles: &[(&str, SyntheticProfile)],
    windows: &[usize],
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<BenchmarkReport> {
    let first_game = start
        .checked_sub_days(Days::new(SEASON_LEAD_DAYS))
        .context("Benchmark start date is out of range")?;
    let span = usize::try_from((end - first_game).num_days() + 1).unwrap_or(0);
    let n_games = SEASON_GAMES.max(span);

    let store = InMemoryGameLogStore::new();
    let mut directory = PlayerDirectory::new();
    for (idx, (name, profile)) in profiles.iter().enumerate() {
        let id = PlayerId(FIRST_PLAYER_ID + idx as u64);
        let games = synthetic_history(name, profile, n_games, first_game)?;
        store.insert(id, GameTable::from_records(&games));
        directory.insert(id, name);
    }

    let mut rows = Vec::with_capacity(windows.len() * profiles.len());
    for &window in windows {
        for (name, profile) in profiles {
            let source = LayeredGameLogSource::new(directory.clone())
                .with_tier(Box::new(store.clone()));
            let config = BacktestConfig::new(start, end, StatType::Points)
                .with_line(profile.line)
                .with_history_games(n_games);
            let mut engine = BacktestEngine::with_today(
                config,
                Box::new(source),
                Box::new(NullPredictionSink),
                today,
            )?;

            let run = engine
                .run_backtest(name, window)
                .with_context(|| format!("Benchmark backtest failed for {name} (window {window})"))?;

            let summary = &run.summary;
            let bets = summary.bets.as_ref();
            rows.push(BenchmarkRow {
                player_name: (*name).to_string(),
                window,
                line_value: profile.line,
                total_games: summary.total_games,
                bets_made: summary.bets_made,
                wins: bets.map_or(0, |b| b.wins),
                losses: bets.map_or(0, |b| b.losses),
                win_rate: bets.map_or(0.0, |b| b.win_rate),
                roi: bets.map_or(0.0, |b| b.roi),
                total_profit: summary.total_profit(),
                brier_score: bets.map_or(0.0, |b| b.brier_score),
            });
        }
    }

    rows.sort_by(|a, b| {
        a.window
            .cmp(&b.window)
            .then_with(|| a.player_name.cmp(&b.player_name))
    });
    let summary = summarize_windows(&rows);

    if let Some(best) = summary.first() {
        info!(window = best.window, avg_roi = best.avg_roi, "Best window by average ROI");
    }

    Ok(BenchmarkReport {
        start,
        end,
        windows: windows.to_vec(),
        players: profiles.iter().map(|(name, _)| (*name).to_string()).collect(),
        rows,
        summary,
    })
}

fn summarize_windows(rows: &[BenchmarkRow]) -> Vec<WindowSummary> {
    let mut windows: Vec<usize> = rows.iter().map(|r| r.window).collect();
    windows.dedup();

    let mut summary: Vec<WindowSummary> = windows
        .into_iter()
        .map(|window| {
            let group: Vec<&BenchmarkRow> = rows.iter().filter(|r| r.window == window).collect();
            let n = group.len() as f64;
            WindowSummary {
                window,
                avg_roi: group.iter().map(|r| r.roi).sum::<f64>() / n,
                avg_win_rate: group.iter().map(|r| r.win_rate).sum::<f64>() / n,
                total_bets: group.iter().map(|r| r.bets_made).sum(),
                total_games: group.iter().map(|r| r.total_games).sum(),
            }
        })
        .collect();

    summary.sort_by(|a, b| b.avg_roi.total_cmp(&a.avg_roi));
    summary
}

/// Writes the per-player rows as CSV.
///
/// # Errors
/// Returns error if the file cannot be created or writing fails
pub fn write_benchmark_csv(path: &Path, report: &BenchmarkReport) -> Result<()> {
    let mut writer = Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    for row in &report.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Renders the markdown summary.
#[must_use]
pub fn benchmark_markdown(report: &BenchmarkReport) -> String {
    let mut out = String::new();
    out.push_str("# Baseline Benchmark Summary\n\n");
    out.push_str(
        "This benchmark uses deterministic synthetic player logs to validate the \
         end-to-end backtest pipeline offline.\n",
    );
    out.push_str(&format!("- Players: {}\n", report.players.join(", ")));
    let windows: Vec<String> = report.windows.iter().map(ToString::to_string).collect();
    out.push_str(&format!("- Windows tested: {}\n", windows.join(", ")));
    out.push_str(&format!("- Period: {} to {}\n", report.start, report.end));
    match report.best_window() {
        Some(window) => out.push_str(&format!("- Best window by avg ROI: {window}\n")),
        None => out.push_str("- Best window by avg ROI: n/a\n"),
    }

    out.push_str("\n## Window Averages\n\n");
    out.push_str("| window | avg_roi | avg_win_rate | total_bets | total_games |\n");
    out.push_str("|---|---|---|---|---|\n");
    for s in &report.summary {
        out.push_str(&format!(
            "| {} | {:.2} | {:.3} | {} | {} |\n",
            s.window, s.avg_roi, s.avg_win_rate, s.total_bets, s.total_games
        ));
    }

    out.push_str("\n## Per-Player Results\n\n");
    out.push_str(
        "| player_name | window | line_value | total_games | bets_made | wins | losses | win_rate | roi | total_profit | brier_score |\n",
    );
    out.push_str("|---|---|---|---|---|---|---|---|---|---|---|\n");
    for r in &report.rows {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {:.3} | {:.2} | {:.2} | {:.4} |\n",
            r.player_name,
            r.window,
            r.line_value,
            r.total_games,
            r.bets_made,
            r.wins,
            r.losses,
            r.win_rate,
            r.roi,
            r.total_profit,
            r.brier_score
        ));
    }
    out
}

/// Writes both artifacts into `dir`, returning their paths.
///
/// # Errors
/// Returns error if the directory or files cannot be written
pub fn write_benchmark_artifacts(dir: &Path, report: &BenchmarkReport) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let csv_path = dir.join(CSV_ARTIFACT);
    write_benchmark_csv(&csv_path, report)?;

    let summary_path = dir.join(SUMMARY_ARTIFACT);
    fs::write(&summary_path, benchmark_markdown(report))
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;

    Ok((csv_path, summary_path))
}
