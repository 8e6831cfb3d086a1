use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use nba_props_backtest::{
    format_text_report, write_results_csv, BacktestConfig, BacktestEngine, BacktestRun,
};
use nba_props_core::{
    GameRecord, GameTable, PlayerHistory, PlayerId, PredictionRecord, PredictionSink, SinkError,
    StatType,
};
use nba_props_data::{
    CsvGameLogStore, CsvPredictionSink, InMemoryGameLogStore, JsonFileCache, LayeredGameLogSource,
    MemoryPredictionSink, NullPredictionSink, PlayerDirectory,
};

// ============================================================
// Test Helpers
// ============================================================

const LEBRON: PlayerId = PlayerId(2544);

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn today() -> NaiveDate {
    d(2025, 6, 1)
}

fn memory_source(records: &[GameRecord]) -> LayeredGameLogSource {
    let store = InMemoryGameLogStore::new().with_games(LEBRON, GameTable::from_records(records));
    LayeredGameLogSource::new(PlayerDirectory::new().with_player(LEBRON, "LeBron James"))
        .with_tier(Box::new(store))
}

/// 70 daily games from 2024-01-01 with periodic scoring.
fn periodic_season() -> Vec<GameRecord> {
    (0..70)
        .map(|i| {
            GameRecord::new(
                d(2024, 1, 1) + Days::new(i as u64),
                20.0 + (i % 12) as f64,
                5.0 + (i % 6) as f64,
                6.0 + (i % 7) as f64,
                30.0 + (i % 4) as f64,
            )
        })
        .collect()
}

fn random_season(rng: &mut ChaCha8Rng, n: usize) -> Vec<GameRecord> {
    let mut date = d(2023, 10, 1);
    (0..n)
        .map(|_| {
            date = date + Days::new(rng.gen_range(1..4));
            random_game(rng, date)
        })
        .collect()
}

fn random_game(rng: &mut ChaCha8Rng, date: NaiveDate) -> GameRecord {
    GameRecord::new(
        date,
        rng.gen_range(5.0..45.0),
        rng.gen_range(0.0..14.0),
        rng.gen_range(0.0..16.0),
        rng.gen_range(18.0..42.0),
    )
}

struct RejectingSink {
    attempts: Arc<AtomicUsize>,
}

impl PredictionSink for RejectingSink {
    fn record(&mut self, _prediction: &PredictionRecord) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::Rejected("prediction store offline".to_string()))
    }
}

fn run(
    config: BacktestConfig,
    records: &[GameRecord],
    sink: Box<dyn PredictionSink>,
    window: usize,
) -> BacktestRun {
    let mut engine =
        BacktestEngine::with_today(config, Box::new(memory_source(records)), sink, today())
            .expect("valid config");
    engine.run_backtest("LeBron James", window).expect("backtest runs")
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn periodic_season_places_bets_and_records_every_prediction() {
    let sink = MemoryPredictionSink::new();
    let config =
        BacktestConfig::new(d(2024, 2, 1), d(2024, 3, 5), StatType::Points).with_line(18.5);

    let result = run(config, &periodic_season(), Box::new(sink.clone()), 5);

    assert!(result.summary.total_games > 0);
    assert!(result.summary.bets_made > 0);
    assert!(result.summary.roi().is_some());
    assert_eq!(result.skipped_games, 0);
    assert_eq!(result.games_in_period, 34);
    assert_eq!(sink.len(), result.records.len());
    assert!(sink.records().iter().all(|p| p.line_value == 18.5));
}

#[test]
fn empty_period_reports_no_predictions() {
    let config = BacktestConfig::new(d(2024, 6, 1), d(2024, 7, 1), StatType::Points);

    let result = run(config, &periodic_season(), Box::new(NullPredictionSink), 5);

    assert_eq!(result.summary.total_games, 0);
    assert_eq!(result.summary.bets_made, 0);
    assert!(!result.summary.has_predictions());
    assert!(format_text_report(&result).contains("No predictions made in this period"));
}

#[test]
fn failing_sink_never_aborts_the_run() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let sink = RejectingSink {
        attempts: Arc::clone(&attempts),
    };
    let config =
        BacktestConfig::new(d(2024, 2, 1), d(2024, 3, 5), StatType::Points).with_line(18.5);

    let result = run(config, &periodic_season(), Box::new(sink), 5);

    assert_eq!(result.records.len(), 34);
    assert_eq!(result.sink_failures, 34);
    assert_eq!(attempts.load(Ordering::SeqCst), 34);
    assert!(format_text_report(&result).contains("34 predictions could not be recorded"));
}

#[test]
fn assists_backtest_uses_assists_column() {
    let sink = MemoryPredictionSink::new();
    let config =
        BacktestConfig::new(d(2024, 2, 1), d(2024, 3, 5), StatType::Assists).with_line(7.5);

    let result = run(config, &periodic_season(), Box::new(sink.clone()), 6);

    assert!(result.records.iter().all(|r| (5.0..=10.0).contains(&r.actual_value)));
    assert!(sink.records().iter().all(|p| p.stat_type == StatType::Assists));
}

// ============================================================
// No Look-Ahead
// ============================================================

#[test]
fn predictions_never_depend_on_games_on_or_after_their_date() {
    let mut rng = ChaCha8Rng::seed_from_u64(2544);

    for _ in 0..25 {
        let n = rng.gen_range(30..80);
        let season = random_season(&mut rng, n);
        let cut = rng.gen_range(1..n);
        let cut_date = season[cut].game_date;

        // Rewrite every game dated on or after the cut.
        let mut altered = season.clone();
        for game in altered.iter_mut().skip(cut) {
            *game = random_game(&mut rng, game.game_date);
        }

        let window = rng.gen_range(2..6);
        let lookback = rng.gen_range(window..=20);
        let mut config = BacktestConfig::new(
            season[0].game_date,
            season[n - 1].game_date,
            StatType::Points,
        )
        .with_lookback_games(lookback);
        if rng.gen_bool(0.5) {
            config = config.with_line(rng.gen_range(15.0..30.0));
        }

        let original = run(config.clone(), &season, Box::new(NullPredictionSink), window);
        let rewritten = run(config, &altered, Box::new(NullPredictionSink), window);

        let before = |r: &BacktestRun| -> Vec<_> {
            r.records
                .iter()
                .filter(|rec| rec.date() <= cut_date)
                .map(|rec| rec.prediction)
                .collect()
        };
        assert_eq!(before(&original), before(&rewritten));

        let settled_before = |r: &BacktestRun| -> Vec<_> {
            r.records
                .iter()
                .filter(|rec| rec.date() < cut_date)
                .cloned()
                .collect()
        };
        assert_eq!(settled_before(&original), settled_before(&rewritten));
    }
}

#[test]
fn predict_game_ignores_same_day_and_later_rows() {
    let mut rng = ChaCha8Rng::seed_from_u64(23);
    let season = random_season(&mut rng, 40);
    let engine = BacktestEngine::with_today(
        BacktestConfig::new(season[0].game_date, season[39].game_date, StatType::Rebounds),
        Box::new(memory_source(&season)),
        Box::new(NullPredictionSink),
        today(),
    )
    .unwrap();

    for cut in 5..40 {
        let mut altered = season.clone();
        for game in altered.iter_mut().skip(cut) {
            *game = random_game(&mut rng, game.game_date);
        }
        let a = PlayerHistory::new(LEBRON, GameTable::from_records(&season)).unwrap();
        let b = PlayerHistory::new(LEBRON, GameTable::from_records(&altered)).unwrap();
        let date = season[cut].game_date;

        assert_eq!(
            engine.predict_game(&a, date, 4).unwrap(),
            engine.predict_game(&b, date, 4).unwrap()
        );
    }
}

// ============================================================
// File-Backed Pipeline
// ============================================================

#[test]
fn csv_logs_flow_through_cache_sink_and_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let games_dir = dir.path().join("raw");
    let cache_dir = dir.path().join("cache");
    fs::create_dir_all(&games_dir).unwrap();

    // Provider-style export, newest game first.
    let mut csv = String::from("GAME_DATE,PTS,AST,REB,MIN\n");
    for i in (0..40u64).rev() {
        let date = d(2024, 11, 1) + Days::new(i);
        csv.push_str(&format!(
            "{},{},{},{},{}:30\n",
            date,
            22 + (i % 9),
            6 + (i % 4),
            7 + (i % 5),
            31 + (i % 5)
        ));
    }
    fs::write(games_dir.join("2544.csv"), csv).unwrap();
    fs::write(
        dir.path().join("players.csv"),
        "player_id,full_name\n2544,LeBron James\n201939,Stephen Curry\n",
    )
    .unwrap();

    let directory = PlayerDirectory::from_csv(dir.path().join("players.csv")).unwrap();
    let source = LayeredGameLogSource::new(directory)
        .with_tier(Box::new(JsonFileCache::new(&cache_dir)))
        .with_tier(Box::new(CsvGameLogStore::new(&games_dir)));
    let predictions = dir.path().join("out/predictions.csv");

    let config = BacktestConfig::new(d(2024, 11, 20), d(2024, 12, 10), StatType::Points)
        .with_line(25.5)
        .with_history_games(40)
        .with_lookback_games(15);
    let mut engine = BacktestEngine::with_today(
        config,
        Box::new(source),
        Box::new(CsvPredictionSink::new(&predictions)),
        today(),
    )
    .unwrap();

    let result = engine.run_backtest("lebron james", 5).unwrap();

    assert_eq!(result.player_id, LEBRON);
    assert_eq!(result.records.len(), 21);
    assert!(cache_dir.join("2544_gamelogs.json").exists());

    let logged = fs::read_to_string(&predictions).unwrap();
    assert_eq!(logged.lines().count(), 22);

    let artifact = dir.path().join("out/results.csv");
    write_results_csv(&artifact, &result.records).unwrap();
    let text = fs::read_to_string(&artifact).unwrap();
    assert!(text.starts_with("date,predicted_mean,predicted_std,prob_over,line"));
    assert_eq!(text.lines().count(), 22);
}
