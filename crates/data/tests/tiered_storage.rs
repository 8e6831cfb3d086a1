use std::fs;
use std::path::Path;

use chrono::{Days, NaiveDate};

use nba_props_core::{
    DataError, GameLogSource, GameRecord, GameTable, PlayerId, PredictionRecord, PredictionSink,
    StatType,
};
use nba_props_data::{
    CsvGameLogStore, CsvPredictionSink, GameLogTier, InMemoryGameLogStore, JsonFileCache,
    LayeredGameLogSource, PlayerDirectory,
};

// ============================================================
// Fixtures
// ============================================================

const CURRY: PlayerId = PlayerId(201_939);

fn first_game() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 22).unwrap()
}

/// Provider-style export, newest first, `MM:SS` minutes.
fn write_provider_csv(dir: &Path, n: u64) {
    fs::create_dir_all(dir).unwrap();
    let mut csv = String::from("GAME_DATE,PTS,AST,REB,MIN\n");
    for i in (0..n).rev() {
        let date = first_game() + Days::new(i * 2);
        csv.push_str(&format!(
            "{}T00:00:00,{},{},{},{}:15\n",
            date,
            24 + (i % 8),
            5 + (i % 3),
            4 + (i % 5),
            32 + (i % 3)
        ));
    }
    fs::write(dir.join(format!("{CURRY}.csv")), csv).unwrap();
}

fn directory() -> PlayerDirectory {
    PlayerDirectory::new().with_player(CURRY, "Stephen Curry")
}

fn prediction(day: u32) -> PredictionRecord {
    PredictionRecord {
        player_id: CURRY,
        game_date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        stat_type: StatType::Points,
        predicted_mean: 27.4,
        predicted_std: 5.1,
        prob_over: 0.57,
        line_value: 26.5,
        book_odds: -110,
        expected_value: Some(0.088),
    }
}

// ============================================================
// Layered Lookup
// ============================================================

#[test]
fn csv_logs_are_cached_as_json_and_served_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw");
    let cache = dir.path().join("cache");
    write_provider_csv(&raw, 30);

    let mut source = LayeredGameLogSource::new(directory())
        .with_tier(Box::new(JsonFileCache::new(&cache)))
        .with_tier(Box::new(CsvGameLogStore::new(&raw)));

    let id = source.player_id("stephen  CURRY").unwrap();
    let from_csv = source.load_history(id, 20).unwrap();
    assert_eq!(from_csv.len(), 20);
    assert!(from_csv.dates().windows(2).all(|w| w[0] < w[1]));
    assert_eq!(from_csv.dates()[19], first_game() + Days::new(58));
    assert_eq!(from_csv.column("minutes").unwrap()[0], Some(32.25 + (10 % 3) as f64));

    // Drop the raw export; the cache now holds the full log.
    fs::remove_dir_all(&raw).unwrap();
    let cached = JsonFileCache::new(&cache).load(CURRY).unwrap().unwrap();
    assert_eq!(cached.len(), 30);

    let mut cache_only =
        LayeredGameLogSource::new(directory()).with_tier(Box::new(JsonFileCache::new(&cache)));
    assert_eq!(cache_only.load_history(CURRY, 20).unwrap(), from_csv);
}

#[test]
fn memory_tier_shields_slower_tiers() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw");
    write_provider_csv(&raw, 12);

    let memory = InMemoryGameLogStore::new();
    let mut source = LayeredGameLogSource::new(directory())
        .with_tier(Box::new(memory.clone()))
        .with_tier(Box::new(CsvGameLogStore::new(&raw)));

    source.load_history(CURRY, 10).unwrap();
    assert!(memory.contains(CURRY));

    fs::remove_dir_all(&raw).unwrap();
    assert_eq!(source.load_history(CURRY, 10).unwrap().len(), 10);
}

#[test]
fn too_few_games_returns_partial_history() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw");
    write_provider_csv(&raw, 8);

    let mut source =
        LayeredGameLogSource::new(directory()).with_tier(Box::new(CsvGameLogStore::new(&raw)));

    assert_eq!(source.load_history(CURRY, 50).unwrap().len(), 8);
}

#[test]
fn short_season_is_still_cached() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw");
    let cache = dir.path().join("cache");
    write_provider_csv(&raw, 70);

    let mut source = LayeredGameLogSource::new(directory())
        .with_tier(Box::new(JsonFileCache::new(&cache)))
        .with_tier(Box::new(CsvGameLogStore::new(&raw)));

    let served = source.load_history(CURRY, 200).unwrap();
    assert_eq!(served.len(), 70);

    let cache_file = JsonFileCache::new(&cache).path_for(CURRY);
    assert!(cache_file.exists());

    fs::remove_dir_all(&raw).unwrap();
    let mut cache_only =
        LayeredGameLogSource::new(directory()).with_tier(Box::new(JsonFileCache::new(&cache)));
    assert_eq!(cache_only.load_history(CURRY, 200).unwrap(), served);
}

#[test]
fn missing_everywhere_is_no_game_logs() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = LayeredGameLogSource::new(directory())
        .with_tier(Box::new(JsonFileCache::new(dir.path().join("cache"))));

    assert!(matches!(
        source.load_history(CURRY, 10),
        Err(DataError::NoGameLogs(201_939))
    ));
}

#[test]
fn canonical_csv_round_trips_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs.csv");
    let records: Vec<GameRecord> = (0..5u64)
        .map(|i| GameRecord::new(first_game() + Days::new(i), 30.0, 6.0, 5.0, 35.5))
        .collect();
    let table = GameTable::from_records(&records);

    CsvGameLogStore::write_file(&path, &table).unwrap();
    assert_eq!(CsvGameLogStore::read_file(&path).unwrap(), table);
}

// ============================================================
// Prediction Sink
// ============================================================

#[test]
fn csv_sink_appends_across_instances_with_one_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/predictions.csv");

    let mut first = CsvPredictionSink::new(&path);
    first.record(&prediction(3)).unwrap();
    first.record(&prediction(5)).unwrap();
    let mut second = CsvPredictionSink::new(&path);
    second.record(&prediction(7)).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "player_id");
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[2][1], "2025-01-07");
}

#[test]
fn player_directory_loads_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("players.csv");
    fs::write(
        &path,
        "player_id,full_name\n2544,LeBron James\n201939,Stephen Curry\n203999,Nikola Jokic\n",
    )
    .unwrap();

    let directory = PlayerDirectory::from_csv(&path).unwrap();
    assert_eq!(directory.len(), 3);
    assert_eq!(directory.lookup("nikola jokic").unwrap(), PlayerId(203_999));
    assert!(matches!(
        directory.lookup("Larry Bird"),
        Err(DataError::PlayerNotFound(_))
    ));
}
