//! Single-game points projection CLI command.
//!
//! Projects the next game from the player's most recent rolling window and
//! prices it against the book's line, odds, spread and opponent defense.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::json;

use nba_props_backtest::synthetic::stable_seed;
use nba_props_backtest::{
    format_projection_report, project_points, Matchup, Projection, RollingFeatures,
    DEFAULT_SIMULATIONS,
};
use nba_props_core::{ConfigLoader, GameLogSource, PlayerHistory};

use super::backtest::{build_source, parse_date, OutputFormat};

/// Arguments for the predict command.
#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// Player full name (e.g. "LeBron James")
    #[arg(long)]
    pub player: String,

    /// Points line offered by the book
    #[arg(long)]
    pub line: f64,

    /// American odds on the over (default: -110)
    #[arg(long, default_value = "-110", allow_hyphen_values = true)]
    pub odds: i32,

    /// Vegas spread for the player's team; the sign is ignored
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub spread: f64,

    /// Opponent defensive rating (default: league average 113.0)
    #[arg(long, default_value = "113.0")]
    pub opp_def_rating: f64,

    /// Game date; only earlier games are used (default: today)
    #[arg(long)]
    pub date: Option<String>,

    /// Rolling window size (default from config)
    #[arg(long)]
    pub window: Option<usize>,

    /// Number of Monte Carlo draws
    #[arg(long, default_value_t = DEFAULT_SIMULATIONS)]
    pub simulations: usize,

    /// RNG seed (default: derived from the player name)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Loads the player's history and projects the game on `as_of`.
pub fn build_projection(args: &PredictArgs, as_of: NaiveDate) -> Result<Projection> {
    let app_config = ConfigLoader::load_from(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;
    let defaults = &app_config.backtest;
    let window = args.window.unwrap_or(defaults.window);

    let mut source = build_source(&app_config.data)?;
    let player_id = source.player_id(&args.player)?;
    let table = source.load_history(player_id, defaults.history_games)?;
    let history = PlayerHistory::new(player_id, table)?;

    let prior = history.prior_games(as_of, defaults.lookback_games);
    tracing::info!(
        player = %args.player,
        as_of = %as_of,
        games = prior.len(),
        window,
        "Projecting points"
    );

    let features = RollingFeatures::compute(&prior, window)
        .with_context(|| format!("Cannot build features for {}", args.player))?;
    let matchup = Matchup {
        line: args.line,
        odds: args.odds,
        spread: args.spread,
        opponent_def_rating: args.opp_def_rating,
    };
    let seed = args.seed.unwrap_or_else(|| stable_seed(&args.player));
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let projection = project_points(&features, matchup, args.simulations, &mut rng)
        .with_context(|| format!("Not enough games before {} for {}", as_of, args.player))?;
    Ok(projection)
}

/// Runs the predict command.
pub fn run_predict(args: PredictArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;
    let as_of = match &args.date {
        Some(date) => parse_date(date)?,
        None => Local::now().date_naive(),
    };

    let projection = build_projection(&args, as_of)?;

    match format {
        OutputFormat::Text => {
            println!("{}", format_projection_report(&args.player, &projection));
        }
        OutputFormat::Json => {
            let report = json!({
                "player": args.player,
                "date": as_of,
                "projection": projection,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_fixture(dir: &Path) -> String {
        let games_dir = dir.join("raw");
        std::fs::create_dir_all(&games_dir).unwrap();

        let mut csv = String::from("GAME_DATE,PTS,AST,REB,MIN\n");
        for i in 0..30u64 {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i);
            csv.push_str(&format!("{},{},7,8,35:00\n", date, 22 + (i % 9)));
        }
        std::fs::write(games_dir.join("2544.csv"), csv).unwrap();
        std::fs::write(dir.join("players.csv"), "player_id,full_name\n2544,LeBron James\n").unwrap();

        let config = format!(
            "[data]\ngames_dir = \"{}\"\ncache_dir = \"{}\"\nplayers_file = \"{}\"\n",
            games_dir.display(),
            dir.join("cache").display(),
            dir.join("players.csv").display()
        );
        let path = dir.join("Config.toml");
        std::fs::write(&path, config).unwrap();
        path.display().to_string()
    }

    fn args(config: String) -> PredictArgs {
        PredictArgs {
            player: "LeBron James".to_string(),
            line: 27.5,
            odds: -110,
            spread: -11.5,
            opp_def_rating: 112.5,
            date: None,
            window: Some(10),
            simulations: 5_000,
            seed: Some(7),
            config,
            format: "text".to_string(),
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn projection_uses_only_games_before_the_date() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(write_fixture(dir.path()));

        let projection = build_projection(&args, date(21)).unwrap();

        // Games on Jan 1..20 are usable; the last window ends at row 19.
        assert_eq!(projection.row, 19);
        assert!((projection.avg_minutes - 35.0).abs() < 1e-9);
        assert!((projection.projected_minutes - 35.0 * 0.88).abs() < 1e-9);
    }

    #[test]
    fn same_seed_same_projection() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(write_fixture(dir.path()));

        assert_eq!(
            build_projection(&args, date(25)).unwrap(),
            build_projection(&args, date(25)).unwrap()
        );
    }

    #[test]
    fn too_few_prior_games_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(write_fixture(dir.path()));

        assert!(build_projection(&args, date(5)).is_err());
    }

    #[test]
    fn run_predict_prints_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(write_fixture(dir.path()));
        args.format = "json".to_string();
        args.date = Some("2024-01-28".to_string());

        run_predict(args).unwrap();
    }
}
