pub mod benchmark;
pub mod engine;
pub mod error;
pub mod export;
pub mod features;
pub mod metrics;
pub mod outcome;
pub mod projection;
pub mod report;
pub mod synthetic;

pub use benchmark::{
    benchmark_markdown, run_baseline_benchmark, write_benchmark_artifacts, write_benchmark_csv,
    BenchmarkReport, BenchmarkRow, WindowSummary,
};
pub use engine::{
    BacktestConfig, BacktestEngine, BacktestRun, DEFAULT_HISTORY_GAMES, DEFAULT_LOOKBACK_GAMES,
};
pub use error::{BacktestError, FeatureError};
pub use export::write_results_csv;
pub use features::{RollingFeatures, StatEstimate};
pub use metrics::{BacktestSummary, BetStatistics};
pub use outcome::{
    evaluate, BetRecommendation, OutcomeRecord, PredictionPoint, Settlement, StatOutcome,
    EDGE_THRESHOLD, LOSS_STAKE, UNDER_THRESHOLD, WIN_PAYOUT,
};
pub use projection::{
    adjust_for_defense, monte_carlo_over, project_minutes, project_points, Matchup, Projection,
    DEFAULT_SIMULATIONS,
};
pub use report::{format_projection_report, format_text_report};
pub use synthetic::{default_profiles, synthetic_history, SyntheticProfile};
