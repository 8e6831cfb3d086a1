//! CLI commands for the player-prop backtester.

pub mod backtest;
pub mod benchmark;
pub mod predict;

pub use backtest::{run_backtest, BacktestArgs};
pub use benchmark::{run_benchmark, BenchmarkArgs};
pub use predict::{run_predict, PredictArgs};
