pub mod config;
pub mod config_loader;
pub mod error;
pub mod game;
pub mod history;
pub mod odds;
pub mod probability;
pub mod stats;
pub mod table;
pub mod traits;

pub use config::{AppConfig, BacktestDefaults, DataConfig};
pub use config_loader::ConfigLoader;
pub use error::{ConfigError, DataError, SinkError};
pub use game::{GameRecord, PlayerId, StatType};
pub use history::PlayerHistory;
pub use probability::prob_over;
pub use table::GameTable;
pub use traits::{GameLogSource, PredictionRecord, PredictionSink};
