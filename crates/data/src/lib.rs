pub mod csv_store;
pub mod json_cache;
pub mod layered;
pub mod memory;
pub mod players;
pub mod sinks;

pub use csv_store::CsvGameLogStore;
pub use json_cache::JsonFileCache;
pub use layered::{GameLogTier, LayeredGameLogSource};
pub use memory::InMemoryGameLogStore;
pub use players::PlayerDirectory;
pub use sinks::{CsvPredictionSink, MemoryPredictionSink, NullPredictionSink};
