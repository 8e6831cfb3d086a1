//! Prediction sinks: CSV file, shared in-memory buffer, and a no-op sink.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;

use csv::WriterBuilder;
use parking_lot::Mutex;
use tracing::debug;

use nba_props_core::{PredictionRecord, PredictionSink, SinkError};

/// Appends predictions to a CSV file, writing the header only for a new file.
#[derive(Debug, Clone)]
pub struct CsvPredictionSink {
    path: PathBuf,
}

impl CsvPredictionSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PredictionSink for CsvPredictionSink {
    fn record(&mut self, prediction: &PredictionRecord) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let needs_header = fs::metadata(&self.path).map_or(true, |m| m.len() == 0);

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = WriterBuilder::new().has_headers(needs_header).from_writer(file);
        writer
            .serialize(prediction)
            .map_err(|e| SinkError::Csv(e.to_string()))?;
        writer.flush()?;

        debug!(path = %self.path.display(), date = %prediction.game_date, "Recorded prediction");
        Ok(())
    }
}

/// Keeps predictions in memory. Clones share the buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryPredictionSink {
    records: Arc<Mutex<Vec<PredictionRecord>>>,
}

impl MemoryPredictionSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> Vec<PredictionRecord> {
        self.records.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl PredictionSink for MemoryPredictionSink {
    fn record(&mut self, prediction: &PredictionRecord) -> Result<(), SinkError> {
        self.records.lock().push(prediction.clone());
        Ok(())
    }
}

/// Discards every prediction.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPredictionSink;

impl PredictionSink for NullPredictionSink {
    fn record(&mut self, _prediction: &PredictionRecord) -> Result<(), SinkError> {
        Ok(())
    }
}
