//! Full-name to player-id directory.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use nba_props_core::{DataError, PlayerId};

#[derive(Debug, Deserialize)]
struct PlayerRow {
    player_id: u64,
    full_name: String,
}

/// Case-insensitive exact-match lookup of players by full name.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    by_name: HashMap<String, PlayerId>,
}

impl PlayerDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a player, returning the directory for chaining.
    #[must_use]
    pub fn with_player(mut self, id: PlayerId, full_name: &str) -> Self {
        self.insert(id, full_name);
        self
    }

    pub fn insert(&mut self, id: PlayerId, full_name: &str) {
        self.by_name.insert(Self::key(full_name), id);
    }

    /// Loads a directory from a CSV with `player_id,full_name` columns.
    ///
    /// # Errors
    /// Returns `DataError::Csv` if the file cannot be read or parsed.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let mut reader = csv::Reader::from_path(path.as_ref())
            .map_err(|e| DataError::Csv(format!("{}: {e}", path.as_ref().display())))?;

        let mut directory = Self::new();
        for row in reader.deserialize::<PlayerRow>() {
            let row = row.map_err(|e| DataError::Csv(e.to_string()))?;
            directory.insert(PlayerId(row.player_id), &row.full_name);
        }
        Ok(directory)
    }

    /// Resolves a full name.
    ///
    /// # Errors
    /// Returns `DataError::PlayerNotFound` if no player matches.
    pub fn lookup(&self, full_name: &str) -> Result<PlayerId, DataError> {
        self.by_name
            .get(&Self::key(full_name))
            .copied()
            .ok_or_else(|| DataError::PlayerNotFound(full_name.to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    fn key(full_name: &str) -> String {
        full_name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
    }
}
