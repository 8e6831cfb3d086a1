use std::fs;
use std::path::PathBuf;

use nba_props_core::{DataError, GameRecord, GameTable, PlayerId};

use crate::layered::GameLogTier;

/// On-disk JSON cache of game logs (`<dir>/<player_id>_gamelogs.json`).
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    dir: PathBuf,
}

impl JsonFileCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, player: PlayerId) -> PathBuf {
        self.dir.join(format!("{player}_gamelogs.json"))
    }
}

impl GameLogTier for JsonFileCache {
    fn name(&self) -> &str {
        "json-cache"
    }

    fn load(&self, player: PlayerId) -> Result<Option<GameTable>, DataError> {
        let path = self.path_for(player);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let records: Vec<GameRecord> =
            serde_json::from_slice(&bytes).map_err(|e| DataError::Json(format!("{}: {e}", path.display())))?;
        Ok(Some(GameTable::from_records(&records)))
    }

    fn store(&mut self, player: PlayerId, games: &GameTable) -> Result<(), DataError> {
        let records = games.to_records()?;
        let json = serde_json::to_vec_pretty(&records).map_err(|e| DataError::Json(e.to_string()))?;

        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(player), json)?;
        Ok(())
    }

    fn is_writable(&self) -> bool {
        true
    }
}
