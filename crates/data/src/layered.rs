//! Layered game-log lookup: local store, file cache, then slower tiers.
//!
//! Tiers are consulted in order. The first tier that holds at least the
//! requested number of games serves the request, and every earlier writable
//! tier is back-filled with what it served. When no tier holds enough games
//! the largest partial log is returned with a warning, and back-filled the
//! same way.

use tracing::{debug, warn};

use nba_props_core::{DataError, GameLogSource, GameTable, PlayerId};

use crate::players::PlayerDirectory;

/// One level of the game-log lookup chain.
pub trait GameLogTier {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// All games this tier holds for the player, or `None` if it has none.
    ///
    /// # Errors
    /// Returns a `DataError` if the tier's storage cannot be read.
    fn load(&self, player: PlayerId) -> Result<Option<GameTable>, DataError>;

    /// Stores games for the player. Read-only tiers ignore this.
    ///
    /// # Errors
    /// Returns a `DataError` if the tier's storage cannot be written.
    fn store(&mut self, _player: PlayerId, _games: &GameTable) -> Result<(), DataError> {
        Ok(())
    }

    fn is_writable(&self) -> bool {
        false
    }
}

/// [`GameLogSource`] over a player directory and an ordered list of tiers.
pub struct LayeredGameLogSource {
    directory: PlayerDirectory,
    tiers: Vec<Box<dyn GameLogTier>>,
}

impl LayeredGameLogSource {
    #[must_use]
    pub fn new(directory: PlayerDirectory) -> Self {
        Self {
            directory,
            tiers: Vec::new(),
        }
    }

    /// Appends a tier behind the existing ones.
    #[must_use]
    pub fn with_tier(mut self, tier: Box<dyn GameLogTier>) -> Self {
        self.tiers.push(tier);
        self
    }

    #[must_use]
    pub fn tier_names(&self) -> Vec<&str> {
        self.tiers.iter().map(|t| t.name()).collect()
    }

    fn backfill(&mut self, served_by: usize, player: PlayerId, games: &GameTable) {
        for tier in self.tiers.iter_mut().take(served_by) {
            if !tier.is_writable() {
                continue;
            }
            if let Err(err) = tier.store(player, games) {
                warn!(tier = tier.name(), player = %player, error = %err, "Failed to back-fill game logs");
            }
        }
    }
}

impl GameLogSource for LayeredGameLogSource {
    fn player_id(&self, name: &str) -> Result<PlayerId, DataError> {
        self.directory.lookup(name)
    }

    fn load_history(&mut self, player: PlayerId, min_games: usize) -> Result<GameTable, DataError> {
        let mut partial: Option<(usize, GameTable)> = None;
        let mut last_error = None;

        for (idx, tier) in self.tiers.iter().enumerate() {
            match tier.load(player) {
                Ok(Some(games)) if games.len() >= min_games => {
                    debug!(tier = tier.name(), player = %player, games = games.len(), "Loaded game logs");
                    let games = games.sorted_by_date();
                    self.backfill(idx, player, &games);
                    return Ok(games.tail(min_games));
                }
                Ok(Some(games)) => {
                    let larger = partial.as_ref().map_or(true, |(_, best)| games.len() > best.len());
                    if larger {
                        partial = Some((idx, games));
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(tier = tier.name(), player = %player, error = %err, "Game log tier failed, trying next");
                    last_error = Some(err);
                }
            }
        }

        match (partial, last_error) {
            (Some((idx, games)), _) if !games.is_empty() => {
                warn!(
                    tier = self.tiers[idx].name(),
                    player = %player,
                    games = games.len(),
                    requested = min_games,
                    "Fewer games available than requested"
                );
                let games = games.sorted_by_date();
                self.backfill(idx, player, &games);
                Ok(games)
            }
            (_, Some(err)) => Err(err),
            _ => Err(DataError::NoGameLogs(player.0)),
        }
    }
}
