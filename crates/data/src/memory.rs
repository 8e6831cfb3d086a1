use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use nba_props_core::{DataError, GameTable, PlayerId};

use crate::layered::GameLogTier;

/// Writable in-memory game-log tier.
///
/// Clones share the same storage, so a caller can keep a handle to a store
/// that has been moved into a [`LayeredGameLogSource`](crate::LayeredGameLogSource).
#[derive(Debug, Clone, Default)]
pub struct InMemoryGameLogStore {
    games: Arc<RwLock<HashMap<PlayerId, GameTable>>>,
}

impl InMemoryGameLogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_games(self, player: PlayerId, games: GameTable) -> Self {
        self.insert(player, games);
        self
    }

    pub fn insert(&self, player: PlayerId, games: GameTable) {
        self.games.write().insert(player, games);
    }

    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        self.games.read().contains_key(&player)
    }
}

impl GameLogTier for InMemoryGameLogStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self, player: PlayerId) -> Result<Option<GameTable>, DataError> {
        Ok(self.games.read().get(&player).cloned())
    }

    fn store(&mut self, player: PlayerId, games: &GameTable) -> Result<(), DataError> {
        self.insert(player, games.clone());
        Ok(())
    }

    fn is_writable(&self) -> bool {
        true
    }
}
