//! Chronological, point-in-time view of one player's game log.
//!
//! `PlayerHistory` is the only way the backtest engine reads games. Every
//! training query goes through [`PlayerHistory::prior_games`], which returns
//! rows dated strictly before the requested date and never anything after.

use std::ops::Range;

use chrono::NaiveDate;

use crate::error::DataError;
use crate::game::PlayerId;
use crate::table::GameTable;

/// Games for one player, strictly increasing by date.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerHistory {
    player_id: PlayerId,
    table: GameTable,
}

impl PlayerHistory {
    /// Sorts `table` by date and validates that dates are unique.
    ///
    /// # Errors
    /// Returns `DataError::DuplicateGameDate` if two games share a date.
    pub fn new(player_id: PlayerId, table: GameTable) -> Result<Self, DataError> {
        let table = table.sorted_by_date();
        if let Some(pair) = table.dates().windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(DataError::DuplicateGameDate(pair[0]));
        }
        Ok(Self { player_id, table })
    }

    #[must_use]
    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    #[must_use]
    pub fn table(&self) -> &GameTable {
        &self.table
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        self.table.dates()
    }

    /// Row indices of games dated within `[start, end]` inclusive.
    #[must_use]
    pub fn rows_between(&self, start: NaiveDate, end: NaiveDate) -> Range<usize> {
        let dates = self.dates();
        let first = dates.partition_point(|d| *d < start);
        let last = dates.partition_point(|d| *d <= end);
        first..last.max(first)
    }

    /// Number of games dated strictly before `date`.
    #[must_use]
    pub fn count_before(&self, date: NaiveDate) -> usize {
        self.dates().partition_point(|d| *d < date)
    }

    /// The most recent `max_games` games dated strictly before `date`.
    ///
    /// CRITICAL: rows dated on or after `date` are never included.
    #[must_use]
    pub fn prior_games(&self, date: NaiveDate, max_games: usize) -> GameTable {
        let end = self.count_before(date);
        let start = end.saturating_sub(max_games);
        self.table.slice(start..end)
    }

    /// Value of `column` at `row`, if present.
    #[must_use]
    pub fn value(&self, column: &str, row: usize) -> Option<f64> {
        self.table.column(column).and_then(|values| values.get(row).copied().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameRecord;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn history(days: &[u32]) -> PlayerHistory {
        let records: Vec<GameRecord> = days
            .iter()
            .map(|&d| GameRecord::new(date(d), f64::from(d), 5.0, 6.0, 30.0))
            .collect();
        PlayerHistory::new(PlayerId(1), GameTable::from_records(&records)).unwrap()
    }

    #[test]
    fn new_sorts_games_ascending() {
        let h = history(&[5, 1, 3]);
        assert_eq!(h.dates(), &[date(1), date(3), date(5)]);
        assert_eq!(h.value("points", 0), Some(1.0));
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let records = vec![
            GameRecord::new(date(2), 10.0, 1.0, 1.0, 30.0),
            GameRecord::new(date(2), 12.0, 1.0, 1.0, 30.0),
        ];
        let err = PlayerHistory::new(PlayerId(1), GameTable::from_records(&records)).unwrap_err();
        assert!(matches!(err, DataError::DuplicateGameDate(d) if d == date(2)));
    }

    #[test]
    fn rows_between_is_inclusive_on_both_ends() {
        let h = history(&[1, 2, 4, 6, 9]);
        assert_eq!(h.rows_between(date(2), date(6)), 1..4);
        assert_eq!(h.rows_between(date(3), date(5)), 2..3);
    }

    #[test]
    fn rows_between_is_empty_outside_history() {
        let h = history(&[10, 11]);
        assert!(h.rows_between(date(1), date(5)).is_empty());
        assert!(h.rows_between(date(20), date(25)).is_empty());
    }

    #[test]
    fn prior_games_excludes_same_day_and_future() {
        let h = history(&[1, 2, 3, 4, 5]);
        let prior = h.prior_games(date(3), 50);

        assert_eq!(prior.dates(), &[date(1), date(2)]);
        assert!(prior.dates().iter().all(|d| *d < date(3)));
    }

    #[test]
    fn prior_games_bounded_to_most_recent() {
        let h = history(&[1, 2, 3, 4, 5, 6]);
        let prior = h.prior_games(date(6), 3);
        assert_eq!(prior.dates(), &[date(3), date(4), date(5)]);
    }

    #[test]
    fn prior_games_on_first_date_is_empty() {
        let h = history(&[4, 5]);
        assert!(h.prior_games(date(4), 50).is_empty());
    }
}
