//! Summary statistics over evaluated games.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use nba_props_core::stats::{mean, sample_std, wilson_ci};

use crate::outcome::{OutcomeRecord, StatOutcome, LOSS_STAKE};

/// z-score for a 95% Wilson interval.
const Z_95: f64 = 1.96;

/// Statistics that only exist once at least one bet was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetStatistics {
    // Counts
    /// Bets that matched the result.
    pub wins: usize,
    /// Bets that did not win, pushed bets included.
    pub losses: usize,
    /// Evaluated games (bet or not) that finished exactly on the line.
    pub pushes: usize,

    // Hit rates
    /// Fraction of bets that were correct.
    pub accuracy: f64,
    /// wins / bets.
    pub win_rate: f64,
    /// Wilson score 95% CI lower bound of the win rate.
    pub wilson_ci_lower: f64,
    /// Wilson score 95% CI upper bound of the win rate.
    pub wilson_ci_upper: f64,

    // Money
    /// Net profit over all bets.
    pub total_profit: Decimal,
    /// Net profit as a percentage of total amount risked.
    pub roi: f64,
    /// Worst peak-to-trough drop of cumulative profit.
    pub max_drawdown: Decimal,
    /// Longest run of losing bets.
    pub max_consecutive_losses: usize,

    // Calibration
    /// Per-bet Sharpe ratio scaled by sqrt(bets).
    pub sharpe_ratio: f64,
    /// Mean squared error of `prob_over` over every evaluated game.
    pub brier_score: f64,
    /// Mean `prob_over` over every evaluated game.
    pub avg_prob_over: f64,
}

/// Aggregate view of a backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    /// Evaluated games.
    pub total_games: usize,
    /// Games where the policy placed a bet.
    pub bets_made: usize,
    #[serde(flatten)]
    pub bets: Option<BetStatistics>,
}

impl BacktestSummary {
    /// Summarizes `records`. Bet statistics are omitted when no bets were made.
    #[must_use]
    pub fn from_records(records: &[OutcomeRecord]) -> Self {
        let bets: Vec<&OutcomeRecord> = records.iter().filter(|r| r.is_bet()).collect();

        if bets.is_empty() {
            return Self {
                total_games: records.len(),
                bets_made: 0,
                bets: None,
            };
        }

        let n = bets.len();
        let wins = bets.iter().filter(|r| r.correct).count();
        let pushes = records
            .iter()
            .filter(|r| r.result == StatOutcome::Push)
            .count();
        let win_rate = wins as f64 / n as f64;
        let (wilson_ci_lower, wilson_ci_upper) = wilson_ci(wins, n, Z_95);

        let total_profit: Decimal = bets.iter().map(|r| r.profit).sum();
        let risked = LOSS_STAKE * Decimal::from(n);
        let roi = (total_profit / risked * Decimal::ONE_HUNDRED)
            .to_f64()
            .unwrap_or(0.0);

        let returns: Vec<f64> = bets
            .iter()
            .map(|r| (r.profit / LOSS_STAKE).to_f64().unwrap_or(0.0))
            .collect();

        let probs: Vec<f64> = records.iter().map(|r| r.prediction.prob_over).collect();

        Self {
            total_games: records.len(),
            bets_made: n,
            bets: Some(BetStatistics {
                wins,
                losses: n - wins,
                pushes,
                accuracy: win_rate,
                win_rate,
                wilson_ci_lower,
                wilson_ci_upper,
                total_profit,
                roi,
                max_drawdown: max_drawdown(&bets),
                max_consecutive_losses: max_consecutive_losses(&bets),
                sharpe_ratio: sharpe_ratio(&returns),
                brier_score: brier_score(records),
                avg_prob_over: mean(&probs).unwrap_or(0.0),
            }),
        }
    }

    /// False when no game could be evaluated.
    #[must_use]
    pub fn has_predictions(&self) -> bool {
        self.total_games > 0
    }

    #[must_use]
    pub fn has_bets(&self) -> bool {
        self.bets.is_some()
    }

    #[must_use]
    pub fn roi(&self) -> Option<f64> {
        self.bets.as_ref().map(|b| b.roi)
    }

    #[must_use]
    pub fn win_rate(&self) -> Option<f64> {
        self.bets.as_ref().map(|b| b.win_rate)
    }

    #[must_use]
    pub fn total_profit(&self) -> Decimal {
        self.bets.as_ref().map_or(Decimal::ZERO, |b| b.total_profit)
    }
}

/// Mean over standard deviation, scaled by sqrt(n). Zero when undefined.
fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    match (mean(returns), sample_std(returns)) {
        (Some(m), Some(s)) if s > 0.0 => m / s * (returns.len() as f64).sqrt(),
        _ => 0.0,
    }
}

fn brier_score(records: &[OutcomeRecord]) -> f64 {
    let errors: Vec<f64> = records
        .iter()
        .map(|r| {
            let hit = if r.actual_value > r.prediction.line { 1.0 } else { 0.0 };
            (r.prediction.prob_over - hit).powi(2)
        })
        .collect();
    mean(&errors).unwrap_or(0.0)
}

fn max_drawdown(bets: &[&OutcomeRecord]) -> Decimal {
    let mut cumulative = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    let mut worst = Decimal::ZERO;

    for bet in bets {
        cumulative += bet.profit;
        peak = peak.max(cumulative);
        worst = worst.max(peak - cumulative);
    }
    worst
}

fn max_consecutive_losses(bets: &[&OutcomeRecord]) -> usize {
    let mut longest = 0;
    let mut current = 0;

    for bet in bets {
        if bet.profit < Decimal::ZERO {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
