//! Bet outcome types and the fixed-threshold decision policy.
//!
//! Bets are settled at standard -110 vig: a correct bet wins 100, an
//! incorrect one loses 110, a push or no bet is flat.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability above which the policy bets the over.
pub const EDGE_THRESHOLD: f64 = 0.55;

/// Probability below which the policy bets the under.
pub const UNDER_THRESHOLD: f64 = 0.45;

/// Profit of a winning bet.
pub const WIN_PAYOUT: Decimal = dec!(100);

/// Stake lost by a losing bet.
pub const LOSS_STAKE: Decimal = dec!(110);

/// How the actual stat finished relative to the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatOutcome {
    Over,
    Under,
    Push,
}

impl StatOutcome {
    /// Classifies `actual` against `line`.
    #[must_use]
    pub fn classify(actual: f64, line: f64) -> Self {
        if actual > line {
            Self::Over
        } else if actual < line {
            Self::Under
        } else {
            Self::Push
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Over => "over",
            Self::Under => "under",
            Self::Push => "push",
        }
    }
}

impl fmt::Display for StatOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side the policy recommends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetRecommendation {
    Over,
    Under,
    #[serde(rename = "none")]
    NoBet,
}

impl BetRecommendation {
    /// Bets over above `EDGE_THRESHOLD`, under below `UNDER_THRESHOLD`.
    #[must_use]
    pub fn from_prob_over(prob_over: f64) -> Self {
        if prob_over > EDGE_THRESHOLD {
            Self::Over
        } else if prob_over < UNDER_THRESHOLD {
            Self::Under
        } else {
            Self::NoBet
        }
    }

    #[must_use]
    pub fn is_bet(self) -> bool {
        self != Self::NoBet
    }

    /// Whether this bet matches the game result. Never true for a push.
    #[must_use]
    pub fn matches(self, result: StatOutcome) -> bool {
        matches!(
            (self, result),
            (Self::Over, StatOutcome::Over) | (Self::Under, StatOutcome::Under)
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Over => "over",
            Self::Under => "under",
            Self::NoBet => "none",
        }
    }
}

impl fmt::Display for BetRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of applying the policy to one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub result: StatOutcome,
    pub bet: BetRecommendation,
    pub correct: bool,
    pub profit: Decimal,
}

/// Decides and settles a bet for one game.
#[must_use]
pub fn evaluate(actual: f64, line: f64, prob_over: f64) -> Settlement {
    let result = StatOutcome::classify(actual, line);
    let bet = BetRecommendation::from_prob_over(prob_over);
    let correct = bet.matches(result);

    let profit = if !bet.is_bet() || result == StatOutcome::Push {
        Decimal::ZERO
    } else if correct {
        WIN_PAYOUT
    } else {
        -LOSS_STAKE
    };

    Settlement {
        result,
        bet,
        correct,
        profit,
    }
}

/// Model output for one game, built only from games played before it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    /// Date of the predicted game.
    pub date: NaiveDate,
    /// Expected value of the stat.
    pub predicted_mean: f64,
    /// Standard deviation of the stat.
    pub predicted_std: f64,
    /// Probability the stat finishes over `line`.
    pub prob_over: f64,
    /// Line the probability was computed against.
    pub line: f64,
}

/// One evaluated game in a backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    #[serde(flatten)]
    pub prediction: PredictionPoint,
    /// Observed stat value.
    pub actual_value: f64,
    pub result: StatOutcome,
    pub bet: BetRecommendation,
    pub correct: bool,
    /// Profit in units of the 110-to-win-100 stake.
    pub profit: Decimal,
}

impl OutcomeRecord {
    /// Settles `prediction` against the observed value.
    #[must_use]
    pub fn settle(prediction: PredictionPoint, actual_value: f64) -> Self {
        let settlement = evaluate(actual_value, prediction.line, prediction.prob_over);
        Self {
            prediction,
            actual_value,
            result: settlement.result,
            bet: settlement.bet,
            correct: settlement.correct,
            profit: settlement.profit,
        }
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.prediction.date
    }

    #[must_use]
    pub fn is_bet(&self) -> bool {
        self.bet.is_bet()
    }
}
