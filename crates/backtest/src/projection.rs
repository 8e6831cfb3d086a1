//! Single-game points projection for an upcoming matchup.
//!
//! The projection scales the player's rolling points-per-minute by projected
//! minutes, shifts it for the opponent's defense, and estimates the chance
//! of clearing the line by simulation. The result is compared with the
//! probability implied by the book's price.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use nba_props_core::odds::{american_to_implied_prob, expected_value};
use nba_props_core::{prob_over, StatType};

use crate::error::FeatureError;
use crate::features::RollingFeatures;
use crate::outcome::BetRecommendation;

/// Absolute spread at which starters are expected to sit late.
pub const BLOWOUT_THRESHOLD: f64 = 10.0;

/// Share of minutes lost in a projected blowout.
pub const BLOWOUT_PENALTY: f64 = 0.12;

/// League-average defensive rating (points allowed per 100 possessions).
pub const LEAGUE_AVG_DEF_RATING: f64 = 113.0;

/// Points of expected scoring per 10 rating points of defensive difference.
pub const DEFENSE_SENSITIVITY: f64 = 0.4;

pub const DEFAULT_SIMULATIONS: usize = 10_000;

/// Expected minutes given the game spread.
///
/// Only the size of the spread matters; a favourite and an underdog are
/// both at risk of a blowout.
#[must_use]
pub fn project_minutes(avg_minutes: f64, spread: f64) -> f64 {
    if spread.abs() >= BLOWOUT_THRESHOLD {
        avg_minutes * (1.0 - BLOWOUT_PENALTY)
    } else {
        avg_minutes
    }
}

/// Shifts expected points for the opponent's defensive rating.
///
/// A rating below league average is a better defense and lowers the mean.
#[must_use]
pub fn adjust_for_defense(mu: f64, opponent_def_rating: f64) -> f64 {
    let diff = LEAGUE_AVG_DEF_RATING - opponent_def_rating;
    mu + diff * DEFENSE_SENSITIVITY / 10.0
}

/// Monte Carlo estimate of `P(X > line)` for `X ~ N(mu, sigma)`.
///
/// Returns `0.0` for a non-positive or non-finite `sigma` and for zero
/// draws, matching [`prob_over`].
pub fn monte_carlo_over<R: Rng + ?Sized>(
    mu: f64,
    sigma: f64,
    line: f64,
    draws: usize,
    rng: &mut R,
) -> f64 {
    if draws == 0 || !(sigma > 0.0) || !sigma.is_finite() || !mu.is_finite() {
        return 0.0;
    }
    let Ok(normal) = Normal::new(mu, sigma) else {
        return 0.0;
    };

    let hits = normal
        .sample_iter(rng)
        .take(draws)
        .filter(|x| *x > line)
        .count();
    hits as f64 / draws as f64
}

/// The game being priced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub line: f64,
    /// American odds offered on the over.
    pub odds: i32,
    /// Vegas spread; the sign is ignored.
    pub spread: f64,
    pub opponent_def_rating: f64,
}

/// Projection for one upcoming game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub matchup: Matchup,
    /// Feature row the projection was built from.
    pub row: usize,
    pub points_per_minute: f64,
    pub avg_minutes: f64,
    pub minutes_std: Option<f64>,
    pub projected_minutes: f64,
    /// Expected points after the minutes and defense adjustments.
    pub mu: f64,
    pub sigma: f64,
    /// Simulated probability of the over.
    pub prob_over: f64,
    /// Closed-form probability for the same distribution.
    pub prob_over_exact: f64,
    pub implied_prob: f64,
    /// Simulated probability minus the book's implied probability.
    pub edge: f64,
    /// EV of one unit on the over.
    pub expected_value: f64,
    pub recommendation: BetRecommendation,
}

/// Projects points for `matchup` from the latest complete feature row.
///
/// Uses the last row where the rolling points-per-minute, minutes mean and
/// points std are all defined.
///
/// # Errors
/// Returns `FeatureError::NoCompleteWindow` if no such row exists.
pub fn project_points<R: Rng + ?Sized>(
    features: &RollingFeatures,
    matchup: Matchup,
    draws: usize,
    rng: &mut R,
) -> Result<Projection, FeatureError> {
    let latest = features
        .latest_complete(StatType::Points)
        .ok_or(FeatureError::NoCompleteWindow(features.window()))?;
    let ppm = features.mean_points_per_minute();
    let minutes = features.mean_minutes();
    let points_std = features
        .std_dev(StatType::Points)
        .ok_or_else(|| FeatureError::MissingColumn(StatType::Points.column().to_string()))?;

    // Zero-minute games leave ppm undefined, so walk back from the latest
    // points estimate until every input is present.
    let (row, ppm, avg_minutes, sigma) = (0..=latest.row)
        .rev()
        .find_map(|row| Some((row, ppm[row]?, minutes[row]?, points_std[row]?)))
        .ok_or(FeatureError::NoCompleteWindow(features.window()))?;

    let projected_minutes = project_minutes(avg_minutes, matchup.spread);
    let mu = adjust_for_defense(ppm * projected_minutes, matchup.opponent_def_rating);
    let p_over = monte_carlo_over(mu, sigma, matchup.line, draws, rng);
    let implied_prob = american_to_implied_prob(matchup.odds);

    Ok(Projection {
        matchup,
        row,
        points_per_minute: ppm,
        avg_minutes,
        minutes_std: features.std_minutes()[row],
        projected_minutes,
        mu,
        sigma,
        prob_over: p_over,
        prob_over_exact: prob_over(matchup.line, mu, sigma),
        implied_prob,
        edge: p_over - implied_prob,
        expected_value: expected_value(p_over, matchup.odds, 1.0),
        recommendation: BetRecommendation::from_prob_over(p_over),
    })
}
