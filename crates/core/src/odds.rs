//! American odds conversions and expected value per unit stake.
//!
//! Sportsbook prop lines are quoted in American odds. Negative odds are the
//! amount risked to win 100; positive odds are the amount won on a 100 stake.
//!
//! ```text
//! implied(-110) = 110 / 210 = 0.5238
//! implied(+150) = 100 / 250 = 0.40
//! ```

/// Standard two-way prop price (-110 on both sides).
pub const STANDARD_ODDS: i32 = -110;

/// Implied probability of American odds, vig included.
///
/// # Examples
/// ```
/// use nba_props_core::odds::american_to_implied_prob;
///
/// assert!((american_to_implied_prob(-110) - 0.5238).abs() < 1e-4);
/// assert!((american_to_implied_prob(150) - 0.40).abs() < 1e-12);
/// ```
#[must_use]
pub fn american_to_implied_prob(odds: i32) -> f64 {
    let odds = f64::from(odds);
    if odds > 0.0 {
        100.0 / (odds + 100.0)
    } else {
        -odds / (-odds + 100.0)
    }
}

/// Net profit per unit staked when a bet at `odds` wins.
///
/// Returns `0.0` for `odds == 0`, which is not a valid American price.
#[must_use]
pub fn payout_per_unit(odds: i32) -> f64 {
    match odds {
        0 => 0.0,
        o if o > 0 => f64::from(o) / 100.0,
        o => 100.0 / f64::from(o).abs(),
    }
}

/// Expected value of a bet that wins with probability `prob`.
///
/// ```text
/// EV = prob * payout * stake - (1 - prob) * stake
/// ```
///
/// Both the win and the loss scale with `stake`, so the result is in the
/// same currency units as `stake`.
#[must_use]
pub fn expected_value(prob: f64, odds: i32, stake: f64) -> f64 {
    prob * payout_per_unit(odds) * stake - (1.0 - prob) * stake
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================
    // Implied Probability
    // ============================================

    #[test]
    fn even_money_is_half() {
        assert!((american_to_implied_prob(100) - 0.5).abs() < 1e-12);
        assert!((american_to_implied_prob(-100) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn standard_odds_carry_vig() {
        let p = american_to_implied_prob(STANDARD_ODDS);
        assert!((p - 110.0 / 210.0).abs() < 1e-12);
        assert!(2.0 * p > 1.0);
    }

    #[test]
    fn favourite_has_higher_implied_prob() {
        assert!(american_to_implied_prob(-200) > american_to_implied_prob(-110));
        assert!(american_to_implied_prob(200) < american_to_implied_prob(120));
    }

    // ============================================
    // Payout and EV
    // ============================================

    #[test]
    fn payout_at_minus_110() {
        assert!((payout_per_unit(-110) - 100.0 / 110.0).abs() < 1e-12);
    }

    #[test]
    fn payout_at_plus_odds() {
        assert!((payout_per_unit(250) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn payout_zero_for_invalid_odds() {
        assert_eq!(payout_per_unit(0), 0.0);
    }

    #[test]
    fn ev_zero_at_break_even_probability() {
        let p = american_to_implied_prob(STANDARD_ODDS);
        assert!(expected_value(p, STANDARD_ODDS, 1.0).abs() < 1e-12);
    }

    #[test]
    fn ev_positive_with_edge() {
        assert!(expected_value(0.60, STANDARD_ODDS, 1.0) > 0.0);
        assert!(expected_value(0.50, STANDARD_ODDS, 1.0) < 0.0);
    }

    #[test]
    fn ev_scales_with_stake() {
        let unit = expected_value(0.58, STANDARD_ODDS, 1.0);
        let hundred = expected_value(0.58, STANDARD_ODDS, 100.0);
        assert!((hundred - unit * 100.0).abs() < 1e-9);
    }

    #[test]
    fn ev_win_and_loss_both_scale_with_stake() {
        // At -110 a 10-unit stake wins 9.0909 or loses 10.
        let ev = expected_value(0.5, STANDARD_ODDS, 10.0);
        let expected = 0.5 * (100.0 / 110.0) * 10.0 - 0.5 * 10.0;
        assert!((ev - expected).abs() < 1e-12);

        let unit = 0.5 * payout_per_unit(STANDARD_ODDS) - 0.5;
        assert!((expected_value(0.5, STANDARD_ODDS, 1.0) - unit).abs() < 1e-12);
    }
}
