//! Closed-form normal model for over/under probabilities.

use std::f64::consts::SQRT_2;

/// Probability that a normally distributed stat with the given mean and
/// standard deviation finishes strictly above `line`.
///
/// ```text
/// P(X > line) = 1 - Phi((line - mean) / std) = erfc((line - mean) / (std * sqrt(2))) / 2
/// ```
///
/// Returns exactly `0.0` when `std_dev <= 0` or any input is not finite.
/// Otherwise the result is in `[0, 1]`, and equals `0.5` when `line == mean`.
///
/// # Examples
/// ```
/// use nba_props_core::probability::prob_over;
///
/// assert_eq!(prob_over(20.0, 20.0, 5.0), 0.5);
/// assert!(prob_over(20.0, 22.0, 5.0) > 0.5);
/// assert_eq!(prob_over(20.0, 22.0, 0.0), 0.0);
/// ```
#[must_use]
pub fn prob_over(line: f64, mean: f64, std_dev: f64) -> f64 {
    if !(std_dev > 0.0) || !std_dev.is_finite() || !mean.is_finite() || !line.is_finite() {
        return 0.0;
    }

    let z = (line - mean) / (std_dev * SQRT_2);
    (0.5 * libm::erfc(z)).clamp(0.0, 1.0)
}
