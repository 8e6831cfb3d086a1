//! Plain-text rendering of backtest runs and single-game projections.

#![allow(clippy::format_push_string)]

use crate::engine::BacktestRun;
use crate::projection::Projection;

const RULE: &str = "===============================================================\n";
const THIN_RULE: &str = "---------------------------------------------------------------\n";

/// Formats the run as a human-readable report.
#[must_use]
pub fn format_text_report(run: &BacktestRun) -> String {
    let config = &run.config;
    let summary = &run.summary;

    let mut output = String::new();

    output.push('\n');
    output.push_str(RULE);
    output.push_str("                       BACKTEST RESULTS                        \n");
    output.push_str(RULE);
    output.push_str(&format!("Player:       {} ({})\n", run.player_name, run.player_id));
    output.push_str(&format!("Period:       {} to {}\n", config.start, config.end));
    output.push_str(&format!("Stat Type:    {}\n", config.stat_type));
    match config.line {
        Some(line) => output.push_str(&format!("Line:         {line}\n")),
        None => output.push_str("Line:         Dynamic (model estimate)\n"),
    }
    output.push_str(&format!("Window:       {} games\n", run.window));
    output.push_str(THIN_RULE);

    if !summary.has_predictions() {
        output.push_str("No predictions made in this period\n");
        output.push_str("Possible reasons:\n");
        output.push_str("  - No games played in this period\n");
        output.push_str("  - Insufficient historical data before each game\n");
        output.push_str("  - Date range is in the future\n");
        if run.skipped_games > 0 {
            output.push_str(&format!(
                "Skipped Games: {} (insufficient history)\n",
                run.skipped_games
            ));
        }
        output.push_str(RULE);
        return output;
    }

    output.push_str(&format!("Total Games:  {}\n", summary.total_games));
    output.push_str(&format!("Bets Made:    {}\n", summary.bets_made));
    if run.skipped_games > 0 {
        output.push_str(&format!("Skipped:      {}\n", run.skipped_games));
    }

    match &summary.bets {
        Some(bets) => {
            output.push_str(&format!("Wins:         {}\n", bets.wins));
            output.push_str(&format!("Losses:       {}\n", bets.losses));
            output.push_str(&format!("Pushes:       {}\n", bets.pushes));
            output.push_str(THIN_RULE);
            output.push_str(&format!("Accuracy:     {:.1}%\n", bets.accuracy * 100.0));
            output.push_str(&format!(
                "Win Rate:     {:.1}% (95% CI {:.1}% - {:.1}%)\n",
                bets.win_rate * 100.0,
                bets.wilson_ci_lower * 100.0,
                bets.wilson_ci_upper * 100.0
            ));
            output.push_str(&format!("ROI:          {:.2}%\n", bets.roi));
            output.push_str(&format!("Total Profit: ${:.2}\n", bets.total_profit));
            output.push_str(&format!("Max Drawdown: ${:.2}\n", bets.max_drawdown));
            output.push_str(&format!("Losing Run:   {}\n", bets.max_consecutive_losses));
            output.push_str(&format!("Sharpe Ratio: {:.3}\n", bets.sharpe_ratio));
            output.push_str(&format!(
                "Brier Score:  {:.4} (lower is better)\n",
                bets.brier_score
            ));
        }
        None => {
            output.push('\n');
            output.push_str("No bets recommended (model had low confidence on all games)\n");
        }
    }

    if run.sink_failures > 0 {
        output.push_str(&format!(
            "Warning: {} predictions could not be recorded\n",
            run.sink_failures
        ));
    }
    output.push_str(RULE);
    output
}

/// Formats a single-game projection.
#[must_use]
pub fn format_projection_report(player_name: &str, projection: &Projection) -> String {
    let matchup = &projection.matchup;
    let mut output = String::new();

    output.push('\n');
    output.push_str(RULE);
    output.push_str("                      POINTS PROJECTION                        \n");
    output.push_str(RULE);
    output.push_str(&format!("Player:            {player_name}\n"));
    output.push_str(&format!("Line:              {} ({:+})\n", matchup.line, matchup.odds));
    output.push_str(&format!("Spread:            {}\n", matchup.spread));
    output.push_str(&format!("Opp Def Rating:    {}\n", matchup.opponent_def_rating));
    output.push_str(THIN_RULE);
    output.push_str(&format!("Points/Minute:     {:.3}\n", projection.points_per_minute));
    output.push_str(&format!("Avg Minutes:       {:.1}\n", projection.avg_minutes));
    output.push_str(&format!("Projected minutes: {:.1}\n", projection.projected_minutes));
    output.push_str(&format!("Expected points:   {:.2}\n", projection.mu));
    output.push_str(&format!("Sigma:             {:.2}\n", projection.sigma));
    output.push_str(THIN_RULE);
    output.push_str(&format!("Model P(OVER):     {:.2}%\n", projection.prob_over * 100.0));
    output.push_str(&format!(
        "Closed-form P:     {:.2}%\n",
        projection.prob_over_exact * 100.0
    ));
    output.push_str(&format!("Book Implied P:    {:.2}%\n", projection.implied_prob * 100.0));
    output.push_str(&format!("Edge:              {:+.2}%\n", projection.edge * 100.0));
    output.push_str(&format!("EV:                {:.3}\n", projection.expected_value));
    output.push_str(&format!("Recommendation:    {}\n", projection.recommendation));
    output.push_str(RULE);
    output
}
