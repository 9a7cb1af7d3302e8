use serde::Serialize;

use crate::ratio::safe_div;
use crate::tables::MatchRecord;

/// Conventional exponent for goal-based sports; override per sport via
/// `ReportConfig`.
pub const DEFAULT_EXPONENT: f64 = 2.2;

/// Pythagorean win expectation `gf^e / (gf^e + ga^e)`. `None` when the
/// denominator vanishes (both inputs zero).
pub fn pythagorean_expectation(goals_for: f64, goals_against: f64, exponent: f64) -> Option<f64> {
    let gf_e = goals_for.powf(exponent);
    let ga_e = goals_against.powf(exponent);
    let denom = gf_e + ga_e;
    if denom > 0.0 { Some(gf_e / denom) } else { None }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpectationSummary {
    pub goals_for: u64,
    pub goals_against: u64,
    pub expected_win_pct: Option<f64>,
    pub actual_win_pct: Option<f64>,
    pub expected_wins: Option<f64>,
    /// Actual wins minus expected wins; positive means the season beat
    /// the model.
    pub luck: Option<f64>,
}

pub fn expectation_summary(matches: &[MatchRecord], exponent: f64) -> ExpectationSummary {
    let goals_for: u64 = matches.iter().map(|m| m.goals_for as u64).sum();
    let goals_against: u64 = matches.iter().map(|m| m.goals_against as u64).sum();
    let wins = matches.iter().filter(|m| m.is_win()).count();

    let expected_win_pct =
        pythagorean_expectation(goals_for as f64, goals_against as f64, exponent);
    let actual_win_pct = safe_div(wins as f64, matches.len() as f64);
    let expected_wins = expected_win_pct.map(|p| p * matches.len() as f64);
    let luck = expected_wins.map(|e| wins as f64 - e);

    ExpectationSummary {
        goals_for,
        goals_against,
        expected_win_pct,
        actual_win_pct,
        expected_wins,
        luck,
    }
}
