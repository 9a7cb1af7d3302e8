use serde::Serialize;

use crate::tables::MatchRecord;

#[derive(Debug, Clone, Serialize)]
pub enum FitOutcome {
    Fit { intercept: f64, slope: f64 },
    Failed { reason: String },
}

impl FitOutcome {
    pub fn is_fit(&self) -> bool {
        matches!(self, FitOutcome::Fit { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DynamicsSummary {
    /// Pearson correlation of own vs. opponent score; `None` when either
    /// axis is degenerate.
    pub correlation: Option<f64>,
    pub fit: FitOutcome,
}

pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.is_empty() {
        return None;
    }
    let n = xs.len() as f64;
    let mx = xs.iter().sum::<f64>() / n;
    let my = ys.iter().sum::<f64>() / n;
    let sxx: f64 = xs.iter().map(|x| (x - mx).powi(2)).sum();
    let syy: f64 = ys.iter().map(|y| (y - my).powi(2)).sum();
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    let sxy: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    Some(sxy / (sxx.sqrt() * syy.sqrt()))
}

/// Closed-form least squares of `y` on `x` with intercept. A degenerate
/// design comes back as an explicit failure, never a panic or NaN
/// coefficients.
pub fn ols_fit(xs: &[f64], ys: &[f64]) -> FitOutcome {
    if xs.len() != ys.len() || xs.is_empty() {
        return FitOutcome::Failed {
            reason: "no observations to fit".to_string(),
        };
    }
    let n = xs.len() as f64;
    let mx = xs.iter().sum::<f64>() / n;
    let my = ys.iter().sum::<f64>() / n;
    let sxx: f64 = xs.iter().map(|x| (x - mx).powi(2)).sum();
    if sxx <= f64::EPSILON {
        return FitOutcome::Failed {
            reason: "regressor has zero variance; design matrix is singular".to_string(),
        };
    }
    let sxy: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    let slope = sxy / sxx;
    FitOutcome::Fit {
        intercept: my - slope * mx,
        slope,
    }
}

/// Own score as a linear function of opponent score, plus their
/// correlation across the season.
pub fn scoring_dynamics(matches: &[MatchRecord]) -> DynamicsSummary {
    let own: Vec<f64> = matches.iter().map(|m| m.goals_for as f64).collect();
    let opp: Vec<f64> = matches.iter().map(|m| m.goals_against as f64).collect();
    DynamicsSummary {
        correlation: pearson(&own, &opp),
        fit: ols_fit(&opp, &own),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::MatchResult;

    fn m(gf: u32, ga: u32) -> MatchRecord {
        MatchRecord {
            date: "2025-02-01".to_string(),
            opponent: "X".to_string(),
            goals_for: gf,
            goals_against: ga,
            result: if gf > ga { MatchResult::Win } else { MatchResult::Loss },
        }
    }

    #[test]
    fn pearson_perfect_line() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [3.0, 5.0, 7.0, 9.0];
        let r = pearson(&xs, &ys).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        let anti: Vec<f64> = ys.iter().map(|y| -y).collect();
        assert!((pearson(&xs, &anti).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_degenerate_is_none() {
        assert!(pearson(&[], &[]).is_none());
        assert!(pearson(&[1.0, 1.0, 1.0], &[2.0, 3.0, 4.0]).is_none());
        assert!(pearson(&[1.0, 2.0], &[5.0]).is_none());
    }

    #[test]
    fn ols_recovers_exact_line() {
        let xs = [2.0, 4.0, 6.0, 8.0];
        let ys: Vec<f64> = xs.iter().map(|x| 1.5 + 0.75 * x).collect();
        match ols_fit(&xs, &ys) {
            FitOutcome::Fit { intercept, slope } => {
                assert!((intercept - 1.5).abs() < 1e-9);
                assert!((slope - 0.75).abs() < 1e-9);
            }
            FitOutcome::Failed { reason } => panic!("unexpected failure: {reason}"),
        }
    }

    #[test]
    fn ols_singular_design_is_reported() {
        match ols_fit(&[7.0, 7.0, 7.0], &[1.0, 2.0, 3.0]) {
            FitOutcome::Failed { reason } => assert!(reason.contains("singular")),
            FitOutcome::Fit { .. } => panic!("degenerate design should not fit"),
        }
        match ols_fit(&[], &[]) {
            FitOutcome::Failed { reason } => assert!(reason.contains("no observations")),
            FitOutcome::Fit { .. } => panic!("empty design should not fit"),
        }
    }

    #[test]
    fn dynamics_over_matches() {
        let matches = vec![m(10, 8), m(5, 9), m(12, 4)];
        let d = scoring_dynamics(&matches);
        assert!(d.correlation.is_some());
        assert!(d.fit.is_fit());
    }

    #[test]
    fn dynamics_empty_season_degrades() {
        let d = scoring_dynamics(&[]);
        assert!(d.correlation.is_none());
        assert!(!d.fit.is_fit());
    }
}
