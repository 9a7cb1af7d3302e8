use serde::Serialize;

use crate::ratio::safe_div;
use crate::tables::PlayerSeasonRecord;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerEfficiencyRow {
    pub name: String,
    pub games_played: u32,
    pub goals: u32,
    pub assists: u32,
    pub points: u32,
    /// `None` when games_played is 0; undefined rather than infinite.
    pub points_per_game: Option<f64>,
    pub goals_per_game: Option<f64>,
    pub share_of_points: f64,
    pub share_of_goals: f64,
    pub z_goals: f64,
    pub z_assists: f64,
    pub z_points: f64,
    pub z_points_per_game: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareLeader {
    pub name: String,
    pub points: u32,
    pub share_of_points: f64,
}

pub fn points_per_game(p: &PlayerSeasonRecord) -> Option<f64> {
    safe_div(p.points as f64, p.games_played as f64)
}

pub fn goals_per_game(p: &PlayerSeasonRecord) -> Option<f64> {
    safe_div(p.goals as f64, p.games_played as f64)
}

/// Population mean and standard deviation (divisor N, not N-1); the
/// roster is the whole population, not a sample.
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

fn zscore(value: f64, mean: f64, std: f64) -> f64 {
    if std > 0.0 { (value - mean) / std } else { 0.0 }
}

/// Max by key, first occurrence on ties.
fn leader_by<K: PartialOrd>(
    players: &[PlayerSeasonRecord],
    key: impl Fn(&PlayerSeasonRecord) -> K,
) -> Option<&PlayerSeasonRecord> {
    let mut best: Option<(&PlayerSeasonRecord, K)> = None;
    for p in players {
        let k = key(p);
        let better = match &best {
            None => true,
            Some((_, bk)) => k > *bk,
        };
        if better {
            best = Some((p, k));
        }
    }
    best.map(|(p, _)| p)
}

pub fn top_scorer(players: &[PlayerSeasonRecord]) -> Option<&PlayerSeasonRecord> {
    leader_by(players, |p| p.goals)
}

pub fn top_assists(players: &[PlayerSeasonRecord]) -> Option<&PlayerSeasonRecord> {
    leader_by(players, |p| p.assists)
}

/// Best points-per-game among players with a defined rate. A roster of
/// zero-game players yields `None`.
pub fn top_points_per_game(players: &[PlayerSeasonRecord]) -> Option<(&PlayerSeasonRecord, f64)> {
    let mut best: Option<(&PlayerSeasonRecord, f64)> = None;
    for p in players {
        let Some(rate) = points_per_game(p) else { continue };
        let better = match best {
            None => true,
            Some((_, b)) => rate > b,
        };
        if better {
            best = Some((p, rate));
        }
    }
    best
}

/// Top-N offense shares by team points. Zero team total means every share
/// is zero, so the first N players are returned with 0.0 shares.
pub fn top_offense_shares(players: &[PlayerSeasonRecord], n: usize) -> Vec<ShareLeader> {
    let team_points: u64 = players.iter().map(|p| p.points as u64).sum();
    let mut leaders: Vec<ShareLeader> = players
        .iter()
        .map(|p| ShareLeader {
            name: p.name.clone(),
            points: p.points,
            share_of_points: safe_div(100.0 * p.points as f64, team_points as f64).unwrap_or(0.0),
        })
        .collect();
    leaders.sort_by(|a, b| b.share_of_points.total_cmp(&a.share_of_points));
    leaders.truncate(n);
    leaders
}

/// Full efficiency table: rates, shares of team totals, and z-scores per
/// metric, sorted by points-per-game descending (undefined rates last,
/// ties in input order).
pub fn efficiency_table(players: &[PlayerSeasonRecord]) -> Vec<PlayerEfficiencyRow> {
    let team_points: u64 = players.iter().map(|p| p.points as u64).sum();
    let team_goals: u64 = players.iter().map(|p| p.goals as u64).sum();

    let goals: Vec<f64> = players.iter().map(|p| p.goals as f64).collect();
    let assists: Vec<f64> = players.iter().map(|p| p.assists as f64).collect();
    let points: Vec<f64> = players.iter().map(|p| p.points as f64).collect();
    // Undefined rates are excluded from the distribution; those players
    // get z = 0 instead of dragging the mean through an infinity.
    let defined_rates: Vec<f64> = players.iter().filter_map(points_per_game).collect();

    let (goals_mu, goals_sd) = mean_std(&goals);
    let (assists_mu, assists_sd) = mean_std(&assists);
    let (points_mu, points_sd) = mean_std(&points);
    let (rate_mu, rate_sd) = mean_std(&defined_rates);

    let mut rows: Vec<PlayerEfficiencyRow> = players
        .iter()
        .map(|p| {
            let ppg = points_per_game(p);
            PlayerEfficiencyRow {
                name: p.name.clone(),
                games_played: p.games_played,
                goals: p.goals,
                assists: p.assists,
                points: p.points,
                points_per_game: ppg,
                goals_per_game: goals_per_game(p),
                share_of_points: safe_div(100.0 * p.points as f64, team_points as f64)
                    .unwrap_or(0.0),
                share_of_goals: safe_div(100.0 * p.goals as f64, team_goals as f64)
                    .unwrap_or(0.0),
                z_goals: zscore(p.goals as f64, goals_mu, goals_sd),
                z_assists: zscore(p.assists as f64, assists_mu, assists_sd),
                z_points: zscore(p.points as f64, points_mu, points_sd),
                z_points_per_game: ppg.map_or(0.0, |r| zscore(r, rate_mu, rate_sd)),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        let av = a.points_per_game.unwrap_or(f64::NEG_INFINITY);
        let bv = b.points_per_game.unwrap_or(f64::NEG_INFINITY);
        bv.total_cmp(&av)
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str, gp: u32, goals: u32, assists: u32) -> PlayerSeasonRecord {
        PlayerSeasonRecord {
            name: name.to_string(),
            games_played: gp,
            goals,
            assists,
            points: goals + assists,
        }
    }

    #[test]
    fn rates_undefined_without_games() {
        let bench = p("Bench", 0, 0, 0);
        assert!(points_per_game(&bench).is_none());
        assert!(goals_per_game(&bench).is_none());
    }

    #[test]
    fn leaders_break_ties_by_input_order() {
        let roster = vec![p("A", 10, 20, 5), p("B", 10, 20, 9), p("C", 10, 12, 9)];
        assert_eq!(top_scorer(&roster).map(|p| p.name.as_str()), Some("A"));
        assert_eq!(top_assists(&roster).map(|p| p.name.as_str()), Some("B"));
    }

    #[test]
    fn ppg_leader_skips_zero_game_players() {
        let roster = vec![p("Ghost", 0, 0, 0), p("Real", 10, 10, 10)];
        let (leader, rate) = top_points_per_game(&roster).unwrap();
        assert_eq!(leader.name, "Real");
        assert!((rate - 2.0).abs() < 1e-12);

        let ghosts = vec![p("Ghost", 0, 0, 0)];
        assert!(top_points_per_game(&ghosts).is_none());
    }

    #[test]
    fn shares_sum_to_hundred() {
        let roster = vec![p("A", 10, 30, 10), p("B", 10, 10, 10), p("C", 10, 0, 40)];
        let rows = efficiency_table(&roster);
        let total: f64 = rows.iter().map(|r| r.share_of_points).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_team_total_means_zero_shares() {
        let roster = vec![p("A", 5, 0, 0), p("B", 5, 0, 0)];
        let rows = efficiency_table(&roster);
        assert!(rows.iter().all(|r| r.share_of_points == 0.0));
        assert!(rows.iter().all(|r| r.share_of_goals == 0.0));
        let leaders = top_offense_shares(&roster, 5);
        assert!(leaders.iter().all(|l| l.share_of_points == 0.0));
    }

    #[test]
    fn identical_players_have_zero_zscores() {
        let roster: Vec<_> = (0..4).map(|i| p(&format!("P{i}"), 10, 5, 5)).collect();
        let rows = efficiency_table(&roster);
        for r in &rows {
            assert_eq!(r.z_goals, 0.0);
            assert_eq!(r.z_assists, 0.0);
            assert_eq!(r.z_points, 0.0);
            assert_eq!(r.z_points_per_game, 0.0);
        }
    }

    #[test]
    fn zscores_use_population_sigma() {
        // Goals [2, 4, 4, 4, 5, 5, 7, 9]: mean 5, population sigma 2.
        let roster: Vec<_> = [2, 4, 4, 4, 5, 5, 7, 9]
            .iter()
            .enumerate()
            .map(|(i, &g)| p(&format!("P{i}"), 10, g, 0))
            .collect();
        let rows = efficiency_table(&roster);
        let nine = rows.iter().find(|r| r.goals == 9).unwrap();
        assert!((nine.z_goals - 2.0).abs() < 1e-12);
        let two = rows.iter().find(|r| r.goals == 2).unwrap();
        assert!((two.z_goals + 1.5).abs() < 1e-12);
    }

    #[test]
    fn table_sorted_by_rate_with_undefined_last() {
        let roster = vec![p("Slow", 10, 5, 0), p("Ghost", 0, 0, 0), p("Fast", 10, 30, 10)];
        let rows = efficiency_table(&roster);
        assert_eq!(rows[0].name, "Fast");
        assert_eq!(rows[1].name, "Slow");
        assert_eq!(rows[2].name, "Ghost");
    }

    #[test]
    fn top_shares_truncates_and_sorts() {
        let roster = vec![
            p("A", 10, 1, 0),
            p("B", 10, 8, 0),
            p("C", 10, 4, 0),
            p("D", 10, 2, 0),
        ];
        let leaders = top_offense_shares(&roster, 2);
        assert_eq!(leaders.len(), 2);
        assert_eq!(leaders[0].name, "B");
        assert_eq!(leaders[1].name, "C");
    }
}
