use std::collections::HashMap;

use serde::Serialize;

use crate::ratio::safe_div;
use crate::tables::{MatchRecord, parse_date};

/// First match with the smallest absolute differential; earlier rows win
/// ties so the selection is deterministic for equal margins.
pub fn tightest_match(matches: &[MatchRecord]) -> Option<&MatchRecord> {
    let mut best: Option<&MatchRecord> = None;
    for m in matches {
        let better = match best {
            None => true,
            Some(b) => m.abs_diff() < b.abs_diff(),
        };
        if better {
            best = Some(m);
        }
    }
    best
}

pub fn highest_scoring_match(matches: &[MatchRecord]) -> Option<&MatchRecord> {
    let mut best: Option<&MatchRecord> = None;
    for m in matches {
        let better = match best {
            None => true,
            Some(b) => m.goals_for > b.goals_for,
        };
        if better {
            best = Some(m);
        }
    }
    best
}

/// Largest winning margin. `None` when the season has no wins; callers
/// report that explicitly instead of treating it as an error.
pub fn biggest_win(matches: &[MatchRecord]) -> Option<&MatchRecord> {
    let mut best: Option<&MatchRecord> = None;
    for m in matches.iter().filter(|m| m.is_win()) {
        let better = match best {
            None => true,
            Some(b) => m.diff() > b.diff(),
        };
        if better {
            best = Some(m);
        }
    }
    best
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FilterRecord {
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
}

impl FilterRecord {
    pub fn win_pct(&self) -> Option<f64> {
        safe_div(self.wins as f64, self.games as f64)
    }
}

fn record_for<'a>(rows: impl Iterator<Item = &'a MatchRecord>) -> FilterRecord {
    let mut rec = FilterRecord::default();
    for m in rows {
        rec.games += 1;
        if m.is_win() {
            rec.wins += 1;
        } else {
            rec.losses += 1;
        }
    }
    rec
}

#[derive(Debug, Clone, Serialize)]
pub struct CloseGameSummary {
    /// Upper bound of the "within margin" bucket.
    pub margin: i64,
    pub one_goal: FilterRecord,
    pub two_goal: FilterRecord,
    pub within_margin: FilterRecord,
}

pub fn close_game_summary(matches: &[MatchRecord], margin: i64) -> CloseGameSummary {
    CloseGameSummary {
        margin,
        one_goal: record_for(matches.iter().filter(|m| m.abs_diff() == 1)),
        two_goal: record_for(matches.iter().filter(|m| m.abs_diff() == 2)),
        within_margin: record_for(matches.iter().filter(|m| m.abs_diff() <= margin)),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OpponentProfile {
    pub opponent: String,
    pub games: usize,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    pub avg_margin: f64,
    pub wins: usize,
    pub win_pct: Option<f64>,
}

/// Group matches by opponent, one profile per distinct name in first-seen
/// order. Recomputed fresh each run; nothing is cached between reports.
pub fn opponent_profiles(matches: &[MatchRecord]) -> Vec<OpponentProfile> {
    #[derive(Default)]
    struct Acc {
        games: usize,
        goals_for: u64,
        goals_against: u64,
        margin: i64,
        wins: usize,
    }

    let mut order: Vec<String> = Vec::new();
    let mut accs: Vec<Acc> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for m in matches {
        let idx = match index.get(&m.opponent) {
            Some(&i) => i,
            None => {
                index.insert(m.opponent.clone(), order.len());
                order.push(m.opponent.clone());
                accs.push(Acc::default());
                accs.len() - 1
            }
        };
        let acc = &mut accs[idx];
        acc.games += 1;
        acc.goals_for += m.goals_for as u64;
        acc.goals_against += m.goals_against as u64;
        acc.margin += m.diff();
        if m.is_win() {
            acc.wins += 1;
        }
    }

    order
        .into_iter()
        .zip(accs)
        .map(|(opponent, acc)| {
            let n = acc.games as f64;
            OpponentProfile {
                opponent,
                games: acc.games,
                avg_goals_for: acc.goals_for as f64 / n,
                avg_goals_against: acc.goals_against as f64 / n,
                avg_margin: acc.margin as f64 / n,
                wins: acc.wins,
                win_pct: safe_div(acc.wins as f64, n),
            }
        })
        .collect()
}

/// Stable re-ranking by average margin; equal margins keep the first-seen
/// opponent order.
pub fn rank_by_margin(profiles: &[OpponentProfile], descending: bool) -> Vec<OpponentProfile> {
    let mut out = profiles.to_vec();
    if descending {
        out.sort_by(|a, b| b.avg_margin.total_cmp(&a.avg_margin));
    } else {
        out.sort_by(|a, b| a.avg_margin.total_cmp(&b.avg_margin));
    }
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct MomentumRow {
    pub date: String,
    pub opponent: String,
    pub goals_for: u32,
    pub goals_against: u32,
    pub margin: i64,
    pub roll_goals_for: f64,
    pub roll_goals_against: f64,
    pub roll_margin: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MomentumSummary {
    pub window: usize,
    /// False when at least one date failed to parse; the whole table then
    /// keeps input order instead of date order.
    pub chronological: bool,
    pub rows: Vec<MomentumRow>,
    pub best_stretch: Option<MomentumRow>,
    pub worst_stretch: Option<MomentumRow>,
}

/// Trailing rolling averages over the chronologically ordered season.
/// Window is trailing with a minimum of one observation, so the first
/// `window - 1` rows average a partial window.
pub fn momentum(matches: &[MatchRecord], window: usize) -> MomentumSummary {
    let window = window.max(1);
    let parsed: Vec<_> = matches.iter().map(|m| parse_date(&m.date)).collect();
    let chronological = parsed.iter().all(|d| d.is_some());

    let mut idx: Vec<usize> = (0..matches.len()).collect();
    if chronological {
        // Stable: same-day games keep input order.
        idx.sort_by(|&a, &b| parsed[a].cmp(&parsed[b]));
    }
    let ordered: Vec<&MatchRecord> = idx.into_iter().map(|i| &matches[i]).collect();

    let mut rows = Vec::with_capacity(ordered.len());
    for (i, m) in ordered.iter().enumerate() {
        let start = (i + 1).saturating_sub(window);
        let slice = &ordered[start..=i];
        let len = slice.len() as f64;
        rows.push(MomentumRow {
            date: m.date.clone(),
            opponent: m.opponent.clone(),
            goals_for: m.goals_for,
            goals_against: m.goals_against,
            margin: m.diff(),
            roll_goals_for: slice.iter().map(|m| m.goals_for as f64).sum::<f64>() / len,
            roll_goals_against: slice.iter().map(|m| m.goals_against as f64).sum::<f64>() / len,
            roll_margin: slice.iter().map(|m| m.diff() as f64).sum::<f64>() / len,
        });
    }

    let mut best: Option<&MomentumRow> = None;
    let mut worst: Option<&MomentumRow> = None;
    for r in &rows {
        if best.is_none_or(|b| r.roll_margin > b.roll_margin) {
            best = Some(r);
        }
        if worst.is_none_or(|w| r.roll_margin < w.roll_margin) {
            worst = Some(r);
        }
    }
    let best_stretch = best.cloned();
    let worst_stretch = worst.cloned();

    MomentumSummary {
        window,
        chronological,
        rows,
        best_stretch,
        worst_stretch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::MatchResult;

    fn m(date: &str, opponent: &str, gf: u32, ga: u32) -> MatchRecord {
        MatchRecord {
            date: date.to_string(),
            opponent: opponent.to_string(),
            goals_for: gf,
            goals_against: ga,
            result: if gf > ga { MatchResult::Win } else { MatchResult::Loss },
        }
    }

    fn season() -> Vec<MatchRecord> {
        vec![
            m("2025-02-01", "Alpha", 10, 8),
            m("2025-02-08", "Beta", 5, 9),
            m("2025-02-15", "Alpha", 12, 4),
        ]
    }

    #[test]
    fn extremes_match_scenario() {
        let s = season();
        // Diffs are +2, -4, +8: the +2 game is the tightest.
        assert_eq!(tightest_match(&s).map(|m| m.diff()), Some(2));
        assert_eq!(highest_scoring_match(&s).map(|m| m.goals_for), Some(12));
        assert_eq!(biggest_win(&s).map(|m| m.diff()), Some(8));
    }

    #[test]
    fn biggest_win_is_none_without_wins() {
        let s = vec![m("2025-02-01", "Alpha", 3, 9), m("2025-02-08", "Beta", 2, 5)];
        assert!(biggest_win(&s).is_none());
    }

    #[test]
    fn extreme_ties_keep_first_occurrence() {
        let s = vec![
            m("2025-02-01", "Alpha", 9, 7),
            m("2025-02-08", "Beta", 11, 9),
        ];
        // Both diffs are +2; the February 1 game is reported.
        assert_eq!(tightest_match(&s).map(|m| m.opponent.as_str()), Some("Alpha"));
        assert_eq!(biggest_win(&s).map(|m| m.opponent.as_str()), Some("Alpha"));
    }

    #[test]
    fn close_games_bucketed_by_margin() {
        let s = vec![
            m("2025-02-01", "A", 10, 9),
            m("2025-02-08", "B", 7, 9),
            m("2025-02-15", "C", 12, 9),
            m("2025-02-22", "D", 2, 10),
        ];
        let c = close_game_summary(&s, 3);
        assert_eq!(c.one_goal.games, 1);
        assert_eq!(c.one_goal.wins, 1);
        assert_eq!(c.two_goal.games, 1);
        assert_eq!(c.two_goal.losses, 1);
        assert_eq!(c.within_margin.games, 3);
        assert_eq!(c.within_margin.wins, 2);
        assert!(c.within_margin.win_pct().is_some());
    }

    #[test]
    fn empty_filter_has_no_win_pct() {
        let rec = close_game_summary(&[], 3).one_goal;
        assert_eq!(rec.games, 0);
        assert!(rec.win_pct().is_none());
    }

    #[test]
    fn profiles_group_in_first_seen_order() {
        let profiles = opponent_profiles(&season());
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].opponent, "Alpha");
        assert_eq!(profiles[0].games, 2);
        assert!((profiles[0].avg_goals_for - 11.0).abs() < 1e-12);
        assert!((profiles[0].avg_margin - 5.0).abs() < 1e-12);
        assert_eq!(profiles[0].wins, 2);
        assert!((profiles[0].win_pct.unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(profiles[1].opponent, "Beta");
        assert!((profiles[1].avg_margin + 4.0).abs() < 1e-12);
    }

    #[test]
    fn single_game_round_trip() {
        let profiles = opponent_profiles(&[m("2025-02-01", "Solo", 6, 5)]);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].games, 1);
        assert!((profiles[0].win_pct.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let s = vec![
            m("2025-02-01", "First", 8, 6),
            m("2025-02-08", "Second", 10, 8),
        ];
        let profiles = opponent_profiles(&s);
        let ranked = rank_by_margin(&profiles, true);
        // Equal +2 margins: first-seen opponent stays first.
        assert_eq!(ranked[0].opponent, "First");
        let ranked_asc = rank_by_margin(&profiles, false);
        assert_eq!(ranked_asc[0].opponent, "First");
    }

    #[test]
    fn rolling_window_partial_then_full() {
        let s = season();
        let mo = momentum(&s, 3);
        assert!(mo.chronological);
        assert_eq!(mo.rows.len(), 3);
        // First row averages itself only.
        assert!((mo.rows[0].roll_goals_for - 10.0).abs() < 1e-12);
        // Second row averages the first two.
        assert!((mo.rows[1].roll_goals_for - 7.5).abs() < 1e-12);
        // Third row averages all three.
        assert!((mo.rows[2].roll_goals_for - 9.0).abs() < 1e-12);
        assert!((mo.rows[2].roll_margin - 2.0).abs() < 1e-12);
    }

    #[test]
    fn momentum_sorts_by_date_not_input_order() {
        let s = vec![
            m("2025-02-15", "Late", 12, 4),
            m("2025-02-01", "Early", 10, 8),
        ];
        let mo = momentum(&s, 3);
        assert!(mo.chronological);
        assert_eq!(mo.rows[0].opponent, "Early");
        assert_eq!(mo.rows[1].opponent, "Late");
    }

    #[test]
    fn unparsable_date_falls_back_to_input_order() {
        let s = vec![
            m("2025-02-15", "Late", 12, 4),
            m("not a date", "Mystery", 10, 8),
        ];
        let mo = momentum(&s, 3);
        assert!(!mo.chronological);
        assert_eq!(mo.rows[0].opponent, "Late");
        assert_eq!(mo.rows[1].opponent, "Mystery");
    }

    #[test]
    fn stretch_selection_prefers_first_occurrence() {
        let s = vec![
            m("2025-02-01", "A", 10, 7),
            m("2025-02-08", "B", 9, 6),
            m("2025-02-15", "C", 8, 5),
        ];
        // Every rolling margin is 3.0; both stretches resolve to row 0.
        let mo = momentum(&s, 1);
        assert_eq!(mo.best_stretch.as_ref().map(|r| r.opponent.as_str()), Some("A"));
        assert_eq!(mo.worst_stretch.as_ref().map(|r| r.opponent.as_str()), Some("A"));
    }

    #[test]
    fn empty_season_momentum_is_empty() {
        let mo = momentum(&[], 3);
        assert!(mo.rows.is_empty());
        assert!(mo.best_stretch.is_none());
        assert!(mo.worst_stretch.is_none());
    }
}
