use serde::Serialize;

use crate::concentration::{gini, herfindahl};
use crate::dynamics::{DynamicsSummary, scoring_dynamics};
use crate::expectation::{DEFAULT_EXPONENT, ExpectationSummary, expectation_summary};
use crate::match_stats::{
    CloseGameSummary, MomentumSummary, OpponentProfile, biggest_win, close_game_summary,
    highest_scoring_match, momentum, opponent_profiles, rank_by_margin, tightest_match,
};
use crate::player_stats::{
    PlayerEfficiencyRow, ShareLeader, efficiency_table, top_assists, top_offense_shares,
    top_points_per_game, top_scorer,
};
use crate::splits::{OutcomeSplits, SynergyPair, outcome_splits, synergy_pairs};
use crate::tables::{MatchRecord, PlayerSeasonRecord, SeasonTables};

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub pyth_exponent: f64,
    /// Absolute margin at or under which a game counts as close.
    pub close_margin: i64,
    pub momentum_window: usize,
    pub share_leaders: usize,
    pub synergy_pairs: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            pyth_exponent: DEFAULT_EXPONENT,
            close_margin: 3,
            momentum_window: 3,
            share_leaders: 5,
            synergy_pairs: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerHighlight {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BaselineSnapshot {
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub leading_scorer: Option<PlayerHighlight>,
    pub top_points_per_game: Option<PlayerHighlight>,
    pub assist_leader: Option<PlayerHighlight>,
    pub tightest_match: Option<MatchRecord>,
    pub highest_scoring_match: Option<MatchRecord>,
    /// `None` when the season has no wins; rendered as "no wins".
    pub biggest_win: Option<MatchRecord>,
    /// Losses decided by the close margin or less.
    pub narrow_defeats: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConcentrationSummary {
    pub gini_goals: f64,
    pub gini_points: f64,
    pub hhi_goals: f64,
    pub hhi_points: f64,
    pub share_leaders: Vec<ShareLeader>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpponentBreakdown {
    /// One profile per distinct opponent, first-seen order.
    pub profiles: Vec<OpponentProfile>,
    pub best: Vec<OpponentProfile>,
    pub toughest: Vec<OpponentProfile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub baseline: BaselineSnapshot,
    pub expectation: ExpectationSummary,
    pub concentration: ConcentrationSummary,
    pub opponents: OpponentBreakdown,
    pub close_games: CloseGameSummary,
    pub momentum: MomentumSummary,
    pub efficiency: Vec<PlayerEfficiencyRow>,
    /// `None` when the per-game log table was absent.
    pub outcome_splits: Option<OutcomeSplits>,
    /// `None` when the scoring-event table was absent.
    pub synergy: Option<Vec<SynergyPair>>,
    pub dynamics: DynamicsSummary,
}

/// Build the whole report in one pass. Pure: the same tables and config
/// always produce the same report, and nothing outlives the call.
pub fn build_report(tables: &SeasonTables, cfg: &ReportConfig) -> Report {
    let matches = &tables.matches;
    let players = &tables.players;

    let baseline = baseline_snapshot(matches, players, cfg.close_margin);
    let expectation = expectation_summary(matches, cfg.pyth_exponent);

    let goals: Vec<f64> = players.iter().map(|p| p.goals as f64).collect();
    let points: Vec<f64> = players.iter().map(|p| p.points as f64).collect();
    let concentration = ConcentrationSummary {
        gini_goals: gini(&goals),
        gini_points: gini(&points),
        hhi_goals: herfindahl(&goals),
        hhi_points: herfindahl(&points),
        share_leaders: top_offense_shares(players, cfg.share_leaders),
    };

    let profiles = opponent_profiles(matches);
    let mut best = rank_by_margin(&profiles, true);
    best.truncate(3);
    let mut toughest = rank_by_margin(&profiles, false);
    toughest.truncate(3);
    let opponents = OpponentBreakdown {
        profiles,
        best,
        toughest,
    };

    let close_games = close_game_summary(matches, cfg.close_margin);
    let momentum = momentum(matches, cfg.momentum_window);
    let efficiency = efficiency_table(players);

    let outcome_splits = tables
        .game_logs
        .as_deref()
        .map(|logs| outcome_splits(logs, matches, cfg.close_margin));
    let synergy = tables
        .events
        .as_deref()
        .map(|events| synergy_pairs(events, cfg.synergy_pairs));

    let dynamics = scoring_dynamics(matches);

    Report {
        baseline,
        expectation,
        concentration,
        opponents,
        close_games,
        momentum,
        efficiency,
        outcome_splits,
        synergy,
        dynamics,
    }
}

fn baseline_snapshot(
    matches: &[MatchRecord],
    players: &[PlayerSeasonRecord],
    close_margin: i64,
) -> BaselineSnapshot {
    let wins = matches.iter().filter(|m| m.is_win()).count();
    let narrow_defeats = matches
        .iter()
        .filter(|m| !m.is_win() && m.diff() >= -close_margin)
        .count();

    BaselineSnapshot {
        games: matches.len(),
        wins,
        losses: matches.len() - wins,
        leading_scorer: top_scorer(players).map(|p| PlayerHighlight {
            name: p.name.clone(),
            value: p.goals as f64,
        }),
        top_points_per_game: top_points_per_game(players).map(|(p, rate)| PlayerHighlight {
            name: p.name.clone(),
            value: rate,
        }),
        assist_leader: top_assists(players).map(|p| PlayerHighlight {
            name: p.name.clone(),
            value: p.assists as f64,
        }),
        tightest_match: tightest_match(matches).cloned(),
        highest_scoring_match: highest_scoring_match(matches).cloned(),
        biggest_win: biggest_win(matches).cloned(),
        narrow_defeats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{MatchResult, PlayerSeasonRecord};

    fn m(date: &str, opponent: &str, gf: u32, ga: u32) -> MatchRecord {
        MatchRecord {
            date: date.to_string(),
            opponent: opponent.to_string(),
            goals_for: gf,
            goals_against: ga,
            result: if gf > ga { MatchResult::Win } else { MatchResult::Loss },
        }
    }

    fn p(name: &str, gp: u32, goals: u32, assists: u32) -> PlayerSeasonRecord {
        PlayerSeasonRecord {
            name: name.to_string(),
            games_played: gp,
            goals,
            assists,
            points: goals + assists,
        }
    }

    fn tables() -> SeasonTables {
        SeasonTables {
            matches: vec![
                m("2025-02-01", "Alpha", 10, 8),
                m("2025-02-08", "Beta", 5, 9),
                m("2025-02-15", "Gamma", 12, 4),
            ],
            players: vec![p("Kim", 3, 8, 4), p("Lee", 3, 5, 9), p("Ray", 3, 2, 1)],
            game_logs: None,
            events: None,
        }
    }

    #[test]
    fn conditional_sections_skip_without_sources() {
        let report = build_report(&tables(), &ReportConfig::default());
        assert!(report.outcome_splits.is_none());
        assert!(report.synergy.is_none());
        // Unconditional stages still ran.
        assert_eq!(report.baseline.games, 3);
        assert_eq!(report.opponents.profiles.len(), 3);
        assert!(report.dynamics.fit.is_fit());
    }

    #[test]
    fn baseline_matches_known_scenario() {
        let report = build_report(&tables(), &ReportConfig::default());
        let b = &report.baseline;
        assert_eq!((b.wins, b.losses), (2, 1));
        assert_eq!(report.expectation.goals_for, 27);
        assert_eq!(report.expectation.goals_against, 21);
        assert_eq!(b.biggest_win.as_ref().map(|m| m.diff()), Some(8));
        assert_eq!(b.tightest_match.as_ref().map(|m| m.abs_diff()), Some(2));
        // The only loss (5-9) is a four-goal margin, outside the bucket.
        assert_eq!(b.narrow_defeats, 0);
    }

    #[test]
    fn winless_season_reports_no_biggest_win() {
        let t = SeasonTables {
            matches: vec![m("2025-02-01", "Alpha", 2, 9)],
            players: vec![p("Kim", 1, 1, 0)],
            game_logs: None,
            events: None,
        };
        let report = build_report(&t, &ReportConfig::default());
        assert!(report.baseline.biggest_win.is_none());
        assert_eq!(report.baseline.wins, 0);
    }

    #[test]
    fn optional_tables_enable_their_stages() {
        let mut t = tables();
        t.game_logs = Some(vec![crate::tables::PlayerGameLogRecord {
            player: "Kim".to_string(),
            date: "2025-02-01".to_string(),
            opponent: "Alpha".to_string(),
            points: 4,
            goals: 2,
            assists: 2,
        }]);
        t.events = Some(vec![crate::tables::ScoringEventRecord {
            scorer: Some("Kim".to_string()),
            assister: Some("Lee".to_string()),
        }]);
        let report = build_report(&t, &ReportConfig::default());
        let splits = report.outcome_splits.unwrap();
        assert_eq!(splits.rows.len(), 1);
        let synergy = report.synergy.unwrap();
        assert_eq!(synergy.len(), 1);
        assert_eq!(synergy[0].goals_created, 1);
    }

    #[test]
    fn empty_tables_still_complete() {
        let report = build_report(&SeasonTables::default(), &ReportConfig::default());
        assert_eq!(report.baseline.games, 0);
        assert!(report.expectation.expected_win_pct.is_none());
        assert_eq!(report.concentration.gini_goals, 0.0);
        assert!(report.momentum.rows.is_empty());
        assert!(report.efficiency.is_empty());
        assert!(!report.dynamics.fit.is_fit());
    }

    #[test]
    fn report_serializes_to_json() {
        let report = build_report(&tables(), &ReportConfig::default());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"baseline\""));
        assert!(json.contains("\"dynamics\""));
    }
}
