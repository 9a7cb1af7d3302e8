use std::collections::HashMap;

use serde::Serialize;

use crate::ratio::safe_div;
use crate::tables::{MatchRecord, PlayerGameLogRecord, ScoringEventRecord, canonical_date};

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeSplitRow {
    pub player: String,
    pub win_games: usize,
    pub win_avg_points: f64,
    pub win_avg_goals: f64,
    pub win_avg_assists: f64,
    pub loss_games: usize,
    pub loss_avg_points: f64,
    pub loss_avg_goals: f64,
    pub loss_avg_assists: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClutchRow {
    pub player: String,
    pub games: usize,
    pub avg_points: f64,
    pub avg_goals: f64,
    pub avg_assists: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeSplits {
    pub rows: Vec<OutcomeSplitRow>,
    /// Empty when no joined game was decided by the close margin; the
    /// renderer reports that explicitly instead of printing a bare table.
    pub clutch: Vec<ClutchRow>,
}

struct JoinedLog<'a> {
    log: &'a PlayerGameLogRecord,
    won: bool,
    margin: i64,
}

/// Inner join on (canonical date, opponent). Log rows with no matching
/// match record cannot be attributed an outcome and are dropped. The
/// first match record wins for a duplicated key.
fn join_logs<'a>(
    logs: &'a [PlayerGameLogRecord],
    matches: &[MatchRecord],
) -> Vec<JoinedLog<'a>> {
    let mut context: HashMap<(String, String), (bool, i64)> = HashMap::new();
    for m in matches {
        context
            .entry((canonical_date(&m.date), m.opponent.trim().to_string()))
            .or_insert((m.is_win(), m.diff()));
    }

    logs.iter()
        .filter_map(|log| {
            let key = (canonical_date(&log.date), log.opponent.trim().to_string());
            context.get(&key).map(|&(won, margin)| JoinedLog { log, won, margin })
        })
        .collect()
}

#[derive(Default)]
struct SideAcc {
    games: usize,
    points: u64,
    goals: u64,
    assists: u64,
}

impl SideAcc {
    fn push(&mut self, log: &PlayerGameLogRecord) {
        self.games += 1;
        self.points += log.points as u64;
        self.goals += log.goals as u64;
        self.assists += log.assists as u64;
    }

    fn mean(&self, total: u64) -> f64 {
        safe_div(total as f64, self.games as f64).unwrap_or(0.0)
    }
}

/// Per-player win/loss splits plus the clutch subset (|margin| within
/// `close_margin`). Players appear in first-seen log order before the
/// final stable sort by win-side scoring.
pub fn outcome_splits(
    logs: &[PlayerGameLogRecord],
    matches: &[MatchRecord],
    close_margin: i64,
) -> OutcomeSplits {
    let joined = join_logs(logs, matches);

    let mut order: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut wins: Vec<SideAcc> = Vec::new();
    let mut losses: Vec<SideAcc> = Vec::new();

    for j in &joined {
        let name = j.log.player.trim();
        let idx = match index.get(name) {
            Some(&i) => i,
            None => {
                index.insert(name.to_string(), order.len());
                order.push(name.to_string());
                wins.push(SideAcc::default());
                losses.push(SideAcc::default());
                order.len() - 1
            }
        };
        if j.won {
            wins[idx].push(j.log);
        } else {
            losses[idx].push(j.log);
        }
    }

    let mut rows: Vec<OutcomeSplitRow> = order
        .iter()
        .enumerate()
        .map(|(i, player)| {
            let w = &wins[i];
            let l = &losses[i];
            // A player with no games on one side fills with zeros, not
            // an omitted row.
            OutcomeSplitRow {
                player: player.clone(),
                win_games: w.games,
                win_avg_points: w.mean(w.points),
                win_avg_goals: w.mean(w.goals),
                win_avg_assists: w.mean(w.assists),
                loss_games: l.games,
                loss_avg_points: l.mean(l.points),
                loss_avg_goals: l.mean(l.goals),
                loss_avg_assists: l.mean(l.assists),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.win_avg_points.total_cmp(&a.win_avg_points));

    let clutch = clutch_rows(&joined, close_margin);

    OutcomeSplits { rows, clutch }
}

fn clutch_rows(joined: &[JoinedLog<'_>], close_margin: i64) -> Vec<ClutchRow> {
    let mut order: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut accs: Vec<SideAcc> = Vec::new();

    for j in joined.iter().filter(|j| j.margin.abs() <= close_margin) {
        let name = j.log.player.trim();
        let idx = match index.get(name) {
            Some(&i) => i,
            None => {
                index.insert(name.to_string(), order.len());
                order.push(name.to_string());
                accs.push(SideAcc::default());
                order.len() - 1
            }
        };
        accs[idx].push(j.log);
    }

    let mut rows: Vec<ClutchRow> = order
        .into_iter()
        .zip(accs)
        .map(|(player, acc)| ClutchRow {
            player,
            games: acc.games,
            avg_points: acc.mean(acc.points),
            avg_goals: acc.mean(acc.goals),
            avg_assists: acc.mean(acc.assists),
        })
        .collect();
    rows.sort_by(|a, b| b.avg_points.total_cmp(&a.avg_points));
    rows
}

#[derive(Debug, Clone, Serialize)]
pub struct SynergyPair {
    pub assister: String,
    pub scorer: String,
    pub goals_created: usize,
}

/// Co-occurrence counts per (assister, scorer) pair. Rows missing either
/// name are excluded; ties keep first-encountered pair order.
pub fn synergy_pairs(events: &[ScoringEventRecord], top_n: usize) -> Vec<SynergyPair> {
    let mut pairs: Vec<SynergyPair> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for e in events {
        let (Some(scorer), Some(assister)) = (&e.scorer, &e.assister) else {
            continue;
        };
        let key = (assister.clone(), scorer.clone());
        match index.get(&key) {
            Some(&i) => pairs[i].goals_created += 1,
            None => {
                index.insert(key, pairs.len());
                pairs.push(SynergyPair {
                    assister: assister.clone(),
                    scorer: scorer.clone(),
                    goals_created: 1,
                });
            }
        }
    }

    pairs.sort_by(|a, b| b.goals_created.cmp(&a.goals_created));
    pairs.truncate(top_n);
    pairs
}
