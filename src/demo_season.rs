use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::tables::{
    MatchRecord, MatchResult, PlayerGameLogRecord, PlayerSeasonRecord, ScoringEventRecord,
    SeasonTables,
};

const OPPONENTS: [(&str, i32); 8] = [
    ("Ridge Hawks", 0),
    ("Harbor State", 2),
    ("North Valley", -2),
    ("Crestwood", 1),
    ("Lakeside Tech", -3),
    ("Summit A&M", 3),
    ("Eastgate", -1),
    ("Pinefield", 0),
];

const ROSTER: [&str; 10] = [
    "Avery Cole",
    "Jordan Reyes",
    "Sam Whitfield",
    "Casey Lund",
    "Riley Tanaka",
    "Drew Okafor",
    "Morgan Pike",
    "Quinn Abrams",
    "Taylor Voss",
    "Reese Caldwell",
];

/// Generate a full `SeasonTables`, both optional tables included. Player
/// season totals are aggregated from the generated game logs, so every
/// cross-source join in the report lines up.
pub fn demo_tables(seed: u64) -> SeasonTables {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap_or_default();

    let mut matches = Vec::new();
    let mut game_logs: Vec<PlayerGameLogRecord> = Vec::new();
    let mut events: Vec<ScoringEventRecord> = Vec::new();

    for week in 0..14i64 {
        let (opponent, strength) = OPPONENTS[week as usize % OPPONENTS.len()];
        let date = (start + Duration::days(week * 7))
            .format("%Y-%m-%d")
            .to_string();

        let goals_for = rng.gen_range(6..=16) as i32;
        let mut goals_against = (rng.gen_range(5..=14) as i32 + strength).max(1);
        if goals_against == goals_for {
            // The sport settles every game in overtime; nudge one way.
            goals_against += if rng.gen_bool(0.5) { 1 } else { -1 };
        }
        let goals_for = goals_for as u32;
        let goals_against = goals_against as u32;

        let result = if goals_for > goals_against {
            MatchResult::Win
        } else {
            MatchResult::Loss
        };
        matches.push(MatchRecord {
            date: date.clone(),
            opponent: opponent.to_string(),
            goals_for,
            goals_against,
            result,
        });

        // Split the team's goals over the roster; earlier names carry
        // more of the offense so the concentration stats have shape.
        let mut per_player_goals = [0u32; ROSTER.len()];
        let mut per_player_assists = [0u32; ROSTER.len()];
        for _ in 0..goals_for {
            let scorer = weighted_pick(&mut rng);
            per_player_goals[scorer] += 1;
            let assister = if rng.gen_bool(0.75) {
                let mut a = weighted_pick(&mut rng);
                if a == scorer {
                    a = (a + 1) % ROSTER.len();
                }
                Some(a)
            } else {
                None
            };
            if let Some(a) = assister {
                per_player_assists[a] += 1;
            }
            events.push(ScoringEventRecord {
                scorer: Some(ROSTER[scorer].to_string()),
                assister: assister.map(|a| ROSTER[a].to_string()),
            });
        }

        for (i, name) in ROSTER.iter().enumerate() {
            let goals = per_player_goals[i];
            let assists = per_player_assists[i];
            if goals == 0 && assists == 0 && rng.gen_bool(0.5) {
                // Quiet game, no log row for this player.
                continue;
            }
            game_logs.push(PlayerGameLogRecord {
                player: name.to_string(),
                date: date.clone(),
                opponent: opponent.to_string(),
                points: goals + assists,
                goals,
                assists,
            });
        }
    }

    let players = aggregate_players(&game_logs);

    SeasonTables {
        matches,
        players,
        game_logs: Some(game_logs),
        events: Some(events),
    }
}

/// Index into the roster, biased toward the front.
fn weighted_pick(rng: &mut StdRng) -> usize {
    let a = rng.gen_range(0..ROSTER.len());
    let b = rng.gen_range(0..ROSTER.len());
    a.min(b)
}

fn aggregate_players(game_logs: &[PlayerGameLogRecord]) -> Vec<PlayerSeasonRecord> {
    ROSTER
        .iter()
        .map(|name| {
            let rows: Vec<_> = game_logs.iter().filter(|l| l.player == *name).collect();
            let goals: u32 = rows.iter().map(|l| l.goals).sum();
            let assists: u32 = rows.iter().map(|l| l.assists).sum();
            PlayerSeasonRecord {
                name: name.to_string(),
                games_played: rows.len() as u32,
                goals,
                assists,
                points: goals + assists,
            }
        })
        .collect()
}
