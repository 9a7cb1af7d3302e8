use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::tables::{
    MatchRecord, MatchResult, PlayerGameLogRecord, PlayerSeasonRecord, ScoringEventRecord,
    SeasonTables,
};

#[derive(Debug, Clone)]
pub struct SeasonPaths {
    pub matches: PathBuf,
    pub players: PathBuf,
    pub game_logs: PathBuf,
    pub events: PathBuf,
}

#[derive(Debug, Deserialize)]
struct MatchRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Opponent")]
    opponent: String,
    #[serde(rename = "Team_Score")]
    team_score: u32,
    #[serde(rename = "Opponent_Score")]
    opponent_score: u32,
    #[serde(rename = "Result")]
    result: String,
}

#[derive(Debug, Deserialize)]
struct PlayerRow {
    #[serde(rename = "Player")]
    player: String,
    #[serde(rename = "Games_Played")]
    games_played: u32,
    #[serde(rename = "Goals")]
    goals: u32,
    #[serde(rename = "Assists")]
    assists: u32,
    #[serde(rename = "Points", default)]
    points: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GameLogRow {
    #[serde(rename = "Player")]
    player: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Opponent")]
    opponent: String,
    #[serde(rename = "Points")]
    points: u32,
    #[serde(rename = "Goals")]
    goals: u32,
    #[serde(rename = "Assists")]
    assists: u32,
}

pub fn load_matches(path: &Path) -> Result<Vec<MatchRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open match table {}", path.display()))?;
    let mut out = Vec::new();
    for (idx, row) in reader.deserialize::<MatchRow>().enumerate() {
        let row = row.with_context(|| format!("match table row {}", idx + 1))?;
        let result = match row.result.trim() {
            "W" | "w" => MatchResult::Win,
            "L" | "l" => MatchResult::Loss,
            other => bail!("match table row {}: unknown result {other:?}", idx + 1),
        };
        // Result must agree with the scores; a mislabeled row would skew
        // every downstream win/loss figure.
        let score_says_win = row.team_score > row.opponent_score;
        if score_says_win != (result == MatchResult::Win) {
            bail!(
                "match table row {}: result {:?} contradicts score {}-{}",
                idx + 1,
                row.result.trim(),
                row.team_score,
                row.opponent_score
            );
        }
        out.push(MatchRecord {
            date: row.date.trim().to_string(),
            opponent: row.opponent.trim().to_string(),
            goals_for: row.team_score,
            goals_against: row.opponent_score,
            result,
        });
    }
    Ok(out)
}

pub fn load_players(path: &Path) -> Result<Vec<PlayerSeasonRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open player table {}", path.display()))?;
    let mut out = Vec::new();
    for (idx, row) in reader.deserialize::<PlayerRow>().enumerate() {
        let row = row.with_context(|| format!("player table row {}", idx + 1))?;
        out.push(PlayerSeasonRecord {
            name: row.player.trim().to_string(),
            games_played: row.games_played,
            goals: row.goals,
            assists: row.assists,
            // Some exports omit the points column; goals + assists is the
            // same quantity for this sport.
            points: row.points.unwrap_or(row.goals + row.assists),
        });
    }
    Ok(out)
}

pub fn load_game_logs(path: &Path) -> Result<Vec<PlayerGameLogRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open game log table {}", path.display()))?;
    let mut out = Vec::new();
    for (idx, row) in reader.deserialize::<GameLogRow>().enumerate() {
        let row = row.with_context(|| format!("game log row {}", idx + 1))?;
        out.push(PlayerGameLogRecord {
            player: row.player.trim().to_string(),
            date: row.date.trim().to_string(),
            opponent: row.opponent.trim().to_string(),
            points: row.points,
            goals: row.goals,
            assists: row.assists,
        });
    }
    Ok(out)
}

/// Scoring events need both a Scorer and an Assister column to be usable
/// by the synergy stage; a file without them loads as `None` so the stage
/// is skipped rather than failing the whole run. Empty cells become
/// `None` fields.
pub fn load_events(path: &Path) -> Result<Option<Vec<ScoringEventRecord>>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open scoring event table {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("read headers of {}", path.display()))?
        .clone();
    let scorer_idx = headers.iter().position(|h| h.trim() == "Scorer");
    let assister_idx = headers.iter().position(|h| h.trim() == "Assister");
    let (Some(scorer_idx), Some(assister_idx)) = (scorer_idx, assister_idx) else {
        return Ok(None);
    };

    let mut out = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("scoring event row {}", idx + 1))?;
        out.push(ScoringEventRecord {
            scorer: non_empty(record.get(scorer_idx)),
            assister: non_empty(record.get(assister_idx)),
        });
    }
    Ok(Some(out))
}

fn non_empty(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Load everything for one season. The two optional tables are absent
/// when their file does not exist; that check lives here, outside the
/// compute stages.
pub fn load_season(paths: &SeasonPaths) -> Result<SeasonTables> {
    let matches = load_matches(&paths.matches)?;
    let players = load_players(&paths.players)?;
    let game_logs = if paths.game_logs.exists() {
        Some(load_game_logs(&paths.game_logs)?)
    } else {
        None
    };
    let events = if paths.events.exists() {
        load_events(&paths.events)?
    } else {
        None
    };
    Ok(SeasonTables {
        matches,
        players,
        game_logs,
        events,
    })
}
