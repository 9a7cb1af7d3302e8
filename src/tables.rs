use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Loss,
}

impl MatchResult {
    pub fn letter(self) -> &'static str {
        match self {
            MatchResult::Win => "W",
            MatchResult::Loss => "L",
        }
    }
}

/// One contest. Scores are nonnegative by construction; `result` must be
/// `Win` iff `goals_for > goals_against` (enforced at ingest).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: String,
    pub opponent: String,
    pub goals_for: u32,
    pub goals_against: u32,
    pub result: MatchResult,
}

impl MatchRecord {
    /// Signed score differential; positive is a winning margin.
    pub fn diff(&self) -> i64 {
        self.goals_for as i64 - self.goals_against as i64
    }

    pub fn abs_diff(&self) -> i64 {
        self.diff().abs()
    }

    pub fn is_win(&self) -> bool {
        self.result == MatchResult::Win
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSeasonRecord {
    pub name: String,
    pub games_played: u32,
    pub goals: u32,
    pub assists: u32,
    pub points: u32,
}

/// One row per player per game; joins to `MatchRecord` on (date, opponent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerGameLogRecord {
    pub player: String,
    pub date: String,
    pub opponent: String,
    pub points: u32,
    pub goals: u32,
    pub assists: u32,
}

/// One scoring event. Either name can be missing in the source; rows
/// without both are skipped by the synergy stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringEventRecord {
    pub scorer: Option<String>,
    pub assister: Option<String>,
}

/// One season's worth of loaded tables. The optional sources are `None`
/// when their file is missing or malformed in a way ingest tolerates;
/// stages read the `Option` instead of probing the filesystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonTables {
    pub matches: Vec<MatchRecord>,
    pub players: Vec<PlayerSeasonRecord>,
    pub game_logs: Option<Vec<PlayerGameLogRecord>>,
    pub events: Option<Vec<ScoringEventRecord>>,
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%b %d, %Y"];

/// Best-effort parse over the formats the source exports use.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Canonical join key for a date cell: ISO form when parsable, otherwise
/// the trimmed raw text. Both join sides go through this, so rows sharing
/// an unparsable spelling still match.
pub fn canonical_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => raw.trim().to_string(),
    }
}
