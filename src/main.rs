use std::env;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;

use lax25_report::export;
use lax25_report::ingest::{self, SeasonPaths};
use lax25_report::render::render_report;
use lax25_report::report::{ReportConfig, build_report};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let mut args = env::args().skip(1);
    let paths = SeasonPaths {
        matches: arg_or(&mut args, "data/matches.csv"),
        players: arg_or(&mut args, "data/player_stats.csv"),
        game_logs: arg_or(&mut args, "data/player_game_logs.csv"),
        events: arg_or(&mut args, "data/scoring_events.csv"),
    };
    let cfg = config_from_env();

    let tables = ingest::load_season(&paths)?;
    if tables.game_logs.is_none() {
        eprintln!("[WARN] No per-game log table; win/loss splits and clutch sections skipped");
    }
    if tables.events.is_none() {
        eprintln!("[WARN] No usable scoring event table; synergy section skipped");
    }

    let report = build_report(&tables, &cfg);

    let stdout = io::stdout();
    render_report(&report, &mut stdout.lock())?;

    if let Ok(path) = env::var("REPORT_JSON") {
        export::write_json(&report, Path::new(&path))?;
        eprintln!("[INFO] Report JSON written to {path}");
    }
    if let Ok(path) = env::var("REPORT_XLSX") {
        export::write_xlsx(&report, Path::new(&path))?;
        eprintln!("[INFO] Report workbook written to {path}");
    }

    Ok(())
}

fn arg_or(args: &mut impl Iterator<Item = String>, default: &str) -> PathBuf {
    args.next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn config_from_env() -> ReportConfig {
    let mut cfg = ReportConfig::default();
    if let Some(v) = env_parse::<f64>("PYTH_EXPONENT") {
        cfg.pyth_exponent = v;
    }
    if let Some(v) = env_parse::<i64>("CLOSE_MARGIN") {
        cfg.close_margin = v.max(0);
    }
    if let Some(v) = env_parse::<usize>("MOMENTUM_WINDOW") {
        cfg.momentum_window = v.max(1);
    }
    if let Some(v) = env_parse::<usize>("SHARE_LEADERS") {
        cfg.share_leaders = v.max(1);
    }
    if let Some(v) = env_parse::<usize>("SYNERGY_PAIRS") {
        cfg.synergy_pairs = v.max(1);
    }
    cfg
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
