use std::io::{self, Write};

use crate::dynamics::FitOutcome;
use crate::match_stats::FilterRecord;
use crate::ratio::{NO_DATA, safe_pct};
use crate::report::Report;
use crate::tables::MatchRecord;

const TABLE_LIMIT: usize = 15;

pub fn render_report(report: &Report, out: &mut impl Write) -> io::Result<()> {
    baseline(report, out)?;
    expectation(report, out)?;
    concentration(report, out)?;
    opponents(report, out)?;
    close_games(report, out)?;
    momentum(report, out)?;
    efficiency(report, out)?;
    splits_section(report, out)?;
    synergy_section(report, out)?;
    dynamics_section(report, out)?;
    writeln!(out, "\nDone.")
}

fn banner(out: &mut impl Write, title: &str) -> io::Result<()> {
    let line = "=".repeat(title.chars().count());
    writeln!(out, "\n{line}\n{title}\n{line}")
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{v:.decimals$}"),
        None => NO_DATA.to_string(),
    }
}

fn match_line(m: &MatchRecord) -> String {
    format!(
        "{}-{} vs {} on {}",
        m.goals_for, m.goals_against, m.opponent, m.date
    )
}

fn record_line(rec: &FilterRecord) -> String {
    format!(
        "{}-{} ({})",
        rec.wins,
        rec.losses,
        safe_pct(rec.wins as f64, rec.games as f64)
    )
}

fn baseline(report: &Report, out: &mut impl Write) -> io::Result<()> {
    banner(out, "Baseline Season Snapshot")?;
    let b = &report.baseline;
    writeln!(out, "Games: {}  |  W-L: {}-{}", b.games, b.wins, b.losses)?;
    match &b.leading_scorer {
        Some(h) => writeln!(out, "Leading scorer: {} ({:.0} goals)", h.name, h.value)?,
        None => writeln!(out, "Leading scorer: {NO_DATA}")?,
    }
    match &b.top_points_per_game {
        Some(h) => writeln!(out, "Top PPG: {} ({:.2})", h.name, h.value)?,
        None => writeln!(out, "Top PPG: {NO_DATA}")?,
    }
    match &b.assist_leader {
        Some(h) => writeln!(out, "Assist leader: {} ({:.0})", h.name, h.value)?,
        None => writeln!(out, "Assist leader: {NO_DATA}")?,
    }
    match &b.tightest_match {
        Some(m) => writeln!(out, "Tightest match: {}", match_line(m))?,
        None => writeln!(out, "Tightest match: {NO_DATA}")?,
    }
    match &b.highest_scoring_match {
        Some(m) => writeln!(out, "Highest team score: {} vs {}", m.goals_for, m.opponent)?,
        None => writeln!(out, "Highest team score: {NO_DATA}")?,
    }
    writeln!(out, "Narrow defeats (≤{}): {}", report.close_games.margin, b.narrow_defeats)?;
    match &b.biggest_win {
        Some(m) => writeln!(out, "Biggest win: {} (margin {:+})", match_line(m), m.diff())?,
        None => writeln!(out, "Biggest win: none (no wins)")?,
    }
    Ok(())
}

fn expectation(report: &Report, out: &mut impl Write) -> io::Result<()> {
    banner(out, "1) Pythagorean Expectation")?;
    let e = &report.expectation;
    writeln!(out, "Goals For: {}, Goals Against: {}", e.goals_for, e.goals_against)?;
    writeln!(out, "Expected Win%: {}", fmt_opt(e.expected_win_pct, 3))?;
    writeln!(out, "Actual Win%: {}", fmt_opt(e.actual_win_pct, 3))?;
    match (e.expected_wins, e.luck) {
        (Some(exp), Some(luck)) => writeln!(
            out,
            "Expected Wins: {exp:.2} vs Actual Wins: {}  ->  Luck: {luck:+.2}",
            report.baseline.wins
        ),
        _ => writeln!(out, "Expected Wins: {NO_DATA}"),
    }
}

fn concentration(report: &Report, out: &mut impl Write) -> io::Result<()> {
    banner(out, "2) Scoring Concentration")?;
    let c = &report.concentration;
    writeln!(
        out,
        "Gini(Goals): {:.3}  |  Gini(Points): {:.3}",
        c.gini_goals, c.gini_points
    )?;
    writeln!(
        out,
        "HHI(Goals): {:.3}   |  HHI(Points): {:.3}",
        c.hhi_goals, c.hhi_points
    )?;
    writeln!(out, "\nTop {} offense shares (by Points):", c.share_leaders.len())?;
    for leader in &c.share_leaders {
        writeln!(
            out,
            "  {:<24} {:>4}  {:>6.1}%",
            leader.name, leader.points, leader.share_of_points
        )?;
    }
    Ok(())
}

fn opponents(report: &Report, out: &mut impl Write) -> io::Result<()> {
    banner(out, "3) Opponent Profiles")?;
    writeln!(
        out,
        "{:<24} {:>5} {:>7} {:>7} {:>7} {:>5} {:>7}",
        "Opponent", "Games", "Avg GF", "Avg GA", "Margin", "Wins", "Win%"
    )?;
    for p in &report.opponents.profiles {
        writeln!(
            out,
            "{:<24} {:>5} {:>7.2} {:>7.2} {:>7.2} {:>5} {:>7}",
            p.opponent,
            p.games,
            p.avg_goals_for,
            p.avg_goals_against,
            p.avg_margin,
            p.wins,
            safe_pct(p.wins as f64, p.games as f64)
        )?;
    }
    writeln!(out, "\nBest opponents by avg margin:")?;
    for p in &report.opponents.best {
        writeln!(out, "  {:<24} {:>7.2}", p.opponent, p.avg_margin)?;
    }
    writeln!(out, "\nToughest opponents by avg margin:")?;
    for p in &report.opponents.toughest {
        writeln!(out, "  {:<24} {:>7.2}", p.opponent, p.avg_margin)?;
    }
    Ok(())
}

fn close_games(report: &Report, out: &mut impl Write) -> io::Result<()> {
    banner(out, "4) Close-Game Performance")?;
    let c = &report.close_games;
    writeln!(out, "1-goal games: {} | Record: {}", c.one_goal.games, record_line(&c.one_goal))?;
    writeln!(out, "2-goal games: {} | Record: {}", c.two_goal.games, record_line(&c.two_goal))?;
    writeln!(
        out,
        "≤{}-goal games: {} | Record: {}",
        c.margin,
        c.within_margin.games,
        record_line(&c.within_margin)
    )
}

fn momentum(report: &Report, out: &mut impl Write) -> io::Result<()> {
    banner(out, "5) Team Momentum")?;
    let mo = &report.momentum;
    if !mo.chronological {
        writeln!(out, "(some dates unparsable; rows kept in input order)")?;
    }
    writeln!(
        out,
        "{:<12} {:<24} {:>5} {:>5} {:>7} {:>8} {:>8} {:>8}",
        "Date", "Opponent", "GF", "GA", "Margin", "Roll GF", "Roll GA", "Roll +/-"
    )?;
    for r in &mo.rows {
        writeln!(
            out,
            "{:<12} {:<24} {:>5} {:>5} {:>7} {:>8.2} {:>8.2} {:>8.2}",
            r.date,
            r.opponent,
            r.goals_for,
            r.goals_against,
            r.margin,
            r.roll_goals_for,
            r.roll_goals_against,
            r.roll_margin
        )?;
    }
    match &mo.best_stretch {
        Some(r) => writeln!(
            out,
            "\nBest {}-game rolling stretch: {} on {} ({:.2})",
            mo.window, r.opponent, r.date, r.roll_margin
        )?,
        None => writeln!(out, "\nBest {}-game rolling stretch: {NO_DATA}", mo.window)?,
    }
    match &mo.worst_stretch {
        Some(r) => writeln!(
            out,
            "Toughest {}-game rolling stretch: {} on {} ({:.2})",
            mo.window, r.opponent, r.date, r.roll_margin
        )?,
        None => writeln!(out, "Toughest {}-game rolling stretch: {NO_DATA}", mo.window)?,
    }
    Ok(())
}

fn efficiency(report: &Report, out: &mut impl Write) -> io::Result<()> {
    banner(out, "6) Player Efficiency & Reliability")?;
    writeln!(
        out,
        "{:<24} {:>3} {:>4} {:>4} {:>4} {:>6} {:>7} {:>7} {:>7} {:>7}",
        "Player", "GP", "G", "A", "P", "PPG", "Pts%", "Goals%", "Z(P)", "Z(PPG)"
    )?;
    for r in &report.efficiency {
        writeln!(
            out,
            "{:<24} {:>3} {:>4} {:>4} {:>4} {:>6} {:>6.1}% {:>6.1}% {:>7.2} {:>7.2}",
            r.name,
            r.games_played,
            r.goals,
            r.assists,
            r.points,
            fmt_opt(r.points_per_game, 2),
            r.share_of_points,
            r.share_of_goals,
            r.z_points,
            r.z_points_per_game
        )?;
    }
    Ok(())
}

fn splits_section(report: &Report, out: &mut impl Write) -> io::Result<()> {
    banner(out, "BONUS A) Win/Loss Splits & Clutch")?;
    let Some(splits) = &report.outcome_splits else {
        return writeln!(out, "Unavailable: no per-game log table.");
    };
    writeln!(
        out,
        "{:<24} {:>4} {:>7} {:>7} {:>7} {:>4} {:>7} {:>7} {:>7}",
        "Player", "W-G", "W-Pts", "W-Gls", "W-Ast", "L-G", "L-Pts", "L-Gls", "L-Ast"
    )?;
    for r in splits.rows.iter().take(TABLE_LIMIT) {
        writeln!(
            out,
            "{:<24} {:>4} {:>7.2} {:>7.2} {:>7.2} {:>4} {:>7.2} {:>7.2} {:>7.2}",
            r.player,
            r.win_games,
            r.win_avg_points,
            r.win_avg_goals,
            r.win_avg_assists,
            r.loss_games,
            r.loss_avg_points,
            r.loss_avg_goals,
            r.loss_avg_assists
        )?;
    }
    if splits.clutch.is_empty() {
        writeln!(out, "\nNo close-game rows found in per-game logs.")?;
    } else {
        writeln!(out, "\nClutch performers:")?;
        for r in splits.clutch.iter().take(TABLE_LIMIT) {
            writeln!(
                out,
                "  {:<24} {:>4} {:>7.2} {:>7.2} {:>7.2}",
                r.player, r.games, r.avg_points, r.avg_goals, r.avg_assists
            )?;
        }
    }
    Ok(())
}

fn synergy_section(report: &Report, out: &mut impl Write) -> io::Result<()> {
    banner(out, "BONUS B) Synergy Pairs")?;
    let Some(pairs) = &report.synergy else {
        return writeln!(out, "Unavailable: no scoring event table.");
    };
    if pairs.is_empty() {
        return writeln!(out, "No fully-specified assister/scorer rows.");
    }
    writeln!(out, "{:<24} {:<24} {:>6}", "Assister", "Scorer", "Goals")?;
    for p in pairs {
        writeln!(out, "{:<24} {:<24} {:>6}", p.assister, p.scorer, p.goals_created)?;
    }
    Ok(())
}

fn dynamics_section(report: &Report, out: &mut impl Write) -> io::Result<()> {
    banner(out, "BONUS C) Scoring Dynamics")?;
    writeln!(
        out,
        "Correlation(Team Score, Opponent Score): {}",
        fmt_opt(report.dynamics.correlation, 3)
    )?;
    match &report.dynamics.fit {
        FitOutcome::Fit { intercept, slope } => writeln!(
            out,
            "OLS: Team Score ~= {intercept:.2} + {slope:.2} * Opponent Score"
        ),
        FitOutcome::Failed { reason } => writeln!(out, "OLS failed: {reason}"),
    }
}
