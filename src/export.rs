use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::dynamics::FitOutcome;
use crate::ratio::NO_DATA;
use crate::report::Report;
use crate::splits::{OutcomeSplits, SynergyPair};

/// Atomic JSON dump: write to a temp file, then swap it into place.
pub fn write_json(report: &Report, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(report).context("serialize report")?;
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

pub fn write_xlsx(report: &Report, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Summary").context("name Summary sheet")?;
    write_rows(sheet, &summary_rows(report))?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("Opponents").context("name Opponents sheet")?;
    write_rows(sheet, &opponent_rows(report))?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("Momentum").context("name Momentum sheet")?;
    write_rows(sheet, &momentum_rows(report))?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("Efficiency").context("name Efficiency sheet")?;
    write_rows(sheet, &efficiency_rows(report))?;

    if let Some(splits) = &report.outcome_splits {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Splits").context("name Splits sheet")?;
        write_rows(sheet, &split_rows(splits))?;
    }
    if let Some(pairs) = &report.synergy {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Synergy").context("name Synergy sheet")?;
        write_rows(sheet, &synergy_rows(pairs))?;
    }

    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;
    Ok(())
}

fn opt_num(v: Option<f64>, decimals: usize) -> String {
    v.map(|v| format!("{v:.decimals$}"))
        .unwrap_or_else(|| NO_DATA.to_string())
}

fn summary_rows(report: &Report) -> Vec<Vec<String>> {
    let b = &report.baseline;
    let e = &report.expectation;
    let c = &report.concentration;
    let mut rows = vec![
        vec!["Metric".to_string(), "Value".to_string()],
        vec!["Games".to_string(), b.games.to_string()],
        vec!["Wins".to_string(), b.wins.to_string()],
        vec!["Losses".to_string(), b.losses.to_string()],
        vec!["Goals For".to_string(), e.goals_for.to_string()],
        vec!["Goals Against".to_string(), e.goals_against.to_string()],
        vec!["Expected Win%".to_string(), opt_num(e.expected_win_pct, 3)],
        vec!["Actual Win%".to_string(), opt_num(e.actual_win_pct, 3)],
        vec!["Luck".to_string(), opt_num(e.luck, 2)],
        vec!["Gini (Goals)".to_string(), format!("{:.3}", c.gini_goals)],
        vec!["Gini (Points)".to_string(), format!("{:.3}", c.gini_points)],
        vec!["HHI (Goals)".to_string(), format!("{:.3}", c.hhi_goals)],
        vec!["HHI (Points)".to_string(), format!("{:.3}", c.hhi_points)],
        vec![
            "Correlation".to_string(),
            opt_num(report.dynamics.correlation, 3),
        ],
    ];
    match &report.dynamics.fit {
        FitOutcome::Fit { intercept, slope } => {
            rows.push(vec!["OLS Intercept".to_string(), format!("{intercept:.3}")]);
            rows.push(vec!["OLS Slope".to_string(), format!("{slope:.3}")]);
        }
        FitOutcome::Failed { reason } => {
            rows.push(vec!["OLS".to_string(), format!("failed: {reason}")]);
        }
    }
    rows
}

fn opponent_rows(report: &Report) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Opponent".to_string(),
        "Games".to_string(),
        "Avg GF".to_string(),
        "Avg GA".to_string(),
        "Avg Margin".to_string(),
        "Wins".to_string(),
        "Win%".to_string(),
    ]];
    for p in &report.opponents.profiles {
        rows.push(vec![
            p.opponent.clone(),
            p.games.to_string(),
            format!("{:.2}", p.avg_goals_for),
            format!("{:.2}", p.avg_goals_against),
            format!("{:.2}", p.avg_margin),
            p.wins.to_string(),
            opt_num(p.win_pct.map(|v| 100.0 * v), 1),
        ]);
    }
    rows
}

fn momentum_rows(report: &Report) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Date".to_string(),
        "Opponent".to_string(),
        "GF".to_string(),
        "GA".to_string(),
        "Margin".to_string(),
        "Roll GF".to_string(),
        "Roll GA".to_string(),
        "Roll Margin".to_string(),
    ]];
    for r in &report.momentum.rows {
        rows.push(vec![
            r.date.clone(),
            r.opponent.clone(),
            r.goals_for.to_string(),
            r.goals_against.to_string(),
            r.margin.to_string(),
            format!("{:.2}", r.roll_goals_for),
            format!("{:.2}", r.roll_goals_against),
            format!("{:.2}", r.roll_margin),
        ]);
    }
    rows
}

fn efficiency_rows(report: &Report) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Player".to_string(),
        "GP".to_string(),
        "Goals".to_string(),
        "Assists".to_string(),
        "Points".to_string(),
        "PPG".to_string(),
        "GPG".to_string(),
        "Share Points%".to_string(),
        "Share Goals%".to_string(),
        "Z Goals".to_string(),
        "Z Assists".to_string(),
        "Z Points".to_string(),
        "Z PPG".to_string(),
    ]];
    for r in &report.efficiency {
        rows.push(vec![
            r.name.clone(),
            r.games_played.to_string(),
            r.goals.to_string(),
            r.assists.to_string(),
            r.points.to_string(),
            opt_num(r.points_per_game, 2),
            opt_num(r.goals_per_game, 2),
            format!("{:.1}", r.share_of_points),
            format!("{:.1}", r.share_of_goals),
            format!("{:.2}", r.z_goals),
            format!("{:.2}", r.z_assists),
            format!("{:.2}", r.z_points),
            format!("{:.2}", r.z_points_per_game),
        ]);
    }
    rows
}

fn split_rows(splits: &OutcomeSplits) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Player".to_string(),
        "Win Games".to_string(),
        "Win Avg Points".to_string(),
        "Win Avg Goals".to_string(),
        "Win Avg Assists".to_string(),
        "Loss Games".to_string(),
        "Loss Avg Points".to_string(),
        "Loss Avg Goals".to_string(),
        "Loss Avg Assists".to_string(),
    ]];
    for r in &splits.rows {
        rows.push(vec![
            r.player.clone(),
            r.win_games.to_string(),
            format!("{:.2}", r.win_avg_points),
            format!("{:.2}", r.win_avg_goals),
            format!("{:.2}", r.win_avg_assists),
            r.loss_games.to_string(),
            format!("{:.2}", r.loss_avg_points),
            format!("{:.2}", r.loss_avg_goals),
            format!("{:.2}", r.loss_avg_assists),
        ]);
    }
    rows
}

fn synergy_rows(pairs: &[SynergyPair]) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Assister".to_string(),
        "Scorer".to_string(),
        "Goals Created".to_string(),
    ]];
    for p in pairs {
        rows.push(vec![
            p.assister.clone(),
            p.scorer.clone(),
            p.goals_created.to_string(),
        ]);
    }
    rows
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
