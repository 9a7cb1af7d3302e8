use std::io;

use lax25_report::demo_season::demo_tables;
use lax25_report::render::render_report;
use lax25_report::report::{ReportConfig, build_report};

// Offline run over a generated season: no input files needed, useful for
// eyeballing the report layout and for quick iteration on the engine.
fn main() -> anyhow::Result<()> {
    let seed = std::env::args()
        .nth(1)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(26);

    let tables = demo_tables(seed);
    let report = build_report(&tables, &ReportConfig::default());

    let stdout = io::stdout();
    render_report(&report, &mut stdout.lock())?;
    Ok(())
}
