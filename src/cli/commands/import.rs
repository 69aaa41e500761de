//! `atp import` command - Import equipment lists from CSV or Excel

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{confirm, truncate_str, Session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::csv::Row;
use crate::core::import::{read_import_file, reconcile};
use crate::core::ImportReport;

/// Rows shown before asking to proceed
const PREVIEW_ROWS: usize = 5;

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// CSV, XLSX or XLS file; the first sheet of a workbook is used
    pub file: PathBuf,

    /// Show what would be imported without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let rows = read_import_file(&args.file)?;
    let count = session.state.stage_import(rows)?;
    let json = session.format(global) == OutputFormat::Json;

    if !json && !global.quiet {
        if let Some(rows) = session.state.pending_import() {
            print_preview(rows);
        }
    }

    if args.dry_run {
        let mut scratch = session.state.project().clone();
        let report = session
            .state
            .pending_import()
            .map(|rows| reconcile(&mut scratch, rows))
            .unwrap_or_default();
        session.state.cancel_import();
        print_report(&report, json, true);
        return Ok(());
    }

    if !args.yes && !confirm(&format!("Import {} row(s)?", count))? {
        session.state.cancel_import();
        println!("Import cancelled.");
        return Ok(());
    }

    let report = session.state.process_import()?;
    print_report(&report, json, false);
    Ok(())
}

fn print_preview(rows: &[Row]) {
    println!(
        "{} {} row(s) read",
        style("→").dim(),
        style(rows.len()).cyan()
    );
    for row in rows.iter().take(PREVIEW_ROWS) {
        let get = |names: &[&str]| {
            names
                .iter()
                .filter_map(|n| row.get(*n))
                .find(|v| !v.is_empty())
                .cloned()
                .unwrap_or_default()
        };
        println!(
            "  {:<20} {:<10} {:<16} {}",
            truncate_str(&get(&["Room", "room"]), 20),
            truncate_str(&get(&["Equipment ID", "equipmentId"]), 10),
            truncate_str(&get(&["MFG", "mfg"]), 16),
            truncate_str(&get(&["Model #", "model"]), 24)
        );
    }
    if rows.len() > PREVIEW_ROWS {
        println!("  {}", style(format!("... and {} more", rows.len() - PREVIEW_ROWS)).dim());
    }
    println!();
}

fn print_report(report: &ImportReport, json: bool, dry_run: bool) {
    if json {
        let out = serde_json::json!({
            "dryRun": dry_run,
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
        return;
    }

    let verb = if dry_run { "Would import" } else { "Successfully imported" };
    println!(
        "{} {} {} equipment items across {} rooms: {}",
        if dry_run { style("○").yellow() } else { style("✓").green() },
        verb,
        style(report.imported_count).cyan(),
        report.distinct_rooms_touched(),
        report.rooms_touched.join(", ")
    );
    if !report.rooms_created.is_empty() {
        println!(
            "  {} new room(s): {}",
            report.rooms_created.len(),
            report.rooms_created.join(", ")
        );
    }
    if report.rows_skipped > 0 {
        println!(
            "  {} {} row(s) skipped (no room name)",
            style("!").yellow(),
            report.rows_skipped
        );
    }
}
