//! `atp status` command - Progress dashboard

use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{truncate_str, Session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::progress::{project_progress, room_progress, sheet_progress};
use crate::core::Progress;
use crate::entities::{ItemStatus, Project, SheetKey};

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Room key or name; omit for the whole project
    pub room: Option<String>,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let project = session.state.project();
    let room = match args.room.as_deref() {
        Some(r) => Some(session.room_key(Some(r))?),
        None => None,
    };

    if session.format(global) == OutputFormat::Json {
        let value = match &room {
            Some(key) => room_json(project, key),
            None => serde_json::json!({
                "project": project_progress(project),
                "rooms": project
                    .rooms
                    .keys()
                    .map(|key| room_json(project, key))
                    .collect::<Vec<_>>(),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
        return Ok(());
    }

    let output = match &room {
        Some(key) => room_report(project, key),
        None => project_report(project),
    };
    write_output(&output, args.output)
}

fn room_json(project: &Project, key: &str) -> serde_json::Value {
    let sheets: serde_json::Map<String, serde_json::Value> = SheetKey::ALL
        .iter()
        .map(|s| {
            (
                s.as_str().to_string(),
                serde_json::json!(sheet_progress(project, key, *s)),
            )
        })
        .collect();
    serde_json::json!({
        "room": key,
        "progress": room_progress(project, key),
        "sheets": sheets,
    })
}

fn progress_cells(p: Progress) -> [String; 3] {
    [
        p.completed.to_string(),
        p.total.to_string(),
        format!("{}%", p.percentage),
    ]
}

fn project_report(project: &Project) -> String {
    let info = &project.project_info;
    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", info.project_name));
    output.push_str(&format!(
        "Client: {}  \nProject #: {}\n\n",
        info.client_name, info.project_number
    ));

    output.push_str("## Rooms\n\n");
    let mut rooms = Builder::default();
    rooms.push_record(["Room", "Done", "Total", "Progress"]);
    for (key, room) in &project.rooms {
        let [done, total, pct] = progress_cells(room_progress(project, key));
        rooms.push_record([truncate_str(&room.name, 40), done, total, pct]);
    }
    let [done, total, pct] = progress_cells(project_progress(project));
    rooms.push_record(["**Project**".to_string(), done, total, pct]);
    output.push_str(&rooms.build().with(Style::markdown()).to_string());
    output.push('\n');

    push_failures(&mut output, project, project.rooms.keys().map(String::as_str));
    output
}

fn room_report(project: &Project, key: &str) -> String {
    let mut output = String::new();
    let name = project.room(key).map_or(key, |r| r.name.as_str());
    output.push_str(&format!("# {}\n\n", name));

    output.push_str("## Sheets\n\n");
    let mut sheets = Builder::default();
    sheets.push_record(["Sheet", "Phase", "Done", "Total", "Progress"]);
    for sheet in SheetKey::ALL {
        let [done, total, pct] = progress_cells(sheet_progress(project, key, sheet));
        sheets.push_record([
            sheet.title().to_string(),
            sheet.phase().to_string(),
            done,
            total,
            pct,
        ]);
    }
    let [done, total, pct] = progress_cells(room_progress(project, key));
    sheets.push_record(["**Room**".to_string(), String::new(), done, total, pct]);
    output.push_str(&sheets.build().with(Style::markdown()).to_string());
    output.push('\n');

    push_failures(&mut output, project, std::iter::once(key));
    output
}

/// Append a table of failed items, if any
fn push_failures<'a>(output: &mut String, project: &Project, rooms: impl Iterator<Item = &'a str>) {
    let mut failures = Builder::default();
    failures.push_record(["Room", "Sheet", "Item", "Title", "Notes"]);
    let mut count = 0;
    for key in rooms {
        let Some(room) = project.room(key) else {
            continue;
        };
        for (sheet, data) in &room.test_data {
            for item in data.items().filter(|i| i.status == ItemStatus::Fail) {
                failures.push_record([
                    room.name.clone(),
                    sheet.as_str().to_string(),
                    item.id.clone(),
                    truncate_str(&item.title, 40),
                    truncate_str(&item.notes, 40),
                ]);
                count += 1;
            }
        }
    }
    if count > 0 {
        output.push_str("\n## Failed Items\n\n");
        output.push_str(&failures.build().with(Style::markdown()).to_string());
        output.push('\n');
    }
}

fn write_output(content: &str, path: Option<PathBuf>) -> Result<()> {
    match path {
        Some(p) => std::fs::write(&p, content).into_diagnostic(),
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::template;
    use crate::entities::ItemField;

    #[test]
    fn test_project_report_lists_rooms_and_total() {
        let project = template::seed_project();
        let out = project_report(&project);
        assert!(out.contains("## Rooms"));
        assert!(out.contains("| Board Room"));
        assert!(out.contains("**Project**"));
        assert!(!out.contains("## Failed Items"));
    }

    #[test]
    fn test_room_report_shows_failures() {
        let mut project = template::seed_project();
        let key = project.first_room_key().unwrap().to_string();
        let sheet = project.room(&key).unwrap().sheet(SheetKey::OnSiteCommissioning).unwrap();
        let cat = sheet.categories[0].id;
        let item = sheet.categories[0].items[0].id.clone();
        project
            .update_item(
                &key,
                SheetKey::OnSiteCommissioning,
                cat,
                &item,
                ItemField::Status(ItemStatus::Fail),
                "1/1/2026",
            )
            .unwrap();

        let out = room_report(&project, &key);
        assert!(out.contains("On-Site Commissioning"));
        assert!(out.contains("FIELD"));
        assert!(out.contains("## Failed Items"));
        assert!(out.contains(&item));
    }
}
