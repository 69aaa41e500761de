//! `atp room` command - Room management

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{progress_bar, prompt_line, styled_percent, Session};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::progress::{room_progress, sheet_progress};
use crate::core::DestroyTarget;
use crate::entities::{RoomField, SheetKey};

#[derive(Subcommand, Debug)]
pub enum RoomCommands {
    /// List rooms with progress
    List,

    /// Add a room with the default checklists
    Add(AddArgs),

    /// Show a room's sheets and equipment count
    Show(RoomArg),

    /// Change a room's name or description
    Set(SetArgs),

    /// Delete a room (asks for the room name to confirm)
    Delete(DeleteArgs),

    /// Make a room the active one
    Select(RoomArg),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Display name; the room key is derived from it
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct RoomArg {
    /// Room key or name (default: active room)
    pub room: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Room key or name (default: active room)
    pub room: Option<String>,

    /// New display name (the key stays the same)
    #[arg(long)]
    pub name: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Room key or name
    pub room: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const LIST_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("key", "KEY", 24),
    ColumnDef::new("name", "NAME", 30),
    ColumnDef::new("done", "DONE", 6),
    ColumnDef::new("total", "TOTAL", 7),
    ColumnDef::new("progress", "PROGRESS", 10),
];

pub fn run(cmd: RoomCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        RoomCommands::List => run_list(global),
        RoomCommands::Add(args) => run_add(args, global),
        RoomCommands::Show(args) => run_show(args, global),
        RoomCommands::Set(args) => run_set(args, global),
        RoomCommands::Delete(args) => run_delete(args, global),
        RoomCommands::Select(args) => run_select(args, global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let project = session.state.project();
    let format = session.format(global);

    if format == OutputFormat::Json {
        let rooms: Vec<_> = project
            .rooms
            .iter()
            .map(|(key, room)| {
                serde_json::json!({
                    "key": key,
                    "name": room.name,
                    "description": room.description,
                    "active": session.state.active_room() == Some(key.as_str()),
                    "progress": room_progress(project, key),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rooms).unwrap_or_default());
        return Ok(());
    }

    let rows = project.rooms.iter().map(|(key, room)| {
        let p = room_progress(project, key);
        let marker = if session.state.active_room() == Some(key.as_str()) {
            format!("{} *", key)
        } else {
            key.clone()
        };
        TableRow::new()
            .cell("key", CellValue::Key(marker))
            .cell("name", CellValue::Text(room.name.clone()))
            .cell("done", CellValue::Number(p.completed as i64))
            .cell("total", CellValue::Number(p.total as i64))
            .cell("progress", CellValue::Percent(p.percentage))
    });

    let config = if global.quiet {
        TableConfig::for_pipe()
    } else {
        TableConfig::default()
    };
    TableFormatter::new(LIST_COLUMNS, "room")
        .with_config(config)
        .output(rows, format);
    Ok(())
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let key = session.state.add_room(&args.name)?;
    if !global.quiet {
        println!(
            "{} Added room {} ({}), now active",
            style("✓").green(),
            style(&args.name).cyan(),
            style(&key).dim()
        );
    } else {
        println!("{}", key);
    }
    Ok(())
}

fn run_show(args: RoomArg, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let key = session.room_key(args.room.as_deref())?;
    let project = session.state.project();
    let Some(room) = project.room(&key) else {
        return Err(crate::core::AtpError::RoomNotFound(key).into());
    };

    if session.format(global) == OutputFormat::Json {
        let sheets: Vec<_> = SheetKey::ALL
            .iter()
            .map(|s| {
                serde_json::json!({
                    "sheet": s.as_str(),
                    "progress": sheet_progress(project, &key, *s),
                })
            })
            .collect();
        let out = serde_json::json!({
            "key": key,
            "name": room.name,
            "description": room.description,
            "progress": room_progress(project, &key),
            "sheets": sheets,
            "equipment": room.equipment().map_or(0, |t| t.data.len()),
        });
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
        return Ok(());
    }

    println!("{} {}", style(&room.name).bold(), style(format!("({})", key)).dim());
    if !room.description.is_empty() {
        println!("{}", room.description);
    }
    println!();
    for sheet in SheetKey::ALL {
        let p = sheet_progress(project, &key, sheet);
        let label = room
            .sheet(sheet)
            .map(|s| format!("{} - {}", s.title, s.description))
            .unwrap_or_else(|| sheet.title().to_string());
        println!(
            "  {:<32} {} {:>4} {}",
            label,
            progress_bar(p.percentage, 20),
            styled_percent(p.percentage),
            style(format!("{}/{}", p.completed, p.total)).dim()
        );
    }
    let p = room_progress(project, &key);
    println!();
    println!(
        "  {:<32} {} {:>4} {}",
        style("Room total").bold(),
        progress_bar(p.percentage, 20),
        styled_percent(p.percentage),
        style(format!("{}/{}", p.completed, p.total)).dim()
    );
    println!(
        "  {:<32} {}",
        "Equipment rows",
        room.equipment().map_or(0, |t| t.data.len())
    );
    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let mut fields = Vec::new();
    if let Some(v) = args.name {
        fields.push(RoomField::Name(v));
    }
    if let Some(v) = args.description {
        fields.push(RoomField::Description(v));
    }
    if fields.is_empty() {
        return Err(miette::miette!("Nothing to set. Use --name or --description"));
    }

    let mut session = Session::open(global)?;
    let key = session.room_key(args.room.as_deref())?;
    for field in fields {
        session.state.update_room(&key, field)?;
    }
    if !global.quiet {
        println!("{} Updated room {}", style("✓").green(), style(&key).cyan());
    }
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let key = session.room_key(Some(&args.room))?;
    let token = session.state.request_destroy(DestroyTarget::Room(key.clone()))?;

    let input = if args.yes {
        token.phrase.clone()
    } else {
        println!(
            "Deleting room {} removes its checklists and equipment list.",
            style(&token.phrase).cyan()
        );
        prompt_line(&format!("Type the room name \"{}\" to confirm: ", token.phrase))?
    };

    session.state.confirm_destroy(token, &input)?;
    if !global.quiet {
        println!("{} Deleted room {}", style("✓").green(), style(&key).cyan());
    }
    Ok(())
}

fn run_select(args: RoomArg, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let key = match args.room.as_deref() {
        Some(r) => session.room_key(Some(r))?,
        None => {
            // No argument: report the current selection
            let active = session.room_key(None)?;
            println!("{}", active);
            return Ok(());
        }
    };
    session.state.select_room(&key)?;
    if !global.quiet {
        println!("{} Active room: {}", style("✓").green(), style(&key).cyan());
    }
    Ok(())
}
