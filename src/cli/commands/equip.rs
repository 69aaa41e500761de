//! `atp equip` command - Room equipment lists

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::Session;
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::AtpError;
use crate::entities::EQUIPMENT_TABLE;

#[derive(Subcommand, Debug)]
pub enum EquipCommands {
    /// List a room's equipment
    List(ListArgs),

    /// Add an equipment row
    Add(AddArgs),

    /// Set one field of an equipment row
    Set(SetArgs),

    /// Delete an equipment row
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Room key or name (default: active room)
    #[arg(long, short = 'r')]
    pub room: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Room key or name (default: active room)
    #[arg(long, short = 'r')]
    pub room: Option<String>,

    /// Initial values as KEY=VALUE; KEY is a header or field key
    /// (e.g. --field "Model #=DM-NVX-360")
    #[arg(long = "field", value_parser = parse_assignment)]
    pub fields: Vec<(String, String)>,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Row id
    pub id: u64,

    /// Header or field key (e.g. "IP Address" or ipAddress)
    pub field: String,

    pub value: String,

    /// Room key or name (default: active room)
    #[arg(long, short = 'r')]
    pub room: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Row id
    pub id: u64,

    /// Room key or name (default: active room)
    #[arg(long, short = 'r')]
    pub room: Option<String>,
}

const LIST_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 5),
    ColumnDef::new("equipmentId", "EQUIPMENT", 12),
    ColumnDef::new("mfg", "MFG", 16),
    ColumnDef::new("model", "MODEL #", 20),
    ColumnDef::new("serial", "SERIAL #", 16),
    ColumnDef::new("ipAddress", "IP", 16),
    ColumnDef::new("notes", "NOTES", 30),
];

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))
}

pub fn run(cmd: EquipCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        EquipCommands::List(args) => run_list(args, global),
        EquipCommands::Add(args) => run_add(args, global),
        EquipCommands::Set(args) => run_set(args, global),
        EquipCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let key = session.room_key(args.room.as_deref())?;
    let table = session
        .state
        .project()
        .room(&key)
        .and_then(|r| r.equipment())
        .ok_or_else(|| AtpError::TableNotFound(EQUIPMENT_TABLE.to_string()))?;

    let format = session.format(global);
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&table.data).unwrap_or_default());
        return Ok(());
    }

    let cell = |v: &str| {
        if v.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(v.to_string())
        }
    };
    let rows = table.data.iter().map(|row| {
        TableRow::new()
            .cell("id", CellValue::Number(row.id as i64))
            .cell("equipmentId", CellValue::Key(row.get("equipmentId").to_string()))
            .cell("mfg", cell(row.get("mfg")))
            .cell("model", cell(row.get("model")))
            .cell("serial", cell(row.get("serial")))
            .cell("ipAddress", cell(row.get("ipAddress")))
            .cell("notes", cell(row.get("notes")))
    });

    let config = if global.quiet {
        TableConfig::for_pipe()
    } else {
        TableConfig::default()
    };
    TableFormatter::new(LIST_COLUMNS, "equipment row")
        .with_config(config)
        .output(rows, format);
    Ok(())
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let key = session.room_key(args.room.as_deref())?;
    let id = session
        .state
        .add_reference_row(&key, EQUIPMENT_TABLE, &args.fields)?;

    if global.quiet {
        println!("{}", id);
    } else {
        println!(
            "{} Added equipment row {} to {}",
            style("✓").green(),
            style(id).cyan(),
            style(&key).dim()
        );
    }
    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let key = session.room_key(args.room.as_deref())?;
    session
        .state
        .update_reference_field(&key, EQUIPMENT_TABLE, args.id, &args.field, args.value)?;
    if !global.quiet {
        println!(
            "{} Updated {} on row {}",
            style("✓").green(),
            style(&args.field).cyan(),
            args.id
        );
    }
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let key = session.room_key(args.room.as_deref())?;
    session
        .state
        .delete_reference_row(&key, EQUIPMENT_TABLE, args.id)?;
    if !global.quiet {
        println!("{} Deleted row {}", style("✓").green(), args.id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("Model #=DM-NVX=360"),
            Ok(("Model #".to_string(), "DM-NVX=360".to_string()))
        );
        assert!(parse_assignment("novalue").is_err());
    }
}
