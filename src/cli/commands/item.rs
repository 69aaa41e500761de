//! `atp item` command - Checklist items

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::Session;
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::{ItemField, ItemStatus, SheetKey};

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// List checklist items of a room
    List(ListArgs),

    /// Edit one checklist item
    Set(SetArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Room key or name (default: active room)
    #[arg(long, short = 'r')]
    pub room: Option<String>,

    /// Only this sheet (e.g. in-house-commissioning)
    #[arg(long, short = 's')]
    pub sheet: Option<SheetKey>,

    /// Only items with this status (pending, pass, fail, na)
    #[arg(long)]
    pub status: Option<ItemStatus>,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Sheet key (e.g. on-site-programming)
    pub sheet: SheetKey,

    /// Category id within the sheet
    pub category: u32,

    /// Item id (e.g. 1.01)
    pub item: String,

    /// Room key or name (default: active room)
    #[arg(long, short = 'r')]
    pub room: Option<String>,

    /// New status; also stamps today's date
    #[arg(long)]
    pub status: Option<ItemStatus>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long)]
    pub initials: Option<String>,

    #[arg(long)]
    pub owner: Option<String>,

    /// Free-text date (overrides the stamp from --status)
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

const LIST_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("sheet", "SHEET", 24),
    ColumnDef::new("category", "CATEGORY", 26),
    ColumnDef::new("id", "ID", 7),
    ColumnDef::new("title", "TITLE", 32),
    ColumnDef::new("status", "STATUS", 9),
    ColumnDef::new("initials", "BY", 6),
    ColumnDef::new("date", "DATE", 12),
];

pub fn run(cmd: ItemCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ItemCommands::List(args) => run_list(args, global),
        ItemCommands::Set(args) => run_set(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let key = session.room_key(args.room.as_deref())?;
    let Some(room) = session.state.project().room(&key) else {
        return Err(crate::core::AtpError::RoomNotFound(key).into());
    };

    let sheets: Vec<SheetKey> = match args.sheet {
        Some(s) => vec![s],
        None => SheetKey::ALL.to_vec(),
    };

    let mut rows = Vec::new();
    let mut json = Vec::new();
    for sheet_key in sheets {
        let Some(sheet) = room.sheet(sheet_key) else {
            continue;
        };
        for category in &sheet.categories {
            for item in &category.items {
                if args.status.is_some_and(|s| s != item.status) {
                    continue;
                }
                json.push(serde_json::json!({
                    "sheet": sheet_key.as_str(),
                    "category": category.id,
                    "categoryName": category.name,
                    "item": item,
                }));
                rows.push(
                    TableRow::new()
                        .cell("sheet", CellValue::Text(sheet_key.as_str().to_string()))
                        .cell(
                            "category",
                            CellValue::Text(format!("{} {}", category.id, category.name)),
                        )
                        .cell("id", CellValue::Key(item.id.clone()))
                        .cell("title", CellValue::Text(item.title.clone()))
                        .cell("status", CellValue::Status(item.status))
                        .cell("initials", text_or_empty(&item.initials))
                        .cell("date", text_or_empty(&item.date)),
                );
            }
        }
    }

    let format = session.format(global);
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        return Ok(());
    }

    let config = if global.quiet {
        TableConfig::for_pipe()
    } else {
        TableConfig::default()
    };
    TableFormatter::new(LIST_COLUMNS, "item")
        .with_config(config)
        .output(rows, format);
    Ok(())
}

fn text_or_empty(s: &str) -> CellValue {
    if s.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(s.to_string())
    }
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let mut fields = Vec::new();
    if let Some(v) = args.title {
        fields.push(ItemField::Title(v));
    }
    if let Some(v) = args.description {
        fields.push(ItemField::Description(v));
    }
    if let Some(s) = args.status {
        fields.push(ItemField::Status(s));
    }
    if let Some(v) = args.notes {
        fields.push(ItemField::Notes(v));
    }
    if let Some(v) = args.initials {
        fields.push(ItemField::Initials(v));
    }
    if let Some(v) = args.owner {
        fields.push(ItemField::Owner(v));
    }
    // Applied after the status so an explicit date wins over the stamp
    if let Some(v) = args.date {
        fields.push(ItemField::Date(v));
    }
    if fields.is_empty() {
        return Err(miette::miette!(
            "Nothing to set. Use --status, --notes, --initials, --owner, --date, --title or --description"
        ));
    }

    let mut session = Session::open(global)?;
    let key = session.room_key(args.room.as_deref())?;
    for field in fields {
        session
            .state
            .update_item(&key, args.sheet, args.category, &args.item, field)?;
    }

    if !global.quiet {
        println!(
            "{} Updated item {} in {} / {}",
            style("✓").green(),
            style(&args.item).cyan(),
            style(&key).dim(),
            args.sheet
        );
    }
    Ok(())
}
