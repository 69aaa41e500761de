//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    clear::ClearArgs, completions::CompletionsArgs, config::ConfigCommands, equip::EquipCommands,
    export::ExportCommands, import::ImportArgs, init::InitArgs, item::ItemCommands,
    project::ProjectCommands, room::RoomCommands, status::StatusArgs,
};

#[derive(Parser)]
#[command(name = "atp")]
#[command(author, version, about = "AV acceptance test plan tracker")]
#[command(long_about = "Track rooms, commissioning checklists and equipment inventories for \
audiovisual installs, and export the results to CSV or Excel.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Workspace root (default: auto-detect by finding .atp/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new workspace with the sample project
    Init(InitArgs),

    /// Project information and display settings
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Room management
    #[command(subcommand)]
    Room(RoomCommands),

    /// Checklist items
    #[command(subcommand)]
    Item(ItemCommands),

    /// Equipment inventory rows
    #[command(subcommand)]
    Equip(EquipCommands),

    /// Import equipment from a CSV or Excel file
    Import(ImportArgs),

    /// Export results or the equipment template
    #[command(subcommand)]
    Export(ExportCommands),

    /// Show progress for the project or one room
    ///
    /// The report is always Markdown; `--format json` is the only other
    /// output. csv, tsv and md all give the Markdown report.
    Status(StatusArgs),

    /// Reset the project to a blank one (asks for confirmation)
    Clear(ClearArgs),

    /// View and modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables (tsv layout) unless configured otherwise
    #[default]
    Auto,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}

impl OutputFormat {
    /// Resolve `auto` against the configured default
    pub fn resolve(self, configured: Option<&str>) -> Self {
        if self != OutputFormat::Auto {
            return self;
        }
        configured
            .and_then(|name| OutputFormat::from_str(name, true).ok())
            .unwrap_or(OutputFormat::Auto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_format_resolution() {
        assert_eq!(OutputFormat::Auto.resolve(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::Csv.resolve(Some("json")), OutputFormat::Csv);
        assert_eq!(OutputFormat::Auto.resolve(Some("bogus")), OutputFormat::Auto);
        assert_eq!(OutputFormat::Auto.resolve(None), OutputFormat::Auto);
    }
}
