//! `atp export` command - CSV report, Excel workbook and import template

use chrono::{Local, Utc};
use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::io::Write;
use std::path::PathBuf;

use crate::cli::helpers::Session;
use crate::cli::GlobalOpts;
use crate::core::export::{csv_artifact, template_artifact, xlsx_artifact};
use crate::core::{Config, ExportArtifact, Workspace};

#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Hierarchical CSV report of every room, sheet and item
    Csv(TextArgs),

    /// Excel workbook with results, equipment and summary sheets
    Xlsx(FileArgs),

    /// Equipment import template with sample rows
    Template(TextArgs),
}

#[derive(clap::Args, Debug)]
pub struct TextArgs {
    /// Directory to write into (default: export_dir config, then current dir)
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Write to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}

#[derive(clap::Args, Debug)]
pub struct FileArgs {
    /// Directory to write into (default: export_dir config, then current dir)
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,
}

pub fn run(cmd: ExportCommands, global: &GlobalOpts) -> Result<()> {
    // File names carry the UTC date; dates inside the export are local
    let file_date = Utc::now().date_naive();

    match cmd {
        ExportCommands::Csv(args) => {
            let session = Session::open(global)?;
            let artifact = csv_artifact(session.state.project(), file_date);
            deliver(session.state.config(), artifact, args.output_dir, args.stdout, global)
        }
        ExportCommands::Xlsx(args) => {
            let session = Session::open(global)?;
            let export_date = session
                .state
                .config()
                .format_date(Local::now().date_naive());
            let artifact = xlsx_artifact(session.state.project(), file_date, &export_date)?;
            deliver(session.state.config(), artifact, args.output_dir, false, global)
        }
        ExportCommands::Template(args) => {
            // The template needs no workspace, only its config if there is one
            let workspace = Workspace::locate(global.project.as_deref()).ok();
            let config = Config::load(workspace.as_ref());
            deliver(&config, template_artifact(file_date), args.output_dir, args.stdout, global)
        }
    }
}

fn deliver(
    config: &Config,
    artifact: ExportArtifact,
    output_dir: Option<PathBuf>,
    to_stdout: bool,
    global: &GlobalOpts,
) -> Result<()> {
    if to_stdout {
        std::io::stdout()
            .write_all(&artifact.contents)
            .into_diagnostic()?;
        return Ok(());
    }

    let dir = config.export_dir(output_dir.as_deref());
    std::fs::create_dir_all(&dir).into_diagnostic()?;
    let path = dir.join(&artifact.file_name);
    std::fs::write(&path, &artifact.contents).into_diagnostic()?;
    tracing::debug!(path = %path.display(), mime = artifact.mime_type, "export written");

    if global.quiet {
        println!("{}", path.display());
    } else {
        println!(
            "{} Exported {} ({} bytes)",
            style("✓").green(),
            style(path.display()).cyan(),
            artifact.contents.len()
        );
    }
    Ok(())
}
