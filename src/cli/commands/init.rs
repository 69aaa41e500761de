//! `atp init` command - Initialize a new workspace

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::{FileStore, Snapshot, SnapshotStore, Workspace, WorkspaceError};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Start from a blank project instead of the sample one
    #[arg(long)]
    pub blank: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    match Workspace::init(&path) {
        Ok(workspace) => {
            let mut snapshot = Snapshot::default();
            if args.blank {
                snapshot.project_data = crate::core::template::cleared_project();
                snapshot.resolve_active_room();
            }
            FileStore::new(workspace.snapshot_path())
                .save(&snapshot)
                .map_err(|e| miette::miette!("{}", e))?;

            println!(
                "{} Initialized atp workspace at {}",
                style("✓").green(),
                style(workspace.root().display()).cyan()
            );
            println!();
            println!("Next steps:");
            println!(
                "  {} Set client and project details",
                style("atp project set --client <name>").yellow()
            );
            println!("  {} Add a room", style("atp room add <name>").yellow());
            println!(
                "  {} Import an equipment list",
                style("atp import <file.csv|file.xlsx>").yellow()
            );
            Ok(())
        }
        Err(WorkspaceError::AlreadyExists(path)) => {
            println!(
                "{} atp workspace already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}
