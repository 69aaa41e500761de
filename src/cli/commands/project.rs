//! `atp project` command - Project information and display settings

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::Result;

use crate::cli::helpers::{progress_bar, styled_percent, Session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::progress::project_progress;
use crate::entities::ProjectField;

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Show project information
    Show,

    /// Set project information fields
    Set(SetArgs),

    /// Show or change the dark mode preference
    Theme(ThemeArgs),
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Client name
    #[arg(long)]
    pub client: Option<String>,

    /// Project number (used in Excel export filenames)
    #[arg(long)]
    pub number: Option<String>,

    /// Project name
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
    Toggle,
}

#[derive(clap::Args, Debug)]
pub struct ThemeArgs {
    /// New mode; omit to show the current one
    #[arg(value_enum)]
    pub mode: Option<ThemeMode>,
}

pub fn run(cmd: ProjectCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProjectCommands::Show => run_show(global),
        ProjectCommands::Set(args) => run_set(args, global),
        ProjectCommands::Theme(args) => run_theme(args, global),
    }
}

fn run_show(global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let project = session.state.project();
    let info = &project.project_info;
    let progress = project_progress(project);

    if session.format(global) == OutputFormat::Json {
        let out = serde_json::json!({
            "projectInfo": info,
            "rooms": project.rooms.len(),
            "activeRoom": session.state.active_room(),
            "darkMode": session.state.dark_mode(),
            "progress": progress,
        });
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
        return Ok(());
    }

    println!("{}", style(&info.project_name).bold());
    println!("  {:<16}{}", style("Client:").dim(), info.client_name);
    println!("  {:<16}{}", style("Project #:").dim(), info.project_number);
    println!("  {:<16}{}", style("Rooms:").dim(), project.rooms.len());
    if let Some(active) = session.state.active_room() {
        println!("  {:<16}{}", style("Active room:").dim(), style(active).cyan());
    }
    println!(
        "  {:<16}{} {} ({}/{})",
        style("Progress:").dim(),
        progress_bar(progress.percentage, 20),
        styled_percent(progress.percentage),
        progress.completed,
        progress.total
    );
    println!(
        "  {:<16}{}",
        style("Theme:").dim(),
        if session.state.dark_mode() { "dark" } else { "light" }
    );
    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let mut fields = Vec::new();
    if let Some(v) = args.client {
        fields.push(ProjectField::ClientName(v));
    }
    if let Some(v) = args.number {
        fields.push(ProjectField::ProjectNumber(v));
    }
    if let Some(v) = args.name {
        fields.push(ProjectField::ProjectName(v));
    }
    if fields.is_empty() {
        return Err(miette::miette!(
            "Nothing to set. Use --client, --number or --name"
        ));
    }

    let mut session = Session::open(global)?;
    let count = fields.len();
    for field in fields {
        session.state.update_project_info(field);
    }

    if !global.quiet {
        println!(
            "{} Updated {} project field(s)",
            style("✓").green(),
            style(count).cyan()
        );
    }
    Ok(())
}

fn run_theme(args: ThemeArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let dark = match args.mode {
        None => session.state.dark_mode(),
        Some(ThemeMode::Dark) => {
            session.state.set_dark_mode(true);
            true
        }
        Some(ThemeMode::Light) => {
            session.state.set_dark_mode(false);
            false
        }
        Some(ThemeMode::Toggle) => session.state.toggle_dark_mode(),
    };
    println!("{}", if dark { "dark" } else { "light" });
    Ok(())
}
