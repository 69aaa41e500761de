//! Shared helper functions for CLI commands
//!
//! Workspace/state loading, room resolution and interactive prompts used by
//! several command modules.

use std::io::Write;

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{AppState, Config, FileStore, Workspace};
use crate::entities::ItemStatus;

/// Everything a command needs to operate on a workspace
pub struct Session {
    pub workspace: Workspace,
    pub state: AppState,
}

impl Session {
    /// Locate the workspace and load its config and snapshot
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let workspace =
            Workspace::locate(global.project.as_deref()).map_err(|e| miette::miette!("{}", e))?;
        let config = Config::load(Some(&workspace));
        let store = FileStore::new(workspace.snapshot_path());
        let state = AppState::load(Box::new(store), config);
        Ok(Self { workspace, state })
    }

    /// Output format with `auto` resolved against config
    pub fn format(&self, global: &GlobalOpts) -> OutputFormat {
        global
            .format
            .resolve(self.state.config().default_format.as_deref())
    }

    /// Resolve a room given by key or display name, defaulting to the
    /// active room
    pub fn room_key(&self, room: Option<&str>) -> Result<String> {
        let project = self.state.project();
        match room {
            Some(r) if project.room(r).is_some() => Ok(r.to_string()),
            Some(r) => project
                .find_room_by_name(r)
                .map(str::to_string)
                .ok_or_else(|| crate::core::AtpError::RoomNotFound(r.to_string()).into()),
            None => self
                .state
                .active_room()
                .map(str::to_string)
                .ok_or_else(|| miette::miette!("No rooms in project. Add one with 'atp room add <name>'")),
        }
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Ask a yes/no question; anything but y/yes is no
pub fn confirm(question: &str) -> Result<bool> {
    let answer = prompt_line(&format!("{} [y/N] ", question))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

/// Print a prompt and read one line from stdin
pub fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    std::io::stdout().flush().into_diagnostic()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).into_diagnostic()?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

/// Status colored the way lists show it
pub fn styled_status(status: ItemStatus) -> String {
    let s = status.as_str();
    match status {
        ItemStatus::Pass => style(s).green().to_string(),
        ItemStatus::Fail => style(s).red().bold().to_string(),
        ItemStatus::Na => style(s).dim().to_string(),
        ItemStatus::Pending => style(s).yellow().to_string(),
    }
}

/// Percentage colored by how far along it is
pub fn styled_percent(pct: u8) -> String {
    let s = format!("{}%", pct);
    match pct {
        100 => style(s).green().bold().to_string(),
        50..=99 => style(s).green().to_string(),
        1..=49 => style(s).yellow().to_string(),
        _ => style(s).dim().to_string(),
    }
}

/// Text progress bar, e.g. `[######----]`
pub fn progress_bar(pct: u8, width: usize) -> String {
    let filled = (usize::from(pct) * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled.min(width)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("85\" écran géant", 8), "85\" é...");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 10), "[----------]");
        assert_eq!(progress_bar(43, 10), "[####------]");
        assert_eq!(progress_bar(100, 10), "[##########]");
    }

    #[test]
    fn test_styled_values_contain_text() {
        assert!(styled_status(ItemStatus::Fail).contains("fail"));
        assert!(styled_percent(43).contains("43%"));
    }
}
