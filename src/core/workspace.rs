//! Workspace discovery and layout

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the workspace marker directory
pub const ATP_DIR: &str = ".atp";

/// File holding the persisted snapshot inside `.atp/`
pub const SNAPSHOT_FILE: &str = "completeMultiRoomAcceptanceTest.json";

/// A directory tracked by atp
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Root directory of the workspace (parent of .atp/)
    root: PathBuf,
}

impl Workspace {
    /// Find the workspace root by walking up from the current directory
    pub fn discover() -> Result<Self, WorkspaceError> {
        let current = std::env::current_dir().map_err(|e| WorkspaceError::Io(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the workspace root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, WorkspaceError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| WorkspaceError::Io(e.to_string()))?;

        loop {
            if current.join(ATP_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(WorkspaceError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Use an explicit `--project` directory if given, otherwise discover
    pub fn locate(explicit: Option<&Path>) -> Result<Self, WorkspaceError> {
        match explicit {
            Some(path) => Self::discover_from(path),
            None => Self::discover(),
        }
    }

    /// Create `.atp/` with a default config at the given path
    pub fn init(path: &Path) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let atp_dir = root.join(ATP_DIR);
        if atp_dir.exists() {
            return Err(WorkspaceError::AlreadyExists(root));
        }

        std::fs::create_dir_all(&atp_dir).map_err(|e| WorkspaceError::Io(e.to_string()))?;
        std::fs::write(atp_dir.join("config.yaml"), Self::default_config())
            .map_err(|e| WorkspaceError::Io(e.to_string()))?;

        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# Acceptance test plan workspace configuration

# chrono format used when a status change stamps an item's date
# date_format: "%-m/%-d/%Y"

# Directory exports are written to (default: current directory)
# export_dir: ""

# Default output format (auto, tsv, csv, md, json)
# default_format: auto
"#
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn atp_dir(&self) -> PathBuf {
        self.root.join(ATP_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.atp_dir().join("config.yaml")
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.atp_dir().join(SNAPSHOT_FILE)
    }
}

/// Errors that can occur while locating or creating a workspace
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("not an atp workspace (searched from {searched_from:?}). Run 'atp init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("atp workspace already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(String),
}
