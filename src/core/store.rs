//! Snapshot persistence
//!
//! The whole application state is saved as one JSON document
//! `{ projectData, darkMode, activeRoom }` and replaced wholesale on every
//! write.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::template;
use crate::entities::Project;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("snapshot store is read-only")]
    ReadOnly,
}

/// Everything that survives between invocations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub project_data: Project,
    pub dark_mode: bool,
    pub active_room: Option<String>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            project_data: template::seed_project(),
            dark_mode: true,
            active_room: Some("board-room".to_string()),
        }
    }
}

impl Snapshot {
    /// Decode a stored blob.
    ///
    /// A blob that is not JSON yields the default snapshot. Otherwise each
    /// field falls back to its default on its own when missing or malformed.
    pub fn from_json(text: &str) -> Self {
        let value: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "discarding unreadable snapshot");
                return Self::default();
            }
        };

        let mut snapshot = Self::default();
        if let Some(data) = value.get("projectData") {
            match serde_json::from_value::<Project>(data.clone()) {
                Ok(project) => snapshot.project_data = project,
                Err(e) => warn!(error = %e, "projectData unreadable, using default project"),
            }
        }
        if let Some(dark) = value.get("darkMode").and_then(Value::as_bool) {
            snapshot.dark_mode = dark;
        }
        if let Some(room) = value.get("activeRoom").and_then(Value::as_str) {
            if !room.is_empty() {
                snapshot.active_room = Some(room.to_string());
            }
        }
        snapshot.resolve_active_room();
        snapshot
    }

    /// Point `active_room` at an existing room, or the first one
    pub fn resolve_active_room(&mut self) {
        let valid = self
            .active_room
            .as_deref()
            .is_some_and(|key| self.project_data.rooms.contains_key(key));
        if !valid {
            self.active_room = self.project_data.first_room_key().map(str::to_string);
        }
    }
}

/// Somewhere a snapshot can be kept
pub trait SnapshotStore {
    /// The stored blob, or `None` if nothing was saved yet
    fn read(&self) -> Result<Option<String>, StoreError>;

    fn write(&self, contents: &str) -> Result<(), StoreError>;

    /// Load the saved snapshot, falling back to defaults on any problem
    fn load(&self) -> Snapshot {
        match self.read() {
            Ok(Some(text)) => Snapshot::from_json(&text),
            Ok(None) => {
                debug!("no saved snapshot, starting from the sample project");
                Snapshot::default()
            }
            Err(e) => {
                warn!(error = %e, "could not read snapshot, starting from defaults");
                Snapshot::default()
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(snapshot)?;
        self.write(&text)
    }
}

/// Snapshot kept in a file inside the workspace
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a sibling temp file then renames over the snapshot
    fn write(&self, contents: &str) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory store for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    contents: RefCell<Option<String>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(text: &str) -> Self {
        Self {
            contents: RefCell::new(Some(text.to_string())),
            read_only: false,
        }
    }

    /// A store whose writes always fail
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        *self.contents.borrow_mut() = Some(contents.to_string());
        Ok(())
    }
}
