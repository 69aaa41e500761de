//! Core module - project operations, codecs and persistence

pub mod config;
pub mod csv;
pub mod error;
pub mod export;
pub mod field_key;
pub mod import;
pub mod progress;
pub mod state;
pub mod store;
pub mod template;
pub mod workbook;
pub mod workspace;

pub use config::Config;
pub use error::{AtpError, AtpResult};
pub use export::ExportArtifact;
pub use import::ImportReport;
pub use progress::Progress;
pub use state::{AppState, ConfirmationToken, DestroyTarget, CLEAR_ALL_PHRASE};
pub use store::{FileStore, MemoryStore, Snapshot, SnapshotStore, StoreError};
pub use workspace::{Workspace, WorkspaceError};
