//! Application state: the project tree plus UI selections, with
//! write-through persistence
//!
//! Every mutating operation validates first, mutates, then saves the whole
//! snapshot once. A failed save is logged and the in-memory state stays
//! authoritative.

use rand::Rng;
use tracing::{debug, warn};

use crate::core::config::Config;
use crate::core::csv::Row;
use crate::core::error::{AtpError, AtpResult};
use crate::core::import::{reconcile, ImportReport};
use crate::core::store::{Snapshot, SnapshotStore};
use crate::core::template;
use crate::entities::{ItemField, Project, ProjectField, RoomField, SheetKey};

/// Phrase required to wipe the whole project
pub const CLEAR_ALL_PHRASE: &str = "CLEAR ALL DATA";

/// What a destructive request targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestroyTarget {
    Room(String),
    AllData,
}

/// Proof that a destructive request was issued; must be confirmed by
/// typing `phrase`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationToken {
    pub target: DestroyTarget,
    pub phrase: String,
    nonce: u64,
}

pub struct AppState {
    project: Project,
    dark_mode: bool,
    active_room: Option<String>,
    pending_import: Option<Vec<Row>>,
    outstanding: Option<u64>,
    store: Box<dyn SnapshotStore>,
    config: Config,
    today: Option<String>,
}

impl AppState {
    /// Load state from the store (never fails; see [`SnapshotStore::load`])
    pub fn load(store: Box<dyn SnapshotStore>, config: Config) -> Self {
        let snapshot = store.load();
        Self::from_snapshot(snapshot, store, config)
    }

    pub fn from_snapshot(snapshot: Snapshot, store: Box<dyn SnapshotStore>, config: Config) -> Self {
        let mut snapshot = snapshot;
        snapshot.resolve_active_room();
        Self {
            project: snapshot.project_data,
            dark_mode: snapshot.dark_mode,
            active_room: snapshot.active_room,
            pending_import: None,
            outstanding: None,
            store,
            config,
            today: None,
        }
    }

    /// Stamp status changes with a fixed date instead of the local clock
    pub fn with_today(mut self, today: impl Into<String>) -> Self {
        self.today = Some(today.into());
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn active_room(&self) -> Option<&str> {
        self.active_room.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            project_data: self.project.clone(),
            dark_mode: self.dark_mode,
            active_room: self.active_room.clone(),
        }
    }

    /// Save the whole state; failures are logged, never returned
    pub fn persist(&self) {
        match self.store.save(&self.snapshot()) {
            Ok(()) => debug!("snapshot saved"),
            Err(e) => warn!(error = %e, "could not save snapshot; changes are kept in memory only"),
        }
    }

    fn today(&self) -> String {
        self.today.clone().unwrap_or_else(|| self.config.today())
    }

    // ---- selections -----------------------------------------------------

    pub fn select_room(&mut self, key: &str) -> AtpResult<()> {
        if self.project.room(key).is_none() {
            return Err(AtpError::RoomNotFound(key.to_string()));
        }
        self.active_room = Some(key.to_string());
        self.persist();
        Ok(())
    }

    pub fn set_dark_mode(&mut self, on: bool) {
        self.dark_mode = on;
        self.persist();
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.set_dark_mode(!self.dark_mode);
        self.dark_mode
    }

    // ---- field edits ----------------------------------------------------

    pub fn update_project_info(&mut self, field: ProjectField) {
        debug!(?field, "updating project info");
        self.project.update_info(field);
        self.persist();
    }

    pub fn update_room(&mut self, key: &str, field: RoomField) -> AtpResult<()> {
        self.project.update_room(key, field)?;
        self.persist();
        Ok(())
    }

    pub fn update_item(
        &mut self,
        room: &str,
        sheet: SheetKey,
        category: u32,
        item: &str,
        field: ItemField,
    ) -> AtpResult<()> {
        let today = self.today();
        debug!(room, %sheet, category, item, ?field, "updating item");
        self.project.update_item(room, sheet, category, item, field, &today)?;
        self.persist();
        Ok(())
    }

    // ---- rooms ----------------------------------------------------------

    /// Add a room from the default template and make it active
    pub fn add_room(&mut self, name: &str) -> AtpResult<String> {
        let key = self.project.insert_room(template::new_room(name))?;
        debug!(room = %key, "room added");
        self.active_room = Some(key.clone());
        self.persist();
        Ok(key)
    }

    // ---- reference rows -------------------------------------------------

    pub fn add_reference_row(
        &mut self,
        room: &str,
        table: &str,
        values: &[(String, String)],
    ) -> AtpResult<u64> {
        let id = self.project.add_reference_row(room, table, values)?;
        self.persist();
        Ok(id)
    }

    pub fn update_reference_field(
        &mut self,
        room: &str,
        table: &str,
        id: u64,
        field: &str,
        value: String,
    ) -> AtpResult<()> {
        self.project
            .update_reference_field(room, table, id, field, value)?;
        self.persist();
        Ok(())
    }

    pub fn delete_reference_row(&mut self, room: &str, table: &str, id: u64) -> AtpResult<()> {
        self.project.delete_reference_row(room, table, id)?;
        self.persist();
        Ok(())
    }

    // ---- import ---------------------------------------------------------

    /// Hold parsed rows until the user confirms; returns the row count
    pub fn stage_import(&mut self, rows: Vec<Row>) -> AtpResult<usize> {
        if rows.is_empty() {
            return Err(AtpError::NoData);
        }
        let count = rows.len();
        self.pending_import = Some(rows);
        Ok(count)
    }

    pub fn pending_import(&self) -> Option<&[Row]> {
        self.pending_import.as_deref()
    }

    /// Reconcile the staged rows in one pass and save once
    pub fn process_import(&mut self) -> AtpResult<ImportReport> {
        let rows = self.pending_import.take().ok_or(AtpError::NoPendingImport)?;
        let report = reconcile(&mut self.project, &rows);
        self.persist();
        Ok(report)
    }

    pub fn cancel_import(&mut self) {
        self.pending_import = None;
    }

    // ---- destructive operations -----------------------------------------

    /// Issue a token for a destructive operation.
    ///
    /// Room deletion is validated here so nothing is asked of the user for
    /// a request that cannot succeed. Issuing a new token invalidates any
    /// earlier one.
    pub fn request_destroy(&mut self, target: DestroyTarget) -> AtpResult<ConfirmationToken> {
        let phrase = match &target {
            DestroyTarget::Room(key) => {
                let room = self
                    .project
                    .room(key)
                    .ok_or_else(|| AtpError::RoomNotFound(key.clone()))?;
                if self.project.rooms.len() <= 1 {
                    return Err(AtpError::LastRoom);
                }
                room.name.clone()
            }
            DestroyTarget::AllData => CLEAR_ALL_PHRASE.to_string(),
        };
        let nonce = rand::rng().random::<u64>();
        self.outstanding = Some(nonce);
        Ok(ConfirmationToken {
            target,
            phrase,
            nonce,
        })
    }

    /// Carry out a destructive operation if `input` matches the token's phrase.
    pub fn confirm_destroy(&mut self, token: ConfirmationToken, input: &str) -> AtpResult<()> {
        if self.outstanding != Some(token.nonce) {
            return Err(AtpError::StaleConfirmation);
        }
        // Room names are stored as entered; surrounding whitespace never counts
        let expected = token.phrase.trim();
        if input.trim() != expected {
            return Err(AtpError::ConfirmationMismatch {
                expected: expected.to_string(),
            });
        }
        self.outstanding = None;

        match token.target {
            DestroyTarget::Room(key) => {
                self.project.remove_room(&key)?;
                debug!(room = %key, "room deleted");
                if self.active_room.as_deref() == Some(key.as_str()) {
                    self.active_room = self.project.first_room_key().map(str::to_string);
                }
            }
            DestroyTarget::AllData => {
                debug!("clearing all project data");
                self.project = template::cleared_project();
                self.active_room = Some(template::CLEARED_ROOM_KEY.to_string());
                self.pending_import = None;
            }
        }
        self.persist();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;
    use crate::entities::{ItemStatus, EQUIPMENT_TABLE};
    use std::rc::Rc;

    /// Store handle that can still be inspected after being moved into state
    #[derive(Clone, Default)]
    struct Shared(Rc<MemoryStore>);

    impl SnapshotStore for Shared {
        fn read(&self) -> Result<Option<String>, crate::core::store::StoreError> {
            self.0.read()
        }
        fn write(&self, contents: &str) -> Result<(), crate::core::store::StoreError> {
            self.0.write(contents)
        }
    }

    fn state() -> (AppState, Shared) {
        let shared = Shared::default();
        let state = AppState::load(Box::new(shared.clone()), Config::default()).with_today("10/16/2026");
        (state, shared)
    }

    fn saved(shared: &Shared) -> Snapshot {
        Snapshot::from_json(&shared.0.contents().unwrap())
    }

    #[test]
    fn test_mutations_write_through() {
        let (mut state, shared) = state();
        assert!(shared.0.contents().is_none());

        state
            .update_item(
                "board-room",
                SheetKey::InHouseCommissioning,
                1,
                "1.03",
                ItemField::Status(ItemStatus::Fail),
            )
            .unwrap();

        let snapshot = saved(&shared);
        let item = snapshot
            .project_data
            .room("board-room")
            .unwrap()
            .sheet(SheetKey::InHouseCommissioning)
            .unwrap()
            .items()
            .find(|i| i.id == "1.03")
            .unwrap()
            .clone();
        assert_eq!(item.status, ItemStatus::Fail);
        assert_eq!(item.date, "10/16/2026");
    }

    #[test]
    fn test_failed_validation_does_not_persist() {
        let (mut state, shared) = state();
        assert!(state.add_room("board room").is_err());
        assert!(shared.0.contents().is_none());
    }

    #[test]
    fn test_add_room_becomes_active() {
        let (mut state, shared) = state();
        let key = state.add_room("Training Room").unwrap();
        assert_eq!(state.active_room(), Some("training-room"));
        assert_eq!(saved(&shared).active_room.as_deref(), Some(key.as_str()));
    }

    #[test]
    fn test_save_failure_keeps_memory_state() {
        let mut state = AppState::load(Box::new(MemoryStore::read_only()), Config::default());
        state.update_project_info(ProjectField::ClientName("Acme".into()));
        assert_eq!(state.project().project_info.client_name, "Acme");
    }

    #[test]
    fn test_delete_room_requires_name() {
        let (mut state, _) = state();
        state.add_room("Lab").unwrap();

        let token = state.request_destroy(DestroyTarget::Room("lab".into())).unwrap();
        assert_eq!(token.phrase, "Lab");
        let err = state.confirm_destroy(token.clone(), "lab?").unwrap_err();
        assert!(matches!(err, AtpError::ConfirmationMismatch { .. }));
        assert_eq!(state.project().rooms.len(), 2);

        state.confirm_destroy(token, "Lab").unwrap();
        assert_eq!(state.project().rooms.len(), 1);
        assert_eq!(state.active_room(), Some("board-room"));
    }

    #[test]
    fn test_delete_room_with_padded_name() {
        let (mut state, _) = state();
        let key = state.add_room(" Lab ").unwrap();
        assert_eq!(key, "-lab-");

        let token = state.request_destroy(DestroyTarget::Room(key.clone())).unwrap();
        state.confirm_destroy(token, "Lab").unwrap();
        assert!(state.project().room(&key).is_none());

        // The stored name itself also confirms, as `room delete --yes` passes it
        let key = state.add_room("  Annex").unwrap();
        let token = state.request_destroy(DestroyTarget::Room(key.clone())).unwrap();
        let phrase = token.phrase.clone();
        state.confirm_destroy(token, &phrase).unwrap();
        assert_eq!(state.project().rooms.len(), 1);
    }

    #[test]
    fn test_delete_last_room_rejected_at_request() {
        let (mut state, shared) = state();
        let err = state
            .request_destroy(DestroyTarget::Room("board-room".into()))
            .unwrap_err();
        assert!(matches!(err, AtpError::LastRoom));
        assert_eq!(state.project().rooms.len(), 1);
        assert!(shared.0.contents().is_none());
    }

    #[test]
    fn test_stale_token_rejected() {
        let (mut state, _) = state();
        let first = state.request_destroy(DestroyTarget::AllData).unwrap();
        let _second = state.request_destroy(DestroyTarget::AllData).unwrap();
        assert!(matches!(
            state.confirm_destroy(first, CLEAR_ALL_PHRASE),
            Err(AtpError::StaleConfirmation)
        ));
    }

    #[test]
    fn test_clear_all_resets_to_blank_project() {
        let (mut state, shared) = state();
        state.set_dark_mode(false);
        let token = state.request_destroy(DestroyTarget::AllData).unwrap();
        state.confirm_destroy(token.clone(), CLEAR_ALL_PHRASE).unwrap();

        assert_eq!(state.project(), &template::cleared_project());
        assert_eq!(state.active_room(), Some("new-room"));
        assert!(!state.dark_mode());
        assert_eq!(saved(&shared).project_data, template::cleared_project());

        // A used token cannot be replayed
        assert!(matches!(
            state.confirm_destroy(token, CLEAR_ALL_PHRASE),
            Err(AtpError::StaleConfirmation)
        ));
    }

    #[test]
    fn test_import_is_staged_then_processed_once() {
        let (mut state, shared) = state();
        let rows: Vec<Row> = ["Lab", "lab"]
            .iter()
            .map(|room| [("Room".to_string(), room.to_string())].into_iter().collect())
            .collect();

        assert!(matches!(state.stage_import(Vec::new()), Err(AtpError::NoData)));
        assert_eq!(state.stage_import(rows).unwrap(), 2);
        assert_eq!(state.pending_import().map(<[Row]>::len), Some(2));
        assert!(shared.0.contents().is_none());

        let report = state.process_import().unwrap();
        assert_eq!(report.imported_count, 2);
        assert_eq!(report.distinct_rooms_touched(), 1);
        assert!(state.pending_import().is_none());

        let table = saved(&shared).project_data.rooms["lab"].reference_data[EQUIPMENT_TABLE].clone();
        assert_eq!(table.data.len(), 2);

        assert!(matches!(state.process_import(), Err(AtpError::NoPendingImport)));
    }

    #[test]
    fn test_cancel_import_discards_rows() {
        let (mut state, _) = state();
        let row: Row = [("Room".to_string(), "Lab".to_string())].into_iter().collect();
        state.stage_import(vec![row]).unwrap();
        state.cancel_import();
        assert!(state.pending_import().is_none());
        assert_eq!(state.project().rooms.len(), 1);
    }

    #[test]
    fn test_select_room() {
        let (mut state, _) = state();
        assert!(matches!(state.select_room("nowhere"), Err(AtpError::RoomNotFound(_))));
        state.add_room("Lab").unwrap();
        state.select_room("board-room").unwrap();
        assert_eq!(state.active_room(), Some("board-room"));
    }
}
