//! Project root aggregate and its in-place edit operations

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient::{loose_string, null_as_default, skip_null_values};
use super::reference::ReferenceTable;
use super::room::{room_key, Room};
use super::sheet::{Item, ItemField, SheetKey};
use crate::core::error::{AtpError, AtpResult};
use crate::core::field_key::field_key;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    #[serde(default, deserialize_with = "loose_string")]
    pub client_name: String,

    #[serde(default, deserialize_with = "loose_string")]
    pub project_number: String,

    #[serde(default, deserialize_with = "loose_string")]
    pub project_name: String,
}

/// An editable project info field with its new value
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectField {
    ClientName(String),
    ProjectNumber(String),
    ProjectName(String),
}

/// An editable room field with its new value
#[derive(Debug, Clone, PartialEq)]
pub enum RoomField {
    Name(String),
    Description(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, deserialize_with = "null_as_default")]
    pub project_info: ProjectInfo,

    /// Insertion order is display order
    #[serde(default, deserialize_with = "skip_null_values")]
    pub rooms: IndexMap<String, Room>,

    /// Legacy placeholders kept so snapshots round-trip
    #[serde(default, deserialize_with = "null_as_default")]
    pub shared_equipment: Map<String, Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub shared_infrastructure: Map<String, Value>,
}

impl Project {
    pub fn room(&self, key: &str) -> Option<&Room> {
        self.rooms.get(key)
    }

    pub fn room_mut(&mut self, key: &str) -> AtpResult<&mut Room> {
        self.rooms
            .get_mut(key)
            .ok_or_else(|| AtpError::RoomNotFound(key.to_string()))
    }

    /// First room key whose display name matches case-insensitively
    pub fn find_room_by_name(&self, name: &str) -> Option<&str> {
        let wanted = name.to_lowercase();
        self.rooms
            .iter()
            .find(|(_, room)| room.name.to_lowercase() == wanted)
            .map(|(key, _)| key.as_str())
    }

    pub fn first_room_key(&self) -> Option<&str> {
        self.rooms.keys().next().map(String::as_str)
    }

    /// Insert a room under the key derived from its name.
    pub fn insert_room(&mut self, room: Room) -> AtpResult<String> {
        if room.name.trim().is_empty() {
            return Err(AtpError::EmptyRoomName);
        }
        let key = room_key(&room.name);
        if self.rooms.contains_key(&key) {
            return Err(AtpError::DuplicateRoom { key });
        }
        self.rooms.insert(key.clone(), room);
        Ok(key)
    }

    /// Remove a room; the last remaining room cannot be removed.
    pub fn remove_room(&mut self, key: &str) -> AtpResult<Room> {
        if !self.rooms.contains_key(key) {
            return Err(AtpError::RoomNotFound(key.to_string()));
        }
        if self.rooms.len() <= 1 {
            return Err(AtpError::LastRoom);
        }
        self.rooms
            .shift_remove(key)
            .ok_or_else(|| AtpError::RoomNotFound(key.to_string()))
    }

    pub fn update_info(&mut self, field: ProjectField) {
        match field {
            ProjectField::ClientName(v) => self.project_info.client_name = v,
            ProjectField::ProjectNumber(v) => self.project_info.project_number = v,
            ProjectField::ProjectName(v) => self.project_info.project_name = v,
        }
    }

    /// Edit a room's display fields. The room key is not re-derived.
    pub fn update_room(&mut self, key: &str, field: RoomField) -> AtpResult<()> {
        let room = self.room_mut(key)?;
        match field {
            RoomField::Name(v) => {
                if v.trim().is_empty() {
                    return Err(AtpError::EmptyRoomName);
                }
                room.name = v;
            }
            RoomField::Description(v) => room.description = v,
        }
        Ok(())
    }

    pub fn item_mut(
        &mut self,
        room: &str,
        sheet: SheetKey,
        category: u32,
        item: &str,
    ) -> AtpResult<&mut Item> {
        let sheet_data = self
            .room_mut(room)?
            .test_data
            .get_mut(&sheet)
            .ok_or_else(|| AtpError::InvalidSheet(sheet.to_string()))?;
        let cat = sheet_data
            .categories
            .iter_mut()
            .find(|c| c.id == category)
            .ok_or_else(|| AtpError::CategoryNotFound {
                sheet: sheet.to_string(),
                category,
            })?;
        cat.items
            .iter_mut()
            .find(|i| i.id == item)
            .ok_or_else(|| AtpError::ItemNotFound {
                category,
                item: item.to_string(),
            })
    }

    /// Apply a field edit to an item; `today` is stamped on status changes.
    pub fn update_item(
        &mut self,
        room: &str,
        sheet: SheetKey,
        category: u32,
        item: &str,
        field: ItemField,
        today: &str,
    ) -> AtpResult<()> {
        let target = self.item_mut(room, sheet, category, item)?;
        field.apply(target, today);
        Ok(())
    }

    pub fn table_mut(&mut self, room: &str, table: &str) -> AtpResult<&mut ReferenceTable> {
        self.room_mut(room)?
            .reference_data
            .get_mut(table)
            .ok_or_else(|| AtpError::TableNotFound(table.to_string()))
    }

    /// Append a row with a fresh id, filled from `values`; returns the id.
    ///
    /// Every field name is resolved before the row is pushed, so an unknown
    /// field leaves the table untouched.
    pub fn add_reference_row(
        &mut self,
        room: &str,
        table: &str,
        values: &[(String, String)],
    ) -> AtpResult<u64> {
        let table = self.table_mut(room, table)?;
        let mut resolved = Vec::with_capacity(values.len());
        for (field, value) in values {
            resolved.push((resolve_field(table, field)?, value.clone()));
        }

        let id = table.next_id();
        let mut fields: IndexMap<String, String> = table
            .field_keys()
            .into_iter()
            .map(|k| (k, String::new()))
            .collect();
        fields.extend(resolved);
        table.data.push(super::reference::ReferenceRow { id, fields });
        Ok(id)
    }

    pub fn delete_reference_row(&mut self, room: &str, table: &str, id: u64) -> AtpResult<()> {
        let table = self.table_mut(room, table)?;
        let before = table.data.len();
        table.data.retain(|r| r.id != id);
        if table.data.len() == before {
            return Err(AtpError::RowNotFound(id));
        }
        Ok(())
    }

    /// Set one cell. `field` may be a field key or a display header; it must
    /// belong to the table's headers.
    pub fn update_reference_field(
        &mut self,
        room: &str,
        table: &str,
        id: u64,
        field: &str,
        value: String,
    ) -> AtpResult<()> {
        let table = self.table_mut(room, table)?;
        let key = resolve_field(table, field)?;
        let row = table.row_mut(id).ok_or(AtpError::RowNotFound(id))?;
        row.fields.insert(key, value);
        Ok(())
    }
}

/// Map a field key or display header onto one of the table's field keys.
fn resolve_field(table: &ReferenceTable, field: &str) -> AtpResult<String> {
    let keys = table.field_keys();
    if keys.iter().any(|k| k == field) {
        return Ok(field.to_string());
    }
    let derived = field_key(field);
    if keys.contains(&derived) {
        Ok(derived)
    } else {
        Err(AtpError::UnknownField {
            field: field.to_string(),
            valid: keys.join(", "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::template;
    use crate::entities::reference::EQUIPMENT_TABLE;
    use crate::entities::sheet::ItemStatus;

    #[test]
    fn test_insert_room_rejects_duplicates_and_empty_names() {
        let mut project = template::seed_project();
        assert!(matches!(
            project.insert_room(template::new_room("board room")),
            Err(AtpError::DuplicateRoom { .. })
        ));
        assert!(matches!(
            project.insert_room(template::new_room("   ")),
            Err(AtpError::EmptyRoomName)
        ));
        let key = project.insert_room(template::new_room("Training Room")).unwrap();
        assert_eq!(key, "training-room");
        assert_eq!(project.rooms.len(), 2);
    }

    #[test]
    fn test_remove_last_room_rejected_without_change() {
        let mut project = template::seed_project();
        let before = project.clone();
        assert!(matches!(project.remove_room("board-room"), Err(AtpError::LastRoom)));
        assert_eq!(project, before);
    }

    #[test]
    fn test_remove_room_keeps_order() {
        let mut project = template::seed_project();
        project.insert_room(template::new_room("A")).unwrap();
        project.insert_room(template::new_room("B")).unwrap();
        project.remove_room("a").unwrap();
        let keys: Vec<&String> = project.rooms.keys().collect();
        assert_eq!(keys, vec!["board-room", "b"]);
    }

    #[test]
    fn test_update_item_status() {
        let mut project = template::seed_project();
        project
            .update_item(
                "board-room",
                SheetKey::InHouseCommissioning,
                1,
                "1.03",
                ItemField::Status(ItemStatus::Pass),
                "1/2/2025",
            )
            .unwrap();
        let item = project
            .item_mut("board-room", SheetKey::InHouseCommissioning, 1, "1.03")
            .unwrap();
        assert_eq!(item.status, ItemStatus::Pass);
        assert_eq!(item.date, "1/2/2025");
    }

    #[test]
    fn test_update_item_missing_targets() {
        let mut project = template::seed_project();
        let err = project
            .update_item("board-room", SheetKey::InHouseCommissioning, 9, "1.01", ItemField::Notes("x".into()), "")
            .unwrap_err();
        assert!(matches!(err, AtpError::CategoryNotFound { category: 9, .. }));
        let err = project
            .update_item("nowhere", SheetKey::InHouseCommissioning, 1, "1.01", ItemField::Notes("x".into()), "")
            .unwrap_err();
        assert!(matches!(err, AtpError::RoomNotFound(_)));
    }

    #[test]
    fn test_reference_row_lifecycle() {
        let mut project = template::seed_project();
        let id = project.add_reference_row("board-room", EQUIPMENT_TABLE, &[]).unwrap();
        assert_eq!(id, 2);

        project
            .update_reference_field("board-room", EQUIPMENT_TABLE, id, "IP Address", "10.0.0.5".into())
            .unwrap();
        project
            .update_reference_field("board-room", EQUIPMENT_TABLE, id, "mfg", "Crestron".into())
            .unwrap();
        let table = project.room("board-room").unwrap().equipment().unwrap();
        let row = table.row(id).unwrap();
        assert_eq!(row.get("ipAddress"), "10.0.0.5");
        assert_eq!(row.get("mfg"), "Crestron");
        assert_eq!(row.fields.len(), 11);

        let err = project
            .update_reference_field("board-room", EQUIPMENT_TABLE, id, "Rack Unit", "4".into())
            .unwrap_err();
        assert!(matches!(err, AtpError::UnknownField { .. }));

        project.delete_reference_row("board-room", EQUIPMENT_TABLE, id).unwrap();
        assert!(matches!(
            project.delete_reference_row("board-room", EQUIPMENT_TABLE, id),
            Err(AtpError::RowNotFound(_))
        ));
    }

    #[test]
    fn test_add_reference_row_with_values() {
        let mut project = template::seed_project();
        let values = vec![
            ("Model #".to_string(), "DM-NVX-360".to_string()),
            ("serial".to_string(), "SN-1".to_string()),
        ];
        let id = project.add_reference_row("board-room", EQUIPMENT_TABLE, &values).unwrap();
        let row = project.room("board-room").unwrap().equipment().unwrap().row(id).unwrap().clone();
        assert_eq!(row.get("model"), "DM-NVX-360");
        assert_eq!(row.get("serial"), "SN-1");
        assert_eq!(row.fields.len(), 11);

        let bad = vec![
            ("mfg".to_string(), "Crestron".to_string()),
            ("Bogus".to_string(), "x".to_string()),
        ];
        let err = project.add_reference_row("board-room", EQUIPMENT_TABLE, &bad).unwrap_err();
        assert!(matches!(err, AtpError::UnknownField { .. }));
        assert_eq!(project.room("board-room").unwrap().equipment().unwrap().data.len(), 2);
    }

    #[test]
    fn test_find_room_by_name_is_case_insensitive() {
        let project = template::seed_project();
        assert_eq!(project.find_room_by_name("BOARD ROOM"), Some("board-room"));
        assert_eq!(project.find_room_by_name("Lab"), None);
    }
}
