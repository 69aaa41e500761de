//! Room entity: a physical space with its checklists and equipment

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::lenient::{loose_string, skip_null_items, skip_null_values};
use super::reference::{ReferenceTable, EQUIPMENT_TABLE};
use super::sheet::{SheetKey, TestSheet};

/// Derive a room key from its display name.
///
/// Lower-cases the name and replaces each run of whitespace with a single
/// hyphen, so "Board  Room" becomes "board-room".
pub fn room_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                key.push('-');
            }
            in_space = true;
        } else {
            key.push(c);
            in_space = false;
        }
    }
    key
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(default, deserialize_with = "loose_string")]
    pub name: String,

    #[serde(default, deserialize_with = "loose_string")]
    pub description: String,

    /// Reserved for cross-room relations; always empty today
    #[serde(default, deserialize_with = "skip_null_items")]
    pub depends_on: Vec<Value>,

    #[serde(default, deserialize_with = "skip_null_items")]
    pub shared_infrastructure: Vec<Value>,

    #[serde(default, deserialize_with = "skip_null_items")]
    pub shared_equipment: Vec<Value>,

    #[serde(default, deserialize_with = "known_sheets")]
    pub test_data: IndexMap<SheetKey, TestSheet>,

    #[serde(default, deserialize_with = "skip_null_values")]
    pub reference_data: IndexMap<String, ReferenceTable>,
}

impl Room {
    pub fn sheet(&self, key: SheetKey) -> Option<&TestSheet> {
        self.test_data.get(&key)
    }

    pub fn equipment(&self) -> Option<&ReferenceTable> {
        self.reference_data.get(EQUIPMENT_TABLE)
    }

    /// The equipment table, created empty if this room predates it
    pub fn equipment_mut(&mut self) -> &mut ReferenceTable {
        self.reference_data
            .entry(EQUIPMENT_TABLE.to_string())
            .or_insert_with(ReferenceTable::equipment)
    }
}

/// Sheet map that keeps only the four known phases and skips null sheets.
fn known_sheets<'de, D>(deserializer: D) -> Result<IndexMap<SheetKey, TestSheet>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: IndexMap<String, TestSheet> = skip_null_values(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(k, sheet)| k.parse::<SheetKey>().ok().map(|key| (key, sheet)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_key_slug() {
        assert_eq!(room_key("Board Room"), "board-room");
        assert_eq!(room_key("Training   Room 2"), "training-room-2");
        assert_eq!(room_key("Lab"), "lab");
        assert_eq!(room_key(" Lab "), "-lab-");
    }

    #[test]
    fn test_equipment_mut_creates_missing_table() {
        let mut room = Room {
            name: "Lab".into(),
            ..Room::default()
        };
        assert!(room.equipment().is_none());
        room.equipment_mut();
        assert_eq!(room.equipment().unwrap().headers.len(), 11);
    }

    #[test]
    fn test_unknown_and_null_sheets_are_dropped() {
        let room: Room = serde_json::from_str(
            r#"{"name":"Lab","testData":{"in-house-programming":{"title":"In-House Programming","categories":[null]},"backstage":{},"on-site-programming":null}}"#,
        )
        .unwrap();
        assert_eq!(room.test_data.len(), 1);
        assert!(room.sheet(SheetKey::InHouseProgramming).unwrap().categories.is_empty());
    }
}
