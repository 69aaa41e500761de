//! Reference tables (equipment inventory) attached to a room

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::lenient::{loose_string, skip_null_items, value_to_string};
use crate::core::field_key::field_key;

/// Key of the equipment table in `Room::reference_data`
pub const EQUIPMENT_TABLE: &str = "equipment";

/// Column contract shared by every equipment table and the import template
pub const EQUIPMENT_HEADERS: [&str; 11] = [
    "Room",
    "Equipment ID",
    "MFG",
    "Model #",
    "Serial #",
    "IP Address",
    "Mac Address",
    "IP ID",
    "Switch Port",
    "Firmware Version",
    "Notes",
];

/// One row: numeric id plus field key → value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceRow {
    pub id: u64,
    pub fields: IndexMap<String, String>,
}

impl ReferenceRow {
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }
}

impl Serialize for ReferenceRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("id", &self.id)?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ReferenceRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut row = ReferenceRow::default();
        for (key, value) in raw {
            if key == "id" {
                row.id = match value {
                    Value::Number(n) => n.as_u64().unwrap_or(0),
                    Value::String(s) => s.trim().parse().unwrap_or(0),
                    _ => 0,
                };
            } else {
                row.fields.insert(key, value_to_string(value));
            }
        }
        Ok(row)
    }
}

/// A free-form table whose headers define column order and field keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTable {
    #[serde(default, deserialize_with = "loose_string")]
    pub title: String,

    #[serde(default, deserialize_with = "loose_string")]
    pub icon: String,

    #[serde(default, deserialize_with = "loose_string")]
    pub description: String,

    #[serde(default, deserialize_with = "skip_null_items")]
    pub headers: Vec<String>,

    #[serde(default, deserialize_with = "skip_null_items")]
    pub data: Vec<ReferenceRow>,
}

impl ReferenceTable {
    /// Empty equipment table with the standard 11 columns
    pub fn equipment() -> Self {
        Self::equipment_with_description("Room-specific equipment inventory")
    }

    pub fn equipment_with_description(description: &str) -> Self {
        Self {
            title: "Equipment List".to_string(),
            icon: "💾".to_string(),
            description: description.to_string(),
            headers: EQUIPMENT_HEADERS.iter().map(|h| h.to_string()).collect(),
            data: Vec::new(),
        }
    }

    /// Field keys for this table's headers, in column order
    pub fn field_keys(&self) -> Vec<String> {
        self.headers.iter().map(|h| field_key(h)).collect()
    }

    /// `max(existing ids, 0) + 1`
    pub fn next_id(&self) -> u64 {
        self.data.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    pub fn row(&self, id: u64) -> Option<&ReferenceRow> {
        self.data.iter().find(|r| r.id == id)
    }

    pub fn row_mut(&mut self, id: u64) -> Option<&mut ReferenceRow> {
        self.data.iter_mut().find(|r| r.id == id)
    }

    /// Values of a row in header order
    pub fn row_values(&self, row: &ReferenceRow) -> Vec<String> {
        self.field_keys()
            .iter()
            .map(|k| row.get(k).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_starts_at_one() {
        let mut table = ReferenceTable::equipment();
        assert_eq!(table.next_id(), 1);
        table.data.push(ReferenceRow { id: 7, fields: IndexMap::new() });
        table.data.push(ReferenceRow { id: 3, fields: IndexMap::new() });
        assert_eq!(table.next_id(), 8);
    }

    #[test]
    fn test_row_json_shape_is_flat() {
        let mut fields = IndexMap::new();
        fields.insert("mfg".to_string(), "Samsung".to_string());
        let row = ReferenceRow { id: 1, fields };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"id":1,"mfg":"Samsung"}"#);

        let back: ReferenceRow = serde_json::from_str(r#"{"id":2,"mfg":null,"ipId":12}"#).unwrap();
        assert_eq!(back.id, 2);
        assert_eq!(back.get("mfg"), "");
        assert_eq!(back.get("ipId"), "12");
    }

    #[test]
    fn test_row_values_follow_headers() {
        let mut table = ReferenceTable::equipment();
        let mut fields = IndexMap::new();
        fields.insert("notes".to_string(), "spare".to_string());
        fields.insert("room".to_string(), "Lab".to_string());
        table.data.push(ReferenceRow { id: 1, fields });
        let values = table.row_values(&table.data[0]);
        assert_eq!(values[0], "Lab");
        assert_eq!(values[10], "spare");
        assert_eq!(values[1], "");
    }
}
