//! Reconcile imported equipment rows into the project tree

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::core::csv::{parse_csv, Row};
use crate::core::error::{AtpError, AtpResult};
use crate::core::field_key::field_key;
use crate::core::template;
use crate::core::workbook;
use crate::entities::{room_key, Project, ReferenceRow, EQUIPMENT_HEADERS};

/// Outcome of one import pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported_count: usize,
    /// Display names of the distinct rooms that received rows, first-touch order
    pub rooms_touched: Vec<String>,
    /// Keys of rooms created during the pass
    pub rooms_created: Vec<String>,
    pub rows_skipped: usize,
}

impl ImportReport {
    pub fn distinct_rooms_touched(&self) -> usize {
        self.rooms_touched.len()
    }
}

/// First non-empty value among the given column names.
fn pick<'a>(row: &'a Row, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|n| row.get(*n))
        .map(String::as_str)
        .find(|v| !v.is_empty())
}

/// Merge rows into the project's equipment tables.
///
/// Rows are processed strictly in order: each new id is read from the
/// table's current maximum, so several rows targeting a room created in
/// this same pass get consecutive ids.
pub fn reconcile(project: &mut Project, rows: &[Row]) -> ImportReport {
    let mut report = ImportReport::default();
    let mut touched_keys: Vec<String> = Vec::new();

    for row in rows {
        let Some(room_name) = pick(row, &["Room", "room"]) else {
            report.rows_skipped += 1;
            continue;
        };

        let key = match project.find_room_by_name(room_name) {
            Some(key) => key.to_string(),
            None => {
                let key = room_key(room_name);
                if !project.rooms.contains_key(&key) {
                    debug!(room = room_name, key = %key, "creating room for import");
                    project
                        .rooms
                        .insert(key.clone(), template::imported_room(room_name));
                    report.rooms_created.push(key.clone());
                }
                key
            }
        };

        let Some(room) = project.rooms.get_mut(&key) else {
            report.rows_skipped += 1;
            continue;
        };
        let display_name = room.name.clone();
        let table = room.equipment_mut();
        let id = table.next_id();

        let mut equipment = ReferenceRow {
            id,
            ..ReferenceRow::default()
        };
        for header in EQUIPMENT_HEADERS {
            let alias = field_key(header);
            let value = match alias.as_str() {
                "room" => room_name.to_string(),
                _ => pick(row, &[header, alias.as_str()])
                    .map(str::to_string)
                    .unwrap_or_else(|| match alias.as_str() {
                        "equipmentId" => format!("EQ-{:03}", id),
                        _ => String::new(),
                    }),
            };
            equipment.fields.insert(alias, value);
        }

        table.data.push(equipment);
        report.imported_count += 1;
        if !touched_keys.contains(&key) {
            touched_keys.push(key);
            report.rooms_touched.push(display_name);
        }
    }

    debug!(
        imported = report.imported_count,
        rooms = report.distinct_rooms_touched(),
        "import reconciled"
    );
    report
}

/// Read a CSV or workbook file into rows, rejecting empty results.
pub fn read_import_file(path: &Path) -> AtpResult<Vec<Row>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "csv" => parse_csv(&std::fs::read_to_string(path)?),
        "xlsx" | "xls" => workbook::read_first_sheet(path)?,
        other => {
            let shown = if other.is_empty() {
                path.display().to_string()
            } else {
                format!(".{}", other)
            };
            return Err(AtpError::UnsupportedFormat(shown));
        }
    };

    if rows.is_empty() {
        return Err(AtpError::NoData);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::equipment_template_csv;
    use tempfile::tempdir;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_same_room_different_case_creates_one_room() {
        let mut project = template::seed_project();
        let rows = vec![
            row(&[("Room", "Lab"), ("Equipment ID", "EQ-9"), ("MFG", "Acme")]),
            row(&[("Room", "lab"), ("MFG", "Zenith")]),
        ];

        let report = reconcile(&mut project, &rows);

        assert_eq!(report.imported_count, 2);
        assert_eq!(report.distinct_rooms_touched(), 1);
        assert_eq!(report.rooms_created, vec!["lab"]);
        assert_eq!(project.rooms.len(), 2);

        let table = project.room("lab").unwrap().equipment().unwrap();
        let ids: Vec<u64> = table.data.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(table.data[0].get("equipmentId"), "EQ-9");
        assert_eq!(table.data[1].get("equipmentId"), "EQ-002");
        assert_eq!(table.data[1].get("mfg"), "Zenith");
        assert_eq!(table.data[1].get("room"), "lab");
    }

    #[test]
    fn test_rows_without_room_are_skipped() {
        let mut project = template::seed_project();
        let rows = vec![row(&[("MFG", "Acme")]), row(&[("Room", ""), ("room", "")])];
        let report = reconcile(&mut project, &rows);
        assert_eq!(report.imported_count, 0);
        assert_eq!(report.rows_skipped, 2);
        assert_eq!(project.rooms.len(), 1);
    }

    #[test]
    fn test_existing_room_continues_id_sequence() {
        let mut project = template::seed_project();
        let rows = vec![row(&[("room", "BOARD ROOM"), ("ipAddress", "10.1.1.1")])];
        let report = reconcile(&mut project, &rows);
        assert_eq!(report.rooms_touched, vec!["Board Room"]);
        let table = project.room("board-room").unwrap().equipment().unwrap();
        assert_eq!(table.data.len(), 2);
        assert_eq!(table.data[1].id, 2);
        assert_eq!(table.data[1].get("ipAddress"), "10.1.1.1");
    }

    #[test]
    fn test_display_header_wins_over_alias_and_empty_falls_through() {
        let mut project = template::seed_project();
        let rows = vec![row(&[
            ("Room", "Lab"),
            ("Model #", "CP4N"),
            ("model", "ignored"),
            ("Serial #", ""),
            ("serial", "S-1"),
        ])];
        reconcile(&mut project, &rows);
        let table = project.room("lab").unwrap().equipment().unwrap();
        assert_eq!(table.data[0].get("model"), "CP4N");
        assert_eq!(table.data[0].get("serial"), "S-1");
    }

    #[test]
    fn test_room_missing_equipment_table_gets_one() {
        let mut project = template::seed_project();
        project
            .room_mut("board-room")
            .unwrap()
            .reference_data
            .clear();
        reconcile(&mut project, &[row(&[("Room", "Board Room")])]);
        let table = project.room("board-room").unwrap().equipment().unwrap();
        assert_eq!(table.data[0].id, 1);
        assert_eq!(table.data[0].get("equipmentId"), "EQ-001");
    }

    #[test]
    fn test_template_round_trips_through_import() {
        let mut project = template::cleared_project();
        let rows = parse_csv(&equipment_template_csv());
        assert_eq!(rows.len(), 5);
        let report = reconcile(&mut project, &rows);
        assert_eq!(report.imported_count, 5);
        assert_eq!(report.distinct_rooms_touched(), 2);

        for source in &rows {
            let key = room_key(&source["Room"]);
            let table = project.room(&key).unwrap().equipment().unwrap();
            let imported = table
                .data
                .iter()
                .find(|r| r.get("equipmentId") == source["Equipment ID"])
                .unwrap();
            for header in EQUIPMENT_HEADERS {
                assert_eq!(imported.get(&field_key(header)), source[header]);
            }
        }
    }

    #[test]
    fn test_read_import_file_rejects_unknown_extension_and_empty() {
        let dir = tempdir().unwrap();
        let txt = dir.path().join("list.txt");
        std::fs::write(&txt, "Room\nLab\n").unwrap();
        assert!(matches!(read_import_file(&txt), Err(AtpError::UnsupportedFormat(_))));

        let empty = dir.path().join("empty.csv");
        std::fs::write(&empty, "Room,MFG\n").unwrap();
        assert!(matches!(read_import_file(&empty), Err(AtpError::NoData)));

        let good = dir.path().join("list.CSV");
        std::fs::write(&good, "Room,MFG\nLab,Acme\n").unwrap();
        assert_eq!(read_import_file(&good).unwrap().len(), 1);
    }
}
