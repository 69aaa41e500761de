//! Spreadsheet workbooks: an in-memory grid model plus xlsx read/write

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::XlsxError;

use crate::core::csv::Row;
use crate::core::error::{AtpError, AtpResult};

/// Longest sheet name a spreadsheet accepts
pub const MAX_SHEET_NAME: usize = 31;

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A named grid of rows; an empty row is a blank line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn push_text<S: AsRef<str>>(&mut self, cells: &[S]) {
        self.rows
            .push(cells.iter().map(|c| Cell::text(c.as_ref())).collect());
    }

    pub fn push_blank(&mut self) {
        self.rows.push(Vec::new());
    }

    pub fn push(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Cut sheet names to the spreadsheet limit and suffix duplicates.
///
/// Spreadsheet applications compare sheet names case-insensitively.
pub fn writable_sheet_names(workbook: &Workbook) -> Vec<String> {
    let mut taken: Vec<String> = Vec::new();
    let mut names = Vec::with_capacity(workbook.sheets.len());

    for sheet in &workbook.sheets {
        let base: String = sheet.name.chars().take(MAX_SHEET_NAME).collect();
        let mut candidate = base.clone();
        let mut n = 2;
        while taken.contains(&candidate.to_lowercase()) {
            let suffix = format!("_{}", n);
            let keep = MAX_SHEET_NAME - suffix.chars().count();
            candidate = format!("{}{}", base.chars().take(keep).collect::<String>(), suffix);
            n += 1;
        }
        taken.push(candidate.to_lowercase());
        names.push(candidate);
    }
    names
}

fn to_xlsx(workbook: &Workbook) -> Result<rust_xlsxwriter::Workbook, XlsxError> {
    let mut book = rust_xlsxwriter::Workbook::new();
    for (sheet, name) in workbook.sheets.iter().zip(writable_sheet_names(workbook)) {
        let ws = book.add_worksheet();
        ws.set_name(&name)?;
        for (r, row) in sheet.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    Cell::Text(s) if s.is_empty() => {}
                    Cell::Text(s) => {
                        ws.write_string(r, c, s)?;
                    }
                    Cell::Number(n) => {
                        ws.write_number(r, c, *n)?;
                    }
                }
            }
        }
    }
    Ok(book)
}

/// Encode a workbook as xlsx bytes.
pub fn xlsx_bytes(workbook: &Workbook) -> AtpResult<Vec<u8>> {
    to_xlsx(workbook)
        .and_then(|mut book| book.save_to_buffer())
        .map_err(|e| AtpError::Workbook(e.to_string()))
}

fn cell_string(cell: &Data) -> Option<String> {
    let value = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(v) => format!("{}", v),
        Data::Int(v) => format!("{}", v),
        other => other.to_string(),
    };
    (!value.is_empty()).then_some(value)
}

/// Read the first worksheet as header-keyed rows.
///
/// Only non-empty cells become entries; rows with no values are dropped.
pub fn read_first_sheet(path: &Path) -> AtpResult<Vec<Row>> {
    let mut book = open_workbook_auto(path).map_err(|e| AtpError::Workbook(e.to_string()))?;
    let Some(first) = book.sheet_names().first().cloned() else {
        return Ok(Vec::new());
    };
    let range = book
        .worksheet_range(&first)
        .map_err(|e| AtpError::Workbook(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<Option<String>> = header_row.iter().map(cell_string).collect();

    Ok(rows
        .map(|cells| {
            headers
                .iter()
                .zip(cells)
                .filter_map(|(header, cell)| Some((header.clone()?, cell_string(cell)?)))
                .collect::<Row>()
        })
        .filter(|row| !row.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sheet_names_are_capped_and_deduplicated() {
        let long = "Equipment_Very_Long_Conference_Room_Name";
        let workbook = Workbook {
            sheets: vec![Sheet::new(long), Sheet::new(long), Sheet::new("Summary"), Sheet::new("summary")],
        };
        let names = writable_sheet_names(&workbook);
        assert_eq!(names[0], "Equipment_Very_Long_Conference_");
        assert_eq!(names[0].len(), MAX_SHEET_NAME);
        assert_eq!(names[1], "Equipment_Very_Long_Conferenc_2");
        assert_eq!(names[1].len(), MAX_SHEET_NAME);
        assert_eq!(names[2], "Summary");
        assert_eq!(names[3], "summary_2");
    }

    #[test]
    fn test_written_workbook_reads_back_first_sheet() {
        let mut sheet = Sheet::new("Equipment");
        sheet.push_text(&["Room", "MFG", "IP ID"]);
        sheet.push(vec![Cell::text("Lab"), Cell::text("Acme"), Cell::Number(42.0)]);
        sheet.push_blank();
        sheet.push(vec![Cell::text("Lab"), Cell::text(""), Cell::Number(7.5)]);
        let mut other = Sheet::new("Ignored");
        other.push_text(&["Room"]);
        other.push_text(&["Elsewhere"]);
        let workbook = Workbook {
            sheets: vec![sheet, other],
        };

        let dir = tempdir().unwrap();
        let path = dir.path().join("equipment.xlsx");
        std::fs::write(&path, xlsx_bytes(&workbook).unwrap()).unwrap();

        let rows = read_first_sheet(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Room"], "Lab");
        assert_eq!(rows[0]["IP ID"], "42");
        assert!(!rows[1].contains_key("MFG"));
        assert_eq!(rows[1]["IP ID"], "7.5");
    }

    #[test]
    fn test_unreadable_workbook_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, "not a zip").unwrap();
        assert!(matches!(read_first_sheet(&path), Err(AtpError::Workbook(_))));
    }
}
