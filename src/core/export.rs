//! Export the project tree as flat CSV text, an xlsx workbook or the
//! equipment import template

use chrono::NaiveDate;

use crate::core::csv::{quote_field, serialize_table};
use crate::core::error::AtpResult;
use crate::core::progress::room_progress;
use crate::core::workbook::{xlsx_bytes, Cell, Sheet, Workbook, MAX_SHEET_NAME, XLSX_MIME};
use crate::entities::{Project, EQUIPMENT_HEADERS};

pub const CSV_MIME: &str = "text/csv;charset=utf-8";

const ITEM_HEADER: &str = "Item No,Title,Description,Status,Notes,Initials,Owner,Date";

const WORKBOOK_ITEM_HEADER: [&str; 9] = [
    "Item No",
    "Category",
    "Title",
    "Description",
    "Status",
    "Notes",
    "Initials",
    "Owner",
    "Date",
];

const TEMPLATE_ROWS: [[&str; 11]; 5] = [
    [
        "Board Room", "EQ-001", "Samsung", "QM85R-B", "SAMS-85-001", "192.168.1.110", "",
        "DISP-01", "SW-01/9", "BYS_BYSOSP_2008.3", "85\" 4K display - primary",
    ],
    [
        "Board Room", "EQ-002", "Crestron", "CP4N", "CREST-CP4N-001", "192.168.1.201",
        "00:05:CD:12:34:56", "CTRL-01", "SW-01/3", "2.009.0039", "Control processor - main",
    ],
    [
        "Board Room", "EQ-003", "Cisco", "Room Kit Pro", "FTT2447G123", "192.168.10.101",
        "00:1E:BD:12:34:56", "CODEC-01", "SW-01/4", "ce9.15.3.23", "Video conferencing codec",
    ],
    [
        "Training Room", "EQ-101", "LG", "65UM5KD", "LG-65-001", "192.168.2.110",
        "00:2A:3B:4C:5D:6E", "DISP-02", "SW-02/1", "WebOS 4.5", "65\" display for presentations",
    ],
    [
        "Training Room", "EQ-102", "Crestron", "DM-MD8X8", "CREST-DM8-002", "192.168.2.201",
        "00:05:CD:78:90:AB", "SWITCH-01", "SW-02/2", "1.500.0025", "Digital media switcher",
    ],
];

/// A named export ready to be written or streamed
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: Vec<u8>,
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

fn doubled(value: &str) -> String {
    value.replace('"', "\"\"")
}

/// Hierarchical CSV report of every room, sheet and item.
pub fn export_csv_text(project: &Project) -> String {
    let info = &project.project_info;
    let mut out = String::from("Project Information\n");
    out.push_str(&format!(
        "Project Name,{}\n",
        quote_field(or_default(&info.project_name, "Unknown Project"))
    ));
    out.push_str(&format!(
        "Client Name,{}\n",
        quote_field(or_default(&info.client_name, "Unknown Client"))
    ));
    out.push_str(&format!(
        "Project Number,{}\n\n",
        quote_field(or_default(&info.project_number, "Unknown Number"))
    ));

    for room in project.rooms.values() {
        out.push_str(&format!("\nROOM: {}\n", doubled(or_default(&room.name, "Unnamed Room"))));
        out.push_str(&format!(
            "Description: {}\n\n",
            doubled(or_default(&room.description, "No description"))
        ));

        for sheet in room.test_data.values() {
            out.push_str(&format!(
                "{} - {}\n",
                doubled(or_default(&sheet.title, "Unnamed Sheet")),
                doubled(or_default(&sheet.description, "No description"))
            ));
            out.push_str(ITEM_HEADER);
            out.push('\n');

            for category in &sheet.categories {
                out.push_str(&format!(
                    "\nCategory: {}\n",
                    doubled(or_default(&category.name, "Unnamed Category"))
                ));
                for item in &category.items {
                    let values: [&str; 8] = [
                        &item.id,
                        &item.title,
                        &item.description,
                        item.status.as_str(),
                        &item.notes,
                        &item.initials,
                        &item.owner,
                        &item.date,
                    ];
                    let quoted: Vec<String> = values.iter().map(|v| quote_field(v)).collect();
                    out.push_str(&quoted.join(","));
                    out.push('\n');
                }
            }
        }
        out.push('\n');
    }
    out
}

/// Room name reduced to a sheet-name-safe token
fn safe_sheet_token(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(MAX_SHEET_NAME)
        .collect()
}

/// Results, per-room equipment and summary sheets.
pub fn build_workbook(project: &Project, export_date: &str) -> Workbook {
    let info = &project.project_info;

    let mut results = Sheet::new("Test Results");
    results.push_text(&["ACCEPTANCE TEST PLAN RESULTS"]);
    results.push_text(&["Project:", or_default(&info.project_name, "Unknown Project")]);
    results.push_text(&["Client:", or_default(&info.client_name, "Unknown Client")]);
    results.push_text(&["Project #:", or_default(&info.project_number, "Unknown Number")]);
    results.push_text(&["Export Date:", export_date]);
    results.push_blank();

    for room in project.rooms.values() {
        results.push_text(&[format!("ROOM: {}", or_default(&room.name, "Unnamed Room"))]);
        results.push_text(&["Description:", or_default(&room.description, "No description")]);
        results.push_blank();

        for sheet in room.test_data.values() {
            results.push_text(&[format!(
                "{} - {}",
                or_default(&sheet.title, "Unnamed Sheet"),
                or_default(&sheet.description, "No description")
            )]);
            results.push_text(&WORKBOOK_ITEM_HEADER);
            for category in &sheet.categories {
                for item in &category.items {
                    let values: [&str; 9] = [
                        &item.id,
                        &category.name,
                        &item.title,
                        &item.description,
                        item.status.as_str(),
                        &item.notes,
                        &item.initials,
                        &item.owner,
                        &item.date,
                    ];
                    results.push_text(&values);
                }
            }
            results.push_blank();
        }
        results.push_blank();
    }

    let mut sheets = vec![results];

    for room in project.rooms.values() {
        let Some(equipment) = room.equipment().filter(|t| !t.data.is_empty()) else {
            continue;
        };
        let mut sheet = Sheet::new(format!("Equipment_{}", safe_sheet_token(&room.name)));
        sheet.push_text(&[format!("Equipment List - {}", room.name)]);
        sheet.push_blank();
        sheet.push_text(equipment.headers.as_slice());
        for row in &equipment.data {
            sheet.push_text(equipment.row_values(row).as_slice());
        }
        sheets.push(sheet);
    }

    let mut summary = Sheet::new("Summary");
    summary.push_text(&["PROJECT SUMMARY"]);
    summary.push_blank();
    summary.push_text(&["Room", "Total Tests", "Completed", "Progress %"]);
    for (key, room) in &project.rooms {
        let progress = room_progress(project, key);
        summary.push(vec![
            Cell::text(or_default(&room.name, "Unnamed Room")),
            Cell::Number(progress.total as f64),
            Cell::Number(progress.completed as f64),
            Cell::text(format!("{}%", progress.percentage)),
        ]);
    }
    sheets.push(summary);

    Workbook { sheets }
}

/// The 11 equipment headers followed by example rows.
pub fn equipment_template_csv() -> String {
    let mut rows: Vec<Vec<&str>> = vec![EQUIPMENT_HEADERS.to_vec()];
    rows.extend(TEMPLATE_ROWS.iter().map(|r| r.to_vec()));
    serialize_table(&rows)
}

pub fn csv_file_name(date: NaiveDate) -> String {
    format!("acceptance_test_plan_{}.csv", date.format("%Y-%m-%d"))
}

pub fn template_file_name(date: NaiveDate) -> String {
    format!("equipment-list-template-{}.csv", date.format("%Y-%m-%d"))
}

pub fn xlsx_file_name(project: &Project, date: NaiveDate) -> String {
    format!(
        "acceptance_test_plan_{}_{}.xlsx",
        or_default(&project.project_info.project_number, "project"),
        date.format("%Y-%m-%d")
    )
}

pub fn csv_artifact(project: &Project, date: NaiveDate) -> ExportArtifact {
    ExportArtifact {
        file_name: csv_file_name(date),
        mime_type: CSV_MIME,
        contents: export_csv_text(project).into_bytes(),
    }
}

pub fn template_artifact(date: NaiveDate) -> ExportArtifact {
    ExportArtifact {
        file_name: template_file_name(date),
        mime_type: CSV_MIME,
        contents: equipment_template_csv().into_bytes(),
    }
}

/// `date` names the file; `export_date` is the human date inside it.
pub fn xlsx_artifact(project: &Project, date: NaiveDate, export_date: &str) -> AtpResult<ExportArtifact> {
    Ok(ExportArtifact {
        file_name: xlsx_file_name(project, date),
        mime_type: XLSX_MIME,
        contents: xlsx_bytes(&build_workbook(project, export_date))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::csv::parse_csv;
    use crate::core::template;
    use crate::entities::{ProjectInfo, SheetKey};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    #[test]
    fn test_csv_text_layout() {
        let project = template::seed_project();
        let text = export_csv_text(&project);
        let lines: Vec<&str> = text.split('\n').collect();

        assert_eq!(lines[0], "Project Information");
        assert_eq!(lines[1], "Project Name,\"Reston HQ - Complete AV System Upgrade\"");
        assert_eq!(lines[2], "Client Name,\"CACI NSS, INC\"");
        assert_eq!(lines[3], "Project Number,\"900I-24-75178\"");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "ROOM: Board Room");
        assert_eq!(lines[7], "Description: Main conference room with dual displays");
        assert_eq!(lines[8], "");
        assert_eq!(lines[9], "In-House Commissioning - SHOP");
        assert_eq!(lines[10], ITEM_HEADER);
        assert_eq!(lines[11], "");
        assert_eq!(lines[12], "Category: Physical Install");
        assert_eq!(
            lines[13],
            "\"1.01\",\"Equipment Inventory\",\"List all equipment not present\",\"pass\",\"All equipment accounted for\",\"JS\",\"John Smith\",\"2024-01-15\""
        );
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_csv_text_fallbacks_and_quote_doubling() {
        let mut project = template::cleared_project();
        project.project_info = ProjectInfo::default();
        project.room_mut("new-room").unwrap().name = "The \"Big\" Room".into();
        project
            .item_mut("new-room", SheetKey::InHouseCommissioning, 1, "1.01")
            .unwrap()
            .notes = "said \"ok\"".into();

        let text = export_csv_text(&project);
        assert!(text.contains("Project Name,\"Unknown Project\"\n"));
        assert!(text.contains("Client Name,\"Unknown Client\"\n"));
        assert!(text.contains("ROOM: The \"\"Big\"\" Room\n"));
        assert!(text.contains(",\"pending\",\"said \"\"ok\"\"\","));
    }

    #[test]
    fn test_workbook_sheets() {
        let mut project = template::seed_project();
        project.insert_room(template::new_room("Lab / East")).unwrap();
        let workbook = build_workbook(&project, "3/9/2026");

        let names: Vec<&str> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Test Results", "Equipment_Board_Room", "Summary"]);

        let results = workbook.sheet("Test Results").unwrap();
        assert_eq!(results.rows[4], vec![Cell::text("Export Date:"), Cell::text("3/9/2026")]);
        assert_eq!(results.rows[6], vec![Cell::text("ROOM: Board Room")]);
        assert_eq!(results.rows[10][0], Cell::text("Item No"));
        assert_eq!(results.rows[11][1], Cell::text("Physical Install"));
        assert_eq!(results.rows[11][4], Cell::text("pass"));

        let equipment = workbook.sheet("Equipment_Board_Room").unwrap();
        assert_eq!(equipment.rows[0], vec![Cell::text("Equipment List - Board Room")]);
        assert!(equipment.rows[1].is_empty());
        assert_eq!(equipment.rows[2].len(), 11);
        assert_eq!(equipment.rows[3][3], Cell::text("QM85R-B"));

        let summary = workbook.sheet("Summary").unwrap();
        assert_eq!(
            summary.rows[3],
            vec![
                Cell::text("Board Room"),
                Cell::Number(7.0),
                Cell::Number(3.0),
                Cell::text("43%"),
            ]
        );
        assert_eq!(summary.rows[4][0], Cell::text("Lab / East"));
        assert_eq!(summary.rows[4][3], Cell::text("0%"));
    }

    #[test]
    fn test_equipment_sheet_name_is_sanitized() {
        let mut project = template::cleared_project();
        project.insert_room(template::new_room("Lab / East")).unwrap();
        project.add_reference_row("lab-/-east", "equipment", &[]).unwrap();
        let workbook = build_workbook(&project, "");
        assert!(workbook.sheet("Equipment_Lab___East").is_some());
    }

    #[test]
    fn test_template_csv() {
        let text = equipment_template_csv();
        let first = text.split('\n').next().unwrap();
        assert_eq!(
            first,
            "Room,Equipment ID,MFG,Model #,Serial #,IP Address,Mac Address,IP ID,Switch Port,Firmware Version,Notes"
        );
        assert!(text.contains("\"85\"\" 4K display - primary\""));
        assert!(!text.ends_with('\n'));

        let rows = parse_csv(&text);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0]["Notes"], "85\" 4K display - primary");
        assert_eq!(rows[3]["Room"], "Training Room");
    }

    #[test]
    fn test_file_names() {
        let mut project = template::seed_project();
        assert_eq!(csv_file_name(date()), "acceptance_test_plan_2026-03-09.csv");
        assert_eq!(template_file_name(date()), "equipment-list-template-2026-03-09.csv");
        assert_eq!(
            xlsx_file_name(&project, date()),
            "acceptance_test_plan_900I-24-75178_2026-03-09.xlsx"
        );
        project.project_info.project_number.clear();
        assert_eq!(xlsx_file_name(&project, date()), "acceptance_test_plan_project_2026-03-09.xlsx");
    }

    #[test]
    fn test_artifacts_carry_mime_types() {
        let project = template::seed_project();
        let csv = csv_artifact(&project, date());
        assert_eq!(csv.mime_type, "text/csv;charset=utf-8");
        assert!(csv.contents.starts_with(b"Project Information\n"));

        let xlsx = xlsx_artifact(&project, date(), "3/9/2026").unwrap();
        assert_eq!(xlsx.mime_type, XLSX_MIME);
        assert!(xlsx.contents.starts_with(b"PK"));
    }
}
