//! Default project and room structures
//!
//! Every room, whether added by hand or created during an import, starts
//! from the same four-phase checklist and an empty equipment table.

use indexmap::IndexMap;

use crate::entities::{
    Category, Item, ItemStatus, Project, ProjectInfo, ReferenceRow, ReferenceTable, Room, SheetKey,
    TestSheet, EQUIPMENT_TABLE,
};

/// Key of the single room in a cleared project
pub const CLEARED_ROOM_KEY: &str = "new-room";

fn single_item_sheet(key: SheetKey) -> TestSheet {
    let (category, id, title, description) = match key {
        SheetKey::InHouseCommissioning => (
            "Physical Install",
            "1.01",
            "Equipment Inventory",
            "List all equipment not present",
        ),
        SheetKey::InHouseProgramming => (
            "Control Wiring",
            "1.01",
            "Control System Wiring",
            "Verify all control system connections",
        ),
        SheetKey::OnSiteCommissioning => (
            "Physical Install",
            "1.01",
            "Final Equipment Check",
            "Verify all equipment is properly installed on-site",
        ),
        SheetKey::OnSiteProgramming => (
            "Final System Testing",
            "1.01",
            "End-to-End System Test",
            "Complete system functionality test",
        ),
    };
    TestSheet::new(
        key,
        vec![Category {
            id: 1,
            name: category.to_string(),
            items: vec![Item::pending(id, title, description)],
        }],
    )
}

fn default_test_data() -> IndexMap<SheetKey, TestSheet> {
    SheetKey::ALL
        .into_iter()
        .map(|key| (key, single_item_sheet(key)))
        .collect()
}

fn room_with(name: &str, description: &str) -> Room {
    let mut reference_data = IndexMap::new();
    reference_data.insert(EQUIPMENT_TABLE.to_string(), ReferenceTable::equipment());
    Room {
        name: name.to_string(),
        description: description.to_string(),
        test_data: default_test_data(),
        reference_data,
        ..Room::default()
    }
}

/// A room added by the user
pub fn new_room(name: &str) -> Room {
    room_with(name, "New room - update description")
}

/// A room created because an import referenced an unknown room name
pub fn imported_room(name: &str) -> Room {
    room_with(name, &format!("Imported room - {}", name))
}

/// The project that "clear all" resets to
pub fn cleared_project() -> Project {
    let mut rooms = IndexMap::new();
    rooms.insert(
        CLEARED_ROOM_KEY.to_string(),
        room_with("New Room", "New room - update description as needed"),
    );
    Project {
        project_info: ProjectInfo {
            client_name: "New Client".to_string(),
            project_number: "NEW-PROJECT-001".to_string(),
            project_name: "New Project - Acceptance Test Plan".to_string(),
        },
        rooms,
        ..Project::default()
    }
}

fn done(mut item: Item, status: ItemStatus, notes: &str, initials: &str, owner: &str, date: &str) -> Item {
    item.status = status;
    item.notes = notes.to_string();
    item.initials = initials.to_string();
    item.owner = owner.to_string();
    item.date = date.to_string();
    item
}

/// The sample project shown on first run
pub fn seed_project() -> Project {
    let mut room = room_with("Board Room", "Main conference room with dual displays");

    room.test_data.insert(
        SheetKey::InHouseCommissioning,
        TestSheet::new(
            SheetKey::InHouseCommissioning,
            vec![
                Category {
                    id: 1,
                    name: "Physical Install".to_string(),
                    items: vec![
                        done(
                            Item::pending("1.01", "Equipment Inventory", "List all equipment not present"),
                            ItemStatus::Pass,
                            "All equipment accounted for",
                            "JS",
                            "John Smith",
                            "2024-01-15",
                        ),
                        done(
                            Item::pending(
                                "1.02",
                                "Rack Elevation Status",
                                "Check final rack layout and update prints accordingly",
                            ),
                            ItemStatus::Pass,
                            "Layout matches prints",
                            "JS",
                            "John Smith",
                            "2024-01-15",
                        ),
                        Item::pending(
                            "1.03",
                            "Rack Thermal Management",
                            "Check rack fans for air direction and thermostats functionality",
                        ),
                    ],
                },
                Category {
                    id: 2,
                    name: "Cable Management, Termination, Labeling".to_string(),
                    items: vec![Item::pending(
                        "2.01",
                        "Equipment Power Cable Management",
                        "All power cables are properly managed and dressed",
                    )],
                },
            ],
        ),
    );

    if let Some(sheet) = room.test_data.get_mut(&SheetKey::InHouseProgramming) {
        if let Some(item) = sheet.categories.first_mut().and_then(|c| c.items.first_mut()) {
            item.status = ItemStatus::Pass;
            item.initials = "MJ".to_string();
            item.date = "2024-01-14".to_string();
        }
    }

    let equipment = room.equipment_mut();
    equipment.description = "Complete inventory of all system equipment".to_string();
    let values = [
        "Board Room",
        "EQ-001",
        "Samsung",
        "QM85R-B",
        "SAMS-85-001",
        "192.168.1.110",
        "",
        "DISP-01",
        "SW-01/9",
        "BYS_BYSOSP_2008.3",
        "85\" 4K displays",
    ];
    let fields = equipment
        .field_keys()
        .into_iter()
        .zip(values.iter().map(|v| v.to_string()))
        .collect();
    equipment.data.push(ReferenceRow { id: 1, fields });

    let mut rooms = IndexMap::new();
    rooms.insert("board-room".to_string(), room);
    Project {
        project_info: ProjectInfo {
            client_name: "CACI NSS, INC".to_string(),
            project_number: "900I-24-75178".to_string(),
            project_name: "Reston HQ - Complete AV System Upgrade".to_string(),
        },
        rooms,
        ..Project::default()
    }
}
