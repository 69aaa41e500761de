//! Completion counts at project, room and sheet granularity

use serde::Serialize;

use crate::entities::{Project, SheetKey, TestSheet};

/// Completed vs total checklist items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// Rounded half up; 0 when there are no items
    pub percentage: u8,
}

impl Progress {
    fn from_counts(completed: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            ((200 * completed + total) / (2 * total)) as u8
        };
        Self {
            completed,
            total,
            percentage,
        }
    }

    fn tally<'a>(sheets: impl Iterator<Item = &'a TestSheet>) -> Self {
        let (completed, total) = sheets
            .flat_map(|s| s.items())
            .fold((0, 0), |(done, all), item| {
                (done + usize::from(item.is_complete()), all + 1)
            });
        Self::from_counts(completed, total)
    }
}

/// Progress across every sheet of a room; unknown rooms count as empty.
pub fn room_progress(project: &Project, room_key: &str) -> Progress {
    match project.room(room_key) {
        Some(room) => Progress::tally(room.test_data.values()),
        None => Progress::default(),
    }
}

/// Progress of one sheet in a room; missing rooms or sheets count as empty.
pub fn sheet_progress(project: &Project, room_key: &str, sheet: SheetKey) -> Progress {
    match project.room(room_key).and_then(|r| r.sheet(sheet)) {
        Some(s) => Progress::tally(std::iter::once(s)),
        None => Progress::default(),
    }
}

pub fn project_progress(project: &Project) -> Progress {
    Progress::tally(project.rooms.values().flat_map(|r| r.test_data.values()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::template;
    use crate::entities::{ItemField, ItemStatus};

    #[test]
    fn test_seed_room_progress() {
        let project = template::seed_project();
        // 4 items in-house commissioning (2 pass), 1 each elsewhere (1 pass)
        let p = room_progress(&project, "board-room");
        assert_eq!(p, Progress { completed: 3, total: 7, percentage: 43 });
    }

    #[test]
    fn test_room_total_is_sum_of_sheet_totals() {
        let mut project = template::seed_project();
        project.insert_room(template::new_room("Lab")).unwrap();
        for key in project.rooms.keys() {
            let room = room_progress(&project, key);
            let sum_total: usize = SheetKey::ALL
                .iter()
                .map(|s| sheet_progress(&project, key, *s).total)
                .sum();
            let sum_done: usize = SheetKey::ALL
                .iter()
                .map(|s| sheet_progress(&project, key, *s).completed)
                .sum();
            assert_eq!(room.total, sum_total);
            assert_eq!(room.completed, sum_done);
            assert!(room.completed <= room.total);
            assert!(room.percentage <= 100);
        }
    }

    #[test]
    fn test_missing_nodes_count_as_zero() {
        let mut project = template::seed_project();
        assert_eq!(room_progress(&project, "nowhere"), Progress::default());
        project
            .room_mut("board-room")
            .unwrap()
            .test_data
            .shift_remove(&SheetKey::OnSiteProgramming);
        assert_eq!(
            sheet_progress(&project, "board-room", SheetKey::OnSiteProgramming),
            Progress::default()
        );
    }

    #[test]
    fn test_failing_an_item_completes_it() {
        let mut project = template::seed_project();
        project.insert_room(template::new_room("Lab")).unwrap();
        let before_room = room_progress(&project, "lab");
        let before_sheet = sheet_progress(&project, "lab", SheetKey::OnSiteCommissioning);
        assert_eq!(before_sheet, Progress { completed: 0, total: 1, percentage: 0 });

        project
            .update_item(
                "lab",
                SheetKey::OnSiteCommissioning,
                1,
                "1.01",
                ItemField::Status(ItemStatus::Fail),
                "10/16/2026",
            )
            .unwrap();

        let after_sheet = sheet_progress(&project, "lab", SheetKey::OnSiteCommissioning);
        assert_eq!(after_sheet, Progress { completed: 1, total: 1, percentage: 100 });
        assert_eq!(room_progress(&project, "lab").completed, before_room.completed + 1);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(Progress::from_counts(1, 8).percentage, 13);
        assert_eq!(Progress::from_counts(1, 3).percentage, 33);
        assert_eq!(Progress::from_counts(2, 3).percentage, 67);
        assert_eq!(Progress::from_counts(0, 0).percentage, 0);
    }

    #[test]
    fn test_project_progress_sums_rooms() {
        let mut project = template::seed_project();
        project.insert_room(template::new_room("Lab")).unwrap();
        let p = project_progress(&project);
        assert_eq!(p.total, 11);
        assert_eq!(p.completed, 3);
    }
}
