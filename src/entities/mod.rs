//! Entity type definitions
//!
//! The project tree, root to leaf:
//!
//! - [`Project`] - project info plus an ordered map of rooms
//! - [`Room`] - one physical space with four test sheets and reference tables
//! - [`TestSheet`] - one phase checklist, made of categories of items
//! - [`ReferenceTable`] - free-form rows keyed by header-derived field keys

pub mod lenient;
pub mod project;
pub mod reference;
pub mod room;
pub mod sheet;

pub use project::{Project, ProjectField, ProjectInfo, RoomField};
pub use reference::{ReferenceRow, ReferenceTable, EQUIPMENT_HEADERS, EQUIPMENT_TABLE};
pub use room::{room_key, Room};
pub use sheet::{Category, Item, ItemField, ItemStatus, SheetKey, TestSheet};
