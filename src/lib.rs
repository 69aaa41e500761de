//! atp: AV acceptance test plan tracker
//!
//! Rooms, four-phase commissioning checklists and equipment inventories for
//! audiovisual installs, persisted as a single JSON snapshot and exported to
//! CSV or Excel.

pub mod cli;
pub mod core;
pub mod entities;
