//! CLI command implementations

pub mod clear;
pub mod completions;
pub mod config;
pub mod equip;
pub mod export;
pub mod import;
pub mod init;
pub mod item;
pub mod project;
pub mod room;
pub mod status;
