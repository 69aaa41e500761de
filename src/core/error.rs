//! Error types for project operations

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised by operations on the project tree, imports and exports.
///
/// Every variant aborts the operation before any state change.
#[derive(Debug, Error, Diagnostic)]
pub enum AtpError {
    #[error("room name cannot be empty")]
    #[diagnostic(code(atp::room::empty_name))]
    EmptyRoomName,

    #[error("room already exists: {key}")]
    #[diagnostic(
        code(atp::room::duplicate),
        help("room keys are derived from the name (lower-case, spaces become hyphens)")
    )]
    DuplicateRoom { key: String },

    #[error("cannot delete the last room")]
    #[diagnostic(code(atp::room::last), help("add another room before deleting this one"))]
    LastRoom,

    #[error("room not found: {0}")]
    #[diagnostic(code(atp::room::not_found), help("run 'atp room list' to see room keys"))]
    RoomNotFound(String),

    #[error("category {category} not found in sheet {sheet}")]
    #[diagnostic(code(atp::category::not_found))]
    CategoryNotFound { sheet: String, category: u32 },

    #[error("item {item} not found in category {category}")]
    #[diagnostic(code(atp::item::not_found))]
    ItemNotFound { category: u32, item: String },

    #[error("reference table not found: {0}")]
    #[diagnostic(code(atp::reference::table_not_found))]
    TableNotFound(String),

    #[error("row {0} not found")]
    #[diagnostic(code(atp::reference::row_not_found))]
    RowNotFound(u64),

    #[error("unknown field '{field}' (valid: {valid})")]
    #[diagnostic(code(atp::reference::unknown_field))]
    UnknownField { field: String, valid: String },

    #[error("unknown status '{0}'")]
    #[diagnostic(code(atp::item::status), help("valid statuses: pending, pass, fail, na"))]
    InvalidStatus(String),

    #[error("unknown sheet '{0}'")]
    #[diagnostic(
        code(atp::sheet::unknown),
        help("valid sheets: in-house-commissioning, in-house-programming, on-site-commissioning, on-site-programming")
    )]
    InvalidSheet(String),

    #[error("confirmation text did not match; expected \"{expected}\"")]
    #[diagnostic(code(atp::confirm::mismatch))]
    ConfirmationMismatch { expected: String },

    #[error("confirmation token is no longer valid")]
    #[diagnostic(code(atp::confirm::stale), help("request a new confirmation and try again"))]
    StaleConfirmation,

    #[error("no import is pending")]
    #[diagnostic(code(atp::import::none_pending))]
    NoPendingImport,

    #[error("unsupported file format: {0}")]
    #[diagnostic(code(atp::import::format), help("supported formats: .csv, .xlsx, .xls"))]
    UnsupportedFormat(String),

    #[error("no valid data found in file")]
    #[diagnostic(code(atp::import::no_data))]
    NoData,

    #[error("workbook error: {0}")]
    #[diagnostic(code(atp::workbook))]
    Workbook(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(atp::io))]
    Io(#[from] std::io::Error),
}

pub type AtpResult<T> = std::result::Result<T, AtpError>;
