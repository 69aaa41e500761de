//! Test sheets: the four project phases and their checklist items

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::lenient::{loose_string, loose_u32, skip_null_items};
use crate::core::error::AtpError;

/// One of the four fixed test phases of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SheetKey {
    InHouseCommissioning,
    InHouseProgramming,
    OnSiteCommissioning,
    OnSiteProgramming,
}

impl SheetKey {
    pub const ALL: [SheetKey; 4] = [
        SheetKey::InHouseCommissioning,
        SheetKey::InHouseProgramming,
        SheetKey::OnSiteCommissioning,
        SheetKey::OnSiteProgramming,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SheetKey::InHouseCommissioning => "in-house-commissioning",
            SheetKey::InHouseProgramming => "in-house-programming",
            SheetKey::OnSiteCommissioning => "on-site-commissioning",
            SheetKey::OnSiteProgramming => "on-site-programming",
        }
    }

    /// Default sheet title, e.g. "In-House Commissioning"
    pub fn title(&self) -> &'static str {
        match self {
            SheetKey::InHouseCommissioning => "In-House Commissioning",
            SheetKey::InHouseProgramming => "In-House Programming",
            SheetKey::OnSiteCommissioning => "On-Site Commissioning",
            SheetKey::OnSiteProgramming => "On-Site Programming",
        }
    }

    /// Phase label: SHOP for in-house work, FIELD for on-site work
    pub fn phase(&self) -> &'static str {
        match self {
            SheetKey::InHouseCommissioning | SheetKey::InHouseProgramming => "SHOP",
            SheetKey::OnSiteCommissioning | SheetKey::OnSiteProgramming => "FIELD",
        }
    }
}

impl std::fmt::Display for SheetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SheetKey {
    type Err = AtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SheetKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| AtpError::InvalidSheet(s.to_string()))
    }
}

/// Checklist item status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ItemStatus {
    #[default]
    Pending,
    Pass,
    Fail,
    Na,
}

impl ItemStatus {
    /// Anything other than pending counts as complete.
    pub fn is_complete(&self) -> bool {
        matches!(self, ItemStatus::Pass | ItemStatus::Fail | ItemStatus::Na)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Pass => "pass",
            ItemStatus::Fail => "fail",
            ItemStatus::Na => "na",
        }
    }

    /// Lenient parse used for stored data: unknown values read as pending.
    fn from_stored(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = AtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ItemStatus::Pending),
            "pass" => Ok(ItemStatus::Pass),
            "fail" => Ok(ItemStatus::Fail),
            "na" | "n/a" => Ok(ItemStatus::Na),
            _ => Err(AtpError::InvalidStatus(s.to_string())),
        }
    }
}

impl Serialize for ItemStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = loose_string(deserializer)?;
        Ok(ItemStatus::from_stored(&raw))
    }
}

/// A single checklist row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Dotted number, e.g. "1.01"
    #[serde(default, deserialize_with = "loose_string")]
    pub id: String,

    #[serde(default, deserialize_with = "loose_string")]
    pub title: String,

    #[serde(default, deserialize_with = "loose_string")]
    pub description: String,

    #[serde(default)]
    pub status: ItemStatus,

    #[serde(default, deserialize_with = "loose_string")]
    pub notes: String,

    #[serde(default, deserialize_with = "loose_string")]
    pub initials: String,

    #[serde(default, deserialize_with = "loose_string")]
    pub owner: String,

    /// Free text; stamped with the local date when the status changes
    #[serde(default, deserialize_with = "loose_string")]
    pub date: String,
}

impl Item {
    pub fn pending(id: &str, title: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }
}

/// An editable field of an [`Item`] with its new value
#[derive(Debug, Clone, PartialEq)]
pub enum ItemField {
    Title(String),
    Description(String),
    Status(ItemStatus),
    Notes(String),
    Initials(String),
    Owner(String),
    Date(String),
}

impl ItemField {
    /// Apply the edit. A status change stamps `date` with `today`.
    pub fn apply(self, item: &mut Item, today: &str) {
        match self {
            ItemField::Title(v) => item.title = v,
            ItemField::Description(v) => item.description = v,
            ItemField::Status(s) => {
                item.status = s;
                item.date = today.to_string();
            }
            ItemField::Notes(v) => item.notes = v,
            ItemField::Initials(v) => item.initials = v,
            ItemField::Owner(v) => item.owner = v,
            ItemField::Date(v) => item.date = v,
        }
    }
}

/// A named group of items within a sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique within its sheet only
    #[serde(default, deserialize_with = "loose_u32")]
    pub id: u32,

    #[serde(default, deserialize_with = "loose_string")]
    pub name: String,

    #[serde(default, deserialize_with = "skip_null_items")]
    pub items: Vec<Item>,
}

/// One phase's checklist
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestSheet {
    #[serde(default, deserialize_with = "loose_string")]
    pub title: String,

    /// Phase label (SHOP / FIELD)
    #[serde(default, deserialize_with = "loose_string")]
    pub description: String,

    #[serde(default, deserialize_with = "skip_null_items")]
    pub categories: Vec<Category>,
}

impl TestSheet {
    pub fn new(key: SheetKey, categories: Vec<Category>) -> Self {
        Self {
            title: key.title().to_string(),
            description: key.phase().to_string(),
            categories,
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }
}
