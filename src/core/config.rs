//! Configuration management with layered hierarchy

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::workspace::Workspace;

/// en-US short date, e.g. 3/9/2026
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Configuration keys with descriptions, in display order
pub const VALID_KEYS: &[(&str, &str)] = &[
    ("date_format", "chrono format stamped into an item's date on status change"),
    ("export_dir", "Directory exports are written to"),
    ("default_format", "Default output format (auto, tsv, csv, md, json)"),
];

/// atp configuration with layered hierarchy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub date_format: Option<String>,
    pub export_dir: Option<PathBuf>,
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(workspace: Option<&Workspace>) -> Self {
        let mut config = Config::default();

        // Global user config (~/.config/atp/config.yaml)
        if let Some(global) = Self::global_config_path().and_then(|p| Self::read_file(&p)) {
            config.merge(global);
        }

        // Workspace config (.atp/config.yaml)
        if let Some(local) = workspace.and_then(|ws| Self::read_file(&ws.config_path())) {
            config.merge(local);
        }

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        let contents = std::fs::read_to_string(path).ok()?;
        let parsed = serde_yml::from_str::<serde_yml::Value>(&contents).and_then(|value| {
            if value.is_null() {
                Ok(Config::default())
            } else {
                serde_yml::from_value(value)
            }
        });
        match parsed {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "atp").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.date_format.is_some() {
            self.date_format = other.date_format;
        }
        if other.export_dir.is_some() {
            self.export_dir = other.export_dir;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("ATP_DATE_FORMAT") {
            self.date_format = Some(v);
        }
        if let Some(v) = var("ATP_EXPORT_DIR") {
            self.export_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = var("ATP_DEFAULT_FORMAT") {
            self.default_format = Some(v);
        }
    }

    /// Value of a key as displayed by `atp config show`
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "date_format" => self.date_format.clone(),
            "export_dir" => self.export_dir.as_ref().map(|p| p.display().to_string()),
            "default_format" => self.default_format.clone(),
            _ => None,
        }
    }

    pub fn date_format(&self) -> &str {
        self.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT)
    }

    /// Render a date with the configured format.
    ///
    /// A format chrono cannot render falls back to the default.
    pub fn format_date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(self.date_format())).is_ok() {
            return out;
        }
        tracing::warn!(format = self.date_format(), "invalid date_format, using default");
        date.format(DEFAULT_DATE_FORMAT).to_string()
    }

    /// Today's local date as stamped on status changes
    pub fn today(&self) -> String {
        self.format_date(Local::now().date_naive())
    }

    /// Export directory: explicit override, then config, then current directory
    pub fn export_dir(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.export_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_later_layers() {
        let mut config = Config {
            date_format: Some("%Y".into()),
            export_dir: Some(PathBuf::from("/global")),
            default_format: None,
        };
        config.merge(Config {
            export_dir: Some(PathBuf::from("/local")),
            ..Config::default()
        });
        assert_eq!(config.date_format.as_deref(), Some("%Y"));
        assert_eq!(config.export_dir, Some(PathBuf::from("/local")));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            "ATP_DATE_FORMAT" => Some("%Y-%m-%d".into()),
            "ATP_DEFAULT_FORMAT" => Some("json".into()),
            _ => None,
        });
        assert_eq!(config.date_format(), "%Y-%m-%d");
        assert_eq!(config.get("default_format").as_deref(), Some("json"));
        assert_eq!(config.get("export_dir"), None);
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(Config::default().format_date(date), "3/9/2026");

        let iso = Config {
            date_format: Some("%Y-%m-%d".into()),
            ..Config::default()
        };
        assert_eq!(iso.format_date(date), "2026-03-09");

        let broken = Config {
            date_format: Some("%Q".into()),
            ..Config::default()
        };
        assert_eq!(broken.format_date(date), "3/9/2026");
    }

    #[test]
    fn test_workspace_config_file_is_read() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = Workspace::init(tmp.path()).unwrap();
        std::fs::write(ws.config_path(), "date_format: \"%d.%m.%Y\"\n").unwrap();
        let config = Config::read_file(&ws.config_path()).unwrap();
        assert_eq!(config.date_format(), "%d.%m.%Y");

        // The generated default file is all comments
        let tmp = tempfile::tempdir().unwrap();
        let ws = Workspace::init(tmp.path()).unwrap();
        assert_eq!(Config::read_file(&ws.config_path()), Some(Config::default()));
    }

    #[test]
    fn test_export_dir_precedence() {
        let config = Config {
            export_dir: Some(PathBuf::from("out")),
            ..Config::default()
        };
        assert_eq!(config.export_dir(Some(Path::new("cli"))), PathBuf::from("cli"));
        assert_eq!(config.export_dir(None), PathBuf::from("out"));
        assert_eq!(Config::default().export_dir(None), PathBuf::from("."));
    }
}
