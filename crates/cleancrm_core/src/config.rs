//! Runtime configuration for one CRM process.
//!
//! # Responsibility
//! - Choose the storage layout and data location.
//! - Carry logging settings from the entry point to `init_logging`.

use crate::logging::default_log_level;
use crate::model::ModelError;
use crate::store::backend::COMBINED_FILE_NAME;
use crate::store::{CombinedJsonBackend, SplitJsonBackend, StoreBackend};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

/// On-disk arrangement of persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreLayout {
    /// One versioned file holding every collection.
    #[default]
    Combined,
    /// One indented file per collection inside a directory.
    Split,
}

impl StoreLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Combined => "combined",
            Self::Split => "split",
        }
    }

    /// Default data location relative to the working directory.
    pub fn default_path(self) -> PathBuf {
        match self {
            Self::Combined => PathBuf::from(COMBINED_FILE_NAME),
            Self::Split => PathBuf::from("."),
        }
    }
}

impl Display for StoreLayout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreLayout {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "combined" => Ok(Self::Combined),
            "split" => Ok(Self::Split),
            other => Err(ModelError::UnknownChoice {
                field: "StoreLayout",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub layout: StoreLayout,
    /// Combined file path, or directory for the split layout.
    pub data_path: PathBuf,
    pub log_level: String,
    /// Absolute log directory; `None` leaves logging uninitialized.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::for_layout(StoreLayout::default(), None)
    }
}

impl StoreConfig {
    /// Builds a config for `layout`, falling back to the layout's default path.
    pub fn for_layout(layout: StoreLayout, data_path: Option<PathBuf>) -> Self {
        Self {
            layout,
            data_path: data_path.unwrap_or_else(|| layout.default_path()),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }

    pub fn with_logging(mut self, level: impl Into<String>, log_dir: Option<PathBuf>) -> Self {
        self.log_level = level.into();
        self.log_dir = log_dir;
        self
    }

    /// Creates the backend matching `layout`.
    pub fn open_backend(&self) -> Box<dyn StoreBackend> {
        match self.layout {
            StoreLayout::Combined => Box::new(CombinedJsonBackend::new(self.data_path.clone())),
            StoreLayout::Split => Box::new(SplitJsonBackend::new(self.data_path.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreConfig, StoreLayout};
    use std::path::PathBuf;

    #[test]
    fn layout_defaults_pick_matching_paths() {
        let combined = StoreConfig::default();
        assert_eq!(combined.layout, StoreLayout::Combined);
        assert_eq!(combined.data_path, PathBuf::from("crm_data.json"));

        let split = StoreConfig::for_layout(StoreLayout::Split, None);
        assert_eq!(split.data_path, PathBuf::from("."));
        assert!(split.open_backend().describe().starts_with("split:"));
    }

    #[test]
    fn layout_parses_case_insensitively() {
        assert_eq!("SPLIT".parse::<StoreLayout>().unwrap(), StoreLayout::Split);
        assert!("sqlite".parse::<StoreLayout>().is_err());
    }
}
