//! Core configuration values.
//!
//! # Responsibility
//! - Describe where the item database lives and how live views share work.
//!
//! # Invariants
//! - Defaults match production behavior: file storage chosen by the host,
//!   five second grace window for live views.

use crate::live::SharingPolicy;
use std::path::PathBuf;

/// Database file name used when the host only supplies a directory.
pub const DEFAULT_DB_FILE_NAME: &str = "shoplist.sqlite3";

/// Backing storage for the item store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Memory,
}

/// Item store construction options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
    pub sharing: SharingPolicy,
}

impl StoreConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            sharing: SharingPolicy::default(),
        }
    }

    /// File store named `DEFAULT_DB_FILE_NAME` inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::file(dir.into().join(DEFAULT_DB_FILE_NAME))
    }

    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::Memory,
            sharing: SharingPolicy::default(),
        }
    }

    pub fn with_sharing(mut self, sharing: SharingPolicy) -> Self {
        self.sharing = sharing;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreConfig, StoreLocation, DEFAULT_DB_FILE_NAME};
    use crate::live::{SharingPolicy, DEFAULT_GRACE_WINDOW};
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn in_dir_appends_default_file_name() {
        let config = StoreConfig::in_dir("/data/app");
        assert_eq!(
            config.location,
            StoreLocation::File(PathBuf::from("/data/app").join(DEFAULT_DB_FILE_NAME))
        );
        assert_eq!(config.sharing.grace_window, DEFAULT_GRACE_WINDOW);
    }

    #[test]
    fn with_sharing_overrides_grace_window() {
        let config = StoreConfig::in_memory()
            .with_sharing(SharingPolicy::with_grace_window(Duration::ZERO));
        assert_eq!(config.sharing.grace_window, Duration::ZERO);
    }
}
