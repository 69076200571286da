//! Store configuration.

use std::path::{Path, PathBuf};

/// Default file name of the store, relative to the working directory.
pub const DEFAULT_DB_FILE: &str = "university.db";

/// Where the store lives and how connections to it are opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    /// Sets `PRAGMA foreign_keys = ON` on every connection.
    pub enforce_foreign_keys: bool,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            enforce_foreign_keys: false,
        }
    }

    pub fn with_foreign_keys(mut self, enforce: bool) -> Self {
        self.enforce_foreign_keys = enforce;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the store file is present.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_FILE)
    }
}
