//! Configuration
//!
//! Settings for opening a board store: database location, logging and paging limits.
//! Loaded from JSON; every field has a default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// SQLite file, or `:memory:`
    pub db_path: PathBuf,
    /// Directory for rolling log files. No file logging when unset.
    pub log_dir: Option<PathBuf>,
    /// Log file stem
    pub app_name: String,
    /// Page size used when a caller does not pass one
    pub default_page_size: u32,
    /// Upper bound for any requested page size
    pub max_page_size: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(":memory:"),
            log_dir: None,
            app_name: "LogisticsBoard".to_string(),
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl BoardConfig {
    pub fn from_json_str(json: &str) -> DomainResult<Self> {
        let config: BoardConfig = serde_json::from_str(json)
            .map_err(|e| DomainError::InvalidInput(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> DomainResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Internal(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.max_page_size == 0 || self.default_page_size == 0 {
            return Err(DomainError::InvalidInput("page sizes must be positive".to_string()));
        }
        if self.default_page_size > self.max_page_size {
            return Err(DomainError::InvalidInput(format!(
                "default_page_size {} exceeds max_page_size {}",
                self.default_page_size, self.max_page_size
            )));
        }
        if self.app_name.trim().is_empty() {
            return Err(DomainError::InvalidInput("app_name must not be empty".to_string()));
        }
        Ok(())
    }
}
