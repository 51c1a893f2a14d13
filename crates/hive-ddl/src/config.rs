//! Service configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

/// Default catalog deadline in seconds.
pub const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 60;

/// Default target database for database-level jobs.
pub const DEFAULT_DATABASE: &str = "default";

/// Configuration of a [`DdlProxy`](crate::proxy::DdlProxy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DdlConfig {
    /// How long a catalog fetch may take, in seconds.
    pub catalog_timeout_secs: u64,
    /// Database that create-database jobs run against.
    pub default_database: String,
    /// Page size requested from the results service. `None` lets the
    /// service decide.
    pub results_page_size: Option<usize>,
}

impl Default for DdlConfig {
    fn default() -> Self {
        Self {
            catalog_timeout_secs: DEFAULT_CATALOG_TIMEOUT_SECS,
            default_database: DEFAULT_DATABASE.to_string(),
            results_page_size: None,
        }
    }
}

impl DdlConfig {
    /// Loads and validates a JSON configuration file. Missing keys take
    /// their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| ServiceError::Config(format!("cannot parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.catalog_timeout_secs == 0 {
            return Err(ServiceError::Config(
                "catalog_timeout_secs must be positive".to_string(),
            ));
        }
        if self.default_database.trim().is_empty() {
            return Err(ServiceError::Config(
                "default_database must not be blank".to_string(),
            ));
        }
        if self.results_page_size == Some(0) {
            return Err(ServiceError::Config(
                "results_page_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the catalog deadline.
    #[must_use]
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }
}
