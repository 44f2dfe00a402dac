//! Engine configuration
//!
//! Loaded from TOML; every section and key is optional.
//!
//! ```toml
//! [logging]
//! profile = "production"
//!
//! [versions]
//! autonaming_prefix = "VERSION_"
//!
//! [auto_update]
//! enabled = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{RefGraphError, Result};
use crate::logging_facility::Profile;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub logging: LoggingConfig,
    pub versions: VersionsConfig,
    pub auto_update: AutoUpdateConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub profile: Profile,
    /// Overrides the profile's default `EnvFilter` directive
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            profile: Profile::Development,
            filter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionsConfig {
    pub autonaming_prefix: String,
    pub autonaming_width: usize,
    pub first_tag: String,
    pub last_tag: String,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            autonaming_prefix: "VERSION_".to_string(),
            autonaming_width: 7,
            first_tag: "FIRST".to_string(),
            last_tag: "LAST".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoUpdateConfig {
    pub enabled: bool,
}

impl Default for AutoUpdateConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Index receiving reindex requests for tag changes
    pub tag_index: String,
    /// Index receiving reindex requests for back-reference changes
    pub reference_index: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            tag_index: "tag".to_string(),
            reference_index: "reference".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns `Configuration` for malformed TOML or mistyped keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| RefGraphError::Configuration {
            details: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.versions.first_tag.is_empty() || self.versions.last_tag.is_empty() {
            return Err(RefGraphError::Configuration {
                details: "tag names must not be empty".to_string(),
            });
        }
        if self.versions.first_tag == self.versions.last_tag {
            return Err(RefGraphError::Configuration {
                details: "FIRST and LAST tags need distinct names".to_string(),
            });
        }
        if self.versions.autonaming_prefix.contains('/') {
            return Err(RefGraphError::Configuration {
                details: "autonaming prefix must not contain '/'".to_string(),
            });
        }
        Ok(())
    }
}
