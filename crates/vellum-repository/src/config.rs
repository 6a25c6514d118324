use serde::{Deserialize, Serialize};
use vellum_content::ContentStoreConfig;
use vellum_store::StoreConfig;

use crate::error::{RepositoryError, RepositoryResult};
use crate::params::DEFAULT_MAX_CONTENT_LENGTH;

/// Backend selection and limits for a [`Repository`](crate::Repository).
///
/// ```toml
/// max_content_length = 1048576
///
/// [store]
/// kind = "journal"
/// path = "/var/lib/vellum/ledgers.log"
///
/// [content]
/// kind = "local"
/// root = "/var/lib/vellum/contents"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub store: StoreConfig,
    pub content: ContentStoreConfig,
    pub max_content_length: i64,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::Virtual,
            content: ContentStoreConfig::Virtual,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
        }
    }
}

impl RepositoryConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(input: &str) -> RepositoryResult<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| RepositoryError::Config(e.to_string()))?;
        if config.max_content_length < 1 {
            return Err(RepositoryError::Config(format!(
                "max_content_length must be positive, got {}",
                config.max_content_length
            )));
        }
        Ok(config)
    }
}
