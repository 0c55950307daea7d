//! Configuration for citebib
//!
//! Loaded from a TOML file with a `[resolvers]` table for metadata sources and
//! a `[storage]` table for where the collection lives. Every field has a
//! default, so a missing file or a partial one is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "CITEBIB_CONFIG";

const APP_DIR: &str = "citebib";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitebibConfig {
    pub resolvers: ResolverConfig,
    pub storage: StorageConfig,
}

/// Metadata source endpoints and HTTP behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub crossref_base_url: String,
    pub openlibrary_base_url: String,
    pub ncbi_base_url: String,
    /// Prefix prepended to the url-encoded target when fetching web pages
    pub cors_relay: Option<String>,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            crossref_base_url: "https://api.crossref.org".to_string(),
            openlibrary_base_url: "https://openlibrary.org".to_string(),
            ncbi_base_url: "https://api.ncbi.nlm.nih.gov".to_string(),
            cors_relay: None,
            user_agent: format!("citebib/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the collection snapshot; platform data dir when unset
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
        })
    }
}

impl CitebibConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Default config file location, `<config dir>/citebib/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Locate and load the config file.
    ///
    /// Tries `explicit`, then `CITEBIB_CONFIG`, then the default path. A file
    /// that does not exist yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
            .or_else(Self::default_path);

        match path {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        let config = Self::from_toml(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolvers.timeout_secs == 0 {
            return Err(ConfigError::OutOfRange(
                "resolvers.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CitebibConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolvers.timeout_secs, 30);
        assert!(config.resolvers.cors_relay.is_none());
        assert!(config.resolvers.user_agent.starts_with("citebib/"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CitebibConfig::from_toml(
            r#"
            [resolvers]
            crossref_base_url = "http://localhost:9000"
            cors_relay = "https://corsproxy.io/?"
            "#,
        )
        .unwrap();
        assert_eq!(config.resolvers.crossref_base_url, "http://localhost:9000");
        assert_eq!(config.resolvers.cors_relay.as_deref(), Some("https://corsproxy.io/?"));
        assert_eq!(config.resolvers.openlibrary_base_url, "https://openlibrary.org");
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = CitebibConfig::default();
        config.storage.data_dir = Some(PathBuf::from("/tmp/citebib"));
        let text = config.to_toml().unwrap();
        assert_eq!(CitebibConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CitebibConfig::load_from_path(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, CitebibConfig::default());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[resolvers\ntimeout_secs = ").unwrap();
        assert!(matches!(
            CitebibConfig::load_from_path(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[resolvers]\ntimeout_secs = 0\n").unwrap();
        assert!(matches!(
            CitebibConfig::load_from_path(&path),
            Err(ConfigError::OutOfRange(_))
        ));
    }
}
