//! Registered bridge usernames, persisted as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBridge {
    pub username: String,
}

/// Usernames keyed by bridge address: `{"<address>": {"username": "..."}}`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigStore {
    bridges: BTreeMap<String, StoredBridge>,
}

impl ConfigStore {
    /// Platform config directory, falling back to the working directory.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("com", "hue-lights-rs", "hue").map_or_else(
            || PathBuf::from(".hue_bridges.json"),
            |dirs| dirs.config_dir().join("bridges.json"),
        )
    }

    /// Load the store; a missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Ok(ConfigStore::default());
        }
        let text = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), CliError> {
        let io_err = |source| CliError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(self).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(io_err)?;
        info!("Wrote configuration file to {}", path.display());
        Ok(())
    }

    pub fn username(&self, address: &str) -> Option<&str> {
        self.bridges.get(address).map(|b| b.username.as_str())
    }

    pub fn set_username(&mut self, address: &str, username: &str) {
        self.bridges.insert(
            address.to_string(),
            StoredBridge {
                username: username.to_string(),
            },
        );
    }

    /// The first stored bridge, by address.
    pub fn first(&self) -> Option<(&str, &str)> {
        self.bridges
            .iter()
            .next()
            .map(|(address, bridge)| (address.as_str(), bridge.username.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::load(&dir.path().join("none.json")).unwrap();
        assert_eq!(store, ConfigStore::default());
        assert!(store.first().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bridges.json");

        let mut store = ConfigStore::default();
        store.set_username("192.168.1.2", "abc123");
        store.save(&path).unwrap();

        let loaded = ConfigStore::load(&path).unwrap();
        assert_eq!(loaded.username("192.168.1.2"), Some("abc123"));
        assert_eq!(loaded.first(), Some(("192.168.1.2", "abc123")));

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"192.168.1.2": {"username": "abc123"}}));
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"not json").unwrap();
        assert!(matches!(
            ConfigStore::load(file.path()),
            Err(CliError::Config { .. })
        ));
    }
}
