//! Server configuration persisted as JSON.
//!
//! Loaded once at startup and immutable afterwards; there is no hot
//! reload. When the file is missing or unreadable the caller falls back
//! to [`Config::default`] and persists it back to the same path.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Process-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bind address, e.g. `0.0.0.0`.
    pub address: String,
    pub port: u16,
    /// Root directory all client paths are confined to.
    pub workdir: String,
    /// PEM private key path, used when `tls` is set.
    pub server_key: String,
    /// PEM certificate path, used when `tls` is set.
    pub server_cert: String,
    pub tls: bool,
    pub user: String,
    /// sha256 hex digest of the password.
    pub password_hash: String,
}

impl Config {
    /// Load from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Persist as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let workdir = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| ".".to_string());
        Self {
            address: "0.0.0.0".to_string(),
            port: 8080,
            workdir,
            server_key: String::new(),
            server_cert: String::new(),
            tls: false,
            user: "guest".to_string(),
            // sha256 of "guest"
            password_hash: "84983c60f7daadc1cb8698621f802c0d9f9a3c3c295c810748fb048115c186ec"
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};
    use tempfile::TempDir;

    #[test]
    fn save_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");

        let mut config = Config::default();
        config.address = "127.0.0.1".to_string();
        config.port = 9090;
        config.workdir = "/srv/files".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.address, "127.0.0.1");
        assert_eq!(loaded.port, 9090);
        assert_eq!(loaded.workdir, "/srv/files");
        assert_eq!(loaded.user, "guest");
    }

    #[test]
    fn load_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(Config::load(&tmp.path().join("nope.json")).is_err());
    }

    #[test]
    fn load_corrupt_file_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "not valid json!!!").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn persisted_field_names_are_stable() {
        let json = serde_json::to_value(Config::default()).unwrap();
        for field in [
            "address",
            "port",
            "workdir",
            "server_key",
            "server_cert",
            "tls",
            "user",
            "password_hash",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
    }

    #[test]
    fn default_credentials() {
        let config = Config::default();
        assert_eq!(config.user, "guest");
        // Matches sha256("guest").
        assert_eq!(
            config.password_hash,
            hex::encode(Sha256::digest("guest".as_bytes()))
        );
    }
}
