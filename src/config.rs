// Configuration module: where the server lives, which local folder is
// synced to it, and the credentials to use. Built once at startup from
// defaults, an optional JSON file and `OW_*` environment variables.

use crate::error::{OwError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Nextcloud server, without a trailing slash.
    pub server: String,
    /// Where files are synced locally.
    pub local_sync_folder: PathBuf,
    /// Server-side folder that `local_sync_folder` mirrors. Informational
    /// only: WebDAV and share paths are built from the user's root.
    pub remote_destination_folder: String,
    pub username: String,
    /// Account password, or an app password when multi-factor auth is on.
    pub password: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            server: "http://localhost:8080".into(),
            local_sync_folder: home.join("Nextcloud"),
            remote_destination_folder: "/".into(),
            username: "admin".into(),
            password: String::new(),
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("local_sync_folder", &self.local_sync_folder)
            .field("remote_destination_folder", &self.remote_destination_folder)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "<redacted>" })
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Load the configuration. An explicit `path` must exist; otherwise the
    /// default location is read when present. Environment overrides are
    /// applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            OwError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| OwError::Config(format!("cannot parse {}: {}", path.display(), e)))
    }

    /// `<config dir>/ow/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ow").join("config.json"))
    }

    /// Apply `OW_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("OW_SERVER") {
            self.server = v;
        }
        if let Some(v) = lookup("OW_LOCAL_SYNC_FOLDER") {
            self.local_sync_folder = PathBuf::from(v);
        }
        if let Some(v) = lookup("OW_REMOTE_DESTINATION_FOLDER") {
            self.remote_destination_folder = v;
        }
        if let Some(v) = lookup("OW_USERNAME") {
            self.username = v;
        }
        if let Some(v) = lookup("OW_PASSWORD") {
            self.password = v;
        }
        if let Some(v) = lookup("OW_TIMEOUT_SECS") {
            self.timeout_secs = v
                .trim()
                .parse()
                .map_err(|_| OwError::Config(format!("OW_TIMEOUT_SECS is not a number: {v}")))?;
        }
        Ok(())
    }

    fn normalize(&mut self) {
        self.server = self.server.trim().trim_end_matches('/').to_string();
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.server.starts_with("http://") || self.server.starts_with("https://")) {
            return Err(OwError::Config(format!(
                "server must be an http:// or https:// URL, got {:?}",
                self.server
            )));
        }
        if self.username.is_empty() {
            return Err(OwError::Config("username is empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(OwError::Config("timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }
}
