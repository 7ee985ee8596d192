//! Optional settings file.
//!
//! Administrators who run the tool often keep their Jamf Pro account and
//! server URL in a small TOML file so they are not prompted every run:
//!
//! ```toml
//! jss_user = "api-reader"
//! jss_pass = "hunter2"
//! jss_url  = "https://jss.example.com:8443"
//! ```
//!
//! Every key is optional. The file is looked up at `~/.jss-scripts.toml`
//! unless a path is given explicitly.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{JssError, Result};

/// File name looked up in the home directory.
pub const DEFAULT_CONFIG_FILE: &str = ".jss-scripts.toml";

/// Values pre-seeding the session.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// API account name.
    #[serde(default)]
    pub jss_user: Option<String>,
    /// API account password.
    #[serde(default)]
    pub jss_pass: Option<String>,
    /// Jamf Pro base URL.
    #[serde(default)]
    pub jss_url: Option<String>,
}

impl Settings {
    /// Parses settings from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| JssError::Configuration {
            message: "config file is not valid TOML".to_string(),
            source: Some(Box::new(e)),
        })
    }

    /// Loads settings.
    ///
    /// An explicit `path` must exist. Without one, the default file in the
    /// home directory is read if present and empty settings are returned
    /// otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_path() {
                Some(p) => (p, false),
                None => return Ok(Settings::default()),
            },
        };

        if !required && !path.exists() {
            return Ok(Settings::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|e| JssError::Configuration {
            message: format!("unable to read config file '{}'", path.display()),
            source: Some(Box::new(e)),
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Self::from_toml(&text)
    }
}

/// `~/.jss-scripts.toml`, when a home directory is known.
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_FILE))
}
