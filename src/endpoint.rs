//! Jamf Pro server URL resolution.
//!
//! Managed Macs record their Jamf Pro server in the system preference file
//! `/Library/Preferences/com.jamfsoftware.jamf.plist` under `jss_url`. That
//! file may be binary, so it is first normalised to XML with `plutil` and
//! then parsed. Machines without the file (admin workstations that are not
//! enrolled, Linux hosts) are prompted for the URL instead.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::error::{JssError, Result};
use crate::prompt::Prompt;

/// Jamf agent preference file on enrolled Macs.
pub const JAMF_PREFERENCES: &str = "/Library/Preferences/com.jamfsoftware.jamf.plist";

/// Converter used to normalise the preference file to an XML plist.
pub const PLUTIL: &str = "/usr/bin/plutil";

const URL_PROMPT: &str = "Enter JSS URL: ";

/// The Jamf Pro server all requests are sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Base URL, e.g. `https://jss.example.com:8443/`.
    pub base_url: String,
}

impl Endpoint {
    /// Wraps a base URL, rejecting an empty one.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim().to_string();
        if base_url.is_empty() {
            return Err(JssError::configuration("Jamf Pro URL is empty"));
        }
        Ok(Endpoint { base_url })
    }
}

#[derive(Deserialize)]
struct JamfPreferences {
    jss_url: Option<String>,
}

/// Reads `jss_url` from an XML property list.
pub fn parse_preferences(xml: &[u8]) -> Result<String> {
    let prefs: JamfPreferences = plist::from_bytes(xml).map_err(|e| JssError::Configuration {
        message: "unable to parse Jamf preferences".to_string(),
        source: Some(Box::new(e)),
    })?;
    prefs
        .jss_url
        .ok_or_else(|| JssError::configuration("jss_url not found in Jamf preferences"))
}

/// Resolves the [`Endpoint`] for this run.
///
/// Order: preset URL, then the Jamf preference file, then the prompt.
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    preset: Option<String>,
    preferences: PathBuf,
    converter: PathBuf,
}

impl Default for EndpointResolver {
    fn default() -> Self {
        EndpointResolver {
            preset: None,
            preferences: PathBuf::from(JAMF_PREFERENCES),
            converter: PathBuf::from(PLUTIL),
        }
    }
}

impl EndpointResolver {
    /// Resolver using the standard preference file and converter.
    pub fn new(preset: Option<String>) -> Self {
        EndpointResolver {
            preset,
            ..Self::default()
        }
    }

    /// Overrides the preference file and converter locations.
    pub fn with_preferences(mut self, preferences: &Path, converter: &Path) -> Self {
        self.preferences = preferences.to_path_buf();
        self.converter = converter.to_path_buf();
        self
    }

    /// Returns the endpoint for this run.
    ///
    /// # Errors
    ///
    /// `JssError::Configuration` when the converter cannot be run or fails,
    /// the preference file has no `jss_url`, the prompt cannot be read, or
    /// the resulting URL is empty.
    pub fn resolve(&self, prompt: &mut dyn Prompt) -> Result<Endpoint> {
        if let Some(url) = &self.preset {
            return Endpoint::new(url.clone());
        }

        if self.preferences.exists() {
            let url = self.read_preferences()?;
            tracing::debug!(%url, path = %self.preferences.display(), "using jss_url from Jamf preferences");
            return Endpoint::new(url);
        }

        let url = prompt.read_line(URL_PROMPT).map_err(|e| JssError::Configuration {
            message: "unable to read Jamf Pro URL".to_string(),
            source: Some(Box::new(e)),
        })?;
        Endpoint::new(url)
    }

    fn read_preferences(&self) -> Result<String> {
        let output = Command::new(&self.converter)
            .arg("-convert")
            .arg("xml1")
            .arg(&self.preferences)
            .arg("-o")
            .arg("-")
            .output()
            .map_err(|e| JssError::Configuration {
                message: format!("unable to run '{}'", self.converter.display()),
                source: Some(Box::new(e)),
            })?;

        if !output.status.success() {
            return Err(JssError::configuration(format!(
                "'{}' failed ({}): {}",
                self.converter.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_preferences(&output.stdout)
    }
}
