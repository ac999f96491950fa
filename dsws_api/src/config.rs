//! Client settings: endpoint, credentials, proxy, TLS and timeout.
//!
//! Settings are fixed at gateway construction and never mutated afterwards.
//! They can be built directly, loaded from a TOML file, or topped up from
//! the environment (`DSWS_USERNAME` / `DSWS_PASSWORD` / `DSWS_URL`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::Error;

/// Default API host. Only override if directed to by the service operator.
pub const DEFAULT_URL: &str = "https://product.datastream.com";

const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Connection settings for a [`crate::Client`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the API host.
    pub url: String,
    pub username: String,
    pub password: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Optional proxy URL applied to all requests.
    pub proxy: Option<String>,
    /// Optional path to a PEM bundle with additional root certificates.
    pub ca_bundle: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            username: String::new(),
            password: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            proxy: None,
            ca_bundle: None,
        }
    }
}

impl Settings {
    /// Settings for the default host with the given credentials.
    pub fn with_credentials(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            ..Self::default()
        }
    }

    /// Loads settings from a TOML file. The production API is https-only,
    /// so an `http:` URL from a file is upgraded rather than rejected.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("cannot read settings file: {e}")))?;
        let mut settings: Self = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("cannot parse settings: {e}")))?;
        settings.url = upgrade_scheme(&settings.url);
        Ok(settings)
    }

    /// Overrides credentials (and optionally the URL) from the environment.
    /// A `.env` file in the working directory is honoured if present.
    pub fn apply_env(mut self) -> Self {
        let _ = dotenvy::dotenv();
        if let Ok(username) = std::env::var("DSWS_USERNAME") {
            self.username = username;
        }
        if let Ok(password) = std::env::var("DSWS_PASSWORD") {
            self.password = password;
        }
        if let Ok(url) = std::env::var("DSWS_URL") {
            self.url = upgrade_scheme(&url);
        }
        self
    }

    /// True when both credentials are present and not the placeholder text
    /// shipped in sample configuration files.
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && self.username != "YourID" && !self.password.is_empty()
    }

    pub(crate) fn base_url(&self) -> Result<Url, Error> {
        let trimmed = self.url.trim();
        Url::parse(trimmed).map_err(|e| Error::Config(format!("invalid url '{trimmed}': {e}")))
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn upgrade_scheme(url: &str) -> String {
    let trimmed = url.trim();
    match trimmed.strip_prefix("http:") {
        Some(rest) => format!("https:{rest}"),
        None => trimmed.to_string(),
    }
}
