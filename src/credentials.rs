//! API key credentials and client configuration.

use std::env;
use std::fmt;

use crate::error::{OnshapeError, Result};

/// Production Onshape host.
pub const DEFAULT_BASE_URL: &str = "https://cad.onshape.com";

/// Onshape API key pair plus connection settings.
///
/// Immutable once handed to a client. The `Debug` output never shows
/// either key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
    base_url: String,
    debug: bool,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Create credentials for the production host with debug logging off.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            debug: false,
        }
    }

    /// Read credentials from the environment.
    ///
    /// - `ONSHAPE_ACCESS_KEY` (required)
    /// - `ONSHAPE_SECRET_KEY` (required)
    /// - `ONSHAPE_BASE_URL` (optional, defaults to `https://cad.onshape.com`)
    /// - `ONSHAPE_DEBUG` (optional, `1` or `true` enables URL logging)
    ///
    /// # Errors
    ///
    /// Returns an error if either key is not set.
    pub fn from_env() -> Result<Self> {
        let access_key = env::var("ONSHAPE_ACCESS_KEY").map_err(|_| {
            OnshapeError::ConfigMissing("ONSHAPE_ACCESS_KEY environment variable not set".to_string())
        })?;
        let secret_key = env::var("ONSHAPE_SECRET_KEY").map_err(|_| {
            OnshapeError::ConfigMissing("ONSHAPE_SECRET_KEY environment variable not set".to_string())
        })?;

        let mut creds = Self::new(access_key, secret_key);
        if let Ok(base_url) = env::var("ONSHAPE_BASE_URL") {
            creds = creds.with_base_url(base_url);
        }
        if let Ok(debug) = env::var("ONSHAPE_DEBUG") {
            creds = creds.with_debug(parse_flag(&debug));
        }
        Ok(creds)
    }

    /// Point at a different host, e.g. an enterprise domain.
    ///
    /// An empty value keeps the production host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        if !base_url.trim().is_empty() {
            self.base_url = base_url;
        }
        self
    }

    /// Log every resolved request URL at info level.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn debug(&self) -> bool {
        self.debug
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
