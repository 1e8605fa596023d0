//! Integrator configuration
//!
//! Options can be built in code with `OAuthOptions::new` or loaded from the
//! `[sieg]` table of a TOML file. The secret key is resolved like this:
//! 1. `SIEG_SECRET_KEY` env var
//! 2. `secret_key_file` path from the file
//! 3. inline `secret_key`
//!
//! Required fields are checked by `validate`, which `IntegrationClient::new`
//! calls once.

use std::fmt;
use std::path::{Path, PathBuf};

use common::{Secret, require_non_blank};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_AUTHORIZE_URL, DEFAULT_AUTO_REFRESH_THRESHOLD_SECS, SECRET_KEY_ENV,
};
use crate::error::{Error, Result};

/// Permission scope requested on the authorization page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Read,
    Write,
    FullAccess,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Read => "read",
            AccessLevel::Write => "write",
            AccessLevel::FullAccess => "fullAccess",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SIEG OAuth options for one integrator.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthOptions {
    /// Client id issued by SIEG
    #[serde(default)]
    pub client_id: String,
    /// Secret key issued by SIEG (sent as `X-Secret-Key`)
    #[serde(default)]
    pub secret_key: Secret<String>,
    /// File holding the secret key (alternative to the env var)
    #[serde(default)]
    pub secret_key_file: Option<PathBuf>,
    /// Callback URL registered with SIEG
    #[serde(default)]
    pub redirect_uri: Option<String>,
    #[serde(default = "default_authorize_url")]
    pub base_authorize_url: String,
    #[serde(default = "default_api_url")]
    pub base_api_url: String,
    /// Scope requested when the caller passes none; `None` falls back to "read"
    #[serde(default = "default_access_level")]
    pub default_access_level: Option<String>,
    /// Refresh once the token is this close to expiry
    #[serde(default = "default_auto_refresh_threshold")]
    pub auto_refresh_threshold_secs: i64,
}

fn default_authorize_url() -> String {
    DEFAULT_AUTHORIZE_URL.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_access_level() -> Option<String> {
    Some(AccessLevel::Write.as_str().to_string())
}

fn default_auto_refresh_threshold() -> i64 {
    DEFAULT_AUTO_REFRESH_THRESHOLD_SECS
}

impl Default for OAuthOptions {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            secret_key: Secret::default(),
            secret_key_file: None,
            redirect_uri: None,
            base_authorize_url: default_authorize_url(),
            base_api_url: default_api_url(),
            default_access_level: default_access_level(),
            auto_refresh_threshold_secs: default_auto_refresh_threshold(),
        }
    }
}

#[derive(Deserialize)]
struct OptionsFile {
    sieg: OAuthOptions,
}

impl OAuthOptions {
    /// Options with the three required values and defaults for the rest.
    pub fn new(
        client_id: impl Into<String>,
        secret_key: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            secret_key: Secret::new(secret_key.into()),
            redirect_uri: Some(redirect_uri.into()),
            ..Self::default()
        }
    }

    pub fn with_base_authorize_url(mut self, url: impl Into<String>) -> Self {
        self.base_authorize_url = url.into();
        self
    }

    pub fn with_base_api_url(mut self, url: impl Into<String>) -> Self {
        self.base_api_url = url.into();
        self
    }

    pub fn with_default_access_level(mut self, level: Option<String>) -> Self {
        self.default_access_level = level;
        self
    }

    pub fn with_auto_refresh_threshold_secs(mut self, secs: i64) -> Self {
        self.auto_refresh_threshold_secs = secs;
        self
    }

    /// Fail fast if client id, secret key or redirect URI is blank, or the
    /// refresh threshold is negative.
    pub fn validate(&self) -> Result<()> {
        require_non_blank("client_id", &self.client_id)?;
        require_non_blank("secret_key", self.secret_key.expose())?;
        require_non_blank("redirect_uri", self.redirect_uri.as_deref().unwrap_or_default())?;
        if self.auto_refresh_threshold_secs < 0 {
            return Err(Error::InvalidArgument(format!(
                "auto_refresh_threshold_secs must not be negative, got {}",
                self.auto_refresh_threshold_secs
            )));
        }
        Ok(())
    }

    /// Authorization page URL without a trailing slash.
    pub fn authorize_url(&self) -> &str {
        self.base_authorize_url.trim_end_matches('/')
    }

    /// Full URL of an API endpoint under `base_api_url`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_api_url.trim_end_matches('/'), path)
    }

    /// Parse the `[sieg]` table of a TOML document.
    ///
    /// Only deserializes; the secret is not resolved from env or file.
    pub fn from_toml_str(contents: &str) -> common::Result<Self> {
        let file: OptionsFile = toml::from_str(contents)?;
        Ok(file.sieg)
    }

    /// Load options from a TOML file, then resolve the secret key.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut options = Self::from_toml_str(&contents)?;
        options.resolve_secret(std::env::var(SECRET_KEY_ENV).ok())?;
        Ok(options)
    }

    /// Env value takes precedence over `secret_key_file`, which takes
    /// precedence over the inline key.
    fn resolve_secret(&mut self, env_value: Option<String>) -> common::Result<()> {
        if let Some(key) = env_value.filter(|k| !k.trim().is_empty()) {
            self.secret_key = Secret::new(key);
        } else if let Some(ref key_file) = self.secret_key_file {
            let key = std::fs::read_to_string(key_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read secret_key_file {}: {e}",
                    key_file.display()
                ))
            })?;
            let key = key.trim().to_owned();
            if !key.is_empty() {
                self.secret_key = Secret::new(key);
            }
        }
        Ok(())
    }
}
