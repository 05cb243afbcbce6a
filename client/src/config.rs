use std::env;
use std::time::Duration;

use url::Url;

use crate::{ClientError, Result};

pub const ENV_VAR_API_URL: &str = "TRENDLAB_API_URL";
pub const ENV_VAR_ENVIRONMENT: &str = "TRENDLAB_ENV";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Settings for [`crate::Client`], fixed for the client's lifetime.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    /// Emit request/response diagnostics at debug level.
    pub verbose: bool,
}

impl ClientConfig {
    /// 30 second timeout, not verbose.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            verbose: false,
        })
    }

    /// Points at a locally running service.
    pub fn local() -> Result<Self> {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Reads `TRENDLAB_API_URL` and `TRENDLAB_ENV`, defaulting to a local
    /// non-verbose setup.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_VAR_API_URL)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let verbose = lookup(ENV_VAR_ENVIRONMENT)
            .map(|v| v.trim().eq_ignore_ascii_case("development"))
            .unwrap_or(false);

        Ok(Self::new(base_url.trim())?.with_verbose(verbose))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
