use std::borrow::Cow;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Backend connection settings, passed explicitly to the API client
#[derive(Debug, Clone)]
pub struct DashboardConfig<'a> {
    pub api_base_url: Cow<'a, str>,
    pub request_timeout: Duration,
}

impl<'a> DashboardConfig<'a> {
    /// Create new configuration for the given backend
    pub fn new(api_base_url: impl Into<Cow<'a, str>>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Base URL without a trailing slash, borrowed when already clean
    pub fn base_url(&self) -> Cow<'_, str> {
        match self.api_base_url.strip_suffix('/') {
            Some(trimmed) => Cow::Owned(trimmed.trim_end_matches('/').to_string()),
            None => Cow::Borrowed(self.api_base_url.as_ref()),
        }
    }

    /// Read `HOSPITAL_API_URL` and `HOSPITAL_API_TIMEOUT_SECS` with fallback
    pub fn from_env() -> Result<Self, String> {
        let api_base_url =
            std::env::var("HOSPITAL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_secs = match std::env::var("HOSPITAL_API_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("Invalid HOSPITAL_API_TIMEOUT_SECS: {raw}"))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self::new(api_base_url).with_timeout(Duration::from_secs(timeout_secs)))
    }

    pub fn into_owned(self) -> DashboardConfig<'static> {
        DashboardConfig {
            api_base_url: Cow::Owned(self.api_base_url.into_owned()),
            request_timeout: self.request_timeout,
        }
    }
}

impl<'a> Default for DashboardConfig<'a> {
    fn default() -> Self {
        Self {
            api_base_url: Cow::Borrowed(DEFAULT_API_URL),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
