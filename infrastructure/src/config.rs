use dotenvy::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/py";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn load() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Unset or unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("QUIZ_API_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout_secs = lookup("QUIZ_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self {
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn with_overrides(mut self, api_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(secs) = timeout_secs.filter(|secs| *secs > 0) {
            self.request_timeout = Duration::from_secs(secs);
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
