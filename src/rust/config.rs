use std::env;
use std::time::Duration;

use reqwest::Url;

/// Environment variable holding the service base URL
pub const BACKEND_URL_ENV: &str = "IRIS_BACKEND_URL";

/// Used when no base URL is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Path of the prediction endpoint, relative to the base URL
pub const PREDICT_PATH: &str = "api/predict";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Settings for talking to the classification service. Read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Transport timeout for the whole request. `None` leaves it to the OS.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: None,
            user_agent: concat!("iris-predict/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Builds a config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::default().with_base_url(Self::get_default_base_url())
    }

    /// Returns the base URL the client should use when none is given explicitly
    pub fn get_default_base_url() -> String {
        // 1. Check environment variable
        if let Ok(url) = env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                return url.trim().to_string();
            }
        }

        // 2. Local development address
        DEFAULT_BACKEND_URL.to_string()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolves the full prediction endpoint from the base URL.
    ///
    /// A base URL with a path prefix keeps it, with or without a trailing
    /// slash: `http://host/ml` and `http://host/ml/` both give
    /// `http://host/ml/api/predict`.
    pub fn predict_url(&self) -> Result<Url, ConfigError> {
        let mut base = Url::parse(self.base_url.trim()).map_err(|e| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme(base.scheme().to_string()));
        }

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        base.join(PREDICT_PATH).map_err(|e| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert!(config.timeout.is_none());
        assert!(config.user_agent.starts_with("iris-predict/"));
    }

    #[test]
    fn test_predict_url() {
        let config = ClientConfig::default();
        assert_eq!(config.predict_url().unwrap().as_str(), "http://localhost:8000/api/predict");

        for base in ["http://example.com/ml", "http://example.com/ml/"] {
            let config = ClientConfig::default().with_base_url(base);
            assert_eq!(config.predict_url().unwrap().as_str(), "http://example.com/ml/api/predict");
        }
    }

    #[test]
    fn test_invalid_urls() {
        let config = ClientConfig::default().with_base_url("not a url");
        assert!(matches!(config.predict_url(), Err(ConfigError::InvalidUrl { .. })));

        let config = ClientConfig::default().with_base_url("ftp://example.com");
        assert!(matches!(config.predict_url(), Err(ConfigError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_default_base_url_from_env() {
        // Test with environment variable
        env::set_var(BACKEND_URL_ENV, "http://inference.internal:9000");
        assert_eq!(ClientConfig::get_default_base_url(), "http://inference.internal:9000");
        assert_eq!(ClientConfig::from_env().base_url, "http://inference.internal:9000");

        // Empty counts as unset
        env::set_var(BACKEND_URL_ENV, "");
        assert_eq!(ClientConfig::get_default_base_url(), DEFAULT_BACKEND_URL);
        env::remove_var(BACKEND_URL_ENV);

        // Test without environment variable
        assert_eq!(ClientConfig::get_default_base_url(), DEFAULT_BACKEND_URL);
    }
}
