//! Configuration for the paper-wrangler pipelines.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the Crossref REST API.
    pub const CROSSREF_API: &str = "https://api.crossref.org";

    /// Default Ollama host for local model calls.
    pub const OLLAMA_HOST: &str = "http://localhost:11434";

    /// Default model used for country extraction.
    pub const DEFAULT_MODEL: &str = "gemma3:4b";

    /// Metadata lookup timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Conference page fetch timeout.
    pub const PAGE_TIMEOUT: Duration = Duration::from_secs(2);

    /// Local model call timeout (generation is slow on CPU).
    pub const MODEL_TIMEOUT: Duration = Duration::from_secs(120);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 4;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// User agent sent with every request.
    pub const USER_AGENT: &str =
        concat!("paper-wrangler/", env!("CARGO_PKG_VERSION"), " (conference data tooling)");
}

/// Output locations relative to the results directory.
pub mod paths {
    /// Default root for generated files.
    pub const RESULTS_DIR: &str = "results";

    /// Default root for per-year conference bibliographies.
    pub const DATA_DIR: &str = "data";

    /// Subdirectory for converted bibliographies.
    pub const BIB_SUBDIR: &str = "bib";

    /// Subdirectory for scraped conference tables.
    pub const SCRAPE_SUBDIR: &str = "researchr";
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL for Crossref (for testing with mock servers).
    pub crossref_api_url: String,

    /// Contact address for the Crossref polite pool (optional).
    pub mailto: Option<String>,

    /// Base URL of the Ollama-compatible model server.
    pub ollama_url: String,

    /// Model name used for country extraction.
    pub model: String,

    /// Metadata request timeout.
    pub request_timeout: Duration,

    /// Page fetch timeout.
    pub page_timeout: Duration,

    /// Model call timeout.
    pub model_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl Config {
    /// Create a configuration pointing at the public endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self {
            crossref_api_url: api::CROSSREF_API.to_string(),
            mailto: None,
            ollama_url: api::OLLAMA_HOST.to_string(),
            model: api::DEFAULT_MODEL.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            page_timeout: api::PAGE_TIMEOUT,
            model_timeout: api::MODEL_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
        }
    }

    /// Create a test configuration with every endpoint on one mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            crossref_api_url: base_url.trim_end_matches('/').to_string(),
            mailto: None,
            ollama_url: base_url.trim_end_matches('/').to_string(),
            model: "test-model".to_string(),
            request_timeout: Duration::from_secs(5),
            page_timeout: Duration::from_secs(5),
            model_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }

    /// Create configuration from environment variables (and a `.env` file if present).
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Self::new();
        if let Ok(url) = std::env::var("CROSSREF_API_URL") {
            config.crossref_api_url = url.trim_end_matches('/').to_string();
        }
        config.mailto = std::env::var("CROSSREF_MAILTO").ok().filter(|m| !m.trim().is_empty());
        if let Ok(host) = std::env::var("OLLAMA_HOST") {
            config.ollama_url = normalize_host(&host);
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        Ok(config)
    }

    /// Override the model server address.
    #[must_use]
    pub fn with_ollama_url(mut self, url: &str) -> Self {
        self.ollama_url = normalize_host(url);
        self
    }

    /// Check if a Crossref contact address is configured.
    #[must_use]
    pub const fn has_mailto(&self) -> bool {
        self.mailto.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// `OLLAMA_HOST` is often given as a bare `host:port`.
fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.crossref_api_url, api::CROSSREF_API);
        assert_eq!(config.model, "gemma3:4b");
        assert!(!config.has_mailto());
    }

    #[test]
    fn test_for_testing_strips_trailing_slash() {
        let config = Config::for_testing("http://127.0.0.1:9999/");
        assert_eq!(config.crossref_api_url, "http://127.0.0.1:9999");
        assert_eq!(config.ollama_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("localhost:11434"), "http://localhost:11434");
        assert_eq!(normalize_host("https://gpu.lab:443/"), "https://gpu.lab:443");
    }

    #[test]
    fn test_timeouts() {
        assert_eq!(api::PAGE_TIMEOUT, Duration::from_secs(2));
        assert_eq!(api::REQUEST_TIMEOUT, Duration::from_secs(10));
    }
}
