//! Runtime configuration
//!
//! The only knobs are where the API lives, which placeholder image to show
//! for shows without a poster, and how long a single request may take.

use std::time::Duration;

/// Base URL of the public TVMaze API
pub const DEFAULT_API_BASE_URL: &str = "https://api.tvmaze.com";

/// Placeholder shown for shows that have no poster image
pub const DEFAULT_IMAGE_URL: &str = "https://tinyurl.com/tv-missing";

/// Upper bound for a single request, connect to last body byte
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration shared by the metadata provider and the views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// API base URL without trailing slash
    pub api_base_url: String,
    /// Image URL substituted when a show has no image
    pub default_image_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            default_image_url: DEFAULT_IMAGE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Config {
    /// Sets the API base URL. Trailing slashes are dropped so endpoint
    /// paths can be appended verbatim.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Sets the placeholder image URL. An empty value keeps the current one,
    /// since a show's image URL must never be empty.
    pub fn with_default_image_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if !url.trim().is_empty() {
            self.default_image_url = url;
        }
        self
    }

    /// Sets the per-request timeout. A zero timeout would fail every
    /// request, so it keeps the current one.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.request_timeout = timeout;
        }
        self
    }
}
