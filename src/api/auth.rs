//! API authentication
//!
//! The API uses a static bearer key. It is resolved from the environment or
//! the config file and never written to logs.

use std::fmt;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "LBKIT_API_KEY";

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "LBKIT_BASE_URL";

/// Bearer credentials for API calls
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    api_key: String,
}

impl ApiCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Read the key from [`API_KEY_ENV`]
    /// Blank values are treated as unset
    pub fn from_env() -> Option<Self> {
        std::env::var(API_KEY_ENV)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(Self::new)
    }

    /// The raw key, for the `Authorization` header only
    pub fn token(&self) -> &str {
        &self.api_key
    }
}

// Security: keep the key out of debug output and tracing fields
impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Base URL override from [`BASE_URL_ENV`]
pub fn base_url_from_env() -> Option<String> {
    std::env::var(BASE_URL_ENV)
        .ok()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}
