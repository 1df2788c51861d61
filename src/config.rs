//! Configuration options for the stockroom client

use std::path::PathBuf;
use std::time::Duration;

/// Default API base path, including the versioned prefix
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Configuration options for the stockroom client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the inventory API, e.g. `http://localhost:8000/api/v1`
    pub base_url: String,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Path of the durable token file
    pub token_file: PathBuf,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            token_file: default_token_file(),
        }
    }
}

impl ClientOptions {
    /// Set the API base URL
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the token file path
    pub fn with_token_file(mut self, value: PathBuf) -> Self {
        self.token_file = value;
        self
    }
}

/// Default location of the persisted token: `~/.config/stockroom/token`,
/// falling back to a dotfile in the working directory when no config
/// directory can be resolved.
pub fn default_token_file() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("stockroom").join("token"),
        None => PathBuf::from(".stockroom-token"),
    }
}
