//! Application constants for Top Movies
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Environment variable holding the ranking API key
    pub const API_KEY: &str = "IMDB_API_KEY";
}

/// Ranking API endpoints
pub mod api {
    /// Top-ranked movies endpoint; the API key is appended as the last path segment
    pub const TOP_MOVIES_URL: &str = "https://imdb-api.com/en/API/Top250Movies";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "TopMovies/0.1.0";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 8;

    /// Status codes accepted as success when the caller does not say otherwise
    pub const DEFAULT_VALID_STATUS: std::ops::Range<u16> = 200..300;
}

/// In-memory cache sizing
pub mod cache {
    /// Default number of decoded images kept by the resource cache
    pub const DEFAULT_IMAGE_CAPACITY: usize = 256;

    /// Default number of responses kept by the transport response cache
    pub const DEFAULT_RESPONSE_CAPACITY: usize = 64;

    /// Responses larger than this are never stored by the response cache (4MB)
    pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
}

/// List model behaviour
pub mod list {
    /// Number of items shown when no search query is active
    pub const DEFAULT_PREVIEW_LIMIT: usize = 10;
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file name
    pub const LOCAL_FILE_NAME: &str = "top-movies.toml";

    /// Directory name under the user config directory
    pub const APP_DIR_NAME: &str = "top-movies";

    /// Configuration file name under the user config directory
    pub const USER_FILE_NAME: &str = "config.toml";
}

// Re-export commonly used constants at the top level
pub use cache::DEFAULT_IMAGE_CAPACITY;
pub use http::USER_AGENT;
pub use list::DEFAULT_PREVIEW_LIMIT;
