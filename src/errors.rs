//! Error types for Top Movies
//!
//! Errors are split by concern: the fetch pipeline reports [`FetchError`],
//! configuration loading reports [`ConfigError`], and the binary collapses
//! everything into [`AppError`] at the top level.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Shared, clonable underlying cause of a fetch failure
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Network and decode tier errors
///
/// Every variant is terminal: the pipeline never retries on its own.
/// The type is `Clone` so a single failure can be handed to several
/// waiters sharing one in-flight request.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// The descriptor address is not an absolute http(s) URL
    #[error("Invalid address: {address}")]
    InvalidAddress { address: String },

    /// Server answered with a status outside the accepted range
    #[error("Unexpected HTTP status {status}")]
    BadStatus { status: u16 },

    /// Status was acceptable but the body was empty
    #[error("Response contained no data")]
    NoData,

    /// The request never produced a response
    #[error("Transport failure: {0}")]
    TransportFailure(#[source] Cause),

    /// The payload could not be interpreted as the requested type
    #[error("Decode failure: {0}")]
    DecodeFailure(#[source] Cause),
}

impl FetchError {
    /// Wrap a lower level error as a transport failure
    pub fn transport<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::TransportFailure(Arc::new(error))
    }

    /// Wrap a lower level error as a decode failure
    pub fn decode<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::DecodeFailure(Arc::new(error))
    }

    /// Short label used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidAddress { .. } => "invalid_address",
            FetchError::BadStatus { .. } => "bad_status",
            FetchError::NoData => "no_data",
            FetchError::TransportFailure(_) => "transport",
            FetchError::DecodeFailure(_) => "decode",
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be written
    #[error("Failed to write configuration file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be rendered back to TOML
    #[error("Failed to serialize configuration")]
    Serialize(#[from] toml::ser::Error),

    /// Missing required configuration value
    #[error("Missing required configuration value: {field}. {hint}")]
    MissingValue { field: String, hint: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Building the HTTP client from configuration failed
    #[error("Failed to build HTTP client")]
    HttpClient(#[from] reqwest::Error),
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Fetch pipeline error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Fetch(_) => "fetch",
            AppError::Config(_) => "config",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Fetch pipeline result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
