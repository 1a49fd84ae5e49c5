//! Top Movies Library
//!
//! Fetches the ranked movie list from a public ranking API and loads poster
//! images through a two-tier in-memory cache.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
