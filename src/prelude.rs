//! Prelude module for the Top Movies library
//!
//! Re-exports the items most integrations need, so a single
//! `use top_movies::prelude::*;` is enough for typical usage.
//!
//! # Usage
//!
//! ```rust,no_run
//! use top_movies::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let transport = Arc::new(HttpTransport::new(&ClientConfig::default())?);
//!     let cache = Arc::new(ResourceCache::new(&CacheConfig::default()));
//!     let loader = ResourceLoader::new(transport, cache);
//!
//!     let poster = loader
//!         .load_image(&ResourceDescriptor::get("https://img.example.com/poster.jpg"))
//!         .await?;
//!     println!("{:?}", poster.dimensions());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, FetchError, FetchResult, Result};

// Essential app components
pub use crate::app::{
    CacheConfig,
    CacheStats,
    ClientConfig,
    FetchOutcome,
    HttpMethod,
    HttpTransport,
    ListItem,
    ListModel,
    LoadedImage,
    RankedListSource,
    ResourceCache,
    ResourceDescriptor,
    ResourceLoader,
    Transport,
};

pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{DEFAULT_IMAGE_CAPACITY, DEFAULT_PREVIEW_LIMIT, USER_AGENT};

pub use std::sync::Arc;

pub use tokio;
