//! Core application logic for Top Movies
//!
//! This module contains the fetch pipeline (descriptors, transport, decoding),
//! the two in-memory caches, the image loader, and the ranked list model.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use top_movies::app::{
//!     ClientConfig, HttpTransport, ListModel, RankedListSource, ResourceCache, ResourceLoader,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(HttpTransport::new(&ClientConfig::default())?);
//!
//! let mut list = ListModel::new(Arc::clone(&transport), RankedListSource::top_movies("k_123"));
//! list.observe_changes(|items| println!("{} items visible", items.len()));
//! list.fetch().await;
//!
//! let loader = ResourceLoader::new(transport, Arc::new(ResourceCache::default()));
//! if let Some(item) = list.derived_view().first() {
//!     let poster = loader.load_image(&item.image_descriptor()).await?;
//!     println!("{}x{}", poster.width(), poster.height());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - `resource`: immutable request descriptors
//! - `client`: the [`Transport`] seam and its reqwest implementation
//! - `decode`: typed JSON decoding of fetched bytes
//! - `cache`: bounded LRU resource cache
//! - `loader`: cache-first image loading
//! - `list`: ranked list state and its derived view
//! - `models`: wire shapes of the ranking API
//! - `details`: per-item derived data

pub mod cache;
pub mod client;
pub mod decode;
pub mod details;
pub mod list;
pub mod loader;
pub mod models;
pub mod resource;

// Re-export main public API
pub use cache::{BoundedStore, CacheConfig, CacheStats, ResourceCache};
pub use client::{ClientConfig, HttpTransport, ResponseCache, ResponseCacheConfig, Transport};
pub use decode::{decode, fetch_decoded};
pub use details::{character_frequencies, MovieDetails};
pub use list::{derive_view, FetchOutcome, ListModel, PendingFetch};
pub use loader::{LoadedImage, LoaderConfig, ResourceLoader};
pub use models::{ListItem, ListPayload, RankedListSource};
pub use resource::{HttpMethod, ResourceDescriptor};
