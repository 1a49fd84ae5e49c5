//! In-memory resource caching
//!
//! This module provides the process-wide resource cache used by the image
//! loader, along with the bounded store it is built on.
//!
//! # Key Features
//!
//! - **Bounded**: least recently used entries are evicted once capacity is reached
//! - **Thread-safe**: concurrent `get`/`put` calls never race on internal state
//! - **Non-authoritative**: a miss only means "fetch again", never an error
//! - **Injected**: no global instance; each composition owns its cache
//!
//! # Module Organization
//!
//! - [`config`] - Configuration types and defaults
//! - [`store`] - Bounded LRU store and the address-keyed resource cache
//! - [`stats`] - Hit/miss/eviction counters
//!
//! # Examples
//!
//! ```rust
//! use bytes::Bytes;
//! use top_movies::app::cache::{CacheConfig, ResourceCache};
//!
//! let cache: ResourceCache = ResourceCache::new(&CacheConfig::with_capacity(2));
//! cache.put("https://example.com/poster.jpg", Bytes::from_static(b"jpeg"));
//!
//! assert!(cache.get("https://example.com/poster.jpg").is_some());
//! assert!(cache.get("https://example.com/other.jpg").is_none());
//! ```

pub mod config;
pub mod stats;
pub mod store;

// Re-export main public API
pub use config::CacheConfig;
pub use stats::CacheStats;
pub use store::{BoundedStore, ResourceCache};
