//! Cache configuration types and defaults

use serde::{Deserialize, Serialize};

use crate::constants::cache;

/// Configuration for an in-memory resource cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries kept before the least recently used is evicted
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: cache::DEFAULT_IMAGE_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Create a configuration holding at most `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }
}
