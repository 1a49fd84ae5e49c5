//! Transport-level response cache
//!
//! Keeps validated responses keyed by the full request identity, so
//! repeating an identical request skips the network. It is independent of
//! the image resource cache: different key, different bound.
//!
//! Entries remember their status code. A hit is only served when that status
//! is also accepted by the caller asking now, so a response stored under a
//! lenient range never hides a `BadStatus` from a stricter caller.

use bytes::Bytes;
use reqwest::header::{HeaderMap, CACHE_CONTROL};
use tracing::{debug, trace};
use url::Url;

use crate::app::cache::{BoundedStore, CacheStats};
use crate::app::resource::HttpMethod;

use super::config::ResponseCacheConfig;

/// Full identity of an outgoing request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    method: HttpMethod,
    url: String,
    headers: Vec<(String, Vec<u8>)>,
    body: Option<Bytes>,
}

impl RequestKey {
    /// Build a key from the request exactly as it will be sent
    pub fn new(method: HttpMethod, url: &Url, headers: &HeaderMap, body: Option<&Bytes>) -> Self {
        let mut headers: Vec<(String, Vec<u8>)> = headers
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), value.as_bytes().to_vec()))
            .collect();
        headers.sort();

        Self {
            method,
            url: url.as_str().to_string(),
            headers,
            body: body.cloned(),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// A stored response: the status it was validated with and its body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    pub body: Bytes,
}

impl CachedResponse {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self { status, body }
    }
}

/// Bounded cache of validated responses
#[derive(Debug)]
pub struct ResponseCache {
    store: BoundedStore<RequestKey, CachedResponse>,
    max_entry_bytes: usize,
}

impl ResponseCache {
    /// Create a response cache from configuration
    pub fn new(config: &ResponseCacheConfig) -> Self {
        debug!(
            "Creating response cache with capacity {} (max entry {} bytes)",
            config.capacity, config.max_entry_bytes
        );
        Self {
            store: BoundedStore::new(config.capacity),
            max_entry_bytes: config.max_entry_bytes,
        }
    }

    /// Only safe, idempotent requests are answered from the cache
    pub fn accepts(method: HttpMethod) -> bool {
        method == HttpMethod::Get
    }

    /// Return the cached response for `key`, if any
    ///
    /// The caller must still check the status against its own valid range.
    pub fn lookup(&self, key: &RequestKey) -> Option<CachedResponse> {
        if !Self::accepts(key.method()) {
            return None;
        }
        let cached = self.store.get(key);
        trace!(url = key.url(), hit = cached.is_some(), "response cache lookup");
        cached
    }

    /// Store a validated response, returning whether it was kept
    ///
    /// Responses are skipped when the method is not cacheable, the body is
    /// larger than the per-entry limit, or the server sent
    /// `Cache-Control: no-store`.
    pub fn store(
        &self,
        key: RequestKey,
        response: CachedResponse,
        response_headers: &HeaderMap,
    ) -> bool {
        if !Self::accepts(key.method()) {
            return false;
        }
        if response.body.len() > self.max_entry_bytes {
            debug!(
                "Not caching {} byte response for {} (limit {})",
                response.body.len(),
                key.url(),
                self.max_entry_bytes
            );
            return false;
        }
        if forbids_storage(response_headers) {
            debug!("Not caching response for {}: no-store", key.url());
            return false;
        }

        self.store.put(key, response);
        true
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }
}

/// Whether any Cache-Control header carries a `no-store` directive
fn forbids_storage(headers: &HeaderMap) -> bool {
    headers
        .get_all(CACHE_CONTROL)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|directive| directive.trim().eq_ignore_ascii_case("no-store"))
}
