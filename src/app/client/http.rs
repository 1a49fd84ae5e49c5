//! Core HTTP transport
//!
//! [`HttpTransport`] executes a [`ResourceDescriptor`] with reqwest, applies
//! status validation and consults the optional response cache.

use std::ops::Range;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::app::resource::ResourceDescriptor;
use crate::errors::{ConfigResult, FetchError, FetchResult};

use super::config::{ClientConfig, ResponseCacheConfig};
use super::response_cache::{CachedResponse, RequestKey, ResponseCache};
use super::Transport;

/// reqwest-backed transport
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    default_headers: HeaderMap,
    response_cache: Option<ResponseCache>,
}

impl HttpTransport {
    /// Creates a transport without a response cache
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the HTTP client cannot be built or a default
    /// header is invalid
    pub fn new(config: &ClientConfig) -> ConfigResult<Self> {
        let client = config.build_http_client()?;
        let default_headers = config.default_header_map()?;
        Ok(Self::from_parts(client, default_headers))
    }

    /// Creates a transport with a response cache sized by `cache_config`
    ///
    /// A disabled cache configuration yields a transport without one.
    pub fn with_config(
        config: &ClientConfig,
        cache_config: &ResponseCacheConfig,
    ) -> ConfigResult<Self> {
        let transport = Self::new(config)?;
        if cache_config.enabled {
            Ok(transport.with_response_cache(ResponseCache::new(cache_config)))
        } else {
            Ok(transport)
        }
    }

    /// Creates a transport from an existing client
    pub fn from_parts(client: Client, default_headers: HeaderMap) -> Self {
        Self {
            client,
            default_headers,
            response_cache: None,
        }
    }

    /// Attach a response cache
    pub fn with_response_cache(mut self, cache: ResponseCache) -> Self {
        self.response_cache = Some(cache);
        self
    }

    pub fn response_cache(&self) -> Option<&ResponseCache> {
        self.response_cache.as_ref()
    }

    /// Parse the descriptor address into an absolute http(s) URL
    pub fn parse_address(descriptor: &ResourceDescriptor) -> FetchResult<Url> {
        let invalid = || FetchError::InvalidAddress {
            address: descriptor.address().to_string(),
        };

        let url = Url::parse(descriptor.address()).map_err(|_| invalid())?;
        match url.scheme() {
            "http" | "https" if url.has_host() => Ok(url),
            _ => Err(invalid()),
        }
    }

    /// Default headers overlaid with the descriptor's headers
    pub fn merge_headers(&self, descriptor: &ResourceDescriptor) -> HeaderMap {
        let mut merged = self.default_headers.clone();
        for (name, value) in descriptor.headers() {
            merged.insert(name.clone(), value.clone());
        }
        merged
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute_validated(
        &self,
        descriptor: &ResourceDescriptor,
        valid_status: Range<u16>,
    ) -> FetchResult<Bytes> {
        let url = Self::parse_address(descriptor)?;
        let headers = self.merge_headers(descriptor);

        let cache_key = self.response_cache.as_ref().map(|_| {
            RequestKey::new(descriptor.method(), &url, &headers, descriptor.body())
        });
        if let (Some(cache), Some(key)) = (&self.response_cache, &cache_key) {
            if let Some(cached) = cache.lookup(key) {
                if !valid_status.contains(&cached.status) {
                    debug!("Rejected cached status {} for {}", cached.status, descriptor);
                    return Err(FetchError::BadStatus {
                        status: cached.status,
                    });
                }
                debug!("Response cache hit: {}", descriptor);
                return Ok(cached.body);
            }
        }

        debug!("Sending request: {}", descriptor);
        let mut request = self
            .client
            .request(descriptor.method().into(), url)
            .headers(headers);
        if let Some(body) = descriptor.body() {
            request = request.body(body.clone());
        }

        let response = request.send().await.map_err(|e| {
            warn!("Request failed: {}: {}", descriptor, e);
            FetchError::transport(e)
        })?;

        let status = response.status().as_u16();
        if !valid_status.contains(&status) {
            debug!("Rejected status {} for {}", status, descriptor);
            return Err(FetchError::BadStatus { status });
        }

        let response_headers = response.headers().clone();
        let body = response.bytes().await.map_err(FetchError::transport)?;
        if body.is_empty() {
            return Err(FetchError::NoData);
        }

        if let (Some(cache), Some(key)) = (&self.response_cache, cache_key) {
            cache.store(key, CachedResponse::new(status, body.clone()), &response_headers);
        }

        debug!("Fetched {} bytes: {}", body.len(), descriptor);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::resource::HttpMethod;
    use reqwest::header::{HeaderName, HeaderValue, ACCEPT};

    fn transport_with_defaults() -> HttpTransport {
        let mut config = ClientConfig::default();
        config
            .default_headers
            .insert("Accept".to_string(), "application/json".to_string());
        config
            .default_headers
            .insert("X-Client".to_string(), "top-movies".to_string());
        HttpTransport::new(&config).unwrap()
    }

    #[test]
    fn test_parse_address_accepts_http_urls() {
        let descriptor = ResourceDescriptor::get("https://imdb-api.com/en/API/Top250Movies/k");
        let url = HttpTransport::parse_address(&descriptor).unwrap();
        assert_eq!(url.host_str(), Some("imdb-api.com"));
    }

    #[test]
    fn test_parse_address_rejects_garbage() {
        for address in ["", "not a url", "/relative/path", "mailto:someone@example.com"] {
            let descriptor = ResourceDescriptor::get(address);
            match HttpTransport::parse_address(&descriptor) {
                Err(FetchError::InvalidAddress { address: reported }) => {
                    assert_eq!(reported, address)
                }
                other => panic!("Expected InvalidAddress for {:?}, got {:?}", address, other),
            }
        }
    }

    #[tokio::test]
    async fn test_invalid_address_short_circuits() {
        let transport = transport_with_defaults();
        let result = transport
            .execute(&ResourceDescriptor::new(HttpMethod::Delete, "::::"))
            .await;
        assert!(matches!(result, Err(FetchError::InvalidAddress { .. })));
    }

    #[test]
    fn test_descriptor_headers_override_defaults() {
        let transport = transport_with_defaults();
        let descriptor = ResourceDescriptor::get("https://example.com/poster.jpg")
            .with_header(ACCEPT, HeaderValue::from_static("image/*"))
            .with_header(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("42"),
            );

        let merged = transport.merge_headers(&descriptor);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[ACCEPT], "image/*");
        assert_eq!(merged["x-client"], "top-movies");
        assert_eq!(merged["x-request-id"], "42");
    }

    #[test]
    fn test_with_config_respects_disabled_cache() {
        let config = ClientConfig::default();
        let transport =
            HttpTransport::with_config(&config, &ResponseCacheConfig::disabled()).unwrap();
        assert!(transport.response_cache().is_none());

        let transport =
            HttpTransport::with_config(&config, &ResponseCacheConfig::default()).unwrap();
        assert!(transport.response_cache().is_some());
    }
}
