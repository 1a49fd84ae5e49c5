//! HTTP transport for the fetch pipeline
//!
//! This module turns [`ResourceDescriptor`]s into validated response bytes.
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client and response cache configuration
//! - `http`: the reqwest-backed [`HttpTransport`]
//! - `response_cache`: bounded cache of validated responses keyed by full request
//!
//! Everything above the transport talks to the [`Transport`] trait, so an
//! in-memory implementation can stand in for the network.

use std::ops::Range;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::app::resource::ResourceDescriptor;
use crate::constants::http::DEFAULT_VALID_STATUS;
use crate::errors::FetchResult;

// Module declarations
pub mod config;
pub mod http;
pub mod response_cache;

// Re-export public types
pub use config::{ClientConfig, ResponseCacheConfig};
pub use http::HttpTransport;
pub use response_cache::{CachedResponse, RequestKey, ResponseCache};

/// Executes resource descriptors against the network
///
/// Implementations resolve each call exactly once with either the raw,
/// validated response body or a [`FetchError`](crate::errors::FetchError):
///
/// - `InvalidAddress` when the address is not a usable absolute URL, before any I/O
/// - `TransportFailure` when no response was received
/// - `BadStatus` when the status falls outside `valid_status`, whatever the body
/// - `NoData` when the status is accepted but the body is empty
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `descriptor`, accepting only statuses in `valid_status`
    async fn execute_validated(
        &self,
        descriptor: &ResourceDescriptor,
        valid_status: Range<u16>,
    ) -> FetchResult<Bytes>;

    /// Execute `descriptor`, accepting any 2xx status
    async fn execute(&self, descriptor: &ResourceDescriptor) -> FetchResult<Bytes> {
        self.execute_validated(descriptor, DEFAULT_VALID_STATUS)
            .await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute_validated(
        &self,
        descriptor: &ResourceDescriptor,
        valid_status: Range<u16>,
    ) -> FetchResult<Bytes> {
        (**self).execute_validated(descriptor, valid_status).await
    }
}
