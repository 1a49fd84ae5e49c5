//! Resource descriptors
//!
//! A [`ResourceDescriptor`] is an immutable description of one fetchable
//! network resource. It doubles as the request handed to a transport and,
//! through its address, as the key for the image resource cache.

use std::fmt;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

/// HTTP methods supported by the fetch pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Wire representation of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Description of a single fetchable resource
///
/// Fields are private; a descriptor is built once through the constructors
/// and consuming `with_*` methods and never changes afterwards. Header names
/// are case-insensitive and setting a header twice keeps the last value.
///
/// The address is stored as given. Whether it is a usable URL is decided by
/// the transport, which reports [`FetchError::InvalidAddress`] otherwise.
///
/// [`FetchError::InvalidAddress`]: crate::errors::FetchError::InvalidAddress
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDescriptor {
    method: HttpMethod,
    address: String,
    body: Option<Bytes>,
    headers: HeaderMap,
}

impl ResourceDescriptor {
    /// Create a descriptor with an explicit method
    pub fn new(method: HttpMethod, address: impl Into<String>) -> Self {
        Self {
            method,
            address: address.into(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    /// Create a GET descriptor
    pub fn get(address: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, address)
    }

    /// Create a POST descriptor carrying a body
    pub fn post(address: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self::new(HttpMethod::Post, address).with_body(body)
    }

    /// Attach a request body
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a header, replacing any earlier value with the same name
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set every header from `headers`, later entries winning over earlier ones
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        for (name, value) in headers.iter() {
            self.headers.insert(name.clone(), value.clone());
        }
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// The raw address, also used as the resource cache key
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.address)
    }
}
