//! Cache-first image loading
//!
//! [`ResourceLoader`] serves images by descriptor: a cached image is returned
//! without touching the network; otherwise the transport fetches the bytes,
//! they are decoded as an image, and only a successfully decoded image is
//! cached under the descriptor's address.
//!
//! Two concurrent loads of the same uncached address normally both reach the
//! network. With [`LoaderConfig::coalesce_in_flight`] they share one request.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt, Shared};
use image::{GenericImageView, ImageFormat};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::app::cache::ResourceCache;
use crate::app::client::Transport;
use crate::app::resource::ResourceDescriptor;
use crate::errors::{FetchError, FetchResult};

/// A fetched payload that decodes as an image
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    bytes: Bytes,
    format: ImageFormat,
    width: u32,
    height: u32,
}

impl LoadedImage {
    /// Decode `bytes` fully to make sure they form an image
    ///
    /// # Errors
    ///
    /// Returns `FetchError::DecodeFailure` when the format is unknown or the
    /// data does not decode.
    pub fn decode(bytes: Bytes) -> FetchResult<Self> {
        let format = image::guess_format(&bytes).map_err(FetchError::decode)?;
        let (width, height) = image::load_from_memory_with_format(&bytes, format)
            .map_err(FetchError::decode)?
            .dimensions();

        Ok(Self {
            width,
            height,
            bytes,
            format,
        })
    }

    /// Encoded image bytes as received
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Loader behaviour switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Let concurrent loads of the same uncached address share one request
    pub coalesce_in_flight: bool,
}

type SharedLoad = Shared<BoxFuture<'static, FetchResult<LoadedImage>>>;
type InFlightMap = HashMap<String, InFlight>;

/// A coalesced load and the number of callers awaiting it
struct InFlight {
    load: SharedLoad,
    waiters: usize,
}

/// Releases one waiter's claim on an in-flight entry when dropped
///
/// The entry goes away with its last waiter, whether that waiter finished or
/// was cancelled.
struct InFlightWaiter<'a> {
    in_flight: &'a Mutex<InFlightMap>,
    key: &'a str,
    load: SharedLoad,
}

impl Drop for InFlightWaiter<'_> {
    fn drop(&mut self) {
        let mut in_flight = lock(self.in_flight);
        let Some(entry) = in_flight.get_mut(self.key) else {
            return;
        };
        if !entry.load.ptr_eq(&self.load) {
            return;
        }
        entry.waiters = entry.waiters.saturating_sub(1);
        if entry.waiters == 0 {
            trace!("Released in-flight load: {}", self.key);
            in_flight.remove(self.key);
        }
    }
}

fn lock(in_flight: &Mutex<InFlightMap>) -> MutexGuard<'_, InFlightMap> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cache-first image loader over a transport
pub struct ResourceLoader<T: Transport + ?Sized> {
    transport: Arc<T>,
    cache: Arc<ResourceCache<LoadedImage>>,
    config: LoaderConfig,
    in_flight: Mutex<InFlightMap>,
}

impl<T: Transport + ?Sized + 'static> ResourceLoader<T> {
    /// Create a loader over an explicitly provided cache
    pub fn new(transport: Arc<T>, cache: Arc<ResourceCache<LoadedImage>>) -> Self {
        Self::with_config(transport, cache, LoaderConfig::default())
    }

    pub fn with_config(
        transport: Arc<T>,
        cache: Arc<ResourceCache<LoadedImage>>,
        config: LoaderConfig,
    ) -> Self {
        Self {
            transport,
            cache,
            config,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn cache(&self) -> &Arc<ResourceCache<LoadedImage>> {
        &self.cache
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load the image described by `descriptor`
    ///
    /// On a cache hit the transport is never called. Failures leave the
    /// cache untouched; callers should treat them as "no image available".
    pub async fn load_image(&self, descriptor: &ResourceDescriptor) -> FetchResult<LoadedImage> {
        let key = descriptor.address();
        if let Some(image) = self.cache.get(key) {
            debug!("Image cache hit: {}", key);
            return Ok(image);
        }
        debug!("Image cache miss: {}", key);

        if !self.config.coalesce_in_flight {
            return fetch_and_store(
                Arc::clone(&self.transport),
                Arc::clone(&self.cache),
                descriptor.clone(),
            )
            .await;
        }

        let load = {
            let mut in_flight = self.lock_in_flight();
            match in_flight.get_mut(key) {
                Some(existing) => {
                    trace!("Joining in-flight load: {}", key);
                    existing.waiters += 1;
                    existing.load.clone()
                }
                None => {
                    let load = fetch_and_store(
                        Arc::clone(&self.transport),
                        Arc::clone(&self.cache),
                        descriptor.clone(),
                    )
                    .boxed()
                    .shared();
                    in_flight.insert(
                        key.to_string(),
                        InFlight {
                            load: load.clone(),
                            waiters: 1,
                        },
                    );
                    load
                }
            }
        };

        let _waiter = InFlightWaiter {
            in_flight: &self.in_flight,
            key,
            load: load.clone(),
        };
        load.await
    }

    /// Load an image in the background and hand the result to `on_complete`
    ///
    /// `on_complete` runs exactly once, on a runtime worker. Must be called
    /// from within a Tokio runtime.
    pub fn spawn_load<F>(self: &Arc<Self>, descriptor: ResourceDescriptor, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(FetchResult<LoadedImage>) + Send + 'static,
    {
        let loader = Arc::clone(self);
        tokio::spawn(async move {
            let result = loader.load_image(&descriptor).await;
            on_complete(result);
        })
    }

    /// Number of distinct addresses currently being fetched through coalescing
    pub fn in_flight(&self) -> usize {
        self.lock_in_flight().len()
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, InFlightMap> {
        lock(&self.in_flight)
    }
}

impl<T: Transport + ?Sized> fmt::Debug for ResourceLoader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLoader")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Fetch, decode on a blocking thread, and cache on success
async fn fetch_and_store<T: Transport + ?Sized>(
    transport: Arc<T>,
    cache: Arc<ResourceCache<LoadedImage>>,
    descriptor: ResourceDescriptor,
) -> FetchResult<LoadedImage> {
    let bytes = transport.execute(&descriptor).await.map_err(|e| {
        warn!("Image fetch failed for {}: {}", descriptor.address(), e);
        e
    })?;

    let image = tokio::task::spawn_blocking(move || LoadedImage::decode(bytes))
        .await
        .map_err(FetchError::decode)?
        .map_err(|e| {
            warn!("Fetched data for {} is not an image: {}", descriptor.address(), e);
            e
        })?;

    cache.put(descriptor.address(), image.clone());
    debug!(
        "Cached {:?} image {}x{} for {}",
        image.format(),
        image.width(),
        image.height(),
        descriptor.address()
    );
    Ok(image)
}
