//! Ranked list model
//!
//! [`ListModel`] owns the fetched ranking and the search-filtered view over
//! it. It has exactly one owner: network work runs on the runtime, and its
//! result is applied back through `&mut self`, so the model itself needs no
//! locking.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use top_movies::app::{ClientConfig, HttpTransport, ListModel, RankedListSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(HttpTransport::new(&ClientConfig::default())?);
//! let mut model = ListModel::new(transport, RankedListSource::top_movies("k_abc"));
//!
//! model.observe_changes(|view| println!("{} items visible", view.len()));
//! model.fetch().await;
//! model.set_search_query("godfather");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::client::Transport;
use crate::app::decode::fetch_decoded;
use crate::app::models::{ListItem, ListPayload, RankedListSource};
use crate::constants::list::DEFAULT_PREVIEW_LIMIT;
use crate::errors::{FetchError, FetchResult};

pub mod view;

pub use view::derive_view;

/// Callback invoked with the derived view whenever it is recomputed
pub type ListObserver = Box<dyn FnMut(&[ListItem]) + Send>;

/// How a completed fetch changed the model
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Items were replaced with the server's list
    Loaded { count: usize },
    /// The server answered with an error message; the list was cleared
    ServerError { message: String },
    /// The request or decode failed; the list was cleared
    Failed(FetchError),
}

impl FetchOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchOutcome::Loaded { .. })
    }
}

/// A list fetch running on the runtime
///
/// Resolves exactly once with the decoded payload or the fetch error. A
/// panicking fetch task is reported as a transport failure.
#[derive(Debug)]
pub struct PendingFetch {
    handle: JoinHandle<FetchResult<ListPayload>>,
}

impl Future for PendingFetch {
    type Output = FetchResult<ListPayload>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle)
            .poll(cx)
            .map(|joined| joined.unwrap_or_else(|e| Err(FetchError::transport(e))))
    }
}

/// Fetched ranking plus its search-filtered view
pub struct ListModel<T: Transport + ?Sized> {
    transport: Arc<T>,
    source: RankedListSource,
    preview_limit: usize,
    all_items: Vec<ListItem>,
    search_query: String,
    derived_view: Vec<ListItem>,
    observer: Option<ListObserver>,
}

impl<T: Transport + ?Sized + 'static> ListModel<T> {
    /// Create an empty model for `source`
    pub fn new(transport: Arc<T>, source: RankedListSource) -> Self {
        Self {
            transport,
            source,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            all_items: Vec::new(),
            search_query: String::new(),
            derived_view: Vec::new(),
            observer: None,
        }
    }

    /// Change how many items are shown without a search query
    pub fn with_preview_limit(mut self, preview_limit: usize) -> Self {
        self.preview_limit = preview_limit;
        self.recompute();
        self
    }

    /// Register the observer, replacing any previous one
    pub fn observe_changes<F>(&mut self, observer: F)
    where
        F: FnMut(&[ListItem]) + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    /// Start fetching the ranked list without waiting for it
    ///
    /// Must be called from within a Tokio runtime. Hand the result of the
    /// returned future to [`complete_fetch`](Self::complete_fetch) from the
    /// owning task.
    pub fn begin_fetch(&self) -> PendingFetch {
        let transport = Arc::clone(&self.transport);
        let descriptor = self.source.descriptor();
        debug!("Starting ranked list fetch from {}", self.source.endpoint());

        let handle =
            tokio::spawn(
                async move { fetch_decoded::<ListPayload, T>(&*transport, &descriptor).await },
            );
        PendingFetch { handle }
    }

    /// Apply a finished fetch and notify the observer once
    ///
    /// A payload with an empty error message replaces the items. A server
    /// error message or any fetch error clears them.
    pub fn complete_fetch(&mut self, result: FetchResult<ListPayload>) -> FetchOutcome {
        let outcome = match result {
            Ok(payload) if !payload.has_error() => {
                let count = payload.items.len();
                self.all_items = payload.items;
                info!("Loaded {} ranked items", count);
                FetchOutcome::Loaded { count }
            }
            Ok(payload) => {
                warn!("Ranking service reported an error: {}", payload.error_message);
                self.all_items.clear();
                FetchOutcome::ServerError {
                    message: payload.error_message,
                }
            }
            Err(e) => {
                warn!("Ranked list fetch failed ({}): {}", e.kind(), e);
                self.all_items.clear();
                FetchOutcome::Failed(e)
            }
        };

        self.recompute();
        self.notify();
        outcome
    }

    /// Fetch the ranked list and apply it
    ///
    /// The network work runs on a spawned task; the state change happens
    /// here, on the caller's task.
    pub async fn fetch(&mut self) -> FetchOutcome {
        let result = self.begin_fetch().await;
        self.complete_fetch(result)
    }

    /// Update the search query, recompute the view and notify the observer
    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.search_query = text.into();
        debug!("Search query set to {:?}", self.search_query);
        self.recompute();
        self.notify();
    }

    /// Items currently visible
    pub fn derived_view(&self) -> &[ListItem] {
        &self.derived_view
    }

    /// Every item from the last successful fetch
    pub fn all_items(&self) -> &[ListItem] {
        &self.all_items
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Look up an item by id among all fetched items
    pub fn find(&self, id: &str) -> Option<&ListItem> {
        self.all_items.iter().find(|item| item.id == id)
    }

    fn recompute(&mut self) {
        self.derived_view = derive_view(&self.all_items, &self.search_query, self.preview_limit);
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&self.derived_view);
        }
    }
}

impl<T: Transport + ?Sized> fmt::Debug for ListModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListModel")
            .field("source", &self.source)
            .field("preview_limit", &self.preview_limit)
            .field("all_items", &self.all_items.len())
            .field("search_query", &self.search_query)
            .field("derived_view", &self.derived_view.len())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
