//! Derived list views
//!
//! The visible list is always computed from the full item list and the
//! current query, never edited in place.

use crate::app::models::ListItem;

/// Compute the visible items for `query`
///
/// - empty query: the first `preview_limit` items (all of them if fewer)
/// - otherwise: every item whose title contains `query`, ignoring case,
///   in original order and without the preview cap
pub fn derive_view(items: &[ListItem], query: &str, preview_limit: usize) -> Vec<ListItem> {
    if query.is_empty() {
        return items.iter().take(preview_limit).cloned().collect();
    }

    let lowercase_query = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.title_matches(&lowercase_query))
        .cloned()
        .collect()
}
