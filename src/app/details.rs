//! Movie details model
//!
//! Per-item derived data shown on the details screen.

use std::collections::HashMap;

use crate::app::models::ListItem;

/// Details of a single ranked item
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetails {
    item: ListItem,
    title_frequencies: Vec<(char, usize)>,
}

impl MovieDetails {
    pub fn new(item: ListItem) -> Self {
        let title_frequencies = character_frequencies(&item.title);
        Self {
            item,
            title_frequencies,
        }
    }

    pub fn item(&self) -> &ListItem {
        &self.item
    }

    /// Character counts of the title, most frequent first
    pub fn title_frequencies(&self) -> &[(char, usize)] {
        &self.title_frequencies
    }
}

/// Count the characters of `text`
///
/// Letters are lowercased and whitespace is skipped. The result is ordered by
/// count, highest first, with ties broken by character.
pub fn character_frequencies(text: &str) -> Vec<(char, usize)> {
    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in text.chars().flat_map(char::to_lowercase) {
        if !c.is_whitespace() {
            *counts.entry(c).or_insert(0) += 1;
        }
    }

    let mut frequencies: Vec<(char, usize)> = counts.into_iter().collect();
    frequencies.sort_by(|(a_char, a_count), (b_char, b_count)| {
        b_count.cmp(a_count).then(a_char.cmp(b_char))
    });
    frequencies
}
