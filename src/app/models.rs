//! Data models for Top Movies
//!
//! Wire shapes of the ranking API and the descriptor factory for the ranked
//! list endpoint. All item fields are kept as the strings the API sends.

use serde::{Deserialize, Serialize};

use crate::app::resource::ResourceDescriptor;
use crate::constants::api;

/// One entry of the ranked movie list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    /// Stable identifier (e.g. "tt0111161")
    pub id: String,
    /// Ordinal position as sent by the API
    pub rank: String,
    pub title: String,
    pub full_title: String,
    pub year: String,
    /// Poster URL, used as the resource cache key
    #[serde(rename = "image")]
    pub image_path: String,
    pub crew: String,
    #[serde(rename = "imDbRating")]
    pub rating_value: String,
    #[serde(rename = "imDbRatingCount")]
    pub rating_count: String,
}

impl ListItem {
    /// Rank as a number, when the API sent a numeric one
    pub fn rank_number(&self) -> Option<u32> {
        self.rank.trim().parse().ok()
    }

    /// Case-insensitive substring match against the title
    ///
    /// `lowercase_query` must already be lowercased.
    pub fn title_matches(&self, lowercase_query: &str) -> bool {
        self.title.to_lowercase().contains(lowercase_query)
    }

    /// Descriptor for fetching this item's poster
    pub fn image_descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor::get(self.image_path.as_str())
    }
}

/// Response body of the ranked list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPayload {
    pub items: Vec<ListItem>,
    /// Empty on success; any other value means the server refused the request
    pub error_message: String,
}

impl ListPayload {
    /// Whether the server reported an error alongside the payload
    pub fn has_error(&self) -> bool {
        !self.error_message.is_empty()
    }
}

/// Location of the ranked list resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedListSource {
    endpoint: String,
    api_key: String,
}

impl RankedListSource {
    /// Source for an explicit endpoint
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Source for the public top-ranked movies endpoint
    pub fn top_movies(api_key: impl Into<String>) -> Self {
        Self::new(api::TOP_MOVIES_URL, api_key)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// GET descriptor with the API key appended as the last path segment
    pub fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor::get(format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.api_key
        ))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::decode::decode;

    const PAYLOAD: &str = r#"{
        "items": [
            {
                "id": "tt0133093",
                "rank": "16",
                "title": "The Matrix",
                "fullTitle": "The Matrix (1999)",
                "year": "1999",
                "image": "https://m.media-amazon.com/images/M/matrix.jpg",
                "crew": "Lana Wachowski (dir.), Keanu Reeves, Laurence Fishburne",
                "imDbRating": "8.7",
                "imDbRatingCount": "1971335"
            }
        ],
        "errorMessage": ""
    }"#;

    #[test]
    fn test_decode_wire_payload() {
        let payload: ListPayload = decode(PAYLOAD.as_bytes()).unwrap();
        assert!(!payload.has_error());
        assert_eq!(payload.items.len(), 1);

        let item = &payload.items[0];
        assert_eq!(item.full_title, "The Matrix (1999)");
        assert_eq!(
            item.image_path,
            "https://m.media-amazon.com/images/M/matrix.jpg"
        );
        assert_eq!(item.rating_value, "8.7");
        assert_eq!(item.rating_count, "1971335");
        assert_eq!(item.rank_number(), Some(16));
    }

    #[test]
    fn test_missing_field_fails_whole_payload() {
        let broken = PAYLOAD.replace(r#""imDbRatingCount": "1971335""#, r#""other": "x""#);
        tokio_test::assert_err!(decode::<ListPayload>(broken.as_bytes()));
    }

    #[test]
    fn test_error_payload() {
        let payload: ListPayload =
            decode(br#"{"items": [], "errorMessage": "Invalid API Key"}"#).unwrap();
        assert!(payload.has_error());
    }

    #[test]
    fn test_title_matches_case_insensitive() {
        let item = fixtures::item(1, "The Matrix Reloaded");
        assert!(item.title_matches("the matrix"));
        assert!(item.title_matches("reloaded"));
        assert!(!item.title_matches("revolutions"));
    }

    #[test]
    fn test_rank_is_opaque() {
        let mut item = fixtures::item(1, "x");
        item.rank = "n/a".to_string();
        assert_eq!(item.rank_number(), None);
    }

    #[test]
    fn test_source_descriptor() {
        let source = RankedListSource::new("https://api.example.com/top/", "k_123");
        assert_eq!(
            source.descriptor().address(),
            "https://api.example.com/top/k_123"
        );

        let source = RankedListSource::top_movies("secret");
        assert!(source.descriptor().address().ends_with("/Top250Movies/secret"));
    }

    #[test]
    fn test_image_descriptor_uses_path() {
        let item = fixtures::item(3, "Poster");
        assert_eq!(item.image_descriptor().address(), item.image_path);
    }
}
