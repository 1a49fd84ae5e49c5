//! Typed decoding of transport output
//!
//! Decoding is generic over the target type: every payload goes through
//! [`decode`], and every decode fault becomes `FetchError::DecodeFailure`.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::app::client::Transport;
use crate::app::resource::ResourceDescriptor;
use crate::errors::{FetchError, FetchResult};

/// Decode a JSON payload into `T`
///
/// Either the whole value is produced or the call fails; a partially
/// populated `T` is never returned.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> FetchResult<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        debug!(
            "Failed to decode {} bytes as {}: {}",
            bytes.len(),
            std::any::type_name::<T>(),
            e
        );
        FetchError::decode(e)
    })
}

/// Execute `descriptor` and decode the body into `T`
///
/// Transport errors are forwarded unchanged; only a failure to decode a
/// successfully fetched body is reported as `DecodeFailure`.
pub async fn fetch_decoded<T, Tr>(transport: &Tr, descriptor: &ResourceDescriptor) -> FetchResult<T>
where
    T: DeserializeOwned,
    Tr: Transport + ?Sized,
{
    let bytes = transport.execute(descriptor).await?;
    decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::ListPayload;
    use async_trait::async_trait;
    use bytes::Bytes;
    use serde::Deserialize;
    use std::ops::Range;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pair {
        left: String,
        right: u32,
    }

    struct StaticTransport(FetchResult<Bytes>);

    #[async_trait]
    impl Transport for StaticTransport {
        async fn execute_validated(
            &self,
            _descriptor: &ResourceDescriptor,
            _valid_status: Range<u16>,
        ) -> FetchResult<Bytes> {
            self.0.clone()
        }
    }

    #[test]
    fn test_decode_valid_payload() {
        let pair: Pair = decode(br#"{"left":"a","right":7}"#).unwrap();
        assert_eq!(
            pair,
            Pair {
                left: "a".to_string(),
                right: 7
            }
        );
    }

    #[test]
    fn test_malformed_json_is_decode_failure() {
        let result = decode::<ListPayload>(br#"{"items": [ {"id": "tt1""#);
        assert!(matches!(result, Err(FetchError::DecodeFailure(_))));
    }

    #[test]
    fn test_schema_mismatch_is_decode_failure() {
        // Valid JSON, wrong shape
        let result = decode::<Pair>(br#"{"left":"a","right":"seven"}"#);
        assert!(matches!(result, Err(FetchError::DecodeFailure(_))));

        let result = decode::<Pair>(br#"{"left":"a"}"#);
        assert!(matches!(result, Err(FetchError::DecodeFailure(_))));
    }

    #[tokio::test]
    async fn test_fetch_decoded_forwards_transport_error() {
        let transport = StaticTransport(Err(FetchError::BadStatus { status: 500 }));
        let result: FetchResult<Pair> =
            fetch_decoded(&transport, &ResourceDescriptor::get("https://example.com")).await;
        assert!(matches!(result, Err(FetchError::BadStatus { status: 500 })));
    }

    #[tokio::test]
    async fn test_fetch_decoded_success() {
        let transport = StaticTransport(Ok(Bytes::from_static(br#"{"left":"x","right":1}"#)));
        let pair: Pair = fetch_decoded(&transport, &ResourceDescriptor::get("https://example.com"))
            .await
            .unwrap();
        assert_eq!(pair.right, 1);
    }
}
