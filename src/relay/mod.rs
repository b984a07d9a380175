//! Stream relay engine
//!
//! Converts a provider's raw event-stream bytes into an ordered
//! sequence of text fragments, emitted as soon as each one decodes.
//! Fragments are forwarded in extraction order, never duplicated or
//! reordered, and the outbound stream always terminates: on the end
//! sentinel, on upstream end-of-stream, or on a read error.

pub mod decoder;

use crate::models::upstream::ChatCompletionChunk;
use crate::utils::error::AppError;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, warn};

pub use decoder::{FrameDecoder, Utf8StreamDecoder, DATA_PREFIX, STREAM_END_SENTINEL};

/// Bound of the fragment channel between the relay producer and the
/// outbound connection; gives backpressure against slow clients
const RELAY_CHANNEL_CAPACITY: usize = 32;

/// Extract the text delta from one event-frame payload
///
/// Prefers the delta-style field and falls back to the full-message
/// field. Malformed JSON skips only this payload (permissive-parsing
/// policy): the failure is logged and `None` is returned, never an
/// error.
pub fn extract_text_delta(payload: &str) -> Option<String> {
    let chunk: ChatCompletionChunk = match serde_json::from_str(payload) {
        Ok(chunk) => chunk,
        Err(e) => {
            warn!("Skipping malformed stream payload: {} - data: {}", e, payload);
            return None;
        }
    };

    chunk.text_delta().filter(|text| !text.is_empty())
}

/// Relay an upstream byte stream into a stream of text fragments
///
/// A producer task reads raw bytes, runs them through the frame
/// decoder and pushes each extracted fragment into a bounded channel
/// the moment it decodes; the returned `ReceiverStream` is the
/// consumer side. Dropping the receiver (client disconnect) stops the
/// producer and releases the upstream response. If the upstream ends
/// without the sentinel the stream closes anyway.
pub fn spawn_fragment_relay<S, E>(upstream: S) -> ReceiverStream<Result<String, AppError>>
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::channel(RELAY_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let mut upstream = Box::pin(upstream);
        let mut decoder = FrameDecoder::new();

        while let Some(read) = upstream.next().await {
            let bytes = match read {
                Ok(bytes) => bytes,
                Err(e) => {
                    error!("Upstream read failed mid-stream: {}", e);
                    let _ = tx
                        .send(Err(AppError::Internal(format!(
                            "upstream read failed: {}",
                            e
                        ))))
                        .await;
                    return;
                }
            };

            for payload in decoder.feed(&bytes) {
                if let Some(fragment) = extract_text_delta(&payload) {
                    if tx.send(Ok(fragment)).await.is_err() {
                        debug!("Client disconnected, abandoning relay");
                        return;
                    }
                }
            }

            if decoder.is_finished() {
                debug!("Stream end sentinel received");
                break;
            }
        }

        // Dropping the sender closes the outbound stream, covering both
        // the sentinel and the connection-closed-without-sentinel case
    });

    ReceiverStream::new(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn byte_stream(
        chunks: Vec<&'static [u8]>,
    ) -> impl Stream<Item = Result<Bytes, Infallible>> + Send {
        tokio_stream::iter(
            chunks
                .into_iter()
                .map(|chunk| Ok(Bytes::from_static(chunk)))
                .collect::<Vec<_>>(),
        )
    }

    async fn collect_fragments<S, E>(upstream: S) -> Vec<String>
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        let mut relay = spawn_fragment_relay(upstream);
        let mut fragments = Vec::new();
        while let Some(item) = relay.next().await {
            fragments.push(item.expect("unexpected relay error"));
        }
        fragments
    }

    #[test]
    fn test_extract_delta_content() {
        let payload = r#"{"choices":[{"delta":{"content":"Hel"}}]}"#;
        assert_eq!(extract_text_delta(payload), Some("Hel".to_string()));
    }

    #[test]
    fn test_extract_message_fallback() {
        let payload = r#"{"choices":[{"message":{"content":"whole answer"}}]}"#;
        assert_eq!(extract_text_delta(payload), Some("whole answer".to_string()));
    }

    #[test]
    fn test_extract_malformed_payload_skipped() {
        assert_eq!(extract_text_delta("{not json"), None);
        assert_eq!(extract_text_delta(""), None);
    }

    #[test]
    fn test_extract_empty_text_skipped() {
        let payload = r#"{"choices":[{"delta":{"content":""}}]}"#;
        assert_eq!(extract_text_delta(payload), None);
    }

    #[tokio::test]
    async fn test_relay_emits_fragments_in_order() {
        let upstream = byte_stream(vec![
            b"data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            b"data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
            b"data: [DONE]\n\n",
        ]);

        let fragments = collect_fragments(upstream).await;
        assert_eq!(fragments, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn test_relay_malformed_frame_does_not_suppress_neighbors() {
        let upstream = byte_stream(vec![
            b"data: {\"choices\":[{\"delta\":{\"content\":\"before\"}}]}\n\n",
            b"data: {broken json\n\n",
            b"data: {\"choices\":[{\"delta\":{\"content\":\"after\"}}]}\n\n",
            b"data: [DONE]\n\n",
        ]);

        let fragments = collect_fragments(upstream).await;
        assert_eq!(fragments, vec!["before", "after"]);
    }

    #[tokio::test]
    async fn test_relay_stops_at_sentinel_with_buffered_input() {
        // Everything after the sentinel frame, even in the same read,
        // must be discarded
        let upstream = byte_stream(vec![
            b"data: {\"choices\":[{\"delta\":{\"content\":\"only\"}}]}\n\ndata: [DONE]\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"ghost\"}}]}\n\n",
        ]);

        let fragments = collect_fragments(upstream).await;
        assert_eq!(fragments, vec!["only"]);
    }

    #[tokio::test]
    async fn test_relay_closes_without_sentinel() {
        let upstream = byte_stream(vec![
            b"data: {\"choices\":[{\"delta\":{\"content\":\"tail\"}}]}\n\n",
        ]);

        // Stream must terminate even though no sentinel was seen
        let fragments = collect_fragments(upstream).await;
        assert_eq!(fragments, vec!["tail"]);
    }

    #[tokio::test]
    async fn test_relay_split_mid_character_and_mid_delimiter() {
        let body = "data: {\"choices\":[{\"delta\":{\"content\":\"héllo\"}}]}\n\ndata: [DONE]\n\n";
        let bytes = body.as_bytes();
        // Split inside the two-byte 'é' and inside the frame delimiter
        let mid_char = body.find('é').unwrap() + 1;
        let mid_delim = body.find("\n\n").unwrap() + 1;

        let chunks: Vec<Result<Bytes, Infallible>> = vec![
            Ok(Bytes::copy_from_slice(&bytes[..mid_char])),
            Ok(Bytes::copy_from_slice(&bytes[mid_char..mid_delim])),
            Ok(Bytes::copy_from_slice(&bytes[mid_delim..])),
        ];

        let fragments = collect_fragments(tokio_stream::iter(chunks)).await;
        assert_eq!(fragments, vec!["héllo"]);
    }

    #[tokio::test]
    async fn test_relay_surfaces_read_error_and_terminates() {
        #[derive(Debug, thiserror::Error)]
        #[error("connection reset")]
        struct FakeReadError;

        let chunks: Vec<Result<Bytes, FakeReadError>> = vec![
            Ok(Bytes::from_static(
                b"data: {\"choices\":[{\"delta\":{\"content\":\"part\"}}]}\n\n",
            )),
            Err(FakeReadError),
        ];

        let mut relay = spawn_fragment_relay(tokio_stream::iter(chunks));

        assert_eq!(relay.next().await.unwrap().unwrap(), "part");
        assert!(relay.next().await.unwrap().is_err());
        assert!(relay.next().await.is_none());
    }
}
