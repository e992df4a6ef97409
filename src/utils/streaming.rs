//! Common Streaming Utilities
//!
//! SSE parsing (UTF-8 boundaries, line buffering, `data:` framing) is handled
//! by eventsource-stream; vendor specifics live in a
//! [`StreamChunkTransformer`].

use eventsource_stream::{EventStreamError, Eventsource};
use futures::stream;
use futures_util::StreamExt;
use std::sync::Arc;

use crate::error::LlmError;
use crate::transformers::StreamChunkTransformer;
use crate::transport::ByteStream;
use crate::types::{ChatStream, StreamChunk};

/// Stream factory for creating vendor streams
pub struct StreamFactory;

impl StreamFactory {
    /// Create a chat stream from an SSE body.
    ///
    /// Empty deltas are skipped. The stream ends at the vendor's end marker,
    /// at a delta flagged `finished`, or when the body ends. A decode or
    /// transport error yields exactly one failure chunk and ends the stream.
    pub fn create_eventsource_stream(
        body: ByteStream,
        converter: Arc<dyn StreamChunkTransformer>,
        model: String,
    ) -> ChatStream {
        let chunks = async_stream::stream! {
            let mut events = body.eventsource();
            while let Some(event) = events.next().await {
                let event = match event {
                    Ok(event) => event,
                    Err(e) => {
                        let error = match e {
                            EventStreamError::Transport(inner) => inner,
                            other => LlmError::StreamError(format!("SSE parsing error: {other}")),
                        };
                        tracing::warn!(provider = %converter.provider_id(), error = %error, "stream terminated");
                        yield StreamChunk::failure(Some(model.clone()), &error);
                        break;
                    }
                };

                let data = event.data.trim();
                if data.is_empty() {
                    continue;
                }
                if converter.is_end_marker(data) {
                    break;
                }

                match converter.convert_event(&event) {
                    Ok(Some(delta)) => {
                        let finished = delta.finished;
                        if !delta.is_empty() {
                            yield StreamChunk::delta(
                                delta.content.unwrap_or_default(),
                                model.clone(),
                                delta.usage,
                            );
                        }
                        if finished {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(error) => {
                        tracing::warn!(provider = %converter.provider_id(), error = %error, "stream terminated");
                        yield StreamChunk::failure(Some(model.clone()), &error);
                        break;
                    }
                }
            }
        };
        Box::pin(chunks)
    }

    /// A stream holding a single chunk
    pub fn single(chunk: StreamChunk) -> ChatStream {
        Box::pin(stream::iter(vec![chunk]))
    }

    /// A stream holding one failure chunk
    pub fn failed(model: Option<String>, error: &LlmError) -> ChatStream {
        Self::single(StreamChunk::failure(model, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StreamDelta;
    use eventsource_stream::Event;

    struct TextConverter;

    impl StreamChunkTransformer for TextConverter {
        fn provider_id(&self) -> &str {
            "test"
        }

        fn convert_event(&self, event: &Event) -> Result<Option<StreamDelta>, LlmError> {
            match event.data.as_str() {
                "bad" => Err(LlmError::ParseError("bad chunk".into())),
                "last" => Ok(Some(StreamDelta::content("!").finished(true))),
                "skip" => Ok(None),
                other => Ok(Some(StreamDelta::content(other))),
            }
        }
    }

    fn body(parts: Vec<Result<&'static str, LlmError>>) -> ByteStream {
        Box::pin(stream::iter(
            parts
                .into_iter()
                .map(|p| p.map(|s| s.as_bytes().to_vec()))
                .collect::<Vec<_>>(),
        ))
    }

    async fn collect(body: ByteStream) -> Vec<StreamChunk> {
        StreamFactory::create_eventsource_stream(body, Arc::new(TextConverter), "m".into())
            .collect()
            .await
    }

    #[tokio::test]
    async fn test_yields_deltas_until_done() {
        let chunks = collect(body(vec![
            Ok("data: Hel"),
            Ok("lo\n\ndata: skip\n\ndata: \n\n"),
            Ok("data: world\n\ndata: [DONE]\n\ndata: after\n\n"),
        ]))
        .await;
        let texts: Vec<&str> = chunks.iter().map(StreamChunk::text).collect();
        assert_eq!(texts, vec!["Hello", "world"]);
        assert!(chunks.iter().all(|c| c.success));
    }

    #[tokio::test]
    async fn test_finished_delta_ends_stream() {
        let chunks = collect(body(vec![Ok("data: a\n\ndata: last\n\ndata: b\n\n")])).await;
        let texts: Vec<&str> = chunks.iter().map(StreamChunk::text).collect();
        assert_eq!(texts, vec!["a", "!"]);
    }

    #[tokio::test]
    async fn test_conversion_error_is_terminal() {
        let chunks = collect(body(vec![Ok("data: a\n\ndata: bad\n\ndata: b\n\n")])).await;
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].success);
        assert!(!chunks[1].success);
        assert_eq!(chunks[1].error.as_deref(), Some("Parse error: bad chunk"));
    }

    #[tokio::test]
    async fn test_transport_error_is_terminal() {
        let chunks = collect(body(vec![
            Ok("data: a\n\n"),
            Err(LlmError::HttpError("connection reset".into())),
            Ok("data: b\n\n"),
        ]))
        .await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].error.as_deref(), Some("HTTP error: connection reset"));
    }

    #[tokio::test]
    async fn test_failed_stream_single_chunk() {
        let chunks: Vec<_> = StreamFactory::failed(None, &LlmError::InvalidInput("empty".into()))
            .collect()
            .await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].code.as_deref(), Some("invalid_input"));
    }
}
