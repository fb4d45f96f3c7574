//! NDJSON streaming support for the Ollama Chat API.
//!
//! Parses the newline-delimited JSON stream produced by Ollama and maps each
//! line to [`ChatEvent`]s, buffering partial lines across byte chunks.
//! Cancellation is observed between chunks: once the abort token fires, the
//! sequence ends and dropping the response body closes the connection.

use askpane_types::{BackendError, ChatEvent, ChatStream};
use futures::{Stream, StreamExt};
use reqwest::Response;
use tokio_util::sync::CancellationToken;

use crate::types::OllamaChunk;

/// Wrap an HTTP response body into a [`ChatStream`].
///
/// `cancel` is the token the coordinator passed into the chat call; it is
/// shared with the returned handle so both `cancel.cancel()` and
/// [`ChatStream::abort`] reach the same parse loop.
pub(crate) fn stream_chat(response: Response, cancel: CancellationToken) -> ChatStream {
    let events = parse_ndjson_stream(response.bytes_stream(), cancel.clone());
    ChatStream::new(events, cancel)
}

/// Parse a raw byte stream into [`ChatEvent`]s from NDJSON.
///
/// The stream completes when the final `done: true` line arrives, when the
/// underlying byte stream ends, when the abort token fires, or after the
/// first unrecoverable error.
fn parse_ndjson_stream(
    byte_stream: impl Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
    abort: CancellationToken,
) -> impl Stream<Item = ChatEvent> + Send + 'static {
    async_stream::stream! {
        let mut lines = LineBuffer::new();
        let mut byte_stream = std::pin::pin!(byte_stream);

        loop {
            let chunk_result = tokio::select! {
                biased;
                _ = abort.cancelled() => return,
                chunk = byte_stream.next() => match chunk {
                    Some(result) => result,
                    None => break,
                },
            };

            let chunk = match chunk_result {
                Ok(bytes) => bytes,
                Err(e) => {
                    yield ChatEvent::Error(BackendError::Stream(format!(
                        "stream read error: {e}"
                    )));
                    return;
                }
            };

            let chunk_str = match std::str::from_utf8(&chunk) {
                Ok(s) => s,
                Err(e) => {
                    yield ChatEvent::Error(BackendError::Stream(format!(
                        "UTF-8 decode error: {e}"
                    )));
                    return;
                }
            };

            for line in lines.push(chunk_str) {
                for event in parse_line(&line) {
                    let done = matches!(event, ChatEvent::Done { .. });
                    let failed = matches!(event, ChatEvent::Error(_));
                    yield event;
                    if done || failed {
                        return;
                    }
                }
            }
        }

        // The body can end without a trailing newline.
        if let Some(line) = lines.flush() {
            for event in parse_line(&line) {
                yield event;
            }
        }
    }
}

/// Map one complete NDJSON line to its events.
///
/// A line can carry both a text fragment and the final `done` marker, so
/// this returns up to two events. Blank content produces no fragment.
fn parse_line(line: &str) -> Vec<ChatEvent> {
    let chunk: OllamaChunk = match serde_json::from_str(line) {
        Ok(c) => c,
        Err(e) => {
            return vec![ChatEvent::Error(BackendError::Stream(format!(
                "JSON parse error in NDJSON: {e}"
            )))];
        }
    };

    let mut events = Vec::new();

    if let Some(message) = &chunk.message {
        if !message.content.is_empty() {
            events.push(ChatEvent::Fragment(message.content.clone()));
        }
    }

    if chunk.done {
        events.push(ChatEvent::Done {
            reason: chunk.done_reason,
        });
    }

    events
}

/// Buffers partial NDJSON lines across byte chunks.
struct LineBuffer {
    buf: String,
}

impl LineBuffer {
    fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Append a chunk and return the complete lines it closed, trimmed of
    /// `\r` and with blank lines skipped.
    fn push(&mut self, chunk: &str) -> Vec<String> {
        self.buf.push_str(chunk);

        let mut lines = Vec::new();
        while let Some(newline_pos) = self.buf.find('\n') {
            let line = self.buf[..newline_pos].trim_end_matches('\r').to_string();
            self.buf.drain(..=newline_pos);
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }
        lines
    }

    /// Take whatever remains in the buffer, if non-blank.
    fn flush(&mut self) -> Option<String> {
        let remaining = std::mem::take(&mut self.buf);
        let remaining = remaining.trim();
        (!remaining.is_empty()).then(|| remaining.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_line_yields_fragment() {
        let events = parse_line(
            r#"{"model":"deepseek-r1:14b","message":{"role":"assistant","content":"Hel"},"done":false}"#,
        );
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], ChatEvent::Fragment(t) if t == "Hel"));
    }

    #[test]
    fn final_line_yields_done_with_reason() {
        let events = parse_line(
            r#"{"model":"deepseek-r1:14b","message":{"role":"assistant","content":""},"done":true,"done_reason":"stop"}"#,
        );
        assert_eq!(events.len(), 1);
        assert!(
            matches!(&events[0], ChatEvent::Done { reason: Some(r) } if r == "stop")
        );
    }

    #[test]
    fn line_with_content_and_done_yields_both() {
        let events = parse_line(
            r#"{"message":{"role":"assistant","content":"!"},"done":true,"done_reason":"stop"}"#,
        );
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], ChatEvent::Fragment(t) if t == "!"));
        assert!(matches!(&events[1], ChatEvent::Done { .. }));
    }

    #[test]
    fn empty_content_yields_no_fragment() {
        let events =
            parse_line(r#"{"message":{"role":"assistant","content":""},"done":false}"#);
        assert!(events.is_empty());
    }

    #[test]
    fn invalid_json_yields_stream_error() {
        let events = parse_line("not valid json");
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            ChatEvent::Error(BackendError::Stream(_))
        ));
    }

    #[test]
    fn line_buffer_joins_partial_lines_across_chunks() {
        let mut buf = LineBuffer::new();
        assert!(buf.push("{\"done\":fal").is_empty());
        let lines = buf.push("se}\n{\"done\":true}\n");
        assert_eq!(lines, vec![r#"{"done":false}"#, r#"{"done":true}"#]);
    }

    #[test]
    fn line_buffer_trims_carriage_returns_and_skips_blanks() {
        let mut buf = LineBuffer::new();
        let lines = buf.push("{\"done\":true}\r\n\r\n\n");
        assert_eq!(lines, vec![r#"{"done":true}"#]);
    }

    #[test]
    fn line_buffer_flush_returns_trailing_content() {
        let mut buf = LineBuffer::new();
        assert!(buf.push(r#"{"done":true}"#).is_empty());
        assert_eq!(buf.flush(), Some(r#"{"done":true}"#.to_string()));
        assert_eq!(buf.flush(), None);
    }

    #[tokio::test]
    async fn parser_emits_fragments_in_order_and_stops_at_done() {
        let body = concat!(
            "{\"message\":{\"role\":\"assistant\",\"content\":\"Hel\"},\"done\":false}\n",
            "{\"message\":{\"role\":\"assistant\",\"content\":\"lo\"},\"done\":false}\n",
            "{\"message\":{\"role\":\"assistant\",\"content\":\"\"},\"done\":true,\"done_reason\":\"stop\"}\n",
        );
        let bytes = futures::stream::iter(vec![Ok::<_, reqwest::Error>(
            bytes::Bytes::from_static(body.as_bytes()),
        )]);

        let events: Vec<ChatEvent> =
            parse_ndjson_stream(bytes, CancellationToken::new())
                .collect()
                .await;

        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], ChatEvent::Fragment(t) if t == "Hel"));
        assert!(matches!(&events[1], ChatEvent::Fragment(t) if t == "lo"));
        assert!(
            matches!(&events[2], ChatEvent::Done { reason: Some(r) } if r == "stop")
        );
    }

    #[tokio::test]
    async fn parser_ends_without_events_when_aborted_up_front() {
        let bytes = futures::stream::pending::<Result<bytes::Bytes, reqwest::Error>>();
        let abort = CancellationToken::new();
        abort.cancel();

        let events: Vec<ChatEvent> = parse_ndjson_stream(bytes, abort).collect().await;
        assert!(events.is_empty());
    }
}
