use serde::Deserialize;
use thiserror::Error;

use crate::utf8::Utf8StreamDecoder;

const DATA_PREFIX: &str = "data:";
const DONE_SENTINEL: &str = "[DONE]";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid JSON in SSE data line: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<StreamDelta>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Extracts `choices[0].delta.content` from one SSE line.
///
/// Lines without the `data:` prefix, the `[DONE]` sentinel and payloads
/// without content yield `Ok(None)`.
pub fn parse_data_line(line: &str) -> Result<Option<String>, ParseError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return Ok(None);
    };
    let payload = payload.trim();
    if payload == DONE_SENTINEL {
        return Ok(None);
    }

    let chunk: StreamChunk = serde_json::from_str(payload)?;
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .filter(|content| !content.is_empty()))
}

/// Longest SSE line kept while waiting for its newline.
pub const MAX_LINE_LEN: usize = 1024 * 1024;

/// Turns an upstream SSE byte stream into the plain text to forward.
///
/// Feed every raw chunk to [`SseRelay::push`] and forward whatever it
/// returns right away; call [`SseRelay::finish`] once upstream closes.
/// A line cut by a chunk boundary is kept until its newline arrives, so
/// its text goes out with the chunk that completes it. A line that grows
/// past [`MAX_LINE_LEN`] without a newline is dropped up to its end.
#[derive(Debug, Default)]
pub struct SseRelay {
    decoder: Utf8StreamDecoder,
    partial_line: String,
    skipping_line: bool,
    forwarded_bytes: usize,
}

impl SseRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> String {
        let mut text = self.decoder.decode(chunk);
        if self.skipping_line {
            match text.find('\n') {
                Some(end) => {
                    self.skipping_line = false;
                    text.drain(..=end);
                }
                None => return String::new(),
            }
        }
        self.partial_line.push_str(&text);

        let mut forwarded = String::new();
        if let Some(last_newline) = self.partial_line.rfind('\n') {
            let rest = self.partial_line.split_off(last_newline + 1);
            let complete = std::mem::replace(&mut self.partial_line, rest);
            for line in complete.split('\n') {
                extract_into(line, &mut forwarded);
            }
        }

        if self.partial_line.len() > MAX_LINE_LEN {
            tracing::warn!(
                "Dropping SSE line longer than {} bytes without a newline",
                MAX_LINE_LEN
            );
            self.partial_line = String::new();
            self.skipping_line = true;
        }

        self.forwarded_bytes += forwarded.len();
        forwarded
    }

    /// Processes the last line if upstream closed without a trailing newline.
    pub fn finish(&mut self) -> String {
        let tail = self.decoder.finish();
        let line = std::mem::take(&mut self.partial_line);
        if std::mem::take(&mut self.skipping_line) {
            return String::new();
        }

        let mut forwarded = String::new();
        extract_into(&(line + &tail), &mut forwarded);
        self.forwarded_bytes += forwarded.len();
        forwarded
    }

    pub fn forwarded_bytes(&self) -> usize {
        self.forwarded_bytes
    }
}

fn extract_into(line: &str, forwarded: &mut String) {
    match parse_data_line(line) {
        Ok(Some(content)) => forwarded.push_str(&content),
        Ok(None) => {}
        Err(error) => tracing::error!("Failed to parse SSE data: {} (line: {:?})", error, line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(content: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({ "choices": [{ "delta": { "content": content } }] })
        )
    }

    #[test]
    fn chunks_are_forwarded_in_order() {
        let mut relay = SseRelay::new();
        let forwarded: Vec<String> = ["A", "B", "C"]
            .iter()
            .map(|content| relay.push(frame(content).as_bytes()))
            .collect();
        assert_eq!(forwarded, ["A", "B", "C"]);
        assert_eq!(relay.finish(), "");
        assert_eq!(relay.forwarded_bytes(), 3);
    }

    #[test]
    fn several_lines_in_one_chunk_are_joined() {
        let mut relay = SseRelay::new();
        let chunk = format!("{}{}", frame("Hello, "), frame("world"));
        assert_eq!(relay.push(chunk.as_bytes()), "Hello, world");
    }

    #[test]
    fn invalid_json_is_skipped() {
        let mut relay = SseRelay::new();
        let chunk = format!("data: {{not json\n{}", frame("ok"));
        assert_eq!(relay.push(chunk.as_bytes()), "ok");
        assert_eq!(relay.push(frame("!").as_bytes()), "!");
    }

    #[test]
    fn frames_without_content_contribute_nothing() {
        let mut relay = SseRelay::new();
        let chunk = concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n",
            "data: {\"choices\":[]}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":null}}]}\n",
            "data: {\"id\":\"x\"}\n",
            ": keep-alive comment\n",
            "event: message\n",
        );
        assert_eq!(relay.push(chunk.as_bytes()), "");
        assert_eq!(relay.push(frame("after").as_bytes()), "after");
    }

    #[test]
    fn done_sentinel_is_ignored() {
        assert!(parse_data_line("data: [DONE]").unwrap().is_none());
    }

    #[test]
    fn prefix_without_space_and_crlf() {
        let line = "data:{\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\r";
        assert_eq!(parse_data_line(line).unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn line_split_across_chunks_is_reassembled() {
        let mut relay = SseRelay::new();
        let frame = frame("split");
        let (head, tail) = frame.split_at(8);
        assert_eq!(relay.push(head.as_bytes()), "");
        assert_eq!(relay.push(tail.as_bytes()), "split");
    }

    #[test]
    fn multibyte_split_across_chunks() {
        let mut relay = SseRelay::new();
        let frame = frame("成长");
        let bytes = frame.as_bytes();
        // Cut inside the first character of the content
        let cut = frame.find('成').unwrap() + 1;
        assert_eq!(relay.push(&bytes[..cut]), "");
        assert_eq!(relay.push(&bytes[cut..]), "成长");
    }

    #[test]
    fn unterminated_last_line_is_flushed() {
        let mut relay = SseRelay::new();
        let frame = frame("end");
        assert_eq!(relay.push(frame.trim_end().as_bytes()), "");
        assert_eq!(relay.finish(), "end");
    }

    #[test]
    fn empty_content_is_not_forwarded() {
        assert!(parse_data_line(r#"data: {"choices":[{"delta":{"content":""}}]}"#).unwrap().is_none());
    }

    #[test]
    fn empty_payload_is_an_error() {
        assert!(parse_data_line("data:").is_err());
    }

    #[test]
    fn overlong_line_is_dropped_until_its_newline() {
        let mut relay = SseRelay::new();
        let filler = "x".repeat(MAX_LINE_LEN / 2 + 1);
        assert_eq!(relay.push(format!("data: {filler}").as_bytes()), "");
        assert_eq!(relay.push(filler.as_bytes()), "");
        assert_eq!(relay.push(filler.as_bytes()), "");
        // The rest of the dropped line ends here, the next frame goes through
        let chunk = format!("{filler}\n{}", frame("after"));
        assert_eq!(relay.push(chunk.as_bytes()), "after");
        assert_eq!(relay.finish(), "");
    }

    #[test]
    fn overlong_tail_is_not_flushed_at_end() {
        let mut relay = SseRelay::new();
        let filler = "x".repeat(MAX_LINE_LEN + 1);
        assert_eq!(relay.push(format!("{}data: {filler}", frame("ok")).as_bytes()), "ok");
        assert_eq!(relay.finish(), "");
        assert_eq!(relay.forwarded_bytes(), 2);
    }
}
