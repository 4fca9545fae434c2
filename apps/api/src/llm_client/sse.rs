//! Incremental decoder for the chat-completions server-sent-events stream.
//!
//! Network chunks do not respect line boundaries (or UTF-8 boundaries), so bytes
//! are buffered until a full line is available.

use serde::Deserialize;

/// One decoded `data:` line.
#[derive(Debug, Clone, PartialEq)]
pub enum SseEvent {
    /// Text delta. May be empty for role-only or usage-only chunks.
    Delta(String),
    /// The provider's end-of-stream marker.
    Done,
    /// The provider reported an error inside the stream.
    Failed(String),
    /// A `data:` payload that is not a recognisable chunk.
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    error: Option<StreamError>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamError {
    message: String,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Feeds a network chunk and returns every event completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = parse_line(line.trim_end_matches(['\n', '\r'])) {
                events.push(event);
            }
        }
        events
    }
}

fn parse_line(line: &str) -> Option<SseEvent> {
    // Blank separators, comments (": keep-alive"), and event/id fields carry no text.
    let payload = line.strip_prefix("data:")?.trim_start();

    if payload == "[DONE]" {
        return Some(SseEvent::Done);
    }

    match serde_json::from_str::<StreamChunk>(payload) {
        Ok(StreamChunk {
            error: Some(error), ..
        }) => Some(SseEvent::Failed(error.message)),
        Ok(chunk) => Some(SseEvent::Delta(
            chunk
                .choices
                .into_iter()
                .filter_map(|c| c.delta.content)
                .collect(),
        )),
        Err(_) => Some(SseEvent::Malformed(payload.to_string())),
    }
}
