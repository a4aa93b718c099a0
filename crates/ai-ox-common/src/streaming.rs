use crate::error::CommonRequestError;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use std::pin::Pin;

/// Prefix that marks a payload line in the event stream
pub const DATA_PREFIX: &str = "data: ";

/// Payload that marks the end of the stream; it carries no data
pub const DONE_MARKER: &str = "[DONE]";

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Line-oriented parser for `data: <json>` event streams.
///
/// Transport chunks are buffered until a full line is available, so a JSON
/// payload split across several network reads is decoded once. Lines that
/// do not start with [`DATA_PREFIX`] are ignored, as is the [`DONE_MARKER`].
pub struct SseParser {
    byte_stream: ByteStream,
    buffer: Vec<u8>,
    finished: bool,
}

impl SseParser {
    pub fn new(response: reqwest::Response) -> Self {
        Self::from_byte_stream(response.bytes_stream())
    }

    /// Build a parser over any byte stream (a response body, or a canned one in tests)
    pub fn from_byte_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
    {
        Self {
            byte_stream: Box::pin(stream),
            buffer: Vec::new(),
            finished: false,
        }
    }

    /// Get the next parsed event from the stream.
    ///
    /// Returns `Ok(None)` once the connection is closed and every buffered
    /// line has been consumed.
    pub async fn next_event<T: DeserializeOwned>(
        &mut self,
    ) -> Result<Option<T>, CommonRequestError> {
        loop {
            while let Some(line) = self.take_line() {
                if let Some(event) = parse_data_line(&line)? {
                    return Ok(Some(event));
                }
            }

            if self.finished {
                return Ok(None);
            }

            match self.byte_stream.next().await {
                Some(chunk) => self.buffer.extend_from_slice(&chunk?),
                None => self.finished = true,
            }
        }
    }

    /// Pop one complete line off the buffer. After the stream has ended the
    /// unterminated remainder counts as a line too.
    fn take_line(&mut self) -> Option<String> {
        if let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.drain(..=pos).collect::<Vec<u8>>();
            return Some(String::from_utf8_lossy(&line).into_owned());
        }

        if self.finished && !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            return Some(String::from_utf8_lossy(&line).into_owned());
        }

        None
    }
}

/// Decode a single line of the event stream.
///
/// `Ok(None)` means the line carries no event: it is not a data line, or it
/// is the end-of-stream marker. A data line whose payload is not valid JSON
/// is an error.
pub fn parse_data_line<T: DeserializeOwned>(line: &str) -> Result<Option<T>, CommonRequestError> {
    let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
        return Ok(None);
    };

    let payload = rest.trim();
    if payload == DONE_MARKER {
        return Ok(None);
    }

    serde_json::from_str(payload).map(Some).map_err(|e| {
        CommonRequestError::InvalidEventData(format!("JSON parse error: {e}; payload: {payload}"))
    })
}
