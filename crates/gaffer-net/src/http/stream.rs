//! Lazy line streaming for chunked responses.
//!
//! The chunked execute endpoint writes one JSON document per line and keeps
//! the connection open while results are produced. [`LineStream`] reads the
//! body incrementally and hands out complete lines as they arrive.

use bytes::{Buf, BytesMut};
use futures_util::Stream;
use serde::de::DeserializeOwned;

use crate::error::{GafferError, Result};

/// Splits incoming chunks into lines.
///
/// Chunk boundaries may fall anywhere, including inside a line or between a
/// `\r` and its `\n`.
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    buf: BytesMut,
}

impl LineBuffer {
    pub(crate) fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Take the next complete line, skipping blank ones.
    pub(crate) fn next_line(&mut self) -> Option<BytesMut> {
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line = self.buf.split_to(pos + 1);
            line.truncate(pos);
            trim_cr(&mut line);
            if !line.is_empty() {
                return Some(line);
            }
        }
        None
    }

    /// Take whatever is left once the body has ended.
    pub(crate) fn finish(&mut self) -> Option<BytesMut> {
        let mut rest = self.buf.split();
        trim_cr(&mut rest);
        if rest.is_empty() { None } else { Some(rest) }
    }

    pub(crate) fn is_empty(&self) -> bool {
        !self.buf.has_remaining()
    }
}

fn trim_cr(line: &mut BytesMut) {
    if line.last() == Some(&b'\r') {
        line.truncate(line.len() - 1);
    }
}

/// A forward-only, single-pass sequence of response lines.
///
/// The underlying connection stays open until the stream is exhausted or
/// dropped.
pub struct LineStream {
    response: Option<reqwest::Response>,
    buffer: LineBuffer,
    lines_read: u64,
}

impl LineStream {
    pub(crate) fn new(response: reqwest::Response) -> Self {
        Self {
            response: Some(response),
            buffer: LineBuffer::default(),
            lines_read: 0,
        }
    }

    /// Number of lines handed out so far.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Read the next line, without its terminator.
    ///
    /// Returns `None` once the body is exhausted. Blank lines are skipped.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(line) = self.buffer.next_line() {
                return self.emit(line).map(Some);
            }

            let Some(response) = self.response.as_mut() else {
                return match self.buffer.finish() {
                    Some(line) => self.emit(line).map(Some),
                    None => Ok(None),
                };
            };

            match response.chunk().await {
                Ok(Some(chunk)) => self.buffer.push(&chunk),
                Ok(None) => {
                    tracing::debug!(
                        target: "gaffer_net::stream",
                        "Chunked response finished after {} lines",
                        self.lines_read
                    );
                    // Release the connection as soon as the body ends.
                    self.response = None;
                }
                Err(e) => {
                    self.response = None;
                    return Err(e.into());
                }
            }
        }
    }

    /// Read the next line and decode it as JSON.
    pub async fn next_json<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        match self.next_line().await? {
            Some(line) => Ok(Some(serde_json::from_str(&line)?)),
            None => Ok(None),
        }
    }

    /// Read every remaining line.
    pub async fn collect_lines(mut self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        while let Some(line) = self.next_line().await? {
            lines.push(line);
        }
        Ok(lines)
    }

    /// Adapt into a [`Stream`] of lines.
    ///
    /// The stream ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<String>> {
        futures_util::stream::unfold(Some(self), |state| async move {
            let mut lines = state?;
            match lines.next_line().await {
                Ok(Some(line)) => Some((Ok(line), Some(lines))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    fn emit(&mut self, line: BytesMut) -> Result<String> {
        let line = String::from_utf8(line.to_vec())
            .map_err(|e| GafferError::InvalidBody(format!("line is not UTF-8: {}", e)))?;
        self.lines_read += 1;
        Ok(line)
    }
}

impl std::fmt::Debug for LineStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineStream")
            .field("open", &self.response.is_some())
            .field("buffered", &!self.buffer.is_empty())
            .field("lines_read", &self.lines_read)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(buffer: &mut LineBuffer) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(line) = buffer.next_line() {
            out.push(String::from_utf8(line.to_vec()).unwrap());
        }
        out
    }

    #[test]
    fn test_lines_split_across_chunks() {
        let mut buffer = LineBuffer::default();
        buffer.push(b"{\"a\":");
        assert!(buffer.next_line().is_none());
        buffer.push(b"1}\n{\"b\"");
        assert_eq!(drain(&mut buffer), vec!["{\"a\":1}"]);
        buffer.push(b":2}\n");
        assert_eq!(drain(&mut buffer), vec!["{\"b\":2}"]);
        assert!(buffer.finish().is_none());
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let mut buffer = LineBuffer::default();
        buffer.push(b"one\r");
        buffer.push(b"\n\r\n\ntwo\n");
        assert_eq!(drain(&mut buffer), vec!["one", "two"]);
    }

    #[test]
    fn test_unterminated_last_line() {
        let mut buffer = LineBuffer::default();
        buffer.push(b"first\nlast");
        assert_eq!(drain(&mut buffer), vec!["first"]);
        let rest = buffer.finish().unwrap();
        assert_eq!(&rest[..], b"last");
        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn test_line_stream_from_response() {
        let response = http::Response::new("{\"n\":1}\n{\"n\":2}\n");
        let mut lines = LineStream::new(reqwest::Response::from(response));

        let first: Option<serde_json::Value> = lines.next_json().await.unwrap();
        assert_eq!(first.unwrap()["n"], 1);
        assert_eq!(lines.lines_read(), 1);
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("{\"n\":2}"));
        assert!(lines.next_line().await.unwrap().is_none());
        assert!(lines.next_line().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_into_stream() {
        use futures_util::StreamExt;

        let response = http::Response::new("a\nb\nc");
        let lines = LineStream::new(reqwest::Response::from(response));
        let collected: Vec<String> = lines
            .into_stream()
            .map(|line| line.unwrap())
            .collect()
            .await;
        assert_eq!(collected, vec!["a", "b", "c"]);
    }
}
