//! Incremental NDJSON line decoder.
//!
//! The inference runtime streams newline-delimited JSON, one object per
//! line, and network chunks do not respect line boundaries. The decoder
//! buffers partial lines across chunks and hands back one complete line
//! at a time. Parsing (and tolerating malformed lines) is the caller's
//! concern.

use bytes::BytesMut;

/// Buffers raw bytes and yields complete NDJSON lines.
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buf: BytesMut,
}

impl NdjsonDecoder {
    /// Create an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of raw bytes.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Pop the next complete line, if one is buffered.
    ///
    /// Lines are trimmed of the terminator and surrounding whitespace
    /// (`\r\n` streams decode the same as `\n`).
    pub fn next_line(&mut self) -> Option<String> {
        let pos = self.buf.iter().position(|&b| b == b'\n')?;
        let line = self.buf.split_to(pos + 1);
        Some(String::from_utf8_lossy(&line[..pos]).trim().to_string())
    }

    /// Drain the trailing unterminated line, if any.
    ///
    /// Call once after the stream ends; servers routinely omit the final
    /// newline.
    pub fn finish(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let rest = self.buf.split();
        let line = String::from_utf8_lossy(&rest).trim().to_string();
        if line.is_empty() { None } else { Some(line) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(decoder: &mut NdjsonDecoder) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = decoder.next_line() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn test_single_chunk_multiple_lines() {
        let mut decoder = NdjsonDecoder::new();
        decoder.feed(b"{\"a\":1}\n{\"b\":2}\n");
        assert_eq!(drain(&mut decoder), vec!["{\"a\":1}", "{\"b\":2}"]);
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut decoder = NdjsonDecoder::new();
        decoder.feed(b"{\"status\":\"cre");
        assert!(decoder.next_line().is_none());
        decoder.feed(b"ating\"}\n");
        assert_eq!(decoder.next_line().as_deref(), Some("{\"status\":\"creating\"}"));
    }

    #[test]
    fn test_crlf_terminators() {
        let mut decoder = NdjsonDecoder::new();
        decoder.feed(b"{\"a\":1}\r\n{\"b\":2}\r\n");
        assert_eq!(drain(&mut decoder), vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[test]
    fn test_trailing_line_without_newline() {
        let mut decoder = NdjsonDecoder::new();
        decoder.feed(b"{\"a\":1}\n{\"done\":true}");
        assert_eq!(drain(&mut decoder), vec!["{\"a\":1}"]);
        assert_eq!(decoder.finish().as_deref(), Some("{\"done\":true}"));
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn test_blank_lines_yield_empty_strings() {
        let mut decoder = NdjsonDecoder::new();
        decoder.feed(b"\n{\"a\":1}\n\n");
        assert_eq!(drain(&mut decoder), vec!["", "{\"a\":1}", ""]);
    }
}
