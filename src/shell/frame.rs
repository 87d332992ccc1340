//! Sentinel framing for the sqlite3 response streams.
//!
//! Every command is followed by a `.print` of a fixed marker, so the output
//! stream always carries the marker as a trailing line regardless of how many
//! lines the command itself produced. A response is complete once the marker
//! appears anywhere in the bytes accumulated since the command was issued.

/// Marker the session asks sqlite3 to print after every command.
///
/// Chosen so it cannot appear as a prefix of legitimate query output; JSON
/// responses start with `[` or `{`, and dot-command output never begins with
/// a run of dashes.
pub const SENTINEL: &str = "--EOF--";

/// Per-command accumulation state for the output and error streams.
///
/// A fresh buffer is created for every command, which is what guarantees that
/// no bytes from a previous response leak into the next one.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    sentinel_at: Option<usize>,
}

impl FrameBuffer {
    /// Create an empty frame buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of output-stream bytes and check for the sentinel.
    ///
    /// The sentinel may straddle two separately delivered chunks, so the
    /// search always covers the cumulative buffer, resuming far enough back
    /// that a marker split across the boundary is still found.
    pub fn push_stdout(&mut self, chunk: &[u8]) {
        let resume_from = self.stdout.len().saturating_sub(SENTINEL.len() - 1);
        self.stdout.extend_from_slice(chunk);
        if self.sentinel_at.is_none() {
            if let Some(pos) = find(&self.stdout[resume_from..], SENTINEL.as_bytes()) {
                self.sentinel_at = Some(resume_from + pos);
            }
        }
    }

    /// Append a chunk of error-stream bytes. Error output is not framed.
    pub fn push_stderr(&mut self, chunk: &[u8]) {
        self.stderr.extend_from_slice(chunk);
    }

    /// Whether the sentinel has been observed.
    pub fn is_ready(&self) -> bool {
        self.sentinel_at.is_some()
    }

    /// Whether any error-stream bytes arrived.
    pub fn has_stderr(&self) -> bool {
        !self.stderr.is_empty()
    }

    /// Accumulated error-stream output, trimmed.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }

    /// The response: everything before the sentinel, trimmed.
    ///
    /// Empty output (e.g. DDL with no rows) yields an empty string; the
    /// decoding layer distinguishes that from "no data".
    pub fn response(&self) -> String {
        let end = self.sentinel_at.unwrap_or(self.stdout.len());
        String::from_utf8_lossy(&self.stdout[..end]).trim().to_string()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_in_single_chunk() {
        let mut frame = FrameBuffer::new();
        frame.push_stdout(b"[{\"a\":1}]\n--EOF--\n");
        assert!(frame.is_ready());
        assert_eq!(frame.response(), "[{\"a\":1}]");
    }

    #[test]
    fn test_sentinel_straddles_chunks() {
        let mut frame = FrameBuffer::new();
        frame.push_stdout(b"[{\"a\":1}]\n--EO");
        assert!(!frame.is_ready());
        frame.push_stdout(b"F--\n");
        assert!(frame.is_ready());
        assert_eq!(frame.response(), "[{\"a\":1}]");
    }

    #[test]
    fn test_sentinel_split_byte_by_byte() {
        let mut frame = FrameBuffer::new();
        for byte in b"rows\n--EOF--\n" {
            frame.push_stdout(&[*byte]);
        }
        assert!(frame.is_ready());
        assert_eq!(frame.response(), "rows");
    }

    #[test]
    fn test_empty_response_before_sentinel() {
        let mut frame = FrameBuffer::new();
        frame.push_stdout(b"--EOF--\n");
        assert!(frame.is_ready());
        assert_eq!(frame.response(), "");
    }

    #[test]
    fn test_not_ready_without_sentinel() {
        let mut frame = FrameBuffer::new();
        frame.push_stdout(b"[{\"a\":1}]\n");
        assert!(!frame.is_ready());
    }

    #[test]
    fn test_stderr_accumulates_unframed() {
        let mut frame = FrameBuffer::new();
        assert!(!frame.has_stderr());
        frame.push_stderr(b"Parse error near line 1: ");
        frame.push_stderr(b"no such table: missing\n");
        assert!(frame.has_stderr());
        assert_eq!(
            frame.stderr_text(),
            "Parse error near line 1: no such table: missing"
        );
    }

    #[test]
    fn test_response_trims_whitespace() {
        let mut frame = FrameBuffer::new();
        frame.push_stdout(b"\n[{\"n\":2}]\n\n--EOF--\n");
        assert_eq!(frame.response(), "[{\"n\":2}]");
    }

    #[test]
    fn test_bytes_after_sentinel_ignored() {
        let mut frame = FrameBuffer::new();
        frame.push_stdout(b"x\n--EOF--\ntrailing");
        assert_eq!(frame.response(), "x");
    }
}
