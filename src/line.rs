use core::fmt;

/// Size of the console line buffer (`NGX_MAX_ERROR_STR`).
pub const NGX_MAX_ERROR_STR: usize = 2048;

pub const LINEFEED: &[u8] = b"\n";

/// A stack buffer holding one console line.
///
/// Everything written through [`fmt::Write`] lands in `buf[..CAP - LINEFEED.len()]`;
/// whatever does not fit is dropped. [`TraceLine::finish`] appends the line feed, so a
/// finished line is never longer than `CAP` and always ends with [`LINEFEED`].
pub struct TraceLine<const CAP: usize = NGX_MAX_ERROR_STR> {
    buf: [u8; CAP],
    pos: usize,
    truncated: bool,
}

impl<const CAP: usize> TraceLine<CAP> {
    pub const fn new() -> Self {
        Self {
            buf: [0; CAP],
            pos: 0,
            truncated: false,
        }
    }

    fn limit(&self) -> usize {
        CAP.saturating_sub(LINEFEED.len())
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        let room = self.limit().saturating_sub(self.pos);
        let n = bytes.len().min(room);
        self.buf[self.pos..self.pos + n].copy_from_slice(&bytes[..n]);
        self.pos += n;
        if n < bytes.len() {
            self.truncated = true;
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn len(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }

    /// Terminate the line and hand out the bytes to write.
    pub fn finish(&mut self) -> &[u8] {
        let end = (self.pos + LINEFEED.len()).min(CAP);
        let lf = end - self.pos;
        self.buf[self.pos..end].copy_from_slice(&LINEFEED[..lf]);
        &self.buf[..end]
    }
}

impl<const CAP: usize> Default for TraceLine<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> fmt::Write for TraceLine<CAP> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // never report an error, a short line is still worth printing
        self.push_bytes(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn line_feed_is_unix() {
        assert_eq!(LINEFEED, b"\n");
    }

    #[test]
    fn short_line_is_terminated() {
        let mut line = TraceLine::<64>::new();
        write!(line, "enter {:X}", 0x1000).unwrap();
        assert!(!line.is_truncated());
        let mut expected = b"enter 1000".to_vec();
        expected.extend_from_slice(LINEFEED);
        assert_eq!(line.finish(), &expected[..]);
    }

    #[test]
    fn overflow_is_clamped_to_capacity() {
        let mut line = TraceLine::<32>::new();
        write!(line, "{}", "x".repeat(100)).unwrap();
        assert!(line.is_truncated());
        assert_eq!(line.len(), 32 - LINEFEED.len());
        let bytes = line.finish();
        assert_eq!(bytes.len(), 32);
        assert!(bytes.ends_with(LINEFEED));
    }

    #[test]
    fn exact_fit_is_not_truncated() {
        let mut line = TraceLine::<16>::new();
        let content = "y".repeat(16 - LINEFEED.len());
        line.push_bytes(content.as_bytes());
        assert!(!line.is_truncated());
        assert_eq!(line.finish().len(), 16);
    }

    #[test]
    fn writes_after_full_are_dropped() {
        let mut line = TraceLine::<8>::new();
        line.push_bytes(b"abcdefghij");
        line.push_bytes(b"more");
        let bytes = line.finish();
        assert_eq!(bytes.len(), 8);
        assert!(bytes.starts_with(b"abcdef"));
    }
}
