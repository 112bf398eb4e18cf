//! Fixed-capacity line buffer.

use super::RX_BUFFER_SIZE;

/// One received line, terminator stripped.
///
/// Holds at most `CAP - 1` bytes; the last slot is the room the wire
/// terminator would take and is never filled.
#[derive(Clone)]
pub struct Line<const CAP: usize = RX_BUFFER_SIZE> {
    buf: [u8; CAP],
    len: usize,
}

impl<const CAP: usize> Line<CAP> {
    /// Longest line that fits.
    pub const MAX_LEN: usize = CAP - 1;

    /// Create empty line
    pub const fn new() -> Self {
        const { assert!(CAP >= 2, "Line capacity must leave room for a terminator") };

        Self {
            buf: [0u8; CAP],
            len: 0,
        }
    }

    /// Build a line from bytes, truncating to [`Line::MAX_LEN`].
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut line = Self::new();
        let copy_len = bytes.len().min(Self::MAX_LEN);
        line.buf[..copy_len].copy_from_slice(&bytes[..copy_len]);
        line.len = copy_len;
        line
    }

    /// Append a byte. Returns `false` (and drops the byte) when full.
    #[inline]
    pub fn push(&mut self, c: u8) -> bool {
        if self.len < Self::MAX_LEN {
            self.buf[self.len] = c;
            self.len += 1;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Line as text; empty if it is not valid UTF-8. Use `as_bytes().escape_ascii()`
    /// to show arbitrary bytes.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(self.as_bytes()).unwrap_or("")
    }

    /// Mutable access for a snapshot copy: the whole buffer plus the length to commit.
    pub(crate) fn raw_mut(&mut self) -> (&mut [u8; CAP], &mut usize) {
        (&mut self.buf, &mut self.len)
    }
}

impl<const CAP: usize> Default for Line<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

// Bytes past `len` are stale and not part of the line.
impl<const CAP: usize> PartialEq for Line<CAP> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<const CAP: usize> Eq for Line<CAP> {}

impl<const CAP: usize> core::fmt::Debug for Line<CAP> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Line(\"{}\")", self.as_bytes().escape_ascii())
    }
}
