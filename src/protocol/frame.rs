//! Outbound frame buffer.

/// Capacity of an outbound frame.
pub const FRAME_CAPACITY: usize = 64;

/// One encoded outbound message, terminator included.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    buf: [u8; FRAME_CAPACITY],
    len: usize,
}

impl Frame {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; FRAME_CAPACITY],
            len: 0,
        }
    }

    /// Append a byte; dropped if the frame is full.
    #[inline]
    pub fn push(&mut self, b: u8) {
        if self.len < FRAME_CAPACITY {
            self.buf[self.len] = b;
            self.len += 1;
        }
    }

    /// Append bytes, truncating at capacity.
    pub fn extend(&mut self, bytes: &[u8]) {
        let to_copy = bytes.len().min(FRAME_CAPACITY - self.len);
        self.buf[self.len..self.len + to_copy].copy_from_slice(&bytes[..to_copy]);
        self.len += to_copy;
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match core::str::from_utf8(self.as_bytes()) {
            Ok(s) => write!(f, "Frame({:?})", s),
            Err(_) => write!(f, "Frame({:02x?})", self.as_bytes()),
        }
    }
}
