//! Single-line handoff between the byte-receive path and the main loop.
//!
//! # Architecture
//!
//! ```text
//! RX task / ISR           LineSlot                 Main loop
//! ─────────────           ────────                 ─────────
//! publish(line) ────────▶ [seq][len][bytes…] ────▶ take(&mut Line)
//! never blocks            at most one line          copies, validates seq
//! last writer wins                                  retries on a torn copy
//! ```
//!
//! # Rules
//!
//! - Exactly one producer calls `publish`, exactly one consumer calls `take`
//! - The consumer parses its own copy, never the shared bytes
//! - A copy that raced a publish is thrown away, so a taken line is always
//!   one whole message, never a mix of two
//!
//! The bytes are atomics, so the optimistic copy is a race the memory model
//! allows rather than undefined behaviour.

use core::sync::atomic::{fence, AtomicU32, AtomicU8, AtomicUsize, Ordering};

use super::line::Line;
use super::RX_BUFFER_SIZE;

/// Snapshot attempts per `take` before leaving the line for the next iteration.
pub const MAX_SNAPSHOT_RETRIES: u32 = 8;

/// Sequence-locked cell holding at most one ready line.
///
/// `seq` is odd while a publish is in progress and advances by 2 per line.
/// A line is pending while `seq` differs from the last sequence taken.
pub struct LineSlot<const CAP: usize = RX_BUFFER_SIZE> {
    seq: AtomicU32,
    taken: AtomicU32,
    len: AtomicUsize,
    bytes: [AtomicU8; CAP],
}

impl<const CAP: usize> LineSlot<CAP> {
    /// Create an empty slot.
    pub const fn new() -> Self {
        Self {
            seq: AtomicU32::new(0),
            taken: AtomicU32::new(0),
            len: AtomicUsize::new(0),
            bytes: [const { AtomicU8::new(0) }; CAP],
        }
    }

    /// Publish a completed line (producer side).
    ///
    /// Truncates to `CAP - 1` bytes. Returns `true` if a line that was never
    /// taken got replaced.
    ///
    /// # Timing
    ///
    /// O(line length), no loops on shared state, never blocks.
    pub fn publish(&self, line: &[u8]) -> bool {
        let seq = self.seq.load(Ordering::Relaxed);
        let overwrote = seq != self.taken.load(Ordering::Acquire);

        self.seq.store(seq.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);

        let len = line.len().min(CAP - 1);
        for (dst, &b) in self.bytes.iter().zip(&line[..len]) {
            dst.store(b, Ordering::Relaxed);
        }
        self.len.store(len, Ordering::Relaxed);

        self.seq.store(seq.wrapping_add(2), Ordering::Release);
        overwrote
    }

    /// True if a published line has not been taken yet.
    #[inline]
    pub fn has_pending(&self) -> bool {
        let seq = self.seq.load(Ordering::Acquire);
        seq & !1 != self.taken.load(Ordering::Relaxed)
    }

    /// Copy the pending line into `out` and mark it consumed (consumer side).
    ///
    /// Returns `false` if nothing is pending, or if every snapshot attempt
    /// raced a publish; in that case the newer line stays pending.
    pub fn take(&self, out: &mut Line<CAP>) -> bool {
        for _ in 0..MAX_SNAPSHOT_RETRIES {
            let before = self.seq.load(Ordering::Acquire);
            if before == self.taken.load(Ordering::Relaxed) {
                return false;
            }
            if before & 1 == 1 {
                // Publish in progress
                core::hint::spin_loop();
                continue;
            }

            let len = self.len.load(Ordering::Relaxed).min(CAP - 1);
            let (buf, out_len) = out.raw_mut();
            for (dst, src) in buf[..len].iter_mut().zip(&self.bytes) {
                *dst = src.load(Ordering::Relaxed);
            }

            fence(Ordering::Acquire);
            let after = self.seq.load(Ordering::Relaxed);
            if before == after {
                *out_len = len;
                self.taken.store(before, Ordering::Release);
                return true;
            }
        }
        false
    }
}

impl<const CAP: usize> Default for LineSlot<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slot_has_nothing() {
        let slot = LineSlot::<16>::new();
        let mut line = Line::new();
        assert!(!slot.has_pending());
        assert!(!slot.take(&mut line));
        assert!(line.is_empty());
    }

    #[test]
    fn test_publish_then_take_once() {
        let slot = LineSlot::<16>::new();
        assert!(!slot.publish(b"R:O,L"));
        assert!(slot.has_pending());

        let mut line = Line::new();
        assert!(slot.take(&mut line));
        assert_eq!(line.as_bytes(), b"R:O,L");

        // Consumed: a second take sees nothing
        assert!(!slot.has_pending());
        assert!(!slot.take(&mut line));
    }

    #[test]
    fn test_last_writer_wins() {
        let slot = LineSlot::<16>::new();
        assert!(!slot.publish(b"R:L,L,L,L"));
        assert!(slot.publish(b"R:O"));

        let mut line = Line::new();
        assert!(slot.take(&mut line));
        assert_eq!(line.as_bytes(), b"R:O");
    }

    #[test]
    fn test_publish_truncates_to_capacity() {
        let slot = LineSlot::<4>::new();
        slot.publish(b"ABCDEFG");

        let mut line = Line::<4>::new();
        assert!(slot.take(&mut line));
        assert_eq!(line.as_bytes(), b"ABC");
    }

    #[test]
    fn test_publish_after_take_is_not_overwrite() {
        let slot = LineSlot::<16>::new();
        let mut line = Line::new();
        slot.publish(b"one");
        assert!(slot.take(&mut line));
        assert!(!slot.publish(b"two"));
    }
}
