//! Byte-to-line reassembly for the receive path.
//!
//! Runs wherever bytes arrive (UART RX task or interrupt), one byte at a
//! time, with bounded work per byte. Completed lines go to a [`LineSlot`].

use crate::config::{CrPolicy, LinkConfig, OverflowPolicy};
use crate::logging::LogStream;
use crate::stats::LinkStats;
use crate::{log_debug, log_warn};

use super::line::Line;
use super::slot::LineSlot;
use super::RX_BUFFER_SIZE;

/// What a single byte did to the assembler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedEvent {
    /// Byte stored, ignored or discarded; nothing to report.
    Idle,
    /// A line was completed and published.
    Published {
        /// The previous line was still pending and got replaced.
        overwrote: bool,
    },
    /// First byte that did not fit in the current line.
    Overflow,
    /// Terminator reached after an overflow under `OverflowPolicy::Resync`;
    /// the overflowed line was thrown away.
    Resynced,
}

/// Receive-side line assembler.
///
/// Owns the receive buffer and its write cursor. The cursor never passes
/// `CAP - 1`.
pub struct LineAssembler<const CAP: usize = RX_BUFFER_SIZE> {
    line: Line<CAP>,
    /// Current line has lost bytes.
    overflowed: bool,
    config: LinkConfig,
}

impl<const CAP: usize> LineAssembler<CAP> {
    pub const fn new(config: LinkConfig) -> Self {
        Self {
            line: Line::new(),
            overflowed: false,
            config,
        }
    }

    /// Process one received byte.
    pub fn feed(&mut self, byte: u8, slot: &LineSlot<CAP>, stats: &LinkStats) -> FeedEvent {
        match byte {
            b'\n' => self.terminate(slot, stats),
            b'\r' => match self.config.cr {
                CrPolicy::Terminate => self.terminate(slot, stats),
                CrPolicy::Ignore => FeedEvent::Idle,
            },
            _ => self.store(byte, stats),
        }
    }

    /// Process a run of received bytes, returning the last notable event.
    pub fn feed_all(&mut self, bytes: &[u8], slot: &LineSlot<CAP>, stats: &LinkStats) -> FeedEvent {
        bytes.iter().fold(FeedEvent::Idle, |last, &b| match self.feed(b, slot, stats) {
            FeedEvent::Idle => last,
            event => event,
        })
    }

    fn store(&mut self, byte: u8, stats: &LinkStats) -> FeedEvent {
        if self.overflowed {
            return FeedEvent::Idle;
        }
        if self.line.push(byte) {
            return FeedEvent::Idle;
        }

        stats.record_overflow();
        self.overflowed = true;
        if self.config.overflow == OverflowPolicy::Resync {
            self.line.clear();
        }
        FeedEvent::Overflow
    }

    fn terminate(&mut self, slot: &LineSlot<CAP>, stats: &LinkStats) -> FeedEvent {
        let discard = self.overflowed && self.config.overflow == OverflowPolicy::Resync;
        self.overflowed = false;

        if discard {
            self.line.clear();
            return FeedEvent::Resynced;
        }
        if self.line.is_empty() {
            // Bare terminator (e.g. the \n of \r\n): never displace a pending line
            return FeedEvent::Idle;
        }

        let overwrote = slot.publish(self.line.as_bytes());
        if overwrote {
            stats.record_overwrite();
        }
        self.line.clear();
        FeedEvent::Published { overwrote }
    }

    /// Write cursor (bytes held for the current line).
    #[inline]
    pub fn cursor(&self) -> usize {
        self.line.len()
    }

    /// True while bytes are being dropped until the next terminator.
    #[inline]
    pub fn is_discarding(&self) -> bool {
        self.overflowed && self.config.overflow == OverflowPolicy::Resync
    }

    /// Drop any partial line.
    pub fn reset(&mut self) {
        self.line.clear();
        self.overflowed = false;
    }
}

/// Log a notable feed event to the receive-side stream.
pub fn log_feed_event<const N: usize>(stream: &LogStream<N>, now_us: i64, event: FeedEvent) {
    match event {
        FeedEvent::Idle => {}
        FeedEvent::Published { overwrote: false } => {
            log_debug!(stream, now_us, "line ready")
        }
        FeedEvent::Published { overwrote: true } => {
            log_warn!(stream, now_us, "pending line overwritten")
        }
        FeedEvent::Overflow => {
            log_warn!(stream, now_us, "rx overflow, discarding to next terminator")
        }
        FeedEvent::Resynced => log_debug!(stream, now_us, "rx resynced"),
    }
}

impl<const CAP: usize> Default for LineAssembler<CAP> {
    fn default() -> Self {
        Self::new(LinkConfig::DEFAULT)
    }
}
