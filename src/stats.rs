//! Link statistics for ParkingMonitor.
//!
//! The protocol is best-effort: nothing is reported back to the host when a
//! line is lost or refused. These counters are the only record of it. They
//! are bumped from both the RX path and the scheduler loop, so every field is
//! an atomic and no method blocks.

use core::sync::atomic::{AtomicU32, Ordering};

/// Thread-safe link counters.
///
/// # Usage
///
/// ```ignore
/// static STATS: LinkStats = LinkStats::new();
///
/// // In the RX path:
/// STATS.record_overflow();
///
/// // In the main loop:
/// let snap = STATS.snapshot();
/// if snap.has_losses() { /* log it */ }
/// ```
pub struct LinkStats {
    /// Lines that outgrew the receive buffer.
    overflows: AtomicU32,
    /// Completed lines replaced before the main loop consumed them.
    lines_overwritten: AtomicU32,
    /// Lines refused by the command parser.
    commands_rejected: AtomicU32,
    /// Lines applied to the state store.
    commands_applied: AtomicU32,
    /// Status frames handed to the sink.
    frames_sent: AtomicU32,
}

impl LinkStats {
    /// All counters at zero.
    pub const fn new() -> Self {
        Self {
            overflows: AtomicU32::new(0),
            lines_overwritten: AtomicU32::new(0),
            commands_rejected: AtomicU32::new(0),
            commands_applied: AtomicU32::new(0),
            frames_sent: AtomicU32::new(0),
        }
    }

    #[inline]
    pub fn record_overflow(&self) {
        self.overflows.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_overwrite(&self) {
        self.lines_overwritten.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rejected(&self) {
        self.commands_rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_applied(&self) {
        self.commands_applied.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_frame_sent(&self) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all counters.
    #[inline]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            overflows: self.overflows.load(Ordering::Relaxed),
            lines_overwritten: self.lines_overwritten.load(Ordering::Relaxed),
            commands_rejected: self.commands_rejected.load(Ordering::Relaxed),
            commands_applied: self.commands_applied.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
        }
    }
}

impl Default for LinkStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of link counters at a point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub overflows: u32,
    pub lines_overwritten: u32,
    pub commands_rejected: u32,
    pub commands_applied: u32,
    pub frames_sent: u32,
}

impl StatsSnapshot {
    /// True if any inbound line was lost or refused.
    pub fn has_losses(&self) -> bool {
        self.overflows != 0 || self.lines_overwritten != 0 || self.commands_rejected != 0
    }
}
