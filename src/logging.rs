//! Non-blocking logging for ParkingMonitor.
//!
//! # Architecture
//!
//! ```text
//! RX task / main loop        LogStream            Log drain task
//! ───────────────────        ─────────            ──────────────
//!
//! log_info!() ─────────────▶ [L0][L1][L2] ──────▶ log UART TX
//! formats on stack           lock-free            blocking ok
//! never blocks               ring buffer
//! ```
//!
//! # Rules
//!
//! - The byte-receive path and the scheduler loop never write to a UART to log
//! - Each stream has exactly one producer (see `log_globals`)
//! - Messages are dropped, never waited on, when a ring is full
//! - Messages more verbose than the stream level are discarded at the source

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 120;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 64;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Convert from raw u8 value.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(LogLevel::Error),
            1 => Some(LogLevel::Warn),
            2 => Some(LogLevel::Info),
            3 => Some(LogLevel::Debug),
            4 => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct LogEntry {
    /// Timestamp in microseconds.
    pub timestamp_us: i64,
    /// Log level.
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_us: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text, or a placeholder if it was cut inside a UTF-8 sequence.
    pub fn text(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Lock-free log stream (SPSC: one producer, one drain).
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
    level: AtomicU8,
}

// SAFETY: One producer writes only the slot at write_idx before publishing it
// with a Release store; the single drain reads only slots below write_idx.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream at Info level.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        Self {
            entries: UnsafeCell::new([LogEntry::EMPTY; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
            level: AtomicU8::new(LogLevel::Info as u8),
        }
    }

    /// Set the most verbose level that is still recorded.
    #[inline]
    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Current level threshold.
    #[inline]
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed)).unwrap_or(LogLevel::Info)
    }

    /// Whether a message at `level` would be recorded.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }

    /// Push a log entry (never blocks).
    ///
    /// Returns `true` if message was queued, `false` if filtered or dropped.
    /// Only the stream's single producer may call this.
    #[inline]
    pub fn push(&self, timestamp_us: i64, level: LogLevel, msg: &[u8]) -> bool {
        if !self.enabled(level) {
            return false;
        }

        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let idx = (write as usize) & Self::MASK;

        // SAFETY: Slot `idx` is not visible to the drain until write_idx moves.
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.timestamp_us = timestamp_us;
            entry.level = level;
            entry.len = msg.len().min(MAX_MSG_LEN) as u8;
            entry.msg[..entry.len as usize].copy_from_slice(&msg[..entry.len as usize]);
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Drain next log entry (for the log task).
    ///
    /// Returns `None` if no entries available.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;

        // SAFETY: Single consumer; the producer will not touch this slot
        // until read_idx moves past it.
        let entry = unsafe { (*self.entries.get())[idx] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Get count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Check if there are entries to drain.
    #[inline]
    pub fn has_entries(&self) -> bool {
        self.pending() != 0
    }

    /// Get number of entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncating `core::fmt::Write` over a byte slice.
pub struct BufWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> BufWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }
}

impl core::fmt::Write for BufWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let remaining = self.buf.len() - self.pos;
        let to_write = bytes.len().min(remaining);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}

/// Format a message into a buffer.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    let mut writer = BufWriter::new(buf);
    let _ = core::fmt::write(&mut writer, args);
    writer.len()
}

/// Non-blocking log macro.
///
/// Formatting is skipped entirely when the level is filtered out.
///
/// # Example
///
/// ```ignore
/// log_at!(LogLevel::Info, LOOP_LOG_STREAM, now_us, "space {} -> {:?}", i, state);
/// ```
#[macro_export]
macro_rules! log_at {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let level = $level;
        if $stream.enabled(level) {
            let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
            let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
            $stream.push($timestamp, level, &buf[..len]);
        }
    }};
}

/// Info log.
#[macro_export]
macro_rules! log_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

/// Warning log.
#[macro_export]
macro_rules! log_warn {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::LogLevel::Warn, $stream, $timestamp, $($arg)*)
    };
}

/// Error log.
#[macro_export]
macro_rules! log_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::LogLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

/// Debug log.
#[macro_export]
macro_rules! log_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::LogLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}

/// Trace log (maximum verbosity).
#[macro_export]
macro_rules! log_trace {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::LogLevel::Trace, $stream, $timestamp, $($arg)*)
    };
}
