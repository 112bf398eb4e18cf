//! Global log stream instances.
//!
//! One stream per producer, one drain (`uart_logger`).

use crate::logging::LogStream;

/// Log stream for the byte-receive path (RX task only).
///
/// Overflow and overwrite events of the line assembler land here.
pub static RX_LOG_STREAM: LogStream = LogStream::new();

/// Log stream for the scheduler loop (main task only).
///
/// Parsed commands, rejected lines and link statistics land here.
pub static LOOP_LOG_STREAM: LogStream = LogStream::new();
