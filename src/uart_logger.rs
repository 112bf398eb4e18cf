//! Log output on a dedicated UART.
//!
//! The protocol UART carries only status frames; everything from the log
//! streams goes out here.
//!
//! # Hardware Setup
//!
//! ```text
//! ESP32-S3 GPIO17 (TX) ──────▶ USB-UART RX
//!                               └─▶ PC Serial Monitor
//! ```

use crate::logging::{BufWriter, LogEntry, LogStream};

#[cfg(target_os = "espidf")]
use crate::log_globals::{LOOP_LOG_STREAM, RX_LOG_STREAM};

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::peripheral::Peripheral;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::uart::{self, UartTxDriver};

/// Formatted line buffer size.
pub const FORMAT_BUF_LEN: usize = 160;

/// Dropped-message report interval.
pub const DROPPED_REPORT_INTERVAL_US: i64 = 10_000_000;

/// UART configuration for logging.
pub struct UartLoggerConfig {
    pub baud_rate: u32,
    pub tx_pin: u8,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            tx_pin: 17,
        }
    }
}

/// Format a log entry.
///
/// Format: `[timestamp_us] LEVEL: message\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    use core::fmt::Write;

    let mut writer = BufWriter::new(buf);
    let _ = write!(
        writer,
        "[{:10}] {}: {}\n",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.text()
    );
    writer.len()
}

/// Format the dropped-message report for the two streams.
///
/// Returns 0 if nothing was dropped.
pub fn format_dropped_report(rx_dropped: u32, loop_dropped: u32, buf: &mut [u8]) -> usize {
    use core::fmt::Write;

    if rx_dropped == 0 && loop_dropped == 0 {
        return 0;
    }
    let mut writer = BufWriter::new(buf);
    let _ = write!(writer, "[WARN] Dropped: RX={}, LOOP={}\n", rx_dropped, loop_dropped);
    writer.len()
}

/// Drain one stream through `write`. Returns true if anything was written.
pub fn drain_stream<const N: usize>(stream: &LogStream<N>, mut write: impl FnMut(&[u8])) -> bool {
    let mut buf = [0u8; FORMAT_BUF_LEN];
    let mut work_done = false;
    while let Some(entry) = stream.drain() {
        let len = format_log_entry(&entry, &mut buf);
        write(&buf[..len]);
        work_done = true;
    }
    work_done
}

/// Initialize a TX-only UART for logging output.
#[cfg(target_os = "espidf")]
pub fn init_uart_logger<'d>(
    uart: impl Peripheral<P = uart::UART1> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    config: &UartLoggerConfig,
) -> Result<UartTxDriver<'d>, esp_idf_svc::sys::EspError> {
    let uart_config =
        uart::config::Config::default().baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// UART log drain task.
///
/// Drains RX_LOG_STREAM first (it is the smaller, burstier one), then
/// LOOP_LOG_STREAM.
#[cfg(target_os = "espidf")]
pub fn uart_logger_task(uart: &mut UartTxDriver<'_>) -> ! {
    let mut last_dropped_report = 0i64;

    loop {
        let mut work_done = drain_stream(&RX_LOG_STREAM, |bytes| {
            let _ = uart.write(bytes);
        });
        work_done |= drain_stream(&LOOP_LOG_STREAM, |bytes| {
            let _ = uart.write(bytes);
        });

        // SAFETY: esp_timer_get_time has no preconditions once the timer service is up.
        let now = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        if now - last_dropped_report > DROPPED_REPORT_INTERVAL_US {
            let mut msg = [0u8; 64];
            let len =
                format_dropped_report(RX_LOG_STREAM.dropped(), LOOP_LOG_STREAM.dropped(), &mut msg);
            if len > 0 {
                let _ = uart.write(&msg[..len]);
                RX_LOG_STREAM.reset_dropped();
                LOOP_LOG_STREAM.reset_dropped();
            }
            last_dropped_report = now;
        }

        if !work_done {
            esp_idf_svc::hal::delay::FreeRtos::delay_ms(10);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;

    fn entry(level: LogLevel, text: &[u8]) -> LogEntry {
        let mut e = LogEntry {
            timestamp_us: 1234567,
            level,
            ..LogEntry::default()
        };
        e.msg[..text.len()].copy_from_slice(text);
        e.len = text.len() as u8;
        e
    }

    #[test]
    fn test_format_log_entry() {
        let mut buf = [0u8; FORMAT_BUF_LEN];
        let len = format_log_entry(&entry(LogLevel::Debug, b"RCV: R:O,L"), &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert_eq!(formatted, "[   1234567] DEBUG: RCV: R:O,L\n");
    }

    #[test]
    fn test_format_truncated_message() {
        let mut e = entry(LogLevel::Error, b"TEST12345X");
        e.len = 5;

        let mut buf = [0u8; FORMAT_BUF_LEN];
        let len = format_log_entry(&e, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("TEST1"));
        assert!(!formatted.contains('X'));
    }

    #[test]
    fn test_dropped_report() {
        let mut buf = [0u8; 64];
        assert_eq!(format_dropped_report(0, 0, &mut buf), 0);

        let len = format_dropped_report(3, 0, &mut buf);
        assert_eq!(&buf[..len], b"[WARN] Dropped: RX=3, LOOP=0\n");
    }

    #[test]
    fn test_drain_stream_writes_in_order() {
        let stream: LogStream<8> = LogStream::new();
        stream.push(1, LogLevel::Info, b"one");
        stream.push(2, LogLevel::Warn, b"two");

        let mut out = Vec::new();
        assert!(drain_stream(&stream, |bytes| out.extend_from_slice(bytes)));
        let text = String::from_utf8(out).unwrap();
        assert!(text.find("one").unwrap() < text.find("two").unwrap());
        assert!(!drain_stream(&stream, |_| {}));
    }
}
