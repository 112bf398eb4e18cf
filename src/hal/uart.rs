//! Protocol UART: 9600 8N1, RX into the line assembler, TX for frames.

use esp_idf_svc::hal::delay::BLOCK;
use esp_idf_svc::hal::gpio::{self, AnyIOPin};
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, Uart, UartDriver, UartRxDriver, UartTxDriver};
use esp_idf_svc::hal::units::Hertz;

use crate::config::LinkConfig;
use crate::drivers::FrameSink;
use crate::link::{log_feed_event, LineAssembler, LineSlot};
use crate::log_globals::RX_LOG_STREAM;
use crate::log_warn;
use crate::stats::LinkStats;

use super::clock::now_us;
use super::HalError;

/// Wire speed of the host link.
pub const PROTOCOL_BAUD: u32 = 9600;

/// Bytes pulled from the UART FIFO per read.
const RX_CHUNK: usize = 32;

/// Install the protocol UART driver (8N1 is the driver default).
pub fn init_protocol_uart<'d, U: Uart>(
    uart: impl Peripheral<P = U> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    rx_pin: impl Peripheral<P = impl gpio::InputPin> + 'd,
) -> Result<UartDriver<'d>, HalError> {
    let config = uart::config::Config::default().baudrate(Hertz(PROTOCOL_BAUD));

    UartDriver::new(
        uart,
        tx_pin,
        rx_pin,
        Option::<AnyIOPin>::None, // CTS
        Option::<AnyIOPin>::None, // RTS
        &config,
    )
    .map_err(HalError::Uart)
}

/// Status frames out through the UART TX half.
pub struct UartSink<'d> {
    tx: UartTxDriver<'d>,
}

impl<'d> UartSink<'d> {
    pub fn new(tx: UartTxDriver<'d>) -> Self {
        Self { tx }
    }
}

impl FrameSink for UartSink<'_> {
    fn send(&mut self, frame: &[u8]) -> bool {
        matches!(self.tx.write(frame), Ok(n) if n == frame.len())
    }
}

/// Receive task: feeds every byte to the assembler.
///
/// Sole producer of `slot` and of `RX_LOG_STREAM`.
pub fn rx_task<const CAP: usize>(
    rx: &UartRxDriver<'_>,
    slot: &LineSlot<CAP>,
    stats: &LinkStats,
    config: LinkConfig,
) -> ! {
    let mut assembler = LineAssembler::<CAP>::new(config);
    let mut buf = [0u8; RX_CHUNK];

    loop {
        match rx.read(&mut buf, BLOCK) {
            Ok(n) => {
                for &byte in &buf[..n] {
                    let event = assembler.feed(byte, slot, stats);
                    log_feed_event(&RX_LOG_STREAM, now_us(), event);
                }
            }
            Err(e) => {
                log_warn!(RX_LOG_STREAM, now_us(), "uart read failed: {}", e);
                assembler.reset();
            }
        }
    }
}
