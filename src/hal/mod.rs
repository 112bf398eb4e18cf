//! Hardware Abstraction Layer for ParkingMonitor.
//!
//! Thin wrappers around ESP-IDF peripherals implementing the `drivers`
//! traits. Business logic stays in core modules, HAL is just I/O.

pub mod clock;
pub mod gpio;
pub mod uart;

pub use clock::EspClock;
pub use gpio::{IndicatorPins, SensorPins, ServoPins};
pub use uart::{init_protocol_uart, rx_task, UartSink, PROTOCOL_BAUD};

use esp_idf_svc::sys::EspError;

/// HAL setup error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// E10: UART driver could not be installed
    Uart(EspError),
    /// E11: GPIO could not be configured
    Gpio(EspError),
}

impl HalError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Uart(_) => "E10",
            Self::Gpio(_) => "E11",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Uart(_) => "uart init failed",
            Self::Gpio(_) => "gpio init failed",
        }
    }
}

impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Uart(e) | Self::Gpio(e) => {
                write!(f, "{}: {} ({})", self.code(), self.message(), e)
            }
        }
    }
}
