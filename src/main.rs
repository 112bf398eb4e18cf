//! ParkingMonitor - Main entry point
//!
//! 1. Load configuration from NVS (defaults on first boot)
//! 2. Start the log UART drain task
//! 3. Start the protocol RX task
//! 4. Run the scheduler loop on the main task, forever

#[cfg(target_os = "espidf")]
mod firmware {
    use esp_idf_svc::hal::gpio::{
        AnyIOPin, AnyOutputPin, IOPin, Input, Output, OutputPin, PinDriver,
    };
    use esp_idf_svc::hal::prelude::Peripherals;

    use parking_monitor::config::nvs::{load_config_from_nvs, MigrationResult};
    use parking_monitor::hal::{
        init_protocol_uart, rx_task, EspClock, HalError, IndicatorPins, SensorPins, ServoPins,
        UartSink,
    };
    use parking_monitor::hal::clock::now_us;
    use parking_monitor::uart_logger::{init_uart_logger, uart_logger_task, UartLoggerConfig};
    use parking_monitor::{
        log_error, log_info, log_warn, Controller, Drivers, LineSlot, LinkStats, MonitorConfig,
        LOOP_LOG_STREAM, RX_LOG_STREAM,
    };

    /// Line handoff between the RX task and the scheduler loop.
    static RX_SLOT: LineSlot = LineSlot::new();
    static LINK_STATS: LinkStats = LinkStats::new();

    const RX_TASK_STACK: usize = 4096;
    const LOG_TASK_STACK: usize = 4096;

    pub fn main() {
        esp_idf_svc::sys::link_patches();

        if let Err(e) = run() {
            println!("{}: startup failed: {}", env!("VERSION_STRING"), e);
        }
    }

    fn load_config() -> MonitorConfig {
        match load_config_from_nvs() {
            Ok((config, MigrationResult::FreshInstall)) => {
                log_info!(LOOP_LOG_STREAM, now_us(), "config: fresh install, defaults");
                config
            }
            Ok((config, MigrationResult::UpToDate)) => config,
            Ok((config, MigrationResult::Migrated { from_version, to_version })) => {
                log_info!(
                    LOOP_LOG_STREAM,
                    now_us(),
                    "config: migrated v{} -> v{}",
                    from_version,
                    to_version
                );
                config
            }
            Err(e) => {
                log_error!(LOOP_LOG_STREAM, now_us(), "config: {:?}, using defaults", e);
                MonitorConfig::DEFAULT
            }
        }
    }

    fn input(pin: AnyIOPin) -> Result<PinDriver<'static, AnyIOPin, Input>, HalError> {
        PinDriver::input(pin).map_err(HalError::Gpio)
    }

    fn output(pin: AnyOutputPin) -> Result<PinDriver<'static, AnyOutputPin, Output>, HalError> {
        PinDriver::output(pin).map_err(HalError::Gpio)
    }

    fn run() -> Result<(), HalError> {
        let peripherals = Peripherals::take().map_err(HalError::Gpio)?;
        let pins = peripherals.pins;

        let config = load_config();
        LOOP_LOG_STREAM.set_level(config.timing.log_level);
        RX_LOG_STREAM.set_level(config.timing.log_level);

        let mut log_uart =
            init_uart_logger(peripherals.uart1, pins.gpio17, &UartLoggerConfig::default())
                .map_err(HalError::Uart)?;

        let mut protocol_uart = init_protocol_uart(peripherals.uart2, pins.gpio9, pins.gpio10)?;
        let (tx, rx) = protocol_uart.split();

        let sensors = SensorPins::new(
            [
                input(pins.gpio1.downgrade())?,
                input(pins.gpio2.downgrade())?,
                input(pins.gpio3.downgrade())?,
                input(pins.gpio4.downgrade())?,
            ],
            false,
        );
        let barriers = ServoPins::new([
            output(pins.gpio5.downgrade_output())?,
            output(pins.gpio6.downgrade_output())?,
            output(pins.gpio7.downgrade_output())?,
            output(pins.gpio8.downgrade_output())?,
        ]);
        let indicators = IndicatorPins::new([
            [
                output(pins.gpio11.downgrade_output())?,
                output(pins.gpio12.downgrade_output())?,
                output(pins.gpio13.downgrade_output())?,
                output(pins.gpio14.downgrade_output())?,
            ],
            [
                output(pins.gpio15.downgrade_output())?,
                output(pins.gpio16.downgrade_output())?,
                output(pins.gpio18.downgrade_output())?,
                output(pins.gpio21.downgrade_output())?,
            ],
            [
                output(pins.gpio38.downgrade_output())?,
                output(pins.gpio39.downgrade_output())?,
                output(pins.gpio40.downgrade_output())?,
                output(pins.gpio41.downgrade_output())?,
            ],
            [
                output(pins.gpio42.downgrade_output())?,
                output(pins.gpio45.downgrade_output())?,
                output(pins.gpio47.downgrade_output())?,
                output(pins.gpio48.downgrade_output())?,
            ],
        ]);

        log_info!(LOOP_LOG_STREAM, now_us(), "{}", env!("VERSION_STRING"));

        std::thread::scope(|s| -> Result<(), HalError> {
            let log_spawn = std::thread::Builder::new()
                .stack_size(LOG_TASK_STACK)
                .spawn_scoped(s, move || uart_logger_task(&mut log_uart));
            if let Err(e) = log_spawn {
                println!("log task not started: {}", e);
            }

            let link = config.link;
            let rx_spawn = std::thread::Builder::new()
                .stack_size(RX_TASK_STACK)
                .spawn_scoped(s, move || rx_task(&rx, &RX_SLOT, &LINK_STATS, link));
            if rx_spawn.is_err() {
                log_warn!(LOOP_LOG_STREAM, now_us(), "rx task not started, commands disabled");
            }

            let drivers = Drivers {
                sensors,
                indicators,
                barriers,
                sink: UartSink::new(tx),
                clock: EspClock,
            };
            let mut controller: Controller<'_, _, _, _, _, _> =
                Controller::new(config, &RX_SLOT, &LINK_STATS, &LOOP_LOG_STREAM, drivers);
            controller.start();
            controller.run()
        })
    }
}

#[cfg(target_os = "espidf")]
fn main() {
    firmware::main();
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    println!("{}: firmware image, build for target_os = \"espidf\"", env!("VERSION_STRING"));
}
