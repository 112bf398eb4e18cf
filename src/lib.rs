//! # ParkingMonitor
//!
//! Parking-space monitor firmware: serial line protocol with a remote
//! controller, occupancy sensors, indicator lamps and barrier servos.
//!
//! ## Architecture
//!
//! ```text
//! UART RX task                         Scheduler loop (Controller)
//! ────────────                         ───────────────────────────
//! bytes ─▶ LineAssembler ─▶ LineSlot ─▶ parse_command ─▶ StateStore ─▶ indicators, barriers
//!                                       sensors ──────▶ StateStore ─▶ StatusReporter ─▶ UART TX
//! ```
//!
//! - The RX task and the loop share only the `LineSlot` and `LinkStats`
//!   (both lock-free)
//! - The loop owns all state; hardware is reached through `drivers` traits
//! - Logging goes to per-producer `LogStream`s drained on a separate UART

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod controller;
pub mod drivers;
pub mod link;
pub mod log_globals;
pub mod logging;
pub mod protocol;
pub mod sensor;
pub mod space;
pub mod stats;
pub mod store;
pub mod uart_logger;

#[cfg(target_os = "espidf")]
pub mod hal;

pub use config::MonitorConfig;
pub use controller::{Controller, Drivers, TickReport};
pub use link::{LineAssembler, LineSlot};
pub use log_globals::{LOOP_LOG_STREAM, RX_LOG_STREAM};
pub use protocol::{parse_command, CommandOutcome, StatusReporter};
pub use space::{BarrierTarget, Occupancy, SpaceState, NUM_SPACES};
pub use stats::LinkStats;
pub use store::StateStore;
