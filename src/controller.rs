//! Module: controller
//!
//! Purpose: The cooperative scheduler loop of the monitor.
//!
//! Architecture:
//! - One `tick()` = drain line → poll sensors → report on change →
//!   report on heartbeat → pulse barriers → pace
//! - At most one line per tick; lines that arrive faster are coalesced
//!   in the `LineSlot`
//! - All hardware through `drivers` traits, all logging to one `LogStream`
//!   (this task is its only producer)
//!
//! Safety: Safe. No unsafe blocks.

use crate::config::MonitorConfig;
use crate::drivers::{BarrierDriver, Clock, FrameSink, IndicatorDriver, SensorInput};
use crate::link::{Line, LineSlot, RX_BUFFER_SIZE};
use crate::logging::LogStream;
use crate::protocol::{parse_command, CommandOutcome, StatusReporter};
use crate::sensor::read_debounced;
use crate::space::{BarrierTarget, Occupancy, SpaceState, NUM_SPACES};
use crate::stats::LinkStats;
use crate::store::StateStore;
use crate::{log_debug, log_info, log_warn};

/// Link statistics are logged every this many heartbeats (if anything was lost).
pub const STATS_EVERY_HEARTBEATS: u32 = 10;

/// Hardware collaborators of the loop.
pub struct Drivers<S, I, B, O, C> {
    pub sensors: S,
    pub indicators: I,
    pub barriers: B,
    pub sink: O,
    pub clock: C,
}

/// What one loop pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Outcome of the line drained this pass, if any.
    pub command: Option<CommandOutcome>,
    /// A status frame went out because a sensor changed.
    pub change_sent: bool,
    /// A status frame went out because the heartbeat was due.
    pub heartbeat_sent: bool,
}

/// Scheduler loop state.
///
/// Owns the state store and reporter; borrows the line slot and counters it
/// shares with the receive task.
pub struct Controller<
    'a,
    S,
    I,
    B,
    O,
    C,
    const N: usize = NUM_SPACES,
    const CAP: usize = RX_BUFFER_SIZE,
> {
    config: MonitorConfig,
    slot: &'a LineSlot<CAP>,
    stats: &'a LinkStats,
    log: &'a LogStream,
    store: StateStore<N>,
    reporter: StatusReporter<N>,
    drivers: Drivers<S, I, B, O, C>,
    /// Private copy of the consumed line; parsing never touches the slot.
    line: Line<CAP>,
    heartbeats: u32,
    next_tick_us: i64,
}

impl<'a, S, I, B, O, C, const N: usize, const CAP: usize> Controller<'a, S, I, B, O, C, N, CAP>
where
    S: SensorInput,
    I: IndicatorDriver,
    B: BarrierDriver,
    O: FrameSink,
    C: Clock,
{
    pub fn new(
        config: MonitorConfig,
        slot: &'a LineSlot<CAP>,
        stats: &'a LinkStats,
        log: &'a LogStream,
        drivers: Drivers<S, I, B, O, C>,
    ) -> Self {
        let now = drivers.clock.now_us();
        Self {
            config,
            slot,
            stats,
            log,
            store: StateStore::new(),
            reporter: StatusReporter::new(config.reporter, [Occupancy::Free; N], now),
            drivers,
            line: Line::new(),
            heartbeats: 0,
            next_tick_us: now,
        }
    }

    /// Startup sequence: all indicators Free, baseline sensor read, one
    /// status frame. Call once before the first `tick()`.
    pub fn start(&mut self) {
        for space in 0..N {
            self.drivers.indicators.show(space, SpaceState::Free);
        }
        self.drivers.barriers.set_gate(BarrierTarget::Open);

        self.poll_sensors();
        let physical = self.store.physical_snapshot();
        let now = self.drivers.clock.now_us();
        self.reporter = StatusReporter::new(self.config.reporter, physical, now);
        if self.reporter.send_status(&physical, &mut self.drivers.sink) {
            self.stats.record_frame_sent();
        }
        self.next_tick_us = now;

        log_info!(
            self.log,
            now,
            "monitor started: {} spaces, period {} ms",
            N,
            self.config.timing.period_ms
        );
    }

    /// One pass of the loop, paced to `period_ms`.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport {
            command: self.drain_line(),
            ..TickReport::default()
        };

        self.poll_sensors();
        let physical = self.store.physical_snapshot();

        report.change_sent = self.reporter.report_on_change(&physical, &mut self.drivers.sink);
        if report.change_sent {
            self.stats.record_frame_sent();
        }

        let now = self.drivers.clock.now_us();
        report.heartbeat_sent =
            self.reporter.report_on_heartbeat(now, &physical, &mut self.drivers.sink);
        if report.heartbeat_sent {
            self.stats.record_frame_sent();
            self.heartbeats = self.heartbeats.wrapping_add(1);
            if self.heartbeats % STATS_EVERY_HEARTBEATS == 0 {
                self.log_stats(now);
            }
        }

        self.drive_barriers();
        self.pace();
        report
    }

    /// Run forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
        }
    }

    fn drain_line(&mut self) -> Option<CommandOutcome> {
        if !self.slot.take(&mut self.line) {
            return None;
        }

        let now = self.drivers.clock.now_us();
        log_debug!(self.log, now, "RCV: {}", self.line.as_bytes().escape_ascii());

        let outcome = parse_command(
            self.line.as_bytes(),
            &mut self.store,
            &mut self.drivers.indicators,
            &mut self.drivers.barriers,
            &self.config.parser,
        );

        match outcome {
            CommandOutcome::Applied { spaces, any_reserved } => {
                self.stats.record_applied();
                log_info!(
                    self.log,
                    now,
                    "applied {} spaces, gate {}",
                    spaces,
                    if any_reserved { "closed" } else { "open" }
                );
                if self.reporter.send_ack(&mut self.drivers.sink) {
                    self.stats.record_frame_sent();
                }
            }
            CommandOutcome::Rejected(reason) => {
                self.stats.record_rejected();
                log_warn!(self.log, now, "line rejected: {}", reason);
            }
        }
        Some(outcome)
    }

    fn poll_sensors(&mut self) {
        let debounce_ms = self.config.timing.debounce_ms;
        for space in 0..N {
            let occupancy = read_debounced(
                &mut self.drivers.sensors,
                &mut self.drivers.clock,
                space,
                debounce_ms,
            );
            self.store.set_physical(space, occupancy);
        }
    }

    fn drive_barriers(&mut self) {
        let timing = &self.config.timing;
        for (space, target) in self.store.barrier_snapshot().iter().enumerate() {
            let width_us = match target {
                BarrierTarget::Open => timing.servo_open_us,
                BarrierTarget::Closed => timing.servo_closed_us,
            };
            self.drivers.barriers.pulse(space, width_us);
        }
    }

    /// Sleep to the next period boundary. An overrun restarts the schedule
    /// from now instead of bursting to catch up.
    fn pace(&mut self) {
        let period_us = self.config.timing.period_ms as i64 * 1000;
        let now = self.drivers.clock.now_us();
        let mut deadline = self.next_tick_us + period_us;
        if deadline < now {
            deadline = now;
        }
        self.drivers.clock.sleep_until(deadline);
        self.next_tick_us = deadline;
    }

    fn log_stats(&self, now: i64) {
        let s = self.stats.snapshot();
        if !s.has_losses() {
            return;
        }
        log_warn!(
            self.log,
            now,
            "link: {} overflows, {} overwritten, {} rejected, {} applied",
            s.overflows,
            s.lines_overwritten,
            s.commands_rejected,
            s.commands_applied
        );
    }

    pub fn store(&self) -> &StateStore<N> {
        &self.store
    }

    pub fn reporter(&self) -> &StatusReporter<N> {
        &self.reporter
    }

    pub fn drivers(&self) -> &Drivers<S, I, B, O, C> {
        &self.drivers
    }

    pub fn drivers_mut(&mut self) -> &mut Drivers<S, I, B, O, C> {
        &mut self.drivers
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Heartbeat frames sent since start.
    pub fn heartbeats(&self) -> u32 {
        self.heartbeats
    }
}
