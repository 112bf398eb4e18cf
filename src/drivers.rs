//! Collaborator traits between the protocol core and the hardware.
//!
//! Business logic stays in core modules, drivers are just I/O.
//! Target implementations live in `hal`; tests use recording mocks.

use crate::space::{BarrierTarget, SpaceState};

/// Raw occupancy input, one line per space.
pub trait SensorInput {
    /// Current raw level of the sensor of `space` (true = something present).
    fn is_occupied(&mut self, space: usize) -> bool;
}

/// Per-space status indicator (one of 4 lamps lit).
pub trait IndicatorDriver {
    fn show(&mut self, space: usize, state: SpaceState);
}

/// Entry barrier outputs.
pub trait BarrierDriver {
    /// Aggregate gate: closed while any space is reserved.
    ///
    /// Installations without a shared gate leave this as a no-op.
    fn set_gate(&mut self, _target: BarrierTarget) {}

    /// Emit one servo pulse of `width_us` for the barrier of `space`.
    ///
    /// Called once per loop iteration per space; must not hold the line
    /// longer than the pulse itself.
    fn pulse(&mut self, space: usize, width_us: u16);
}

/// Outbound byte stream to the host.
pub trait FrameSink {
    /// Write a whole frame. Returns `false` if it could not be sent;
    /// callers do not retry.
    fn send(&mut self, frame: &[u8]) -> bool;
}

/// Monotonic time and timed waits.
pub trait Clock {
    /// Microseconds since boot.
    fn now_us(&self) -> i64;

    /// Wait `us` microseconds.
    fn delay_us(&mut self, us: u32);

    /// Wait `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32) {
        self.delay_us(ms.saturating_mul(1000));
    }

    /// Wait until `deadline_us`; returns at once if it already passed.
    fn sleep_until(&mut self, deadline_us: i64) {
        let remaining = deadline_us - self.now_us();
        if remaining > 0 {
            self.delay_us(remaining.min(u32::MAX as i64) as u32);
        }
    }
}

/// Whole scheduler ticks that fit inside a `wait_us` wait.
///
/// A tick delay of `n` ends anywhere in `((n - 1) * tick, n * tick]`, so
/// yielding this many ticks never overshoots; the caller spins the rest.
pub const fn whole_ticks_within(wait_us: u32, tick_us: u32) -> u32 {
    if tick_us == 0 {
        return 0;
    }
    wait_us / tick_us
}

/// Barrier driver for installations without barriers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBarriers;

impl BarrierDriver for NoBarriers {
    fn pulse(&mut self, _space: usize, _width_us: u16) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_round_down() {
        // 10 ms debounce on a 100 Hz tick: a single tick delay, then spin
        assert_eq!(whole_ticks_within(9_999, 10_000), 0);
        assert_eq!(whole_ticks_within(10_000, 10_000), 1);
        assert_eq!(whole_ticks_within(19_999, 10_000), 1);
    }

    #[test]
    fn test_yielded_ticks_never_exceed_wait() {
        for tick_us in [1_000, 4_000, 10_000] {
            for wait_us in (0..100_000).step_by(1_250) {
                assert!(whole_ticks_within(wait_us, tick_us) * tick_us <= wait_us);
            }
        }
    }

    #[test]
    fn test_zero_tick_period_spins_only() {
        assert_eq!(whole_ticks_within(50_000, 0), 0);
    }
}
