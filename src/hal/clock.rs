//! Monotonic clock on `esp_timer`.

use esp_idf_svc::hal::delay::{Ets, FreeRtos};
use esp_idf_svc::sys::configTICK_RATE_HZ;

use crate::drivers::{whole_ticks_within, Clock};

/// FreeRTOS tick period (µs).
const TICK_PERIOD_US: u32 = 1_000_000 / configTICK_RATE_HZ as u32;

/// Microseconds since boot.
#[inline]
pub fn now_us() -> i64 {
    // SAFETY: esp_timer_get_time has no preconditions once the timer service is up.
    unsafe { esp_idf_svc::sys::esp_timer_get_time() }
}

/// `Clock` over `esp_timer` with FreeRTOS/ets delays.
///
/// Whole ticks inside the wait are yielded to FreeRTOS; the remainder up to
/// the deadline is spun, so a wait is never shorter or tick-rounded.
#[derive(Debug, Default, Clone, Copy)]
pub struct EspClock;

impl Clock for EspClock {
    fn now_us(&self) -> i64 {
        now_us()
    }

    fn delay_us(&mut self, us: u32) {
        let deadline = now_us() + us as i64;

        let ticks = whole_ticks_within(us, TICK_PERIOD_US);
        if ticks > 0 {
            // Exact tick multiple: delay_ms does not round it up
            FreeRtos::delay_ms(ticks * TICK_PERIOD_US / 1000);
        }

        let remaining = deadline - now_us();
        if remaining > 0 {
            Ets::delay_us(remaining as u32);
        }
    }
}
