//! GPIO HAL for occupancy sensors, indicator lamps and barrier servos.

use esp_idf_svc::hal::delay::Ets;
use esp_idf_svc::hal::gpio::{AnyIOPin, AnyOutputPin, Input, Output, PinDriver};

use crate::drivers::{BarrierDriver, IndicatorDriver, SensorInput};
use crate::space::{SpaceState, NUM_SPACES};

/// Occupancy sensors, one digital input per space.
pub struct SensorPins<'d, const N: usize = NUM_SPACES> {
    pins: [PinDriver<'d, AnyIOPin, Input>; N],
    active_low: bool,
}

impl<'d, const N: usize> SensorPins<'d, N> {
    pub fn new(pins: [PinDriver<'d, AnyIOPin, Input>; N], active_low: bool) -> Self {
        Self { pins, active_low }
    }
}

impl<const N: usize> SensorInput for SensorPins<'_, N> {
    fn is_occupied(&mut self, space: usize) -> bool {
        self.pins
            .get(space)
            .map(|pin| pin.is_high() != self.active_low)
            .unwrap_or(false)
    }
}

/// Four lamps per space (Free, Occupied, Reserved, Maintenance), one lit.
pub struct IndicatorPins<'d, const N: usize = NUM_SPACES> {
    pins: [[PinDriver<'d, AnyOutputPin, Output>; 4]; N],
}

impl<'d, const N: usize> IndicatorPins<'d, N> {
    pub fn new(pins: [[PinDriver<'d, AnyOutputPin, Output>; 4]; N]) -> Self {
        Self { pins }
    }
}

impl<const N: usize> IndicatorDriver for IndicatorPins<'_, N> {
    fn show(&mut self, space: usize, state: SpaceState) {
        let Some(lamps) = self.pins.get_mut(space) else {
            return;
        };
        for (i, lamp) in lamps.iter_mut().enumerate() {
            // Output writes on a configured pin do not fail
            let _ = if i == state.indicator_index() {
                lamp.set_high()
            } else {
                lamp.set_low()
            };
        }
    }
}

/// Barrier servos, one signal line per space.
///
/// Each call to `pulse` emits a single high pulse; the loop period supplies
/// the frame spacing.
pub struct ServoPins<'d, const N: usize = NUM_SPACES> {
    pins: [PinDriver<'d, AnyOutputPin, Output>; N],
}

impl<'d, const N: usize> ServoPins<'d, N> {
    pub fn new(pins: [PinDriver<'d, AnyOutputPin, Output>; N]) -> Self {
        Self { pins }
    }
}

impl<const N: usize> BarrierDriver for ServoPins<'_, N> {
    fn pulse(&mut self, space: usize, width_us: u16) {
        let Some(pin) = self.pins.get_mut(space) else {
            return;
        };
        let _ = pin.set_high();
        Ets::delay_us(width_us as u32);
        let _ = pin.set_low();
    }
}
