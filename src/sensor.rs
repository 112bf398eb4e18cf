//! Debounced occupancy reads.

use crate::drivers::{Clock, SensorInput};
use crate::space::Occupancy;

/// Read one space with debounce.
///
/// A "present" level only counts if it is still present after
/// `debounce_ms`; a "free" level is taken as is. This is the one place the
/// loop deliberately stalls.
pub fn read_debounced<S, C>(
    input: &mut S,
    clock: &mut C,
    space: usize,
    debounce_ms: u16,
) -> Occupancy
where
    S: SensorInput + ?Sized,
    C: Clock + ?Sized,
{
    if !input.is_occupied(space) {
        return Occupancy::Free;
    }
    clock.delay_ms(debounce_ms as u32);
    Occupancy::from_level(input.is_occupied(space))
}
