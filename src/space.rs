//! Module: space
//!
//! Purpose: Per-space state types and their wire codes.
//!
//! Architecture:
//! - `Occupancy`: what the sensor sees (Free/Occupied)
//! - `SpaceState`: what the host asserts (Free/Occupied/Reserved/Maintenance)
//! - `BarrierTarget`: where a barrier servo should go
//!
//! Safety: Safe. No unsafe blocks. Copy types only.

/// Default number of monitored spaces.
pub const NUM_SPACES: usize = 4;

/// Sensed occupancy of a single space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Occupancy {
    #[default]
    Free,
    Occupied,
}

impl Occupancy {
    /// Letter code used in `S:` status frames.
    #[inline]
    pub const fn letter(self) -> u8 {
        match self {
            Occupancy::Free => b'L',
            Occupancy::Occupied => b'O',
        }
    }

    /// Digit code used in `#,...;` status frames.
    #[inline]
    pub const fn digit(self) -> u8 {
        match self {
            Occupancy::Free => b'0',
            Occupancy::Occupied => b'1',
        }
    }

    /// Map a raw (already debounced) sensor level.
    #[inline]
    pub const fn from_level(occupied: bool) -> Self {
        if occupied {
            Occupancy::Occupied
        } else {
            Occupancy::Free
        }
    }
}

/// Authoritative state of a space, as asserted by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SpaceState {
    #[default]
    Free = 0,
    Occupied = 1,
    Reserved = 2,
    Maintenance = 3,
}

impl SpaceState {
    /// All states, in indicator order.
    pub const ALL: [SpaceState; 4] = [
        SpaceState::Free,
        SpaceState::Occupied,
        SpaceState::Reserved,
        SpaceState::Maintenance,
    ];

    /// Decode a letter code (`L`, `O`, `R`, `M`).
    #[inline]
    pub const fn from_letter(c: u8) -> Option<Self> {
        match c {
            b'L' => Some(SpaceState::Free),
            b'O' => Some(SpaceState::Occupied),
            b'R' => Some(SpaceState::Reserved),
            b'M' => Some(SpaceState::Maintenance),
            _ => None,
        }
    }

    /// Decode a digit code (`0`..`3`).
    #[inline]
    pub const fn from_digit(c: u8) -> Option<Self> {
        match c {
            b'0' => Some(SpaceState::Free),
            b'1' => Some(SpaceState::Occupied),
            b'2' => Some(SpaceState::Reserved),
            b'3' => Some(SpaceState::Maintenance),
            _ => None,
        }
    }

    /// Letter code for this state.
    #[inline]
    pub const fn letter(self) -> u8 {
        match self {
            SpaceState::Free => b'L',
            SpaceState::Occupied => b'O',
            SpaceState::Reserved => b'R',
            SpaceState::Maintenance => b'M',
        }
    }

    /// Which of the 4 indicator lines of a space is lit for this state.
    #[inline]
    pub const fn indicator_index(self) -> usize {
        self as usize
    }

    /// Barrier side effect of asserting this state on a space.
    ///
    /// Free opens, Reserved closes, the rest leave the barrier alone.
    #[inline]
    pub const fn barrier_effect(self) -> Option<BarrierTarget> {
        match self {
            SpaceState::Free => Some(BarrierTarget::Open),
            SpaceState::Reserved => Some(BarrierTarget::Closed),
            SpaceState::Occupied | SpaceState::Maintenance => None,
        }
    }
}

/// Target position of a barrier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BarrierTarget {
    #[default]
    Open,
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_codes_roundtrip() {
        for state in SpaceState::ALL {
            assert_eq!(SpaceState::from_letter(state.letter()), Some(state));
        }
        assert_eq!(SpaceState::from_letter(b'X'), None);
        assert_eq!(SpaceState::from_letter(b'l'), None);
    }

    #[test]
    fn test_digit_codes() {
        assert_eq!(SpaceState::from_digit(b'2'), Some(SpaceState::Reserved));
        assert_eq!(SpaceState::from_digit(b'4'), None);
    }

    #[test]
    fn test_barrier_effect() {
        assert_eq!(SpaceState::Free.barrier_effect(), Some(BarrierTarget::Open));
        assert_eq!(SpaceState::Reserved.barrier_effect(), Some(BarrierTarget::Closed));
        assert_eq!(SpaceState::Occupied.barrier_effect(), None);
        assert_eq!(SpaceState::Maintenance.barrier_effect(), None);
    }

    #[test]
    fn test_occupancy_codes() {
        assert_eq!(Occupancy::Free.letter(), b'L');
        assert_eq!(Occupancy::Occupied.letter(), b'O');
        assert_eq!(Occupancy::Occupied.digit(), b'1');
        assert_eq!(Occupancy::from_level(true), Occupancy::Occupied);
    }
}
