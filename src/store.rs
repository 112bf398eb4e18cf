//! Per-space state store.
//!
//! Owns the `physical`, `final` and `barrier` arrays. Only the main loop
//! touches it, so it is a plain struct passed by `&mut`.
//!
//! Writers:
//! - `physical`: sensor polling only
//! - `final` / `barrier`: command parser only

use crate::space::{BarrierTarget, Occupancy, SpaceState, NUM_SPACES};

/// State of all monitored spaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateStore<const N: usize = NUM_SPACES> {
    physical: [Occupancy; N],
    final_state: [SpaceState; N],
    barrier: [BarrierTarget; N],
}

impl<const N: usize> StateStore<N> {
    /// All spaces Free, all barriers Open.
    pub const fn new() -> Self {
        Self {
            physical: [Occupancy::Free; N],
            final_state: [SpaceState::Free; N],
            barrier: [BarrierTarget::Open; N],
        }
    }

    /// Number of spaces.
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    #[inline]
    pub fn physical(&self, space: usize) -> Option<Occupancy> {
        self.physical.get(space).copied()
    }

    /// Set sensed occupancy. Returns `true` if the value changed.
    ///
    /// Out-of-range indices are ignored.
    #[inline]
    pub fn set_physical(&mut self, space: usize, value: Occupancy) -> bool {
        match self.physical.get_mut(space) {
            Some(slot) if *slot != value => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn final_state(&self, space: usize) -> Option<SpaceState> {
        self.final_state.get(space).copied()
    }

    /// Set the host-asserted state. Out-of-range indices are ignored.
    #[inline]
    pub fn set_final(&mut self, space: usize, value: SpaceState) {
        if let Some(slot) = self.final_state.get_mut(space) {
            *slot = value;
        }
    }

    #[inline]
    pub fn barrier(&self, space: usize) -> Option<BarrierTarget> {
        self.barrier.get(space).copied()
    }

    #[inline]
    pub fn set_barrier(&mut self, space: usize, value: BarrierTarget) {
        if let Some(slot) = self.barrier.get_mut(space) {
            *slot = value;
        }
    }

    /// Copy of the sensed occupancy of every space.
    #[inline]
    pub fn physical_snapshot(&self) -> [Occupancy; N] {
        self.physical
    }

    /// Copy of the host-asserted state of every space.
    #[inline]
    pub fn final_snapshot(&self) -> [SpaceState; N] {
        self.final_state
    }

    #[inline]
    pub fn barrier_snapshot(&self) -> [BarrierTarget; N] {
        self.barrier
    }

    /// True if any space is currently Reserved.
    #[inline]
    pub fn any_reserved(&self) -> bool {
        self.final_state.iter().any(|s| *s == SpaceState::Reserved)
    }
}

impl<const N: usize> Default for StateStore<N> {
    fn default() -> Self {
        Self::new()
    }
}
