//! Position accumulator and the step bit it exposes.

use super::register::RegisterLayout;
use super::Direction;

/// Sampled inputs of the accumulator for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccumulatorInputs {
    /// Raw velocity register (previous tick).
    pub velocity: u64,
    /// Axis enable.
    pub enable: bool,
    /// Clear the position.
    pub reset: bool,
    /// A deferred step is pending; freeze the position.
    pub wait: bool,
}

/// Wide position register.
///
/// Besides the position it records the direction of the last velocity that
/// was integrated, which is the direction of any step edge the register
/// currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PositionAccumulator {
    position: u128,
    travel: Direction,
}

impl PositionAccumulator {
    /// An accumulator at position 0.
    pub const fn new() -> Self {
        Self {
            position: 0,
            travel: Direction::Forward,
        }
    }

    /// Raw position register, masked to its width.
    #[inline]
    pub fn raw(&self) -> u128 {
        self.position
    }

    /// Direction of the last integrated velocity.
    #[inline]
    pub fn travel(&self) -> Direction {
        self.travel
    }

    /// Current value of the step bit.
    #[inline]
    pub fn step_bit(&self, layout: &RegisterLayout) -> bool {
        layout.step_bit(self.position)
    }

    /// Position for the next tick.
    ///
    /// With `soft_stop`, integration continues while disabled so the ramp
    /// can bring the axis to rest; otherwise a disabled axis freezes and only
    /// the travel direction keeps tracking the velocity. A pending deferred
    /// step freezes both.
    #[must_use]
    pub fn next(&self, inputs: &AccumulatorInputs, soft_stop: bool, layout: &RegisterLayout) -> Self {
        if inputs.reset {
            return Self::new();
        }

        if inputs.wait {
            return *self;
        }
        if !(soft_stop || inputs.enable) {
            // Frozen, so no edge can appear; DIR may follow the velocity flag
            return Self {
                travel: layout.direction(inputs.velocity),
                ..*self
            };
        }

        Self {
            position: layout.advance_position(self.position, layout.debias(inputs.velocity)),
            travel: layout.direction(inputs.velocity),
        }
    }
}
