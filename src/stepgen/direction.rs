//! Direction of travel and the DIR output level.

/// Direction of motion, as carried by the velocity flag and the DIR output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Increasing position; DIR high.
    ///
    /// Logical zero velocity carries this flag, so a generator at rest
    /// points forward.
    #[default]
    Forward,
    /// Decreasing position; DIR low.
    Reverse,
}

impl Direction {
    /// Direction from the velocity flag bit (1 = forward).
    #[inline]
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// Level of the DIR output for this direction.
    #[inline]
    pub fn is_high(self) -> bool {
        matches!(self, Direction::Forward)
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}
