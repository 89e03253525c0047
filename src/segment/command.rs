//! Segment values written by the host.

use crate::error::SegmentError;
use crate::stepgen::RegisterLayout;

/// Apply time meaning "no second segment pending".
pub const NO_DEADLINE: u64 = u64::MAX;

/// One (target velocity, acceleration limit) pair in raw register units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Segment {
    /// Bias-encoded target velocity.
    pub target: u64,
    /// Maximum velocity change per tick; 0 jumps straight to the target.
    pub limit: u64,
}

impl Segment {
    /// Create a segment from raw register values.
    pub const fn new(target: u64, limit: u64) -> Self {
        Self { target, limit }
    }

    /// Zero velocity, no acceleration limit.
    pub fn rest(layout: &RegisterLayout) -> Self {
        Self::new(layout.bias(), 0)
    }

    /// Check both values fit the velocity register.
    pub fn check(&self, layout: &RegisterLayout) -> Result<(), SegmentError> {
        for value in [self.target, self.limit] {
            if !layout.fits_velocity(value) {
                return Err(SegmentError::OutOfRange {
                    value,
                    width: layout.velocity_width(),
                });
            }
        }
        Ok(())
    }
}

/// A pair of consecutive segments with the time the first one takes effect.
///
/// The second segment follows `first_duration` ticks after `apply_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentCommand {
    /// Segment applied at `apply_time`.
    pub first: Segment,
    /// Segment applied once `first` has run for `first_duration` ticks.
    pub second: Segment,
    /// Wall-clock time at which `first` becomes active.
    pub apply_time: u64,
    /// Ticks between the two segments.
    pub first_duration: u64,
}

impl SegmentCommand {
    /// A command that switches to `segment` at `apply_time` and stays there.
    pub fn single(segment: Segment, apply_time: u64) -> Self {
        Self {
            first: segment,
            second: segment,
            apply_time,
            first_duration: 0,
        }
    }

    /// Apply time of the second segment.
    #[inline]
    pub fn second_apply_time(&self) -> u64 {
        self.apply_time.saturating_add(self.first_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PickOff;

    #[test]
    fn test_check_rejects_values_above_width() {
        let layout = RegisterLayout::new(PickOff::new(28, 28, 28).unwrap());
        assert!(Segment::new(0xFFFF_FFFF, 0).check(&layout).is_ok());
        assert_eq!(
            Segment::new(0x8000_0000, 1 << 32).check(&layout),
            Err(SegmentError::OutOfRange {
                value: 1 << 32,
                width: 32
            })
        );
    }

    #[test]
    fn test_second_apply_time_saturates() {
        let cmd = SegmentCommand {
            first: Segment::new(0, 0),
            second: Segment::new(0, 0),
            apply_time: u64::MAX - 1,
            first_duration: 10,
        };
        assert_eq!(cmd.second_apply_time(), NO_DEADLINE);
    }
}
