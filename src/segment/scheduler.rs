//! Double-buffered segment scheduler.

use crate::error::SegmentError;
use crate::stepgen::RegisterLayout;

use super::command::{Segment, SegmentCommand, NO_DEADLINE};

/// Two-slot pipeline feeding the velocity ramp.
///
/// The host stages a [`SegmentCommand`]; once the wall clock reaches its
/// apply time the first segment becomes active and the second is held until
/// `first_duration` ticks later. At most one command waits for its apply
/// time, and staging another one before it is taken is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentScheduler {
    active: Segment,
    staged: Option<Segment>,
    pending: Option<SegmentCommand>,
    apply_time2: u64,
}

impl SegmentScheduler {
    /// A scheduler holding the rest segment and nothing queued.
    pub fn new(layout: &RegisterLayout) -> Self {
        Self {
            active: Segment::rest(layout),
            staged: None,
            pending: None,
            apply_time2: NO_DEADLINE,
        }
    }

    /// Segment currently driving the ramp.
    #[inline]
    pub fn active(&self) -> Segment {
        self.active
    }

    /// Second segment waiting for `apply_time2`.
    #[inline]
    pub fn staged(&self) -> Option<Segment> {
        self.staged
    }

    /// Command waiting for its apply time.
    #[inline]
    pub fn pending(&self) -> Option<&SegmentCommand> {
        self.pending.as_ref()
    }

    /// Apply time of the staged second segment, or [`NO_DEADLINE`].
    #[inline]
    pub fn apply_time2(&self) -> u64 {
        self.apply_time2
    }

    /// `true` if a new command can be staged.
    #[inline]
    pub fn can_stage(&self) -> bool {
        self.pending.is_none()
    }

    /// Stage a command for its apply time.
    ///
    /// A command taking effect while a second segment is still staged
    /// replaces that segment.
    ///
    /// # Errors
    ///
    /// - `SegmentError::PipelineFull` if a command is already waiting
    /// - `SegmentError::OutOfRange` if a value does not fit the velocity register
    pub fn stage(
        &mut self,
        command: SegmentCommand,
        layout: &RegisterLayout,
    ) -> Result<(), SegmentError> {
        if let Some(pending) = &self.pending {
            return Err(SegmentError::PipelineFull {
                pending_apply_time: pending.apply_time,
            });
        }
        command.first.check(layout)?;
        command.second.check(layout)?;
        self.pending = Some(command);
        Ok(())
    }

    /// Scheduler state for the next tick, given the sampled wall clock.
    #[must_use]
    pub fn next(&self, now: u64, reset: bool, layout: &RegisterLayout) -> Self {
        if reset {
            return Self::new(layout);
        }

        if let Some(command) = self.pending.filter(|c| now >= c.apply_time) {
            return Self {
                active: command.first,
                staged: Some(command.second),
                pending: None,
                apply_time2: command.second_apply_time(),
            };
        }

        match self.staged {
            Some(second) if now >= self.apply_time2 => Self {
                active: second,
                staged: None,
                pending: self.pending,
                apply_time2: NO_DEADLINE,
            },
            _ => *self,
        }
    }
}
