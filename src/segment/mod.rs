//! Segment module for stepgen-dds.
//!
//! Lets the host pre-load two consecutive velocity/acceleration segments with
//! an apply time, so the generator switches between them without a gap.

mod command;
mod scheduler;

pub use command::{Segment, SegmentCommand, NO_DEADLINE};
pub use scheduler::SegmentScheduler;
