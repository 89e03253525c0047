//! Stepgen core: the per-tick update of one step/direction generator.
//!
//! Each component exposes a pure `next` function computing its registers
//! for the next tick from the previous committed state, and [`Stepgen`]
//! commits all of them at once.

mod accumulator;
mod arbiter;
mod counter;
mod direction;
mod generator;
mod ramp;
mod register;

pub use accumulator::{AccumulatorInputs, PositionAccumulator};
pub use arbiter::{ArbiterInputs, DirectionArbiter};
pub use counter::DownCounter;
pub use direction::Direction;
pub use generator::{Stepgen, StepgenOutputs, StepgenState, StepgenStatus, TickInputs};
pub use ramp::{RampInputs, VelocityRamp};
pub use register::RegisterLayout;
