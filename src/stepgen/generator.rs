//! Top-level stepgen: one tick of the whole pipeline.

use crate::config::{PickOff, StepTiming, StepgenConfig};
use crate::error::SegmentError;
use crate::segment::{SegmentCommand, SegmentScheduler};

use super::accumulator::{AccumulatorInputs, PositionAccumulator};
use super::arbiter::{ArbiterInputs, DirectionArbiter};
use super::ramp::{RampInputs, VelocityRamp};
use super::register::RegisterLayout;
use super::Direction;

/// Inputs sampled once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickInputs {
    /// Axis enable.
    pub enable: bool,
    /// Abrupt stop: clears velocity, position and both segments.
    pub reset: bool,
    /// STEP/DIR timing in cycles.
    pub timing: StepTiming,
    /// Monotonic wall clock, compared against segment apply times.
    pub now: u64,
}

/// STEP and DIR output levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepgenOutputs {
    /// STEP level.
    pub step: bool,
    /// DIR state.
    pub dir: Direction,
}

/// Status readback of one generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepgenStatus {
    /// Position register without its fine bits.
    pub position: i64,
    /// Position in whole steps.
    pub steps: i64,
    /// Signed velocity, fraction bits included.
    pub velocity: i128,
    /// Apply time of the staged second segment.
    pub apply_time2: u64,
    /// Output levels.
    pub outputs: StepgenOutputs,
    /// A direction change is settling.
    pub hold_dds: bool,
    /// A step is deferred.
    pub wait: bool,
}

/// Committed state of every component.
///
/// [`StepgenState::next`] computes the whole next state from this snapshot
/// only; nothing is written until the new state replaces the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepgenState {
    /// Segment pipeline.
    pub scheduler: SegmentScheduler,
    /// Velocity register.
    pub ramp: VelocityRamp,
    /// Position register.
    pub accumulator: PositionAccumulator,
    /// STEP/DIR sequencing.
    pub arbiter: DirectionArbiter,
}

impl StepgenState {
    /// Reset state for a layout.
    pub fn new(layout: &RegisterLayout) -> Self {
        Self {
            scheduler: SegmentScheduler::new(layout),
            ramp: VelocityRamp::new(layout),
            accumulator: PositionAccumulator::new(),
            arbiter: DirectionArbiter::new(),
        }
    }

    /// State after one tick.
    #[must_use]
    pub fn next(&self, inputs: &TickInputs, soft_stop: bool, layout: &RegisterLayout) -> Self {
        let active = self.scheduler.active();
        let wait = self.arbiter.wait();

        let ramp = self.ramp.next(
            &RampInputs {
                target: active.target,
                limit: active.limit,
                enable: inputs.enable,
                reset: inputs.reset,
                wait,
            },
            layout,
        );

        let accumulator = self.accumulator.next(
            &AccumulatorInputs {
                velocity: self.ramp.velocity(),
                enable: inputs.enable,
                reset: inputs.reset,
                wait,
            },
            soft_stop,
            layout,
        );

        let arbiter = self.arbiter.next(&ArbiterInputs {
            step_bit: self.accumulator.step_bit(layout),
            travel: self.accumulator.travel(),
            timing: inputs.timing,
            reset: inputs.reset,
        });

        Self {
            scheduler: self.scheduler.next(inputs.now, inputs.reset, layout),
            ramp,
            accumulator,
            arbiter,
        }
    }
}

/// A single step/direction generator.
///
/// # Example
///
/// ```rust
/// use stepgen_dds::config::{PickOff, StepTiming};
/// use stepgen_dds::segment::{Segment, SegmentCommand};
/// use stepgen_dds::stepgen::{Stepgen, TickInputs};
///
/// let mut stepgen = Stepgen::new(PickOff::new(28, 28, 28).unwrap(), false);
/// let cruise = Segment::new(0x8000_0000 + (1 << 20), 0);
/// stepgen.stage_segment(SegmentCommand::single(cruise, 0)).unwrap();
///
/// let mut inputs = TickInputs {
///     enable: true,
///     timing: StepTiming::new(16, 16, 32),
///     ..TickInputs::default()
/// };
/// for now in 0..1_000 {
///     inputs.now = now;
///     stepgen.tick(&inputs);
/// }
/// assert!(stepgen.status().position > 0);
/// ```
#[derive(Debug, Clone)]
pub struct Stepgen {
    layout: RegisterLayout,
    soft_stop: bool,
    state: StepgenState,
}

impl Stepgen {
    /// Create a generator at rest.
    pub fn new(pick_off: PickOff, soft_stop: bool) -> Self {
        let layout = RegisterLayout::new(pick_off);
        Self {
            layout,
            soft_stop,
            state: StepgenState::new(&layout),
        }
    }

    /// Create a generator from a channel configuration.
    pub fn from_config(config: &StepgenConfig) -> Self {
        Self::new(config.pick_off, config.soft_stop)
    }

    /// Register layout.
    #[inline]
    pub fn layout(&self) -> &RegisterLayout {
        &self.layout
    }

    /// Whether a disabled generator keeps integrating.
    #[inline]
    pub fn soft_stop(&self) -> bool {
        self.soft_stop
    }

    /// Committed state.
    #[inline]
    pub fn state(&self) -> &StepgenState {
        &self.state
    }

    /// Stage a segment command.
    ///
    /// # Errors
    ///
    /// See [`SegmentScheduler::stage`].
    pub fn stage_segment(&mut self, command: SegmentCommand) -> Result<(), SegmentError> {
        self.state.scheduler.stage(command, &self.layout)
    }

    /// Advance one tick and return the new outputs.
    pub fn tick(&mut self, inputs: &TickInputs) -> StepgenOutputs {
        let next = self.state.next(inputs, self.soft_stop, &self.layout);
        self.log_transition(inputs, &next);
        self.state = next;
        self.outputs()
    }

    /// Current output levels.
    #[inline]
    pub fn outputs(&self) -> StepgenOutputs {
        StepgenOutputs {
            step: self.state.arbiter.step(),
            dir: self.state.arbiter.dir(),
        }
    }

    /// Status readback.
    pub fn status(&self) -> StepgenStatus {
        let raw = self.state.accumulator.raw();
        StepgenStatus {
            position: self.layout.reported_position(raw),
            steps: self.layout.position_steps(raw),
            velocity: self.layout.debias_fine(self.state.ramp.velocity()),
            apply_time2: self.state.scheduler.apply_time2(),
            outputs: self.outputs(),
            hold_dds: self.state.arbiter.hold_dds(),
            wait: self.state.arbiter.wait(),
        }
    }

    #[cfg(feature = "defmt")]
    fn log_transition(&self, inputs: &TickInputs, next: &StepgenState) {
        let prev = &self.state;
        if inputs.reset {
            defmt::debug!("stepgen: reset at t={}", inputs.now);
        }
        if next.scheduler.active() != prev.scheduler.active() {
            defmt::debug!(
                "stepgen: segment {} active at t={}",
                next.scheduler.active(),
                inputs.now
            );
        }
        if next.arbiter.dir() != prev.arbiter.dir() {
            defmt::debug!("stepgen: DIR -> {}", next.arbiter.dir());
        }
        if next.arbiter.wait() && !prev.arbiter.wait() {
            defmt::trace!("stepgen: step deferred at t={}", inputs.now);
        }
    }

    #[cfg(not(feature = "defmt"))]
    #[inline]
    fn log_transition(&self, _inputs: &TickInputs, _next: &StepgenState) {}
}
