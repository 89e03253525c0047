//! STEP/DIR pin driver.
//!
//! Generic over embedded-hal 1.0 pin types. The generator itself is pure;
//! this module mirrors its outputs onto GPIO.

use embedded_hal::digital::OutputPin;

use crate::config::StepTiming;
use crate::error::{PinError, Result, SegmentError};
use crate::segment::SegmentCommand;
use crate::stepgen::{Direction, Stepgen, StepgenOutputs, StepgenStatus, TickInputs};

/// STEP and DIR output pins.
///
/// Pins are only written when the level changes.
pub struct StepDirPins<STEP, DIR>
where
    STEP: OutputPin,
    DIR: OutputPin,
{
    /// STEP pin.
    step_pin: STEP,

    /// DIR pin (high = forward, unless inverted).
    dir_pin: DIR,

    /// Last written STEP level.
    step_level: Option<bool>,

    /// Last written DIR level.
    dir_level: Option<bool>,

    invert_direction: bool,
}

impl<STEP, DIR> StepDirPins<STEP, DIR>
where
    STEP: OutputPin,
    DIR: OutputPin,
{
    /// Wrap two pins. Nothing is written until the first [`write`](Self::write).
    pub fn new(step_pin: STEP, dir_pin: DIR, invert_direction: bool) -> Self {
        Self {
            step_pin,
            dir_pin,
            step_level: None,
            dir_level: None,
            invert_direction,
        }
    }

    /// Whether DIR is driven low for forward motion.
    #[inline]
    pub fn invert_direction(&self) -> bool {
        self.invert_direction
    }

    /// DIR pin level for a direction.
    #[inline]
    pub fn dir_level(&self, dir: Direction) -> bool {
        dir.is_high() != self.invert_direction
    }

    /// Drive the pins to match `outputs`.
    ///
    /// DIR is written before STEP, so a DIR change and a rising STEP edge
    /// in the same sample reach the driver in that order.
    ///
    /// # Errors
    ///
    /// Returns `PinError` naming the pin that failed. The cached level is
    /// left unchanged, so the write is retried on the next call.
    pub fn write(&mut self, outputs: StepgenOutputs) -> core::result::Result<(), PinError> {
        let dir = self.dir_level(outputs.dir);
        if self.dir_level != Some(dir) {
            set_level(&mut self.dir_pin, dir).map_err(|_| PinError::Dir)?;
            self.dir_level = Some(dir);
        }

        if self.step_level != Some(outputs.step) {
            set_level(&mut self.step_pin, outputs.step).map_err(|_| PinError::Step)?;
            self.step_level = Some(outputs.step);
        }

        Ok(())
    }

    /// Release the pins.
    pub fn release(self) -> (STEP, DIR) {
        (self.step_pin, self.dir_pin)
    }
}

fn set_level<P: OutputPin>(pin: &mut P, high: bool) -> core::result::Result<(), P::Error> {
    if high {
        pin.set_high()
    } else {
        pin.set_low()
    }
}

/// A generator bound to its pins, with its own enable and timing.
///
/// Build one with [`StepgenBuilder`](super::StepgenBuilder).
pub struct StepgenAxis<STEP, DIR>
where
    STEP: OutputPin,
    DIR: OutputPin,
{
    /// Axis name for logging/debugging.
    name: heapless::String<32>,

    stepgen: Stepgen,

    pins: StepDirPins<STEP, DIR>,

    timing: StepTiming,

    enabled: bool,

    /// Reset requested for the next tick.
    reset_pending: bool,
}

impl<STEP, DIR> StepgenAxis<STEP, DIR>
where
    STEP: OutputPin,
    DIR: OutputPin,
{
    pub(crate) fn new(
        name: heapless::String<32>,
        stepgen: Stepgen,
        pins: StepDirPins<STEP, DIR>,
        timing: StepTiming,
    ) -> Self {
        Self {
            name,
            stepgen,
            pins,
            timing,
            enabled: false,
            reset_pending: false,
        }
    }

    /// Get the axis name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Underlying generator.
    #[inline]
    pub fn stepgen(&self) -> &Stepgen {
        &self.stepgen
    }

    /// Current timing.
    #[inline]
    pub fn timing(&self) -> StepTiming {
        self.timing
    }

    /// Replace the timing used from the next tick on.
    pub fn set_timing(&mut self, timing: StepTiming) {
        self.timing = timing;
    }

    /// `true` if the axis is enabled.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the axis.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Stop abruptly and clear the position on the next tick.
    pub fn request_reset(&mut self) {
        self.reset_pending = true;
    }

    /// Stage a segment command.
    ///
    /// # Errors
    ///
    /// See [`SegmentScheduler::stage`](crate::segment::SegmentScheduler::stage).
    pub fn stage_segment(&mut self, command: SegmentCommand) -> core::result::Result<(), SegmentError> {
        self.stepgen.stage_segment(command)
    }

    /// Advance one tick at wall-clock time `now` and update the pins.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin write fails. The generator has still
    /// advanced; the pins catch up on the next successful tick.
    pub fn tick(&mut self, now: u64) -> Result<StepgenOutputs> {
        let outputs = self.stepgen.tick(&TickInputs {
            enable: self.enabled,
            reset: self.reset_pending,
            timing: self.timing,
            now,
        });
        self.reset_pending = false;
        self.pins.write(outputs)?;
        Ok(outputs)
    }

    /// Status readback.
    #[inline]
    pub fn status(&self) -> StepgenStatus {
        self.stepgen.status()
    }

    /// Release the pins.
    pub fn release(self) -> (STEP, DIR) {
        self.pins.release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    #[test]
    fn test_writes_only_on_change() {
        let step = PinMock::new(&[
            Transaction::set(State::Low),
            Transaction::set(State::High),
            Transaction::set(State::Low),
        ]);
        let dir = PinMock::new(&[Transaction::set(State::High)]);
        let mut pins = StepDirPins::new(step, dir, false);

        let idle = StepgenOutputs {
            step: false,
            dir: Direction::Forward,
        };
        let pulse = StepgenOutputs { step: true, ..idle };

        pins.write(idle).unwrap();
        pins.write(idle).unwrap();
        pins.write(pulse).unwrap();
        pins.write(pulse).unwrap();
        pins.write(idle).unwrap();

        let (mut step, mut dir) = pins.release();
        step.done();
        dir.done();
    }

    #[test]
    fn test_inverted_dir() {
        let step = PinMock::new(&[Transaction::set(State::Low)]);
        let dir = PinMock::new(&[Transaction::set(State::Low), Transaction::set(State::High)]);
        let mut pins = StepDirPins::new(step, dir, true);

        pins.write(StepgenOutputs {
            step: false,
            dir: Direction::Forward,
        })
        .unwrap();
        pins.write(StepgenOutputs {
            step: false,
            dir: Direction::Reverse,
        })
        .unwrap();

        let (mut step, mut dir) = pins.release();
        step.done();
        dir.done();
    }
}
