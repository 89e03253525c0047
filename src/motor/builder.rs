//! Builder pattern for StepgenAxis.

use embedded_hal::digital::OutputPin;

use crate::config::{PickOff, StepTiming, StepgenConfig, SystemConfig};
use crate::error::{ConfigError, Error, Result};
use crate::stepgen::Stepgen;

use super::driver::{StepDirPins, StepgenAxis};

/// Builder for creating StepgenAxis instances.
pub struct StepgenBuilder<STEP, DIR>
where
    STEP: OutputPin,
    DIR: OutputPin,
{
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    name: Option<heapless::String<32>>,
    pick_off: PickOff,
    soft_stop: bool,
    invert_direction: bool,
    timing: StepTiming,
}

impl<STEP, DIR> Default for StepgenBuilder<STEP, DIR>
where
    STEP: OutputPin,
    DIR: OutputPin,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR> StepgenBuilder<STEP, DIR>
where
    STEP: OutputPin,
    DIR: OutputPin,
{
    /// Create a new builder with the default pick-off and zero timing.
    pub fn new() -> Self {
        Self {
            step_pin: None,
            dir_pin: None,
            name: None,
            pick_off: PickOff::default(),
            soft_stop: false,
            invert_direction: false,
            timing: StepTiming::default(),
        }
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the axis name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = heapless::String::try_from(name).ok();
        self
    }

    /// Set the pick-off triple.
    pub fn pick_off(mut self, pick_off: PickOff) -> Self {
        self.pick_off = pick_off;
        self
    }

    /// Keep integrating while disabled.
    pub fn soft_stop(mut self, soft_stop: bool) -> Self {
        self.soft_stop = soft_stop;
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Set the timing in cycles.
    pub fn timing(mut self, timing: StepTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Configure from a StepgenConfig, converting its timing at `clock_frequency`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TimingOverflow` if a timing value does not fit.
    pub fn from_stepgen_config(mut self, config: &StepgenConfig, clock_frequency: u32) -> Result<Self> {
        self.pick_off = config.pick_off;
        self.soft_stop = config.soft_stop;
        self.invert_direction = config.invert_direction;
        self.timing = config.timing.to_cycles(clock_frequency)?;
        Ok(self)
    }

    /// Configure from SystemConfig by stepgen name.
    pub fn from_config(self, config: &SystemConfig, stepgen_name: &str) -> Result<Self> {
        let stepgen_config = config.stepgen(stepgen_name).ok_or_else(|| {
            Error::Config(ConfigError::StepgenNotFound(
                heapless::String::try_from(stepgen_name).unwrap_or_default(),
            ))
        })?;

        let named = self.name(stepgen_name);
        named.from_stepgen_config(stepgen_config, config.clock_frequency)
    }

    /// Build the StepgenAxis.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if a pin was not provided.
    pub fn build(self) -> Result<StepgenAxis<STEP, DIR>> {
        let step_pin = self
            .step_pin
            .ok_or(Error::Config(ConfigError::MissingField("step_pin")))?;
        let dir_pin = self
            .dir_pin
            .ok_or(Error::Config(ConfigError::MissingField("dir_pin")))?;

        let name = match self.name {
            Some(name) => name,
            None => heapless::String::try_from("stepgen").unwrap_or_default(),
        };

        Ok(StepgenAxis::new(
            name,
            Stepgen::new(self.pick_off, self.soft_stop),
            StepDirPins::new(step_pin, dir_pin, self.invert_direction),
            self.timing,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::Mock as PinMock;

    fn pins() -> (PinMock, PinMock) {
        (PinMock::new(&[]), PinMock::new(&[]))
    }

    #[test]
    fn test_missing_pin() {
        let result = StepgenBuilder::<PinMock, PinMock>::new().build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField("step_pin")))
        ));
    }

    #[test]
    fn test_from_config() {
        let mut config = SystemConfig::default();
        let stepgen = StepgenConfig {
            soft_stop: true,
            pick_off: PickOff::new(28, 28, 28).unwrap(),
            ..StepgenConfig::default()
        };
        let _ = config
            .stepgens
            .insert(heapless::String::try_from("x").unwrap(), stepgen);

        let (step, dir) = pins();
        let axis = StepgenBuilder::new()
            .from_config(&config, "x")
            .unwrap()
            .step_pin(step)
            .dir_pin(dir)
            .build()
            .unwrap();

        assert_eq!(axis.name(), "x");
        assert!(axis.stepgen().soft_stop());
        assert_eq!(axis.stepgen().layout().pick_off(), stepgen.pick_off);
        assert!(!axis.is_enabled());

        let (mut step, mut dir) = axis.release();
        step.done();
        dir.done();
    }

    #[test]
    fn test_unknown_stepgen() {
        let result = StepgenBuilder::<PinMock, PinMock>::new().from_config(&SystemConfig::default(), "z");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::StepgenNotFound(_)))
        ));
    }
}
