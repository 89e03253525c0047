//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{StepgenConfig, SystemConfig};

/// Validate a system configuration.
///
/// Checks:
/// - Clock frequency is non-zero
/// - Every timing value fits a 32-bit cycle counter at the clock frequency
///
/// Pick-off triples need no check here: `PickOff` can only be built through
/// its validating constructor or deserializer.
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    if config.clock_frequency == 0 {
        return Err(Error::Config(ConfigError::InvalidClockFrequency(
            config.clock_frequency,
        )));
    }

    for (_name, stepgen) in config.stepgens.iter() {
        validate_stepgen(stepgen, config.clock_frequency)?;
    }

    Ok(())
}

fn validate_stepgen(config: &StepgenConfig, clock_frequency: u32) -> Result<()> {
    config.timing.to_cycles(clock_frequency)?;

    Ok(())
}
