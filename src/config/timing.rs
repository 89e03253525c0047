//! STEP/DIR timing parameters.

use serde::Deserialize;

use crate::error::ConfigError;

use super::units::Nanoseconds;

/// Timing parameters in clock cycles, as consumed by the arbiter.
///
/// ```text
///            _____         _____               _____
/// STEP  ____/     \_______/     \_____________/     \______
///           |     |       |     |             |     |
/// Time      |-(1)-|--(2)--|-(1)-|--(3)--|-(4)-|-(1)-|
///                                       |__________________
/// DIR   ________________________________/
/// ```
///
/// (1) `pulse_width`, (3) `dir_hold`, (4) `dir_setup`. The step space (2)
/// follows from the commanded velocity and is the host's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepTiming {
    /// Length of the STEP pulse.
    pub pulse_width: u32,
    /// Minimum delay after a STEP pulse before DIR may change.
    pub dir_hold: u32,
    /// Minimum delay after a DIR change before the next STEP pulse.
    pub dir_setup: u32,
}

impl StepTiming {
    /// Create timing parameters from cycle counts.
    pub const fn new(pulse_width: u32, dir_hold: u32, dir_setup: u32) -> Self {
        Self {
            pulse_width,
            dir_hold,
            dir_setup,
        }
    }

    /// Reload value of the DIR hold counter on an accepted step.
    #[inline]
    pub(crate) fn hold_window(&self) -> u32 {
        self.pulse_width.saturating_add(self.dir_hold)
    }

    /// Reload value of the DIR setup counter on an accepted step.
    #[inline]
    pub(crate) fn setup_window(&self) -> u32 {
        self.hold_window().saturating_add(self.dir_setup)
    }
}

/// Timing parameters in nanoseconds (from configuration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct TimingConfig {
    /// Length of the STEP pulse.
    #[serde(default)]
    pub steplen_ns: Nanoseconds,
    /// Minimum delay after a STEP pulse before a direction change.
    #[serde(default)]
    pub dir_hold_ns: Nanoseconds,
    /// Minimum delay after a direction change before the next STEP pulse.
    #[serde(default)]
    pub dir_setup_ns: Nanoseconds,
}

impl TimingConfig {
    /// Convert to cycle counts at the given clock frequency.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TimingOverflow` if a value does not fit 32 bits.
    pub fn to_cycles(&self, clock_frequency: u32) -> Result<StepTiming, ConfigError> {
        Ok(StepTiming {
            pulse_width: self.steplen_ns.to_cycles(clock_frequency)?.value(),
            dir_hold: self.dir_hold_ns.to_cycles(clock_frequency)?.value(),
            dir_setup: self.dir_setup_ns.to_cycles(clock_frequency)?.value(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_stack_up() {
        let t = StepTiming::new(16, 16, 32);
        assert_eq!(t.hold_window(), 32);
        assert_eq!(t.setup_window(), 64);
    }

    #[test]
    fn test_config_to_cycles() {
        let cfg = TimingConfig {
            steplen_ns: Nanoseconds(320),
            dir_hold_ns: Nanoseconds(320),
            dir_setup_ns: Nanoseconds(640),
        };
        // 50 MHz: 20 ns per cycle
        assert_eq!(cfg.to_cycles(50_000_000).unwrap(), StepTiming::new(16, 16, 32));
    }
}
