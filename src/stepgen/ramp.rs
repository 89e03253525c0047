//! Acceleration-limited velocity ramp.

use super::register::RegisterLayout;

/// Sampled inputs of the ramp for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampInputs {
    /// Active target velocity (bias encoded).
    pub target: u64,
    /// Active acceleration limit; 0 applies the target immediately.
    pub limit: u64,
    /// Axis enable; a disabled axis ramps toward zero.
    pub enable: bool,
    /// Abrupt stop.
    pub reset: bool,
    /// A deferred step is waiting for the direction to settle.
    pub wait: bool,
}

/// Velocity register and its update rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VelocityRamp {
    velocity: u64,
}

impl VelocityRamp {
    /// A ramp at rest.
    pub fn new(layout: &RegisterLayout) -> Self {
        Self {
            velocity: layout.bias(),
        }
    }

    /// Raw, bias-encoded velocity register.
    #[inline]
    pub fn velocity(&self) -> u64 {
        self.velocity
    }

    /// Velocity for the next tick.
    ///
    /// Comparisons are done without truncation, so the ramp never wraps
    /// past the end of the encoding range; only the stored value is masked.
    #[must_use]
    pub fn next(&self, inputs: &RampInputs, layout: &RegisterLayout) -> Self {
        if inputs.reset {
            return Self::new(layout);
        }
        if inputs.wait {
            return *self;
        }

        let target = if inputs.enable {
            inputs.target
        } else {
            layout.bias()
        };

        let velocity = if inputs.limit == 0 {
            target
        } else {
            let current = self.velocity as i128;
            let limit = inputs.limit as i128;
            let target_wide = target as i128;

            if target_wide > current + limit {
                (current + limit) as u64
            } else if target_wide < current - limit {
                (current - limit) as u64
            } else {
                target
            }
        };

        Self {
            velocity: layout.wrap_velocity(velocity),
        }
    }
}
