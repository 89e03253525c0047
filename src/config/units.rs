//! Unit types for host-facing quantities.
//!
//! The generator itself only knows clock cycles and raw register values.
//! These newtypes convert physical rates and durations into that
//! representation for a given clock frequency and pick-off triple.

use libm::{ceil, ldexp, round};
use serde::Deserialize;

use crate::error::ConfigError;

use super::pickoff::PickOff;

/// Duration in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Nanoseconds(pub u32);

impl Nanoseconds {
    /// Create a new Nanoseconds value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Convert to whole clock cycles, rounding up.
    ///
    /// Rounding up means a configured minimum pulse or hold time is never
    /// shortened by the conversion.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TimingOverflow` if the result exceeds `u32::MAX`.
    pub fn to_cycles(self, clock_frequency: u32) -> Result<Cycles, ConfigError> {
        let ticks = (self.0 as u64 * clock_frequency as u64 + 999_999_999) / 1_000_000_000;
        u32::try_from(ticks)
            .map(Cycles)
            .map_err(|_| ConfigError::TimingOverflow {
                nanos: self.0,
                clock_frequency,
            })
    }
}

/// Duration in clock cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Cycles(pub u32);

impl Cycles {
    /// Create a new Cycles value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// Step rate in steps per second (signed, positive = forward).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct StepsPerSec(pub f64);

impl StepsPerSec {
    /// Create a new StepsPerSec value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Encode as a bias-offset velocity register value.
    ///
    /// One step corresponds to `2^velocity` position units and the register
    /// carries `acceleration - velocity` fraction bits, so one step per tick
    /// is `2^acceleration` register units. Rates beyond the encodable range
    /// saturate.
    pub fn to_register(self, pick_off: PickOff, clock_frequency: u32) -> u64 {
        let frac = pick_off.fraction_bits();
        let bias = 0x8000_0000_u64 << frac;
        let per_tick = self.0 / clock_frequency as f64;
        let units = round(ldexp(per_tick, pick_off.acceleration() as i32));

        // Clamp as integers; bias - 1 is not representable in f64 for wide registers
        let clamped = (units as i128).clamp(-(bias as i128), bias as i128 - 1);
        (bias as i128 + clamped) as u64
    }

    /// Decode a bias-offset velocity register value.
    pub fn from_register(raw: u64, pick_off: PickOff, clock_frequency: u32) -> Self {
        let bias = 0x8000_0000_u64 << pick_off.fraction_bits();
        let units = raw as i128 - bias as i128;
        let per_tick = ldexp(units as f64, -(pick_off.acceleration() as i32));
        Self(per_tick * clock_frequency as f64)
    }
}

/// Step acceleration in steps per second squared.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct StepsPerSecSquared(pub f64);

impl StepsPerSecSquared {
    /// Create a new StepsPerSecSquared value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Encode as an acceleration limit register value (velocity units per tick).
    ///
    /// Any positive acceleration encodes to at least 1, because a limit of 0
    /// disables ramping altogether.
    pub fn to_register(self, pick_off: PickOff, clock_frequency: u32) -> u64 {
        if self.0 <= 0.0 {
            return 0;
        }
        let width = 32 + pick_off.fraction_bits();
        let max = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };

        let clock = clock_frequency as f64;
        let per_tick2 = self.0 / (clock * clock);
        let units = ceil(ldexp(per_tick2, pick_off.acceleration() as i32));
        (units as u128).clamp(1, max as u128) as u64
    }
}
