//! Per-channel stepgen configuration from TOML.

use serde::Deserialize;

use super::pickoff::PickOff;
use super::timing::TimingConfig;

/// Configuration of one stepgen channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct StepgenConfig {
    /// Fixed-point layout of the position and velocity registers.
    #[serde(default)]
    pub pick_off: PickOff,

    /// Keep integrating while disabled so the ramp brings the axis to rest.
    ///
    /// When false, clearing `enable` freezes the position immediately.
    #[serde(default)]
    pub soft_stop: bool,

    /// Drive DIR low for forward motion.
    #[serde(default)]
    pub invert_direction: bool,

    /// Initial STEP/DIR timing.
    #[serde(default)]
    pub timing: TimingConfig,
}
