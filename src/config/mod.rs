//! Configuration module for stepgen-dds.
//!
//! Provides types for loading and validating stepgen channel configurations
//! from TOML files (with `std` feature) or pre-parsed data.

mod pickoff;
mod stepgen;
mod system;
mod timing;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use pickoff::PickOff;
pub use stepgen::StepgenConfig;
pub use system::{SystemConfig, MAX_STEPGENS};
pub use timing::{StepTiming, TimingConfig};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Cycles, Nanoseconds, StepsPerSec, StepsPerSecSquared};
