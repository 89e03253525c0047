//! # stepgen-dds
//!
//! Tick-accurate step/direction pulse generation with acceleration ramping
//! and DIR hold/setup arbitration.
//!
//! ## Features
//!
//! - **Fixed-point pipeline**: one wide position register observed at three
//!   configurable resolutions (the pick-off triple)
//! - **Acceleration limited**: the velocity ramps toward its target by a
//!   bounded amount per tick
//! - **Glitch-free reversal**: STEP pulse width, DIR hold and DIR setup are
//!   enforced by three down-counters
//! - **Gapless segments**: a double-buffered scheduler switches between two
//!   pre-loaded segments at their apply times
//! - **no_std compatible**: no heap allocation in the tick path
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepgen_dds::motor::StepgenSystem;
//! use stepgen_dds::segment::{Segment, SegmentCommand};
//!
//! // Load configuration from TOML
//! let config = stepgen_dds::load_config("stepgen.toml")?;
//! let mut system = StepgenSystem::from_config(&config)?;
//!
//! system.set_enabled("x", true)?;
//! system.stage("x", SegmentCommand::single(Segment::new(target, accel), 0))?;
//!
//! loop {
//!     system.tick();
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod config;
pub mod error;
pub mod motor;
pub mod segment;
pub mod stepgen;

// Re-exports for ergonomic API
pub use config::{validate_config, PickOff, StepTiming, StepgenConfig, SystemConfig};
pub use error::{Error, Result};
pub use motor::{StepgenBuilder, StepgenSystem};
pub use segment::{Segment, SegmentCommand, SegmentScheduler};
pub use stepgen::{Direction, Stepgen, StepgenOutputs, StepgenStatus, TickInputs};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::load_config;

// Unit types
pub use config::units::{Cycles, Nanoseconds, StepsPerSec, StepsPerSecSquared};
