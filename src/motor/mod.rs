//! Motor module for stepgen-dds.
//!
//! Binds generators to embedded-hal STEP/DIR pins and groups them into a
//! multi-channel system.

mod builder;
mod driver;
mod system;

pub use builder::StepgenBuilder;
pub use driver::{StepDirPins, StepgenAxis};
pub use system::{Channel, StepgenSystem};
