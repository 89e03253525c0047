//! Error types for stepgen-dds.
//!
//! The per-tick update path is infallible. Errors only arise when building a
//! generator from configuration, when the host stages segments, or when the
//! outputs are mirrored onto GPIO pins.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepgen-dds operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Segment staging error
    Segment(SegmentError),
    /// GPIO error while driving STEP/DIR
    Pin(PinError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Pick-off triple is not ordered or does not fit the register widths
    InvalidPickOff {
        /// Position pick-off bit
        position: u8,
        /// Velocity pick-off bit
        velocity: u8,
        /// Acceleration pick-off bit
        acceleration: u8,
    },
    /// Clock frequency must be > 0
    InvalidClockFrequency(u32),
    /// Stepgen name not found in configuration
    StepgenNotFound(heapless::String<32>),
    /// Duplicate stepgen name
    DuplicateStepgenName(heapless::String<32>),
    /// Too many stepgen channels for the system
    TooManyStepgens(usize),
    /// A timing value does not fit in a 32-bit cycle counter
    TimingOverflow {
        /// Requested duration in nanoseconds
        nanos: u32,
        /// Clock frequency used for the conversion
        clock_frequency: u32,
    },
    /// A required builder field was not provided
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Errors raised when the host stages a segment command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SegmentError {
    /// A command is still waiting for its apply deadline
    PipelineFull {
        /// Apply deadline of the command occupying the slot
        pending_apply_time: u64,
    },
    /// Velocity or acceleration value does not fit the register width
    OutOfRange {
        /// Offending raw value
        value: u64,
        /// Register width in bits
        width: u32,
    },
}

/// GPIO errors while driving the outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Writing the STEP pin failed
    Step,
    /// Writing the DIR pin failed
    Dir,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Segment(e) => write!(f, "Segment error: {}", e),
            Error::Pin(e) => write!(f, "Pin error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidPickOff {
                position,
                velocity,
                acceleration,
            } => write!(
                f,
                "Invalid pick-off ({}, {}, {}): need position <= velocity <= acceleration, \
                 position < 64, velocity - position <= 64, acceleration - velocity <= 32",
                position, velocity, acceleration
            ),
            ConfigError::InvalidClockFrequency(v) => {
                write!(f, "Invalid clock frequency: {}. Must be > 0", v)
            }
            ConfigError::StepgenNotFound(name) => write!(f, "Stepgen '{}' not found", name),
            ConfigError::DuplicateStepgenName(name) => {
                write!(f, "Duplicate stepgen name: '{}'", name)
            }
            ConfigError::TooManyStepgens(n) => write!(f, "Too many stepgens: {}", n),
            ConfigError::TimingOverflow {
                nanos,
                clock_frequency,
            } => write!(
                f,
                "Timing of {} ns does not fit a 32-bit counter at {} Hz",
                nanos, clock_frequency
            ),
            ConfigError::MissingField(field) => write!(f, "Missing field: {}", field),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentError::PipelineFull { pending_apply_time } => write!(
                f,
                "Segment pipeline full: command for t={} not yet applied",
                pending_apply_time
            ),
            SegmentError::OutOfRange { value, width } => {
                write!(f, "Value {:#x} does not fit a {}-bit register", value, width)
            }
        }
    }
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinError::Step => write!(f, "STEP pin write failed"),
            PinError::Dir => write!(f, "DIR pin write failed"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<SegmentError> for Error {
    fn from(e: SegmentError) -> Self {
        Error::Segment(e)
    }
}

impl From<PinError> for Error {
    fn from(e: PinError) -> Self {
        Error::Pin(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for SegmentError {}

#[cfg(feature = "std")]
impl std::error::Error for PinError {}
