//! Pick-off triple: three resolutions of one fixed-point accumulator.

use serde::Deserialize;

use crate::error::ConfigError;

/// Bit offsets selecting position, velocity and acceleration resolution.
///
/// The position register is `64 + (velocity - position)` bits wide and the
/// velocity register `32 + (acceleration - velocity)` bits wide. Every field
/// is fixed once the generator is instantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PickOff {
    position: u8,
    velocity: u8,
    acceleration: u8,
}

impl PickOff {
    /// Largest supported `velocity - position` gap (position register <= 128 bits).
    pub const MAX_FINE_BITS: u8 = 64;

    /// Largest supported `acceleration - velocity` gap (velocity register <= 64 bits).
    pub const MAX_FRACTION_BITS: u8 = 32;

    /// Create a validated pick-off triple.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPickOff` unless
    /// `position <= velocity <= acceleration`, `position < 64` and both gaps
    /// fit the supported register widths.
    pub fn new(position: u8, velocity: u8, acceleration: u8) -> Result<Self, ConfigError> {
        let ordered = position <= velocity && velocity <= acceleration;
        let fits = ordered
            && position < 64
            && velocity - position <= Self::MAX_FINE_BITS
            && acceleration - velocity <= Self::MAX_FRACTION_BITS;

        if fits {
            Ok(Self {
                position,
                velocity,
                acceleration,
            })
        } else {
            Err(ConfigError::InvalidPickOff {
                position,
                velocity,
                acceleration,
            })
        }
    }

    /// Position pick-off bit.
    #[inline]
    pub const fn position(self) -> u8 {
        self.position
    }

    /// Velocity pick-off bit; the step bit of the position register.
    #[inline]
    pub const fn velocity(self) -> u8 {
        self.velocity
    }

    /// Acceleration pick-off bit.
    #[inline]
    pub const fn acceleration(self) -> u8 {
        self.acceleration
    }

    /// Extra position bits below the reported 64-bit position.
    #[inline]
    pub const fn fine_bits(self) -> u32 {
        (self.velocity - self.position) as u32
    }

    /// Acceleration fraction bits below the integer velocity.
    #[inline]
    pub const fn fraction_bits(self) -> u32 {
        (self.acceleration - self.velocity) as u32
    }
}

/// `(32, 40, 48)`: eight fine position bits and eight acceleration fraction bits.
impl Default for PickOff {
    fn default() -> Self {
        Self {
            position: 32,
            velocity: 40,
            acceleration: 48,
        }
    }
}

#[derive(Deserialize)]
struct RawPickOff {
    position: u8,
    velocity: u8,
    acceleration: u8,
}

impl<'de> Deserialize<'de> for PickOff {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let raw = RawPickOff::deserialize(deserializer)?;
        PickOff::new(raw.position, raw.velocity, raw.acceleration).map_err(|e| {
            let mut buf = heapless::String::<192>::new();
            let _ = write!(buf, "{}", e);
            serde::de::Error::custom(buf.as_str())
        })
    }
}
