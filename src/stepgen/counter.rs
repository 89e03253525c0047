//! Countdown timer used for the STEP, DIR hold and DIR setup windows.

/// A 32-bit counter that counts down to zero and stays there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DownCounter(u32);

impl DownCounter {
    /// An elapsed counter.
    pub const ELAPSED: Self = Self(0);

    /// Create a counter holding `value`.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Remaining ticks.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// `true` once the counter has reached zero.
    #[inline]
    pub const fn is_elapsed(self) -> bool {
        self.0 == 0
    }

    /// Next-tick value: `load` if given, else one less, saturating at zero.
    #[inline]
    #[must_use]
    pub fn tick(self, load: Option<u32>) -> Self {
        match load {
            Some(value) => Self(value),
            None => Self(self.0.saturating_sub(1)),
        }
    }
}
