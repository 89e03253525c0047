//! Fixed-width register arithmetic derived from a pick-off triple.
//!
//! The position register is one wide two's-complement integer observed at
//! three resolutions. It is held in a `u128` masked to its width; the
//! velocity register is held in a `u64` masked to its width.

use crate::config::PickOff;

use super::Direction;

/// Offset that puts logical zero velocity at mid-range (un-shifted).
const VELOCITY_BIAS: u64 = 0x8000_0000;

/// Widths, masks and bias for one generator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterLayout {
    pick_off: PickOff,
    position_mask: u128,
    velocity_mask: u64,
    bias: u64,
}

impl RegisterLayout {
    /// Derive the layout for a pick-off triple.
    pub fn new(pick_off: PickOff) -> Self {
        let position_width = 64 + pick_off.fine_bits();
        let velocity_width = 32 + pick_off.fraction_bits();
        Self {
            pick_off,
            position_mask: mask_u128(position_width),
            velocity_mask: mask_u64(velocity_width),
            bias: VELOCITY_BIAS << pick_off.fraction_bits(),
        }
    }

    /// The pick-off triple this layout was derived from.
    #[inline]
    pub fn pick_off(&self) -> PickOff {
        self.pick_off
    }

    /// Position register width in bits.
    #[inline]
    pub fn position_width(&self) -> u32 {
        64 + self.pick_off.fine_bits()
    }

    /// Velocity register width in bits.
    #[inline]
    pub fn velocity_width(&self) -> u32 {
        32 + self.pick_off.fraction_bits()
    }

    /// Raw velocity register value of logical zero.
    #[inline]
    pub fn bias(&self) -> u64 {
        self.bias
    }

    /// Truncate to the velocity register width.
    #[inline]
    pub fn wrap_velocity(&self, raw: u64) -> u64 {
        raw & self.velocity_mask
    }

    /// `true` if `raw` fits the velocity register.
    #[inline]
    pub fn fits_velocity(&self, raw: u64) -> bool {
        raw & !self.velocity_mask == 0
    }

    /// Integer part of the velocity register with the bias removed.
    ///
    /// This is the per-tick position increment; the fraction bits only
    /// matter to the ramp.
    #[inline]
    pub fn debias(&self, raw: u64) -> i64 {
        let whole = (raw & self.velocity_mask) >> self.pick_off.fraction_bits();
        whole as i64 - VELOCITY_BIAS as i64
    }

    /// Full-resolution velocity with the bias removed, fraction bits included.
    #[inline]
    pub fn debias_fine(&self, raw: u64) -> i128 {
        (raw & self.velocity_mask) as i128 - self.bias as i128
    }

    /// Encode a signed full-resolution velocity, wrapping modulo the width.
    #[inline]
    pub fn encode_velocity(&self, value: i128) -> u64 {
        ((self.bias as i128).wrapping_add(value) as u64) & self.velocity_mask
    }

    /// Direction flag: top bit of the integer part of the velocity.
    #[inline]
    pub fn direction(&self, raw: u64) -> Direction {
        let whole = (raw & self.velocity_mask) >> self.pick_off.fraction_bits();
        Direction::from_flag(whole & VELOCITY_BIAS != 0)
    }

    /// Add a signed increment to the position register with wraparound.
    #[inline]
    pub fn advance_position(&self, position: u128, delta: i64) -> u128 {
        position.wrapping_add(delta as i128 as u128) & self.position_mask
    }

    /// The step bit of the position register (index `velocity`).
    #[inline]
    pub fn step_bit(&self, position: u128) -> bool {
        (position >> self.pick_off.velocity()) & 1 == 1
    }

    /// The full position register, sign-extended.
    #[inline]
    pub fn signed_position(&self, position: u128) -> i128 {
        let unused = 128 - self.position_width();
        ((position << unused) as i128) >> unused
    }

    /// Reported 64-bit position: the register without its fine bits.
    ///
    /// The step bit of the reported value is the `position` pick-off bit.
    #[inline]
    pub fn reported_position(&self, position: u128) -> i64 {
        (self.signed_position(position) >> self.pick_off.fine_bits()) as i64
    }

    /// Whole steps taken: the register at step resolution.
    ///
    /// Each toggle of the step bit is one step, so this counts half periods
    /// of bit `velocity`.
    #[inline]
    pub fn position_steps(&self, position: u128) -> i64 {
        (self.signed_position(position) >> self.pick_off.velocity()) as i64
    }
}

const fn mask_u128(width: u32) -> u128 {
    if width >= 128 {
        u128::MAX
    } else {
        (1u128 << width) - 1
    }
}

const fn mask_u64(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(p: u8, v: u8, a: u8) -> RegisterLayout {
        RegisterLayout::new(PickOff::new(p, v, a).unwrap())
    }

    #[test]
    fn test_widths_and_bias() {
        let l = layout(32, 40, 48);
        assert_eq!(l.position_width(), 72);
        assert_eq!(l.velocity_width(), 40);
        assert_eq!(l.bias(), 0x80_0000_0000);

        let widest = layout(0, 64, 96);
        assert_eq!(widest.position_width(), 128);
        assert_eq!(widest.velocity_width(), 64);
        assert_eq!(widest.bias(), 1 << 63);
    }

    #[test]
    fn test_debias_drops_fraction_bits() {
        let l = layout(32, 40, 48);
        assert_eq!(l.debias(l.bias()), 0);
        assert_eq!(l.debias(l.bias() + 0xFF), 0);
        assert_eq!(l.debias(l.bias() + 0x100), 1);
        assert_eq!(l.debias(l.bias() - 1), -1);
        assert_eq!(l.debias(0), -(1 << 31));
        assert_eq!(l.debias_fine(l.bias() - 3), -3);
    }

    #[test]
    fn test_direction_flag() {
        let l = layout(28, 28, 28);
        assert_eq!(l.direction(0x8000_0000), Direction::Forward);
        assert_eq!(l.direction(0xFFFF_FFFF), Direction::Forward);
        assert_eq!(l.direction(0x7FFF_FFFF), Direction::Reverse);
    }

    #[test]
    fn test_encode_wraps_at_width() {
        let l = layout(28, 28, 28);
        assert_eq!(l.encode_velocity(0), 0x8000_0000);
        assert_eq!(l.encode_velocity(0x8000_0000), 0);
        assert_eq!(l.encode_velocity(-1), 0x7FFF_FFFF);
    }

    #[test]
    fn test_position_wraps_as_twos_complement() {
        let l = layout(28, 28, 28);
        let p = l.advance_position(0, -1);
        assert_eq!(p, u64::MAX as u128);
        assert_eq!(l.signed_position(p), -1);
        assert_eq!(l.reported_position(p), -1);

        let max = (1u128 << 63) - 1;
        let wrapped = l.advance_position(max, 1);
        assert_eq!(l.reported_position(wrapped), i64::MIN);
    }

    #[test]
    fn test_resolutions_share_one_register() {
        let l = layout(32, 40, 48);
        // One step at bit 40 of the register
        let p = l.advance_position(0, 1 << 40);
        assert!(l.step_bit(p));
        assert_eq!(l.position_steps(p), 1);
        assert_eq!(l.reported_position(p), 1 << 32);
    }
}
