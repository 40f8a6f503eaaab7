use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::lut;

pub(crate) const FRAC_BITS: u32 = 32;
const LO_MASK: u64 = 0xFFFF_FFFF;
const ONE_RAW: i64 = 1 << FRAC_BITS;
const MAX_RAW: i64 = i64::MAX;
const MIN_RAW: i64 = -i64::MAX;

/// Signed Q32.32 fixed-point scalar.
///
/// The standard operators saturate to [`Fix64::MAX`] / [`Fix64::MIN`] instead of
/// overflowing. The `fast_*` family wraps and is meant for call sites whose
/// operands are known to be small.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Fix64(i64);

impl Fix64 {
    pub const ZERO: Fix64 = Fix64(0);
    pub const ONE: Fix64 = Fix64(ONE_RAW);
    pub const HALF: Fix64 = Fix64(ONE_RAW >> 1);
    pub const TWO: Fix64 = Fix64(ONE_RAW << 1);
    pub const PI: Fix64 = Fix64(0x3_243F_6A88);
    pub const PI_OVER_2: Fix64 = Fix64(0x1_921F_B544);
    pub const PI_TIMES_2: Fix64 = Fix64(0x6_487E_D511);
    pub const MAX: Fix64 = Fix64(MAX_RAW);
    pub const MIN: Fix64 = Fix64(MIN_RAW);
    /// Smallest positive value.
    pub const EPSILON: Fix64 = Fix64(1);

    #[inline(always)]
    pub const fn from_raw(raw: i64) -> Self {
        Fix64(raw)
    }

    #[inline(always)]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline(always)]
    pub const fn from_int(value: i32) -> Self {
        Fix64((value as i64) << FRAC_BITS)
    }

    /// `num / den`, computed with the saturating divide.
    pub fn from_ratio(num: i32, den: i32) -> Self {
        Fix64::from_int(num) / Fix64::from_int(den)
    }

    /// Lossy conversion for display and debugging. Never used by collision code.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / ONE_RAW as f64
    }

    /// Integer part, rounded toward negative infinity.
    #[inline(always)]
    pub const fn to_int_floor(self) -> i64 {
        self.0 >> FRAC_BITS
    }

    #[inline(always)]
    pub fn is_saturated(self) -> bool {
        self.0 >= MAX_RAW || self.0 <= MIN_RAW
    }

    #[inline(always)]
    fn clamp_raw(raw: i64) -> Fix64 {
        Fix64(raw.max(MIN_RAW))
    }

    #[inline(always)]
    fn saturate(negative: bool) -> Fix64 {
        if negative {
            Fix64::MIN
        } else {
            Fix64::MAX
        }
    }

    pub fn saturating_add(self, rhs: Fix64) -> Fix64 {
        Fix64::clamp_raw(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_sub(self, rhs: Fix64) -> Fix64 {
        Fix64::clamp_raw(self.0.saturating_sub(rhs.0))
    }

    /// Multiplies the two magnitudes as 32-bit halves and reapplies the sign.
    ///
    /// The result is rounded toward negative infinity, which keeps it equal to
    /// [`Fix64::fast_mul`] whenever the product is representable.
    pub fn saturating_mul(self, rhs: Fix64) -> Fix64 {
        let negative = (self.0 < 0) != (rhs.0 < 0);
        let x = self.0.unsigned_abs();
        let y = rhs.0.unsigned_abs();
        let (x_hi, x_lo) = (x >> FRAC_BITS, x & LO_MASK);
        let (y_hi, y_lo) = (y >> FRAC_BITS, y & LO_MASK);

        let hi_hi = x_hi * y_hi;
        if hi_hi >> 31 != 0 {
            return Fix64::saturate(negative);
        }
        let lo_lo = x_lo * y_lo;
        let carry = u64::from(negative && lo_lo & LO_MASK != 0);
        let magnitude = (hi_hi << FRAC_BITS)
            .checked_add(x_hi * y_lo)
            .and_then(|sum| sum.checked_add(x_lo * y_hi))
            .and_then(|sum| sum.checked_add(lo_lo >> FRAC_BITS))
            .and_then(|sum| sum.checked_add(carry));

        match magnitude {
            Some(m) if m <= MAX_RAW as u64 => {
                if negative {
                    Fix64(-(m as i64))
                } else {
                    Fix64(m as i64)
                }
            }
            _ => Fix64::saturate(negative),
        }
    }

    /// Restoring long division with one extra quotient bit for rounding.
    /// Division by zero yields [`Fix64::MAX`].
    pub fn saturating_div(self, rhs: Fix64) -> Fix64 {
        if rhs.0 == 0 {
            return Fix64::MAX;
        }
        let negative = (self.0 < 0) != (rhs.0 < 0);
        let mut remainder = self.0.unsigned_abs();
        let mut divider = rhs.0.unsigned_abs();
        let mut quotient = 0u64;
        let mut bit_pos = FRAC_BITS as i32 + 1;

        while divider & 0xF == 0 && bit_pos >= 4 {
            divider >>= 4;
            bit_pos -= 4;
        }

        while remainder != 0 && bit_pos >= 0 {
            let shift = (remainder.leading_zeros() as i32).min(bit_pos);
            remainder <<= shift;
            bit_pos -= shift;

            let div = remainder / divider;
            remainder %= divider;
            if div & !(u64::MAX >> bit_pos) != 0 {
                return Fix64::saturate(negative);
            }
            quotient = match quotient.checked_add(div << bit_pos) {
                Some(q) => q,
                None => return Fix64::saturate(negative),
            };

            remainder <<= 1;
            bit_pos -= 1;
        }

        let magnitude = (quotient >> 1) + (quotient & 1);
        if magnitude > MAX_RAW as u64 {
            return Fix64::saturate(negative);
        }
        if negative {
            Fix64(-(magnitude as i64))
        } else {
            Fix64(magnitude as i64)
        }
    }

    #[inline(always)]
    pub fn fast_add(self, rhs: Fix64) -> Fix64 {
        Fix64(self.0.wrapping_add(rhs.0))
    }

    #[inline(always)]
    pub fn fast_sub(self, rhs: Fix64) -> Fix64 {
        Fix64(self.0.wrapping_sub(rhs.0))
    }

    /// Wrapping multiply over signed 32-bit halves.
    #[inline(always)]
    pub fn fast_mul(self, rhs: Fix64) -> Fix64 {
        let x_lo = (self.0 as u64) & LO_MASK;
        let x_hi = self.0 >> FRAC_BITS;
        let y_lo = (rhs.0 as u64) & LO_MASK;
        let y_hi = rhs.0 >> FRAC_BITS;

        let lo_lo = x_lo.wrapping_mul(y_lo);
        let lo_hi = (x_lo as i64).wrapping_mul(y_hi);
        let hi_lo = x_hi.wrapping_mul(y_lo as i64);
        let hi_hi = x_hi.wrapping_mul(y_hi);

        Fix64(
            ((lo_lo >> FRAC_BITS) as i64)
                .wrapping_add(lo_hi)
                .wrapping_add(hi_lo)
                .wrapping_add(hi_hi.wrapping_shl(FRAC_BITS)),
        )
    }

    /// `MIN.abs()` is `MAX`.
    #[inline(always)]
    pub fn abs(self) -> Fix64 {
        Fix64(self.0.saturating_abs())
    }

    pub fn signum(self) -> Fix64 {
        match self.0.signum() {
            1 => Fix64::ONE,
            -1 => -Fix64::ONE,
            _ => Fix64::ZERO,
        }
    }

    #[inline(always)]
    pub fn floor(self) -> Fix64 {
        Fix64(self.0 & !(LO_MASK as i64))
    }

    pub fn ceil(self) -> Fix64 {
        if self.0 & LO_MASK as i64 == 0 {
            self
        } else {
            self.floor().saturating_add(Fix64::ONE)
        }
    }

    /// Rounds to the nearest integer, ties to even.
    pub fn round(self) -> Fix64 {
        let frac = self.0 & LO_MASK as i64;
        let floor = self.floor();
        if frac < Fix64::HALF.0 {
            floor
        } else if frac > Fix64::HALF.0 || floor.to_int_floor() & 1 == 1 {
            floor.saturating_add(Fix64::ONE)
        } else {
            floor
        }
    }

    /// Bit-by-bit square root. Negative input yields zero.
    pub fn sqrt(self) -> Fix64 {
        if self.0 <= 0 {
            return Fix64::ZERO;
        }
        let mut num = self.0 as u64;
        let mut result = 0u64;
        let mut bit = 1u64 << 62;
        while bit > num {
            bit >>= 2;
        }

        // Two passes keep every intermediate inside 64 bits: the first yields the
        // top 48 bits of the answer, the second the low 16.
        for pass in 0..2 {
            while bit != 0 {
                if num >= result + bit {
                    num -= result + bit;
                    result = (result >> 1) + bit;
                } else {
                    result >>= 1;
                }
                bit >>= 2;
            }

            if pass == 0 {
                if num > (1u64 << 32) - 1 {
                    num -= result;
                    num = (num << 32) - 0x8000_0000;
                    result = (result << 32) + 0x8000_0000;
                } else {
                    num <<= 32;
                    result <<= 32;
                }
                bit = 1u64 << 30;
            }
        }
        if num > result {
            result += 1;
        }
        Fix64(result as i64)
    }

    /// Sine with linear interpolation between table entries.
    pub fn sin(self) -> Fix64 {
        Fix64(lut::sin_raw(self.0, true))
    }

    pub fn cos(self) -> Fix64 {
        Fix64(lut::sin_raw(lut::cos_to_sin_angle(self.0), true))
    }

    /// Sine from the nearest table entry.
    pub fn fast_sin(self) -> Fix64 {
        Fix64(lut::sin_raw(self.0, false))
    }

    pub fn fast_cos(self) -> Fix64 {
        Fix64(lut::sin_raw(lut::cos_to_sin_angle(self.0), false))
    }

    #[inline(always)]
    pub fn min(self, other: Fix64) -> Fix64 {
        Ord::min(self, other)
    }

    #[inline(always)]
    pub fn max(self, other: Fix64) -> Fix64 {
        Ord::max(self, other)
    }

    #[inline(always)]
    pub fn clamp(self, lo: Fix64, hi: Fix64) -> Fix64 {
        debug_assert!(lo <= hi, "clamp bounds out of order: {:?} > {:?}", lo, hi);
        self.max(lo).min(hi)
    }

    #[inline(always)]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl From<i32> for Fix64 {
    fn from(value: i32) -> Self {
        Fix64::from_int(value)
    }
}

impl Add for Fix64 {
    type Output = Fix64;
    #[inline(always)]
    fn add(self, rhs: Fix64) -> Fix64 {
        self.saturating_add(rhs)
    }
}

impl Sub for Fix64 {
    type Output = Fix64;
    #[inline(always)]
    fn sub(self, rhs: Fix64) -> Fix64 {
        self.saturating_sub(rhs)
    }
}

impl Mul for Fix64 {
    type Output = Fix64;
    #[inline(always)]
    fn mul(self, rhs: Fix64) -> Fix64 {
        self.saturating_mul(rhs)
    }
}

impl Div for Fix64 {
    type Output = Fix64;
    #[inline(always)]
    fn div(self, rhs: Fix64) -> Fix64 {
        self.saturating_div(rhs)
    }
}

impl Neg for Fix64 {
    type Output = Fix64;
    #[inline(always)]
    fn neg(self) -> Fix64 {
        Fix64(self.0.saturating_neg())
    }
}

impl AddAssign for Fix64 {
    fn add_assign(&mut self, rhs: Fix64) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fix64 {
    fn sub_assign(&mut self, rhs: Fix64) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fix64 {
    fn mul_assign(&mut self, rhs: Fix64) {
        *self = *self * rhs;
    }
}

impl DivAssign for Fix64 {
    fn div_assign(&mut self, rhs: Fix64) {
        *self = *self / rhs;
    }
}

impl fmt::Display for Fix64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}

impl fmt::Debug for Fix64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fix64({} / {:#x})", self.to_f64(), self.0)
    }
}
