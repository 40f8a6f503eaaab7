use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Fix64;

/// Magnitudes are rescaled so the largest component sits just below 0.5
/// before squaring. Squares then stay far from saturation and tiny vectors
/// keep their precision.
const SCALED_LEADING_ZEROS: i32 = 33;

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixVec2 {
    pub x: Fix64,
    pub y: Fix64,
}

impl FixVec2 {
    pub const ZERO: FixVec2 = FixVec2::new(Fix64::ZERO, Fix64::ZERO);
    pub const UNIT_X: FixVec2 = FixVec2::new(Fix64::ONE, Fix64::ZERO);
    pub const UNIT_Y: FixVec2 = FixVec2::new(Fix64::ZERO, Fix64::ONE);

    #[inline(always)]
    pub const fn new(x: Fix64, y: Fix64) -> Self {
        Self { x, y }
    }

    #[inline(always)]
    pub const fn from_ints(x: i32, y: i32) -> Self {
        Self::new(Fix64::from_int(x), Fix64::from_int(y))
    }

    #[inline(always)]
    pub fn is_zero(self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    #[inline(always)]
    pub fn dot(self, other: FixVec2) -> Fix64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    #[inline(always)]
    pub fn cross(self, other: FixVec2) -> Fix64 {
        self.x * other.y - self.y * other.x
    }

    /// Counter-clockwise perpendicular.
    #[inline(always)]
    pub fn perp(self) -> FixVec2 {
        FixVec2::new(-self.y, self.x)
    }

    #[inline(always)]
    pub fn length_squared(self) -> Fix64 {
        self.dot(self)
    }

    #[inline(always)]
    pub fn distance_squared(self, other: FixVec2) -> Fix64 {
        (self - other).length_squared()
    }

    pub fn length(self) -> Fix64 {
        let Some((scaled, shift)) = self.rescaled() else {
            return Fix64::ZERO;
        };
        let len = scaled.length_squared().sqrt().raw();
        if shift < 0 {
            return Fix64::from_raw(len >> -shift);
        }
        let up = shift as u32;
        if len.leading_zeros() <= up {
            Fix64::MAX
        } else {
            Fix64::from_raw(len << up)
        }
    }

    /// Unit vector in the same direction. The zero vector stays zero.
    pub fn normalized(self) -> FixVec2 {
        let Some((scaled, _)) = self.rescaled() else {
            return FixVec2::ZERO;
        };
        let len = scaled.length_squared().sqrt();
        FixVec2::new(scaled.x / len, scaled.y / len)
    }

    /// Shifts both components by the same amount so the largest magnitude has
    /// exactly `SCALED_LEADING_ZEROS` leading zeros. A positive shift means the
    /// components were shifted right.
    fn rescaled(self) -> Option<(FixVec2, i32)> {
        let m = self.x.raw().unsigned_abs().max(self.y.raw().unsigned_abs());
        if m == 0 {
            return None;
        }
        let shift = SCALED_LEADING_ZEROS - m.leading_zeros() as i32;
        let scale = |v: Fix64| {
            if shift >= 0 {
                Fix64::from_raw(v.raw() >> shift)
            } else {
                Fix64::from_raw(v.raw() << -shift)
            }
        };
        Some((FixVec2::new(scale(self.x), scale(self.y)), shift))
    }

    /// Rotation with the interpolated sine table.
    pub fn rotated(self, angle: Fix64) -> FixVec2 {
        self.rotated_by(angle.sin(), angle.cos())
    }

    /// Rotation with the nearest-entry sine table.
    pub fn fast_rotated(self, angle: Fix64) -> FixVec2 {
        self.rotated_by(angle.fast_sin(), angle.fast_cos())
    }

    #[inline(always)]
    pub fn rotated_by(self, sin: Fix64, cos: Fix64) -> FixVec2 {
        FixVec2::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
        )
    }

    pub fn min(self, other: FixVec2) -> FixVec2 {
        FixVec2::new(self.x.min(other.x), self.y.min(other.y))
    }

    pub fn max(self, other: FixVec2) -> FixVec2 {
        FixVec2::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Unit normal of `self` on the side `towards` points to, or zero when the
    /// two are parallel. Only the sign of the cross product is used and both
    /// inputs are normalized first, so long edges cannot saturate it.
    pub fn normal_towards(self, towards: FixVec2) -> FixVec2 {
        let edge = self.normalized();
        let side = edge.cross(towards.normalized());
        if side.is_zero() {
            FixVec2::ZERO
        } else if side > Fix64::ZERO {
            edge.perp()
        } else {
            -edge.perp()
        }
    }
}

impl Add for FixVec2 {
    type Output = FixVec2;
    #[inline(always)]
    fn add(self, rhs: FixVec2) -> FixVec2 {
        FixVec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for FixVec2 {
    type Output = FixVec2;
    #[inline(always)]
    fn sub(self, rhs: FixVec2) -> FixVec2 {
        FixVec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign for FixVec2 {
    fn add_assign(&mut self, rhs: FixVec2) {
        *self = *self + rhs;
    }
}

impl SubAssign for FixVec2 {
    fn sub_assign(&mut self, rhs: FixVec2) {
        *self = *self - rhs;
    }
}

impl Mul<Fix64> for FixVec2 {
    type Output = FixVec2;
    #[inline(always)]
    fn mul(self, rhs: Fix64) -> FixVec2 {
        FixVec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<Fix64> for FixVec2 {
    type Output = FixVec2;
    #[inline(always)]
    fn div(self, rhs: Fix64) -> FixVec2 {
        FixVec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for FixVec2 {
    type Output = FixVec2;
    #[inline(always)]
    fn neg(self) -> FixVec2 {
        FixVec2::new(-self.x, -self.y)
    }
}

impl fmt::Debug for FixVec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
