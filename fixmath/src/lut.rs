//! Quarter-wave sine table, built at compile time from an integer Taylor series.

use crate::fix64::Fix64;

pub(crate) const SEGMENTS: i64 = 4096;

const PI_RAW: i64 = Fix64::PI.raw();
const PI_OVER_2_RAW: i64 = Fix64::PI_OVER_2.raw();
const PI_TIMES_2_RAW: i64 = Fix64::PI_TIMES_2.raw();

// pi / 2 in Q2.62.
const PI_OVER_2_Q62: i128 = 0x6487_ED51_10B4_611A;
const Q62_ONE: i128 = 1 << 62;

const fn sin_q62(x: i128) -> i128 {
    let x2 = (x * x) / Q62_ONE;
    let mut term = x;
    let mut sum = x;
    let mut n: i128 = 1;
    while n < 14 {
        term = -(term * x2 / Q62_ONE) / ((2 * n) * (2 * n + 1));
        sum += term;
        n += 1;
    }
    sum
}

const fn build_sin_lut() -> [i64; SEGMENTS as usize + 1] {
    let mut table = [0i64; SEGMENTS as usize + 1];
    let mut i = 0;
    while i <= SEGMENTS as usize {
        let angle = PI_OVER_2_Q62 * i as i128 / SEGMENTS as i128;
        let value = sin_q62(angle);
        table[i] = ((value + (1 << 29)) >> 30) as i64;
        i += 1;
    }
    table
}

static SIN_LUT: [i64; SEGMENTS as usize + 1] = build_sin_lut();

/// Maps an angle to `[0, pi/2]` and reports the mirrors needed to recover the
/// full-circle sine.
#[inline(always)]
fn fold_angle(angle: i64) -> (i64, bool) {
    let mut a = angle % PI_TIMES_2_RAW;
    if a < 0 {
        a += PI_TIMES_2_RAW;
    }
    let flip_vertical = a >= PI_RAW;
    if flip_vertical {
        a -= PI_RAW;
    }
    if a >= PI_OVER_2_RAW {
        a = (PI_RAW - a).max(0);
    }
    (a, flip_vertical)
}

pub(crate) fn sin_raw(angle: i64, interpolate: bool) -> i64 {
    let (a, negate) = fold_angle(angle);
    let scaled = a * SEGMENTS;
    let value = if interpolate {
        let idx = (scaled / PI_OVER_2_RAW) as usize;
        if idx >= SEGMENTS as usize {
            SIN_LUT[SEGMENTS as usize]
        } else {
            let frac = scaled % PI_OVER_2_RAW;
            let lo = SIN_LUT[idx];
            let hi = SIN_LUT[idx + 1];
            lo + (hi - lo) * frac / PI_OVER_2_RAW
        }
    } else {
        let idx = ((scaled + PI_OVER_2_RAW / 2) / PI_OVER_2_RAW) as usize;
        SIN_LUT[idx.min(SEGMENTS as usize)]
    };
    if negate {
        -value
    } else {
        value
    }
}

/// cos(x) == sin(x + pi/2), shifted the other way for positive angles so the
/// addition never overflows.
#[inline(always)]
pub(crate) fn cos_to_sin_angle(angle: i64) -> i64 {
    if angle > 0 {
        angle - (PI_RAW + PI_OVER_2_RAW)
    } else {
        angle + PI_OVER_2_RAW
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_endpoints() {
        assert_eq!(SIN_LUT[0], 0);
        assert!((SIN_LUT[SEGMENTS as usize] - Fix64::ONE.raw()).abs() <= 1);
    }

    #[test]
    fn table_is_monotonic() {
        for pair in SIN_LUT.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }
}
