//! ULP (unit in the last place) distance between floating-point values.
//!
//! The distance is the number of representable values stepped over when
//! moving from one operand to the other, so it is meaningful across sign
//! changes: the smallest negative subnormal and the smallest positive
//! subnormal are two ULPs apart. Both zeros map to the same position; the
//! comparator treats their sign separately.

/// Floating-point types the comparator knows how to measure.
pub trait UlpFloat: Copy + PartialEq {
    /// True if the value is NaN.
    fn is_nan_value(self) -> bool;

    /// True for `+0.0` and `-0.0`.
    fn is_zero(self) -> bool;

    /// True if the sign bit is set.
    fn sign_bit(self) -> bool;

    /// True if both values have identical bit patterns.
    fn bits_eq(self, other: Self) -> bool;

    /// ULP distance to `other`. NaN on either side yields `u64::MAX`.
    fn ulp_distance(self, other: Self) -> u64;
}

/// ULP distance between two `f32` values.
pub fn ulp_distance_f32(a: f32, b: f32) -> u64 {
    if a.is_nan() || b.is_nan() {
        return u64::MAX;
    }
    ordered_f32(a).abs_diff(ordered_f32(b))
}

/// ULP distance between two `f64` values.
pub fn ulp_distance_f64(a: f64, b: f64) -> u64 {
    if a.is_nan() || b.is_nan() {
        return u64::MAX;
    }
    let diff = ordered_f64(a).abs_diff(ordered_f64(b));
    u64::try_from(diff).unwrap_or(u64::MAX)
}

/// Map the bit pattern onto a monotonic integer line.
fn ordered_f32(x: f32) -> i64 {
    let bits = x.to_bits();
    let magnitude = i64::from(bits & 0x7fff_ffff);
    if bits >> 31 == 1 {
        -magnitude
    } else {
        magnitude
    }
}

fn ordered_f64(x: f64) -> i128 {
    let bits = x.to_bits();
    let magnitude = i128::from(bits & 0x7fff_ffff_ffff_ffff);
    if bits >> 63 == 1 {
        -magnitude
    } else {
        magnitude
    }
}

impl UlpFloat for f32 {
    fn is_nan_value(self) -> bool {
        self.is_nan()
    }

    fn is_zero(self) -> bool {
        self == 0.0
    }

    fn sign_bit(self) -> bool {
        self.is_sign_negative()
    }

    fn bits_eq(self, other: Self) -> bool {
        self.to_bits() == other.to_bits()
    }

    fn ulp_distance(self, other: Self) -> u64 {
        ulp_distance_f32(self, other)
    }
}

impl UlpFloat for f64 {
    fn is_nan_value(self) -> bool {
        self.is_nan()
    }

    fn is_zero(self) -> bool {
        self == 0.0
    }

    fn sign_bit(self) -> bool {
        self.is_sign_negative()
    }

    fn bits_eq(self, other: Self) -> bool {
        self.to_bits() == other.to_bits()
    }

    fn ulp_distance(self, other: Self) -> u64 {
        ulp_distance_f64(self, other)
    }
}
