use std::f64::consts::{PI, TAU};

pub(crate) mod dms {
    /// Degrees per quarter turn
    pub const QD: i32 = 90;
    /// Degrees per half turn
    pub const HD: i32 = 2 * QD;
    /// Width of a UTM zone in degrees
    pub const ZONE_WIDTH: i32 = 6;
}

/// Evaluate a polynomial, coefficients ordered from the highest power down
pub(crate) fn polyval(p: &[f64], x: f64) -> f64 {
    p
        .iter()
        .fold(0_f64, |acc, val| acc*x + val)
}

pub(crate) trait GeoMath {
    fn ang_normalize(&self) -> Self;
    fn remainder(&self, denom: Self) -> Self;
    fn degrees(&self) -> Self;
    fn trunc_degrees(&self) -> i64;
}

impl GeoMath for f64 {
    /// Reduces an angle in radians to the half-open interval (-pi, pi].
    fn ang_normalize(&self) -> f64 {
        let value = self.remainder(TAU);

        if value <= -PI {
            value + TAU
        }
        else {
            value
        }
    }

    fn remainder(&self, denom: Self) -> Self {
        *self - (*self / denom).round() * denom
    }

    // Kept as `x * 180 / pi` rather than `to_degrees()`: zone and exception-band
    // boundaries depend on the last bit.
    fn degrees(&self) -> f64 {
        *self * f64::from(dms::HD) / PI
    }

    /// Degrees truncated toward zero.
    #[allow(clippy::cast_possible_truncation)]
    fn trunc_degrees(&self) -> i64 {
        self.degrees() as i64
    }
}
