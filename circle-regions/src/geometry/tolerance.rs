// Process-wide rounding precision and the rounded comparisons built on it.
//
// Every geometric equality test in the engine (tangency vs. crossing, node
// deduplication, containment) goes through `quantize`, so two values are
// "equal" when they agree to `precision()` decimal digits.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

pub const DEFAULT_DIGITS: u32 = 10;
pub const COARSE_DIGITS: u32 = 6;
pub const FINE_DIGITS: u32 = 12;
// 10^15 keeps unit-scale coordinates inside the f64 integer range.
pub const MAX_DIGITS: u32 = 15;

static PRECISION: AtomicU32 = AtomicU32::new(DEFAULT_DIGITS);

/// Named rounding presets, or an explicit decimal digit count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precision {
    Coarse,
    Default,
    Fine,
    Digits(u32),
}

impl Precision {
    pub fn digits(self) -> u32 {
        match self {
            Precision::Coarse => COARSE_DIGITS,
            Precision::Default => DEFAULT_DIGITS,
            Precision::Fine => FINE_DIGITS,
            Precision::Digits(d) => d.min(MAX_DIGITS),
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Precision::Default
    }
}

/// Sets the rounding precision used by every engine's next recomputation.
pub fn set_precision(p: Precision) {
    PRECISION.store(p.digits(), Ordering::Relaxed);
}

/// Current number of decimal digits kept by rounded comparisons.
#[inline]
pub fn precision() -> u32 {
    PRECISION.load(Ordering::Relaxed)
}

#[inline]
fn scale_for(digits: u32) -> f64 {
    10f64.powi(digits as i32)
}

/// `x` scaled to the rounding grid and rounded; equal grid values compare equal.
#[inline]
pub fn quantize_with(x: f64, digits: u32) -> f64 {
    let q = (x * scale_for(digits)).round();
    // fold -0.0 into 0.0 so grid keys hash the same
    if q == 0.0 {
        0.0
    } else {
        q
    }
}

#[inline]
pub fn quantize(x: f64) -> f64 {
    quantize_with(x, precision())
}

/// `x` rounded to the current precision, in the original units.
#[inline]
pub fn round_to_precision(x: f64) -> f64 {
    let digits = precision();
    quantize_with(x, digits) / scale_for(digits)
}

#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    quantize(a) == quantize(b)
}

#[inline]
pub fn approx_lt(a: f64, b: f64) -> bool {
    quantize(a) < quantize(b)
}

#[inline]
pub fn approx_gt(a: f64, b: f64) -> bool {
    quantize(a) > quantize(b)
}

/// Integer grid key used to deduplicate intersection points.
#[inline]
pub fn grid_key(x: f64, y: f64) -> (i64, i64) {
    (quantize(x) as i64, quantize(y) as i64)
}
