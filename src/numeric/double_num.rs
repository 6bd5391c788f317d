// ============================================================================
// Floating-Point Backend
// Native f64 values with tolerant equality
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::num::Num;
use std::cmp::Ordering;
use std::fmt;

/// Two doubles closer than this are equal under `==`.
pub const EPSILON: f64 = 0.00001;

/// Native double value. Never holds a float NaN: every operation that would
/// produce one returns [`Num::NaN`] instead.
#[derive(Debug, Clone, Copy)]
pub struct DoubleNum(f64);

impl DoubleNum {
    /// Wrap `value`, mapping a float NaN to the sentinel.
    pub(crate) fn wrap(value: f64) -> Num {
        if value.is_nan() {
            Num::NaN
        } else {
            Num::Double(Self(value))
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    pub fn plus(self, augend: Self) -> Num {
        Self::wrap(self.0 + augend.0)
    }

    pub fn minus(self, subtrahend: Self) -> Num {
        Self::wrap(self.0 - subtrahend.0)
    }

    pub fn multiplied_by(self, multiplicand: Self) -> Num {
        Self::wrap(self.0 * multiplicand.0)
    }

    pub fn divided_by(self, divisor: Self) -> Num {
        if divisor.0 == 0.0 {
            return Num::NaN;
        }
        Self::wrap(self.0 / divisor.0)
    }

    pub fn remainder(self, divisor: Self) -> Num {
        if divisor.0 == 0.0 {
            return Num::NaN;
        }
        Self::wrap(self.0 % divisor.0)
    }

    /// Overflows to infinity instead of failing.
    pub fn pow(self, n: i32) -> Num {
        Self::wrap(self.0.powi(n))
    }

    pub fn pow_num(self, exponent: Self) -> Num {
        Self::wrap(self.0.powf(exponent.0))
    }

    pub fn sqrt(self) -> Num {
        Self::wrap(self.0.sqrt())
    }

    pub fn log(self) -> Num {
        if self.0 <= 0.0 {
            return Num::NaN;
        }
        Self::wrap(self.0.ln())
    }

    pub fn exp(self) -> Num {
        Self::wrap(self.0.exp())
    }

    pub fn abs(self) -> Num {
        Self::wrap(self.0.abs())
    }

    pub fn negate(self) -> Num {
        Self::wrap(-self.0)
    }

    pub fn floor(self) -> Num {
        Self::wrap(self.0.floor())
    }

    pub fn ceil(self) -> Num {
        Self::wrap(self.0.ceil())
    }

    // ========================================================================
    // Comparison and Conversion
    // ========================================================================

    /// Exact ordering; `-0.0` and `0.0` are equal.
    pub fn compare(self, other: Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }

    /// Equality within [`EPSILON`].
    pub fn approx_eq(self, other: Self) -> bool {
        self.0 == other.0 || (self.0 - other.0).abs() < EPSILON
    }

    pub fn signum(self) -> i32 {
        match self.compare(Self(0.0)) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    /// Truncated toward zero.
    ///
    /// # Errors
    /// `Overflow` for infinities and values outside the `i64` range.
    pub fn to_i64(self) -> NumericResult<i64> {
        let truncated = self.0.trunc();
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
            return Err(NumericError::Overflow);
        }
        Ok(truncated as i64)
    }
}

impl fmt::Display for DoubleNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
