// ============================================================================
// Precision Context
// Significant-digit count and rounding mode governing decimal results
// ============================================================================

use super::errors::{NumericError, NumericResult};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default number of significant digits for decimal values.
pub const DEFAULT_PRECISION: u32 = 32;

/// How a decimal result is rounded when it has more digits than its context allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundingMode {
    /// Away from zero
    Up,
    /// Toward zero (truncation)
    Down,
    /// Toward positive infinity
    Ceiling,
    /// Toward negative infinity
    Floor,
    /// Nearest neighbour, ties away from zero
    #[default]
    HalfUp,
    /// Nearest neighbour, ties toward zero
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour
    HalfEven,
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundingMode::Up => "UP",
            RoundingMode::Down => "DOWN",
            RoundingMode::Ceiling => "CEILING",
            RoundingMode::Floor => "FLOOR",
            RoundingMode::HalfUp => "HALF_UP",
            RoundingMode::HalfDown => "HALF_DOWN",
            RoundingMode::HalfEven => "HALF_EVEN",
        };
        f.write_str(name)
    }
}

/// Precision context: number of significant digits plus a rounding mode.
///
/// Every decimal `Num` carries one. Binary operations round their result
/// with the receiver's context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MathContext {
    precision: u32,
    rounding: RoundingMode,
}

impl MathContext {
    /// Create a context with `precision` significant digits.
    ///
    /// # Errors
    /// Returns `InvalidPrecision` if `precision` is zero.
    pub fn new(precision: u32, rounding: RoundingMode) -> NumericResult<Self> {
        if precision == 0 {
            return Err(NumericError::InvalidPrecision);
        }
        Ok(Self {
            precision,
            rounding,
        })
    }

    /// Create a `HALF_UP` context with `precision` significant digits.
    ///
    /// # Errors
    /// Returns `InvalidPrecision` if `precision` is zero.
    pub fn with_precision(precision: u32) -> NumericResult<Self> {
        Self::new(precision, RoundingMode::HalfUp)
    }

    /// Caller guarantees `precision > 0`.
    pub(crate) const fn from_parts(precision: u32, rounding: RoundingMode) -> Self {
        Self {
            precision,
            rounding,
        }
    }

    #[inline]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    #[inline]
    pub const fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// Same rounding mode, `extra` more digits.
    pub(crate) fn widened(&self, extra: u32) -> Self {
        Self::from_parts(self.precision.saturating_add(extra), self.rounding)
    }
}

impl Default for MathContext {
    fn default() -> Self {
        Self::from_parts(DEFAULT_PRECISION, RoundingMode::HalfUp)
    }
}

impl fmt::Display for MathContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "precision={} rounding={}", self.precision, self.rounding)
    }
}
