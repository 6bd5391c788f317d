// ============================================================================
// Numeric Configuration
// Representation and precision settings for a computation context
// ============================================================================

use crate::numeric::{MathContext, NumericError, NumericResult, RoundingMode, DEFAULT_PRECISION};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound accepted by [`NumConfig::validate`].
pub const MAX_PRECISION: u32 = 100_000;

/// Precision used by [`NumConfig::high_precision`].
pub const HIGH_PRECISION: u32 = 128;

// ============================================================================
// Representation
// ============================================================================

/// Backing representation for every `Num` of a computation context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Representation {
    /// Arbitrary-precision decimal rounded to a precision context
    /// - Deterministic digits, slower arithmetic
    /// - Use case: reconciliation, reporting, regression fixtures
    Decimal,

    /// Native IEEE-754 double
    /// - Fast, equality tolerant to a fixed epsilon
    /// - Use case: backtests over long series
    Double,
}

// ============================================================================
// Complete Numeric Configuration
// ============================================================================

/// Configuration for creating a `NumFactory`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NumConfig {
    /// Backing representation
    pub representation: Representation,

    /// Significant digits for decimal values; ignored by doubles
    pub precision: u32,

    /// Rounding mode for decimal values; ignored by doubles
    pub rounding: RoundingMode,
}

impl NumConfig {
    /// Create a new configuration with default precision and `HALF_UP` rounding
    pub fn new(representation: Representation) -> Self {
        Self {
            representation,
            precision: DEFAULT_PRECISION,
            rounding: RoundingMode::HalfUp,
        }
    }

    /// Builder method: Set decimal precision
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Builder method: Set decimal rounding mode
    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> NumericResult<()> {
        if self.representation == Representation::Decimal
            && (self.precision == 0 || self.precision > MAX_PRECISION)
        {
            return Err(NumericError::InvalidPrecision);
        }
        Ok(())
    }

    /// Precision context described by this configuration
    pub fn math_context(&self) -> NumericResult<MathContext> {
        self.validate()?;
        MathContext::new(self.precision, self.rounding)
    }
}

impl Default for NumConfig {
    fn default() -> Self {
        Self::decimal()
    }
}

// ============================================================================
// Preset Configurations
// ============================================================================

impl NumConfig {
    /// Decimal with 32 significant digits, `HALF_UP`
    pub fn decimal() -> Self {
        Self::new(Representation::Decimal)
    }

    /// Decimal with 128 significant digits, `HALF_UP`
    pub fn high_precision() -> Self {
        Self::new(Representation::Decimal).with_precision(HIGH_PRECISION)
    }

    /// Native doubles
    pub fn double() -> Self {
        Self::new(Representation::Double)
    }
}
