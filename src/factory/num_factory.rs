// ============================================================================
// Num Factory
// Per-context constants and conversion into one representation
// ============================================================================

use crate::numeric::{
    BigDecimal, DecimalNum, DoubleNum, MathContext, Num, NumericError, NumericResult,
};

// ============================================================================
// Raw Input
// ============================================================================

/// Native input accepted by [`NumFactory::num_of`] and [`Num::spawn`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    Int(i64),
    Float(f64),
    Float32(f32),
    Decimal(rust_decimal::Decimal),
}

impl From<i32> for NumericValue {
    fn from(value: i32) -> Self {
        NumericValue::Int(i64::from(value))
    }
}

impl From<u32> for NumericValue {
    fn from(value: u32) -> Self {
        NumericValue::Int(i64::from(value))
    }
}

impl From<i64> for NumericValue {
    fn from(value: i64) -> Self {
        NumericValue::Int(value)
    }
}

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        NumericValue::Float(value)
    }
}

impl From<f32> for NumericValue {
    fn from(value: f32) -> Self {
        NumericValue::Float32(value)
    }
}

impl From<rust_decimal::Decimal> for NumericValue {
    fn from(value: rust_decimal::Decimal) -> Self {
        NumericValue::Decimal(value)
    }
}

// ============================================================================
// Representation Kind
// ============================================================================

/// Representation tag, plus the precision context for decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumKind {
    Decimal(MathContext),
    Double,
    NaN,
}

impl NumKind {
    /// Convert native input into this representation.
    ///
    /// Floats go through their shortest decimal string, so `0.1` becomes
    /// exactly `0.1` as a decimal. Non-finite floats become NaN.
    pub fn num_of(&self, value: NumericValue) -> Num {
        match self {
            NumKind::Decimal(ctx) => {
                let decimal = match value {
                    NumericValue::Int(i) => Ok(BigDecimal::from_i64(i)),
                    NumericValue::Float(f) => BigDecimal::from_f64(f),
                    NumericValue::Float32(f) if f.is_finite() => f.to_string().parse(),
                    NumericValue::Float32(_) => Err(NumericError::InvalidInput),
                    NumericValue::Decimal(d) => Ok(BigDecimal::from_rust_decimal(&d)),
                };
                match decimal {
                    Ok(decimal) => Num::Decimal(DecimalNum::new(decimal, *ctx)),
                    Err(_) => Num::NaN,
                }
            },
            NumKind::Double => {
                let double = match value {
                    NumericValue::Int(i) => i as f64,
                    NumericValue::Float(f) => f,
                    // widen through the shortest string: 0.1f32 -> 0.1
                    NumericValue::Float32(f) => f.to_string().parse().unwrap_or(f64::from(f)),
                    NumericValue::Decimal(d) => BigDecimal::from_rust_decimal(&d).to_f64(),
                };
                DoubleNum::wrap(double)
            },
            NumKind::NaN => Num::NaN,
        }
    }

    /// Parse `value` into this representation; `"NaN"` in any case is NaN.
    ///
    /// # Errors
    /// `InvalidInput` if `value` is not a number; `Overflow` / `Underflow`
    /// if its exponent leaves the decimal scale range.
    pub fn num_of_str(&self, value: &str) -> NumericResult<Num> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("nan") {
            return Ok(Num::NaN);
        }
        match self {
            NumKind::Decimal(ctx) => Ok(Num::Decimal(DecimalNum::new(value.parse()?, *ctx))),
            NumKind::Double => value
                .parse::<f64>()
                .map(DoubleNum::wrap)
                .map_err(|_| NumericError::InvalidInput),
            NumKind::NaN => value.parse::<BigDecimal>().map(|_| Num::NaN),
        }
    }

    /// Whether `num` belongs to this representation. NaN belongs to all.
    pub fn produces(&self, num: &Num) -> bool {
        match (self, num) {
            (_, Num::NaN) => true,
            (NumKind::Decimal(ctx), Num::Decimal(d)) => d.context() == *ctx,
            (NumKind::Double, Num::Double(_)) => true,
            _ => false,
        }
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Source of all `Num`s in one computation context.
///
/// Immutable after construction; the constants are built once per factory.
///
/// # Example
/// ```
/// use ta_num::prelude::*;
///
/// let factory = NumFactory::decimal(16).unwrap();
/// let price = factory.num_of_str("101.25").unwrap();
/// let scaled = price.multiplied_by(factory.hundred());
/// assert_eq!(scaled.to_string(), "10125.00");
/// assert!(factory.produces(&scaled));
/// ```
#[derive(Debug, Clone)]
pub struct NumFactory {
    kind: NumKind,
    minus_one: Num,
    zero: Num,
    one: Num,
    two: Num,
    three: Num,
    hundred: Num,
    thousand: Num,
}

impl NumFactory {
    pub(crate) fn from_kind(kind: NumKind) -> Self {
        let of = |value: i64| kind.num_of(NumericValue::Int(value));
        Self {
            kind,
            minus_one: of(-1),
            zero: of(0),
            one: of(1),
            two: of(2),
            three: of(3),
            hundred: of(100),
            thousand: of(1000),
        }
    }

    /// Decimal factory with `precision` significant digits, `HALF_UP`.
    ///
    /// # Errors
    /// `InvalidPrecision` if `precision` is zero.
    pub fn decimal(precision: u32) -> NumericResult<Self> {
        Ok(Self::decimal_with_context(MathContext::with_precision(
            precision,
        )?))
    }

    pub fn decimal_with_context(context: MathContext) -> Self {
        Self::from_kind(NumKind::Decimal(context))
    }

    pub fn double() -> Self {
        Self::from_kind(NumKind::Double)
    }

    /// Factory whose every value, constants included, is NaN.
    pub fn nan() -> Self {
        Self::from_kind(NumKind::NaN)
    }

    #[inline]
    pub fn kind(&self) -> NumKind {
        self.kind
    }

    /// Precision context of a decimal factory.
    pub fn context(&self) -> Option<MathContext> {
        match self.kind {
            NumKind::Decimal(ctx) => Some(ctx),
            _ => None,
        }
    }

    // ========================================================================
    // Constants
    // ========================================================================

    pub fn minus_one(&self) -> &Num {
        &self.minus_one
    }

    pub fn zero(&self) -> &Num {
        &self.zero
    }

    pub fn one(&self) -> &Num {
        &self.one
    }

    pub fn two(&self) -> &Num {
        &self.two
    }

    pub fn three(&self) -> &Num {
        &self.three
    }

    pub fn hundred(&self) -> &Num {
        &self.hundred
    }

    pub fn thousand(&self) -> &Num {
        &self.thousand
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Convert a native number; see [`NumKind::num_of`].
    pub fn num_of(&self, value: impl Into<NumericValue>) -> Num {
        self.kind.num_of(value.into())
    }

    /// Parse a string at this factory's precision.
    ///
    /// # Errors
    /// `InvalidInput` if `value` is not a number; `Overflow` / `Underflow`
    /// if its exponent leaves the decimal scale range.
    pub fn num_of_str(&self, value: &str) -> NumericResult<Num> {
        self.kind.num_of_str(value)
    }

    /// Whether `num` could have come from this factory.
    pub fn produces(&self, num: &Num) -> bool {
        self.kind.produces(num)
    }

    /// Guard for values entering a computation context from outside.
    ///
    /// # Errors
    /// `RepresentationMismatch` if this factory does not produce `num`.
    pub fn ensure_produces(&self, num: &Num) -> NumericResult<()> {
        if self.produces(num) {
            return Ok(());
        }
        tracing::warn!(
            factory = ?self.kind,
            num = num.name(),
            context = ?num.context(),
            "rejected foreign num"
        );
        Err(NumericError::RepresentationMismatch)
    }
}

impl Default for NumFactory {
    fn default() -> Self {
        Self::decimal_with_context(MathContext::default())
    }
}
