// ============================================================================
// Num
// Closed sum type over the decimal, double and NaN representations
// ============================================================================

use super::context::MathContext;
use super::decimal_num::DecimalNum;
use super::double_num::DoubleNum;
use super::errors::{NumericError, NumericResult};
use crate::factory::{NumFactory, NumKind, NumericValue};
use crate::interfaces::{NoOpObserver, NumericObserver};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

/// Immutable numeric value used throughout an analysis pipeline.
///
/// All operands of one expression must share a representation: combining a
/// `Decimal` with a `Double` panics with
/// [`NumericError::RepresentationMismatch`]. `NaN` combines with anything
/// and absorbs it.
///
/// Equality (`==`) is value equality: decimals compare numerically across
/// scales, doubles within [`EPSILON`](super::EPSILON), and `NaN == NaN`.
/// The relational predicates (`is_equal`, `is_greater_than`, ...) are exact
/// and always `false` when either side is `NaN`.
///
/// # Example
/// ```
/// use ta_num::prelude::*;
///
/// let factory = NumFactory::decimal(16).unwrap();
/// let a = factory.num_of(1);
/// let b = factory.num_of(3);
/// assert_eq!((&a / &b).to_string(), "0.3333333333333333");
/// assert!(a.divided_by(factory.zero()).is_nan());
/// ```
#[derive(Clone, Debug)]
pub enum Num {
    Decimal(DecimalNum),
    Double(DoubleNum),
    NaN,
}

#[cold]
#[track_caller]
fn mismatch(op: &str, left: &Num, right: &Num) -> ! {
    panic!(
        "{}: {} {} {}",
        NumericError::RepresentationMismatch,
        left.name(),
        op,
        right.name()
    )
}

impl Num {
    #[track_caller]
    fn combine(
        &self,
        other: &Num,
        op: &str,
        decimal: impl FnOnce(&DecimalNum, &DecimalNum) -> Num,
        double: impl FnOnce(DoubleNum, DoubleNum) -> Num,
    ) -> Num {
        match (self, other) {
            (Num::NaN, _) | (_, Num::NaN) => Num::NaN,
            (Num::Decimal(a), Num::Decimal(b)) => decimal(a, b),
            (Num::Double(a), Num::Double(b)) => double(*a, *b),
            _ => mismatch(op, self, other),
        }
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    #[track_caller]
    pub fn plus(&self, augend: &Num) -> Num {
        self.combine(augend, "+", DecimalNum::plus, DoubleNum::plus)
    }

    #[track_caller]
    pub fn minus(&self, subtrahend: &Num) -> Num {
        self.combine(subtrahend, "-", DecimalNum::minus, DoubleNum::minus)
    }

    #[track_caller]
    pub fn multiplied_by(&self, multiplicand: &Num) -> Num {
        self.combine(
            multiplicand,
            "*",
            DecimalNum::multiplied_by,
            DoubleNum::multiplied_by,
        )
    }

    /// NaN when `divisor` is zero or NaN.
    #[track_caller]
    pub fn divided_by(&self, divisor: &Num) -> Num {
        self.combine(divisor, "/", DecimalNum::divided_by, DoubleNum::divided_by)
    }

    /// Remainder of truncating division, NaN when `divisor` is zero or NaN.
    #[track_caller]
    pub fn remainder(&self, divisor: &Num) -> Num {
        self.combine(divisor, "%", DecimalNum::remainder, DoubleNum::remainder)
    }

    /// Integer power.
    ///
    /// # Errors
    /// Decimal powers fail with `ExponentOutOfRange`, `Overflow` or
    /// `Underflow` when the result cannot be represented. Doubles overflow
    /// to infinity instead.
    pub fn try_pow(&self, n: i32) -> NumericResult<Num> {
        match self {
            Num::Decimal(d) => d.try_pow(n),
            Num::Double(d) => Ok(d.pow(n)),
            Num::NaN => Ok(Num::NaN),
        }
    }

    /// Integer power.
    ///
    /// # Panics
    /// When [`try_pow`](Self::try_pow) fails.
    #[track_caller]
    pub fn pow(&self, n: i32) -> Num {
        self.try_pow(n)
            .unwrap_or_else(|err| panic!("{}.pow({}) failed: {}", self.name(), n, err))
    }

    /// Real power. Decimals split the exponent into integer and fractional
    /// parts; only the fractional part goes through `f64`.
    ///
    /// # Errors
    /// `ExponentOutOfRange` if the integer part of a decimal exponent does
    /// not fit an `i32`.
    #[track_caller]
    pub fn try_pow_num(&self, exponent: &Num) -> NumericResult<Num> {
        match (self, exponent) {
            (Num::NaN, _) | (_, Num::NaN) => Ok(Num::NaN),
            (Num::Decimal(a), Num::Decimal(b)) => a.try_pow_num(b),
            (Num::Double(a), Num::Double(b)) => Ok(a.pow_num(*b)),
            _ => mismatch("pow", self, exponent),
        }
    }

    /// # Panics
    /// When [`try_pow_num`](Self::try_pow_num) fails.
    #[track_caller]
    pub fn pow_num(&self, exponent: &Num) -> Num {
        self.try_pow_num(exponent).unwrap_or_else(|err| {
            panic!("{}.pow({}) failed: {}", self.name(), exponent, err)
        })
    }

    /// Square root at the receiver's own precision.
    pub fn sqrt(&self) -> Num {
        match self {
            Num::Decimal(d) => d.sqrt(d.context(), &NoOpObserver),
            Num::Double(d) => d.sqrt(),
            Num::NaN => Num::NaN,
        }
    }

    /// Square root with `precision` significant digits. Doubles ignore the
    /// precision.
    ///
    /// # Panics
    /// If `precision` is zero.
    #[track_caller]
    pub fn sqrt_with_precision(&self, precision: u32) -> Num {
        self.try_sqrt_with_precision(precision)
            .unwrap_or_else(|err| panic!("sqrt({}) failed: {}", precision, err))
    }

    /// # Errors
    /// `InvalidPrecision` if `precision` is zero.
    pub fn try_sqrt_with_precision(&self, precision: u32) -> NumericResult<Num> {
        self.sqrt_observed(precision, &NoOpObserver)
    }

    /// Square root reporting each Babylonian step to `observer`.
    ///
    /// # Errors
    /// `InvalidPrecision` if `precision` is zero.
    pub fn sqrt_observed(
        &self,
        precision: u32,
        observer: &dyn NumericObserver,
    ) -> NumericResult<Num> {
        match self {
            Num::Decimal(d) => {
                let context = MathContext::new(precision, d.context().rounding())?;
                Ok(d.sqrt(context, observer))
            },
            Num::Double(d) => {
                MathContext::with_precision(precision)?;
                Ok(d.sqrt())
            },
            Num::NaN => Ok(Num::NaN),
        }
    }

    /// Natural logarithm; NaN for non-positive values.
    pub fn log(&self) -> Num {
        self.log_observed(&NoOpObserver)
    }

    pub fn log_observed(&self, observer: &dyn NumericObserver) -> Num {
        match self {
            Num::Decimal(d) => d.log(observer),
            Num::Double(d) => d.log(),
            Num::NaN => Num::NaN,
        }
    }

    /// `e^self`.
    pub fn exp(&self) -> Num {
        self.exp_observed(&NoOpObserver)
    }

    pub fn exp_observed(&self, observer: &dyn NumericObserver) -> Num {
        match self {
            Num::Decimal(d) => d.exp(observer),
            Num::Double(d) => d.exp(),
            Num::NaN => Num::NaN,
        }
    }

    pub fn abs(&self) -> Num {
        match self {
            Num::Decimal(d) => d.abs(),
            Num::Double(d) => d.abs(),
            Num::NaN => Num::NaN,
        }
    }

    pub fn negate(&self) -> Num {
        match self {
            Num::Decimal(d) => d.negate(),
            Num::Double(d) => d.negate(),
            Num::NaN => Num::NaN,
        }
    }

    pub fn floor(&self) -> Num {
        match self {
            Num::Decimal(d) => d.floor(),
            Num::Double(d) => d.floor(),
            Num::NaN => Num::NaN,
        }
    }

    pub fn ceil(&self) -> Num {
        match self {
            Num::Decimal(d) => d.ceil(),
            Num::Double(d) => d.ceil(),
            Num::NaN => Num::NaN,
        }
    }

    /// Smaller of the two, the receiver on ties; NaN if either side is NaN.
    #[track_caller]
    pub fn min(&self, other: &Num) -> Num {
        match self.compare_to(other) {
            None => Num::NaN,
            Some(Ordering::Greater) => other.clone(),
            Some(_) => self.clone(),
        }
    }

    /// Larger of the two, the receiver on ties; NaN if either side is NaN.
    #[track_caller]
    pub fn max(&self, other: &Num) -> Num {
        match self.compare_to(other) {
            None => Num::NaN,
            Some(Ordering::Less) => other.clone(),
            Some(_) => self.clone(),
        }
    }

    /// `|self - other| <= delta`; false when any operand is NaN.
    #[track_caller]
    pub fn matches_within(&self, other: &Num, delta: &Num) -> bool {
        self.minus(other).abs().is_less_than_or_equal(delta)
    }

    // ========================================================================
    // Predicates
    // ========================================================================

    fn signum(&self) -> Option<i32> {
        match self {
            Num::Decimal(d) => Some(d.signum()),
            Num::Double(d) => Some(d.signum()),
            Num::NaN => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.signum() == Some(0)
    }

    pub fn is_positive(&self) -> bool {
        self.signum().is_some_and(|s| s > 0)
    }

    pub fn is_positive_or_zero(&self) -> bool {
        self.signum().is_some_and(|s| s >= 0)
    }

    pub fn is_negative(&self) -> bool {
        self.signum().is_some_and(|s| s < 0)
    }

    pub fn is_negative_or_zero(&self) -> bool {
        self.signum().is_some_and(|s| s <= 0)
    }

    #[inline]
    pub fn is_nan(&self) -> bool {
        matches!(self, Num::NaN)
    }

    // ========================================================================
    // Relational
    // ========================================================================

    /// Three-way comparison; `None` if either side is NaN.
    ///
    /// # Panics
    /// When the operands have different representations.
    #[track_caller]
    pub fn compare_to(&self, other: &Num) -> Option<Ordering> {
        match (self, other) {
            (Num::NaN, _) | (_, Num::NaN) => None,
            (Num::Decimal(a), Num::Decimal(b)) => Some(a.compare(b)),
            (Num::Double(a), Num::Double(b)) => Some(a.compare(*b)),
            _ => mismatch("compare", self, other),
        }
    }

    /// Exact numeric equality; unlike `==`, doubles get no tolerance.
    #[track_caller]
    pub fn is_equal(&self, other: &Num) -> bool {
        self.compare_to(other) == Some(Ordering::Equal)
    }

    #[track_caller]
    pub fn is_greater_than(&self, other: &Num) -> bool {
        self.compare_to(other) == Some(Ordering::Greater)
    }

    #[track_caller]
    pub fn is_greater_than_or_equal(&self, other: &Num) -> bool {
        matches!(
            self.compare_to(other),
            Some(Ordering::Greater | Ordering::Equal)
        )
    }

    #[track_caller]
    pub fn is_less_than(&self, other: &Num) -> bool {
        self.compare_to(other) == Some(Ordering::Less)
    }

    #[track_caller]
    pub fn is_less_than_or_equal(&self, other: &Num) -> bool {
        matches!(self.compare_to(other), Some(Ordering::Less | Ordering::Equal))
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Nearest double; NaN maps to `f64::NAN`.
    pub fn to_f64(&self) -> f64 {
        match self {
            Num::Decimal(d) => d.to_f64(),
            Num::Double(d) => d.value(),
            Num::NaN => f64::NAN,
        }
    }

    pub fn to_f32(&self) -> f32 {
        self.to_f64() as f32
    }

    /// Integral part, truncated toward zero.
    ///
    /// # Errors
    /// `NotANumber` for NaN, `Overflow` if the value does not fit.
    pub fn to_i64(&self) -> NumericResult<i64> {
        match self {
            Num::Decimal(d) => d.to_i64(),
            Num::Double(d) => d.to_i64(),
            Num::NaN => Err(NumericError::NotANumber),
        }
    }

    /// # Errors
    /// `NotANumber` for NaN, `Overflow` if the value does not fit.
    pub fn to_i32(&self) -> NumericResult<i32> {
        i32::try_from(self.to_i64()?).map_err(|_| NumericError::Overflow)
    }

    /// Convert to the 96-bit decimal used at API boundaries, rounding to its
    /// 28 significant digits.
    ///
    /// # Errors
    /// `NotANumber` for NaN, `Overflow` if the value does not fit.
    pub fn to_rust_decimal(&self) -> NumericResult<rust_decimal::Decimal> {
        match self {
            Num::Decimal(d) => d.to_rust_decimal(),
            Num::Double(d) => super::BigDecimal::from_f64(d.value())
                .map_err(|_| NumericError::Overflow)?
                .to_rust_decimal(),
            Num::NaN => Err(NumericError::NotANumber),
        }
    }

    // ========================================================================
    // Representation
    // ========================================================================

    pub fn name(&self) -> &'static str {
        match self {
            Num::Decimal(_) => "DecimalNum",
            Num::Double(_) => "DoubleNum",
            Num::NaN => "NaN",
        }
    }

    /// Precision context of a decimal, `None` otherwise.
    pub fn context(&self) -> Option<MathContext> {
        match self {
            Num::Decimal(d) => Some(d.context()),
            _ => None,
        }
    }

    pub fn kind(&self) -> NumKind {
        match self {
            Num::Decimal(d) => NumKind::Decimal(d.context()),
            Num::Double(_) => NumKind::Double,
            Num::NaN => NumKind::NaN,
        }
    }

    /// Factory producing values compatible with this one. The factory of
    /// NaN only produces NaN.
    pub fn num_factory(&self) -> NumFactory {
        NumFactory::from_kind(self.kind())
    }

    /// New value of the receiver's representation (and precision).
    pub fn spawn(&self, value: impl Into<NumericValue>) -> Num {
        self.kind().num_of(value.into())
    }

    /// # Errors
    /// `InvalidInput` if `value` is not a number.
    pub fn spawn_str(&self, value: &str) -> NumericResult<Num> {
        self.kind().num_of_str(value)
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl PartialEq for Num {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Num::Decimal(a), Num::Decimal(b)) => a.compare(b) == Ordering::Equal,
            (Num::Double(a), Num::Double(b)) => a.approx_eq(*b),
            (Num::NaN, Num::NaN) => true,
            _ => false,
        }
    }
}

/// `NaN == NaN` keeps the relation reflexive. The double tolerance is not
/// transitive, so double keys of one map should sit further apart than
/// [`EPSILON`](super::EPSILON).
impl Eq for Num {}

/// Decimals hash their trailing-zero-free value, so `1.50` and `1.5` land
/// together. Doubles hash only their variant: tolerant equality admits no
/// finer hash that stays consistent with `==`.
impl Hash for Num {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        if let Num::Decimal(d) = self {
            d.value().hash(state);
        }
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Num::Decimal(d) => fmt::Display::fmt(d, f),
            Num::Double(d) => fmt::Display::fmt(d, f),
            Num::NaN => f.write_str("NaN"),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Num {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

macro_rules! forward_binary_operator {
    ($trait:ident, $method:ident, $op:ident) => {
        impl $trait<&Num> for &Num {
            type Output = Num;

            #[track_caller]
            fn $method(self, rhs: &Num) -> Num {
                self.$op(rhs)
            }
        }

        impl $trait for Num {
            type Output = Num;

            #[track_caller]
            fn $method(self, rhs: Num) -> Num {
                (&self).$op(&rhs)
            }
        }
    };
}

forward_binary_operator!(Add, add, plus);
forward_binary_operator!(Sub, sub, minus);
forward_binary_operator!(Mul, mul, multiplied_by);
forward_binary_operator!(Div, div, divided_by);
forward_binary_operator!(Rem, rem, remainder);

impl Neg for &Num {
    type Output = Num;

    fn neg(self) -> Num {
        self.negate()
    }
}

impl Neg for Num {
    type Output = Num;

    fn neg(self) -> Num {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use quickcheck::quickcheck;

    fn decimal(precision: u32) -> NumFactory {
        NumFactory::decimal(precision).unwrap()
    }

    fn unary_ops() -> Vec<(&'static str, fn(&Num) -> Num)> {
        vec![
            ("sqrt", Num::sqrt),
            ("log", Num::log),
            ("exp", Num::exp),
            ("abs", Num::abs),
            ("negate", Num::negate),
            ("floor", Num::floor),
            ("ceil", Num::ceil),
        ]
    }

    fn binary_ops() -> Vec<(&'static str, fn(&Num, &Num) -> Num)> {
        vec![
            ("plus", Num::plus),
            ("minus", Num::minus),
            ("multiplied_by", Num::multiplied_by),
            ("divided_by", Num::divided_by),
            ("remainder", Num::remainder),
            ("pow_num", Num::pow_num),
        ]
    }

    #[test]
    fn test_nan_absorbs_every_operation() {
        for factory in [decimal(32), NumFactory::double()] {
            let x = factory.num_of(7);
            for (name, op) in binary_ops() {
                assert!(op(&x, &Num::NaN).is_nan(), "{} x NaN", name);
                assert!(op(&Num::NaN, &x).is_nan(), "{} NaN x", name);
            }
            for (name, op) in unary_ops() {
                assert!(op(&Num::NaN).is_nan(), "{} NaN", name);
            }
            assert!(Num::NaN.pow(2).is_nan());
            assert!(Num::NaN.sqrt_with_precision(10).is_nan());
        }
    }

    #[test]
    fn test_relational_predicates_false_on_nan() {
        let one = decimal(16).num_of(1);
        for (a, b) in [(&one, &Num::NaN), (&Num::NaN, &one), (&Num::NaN, &Num::NaN)] {
            assert!(!a.is_equal(b));
            assert!(!a.is_greater_than(b));
            assert!(!a.is_greater_than_or_equal(b));
            assert!(!a.is_less_than(b));
            assert!(!a.is_less_than_or_equal(b));
            assert_eq!(a.compare_to(b), None);
        }
        assert!(!Num::NaN.is_zero());
        assert!(!Num::NaN.is_positive_or_zero());
        assert!(!Num::NaN.is_negative_or_zero());
        assert!(Num::NaN.is_nan());
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Num::NaN, Num::NaN);

        let f = decimal(16);
        assert_eq!(f.num_of_str("1.50").unwrap(), f.num_of(1.5));

        let d = NumFactory::double();
        assert_eq!(d.num_of(1.00000001), d.num_of(1.0));
        assert_ne!(d.num_of(1.001), d.num_of(1.0));
        assert!(!d.num_of(1.00000001).is_equal(&d.num_of(1.0)));

        assert_ne!(f.num_of(1), d.num_of(1));
        assert_ne!(f.num_of(1), Num::NaN);
    }

    #[test]
    #[should_panic(expected = "representation mismatch")]
    fn test_mixed_representations_panic() {
        let a = decimal(16).num_of(1);
        let b = NumFactory::double().num_of(1);
        let _ = a.plus(&b);
    }

    #[test]
    #[should_panic(expected = "representation mismatch")]
    fn test_mixed_comparison_panics() {
        let a = decimal(16).num_of(1);
        let b = NumFactory::double().num_of(1);
        a.is_less_than(&b);
    }

    #[test]
    fn test_precision_asymmetry() {
        let a = decimal(10).num_of_str("1").unwrap();
        let b = decimal(20).num_of_str("0.12345678901234567890").unwrap();
        let sum = a.plus(&b);
        assert_eq!(sum.context().map(|c| c.precision()), Some(10));
        assert_eq!(sum.to_string(), "1.123456789");
    }

    #[test]
    fn test_division_by_zero() {
        for factory in [decimal(16), NumFactory::double()] {
            let x = factory.num_of(5);
            assert!(x.divided_by(factory.zero()).is_nan());
            assert!(x.remainder(factory.zero()).is_nan());
        }
    }

    #[test]
    fn test_sqrt_scenarios() {
        let f = decimal(32);
        let root = f.num_of(2).sqrt();
        assert!(root.matches_within(&f.num_of(1.414214), &f.num_of(0.000001)));
        assert!(f.num_of(0).sqrt().is_zero());
        assert!(f.num_of(-1).sqrt().is_nan());
        assert!(f.num_of(-1).sqrt_with_precision(12).is_nan());

        let d = NumFactory::double();
        assert!(d.num_of(-1).sqrt().is_nan());
        assert!((d.num_of(2).sqrt().to_f64() - 1.4142135623730951).abs() < 1e-15);
    }

    #[test]
    fn test_sqrt_with_precision() {
        let f = decimal(10);
        let root = f.num_of(2).sqrt_with_precision(40);
        assert_eq!(root.context().map(|c| c.precision()), Some(40));
        assert_eq!(root.to_string(), "1.414213562373095048801688724209698078570");
        assert_eq!(
            f.num_of(2).try_sqrt_with_precision(0).unwrap_err(),
            NumericError::InvalidPrecision
        );
    }

    #[test]
    fn test_log_and_pow_scenarios() {
        let f = decimal(32);
        let tolerance = f.num_of(0.0001);
        assert!(f.num_of(100).log().matches_within(&f.num_of(4.6052), &tolerance));

        let third = f.one().divided_by(f.three());
        assert!(f.num_of(8).pow_num(&third).matches_within(f.two(), &tolerance));

        let d = NumFactory::double();
        let third = d.one().divided_by(d.three());
        assert!(d.num_of(8).pow_num(&third).matches_within(d.two(), &d.num_of(0.0001)));
    }

    #[test]
    fn test_pow_vectors() {
        let f = decimal(32);
        let x = f.num_of(0.2);
        assert!(x.pow(5).is_equal(&f.num_of(0.00032)));

        assert!(x
            .pow_num(&x)
            .matches_within(&f.num_of(0.7247796636776955), &f.num_of(1e-15)));
        assert!(x
            .pow_num(&f.num_of(-0.2))
            .matches_within(&f.num_of(1.37972966146), &f.num_of(1e-10)));
    }

    #[test]
    fn test_pow_huge_exponent_fails_loudly() {
        let f = decimal(32);
        let exponent = f.num_of_str(&"9".repeat(120)).unwrap();
        assert_eq!(
            f.two().try_pow_num(&exponent).unwrap_err(),
            NumericError::ExponentOutOfRange
        );
        assert!(f.num_of_str("1e-999999999").unwrap().try_pow(3).is_err());
    }

    #[test]
    #[should_panic(expected = "exponent out of range")]
    fn test_pow_num_panics_on_huge_exponent() {
        let f = decimal(32);
        let exponent = f.num_of_str(&"9".repeat(120)).unwrap();
        f.two().pow_num(&exponent);
    }

    #[test]
    fn test_double_pow_overflows_to_infinity() {
        let d = NumFactory::double();
        assert_eq!(d.num_of(10).pow(400).to_f64(), f64::INFINITY);
    }

    #[test]
    fn test_min_max() {
        let f = decimal(16);
        let one = f.num_of(1);
        let two = f.num_of(2);
        assert!(one.min(&two).is_equal(&one));
        assert!(one.max(&two).is_equal(&two));
        assert!(one.min(&Num::NaN).is_nan());
        assert!(Num::NaN.max(&one).is_nan());

        let precise = decimal(32).num_of_str("1.0").unwrap();
        assert_eq!(one.min(&precise).context(), one.context());
    }

    #[test]
    fn test_matches_within() {
        let f = decimal(16);
        let delta = f.num_of(0.01);
        assert!(f.num_of(1.005).matches_within(f.one(), &delta));
        assert!(f.one().matches_within(&f.num_of(1.005), &delta));
        assert!(!f.num_of(1.02).matches_within(f.one(), &delta));
        assert!(!Num::NaN.matches_within(f.one(), &delta));
    }

    #[test]
    fn test_predicates() {
        let f = decimal(16);
        let neg = f.num_of(-2);
        assert!(neg.is_negative() && neg.is_negative_or_zero());
        assert!(!neg.is_positive() && !neg.is_positive_or_zero());
        assert!(f.zero().is_zero() && f.zero().is_positive_or_zero());
        assert!(f.hundred().is_positive());
    }

    #[test]
    fn test_conversions() {
        let f = decimal(16);
        assert_eq!(f.num_of_str("-12.9").unwrap().to_i32(), Ok(-12));
        assert_eq!(f.num_of(3_000_000_000i64).to_i32(), Err(NumericError::Overflow));
        assert_eq!(Num::NaN.to_i64(), Err(NumericError::NotANumber));
        assert!(Num::NaN.to_f64().is_nan());
        assert_eq!(f.num_of(0.5).to_f32(), 0.5f32);
        assert_eq!(
            NumFactory::double().num_of(1.25).to_rust_decimal().unwrap(),
            rust_decimal::Decimal::new(125, 2)
        );
        assert_eq!(Num::NaN.to_rust_decimal(), Err(NumericError::NotANumber));
    }

    #[test]
    fn test_names_and_factories() {
        let f = decimal(20);
        let x = f.num_of(1);
        assert_eq!(x.name(), "DecimalNum");
        assert_eq!(NumFactory::double().one().name(), "DoubleNum");
        assert_eq!(Num::NaN.name(), "NaN");

        assert!(x.num_factory().produces(&x));
        assert!(Num::NaN.num_factory().one().is_nan());
        assert!(Num::NaN.num_factory().zero().is_nan());
    }

    #[test]
    fn test_spawn_keeps_representation() {
        let x = decimal(5).num_of(1);
        let spawned = x.spawn(3.14159265);
        assert_eq!(spawned.to_string(), "3.1416");
        assert_eq!(spawned.context(), x.context());
        assert_eq!(x.spawn_str("2.5").unwrap().to_string(), "2.5");
        assert!(Num::NaN.spawn(1).is_nan());

        let d = NumFactory::double().num_of(1);
        assert_eq!(d.spawn(2).name(), "DoubleNum");
        assert_eq!(x.spawn_str("abc"), Err(NumericError::InvalidInput));
    }

    #[test]
    fn test_operators() {
        let f = decimal(16);
        let a = f.num_of(7);
        let b = f.num_of(2);
        assert_eq!((&a + &b).to_string(), "9");
        assert_eq!((&a - &b).to_string(), "5");
        assert_eq!((&a * &b).to_string(), "14");
        assert_eq!((&a / &b).to_string(), "3.5");
        assert_eq!((&a % &b).to_string(), "1");
        assert_eq!((-&a).to_string(), "-7");
        assert_eq!((a + b).to_string(), "9");
    }

    #[test]
    fn test_relational_checks_on_distant_magnitudes() {
        let f = decimal(32);
        let huge = f.num_of_str("1e20000000").unwrap();
        let tiny = f.num_of_str("1e-20000000").unwrap();

        assert!(huge.is_greater_than(f.one()));
        assert!(tiny.is_less_than(f.one()));
        assert!(tiny.is_positive());
        assert!(huge.plus(f.one()).is_equal(&huge));
        assert!(f.one().minus(&tiny).is_equal(f.one()));
        assert!(tiny.floor().is_zero());
        assert_eq!(huge.to_i64(), Err(NumericError::Overflow));
    }

    #[test]
    fn test_exponent_beyond_scale_range_rejected() {
        let f = decimal(32);
        assert_eq!(f.num_of_str("1e-5000000000").unwrap_err(), NumericError::Underflow);
        assert_eq!(f.num_of_str("1e5000000000").unwrap_err(), NumericError::Overflow);
    }

    #[test]
    fn test_usable_as_hash_key() {
        use std::collections::{HashMap, HashSet};

        let f = decimal(16);
        let mut counts = HashMap::new();
        for text in ["1.5", "1.50", "2", "2.000", "3"] {
            *counts.entry(f.num_of_str(text).unwrap()).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&f.num_of_str("1.500").unwrap()], 2);
        assert_eq!(counts[f.two()], 2);

        let d = NumFactory::double();
        let set: HashSet<Num> = [d.num_of(1.0), d.num_of(1.000001), d.num_of(2.0)]
            .into_iter()
            .chain([Num::NaN, Num::NaN])
            .collect();
        assert_eq!(set.len(), 3);
        assert!(set.contains(&d.num_of(2.000001)));
    }

    #[test]
    fn test_display() {
        let f = decimal(16);
        assert_eq!(f.num_of_str("1E+3").unwrap().to_string(), "1000");
        assert_eq!(Num::NaN.to_string(), "NaN");
        assert_eq!(NumFactory::double().num_of(0.5).to_string(), "0.5");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_as_string() {
        let f = decimal(16);
        let json = serde_json::to_string(&f.num_of_str("1.50").unwrap()).unwrap();
        assert_eq!(json, "\"1.50\"");
        assert_eq!(serde_json::to_string(&Num::NaN).unwrap(), "\"NaN\"");
    }

    proptest! {
        #[test]
        fn prop_sqrt_squares_back(k in 0u32..1000) {
            let f = decimal(32);
            let x = f.num_of(k).divided_by(f.thousand());
            let squared = x.sqrt().pow(2);
            let tolerance = f.num_of_str("1e-30").unwrap();
            prop_assert!(squared.matches_within(&x, &tolerance), "{} -> {}", x, squared);
        }

        #[test]
        fn prop_receiver_precision_propagates(
            a in -1_000_000i64..1_000_000,
            b in -1_000_000i64..1_000_000,
        ) {
            let low = decimal(10);
            let high = decimal(20);
            let x = low.num_of(a).divided_by(&low.num_of(7));
            let y = high.num_of(b).divided_by(&high.num_of(13));
            for result in [x.plus(&y), x.minus(&y), x.multiplied_by(&y)] {
                prop_assert_eq!(result.context(), x.context());
            }
        }

        #[test]
        fn prop_nan_absorbs_decimal(value in any::<i64>()) {
            let x = decimal(16).num_of(value);
            for (_, op) in binary_ops() {
                prop_assert!(op(&x, &Num::NaN).is_nan());
                prop_assert!(op(&Num::NaN, &x).is_nan());
            }
        }
    }

    quickcheck! {
        fn double_never_leaks_float_nan(a: f64, b: f64) -> bool {
            let f = NumFactory::double();
            let (x, y) = (f.num_of(a), f.num_of(b));
            binary_ops().into_iter().all(|(_, op)| match op(&x, &y) {
                Num::Double(d) => !d.value().is_nan(),
                Num::NaN => true,
                Num::Decimal(_) => false,
            })
        }

        fn double_plus_commutes(a: f64, b: f64) -> bool {
            let f = NumFactory::double();
            let (x, y) = (f.num_of(a), f.num_of(b));
            x.plus(&y) == y.plus(&x)
        }
    }
}
