// ============================================================================
// Decimal Backend
// Context-rounded arbitrary-precision values and the iterative algorithms
// ============================================================================

use super::big_decimal::BigDecimal;
use super::context::{MathContext, RoundingMode};
use super::errors::{NumericError, NumericResult};
use super::num::Num;
use crate::interfaces::{NumericEvent, NumericObserver};
use num_bigint::BigInt;
use std::cmp::Ordering;
use std::fmt;

/// Terms of the continued fraction used by `log`.
const LOG_ITERATIONS: u32 = 1000;

/// Integer part of a `pow_num` exponent may have at most this many digits
/// before it is rejected without being materialized.
const MAX_EXPONENT_DIGITS: i64 = 10;

/// Decimal value rounded to its own precision context.
///
/// Binary operations round with the receiver's context, so precision-10
/// `a.plus(b)` is precision 10 whatever `b` carries.
#[derive(Clone)]
pub struct DecimalNum {
    value: BigDecimal,
    context: MathContext,
}

impl DecimalNum {
    /// Create a value, rounding it to `context`.
    pub fn new(value: BigDecimal, context: MathContext) -> Self {
        Self {
            value: value.round(&context),
            context,
        }
    }

    #[inline]
    pub fn value(&self) -> &BigDecimal {
        &self.value
    }

    #[inline]
    pub fn context(&self) -> MathContext {
        self.context
    }

    #[inline]
    pub fn precision(&self) -> u32 {
        self.context.precision()
    }

    /// Wrap an already rounded result in the receiver's context.
    fn derive(&self, value: BigDecimal) -> Num {
        Num::Decimal(Self {
            value,
            context: self.context,
        })
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    pub fn plus(&self, augend: &Self) -> Num {
        self.derive(self.value.add(&augend.value, &self.context))
    }

    pub fn minus(&self, subtrahend: &Self) -> Num {
        self.derive(self.value.sub(&subtrahend.value, &self.context))
    }

    pub fn multiplied_by(&self, multiplicand: &Self) -> Num {
        self.derive(self.value.mul(&multiplicand.value, &self.context))
    }

    /// NaN when `divisor` is zero.
    pub fn divided_by(&self, divisor: &Self) -> Num {
        match self.value.checked_div(&divisor.value, &self.context) {
            Ok(quotient) => self.derive(quotient),
            Err(_) => Num::NaN,
        }
    }

    /// NaN when `divisor` is zero.
    pub fn remainder(&self, divisor: &Self) -> Num {
        match self.value.checked_rem(&divisor.value, &self.context) {
            Ok(remainder) => self.derive(remainder),
            Err(_) => Num::NaN,
        }
    }

    /// Integer power at the receiver's precision. A zero base with a negative
    /// exponent is NaN.
    ///
    /// # Errors
    /// `ExponentOutOfRange`, `Overflow` or `Underflow` when the power cannot
    /// be represented.
    pub fn try_pow(&self, n: i32) -> NumericResult<Num> {
        match self.value.checked_pow(i64::from(n), &self.context) {
            Ok(power) => Ok(self.derive(power)),
            Err(NumericError::DivisionByZero) => Ok(Num::NaN),
            Err(err) => Err(err),
        }
    }

    /// `self^exponent` for a real exponent.
    ///
    /// Splits `exponent = a + b` with `a = floor(exponent)` and `0 <= b < 1`.
    /// `x^a` uses decimal integer exponentiation, `x^b` the native double
    /// power, and the product is rounded to the receiver's precision.
    ///
    /// # Errors
    /// `ExponentOutOfRange` if `a` does not fit an `i32`.
    pub fn try_pow_num(&self, exponent: &Self) -> NumericResult<Num> {
        let n = &exponent.value;
        if n.precision() as i64 - n.scale() > MAX_EXPONENT_DIGITS {
            return Err(NumericError::ExponentOutOfRange);
        }
        let whole = if n.scale() > 0 {
            n.set_scale(0, RoundingMode::Floor)
        } else {
            n.clone()
        };
        let fraction = n.sub_exact(&whole);
        let a = whole
            .to_i64()
            .and_then(|a| i32::try_from(a).ok())
            .ok_or(NumericError::ExponentOutOfRange)?;

        let x_pow_a = match self.value.checked_pow(i64::from(a), &self.context.widened(3)) {
            Ok(power) => power,
            Err(NumericError::DivisionByZero) => return Ok(Num::NaN),
            Err(err) => return Err(err),
        };
        let Some(x_pow_b) = self.fractional_power(&fraction) else {
            return Ok(Num::NaN);
        };
        Ok(self.derive(x_pow_a.mul(&x_pow_b, &self.context)))
    }

    /// `self^b` for `0 <= b < 1` through `f64`; `None` for a negative base.
    fn fractional_power(&self, b: &BigDecimal) -> Option<BigDecimal> {
        if b.is_zero() {
            return Some(BigDecimal::one());
        }
        if self.value.signum() < 0 {
            return None;
        }
        if self.value.is_zero() {
            return Some(BigDecimal::zero());
        }

        let b = b.to_f64();
        let x = self.value.to_f64();
        if x.is_finite() && x > 0.0 {
            let power = x.powf(b);
            if power.is_finite() && power > 0.0 {
                return BigDecimal::from_f64(power).ok();
            }
        }

        // Outside the double range: 10^(b * log10 x)
        let exponent = b * self.value.log10_f64();
        let whole = exponent.floor();
        let mantissa = 10f64.powf(exponent - whole);
        BigDecimal::from_f64(mantissa)
            .ok()
            .map(|m| m.scale_by_power_of_ten(whole as i64))
    }

    pub fn abs(&self) -> Num {
        self.derive(self.value.abs())
    }

    pub fn negate(&self) -> Num {
        self.derive(self.value.negate())
    }

    pub fn floor(&self) -> Num {
        self.derive(self.integral(RoundingMode::Floor))
    }

    pub fn ceil(&self) -> Num {
        self.derive(self.integral(RoundingMode::Ceiling))
    }

    fn integral(&self, mode: RoundingMode) -> BigDecimal {
        if self.value.scale() <= 0 {
            return self.value.clone();
        }
        self.value.set_scale(0, mode).round(&self.context)
    }

    // ========================================================================
    // Square Root
    // ========================================================================

    /// Babylonian square root computed and rounded at `context`.
    ///
    /// Seeded from the two-digit scientific form `m × 10^e` of the value:
    /// `2 × 10^(e/2)` if `m < 10` after making `e` even, else `6 × 10^(e/2)`.
    /// Iterates until the estimate stops changing; a two-step cycle between
    /// neighbouring values also ends the loop.
    pub fn sqrt(&self, context: MathContext, observer: &dyn NumericObserver) -> Num {
        match self.value.signum() {
            -1 => return Num::NaN,
            0 => {
                return Num::Decimal(Self {
                    value: BigDecimal::zero(),
                    context,
                })
            },
            _ => {},
        }

        match self.babylonian(&context, observer) {
            Ok(root) => Num::Decimal(Self::new(root, context)),
            Err(_) => Num::NaN,
        }
    }

    fn babylonian(
        &self,
        context: &MathContext,
        observer: &dyn NumericObserver,
    ) -> NumericResult<BigDecimal> {
        let (mut mantissa, mut exponent) = self.value.scientific_digits();
        if exponent.rem_euclid(2) == 1 {
            exponent -= 1;
            mantissa *= 10;
        }
        let seed = if mantissa < 100 { 2 } else { 6 };
        let mut estimate = BigDecimal::new(BigInt::from(seed), -(exponent / 2));
        observer.on_event(&NumericEvent::SqrtSeeded {
            mantissa,
            exponent,
            estimate: &estimate,
        });

        let two = BigDecimal::from_i64(2);
        let mut previous: Option<BigDecimal> = None;
        let mut iteration = 0u32;
        loop {
            iteration += 1;
            let quotient = self.value.checked_div(&estimate, context)?;
            let next = estimate.add_exact(&quotient).checked_div(&two, context)?;
            let delta = next.sub_exact(&estimate).abs();
            observer.on_event(&NumericEvent::SqrtIteration {
                iteration,
                estimate: &next,
                delta: &delta,
            });

            let cycled = previous.as_ref() == Some(&next);
            if delta.is_zero() || cycled {
                observer.on_event(&NumericEvent::SqrtConverged {
                    iterations: iteration,
                });
                return Ok(next);
            }
            previous = Some(std::mem::replace(&mut estimate, next));
        }
    }

    // ========================================================================
    // Logarithm and Exponential
    // ========================================================================

    /// Natural logarithm by a fixed-length continued fraction.
    ///
    /// Non-positive values are NaN, exactly one is an exact zero.
    pub fn log(&self, observer: &dyn NumericObserver) -> Num {
        if self.value.signum() <= 0 {
            return Num::NaN;
        }
        if self.value == BigDecimal::one() {
            return self.derive(BigDecimal::zero());
        }
        match self.continued_fraction_log() {
            Ok(log) => {
                observer.on_event(&NumericEvent::LogCompleted {
                    terms: LOG_ITERATIONS + 1,
                });
                self.derive(log)
            },
            Err(_) => Num::NaN,
        }
    }

    fn continued_fraction_log(&self) -> NumericResult<BigDecimal> {
        let ctx = &self.context;
        let x = self.value.sub_exact(&BigDecimal::one());
        let mut ret = BigDecimal::from_i64(i64::from(LOG_ITERATIONS) + 1);
        for i in (0..=LOG_ITERATIONS).rev() {
            let k = i64::from(i / 2 + 1);
            let numerator = BigDecimal::from_i64(k * k).mul(&x, ctx);
            ret = numerator.checked_div(&ret, ctx)?;
            ret = ret.add(&BigDecimal::from_i64(i64::from(i) + 1), ctx);
        }
        x.checked_div(&ret, ctx)
    }

    /// `e^self` by Taylor series, summed until the rounded total stops changing.
    /// Negative arguments use `1 / e^-self`.
    pub fn exp(&self, observer: &dyn NumericObserver) -> Num {
        let ctx = &self.context;
        let result = if self.value.signum() < 0 {
            self.taylor_exp(&self.value.negate(), observer)
                .and_then(|e| BigDecimal::one().checked_div(&e, ctx))
        } else {
            self.taylor_exp(&self.value, observer)
        };
        match result {
            Ok(value) => self.derive(value),
            Err(_) => Num::NaN,
        }
    }

    fn taylor_exp(
        &self,
        x: &BigDecimal,
        observer: &dyn NumericObserver,
    ) -> NumericResult<BigDecimal> {
        let ctx = &self.context;
        let mut sum = BigDecimal::one();
        let mut term = BigDecimal::one();
        let mut k = 1i64;
        loop {
            term = term.mul(x, ctx).checked_div(&BigDecimal::from_i64(k), ctx)?;
            let next = sum.add(&term, ctx);
            if next == sum {
                break;
            }
            sum = next;
            k += 1;
        }
        observer.on_event(&NumericEvent::ExpConverged { terms: k as u32 });
        Ok(sum)
    }

    // ========================================================================
    // Comparison and Conversion
    // ========================================================================

    #[inline]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }

    #[inline]
    pub fn signum(&self) -> i32 {
        self.value.signum()
    }

    pub fn to_f64(&self) -> f64 {
        self.value.to_f64()
    }

    /// # Errors
    /// `Overflow` if the integral part does not fit an `i64`.
    pub fn to_i64(&self) -> NumericResult<i64> {
        self.value.to_i64().ok_or(NumericError::Overflow)
    }

    /// # Errors
    /// `Overflow` if the integral part does not fit 96 bits.
    pub fn to_rust_decimal(&self) -> NumericResult<rust_decimal::Decimal> {
        self.value.to_rust_decimal()
    }
}

impl fmt::Display for DecimalNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl fmt::Debug for DecimalNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecimalNum({}, {})", self.value, self.context)
    }
}
