// ============================================================================
// Arbitrary-Precision Decimal
// Coefficient/scale decimal with context-driven rounding
// ============================================================================

use super::context::{MathContext, RoundingMode};
use super::errors::{NumericError, NumericResult};
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Largest integer exponent accepted by [`BigDecimal::checked_pow`].
pub const MAX_INTEGER_EXPONENT: u64 = 999_999_999;

/// Arbitrary-precision signed decimal.
///
/// Stores `unscaled × 10^-scale`. Values are not normalized: `1.50` and `1.5`
/// keep their own scales but compare equal.
///
/// Operations taking a [`MathContext`] round the exact result to the
/// context's number of significant digits. The `*_exact` operations never round.
#[derive(Clone)]
pub struct BigDecimal {
    unscaled: BigInt,
    scale: i64,
}

// ============================================================================
// Digit Helpers
// ============================================================================

fn pow10(n: u64) -> BigInt {
    Pow::pow(BigInt::from(10u8), n)
}

fn pow10_unsigned(n: u64) -> BigUint {
    Pow::pow(BigUint::from(10u8), n)
}

/// Number of decimal digits in `value`; zero has one digit.
fn digit_count(value: &BigInt) -> u64 {
    if value.is_zero() {
        return 1;
    }
    let magnitude = value.magnitude();
    let mut digits = ((magnitude.bits() - 1) as f64 * std::f64::consts::LOG10_2) as u64 + 1;
    while digits > 1 && *magnitude < pow10_unsigned(digits - 1) {
        digits -= 1;
    }
    while *magnitude >= pow10_unsigned(digits) {
        digits += 1;
    }
    digits
}

/// Integer division of `numerator` by `divisor` rounded with `mode`.
fn div_rounded(numerator: &BigInt, divisor: &BigInt, mode: RoundingMode) -> BigInt {
    let (quotient, remainder) = numerator.div_rem(divisor);
    if remainder.is_zero() {
        return quotient;
    }

    let positive = (numerator.sign() == Sign::Minus) == (divisor.sign() == Sign::Minus);
    let half = (remainder.abs() * BigInt::from(2u8)).cmp(&divisor.abs());

    let away_from_zero = match mode {
        RoundingMode::Up => true,
        RoundingMode::Down => false,
        RoundingMode::Ceiling => positive,
        RoundingMode::Floor => !positive,
        RoundingMode::HalfUp => half != Ordering::Less,
        RoundingMode::HalfDown => half == Ordering::Greater,
        RoundingMode::HalfEven => match half {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => quotient.is_odd(),
        },
    };

    match (away_from_zero, positive) {
        (false, _) => quotient,
        (true, true) => quotient + BigInt::one(),
        (true, false) => quotient - BigInt::one(),
    }
}

/// `value / 10^places` rounded with `mode`.
fn shift_right(value: &BigInt, places: u64, mode: RoundingMode) -> BigInt {
    // Once every digit is dropped a shorter divisor rounds the same way
    let places = places.min(digit_count(value) + 1);
    div_rounded(value, &pow10(places), mode)
}

/// `value × 10^places`; zero stays zero without building the power.
fn shift_left(value: &BigInt, places: u64) -> BigInt {
    if value.is_zero() {
        BigInt::zero()
    } else {
        value * pow10(places)
    }
}

/// Bring both operands to the larger scale.
fn align(a: &BigDecimal, b: &BigDecimal) -> (BigInt, BigInt, i64) {
    match a.scale.cmp(&b.scale) {
        Ordering::Equal => (a.unscaled.clone(), b.unscaled.clone(), a.scale),
        Ordering::Less => (
            shift_left(&a.unscaled, b.scale.abs_diff(a.scale)),
            b.unscaled.clone(),
            b.scale,
        ),
        Ordering::Greater => (
            a.unscaled.clone(),
            shift_left(&b.unscaled, a.scale.abs_diff(b.scale)),
            a.scale,
        ),
    }
}

impl BigDecimal {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from an unscaled coefficient and a scale.
    #[inline]
    pub fn new(unscaled: BigInt, scale: i64) -> Self {
        Self { unscaled, scale }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(BigInt::zero(), 0)
    }

    #[inline]
    pub fn one() -> Self {
        Self::new(BigInt::one(), 0)
    }

    #[inline]
    pub fn from_i64(value: i64) -> Self {
        Self::new(BigInt::from(value), 0)
    }

    /// Create from a finite `f64` through its shortest round-trip decimal string.
    ///
    /// `0.1` becomes exactly `0.1`, not the binary expansion of the double.
    ///
    /// # Errors
    /// Returns `InvalidInput` for NaN and infinities.
    pub fn from_f64(value: f64) -> NumericResult<Self> {
        if !value.is_finite() {
            return Err(NumericError::InvalidInput);
        }
        value.to_string().parse()
    }

    /// Exact conversion from a 96-bit `rust_decimal::Decimal`.
    pub fn from_rust_decimal(value: &rust_decimal::Decimal) -> Self {
        Self::new(BigInt::from(value.mantissa()), i64::from(value.scale()))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    #[inline]
    pub fn scale(&self) -> i64 {
        self.scale
    }

    /// Number of significant digits in the coefficient.
    #[inline]
    pub fn precision(&self) -> u64 {
        digit_count(&self.unscaled)
    }

    /// Exponent of the leading digit: `precision - 1 - scale`.
    ///
    /// `1234.5` has adjusted exponent 3, `0.00120` has -3.
    #[inline]
    pub fn adjusted_exponent(&self) -> i64 {
        self.precision() as i64 - 1 - self.scale
    }

    /// -1, 0 or 1.
    pub fn signum(&self) -> i32 {
        match self.unscaled.sign() {
            Sign::Minus => -1,
            Sign::NoSign => 0,
            Sign::Plus => 1,
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    // ========================================================================
    // Rounding and Scaling
    // ========================================================================

    /// Round to the context's number of significant digits.
    pub fn round(self, ctx: &MathContext) -> Self {
        let limit = u64::from(ctx.precision());
        let digits = self.precision();
        if digits <= limit {
            return self;
        }

        let dropped = digits - limit;
        let unscaled = shift_right(&self.unscaled, dropped, ctx.rounding());
        let scale = self.scale - dropped as i64;

        // 9.99 -> 10.0 gains a digit; the extra one is a trailing zero
        if digit_count(&unscaled) > limit {
            Self::new(unscaled / BigInt::from(10u8), scale - 1)
        } else {
            Self::new(unscaled, scale)
        }
    }

    /// Rescale to exactly `scale` fractional digits, rounding with `mode`.
    pub fn set_scale(&self, scale: i64, mode: RoundingMode) -> Self {
        match scale.cmp(&self.scale) {
            Ordering::Equal => self.clone(),
            Ordering::Greater => {
                Self::new(shift_left(&self.unscaled, scale.abs_diff(self.scale)), scale)
            },
            Ordering::Less => Self::new(
                shift_right(&self.unscaled, self.scale.abs_diff(scale), mode),
                scale,
            ),
        }
    }

    /// Drop trailing zeros while the scale stays at or above `min_scale`.
    fn strip_trailing_zeros_to(mut self, min_scale: i64) -> Self {
        let ten = BigInt::from(10u8);
        while self.scale > min_scale && !self.unscaled.is_zero() {
            let (quotient, remainder) = self.unscaled.div_rem(&ten);
            if !remainder.is_zero() {
                break;
            }
            self.unscaled = quotient;
            self.scale -= 1;
        }
        self
    }

    /// Same value with every trailing zero removed; zero becomes plain `0`.
    pub fn normalized(&self) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        self.clone().strip_trailing_zeros_to(i64::MIN)
    }

    /// Multiply by `10^power` without touching the coefficient.
    pub fn scale_by_power_of_ten(&self, power: i64) -> Self {
        Self::new(self.unscaled.clone(), self.scale - power)
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    pub fn add_exact(&self, other: &Self) -> Self {
        let (a, b, scale) = align(self, other);
        Self::new(a + b, scale)
    }

    pub fn sub_exact(&self, other: &Self) -> Self {
        let (a, b, scale) = align(self, other);
        Self::new(a - b, scale)
    }

    pub fn mul_exact(&self, other: &Self) -> Self {
        Self::new(&self.unscaled * &other.unscaled, self.scale + other.scale)
    }

    /// Sum rounded to the context's precision.
    ///
    /// An operand lying wholly below the rounding position of the other only
    /// decides the rounding direction, so it is replaced by a single sticky
    /// digit under that position before the scales are aligned.
    pub fn add(&self, other: &Self, ctx: &MathContext) -> Self {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Self::new(BigInt::zero(), self.scale.max(other.scale)),
            (true, false) => return other.plus_zero(self.scale, ctx),
            (false, true) => return self.plus_zero(other.scale, ctx),
            (false, false) => {},
        }

        let (big, small) = if self.adjusted_exponent() >= other.adjusted_exponent() {
            (self, other)
        } else {
            (other, self)
        };
        let ulp_scale = i64::from(ctx.precision()) - big.adjusted_exponent() - 1;
        let small_lead_scale = -small.adjusted_exponent();
        if small_lead_scale > big.scale + 2 && small_lead_scale > ulp_scale + 2 {
            let sticky = Self::new(BigInt::from(small.signum()), big.scale.max(ulp_scale) + 3);
            return big.add_exact(&sticky).round(ctx);
        }
        self.add_exact(other).round(ctx)
    }

    /// `self + 0` where the zero carries `zero_scale`.
    ///
    /// Matches the exact sum rounded to `ctx`: the scale grows toward the
    /// zero's scale only as far as the precision leaves room for.
    fn plus_zero(&self, zero_scale: i64, ctx: &MathContext) -> Self {
        let rounded = self.clone().round(ctx);
        if zero_scale <= rounded.scale {
            return rounded;
        }
        let room = u64::from(ctx.precision()).saturating_sub(rounded.precision());
        let pad = room.min(zero_scale.abs_diff(rounded.scale));
        let scale = rounded.scale + pad as i64;
        rounded.set_scale(scale, RoundingMode::Down)
    }

    pub fn sub(&self, other: &Self, ctx: &MathContext) -> Self {
        self.add(&other.negate(), ctx)
    }

    pub fn mul(&self, other: &Self, ctx: &MathContext) -> Self {
        self.mul_exact(other).round(ctx)
    }

    /// Division rounded to the context's precision.
    ///
    /// Exact quotients are reported at the scale closest to
    /// `self.scale - divisor.scale`, so `10 / 4` is `2.5`, not `2.500…`.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `divisor` is zero.
    pub fn checked_div(&self, divisor: &Self, ctx: &MathContext) -> NumericResult<Self> {
        if divisor.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        let preferred_scale = self.scale - divisor.scale;
        if self.is_zero() {
            return Ok(Self::new(BigInt::zero(), preferred_scale));
        }

        // Quotient carries at least precision + 2 digits before rounding
        let shift = (i64::from(ctx.precision()) + 3 + divisor.precision() as i64
            - self.precision() as i64)
            .max(0);
        let numerator = &self.unscaled * pow10(shift as u64);
        let (quotient, remainder) = numerator.div_rem(&divisor.unscaled);
        let scale = preferred_scale + shift;

        if remainder.is_zero() {
            return Ok(Self::new(quotient, scale)
                .round(ctx)
                .strip_trailing_zeros_to(preferred_scale));
        }

        // A sticky non-zero digit keeps inexact quotients from looking like exact ties
        let sticky = quotient.signum();
        let quotient = quotient * BigInt::from(10u8) + sticky;
        Ok(Self::new(quotient, scale + 1).round(ctx))
    }

    /// Remainder of truncating division; the sign follows the dividend.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `divisor` is zero.
    pub fn checked_rem(&self, divisor: &Self, ctx: &MathContext) -> NumericResult<Self> {
        if divisor.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        if self.abs() < divisor.abs() {
            return Ok(self.clone().round(ctx));
        }
        let (a, b, scale) = align(self, divisor);
        Ok(Self::new(a % b, scale).round(ctx))
    }

    /// Integer power by repeated squaring.
    ///
    /// Works with `precision + digits(n) + 1` digits and rounds once at the end.
    /// Negative exponents take the reciprocal of the positive power.
    ///
    /// # Errors
    /// - `ExponentOutOfRange` if `|n|` exceeds [`MAX_INTEGER_EXPONENT`]
    /// - `Overflow` / `Underflow` if an intermediate scale leaves the `i32` range
    /// - `DivisionByZero` for a zero base with a negative exponent
    pub fn checked_pow(&self, n: i64, ctx: &MathContext) -> NumericResult<Self> {
        let magnitude = n.unsigned_abs();
        if magnitude > MAX_INTEGER_EXPONENT {
            return Err(NumericError::ExponentOutOfRange);
        }
        if n == 0 {
            return Ok(Self::one());
        }

        let working = ctx.widened(digit_count(&BigInt::from(magnitude)) as u32 + 1);
        let mut result = Self::one();
        let mut base = self.clone();
        let mut remaining = magnitude;
        loop {
            if remaining & 1 == 1 {
                result = result.mul(&base, &working);
                result.check_scale()?;
            }
            remaining >>= 1;
            if remaining == 0 {
                break;
            }
            base = base.mul(&base, &working);
            base.check_scale()?;
        }

        if n < 0 {
            result = Self::one().checked_div(&result, &working)?;
        }
        Ok(result.round(ctx))
    }

    fn check_scale(&self) -> NumericResult<()> {
        if self.scale > i64::from(i32::MAX) {
            Err(NumericError::Underflow)
        } else if self.scale < i64::from(i32::MIN) {
            Err(NumericError::Overflow)
        } else {
            Ok(())
        }
    }

    pub fn abs(&self) -> Self {
        Self::new(self.unscaled.abs(), self.scale)
    }

    pub fn negate(&self) -> Self {
        Self::new(-&self.unscaled, self.scale)
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Nearest `f64`; values beyond the double range become infinite.
    pub fn to_f64(&self) -> f64 {
        format!("{}e{}", self.unscaled, -self.scale)
            .parse()
            .unwrap_or(f64::NAN)
    }

    /// Integral part, truncated toward zero, if it fits an `i64`.
    pub fn to_i64(&self) -> Option<i64> {
        if !self.is_zero() && self.adjusted_exponent() > 18 {
            return None;
        }
        self.set_scale(0, RoundingMode::Down).unscaled.to_i64()
    }

    /// Convert to a 96-bit `rust_decimal::Decimal`, rounding to its 28 digits.
    ///
    /// # Errors
    /// Returns `Overflow` if the integral part does not fit 96 bits.
    pub fn to_rust_decimal(&self) -> NumericResult<rust_decimal::Decimal> {
        const MAX_SCALE: i64 = 28;
        let mut value = self
            .clone()
            .round(&MathContext::from_parts(28, RoundingMode::HalfUp));
        if value.scale < 0 {
            value = value.set_scale(0, RoundingMode::Down);
        }
        if value.scale > MAX_SCALE {
            value = value.set_scale(MAX_SCALE, RoundingMode::HalfUp);
        }
        let mantissa = value.unscaled.to_i128().ok_or(NumericError::Overflow)?;
        rust_decimal::Decimal::try_from_i128_with_scale(mantissa, value.scale as u32)
            .map_err(|_| NumericError::Overflow)
    }

    /// Leading two significant digits (as an integer in `10..=99`) and the
    /// decimal exponent, the way `%1.1e` prints a value: `3e11` is `(30, 11)`.
    pub(crate) fn scientific_digits(&self) -> (u64, i64) {
        let rounded = self
            .abs()
            .round(&MathContext::from_parts(2, RoundingMode::HalfUp));
        let mut unscaled = rounded.unscaled;
        let mut scale = rounded.scale;
        while digit_count(&unscaled) < 2 {
            unscaled *= BigInt::from(10u8);
            scale += 1;
        }
        let exponent = 1 - scale;
        (unscaled.to_u64().unwrap_or(99), exponent)
    }

    /// Base-10 logarithm as an `f64`, valid far outside the `f64` range.
    pub(crate) fn log10_f64(&self) -> f64 {
        // 17 leading digits carry everything an f64 can hold
        let shift = (self.precision() as i64 - 17).max(0);
        let leading = (self.unscaled.abs() / pow10(shift as u64))
            .to_f64()
            .unwrap_or(f64::NAN);
        leading.log10() + (shift - self.scale) as f64
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Default for BigDecimal {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for BigDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigDecimal {}

impl PartialOrd for BigDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_sign = self.signum().cmp(&other.signum());
        if by_sign != Ordering::Equal || self.is_zero() {
            return by_sign;
        }
        // Equal leading-digit exponents keep the alignment within the coefficients
        let by_exponent = self.adjusted_exponent().cmp(&other.adjusted_exponent());
        if by_exponent != Ordering::Equal {
            return if self.signum() > 0 {
                by_exponent
            } else {
                by_exponent.reverse()
            };
        }
        let (a, b, _) = align(self, other);
        a.cmp(&b)
    }
}

impl Hash for BigDecimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let normalized = self.normalized();
        normalized.unscaled.hash(state);
        normalized.scale.hash(state);
    }
}

impl From<i64> for BigDecimal {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Display for BigDecimal {
    /// Plain notation, never scientific: `1E+3` prints as `1000`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.magnitude().to_string();
        let sign = if self.unscaled.is_negative() { "-" } else { "" };

        if self.scale <= 0 {
            if self.unscaled.is_zero() {
                return f.write_str("0");
            }
            let zeros = "0".repeat(self.scale.unsigned_abs() as usize);
            return write!(f, "{}{}{}", sign, digits, zeros);
        }

        let scale = self.scale as usize;
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{}{}.{}", sign, int_part, frac_part)
        } else {
            write!(f, "{}0.{:0>width$}", sign, digits, width = scale)
        }
    }
}

impl fmt::Debug for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigDecimal({}, scale={})", self, self.scale)
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl FromStr for BigDecimal {
    type Err = NumericError;

    /// Parse plain or scientific decimal notation.
    ///
    /// # Examples
    /// - "123.456" -> 123.456
    /// - "-0.001" -> -0.001
    /// - "1.5E-3" -> 0.0015
    /// - ".5" -> 0.5
    ///
    /// # Errors
    /// `InvalidInput` for malformed text; `Overflow` / `Underflow` when the
    /// exponent puts the scale outside the `i32` range.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (is_negative, s) = if let Some(rest) = s.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = s.strip_prefix('+') {
            (false, rest)
        } else {
            (false, s)
        };

        let (mantissa, exponent) = match s.find(['e', 'E']) {
            Some(pos) => {
                let exponent: i64 = s[pos + 1..]
                    .parse()
                    .map_err(|_| NumericError::InvalidInput)?;
                (&s[..pos], exponent)
            },
            None => (s, 0),
        };

        let (int_part, frac_part) = match mantissa.find('.') {
            Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
            None => (mantissa, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(NumericError::InvalidInput);
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(NumericError::InvalidInput);
        }

        let digits = format!("{}{}", int_part, frac_part);
        let unscaled =
            BigInt::parse_bytes(digits.as_bytes(), 10).ok_or(NumericError::InvalidInput)?;
        let unscaled = if is_negative { -unscaled } else { unscaled };

        let scale = (frac_part.len() as i64)
            .checked_sub(exponent)
            .ok_or(NumericError::InvalidInput)?;
        let value = Self::new(unscaled, scale);
        value.check_scale()?;
        Ok(value)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    fn ctx(precision: u32) -> MathContext {
        MathContext::with_precision(precision).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(dec("123.456").to_string(), "123.456");
        assert_eq!(dec("-0.001").to_string(), "-0.001");
        assert_eq!(dec("1E+3").to_string(), "1000");
        assert_eq!(dec("1.5e-3").to_string(), "0.0015");
        assert_eq!(dec(".5").to_string(), "0.5");
        assert_eq!(dec("+42").to_string(), "42");
        assert_eq!(dec("0.00").to_string(), "0.00");
        assert_eq!(dec("1.").to_string(), "1");
    }

    #[test]
    fn test_parse_invalid() {
        for input in ["", ".", "abc", "1.2.3", "--1", "1e", "NaN", "1_000", "e5"] {
            assert_eq!(
                input.parse::<BigDecimal>(),
                Err(NumericError::InvalidInput),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(dec("0").precision(), 1);
        assert_eq!(dec("9").precision(), 1);
        assert_eq!(dec("10").precision(), 2);
        assert_eq!(dec("-999.99").precision(), 5);
        assert_eq!(dec("1000").precision(), 4);
        assert_eq!(dec("123456789012345678901234567890").precision(), 30);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(dec("1.23456").round(&ctx(3)).to_string(), "1.23");
        assert_eq!(dec("1.235").round(&ctx(3)).to_string(), "1.24");
        assert_eq!(dec("-2.5").round(&ctx(1)).to_string(), "-3");
        assert_eq!(dec("123456").round(&ctx(2)).to_string(), "120000");
    }

    #[test]
    fn test_round_carry_adds_digit() {
        assert_eq!(dec("9.995").round(&ctx(3)).to_string(), "10.0");
        assert_eq!(dec("999").round(&ctx(2)).to_string(), "1000");
    }

    #[test]
    fn test_round_other_modes() {
        let even = MathContext::new(1, RoundingMode::HalfEven).unwrap();
        assert_eq!(dec("2.5").round(&even).to_string(), "2");
        assert_eq!(dec("3.5").round(&even).to_string(), "4");

        let down = MathContext::new(2, RoundingMode::Down).unwrap();
        assert_eq!(dec("-1.99").round(&down).to_string(), "-1.9");

        let floor = MathContext::new(2, RoundingMode::Floor).unwrap();
        assert_eq!(dec("-1.91").round(&floor).to_string(), "-2.0");

        let ceiling = MathContext::new(2, RoundingMode::Ceiling).unwrap();
        assert_eq!(dec("1.91").round(&ceiling).to_string(), "2.0");
    }

    #[test]
    fn test_set_scale() {
        assert_eq!(dec("1.5").set_scale(3, RoundingMode::HalfUp).to_string(), "1.500");
        assert_eq!(dec("1.5").set_scale(0, RoundingMode::Floor).to_string(), "1");
        assert_eq!(dec("-1.5").set_scale(0, RoundingMode::Floor).to_string(), "-2");
        assert_eq!(dec("-1.5").set_scale(0, RoundingMode::Ceiling).to_string(), "-1");
    }

    #[test]
    fn test_add_sub_mul() {
        let c = ctx(16);
        assert_eq!(dec("1.1").add(&dec("2.25"), &c).to_string(), "3.35");
        assert_eq!(dec("1").sub(&dec("0.001"), &c).to_string(), "0.999");
        assert_eq!(dec("1.5").mul(&dec("1.5"), &c).to_string(), "2.25");
        assert_eq!(dec("1.23456").mul(&dec("1"), &ctx(3)).to_string(), "1.23");
    }

    #[test]
    fn test_divide() {
        let c = ctx(16);
        assert_eq!(dec("1").checked_div(&dec("3"), &c).unwrap().to_string(), "0.3333333333333333");
        assert_eq!(dec("10").checked_div(&dec("4"), &c).unwrap().to_string(), "2.5");
        assert_eq!(dec("100000000").checked_div(&dec("100"), &c).unwrap().to_string(), "1000000");
        assert_eq!(dec("2").checked_div(&dec("3"), &ctx(5)).unwrap().to_string(), "0.66667");
        assert_eq!(dec("-2").checked_div(&dec("3"), &ctx(5)).unwrap().to_string(), "-0.66667");
        assert_eq!(dec("0").checked_div(&dec("3"), &c).unwrap().to_string(), "0");
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(
            dec("1").checked_div(&dec("0.000"), &ctx(16)),
            Err(NumericError::DivisionByZero)
        );
        assert_eq!(
            dec("1").checked_rem(&dec("0"), &ctx(16)),
            Err(NumericError::DivisionByZero)
        );
    }

    #[test]
    fn test_remainder_follows_dividend_sign() {
        let c = ctx(16);
        assert_eq!(dec("10").checked_rem(&dec("3"), &c).unwrap().to_string(), "1");
        assert_eq!(dec("-7.5").checked_rem(&dec("2"), &c).unwrap().to_string(), "-1.5");
    }

    #[test]
    fn test_compare_ignores_scale() {
        assert_eq!(dec("1.50"), dec("1.5"));
        assert!(dec("2") > dec("1.999"));
        assert!(dec("-2") < dec("-1.999"));
        assert!(dec("0.000") == dec("0"));
    }

    #[test]
    fn test_compare_far_apart_scales() {
        assert!(dec("1e20000000") > dec("1"));
        assert!(dec("-1e20000000") < dec("-1"));
        assert!(dec("1e-20000000") < dec("1"));
        assert!(dec("1e-20000000") > dec("0"));
        assert!(dec("-1e-20000000") > dec("-1"));
        assert_eq!(dec("1e20000000"), dec("10e19999999"));
    }

    #[test]
    fn test_add_negligible_operand() {
        let sum = dec("1e20000000").add(&dec("1"), &ctx(32));
        assert_eq!(sum, dec("1e20000000"));
        assert_eq!(sum.precision(), 32);
        assert_eq!(sum.scale(), -19_999_969);

        let up = dec("1").sub(&dec("1e-20000000"), &ctx(5));
        assert_eq!(up.to_string(), "1.0000");
        let down = MathContext::new(5, RoundingMode::Down).unwrap();
        assert_eq!(dec("1").sub(&dec("1e-20000000"), &down).to_string(), "0.99999");
        let ceiling = MathContext::new(5, RoundingMode::Ceiling).unwrap();
        assert_eq!(dec("1").add(&dec("1e-20000000"), &ceiling).to_string(), "1.0001");
    }

    #[test]
    fn test_add_zero_keeps_scale_within_precision() {
        let c = ctx(5);
        assert_eq!(dec("1").add(&dec("0e-20000000"), &c).to_string(), "1.0000");
        assert_eq!(dec("1.5").add(&dec("0.000"), &c).to_string(), "1.500");
        assert_eq!(dec("0.00").add(&dec("0"), &c).to_string(), "0.00");
        assert_eq!(dec("0").add(&dec("123456.7"), &c).to_string(), "123460");
    }

    #[test]
    fn test_remainder_of_smaller_dividend() {
        let c = ctx(32);
        assert_eq!(dec("1").checked_rem(&dec("1e20000000"), &c).unwrap(), dec("1"));
        assert_eq!(dec("1").checked_rem(&dec("3.00"), &c).unwrap().to_string(), "1.00");
    }

    #[test]
    fn test_integral_part_of_extreme_scales() {
        assert_eq!(dec("1e-20000000").set_scale(0, RoundingMode::Floor).to_string(), "0");
        assert_eq!(dec("1e-20000000").set_scale(0, RoundingMode::Ceiling).to_string(), "1");
        assert_eq!(dec("-1e-20000000").set_scale(0, RoundingMode::Floor).to_string(), "-1");
        assert_eq!(dec("1e20000000").to_i64(), None);
        assert_eq!(dec("9e18").to_i64(), Some(9_000_000_000_000_000_000));
    }

    #[test]
    fn test_parse_scale_out_of_range() {
        assert_eq!("1e-5000000000".parse::<BigDecimal>(), Err(NumericError::Underflow));
        assert_eq!("1e5000000000".parse::<BigDecimal>(), Err(NumericError::Overflow));
        assert_eq!(
            "1e-9223372036854775808".parse::<BigDecimal>(),
            Err(NumericError::InvalidInput)
        );
        assert!("1e-2147483647".parse::<BigDecimal>().is_ok());
    }

    #[test]
    fn test_hash_ignores_trailing_zeros() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(value: &BigDecimal) -> u64 {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            hasher.finish()
        }

        assert_eq!(hash_of(&dec("1.50")), hash_of(&dec("1.5")));
        assert_eq!(hash_of(&dec("1E+3")), hash_of(&dec("1000.000")));
        assert_eq!(hash_of(&dec("0.000")), hash_of(&dec("0")));
        assert_eq!(dec("120.00").normalized().to_string(), "120");
    }

    #[test]
    fn test_pow() {
        let c = ctx(16);
        assert_eq!(dec("2").checked_pow(10, &c).unwrap().to_string(), "1024");
        assert_eq!(dec("1.1").checked_pow(2, &c).unwrap().to_string(), "1.21");
        assert_eq!(dec("2").checked_pow(-2, &c).unwrap().to_string(), "0.25");
        assert_eq!(dec("7").checked_pow(0, &c).unwrap().to_string(), "1");
    }

    #[test]
    fn test_pow_rounds_to_context() {
        let result = dec("3").checked_pow(40, &ctx(5)).unwrap();
        assert_eq!(result.precision(), 5);
        assert_eq!(result.to_string(), "12158000000000000000");
    }

    #[test]
    fn test_pow_failures() {
        let c = ctx(16);
        assert_eq!(
            dec("2").checked_pow(1_000_000_000, &c),
            Err(NumericError::ExponentOutOfRange)
        );
        assert_eq!(dec("0").checked_pow(-1, &c), Err(NumericError::DivisionByZero));
        assert_eq!(
            dec("1e-999999999").checked_pow(3, &c),
            Err(NumericError::Underflow)
        );
        assert_eq!(dec("1e999999999").checked_pow(3, &c), Err(NumericError::Overflow));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(dec("0.1").to_f64(), 0.1);
        assert_eq!(dec("-12.9").to_i64(), Some(-12));
        assert_eq!(BigDecimal::from_f64(0.1).unwrap().to_string(), "0.1");
        assert_eq!(BigDecimal::from_f64(-2.5).unwrap().to_string(), "-2.5");
        assert!(BigDecimal::from_f64(f64::NAN).is_err());
        assert!(BigDecimal::from_f64(f64::INFINITY).is_err());
    }

    #[test]
    fn test_rust_decimal_round_trip() {
        let d = rust_decimal::Decimal::new(12345, 2);
        let big = BigDecimal::from_rust_decimal(&d);
        assert_eq!(big.to_string(), "123.45");
        assert_eq!(big.to_rust_decimal().unwrap(), d);

        let long = dec("1.23456789012345678901234567890123");
        assert_eq!(
            long.to_rust_decimal().unwrap().to_string(),
            "1.234567890123456789012345679"
        );
        assert_eq!(dec("1e40").to_rust_decimal(), Err(NumericError::Overflow));
    }

    #[test]
    fn test_scientific_digits() {
        assert_eq!(dec("300000000000").scientific_digits(), (30, 11));
        assert_eq!(dec("0.5").scientific_digits(), (50, -1));
        assert_eq!(dec("2").scientific_digits(), (20, 0));
        assert_eq!(dec("9.96").scientific_digits(), (10, 1));
        assert_eq!(dec("-0.0123").scientific_digits(), (12, -2));
    }

    #[test]
    fn test_log10_f64() {
        assert!((dec("1000").log10_f64() - 3.0).abs() < 1e-12);
        assert!((dec("1e-500").log10_f64() + 500.0).abs() < 1e-9);
        let huge = dec("12345678901234567890123456789e400");
        assert!((huge.log10_f64() - 428.0915).abs() < 1e-3);
    }
}
