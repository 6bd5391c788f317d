// ============================================================================
// Numeric Module
// Polymorphic Num value and its decimal / double backends
// ============================================================================
//
// This module provides:
// - Num: closed sum type over Decimal, Double and NaN
// - BigDecimal + MathContext: arbitrary-precision decimal with rounding context
// - DecimalNum / DoubleNum: per-representation arithmetic
// - NumericError: error types for fallible operations
//
// Design principles:
// - Values are immutable; every operation returns a new Num
// - Undefined results become NaN, unrepresentable ones return NumericError
// - Decimal results carry the receiver's precision context

mod big_decimal;
mod context;
mod decimal_num;
mod double_num;
mod errors;
mod num;

pub use big_decimal::{BigDecimal, MAX_INTEGER_EXPONENT};
pub use context::{MathContext, RoundingMode, DEFAULT_PRECISION};
pub use decimal_num::DecimalNum;
pub use double_num::{DoubleNum, EPSILON};
pub use errors::{NumericError, NumericResult};
pub use num::Num;
