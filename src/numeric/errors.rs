// ============================================================================
// Numeric Errors
// Error types for the Num abstraction and its backends
// ============================================================================

use std::fmt;

/// Errors that can occur while building or combining `Num` values.
///
/// Undefined results (division by zero, square root of a negative number,
/// logarithm of a non-positive number) are not errors: they surface as the
/// NaN sentinel. The variants below are reserved for programming errors and
/// unrepresentable results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Result magnitude exceeds the representable decimal exponent range
    Overflow,
    /// Result is too small for the representable decimal exponent range
    Underflow,
    /// Attempted division by zero
    DivisionByZero,
    /// Input string or value is invalid
    InvalidInput,
    /// Precision must be at least one significant digit
    InvalidPrecision,
    /// Integer exponent cannot be represented as a machine integer
    ExponentOutOfRange,
    /// Operands come from different representations
    RepresentationMismatch,
    /// NaN has no integral or fixed-point value
    NotANumber,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::Overflow => {
                write!(f, "arithmetic overflow: result exceeded maximum value")
            },
            NumericError::Underflow => {
                write!(f, "arithmetic underflow: result below minimum value")
            },
            NumericError::DivisionByZero => write!(f, "division by zero"),
            NumericError::InvalidInput => write!(f, "invalid input: could not parse value"),
            NumericError::InvalidPrecision => {
                write!(f, "invalid precision: must be at least one digit")
            },
            NumericError::ExponentOutOfRange => write!(
                f,
                "exponent out of range: integer part does not fit a machine integer"
            ),
            NumericError::RepresentationMismatch => {
                write!(f, "representation mismatch between operands")
            },
            NumericError::NotANumber => write!(f, "value is NaN"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            NumericError::Overflow.to_string(),
            "arithmetic overflow: result exceeded maximum value"
        );
        assert_eq!(NumericError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            NumericError::RepresentationMismatch.to_string(),
            "representation mismatch between operands"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(NumericError::Overflow, NumericError::Overflow);
        assert_ne!(NumericError::Overflow, NumericError::Underflow);
    }

    #[test]
    fn test_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(NumericError::ExponentOutOfRange);
        assert!(err.to_string().starts_with("exponent out of range"));
    }
}
