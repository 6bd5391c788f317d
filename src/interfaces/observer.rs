// ============================================================================
// Numeric Observer Interface
// Hook for watching the iterative decimal algorithms converge
// ============================================================================

use crate::numeric::BigDecimal;

/// Characters kept at each end when an estimate is abbreviated for logging.
const ABBREVIATE_EDGE: usize = 20;

/// Progress events emitted by `sqrt`, `log` and `exp` on the decimal backend
#[derive(Debug, Clone, Copy)]
pub enum NumericEvent<'a> {
    /// Babylonian square root seeded from the scientific-notation form
    SqrtSeeded {
        /// Leading digits of the input in tenths (`30` is 3.0), scaled
        /// by ten when the exponent was odd
        mantissa: u64,
        /// Even decimal exponent matching `mantissa`
        exponent: i64,
        estimate: &'a BigDecimal,
    },

    /// One Babylonian step finished
    SqrtIteration {
        iteration: u32,
        estimate: &'a BigDecimal,
        delta: &'a BigDecimal,
    },

    /// Estimate reached a fixed point
    SqrtConverged { iterations: u32 },

    /// Continued-fraction logarithm finished
    LogCompleted { terms: u32 },

    /// Taylor series stopped changing
    ExpConverged { terms: u32 },
}

/// Observer for numeric algorithm progress.
/// Implementations must be cheap; they run inside the iteration loop.
pub trait NumericObserver: Send + Sync {
    fn on_event(&self, event: &NumericEvent<'_>);
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl NumericObserver for NoOpObserver {
    fn on_event(&self, _event: &NumericEvent<'_>) {}
}

/// Observer that forwards events to `tracing` at trace level
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl NumericObserver for LoggingObserver {
    fn on_event(&self, event: &NumericEvent<'_>) {
        match event {
            NumericEvent::SqrtSeeded {
                mantissa,
                exponent,
                estimate,
            } => {
                tracing::trace!(
                    mantissa,
                    exponent,
                    estimate = %estimate,
                    "sqrt seeded"
                );
            },
            NumericEvent::SqrtIteration {
                iteration,
                estimate,
                delta,
            } => {
                tracing::trace!(
                    iteration,
                    estimate = %abbreviate(&estimate.to_string()),
                    delta = %abbreviate(&delta.to_string()),
                    "sqrt iteration"
                );
            },
            NumericEvent::SqrtConverged { iterations } => {
                tracing::trace!(iterations, "sqrt converged");
            },
            NumericEvent::LogCompleted { terms } => {
                tracing::trace!(terms, "log completed");
            },
            NumericEvent::ExpConverged { terms } => {
                tracing::trace!(terms, "exp converged");
            },
        }
    }
}

/// Shorten long digit strings to `head...tail`.
fn abbreviate(digits: &str) -> String {
    if digits.len() <= 2 * ABBREVIATE_EDGE + 3 {
        return digits.to_string();
    }
    format!(
        "{}...{}",
        &digits[..ABBREVIATE_EDGE],
        &digits[digits.len() - ABBREVIATE_EDGE..]
    )
}
