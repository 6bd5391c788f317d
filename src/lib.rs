// ============================================================================
// Numeric Core Library
// Polymorphic decimal/double values for technical-analysis pipelines
// ============================================================================

//! # ta-num
//!
//! The numeric layer an indicator library builds on: one immutable [`Num`]
//! type with interchangeable backing representations, and a [`NumFactory`]
//! that keeps every value of a computation context in one representation.
//!
//! ## Features
//!
//! - **Arbitrary-precision decimals** with a per-value precision context
//! - **Native doubles** with epsilon-tolerant equality
//! - **NaN sentinel** that absorbs every operation instead of raising
//! - **Square root, logarithm and real powers** without a native
//!   arbitrary-precision math library
//! - **Convergence tracing** through an optional observer hook
//!
//! ## Example
//!
//! ```rust
//! use ta_num::prelude::*;
//!
//! // One factory per computation context
//! let factory = create_from_config(&NumConfig::decimal()).unwrap();
//!
//! let close = factory.num_of_str("101.50").unwrap();
//! let open = factory.num_of_str("100.00").unwrap();
//!
//! // Relative change in percent
//! let change = close.minus(&open).divided_by(&open).multiplied_by(factory.hundred());
//! assert_eq!(change.to_string(), "1.500");
//!
//! // Undefined results surface as NaN
//! assert!(close.divided_by(factory.zero()).is_nan());
//! assert!(factory.minus_one().sqrt().is_nan());
//! ```
//!
//! [`Num`]: numeric::Num
//! [`NumFactory`]: factory::NumFactory

pub mod domain;
pub mod factory;
pub mod interfaces;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{NumConfig, Representation};
    pub use crate::factory::{
        create_from_config, NumFactory, NumFactoryBuilder, NumKind, NumericValue,
    };
    pub use crate::interfaces::{LoggingObserver, NoOpObserver, NumericEvent, NumericObserver};
    pub use crate::numeric::{
        MathContext, Num, NumericError, NumericResult, RoundingMode, DEFAULT_PRECISION,
    };
}
