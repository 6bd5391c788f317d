// ============================================================================
// Factory Construction
// Creates num factories from configuration
// ============================================================================

use super::num_factory::NumFactory;
use crate::domain::config::{NumConfig, Representation};
use crate::numeric::{NumericResult, RoundingMode};

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a num factory from configuration
///
/// # Arguments
/// * `config` - Representation, precision and rounding
///
/// # Returns
/// * `NumericResult<NumFactory>` - Configured factory or `InvalidPrecision`
///
/// # Example
/// ```
/// use ta_num::prelude::*;
///
/// let factory = create_from_config(&NumConfig::high_precision()).unwrap();
/// assert_eq!(factory.context().unwrap().precision(), 128);
/// ```
pub fn create_from_config(config: &NumConfig) -> NumericResult<NumFactory> {
    let factory = match config.representation {
        Representation::Decimal => NumFactory::decimal_with_context(config.math_context()?),
        Representation::Double => NumFactory::double(),
    };

    tracing::debug!(
        representation = ?config.representation,
        precision = config.precision,
        rounding = %config.rounding,
        "created num factory"
    );

    Ok(factory)
}

// ============================================================================
// Builder Pattern
// ============================================================================

/// Builder for creating num factories with fluent API
///
/// # Example
/// ```
/// use ta_num::prelude::*;
///
/// let factory = NumFactoryBuilder::new()
///     .decimal()
///     .with_precision(64)
///     .with_rounding(RoundingMode::HalfEven)
///     .build()
///     .unwrap();
/// assert_eq!(factory.context().unwrap().precision(), 64);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NumFactoryBuilder {
    config: NumConfig,
}

impl NumFactoryBuilder {
    /// Create a builder for the default decimal configuration
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Representation
    // ========================================================================

    /// Use arbitrary-precision decimals (default)
    pub fn decimal(mut self) -> Self {
        self.config.representation = Representation::Decimal;
        self
    }

    /// Use native doubles
    pub fn double(mut self) -> Self {
        self.config.representation = Representation::Double;
        self
    }

    // ========================================================================
    // Precision Context
    // ========================================================================

    /// Set decimal significant digits
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.config.precision = precision;
        self
    }

    /// Set decimal rounding mode
    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.config.rounding = rounding;
        self
    }

    // ========================================================================
    // Preset Configurations
    // ========================================================================

    /// 128-digit decimal preset
    pub fn high_precision() -> Self {
        Self {
            config: NumConfig::high_precision(),
        }
    }

    /// Native double preset
    pub fn fast() -> Self {
        Self {
            config: NumConfig::double(),
        }
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the factory
    pub fn build(&self) -> NumericResult<NumFactory> {
        create_from_config(&self.config)
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &NumConfig {
        &self.config
    }
}
