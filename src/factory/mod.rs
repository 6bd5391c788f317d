// ============================================================================
// Factory Module
// Num factories and their construction from configuration
// ============================================================================

pub mod builder;
mod num_factory;

pub use builder::{create_from_config, NumFactoryBuilder};
pub use num_factory::{NumFactory, NumKind, NumericValue};
