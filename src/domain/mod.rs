// ============================================================================
// Domain Module
// Configuration value objects for computation contexts
// ============================================================================

pub mod config;

pub use config::{NumConfig, Representation};
