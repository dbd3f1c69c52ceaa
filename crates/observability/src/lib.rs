//! Process-wide tracing/logging setup.

/// Tracing configuration (filters, formatting).
pub mod tracing;

pub use self::tracing::{LogFormat, init, init_with};
