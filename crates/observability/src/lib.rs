//! Tracing and logging (shared setup).

/// Initialize process-wide tracing/logging from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    crate::tracing::init_with(&ObservabilityConfig::from_env());
}

/// Logging configuration.
pub mod config;

/// Tracing subscriber installation (filters, layers).
pub mod tracing;

pub use self::config::{LogFormat, ObservabilityConfig};
pub use self::tracing::init_with;
