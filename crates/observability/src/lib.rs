//! Tracing/logging setup shared by the stockroom binaries.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::LogFormat;
