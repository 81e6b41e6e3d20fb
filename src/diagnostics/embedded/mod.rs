//! # Built-in sinks
//!
//! - [`DebugDiagnostics`]: policy-gated sink for development and test builds.
//!   Assertions fail, warnings and debug messages go to `tracing`, deprecations
//!   follow the [`DeprecationManager`](crate::DeprecationManager).

mod debug;

pub use debug::DebugDiagnostics;
