//! Deprecation policies.
//!
//! This module groups the knobs that control **what happens** when a deprecation
//! check fails: raise, log, or stay silent.
//!
//! ## Contents
//! - [`DeprecationLevel`]   outcome of a failed deprecation check (raise / log / silence)
//! - [`DeprecationManager`] global default level plus per-id overrides
//! - [`Environment`]        the "raise on deprecation" switch read on every call
//!
//! ## Quick wiring
//! ```text
//! deprecate(msg, test, opts)
//!      └─► DebugDiagnostics uses:
//!           - environment.raise_on_deprecation() to coerce the default to RAISE
//!           - manager.resolve(opts.id) to pick the effective level
//! ```
//!
//! ## Defaults
//! - `DeprecationLevel::Raise` as the global default.
//! - `Environment::default()` has the flag off.

mod deprecation;
mod environment;

pub use deprecation::{DeprecationLevel, DeprecationManager, LevelSnapshot, ParseLevelError};
pub use environment::RAISE_ON_DEPRECATION_VAR;
pub use environment::Environment;
