//! # Pluggable diagnostics.
//!
//! This module provides the [`Diagnostics`] trait, the process-wide facade
//! functions that forward to the active implementation, and the built-in sinks.
//!
//! ## Architecture
//! ```text
//! Call flow:
//!   ListenerRegistry / PropertyAliases / application code
//!        │  warn / deprecate / assert / run_in_debug
//!        ▼
//!   facade (global.rs) ──► active Arc<dyn Diagnostics>
//!                                 │
//!                     ┌───────────┴────────────┐
//!                     ▼                        ▼
//!                   Noop               DebugDiagnostics
//!               (default, silent)    (DeprecationManager + Environment)
//! ```
//!
//! ## Lifecycle
//! - [`override_implementation`] swaps the active sink, immediately and process-wide.
//! - [`reset_implementation`] puts the silent default back.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use protolisten::{DebugDiagnostics, DiagnosticOptions, diagnostics};
//!
//! diagnostics::override_implementation(Arc::new(DebugDiagnostics::default()));
//! assert!(diagnostics::assert("must hold", false).is_err());
//! assert!(diagnostics::deprecate("old", true, &DiagnosticOptions::default()).is_ok());
//! diagnostics::reset_implementation();
//! ```

mod embedded;
mod global;
mod sink;

#[cfg(test)]
pub(crate) mod testing;

pub use embedded::DebugDiagnostics;
pub use global::{
    assert, current, debug, deprecate, deprecate_func, override_implementation,
    reset_implementation, run_in_debug, warn,
};
pub use sink::{DiagnosticOptions, Diagnostics, Noop, Test, Thunk};
