//! # Process-wide diagnostic facade.
//!
//! Free functions that forward to whichever [`Diagnostics`] implementation is
//! currently installed. Exactly one is active at a time; swapping is immediate
//! and affects every caller.
//!
//! ```text
//! assert / warn / debug / deprecate / deprecate_func / run_in_debug
//!        │
//!        ▼
//!   CURRENT (RwLock<Arc<dyn Diagnostics>>) ──clone Arc──► impl method
//! ```
//!
//! The `Arc` is cloned out of the lock before the call, so an implementation
//! may itself call [`override_implementation`] without deadlocking.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use super::sink::{DiagnosticOptions, Diagnostics, Noop, Test, Thunk};
use crate::error::DiagnosticError;

static CURRENT: LazyLock<RwLock<Arc<dyn Diagnostics>>> =
    LazyLock::new(|| RwLock::new(default_implementation()));

fn default_implementation() -> Arc<dyn Diagnostics> {
    Arc::new(Noop)
}

/// Installs `implementation` as the active sink.
pub fn override_implementation(implementation: Arc<dyn Diagnostics>) {
    tracing::trace!(sink = implementation.name(), "diagnostic sink overridden");
    *CURRENT.write() = implementation;
}

/// Restores the no-op default.
pub fn reset_implementation() {
    *CURRENT.write() = default_implementation();
}

/// The currently active sink.
pub fn current() -> Arc<dyn Diagnostics> {
    Arc::clone(&CURRENT.read())
}

/// Fails with [`DiagnosticError::AssertionFailed`] when `test` is falsy
/// (subject to the active sink).
pub fn assert<'a>(message: &str, test: impl Into<Test<'a>>) -> Result<(), DiagnosticError> {
    current().assert(message, test.into())
}

/// Reports `message` when `test` is falsy. Never fails.
pub fn warn<'a>(message: &str, test: impl Into<Test<'a>>, options: &DiagnosticOptions) {
    current().warn(message, test.into(), options);
}

/// Emits a debug message.
pub fn debug(message: &str) {
    current().debug(message);
}

/// Reports a deprecation when `test` is falsy; may fail depending on policy.
pub fn deprecate<'a>(
    message: &str,
    test: impl Into<Test<'a>>,
    options: &DiagnosticOptions,
) -> Result<(), DiagnosticError> {
    current().deprecate(message, test.into(), options)
}

/// Wraps `f` so each call reports the deprecation first.
///
/// With the default sink `f` comes back untouched.
pub fn deprecate_func<'a, F>(message: &str, options: &DiagnosticOptions, f: F) -> Thunk<'a>
where
    F: FnMut() -> Result<(), DiagnosticError> + 'a,
{
    current().deprecate_func(message, options, Box::new(f))
}

/// Runs `f` only if the active sink enables debug-only checks.
pub fn run_in_debug(mut f: impl FnMut()) {
    current().run_in_debug(&mut f);
}
