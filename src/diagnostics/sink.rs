//! # Diagnostic sink trait.
//!
//! Provides [`Diagnostics`], the extension point behind the process-wide
//! `assert` / `warn` / `debug` / `deprecate` / `deprecate_func` / `run_in_debug`
//! calls. Every method has a no-op default, so [`Noop`] is simply an empty impl.
//!
//! ## Rules
//! - A truthy [`Test`] means "condition holds, do nothing".
//! - A falsy [`Test`] means "report"; only `assert` and `deprecate` may fail.
//! - `deprecate_func` must hand back a callable thunk even when diagnostics are off.
//!
//! ## Example
//! ```rust
//! use protolisten::{DiagnosticError, DiagnosticOptions, Diagnostics, Test};
//!
//! struct Strict;
//!
//! impl Diagnostics for Strict {
//!     fn assert(&self, message: &str, test: Test<'_>) -> Result<(), DiagnosticError> {
//!         if test.holds() {
//!             Ok(())
//!         } else {
//!             Err(DiagnosticError::AssertionFailed { message: message.to_string() })
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "strict" }
//! }
//!
//! assert!(Strict.assert("ok", Test::from(true)).is_ok());
//! assert!(Strict.assert("bad", Test::from(false)).is_err());
//! ```

use std::borrow::Cow;
use std::fmt;

use crate::error::DiagnosticError;

/// A deferred call returned by [`Diagnostics::deprecate_func`].
pub type Thunk<'a> = Box<dyn FnMut() -> Result<(), DiagnosticError> + 'a>;

/// The condition checked by `assert`, `warn` and `deprecate`.
///
/// Either a plain boolean or a predicate evaluated only when the sink needs it.
#[derive(Clone, Copy)]
pub enum Test<'a> {
    /// Already-computed value.
    Value(bool),
    /// Evaluated lazily by the sink.
    Predicate(&'a dyn Fn() -> bool),
}

impl Test<'_> {
    /// A test that always fails; what a bare `deprecate(message)` means.
    pub const FAIL: Test<'static> = Test::Value(false);

    /// Evaluates the test. Predicates run on every call.
    #[inline]
    pub fn holds(&self) -> bool {
        match self {
            Test::Value(v) => *v,
            Test::Predicate(f) => f(),
        }
    }
}

impl From<bool> for Test<'_> {
    fn from(value: bool) -> Self {
        Test::Value(value)
    }
}

impl<'a, F> From<&'a F> for Test<'a>
where
    F: Fn() -> bool + 'a,
{
    fn from(f: &'a F) -> Self {
        Test::Predicate(f)
    }
}

impl fmt::Debug for Test<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Test::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Test::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Extra metadata attached to `warn` and `deprecate` calls.
///
/// `id` selects the per-id deprecation level; `until` and `url` are informational.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticOptions {
    /// Stable identifier of the warning or deprecation.
    pub id: Option<Cow<'static, str>>,
    /// Version in which the deprecated thing goes away.
    pub until: Option<Cow<'static, str>>,
    /// Where to read more.
    pub url: Option<Cow<'static, str>>,
}

impl DiagnosticOptions {
    /// Options carrying only an id.
    pub fn with_id(id: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Sets `until`.
    pub fn until(mut self, until: impl Into<Cow<'static, str>>) -> Self {
        self.until = Some(until.into());
        self
    }

    /// Sets `url`.
    pub fn url(mut self, url: impl Into<Cow<'static, str>>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// The id as a plain `&str`.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Pluggable implementation of the diagnostic calls.
///
/// Exactly one implementation is active process-wide; swap it with
/// [`override_implementation`](super::override_implementation).
///
/// ### Implementation requirements
/// - Never panic; report failures through the returned `Result`.
/// - Do not hold locks across the `run_in_debug` callback; it may call back
///   into the diagnostics facade.
pub trait Diagnostics: Send + Sync + 'static {
    /// Fails when `test` is falsy.
    fn assert(&self, _message: &str, _test: Test<'_>) -> Result<(), DiagnosticError> {
        Ok(())
    }

    /// Reports when `test` is falsy. Never fails.
    fn warn(&self, _message: &str, _test: Test<'_>, _options: &DiagnosticOptions) {}

    /// Emits a debug message.
    fn debug(&self, _message: &str) {}

    /// Reports (or fails, depending on policy) when `test` is falsy.
    fn deprecate(
        &self,
        _message: &str,
        _test: Test<'_>,
        _options: &DiagnosticOptions,
    ) -> Result<(), DiagnosticError> {
        Ok(())
    }

    /// Wraps `f` so that calling it first reports the deprecation.
    ///
    /// The default returns `f` unchanged.
    fn deprecate_func<'a>(
        &self,
        _message: &str,
        _options: &DiagnosticOptions,
        f: Thunk<'a>,
    ) -> Thunk<'a> {
        f
    }

    /// Runs `f` only when this implementation wants debug-only checks.
    fn run_in_debug(&self, _f: &mut dyn FnMut()) {}

    /// Name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// The default implementation: every call is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct Noop;

impl Diagnostics for Noop {
    fn name(&self) -> &'static str {
        "noop"
    }
}
