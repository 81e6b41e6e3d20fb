//! # Environment override for deprecations.
//!
//! [`Environment`] holds the single externally settable switch consulted by the
//! deprecation path on every call. When `raise_on_deprecation` is on, each
//! `deprecate` call resets the global default level to
//! [`DeprecationLevel::Raise`](super::DeprecationLevel::Raise) before resolving
//! its own level.

use std::sync::atomic::{AtomicBool, Ordering};

/// Name of the environment variable read by [`Environment::from_env`].
pub const RAISE_ON_DEPRECATION_VAR: &str = "RAISE_ON_DEPRECATION";

/// Process-level switches read by the diagnostic sink.
#[derive(Debug, Default)]
pub struct Environment {
    raise_on_deprecation: AtomicBool,
}

impl Environment {
    /// Creates an environment with the flag set to `raise_on_deprecation`.
    #[must_use]
    pub fn new(raise_on_deprecation: bool) -> Self {
        Self {
            raise_on_deprecation: AtomicBool::new(raise_on_deprecation),
        }
    }

    /// Reads `RAISE_ON_DEPRECATION` from the process environment.
    ///
    /// Accepts `1`, `true`, `yes`, `on` (case-insensitive); anything else is off.
    #[must_use]
    pub fn from_env() -> Self {
        let flag = std::env::var(RAISE_ON_DEPRECATION_VAR)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        Self::new(flag)
    }

    /// Current value of the flag.
    #[inline]
    pub fn raise_on_deprecation(&self) -> bool {
        self.raise_on_deprecation.load(Ordering::Acquire)
    }

    /// Flips the flag. Takes effect on the next `deprecate` call.
    pub fn set_raise_on_deprecation(&self, on: bool) {
        self.raise_on_deprecation.store(on, Ordering::Release);
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
