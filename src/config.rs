//! # Diagnostic configuration.
//!
//! Provides [`Config`], the settings used to build a
//! [`DebugDiagnostics`](crate::DebugDiagnostics) sink.
//!
//! Config is used in two ways:
//! 1. **Programmatic**: `Config { default_level, .. }` then `DebugDiagnostics::from_config(&cfg)`
//! 2. **Environment**: `Config::from_env()` reads `RAISE_ON_DEPRECATION` and `DEPRECATION_LEVEL`
//!
//! ## Environment variables
//! - `RAISE_ON_DEPRECATION`: `1|true|yes|on` turns the override on
//! - `DEPRECATION_LEVEL`: `raise|log|silence`; unparsable values keep the default

use std::collections::HashMap;

use crate::policies::{DeprecationLevel, Environment};

/// Name of the environment variable holding the global default level.
pub const DEPRECATION_LEVEL_VAR: &str = "DEPRECATION_LEVEL";

/// Settings for the policy-gated diagnostic sink.
///
/// ## Field semantics
/// - `default_level`: Global deprecation level used when no id-specific level is set
/// - `raise_on_deprecation`: When on, every `deprecate` call resets the default to `RAISE`
/// - `levels`: Initial per-id overrides
#[derive(Clone, Debug)]
pub struct Config {
    /// Global default deprecation level.
    pub default_level: DeprecationLevel,

    /// Initial value of the environment override.
    ///
    /// Id-specific levels still win over the coerced default.
    pub raise_on_deprecation: bool,

    /// Per-id levels installed at construction.
    pub levels: HashMap<String, DeprecationLevel>,
}

impl Config {
    /// Starts from [`Config::default`] and applies the environment variables.
    pub fn from_env() -> Self {
        let mut config = Self {
            raise_on_deprecation: Environment::from_env().raise_on_deprecation(),
            ..Self::default()
        };

        if let Ok(raw) = std::env::var(DEPRECATION_LEVEL_VAR) {
            match raw.parse() {
                Ok(level) => config.default_level = level,
                Err(err) => tracing::warn!(%err, "ignoring {DEPRECATION_LEVEL_VAR}"),
            }
        }

        config
    }

    /// Adds a per-id level.
    pub fn with_level(mut self, id: impl Into<String>, level: DeprecationLevel) -> Self {
        self.levels.insert(id.into(), level);
        self
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `default_level = RAISE`
    /// - `raise_on_deprecation = false`
    /// - `levels = {}`
    fn default() -> Self {
        Self {
            default_level: DeprecationLevel::Raise,
            raise_on_deprecation: false,
            levels: HashMap::new(),
        }
    }
}
