//! # Deprecation levels and the per-id policy table.
//!
//! [`DeprecationLevel`] decides what a failed deprecation check does:
//!
//! - [`DeprecationLevel::Raise`] the call returns an error.
//! - [`DeprecationLevel::Log`] the call logs a `DEPRECATION:` line and continues.
//! - [`DeprecationLevel::Silence`] the call does nothing at all.
//!
//! [`DeprecationManager`] stores one global default plus optional per-id overrides.
//!
//! ## Resolution
//! ```text
//! resolve(Some(id)) ─► individual[id] ──(unset)──► default_level
//! resolve(None)     ─────────────────────────────► default_level
//! ```
//!
//! ## Example
//! ```rust
//! use protolisten::{DeprecationLevel, DeprecationManager};
//!
//! let manager = DeprecationManager::new(DeprecationLevel::Raise);
//! manager.set_level("ABC", Some(DeprecationLevel::Log));
//!
//! assert_eq!(manager.resolve(Some("ABC")), DeprecationLevel::Log);
//! assert_eq!(manager.resolve(Some("other")), DeprecationLevel::Raise);
//!
//! manager.set_level("ABC", None);
//! assert_eq!(manager.resolve(Some("ABC")), DeprecationLevel::Raise);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use parking_lot::RwLock;
use thiserror::Error;

/// Outcome of a deprecation check whose test is falsy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DeprecationLevel {
    /// Fail the calling code path (default).
    #[default]
    Raise,
    /// Report and continue.
    Log,
    /// Suppress entirely; the test is not even evaluated.
    Silence,
}

impl DeprecationLevel {
    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            DeprecationLevel::Raise => "raise",
            DeprecationLevel::Log => "log",
            DeprecationLevel::Silence => "silence",
        }
    }
}

impl fmt::Display for DeprecationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`DeprecationLevel`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown deprecation level {0:?} (expected raise, log or silence)")]
pub struct ParseLevelError(pub String);

impl FromStr for DeprecationLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raise" => Ok(DeprecationLevel::Raise),
            "log" => Ok(DeprecationLevel::Log),
            "silence" => Ok(DeprecationLevel::Silence),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Saved manager state, see [`DeprecationManager::snapshot`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSnapshot {
    /// Global default at the time of the snapshot.
    pub default_level: DeprecationLevel,
    /// Per-id overrides at the time of the snapshot.
    pub individual_levels: HashMap<String, DeprecationLevel>,
}

#[derive(Debug)]
struct State {
    default_level: DeprecationLevel,
    individual: HashMap<String, DeprecationLevel>,
}

/// Global default level plus per-id overrides.
///
/// All methods take `&self`; state sits behind a lock so one manager can be
/// shared between the installed sink and whoever configures it.
#[derive(Debug)]
pub struct DeprecationManager {
    state: RwLock<State>,
}

impl Default for DeprecationManager {
    /// Default level `RAISE`, no overrides.
    fn default() -> Self {
        Self::new(DeprecationLevel::default())
    }
}

impl DeprecationManager {
    /// Creates a manager with the given global default and no overrides.
    #[must_use]
    pub fn new(default_level: DeprecationLevel) -> Self {
        Self {
            state: RwLock::new(State {
                default_level,
                individual: HashMap::new(),
            }),
        }
    }

    /// Current global default.
    pub fn default_level(&self) -> DeprecationLevel {
        self.state.read().default_level
    }

    /// Replaces the global default.
    pub fn set_default_level(&self, level: DeprecationLevel) {
        self.state.write().default_level = level;
    }

    /// Id-specific override, if one is set.
    pub fn level(&self, id: &str) -> Option<DeprecationLevel> {
        self.state.read().individual.get(id).copied()
    }

    /// Sets (`Some`) or clears (`None`) the override for `id`.
    pub fn set_level(&self, id: impl Into<String>, level: Option<DeprecationLevel>) {
        let id = id.into();
        let mut state = self.state.write();
        match level {
            Some(level) => {
                state.individual.insert(id, level);
            }
            None => {
                state.individual.remove(&id);
            }
        }
    }

    /// Effective level for a call carrying `id`.
    ///
    /// An id-specific override wins; otherwise the global default applies.
    pub fn resolve(&self, id: Option<&str>) -> DeprecationLevel {
        let state = self.state.read();
        id.and_then(|id| state.individual.get(id).copied())
            .unwrap_or(state.default_level)
    }

    /// Captures the whole state so it can be put back with [`restore`](Self::restore).
    pub fn snapshot(&self) -> LevelSnapshot {
        let state = self.state.read();
        LevelSnapshot {
            default_level: state.default_level,
            individual_levels: state.individual.clone(),
        }
    }

    /// Replaces the whole state with a previous snapshot.
    pub fn restore(&self, snapshot: LevelSnapshot) {
        let mut state = self.state.write();
        state.default_level = snapshot.default_level;
        state.individual = snapshot.individual_levels;
    }
}
