//! # PropertyAliases: deprecated key forwarding
//!
//! ```text
//! aliases.get(obj, "old") ─► deprecate("Usage of `old` is deprecated, use `new` instead.")
//!                          └─► obj.get("new")
//! aliases.get(obj, "new") ─► obj.get("new")
//! ```
//!
//! The deprecation carries no test, so it always fires; whether it raises,
//! logs or stays silent is up to the active diagnostic sink.
//!
//! ## Example
//! ```rust
//! use std::collections::HashMap;
//! use protolisten::{PropertyAccess, PropertyAliases};
//!
//! #[derive(Default)]
//! struct Bag(HashMap<String, i64>);
//!
//! impl PropertyAccess for Bag {
//!     type Value = i64;
//!     fn get(&self, key: &str) -> Option<i64> { self.0.get(key).copied() }
//!     fn set(&mut self, key: &str, value: i64) { self.0.insert(key.to_string(), value); }
//! }
//!
//! let mut aliases = PropertyAliases::new();
//! aliases.deprecate_property("count", "length");
//!
//! let mut bag = Bag::default();
//! // The default sink is silent, so the alias simply forwards.
//! aliases.set(&mut bag, "count", 3).unwrap();
//! assert_eq!(aliases.get(&bag, "length").unwrap(), Some(3));
//! assert_eq!(aliases.get(&bag, "count").unwrap(), Some(3));
//! ```

use std::borrow::Cow;
use std::collections::HashMap;

use crate::diagnostics::{self, DiagnosticOptions, Test};
use crate::error::DiagnosticError;

/// Property get/set collaborator.
pub trait PropertyAccess {
    /// Property value type.
    type Value;

    /// Reads `key`; `None` when unset.
    fn get(&self, key: &str) -> Option<Self::Value>;

    /// Writes `key`.
    fn set(&mut self, key: &str, value: Self::Value);
}

/// Message reported when `deprecated_key` is used instead of `new_key`.
pub fn deprecation_message(deprecated_key: &str, new_key: &str) -> String {
    format!("Usage of `{deprecated_key}` is deprecated, use `{new_key}` instead.")
}

#[derive(Clone, Debug)]
struct Alias {
    new_key: Cow<'static, str>,
    message: String,
}

/// Table of deprecated keys and the keys they forward to.
#[derive(Clone, Debug, Default)]
pub struct PropertyAliases {
    aliases: HashMap<Cow<'static, str>, Alias>,
}

impl PropertyAliases {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `deprecated_key` an alias of `new_key`. Redefining replaces the old alias.
    pub fn deprecate_property(
        &mut self,
        deprecated_key: impl Into<Cow<'static, str>>,
        new_key: impl Into<Cow<'static, str>>,
    ) {
        let deprecated_key = deprecated_key.into();
        let new_key = new_key.into();
        let message = deprecation_message(&deprecated_key, &new_key);
        self.aliases.insert(deprecated_key, Alias { new_key, message });
    }

    /// The key `key` forwards to, if it is a deprecated alias.
    pub fn target_of(&self, key: &str) -> Option<&str> {
        self.aliases.get(key).map(|a| a.new_key.as_ref())
    }

    /// True if `key` is a deprecated alias.
    pub fn is_deprecated(&self, key: &str) -> bool {
        self.aliases.contains_key(key)
    }

    /// Reads `key` from `object`, reporting and forwarding aliased keys.
    pub fn get<O: PropertyAccess>(
        &self,
        object: &O,
        key: &str,
    ) -> Result<Option<O::Value>, DiagnosticError> {
        let key = self.resolve(key)?;
        Ok(object.get(key))
    }

    /// Writes `key` on `object`, reporting and forwarding aliased keys.
    ///
    /// Nothing is written when the deprecation raises.
    pub fn set<O: PropertyAccess>(
        &self,
        object: &mut O,
        key: &str,
        value: O::Value,
    ) -> Result<(), DiagnosticError> {
        let key = self.resolve(key)?;
        object.set(key, value);
        Ok(())
    }

    fn resolve<'k>(&'k self, key: &'k str) -> Result<&'k str, DiagnosticError> {
        match self.aliases.get(key) {
            Some(alias) => {
                diagnostics::deprecate(&alias.message, Test::FAIL, &DiagnosticOptions::default())?;
                Ok(alias.new_key.as_ref())
            }
            None => Ok(key),
        }
    }
}
