//! # protolisten
//!
//! **protolisten** is an event-listener registry with prototypal inheritance.
//!
//! Each object owns a listener table recording "when event E fires, call
//! method M on target T". Tables form parent/child chains: listeners registered
//! on a parent are visible to its children until a child overrides or removes
//! them. Registration is a single append; the cost of dedup and inheritance is
//! paid only when someone asks which listeners match an event.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ ListenerNode │◄──│ ListenerNode │◄──│ ListenerNode │
//!     │   (root)     │   │  (child #1)  │   │  (child #2)  │
//!     └──────────────┘   └──────────────┘   └──────────────┘
//!            ▲   parent links are NodeIds (non-owning)
//!            │
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  ListenerRegistry (arena)                                         │
//! │  - add_listener        append, no dedup                           │
//! │  - remove_listener     own delete / copy-on-write detach          │
//! │  - finalize_listeners  flatten inherited records (idempotent)     │
//! │  - matching_listeners  chain walk + dedup + suspension overlay    │
//! │  - suspend_listeners   scoped overlay, released on unwind         │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ warn / run_in_debug
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  diagnostics facade ──► active Arc<dyn Diagnostics>               │
//! │        ├─ Noop (default, silent)                                  │
//! │        └─ DebugDiagnostics ──► DeprecationManager + Environment   │
//! └───────────────────────────────────────────────────────────────────┘
//!        ▲
//!        │ deprecate
//!  PropertyAliases (deprecated key → new key)
//! ```
//!
//! ### Deprecation flow
//! ```text
//! deprecate(message, test, opts)
//!   ├─► RAISE_ON_DEPRECATION set ─► default level := RAISE
//!   ├─► level(opts.id) == SILENCE ─► Ok(())
//!   ├─► test holds ─► Ok(())
//!   ├─► level(opts.id) == RAISE ─► Err(DiagnosticError::Deprecation)
//!   └─► LOG ─► tracing::warn!("DEPRECATION: ...") ─► Ok(())
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                               |
//! |-------------------|--------------------------------------------------------------|--------------------------------------------------|
//! | **Listeners**     | Inheritance-aware tables, copy-on-write detach, suspension.  | [`ListenerRegistry`], [`ListenerFlags`]          |
//! | **Diagnostics**   | Swappable assert/warn/deprecate sink, silent by default.     | [`Diagnostics`], [`DebugDiagnostics`]            |
//! | **Policies**      | Per-id deprecation levels and the raise-on-deprecation flag. | [`DeprecationManager`], [`DeprecationLevel`]     |
//! | **Properties**    | Deprecated property names forwarding to their replacement.   | [`PropertyAliases`], [`PropertyAccess`]          |
//! | **Errors**        | Typed errors for failed checks and stale node handles.       | [`DiagnosticError`], [`ListenerError`]           |
//! | **Configuration** | Build the debug sink from code or the environment.           | [`Config`]                                       |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use protolisten::{
//!     Config, DebugDiagnostics, DeprecationLevel, DiagnosticOptions, ListenerFlags,
//!     ListenerRegistry, diagnostics,
//! };
//!
//! let sink = DebugDiagnostics::from_config(&Config::default().with_level("legacy", DeprecationLevel::Log));
//! diagnostics::override_implementation(Arc::new(sink));
//!
//! let mut reg: ListenerRegistry<&str, &str> = ListenerRegistry::new();
//! let base = reg.create_node("Base");
//! let obj = reg.create_child(base, "obj").unwrap();
//! reg.add_listener(base, "change", None, "refresh", ListenerFlags::NONE).unwrap();
//!
//! let seen = reg
//!     .suspend_listener(obj, "change", None, "refresh", |reg, _| {
//!         reg.matching_listeners(obj, "change").unwrap()[0]
//!             .flags
//!             .contains(ListenerFlags::SUSPENDED)
//!     })
//!     .unwrap();
//! assert!(seen);
//!
//! // Logged, not raised: the "legacy" id is pinned to LOG.
//! diagnostics::deprecate("old path", false, &DiagnosticOptions::with_id("legacy")).unwrap();
//! assert!(diagnostics::deprecate("old path", false, &DiagnosticOptions::default()).is_err());
//!
//! diagnostics::reset_implementation();
//! ```

mod config;
mod error;
mod listeners;
mod policies;
mod properties;

pub mod diagnostics;

// ---- Public re-exports ----

pub use config::{Config, DEPRECATION_LEVEL_VAR};
pub use diagnostics::{DebugDiagnostics, DiagnosticOptions, Diagnostics, Noop, Test, Thunk};
pub use error::{DiagnosticError, ListenerError};
pub use listeners::{
    DUPLICATE_LISTENER_ID, FAILED_TO_REMOVE_LISTENER_ID, Listener, ListenerFlags, ListenerNode,
    ListenerRegistry, MatchedListener, NodeId,
};
pub use policies::{
    DeprecationLevel, DeprecationManager, Environment, LevelSnapshot, ParseLevelError,
    RAISE_ON_DEPRECATION_VAR,
};
pub use properties::{PropertyAccess, PropertyAliases, deprecation_message};
