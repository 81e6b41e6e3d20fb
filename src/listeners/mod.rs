//! Inheritance-aware listener tables.
//!
//! Registration is a single append; all the work (chain walk, dedup,
//! suspension overlay) is deferred to lookup time, when an event actually fires.
//!
//! ## Contents
//! - [`ListenerRegistry`] arena of nodes plus every listener operation
//! - [`ListenerNode`]     per-object state (own records, finalized flag, overlay)
//! - [`Listener`], [`MatchedListener`] stored records and lookup results
//! - [`ListenerFlags`]    `ONCE` / `SUSPENDED` bitset
//! - [`NodeId`]           generational, non-owning node handle
//!
//! ## Quick reference
//! ```text
//! add_listener        ─► append to own table (debug-only duplicate warning)
//! remove_listener     ─► delete own matches; inherited match ─► finalize, retry locally
//! finalize_listeners  ─► copy ancestors in (stop after first finalized), idempotent
//! matching_listeners  ─► walk chain, dedup by (target, method), flag SUSPENDED
//! suspend_listeners   ─► overlay for the duration of a callback (released on unwind)
//! watched_events      ─► distinct event names visible from a node
//! ```

mod flags;
mod node;
mod registry;
mod suspend;

pub use flags::ListenerFlags;
pub use node::{Listener, ListenerNode, MatchedListener};
pub use registry::{DUPLICATE_LISTENER_ID, FAILED_TO_REMOVE_LISTENER_ID, ListenerRegistry, NodeId};
