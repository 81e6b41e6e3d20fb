//! # ListenerRegistry: arena of inheritance-aware listener tables
//!
//! Every owning object gets a [`ListenerNode`] in the registry, addressed by a
//! generational [`NodeId`]. A node may point at one parent; many children may
//! share a parent. The link is a plain id, so a child never keeps its parent
//! alive and never writes into it.
//!
//! ## Chain walk
//! ```text
//! child ──parent──► mid ──parent──► root
//!   │                │ (finalized)
//!   └── reads stop after the first finalized node, which already holds
//!       a copy of everything above it
//! ```
//!
//! ## Rules
//! - Registration appends; no dedup, no chain walk.
//! - Lookups walk the chain and dedup by `(target, method)`, closest node first.
//! - Removing an inherited listener finalizes the removing node first, so the
//!   ancestor's table is never touched.
//! - Suspension is an overlay on query results; stored records never change.
//! - A destroyed (stale) parent simply ends the chain.
//!
//! ## Example
//! ```rust
//! use protolisten::{ListenerFlags, ListenerRegistry};
//!
//! let mut reg: ListenerRegistry<&str, &str> = ListenerRegistry::new();
//! let proto = reg.create_node("Button.prototype");
//! let button = reg.create_child(proto, "button#save").unwrap();
//!
//! reg.add_listener(proto, "click", Some("controller"), "save", ListenerFlags::NONE).unwrap();
//!
//! let matched = reg.matching_listeners(button, "click").unwrap();
//! assert_eq!(matched.len(), 1);
//! assert_eq!(matched[0].method, "save");
//!
//! // Detach `button` from the inherited listener; the prototype keeps it.
//! reg.remove_listener(button, "click", Some(&"controller"), Some(&"save")).unwrap();
//! assert!(reg.matching_listeners(button, "click").unwrap().is_empty());
//! assert_eq!(reg.matching_listeners(proto, "click").unwrap().len(), 1);
//! ```

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use super::flags::ListenerFlags;
use super::node::{Listener, ListenerNode, MatchedListener, Suspension};
use super::suspend::SuspendGuard;
use crate::diagnostics::{self, DiagnosticOptions};
use crate::error::ListenerError;

/// Warning id for a registration that duplicates an own `(event, target, method)`.
pub const DUPLICATE_LISTENER_ID: &str = "listeners.duplicate-listener";
/// Warning id for removing something that was never registered.
pub const FAILED_TO_REMOVE_LISTENER_ID: &str = "listeners.failed-to-remove-listener";

/// Handle to a node inside a [`ListenerRegistry`].
///
/// Ids of destroyed nodes are never reissued: the slot's generation moves on,
/// and a slot whose generation is exhausted is retired instead of reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot<T, M> {
    generation: u32,
    node: Option<ListenerNode<T, M>>,
}

/// Arena owning every [`ListenerNode`].
///
/// `T` is the target type and `M` the method type; both are compared with
/// `PartialEq` and cloned when inherited records are copied.
#[derive(Debug)]
pub struct ListenerRegistry<T, M> {
    slots: Vec<Slot<T, M>>,
    free: Vec<usize>,
    live: usize,
}

impl<T, M> Default for ListenerRegistry<T, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, M> ListenerRegistry<T, M> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    /// True if no node is live.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// True if `node` is live in this registry.
    pub fn contains(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    /// Creates a root node (no parent).
    pub fn create_node(&mut self, source: impl Into<Cow<'static, str>>) -> NodeId {
        self.insert(ListenerNode::new(source.into(), None))
    }

    /// Creates a node inheriting from `parent`.
    pub fn create_child(
        &mut self,
        parent: NodeId,
        source: impl Into<Cow<'static, str>>,
    ) -> Result<NodeId, ListenerError> {
        self.node(parent)?;
        Ok(self.insert(ListenerNode::new(source.into(), Some(parent))))
    }

    /// Destroys `node` together with its listener state.
    ///
    /// Children keep their (now stale) parent id; their chain ends there.
    pub fn destroy(&mut self, node: NodeId) -> Result<(), ListenerError> {
        let slot = self
            .slots
            .get_mut(node.index)
            .filter(|s| s.generation == node.generation && s.node.is_some())
            .ok_or(ListenerError::NodeNotFound { node })?;

        let removed = slot.node.take();
        self.live -= 1;
        match slot.generation.checked_add(1) {
            Some(next) => {
                slot.generation = next;
                self.free.push(node.index);
            }
            None => tracing::trace!(%node, "listener slot retired"),
        }

        if let Some(removed) = removed {
            tracing::trace!(%node, source = %removed.source, "listener node destroyed");
        }
        Ok(())
    }

    /// Read access to a node.
    pub fn node(&self, node: NodeId) -> Result<&ListenerNode<T, M>, ListenerError> {
        self.get(node).ok_or(ListenerError::NodeNotFound { node })
    }

    /// Records physically stored on `node` (own, or own + inherited once finalized).
    pub fn listeners(&self, node: NodeId) -> Result<&[Listener<T, M>], ListenerError> {
        Ok(self.node(node)?.listeners())
    }

    /// True once `node` has been finalized.
    pub fn is_finalized(&self, node: NodeId) -> Result<bool, ListenerError> {
        Ok(self.node(node)?.is_finalized())
    }

    /// Clears own listeners, the finalized flag and any suspension overlay.
    pub fn reset_listeners(&mut self, node: NodeId) -> Result<(), ListenerError> {
        self.node_mut(node)?.reset();
        Ok(())
    }

    /// Distinct event names with at least one listener visible from `node`,
    /// in first-seen order.
    pub fn watched_events(&self, node: NodeId) -> Result<Vec<&str>, ListenerError> {
        self.node(node)?;
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for (_, n) in self.chain(node) {
            for listener in &n.listeners {
                let name: &str = &listener.event;
                if seen.insert(name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    /// True if anything visible from `node` listens to `event`.
    pub fn has_listeners(&self, node: NodeId, event: &str) -> Result<bool, ListenerError> {
        self.node(node)?;
        Ok(self
            .chain(node)
            .any(|(_, n)| n.listeners.iter().any(|l| l.event == event)))
    }

    fn insert(&mut self, node: ListenerNode<T, M>) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    fn get(&self, node: NodeId) -> Option<&ListenerNode<T, M>> {
        self.slots
            .get(node.index)
            .filter(|s| s.generation == node.generation)
            .and_then(|s| s.node.as_ref())
    }

    pub(crate) fn node_mut(&mut self, node: NodeId) -> Result<&mut ListenerNode<T, M>, ListenerError> {
        self.slots
            .get_mut(node.index)
            .filter(|s| s.generation == node.generation)
            .and_then(|s| s.node.as_mut())
            .ok_or(ListenerError::NodeNotFound { node })
    }

    /// `node`, then its ancestors, stopping after the first finalized one.
    fn chain(&self, node: NodeId) -> Chain<'_, T, M> {
        Chain {
            registry: self,
            next: Some(node),
        }
    }
}

impl<T, M> ListenerRegistry<T, M>
where
    T: Clone + PartialEq,
    M: Clone + PartialEq,
{
    /// Appends a listener to `node`'s own table.
    ///
    /// No deduplication happens here. When the active sink runs debug blocks,
    /// the node's own table is scanned and a duplicate produces a warning; the
    /// listener is appended either way.
    pub fn add_listener(
        &mut self,
        node: NodeId,
        event: impl Into<Cow<'static, str>>,
        target: Option<T>,
        method: M,
        flags: ListenerFlags,
    ) -> Result<(), ListenerError> {
        let event = event.into();
        let own = self.node(node)?;

        diagnostics::run_in_debug(|| {
            let duplicate = own
                .listeners
                .iter()
                .rev()
                .any(|l| l.is(&event, target.as_ref(), &method));
            diagnostics::warn(
                &format!(
                    "Tried to add a duplicate listener for '{event}' on {}",
                    own.source
                ),
                !duplicate,
                &DiagnosticOptions::with_id(DUPLICATE_LISTENER_ID),
            );
        });

        self.node_mut(node)?.listeners.push(Listener {
            event,
            target,
            method,
            flags,
        });
        Ok(())
    }

    /// Removes listeners for `event` as seen from `node`.
    ///
    /// With `method == None` every listener for `event` goes, whatever its target.
    /// Returns whether anything matched; a miss is reported as a warning.
    pub fn remove_listener(
        &mut self,
        node: NodeId,
        event: &str,
        target: Option<&T>,
        method: Option<&M>,
    ) -> Result<bool, ListenerError> {
        self.remove_listener_with(node, event, target, method, |_, _, _| {})
    }

    /// Like [`remove_listener`](Self::remove_listener), calling `on_remove` with
    /// `(event, target, method)` for each record deleted.
    ///
    /// If a match lives only on an ancestor, `node` is finalized first and the
    /// removal runs against its own copy. `on_remove` only sees records that
    /// `node` registered itself.
    pub fn remove_listener_with<F>(
        &mut self,
        node: NodeId,
        event: &str,
        target: Option<&T>,
        method: Option<&M>,
        mut on_remove: F,
    ) -> Result<bool, ListenerError>
    where
        F: FnMut(&str, Option<&T>, &M),
    {
        let mut found = self.remove_own(node, event, target, method, &mut on_remove)?;

        let inherited = self
            .chain(node)
            .skip(1)
            .any(|(_, n)| n.listeners.iter().any(|l| l.matches_removal(event, target, method)));

        if inherited {
            // Copied records were never registered here; `on_remove` is not told about them.
            self.finalize_listeners(node)?;
            let mut silent = |_: &str, _: Option<&T>, _: &M| {};
            found |= self.remove_own(node, event, target, method, &mut silent)?;
        }

        if !found {
            let own = self.node(node)?;
            diagnostics::warn(
                &format!(
                    "Tried to remove a listener that was never registered for '{event}' on {}",
                    own.source
                ),
                false,
                &DiagnosticOptions::with_id(FAILED_TO_REMOVE_LISTENER_ID),
            );
        }
        Ok(found)
    }

    fn remove_own<F>(
        &mut self,
        node: NodeId,
        event: &str,
        target: Option<&T>,
        method: Option<&M>,
        on_remove: &mut F,
    ) -> Result<bool, ListenerError>
    where
        F: FnMut(&str, Option<&T>, &M),
    {
        let own = self.node_mut(node)?;
        let mut found = false;
        let mut index = own.listeners.len();
        while index > 0 {
            index -= 1;
            if own.listeners[index].matches_removal(event, target, method) {
                let removed = own.listeners.remove(index);
                on_remove(removed.event.as_ref(), removed.target.as_ref(), &removed.method);
                found = true;
            }
        }
        Ok(found)
    }

    /// Copies inherited records into `node` and marks it finalized.
    ///
    /// Idempotent. Own records stay first; ancestors follow nearest first. The
    /// copy stops after the first finalized ancestor, which already holds
    /// everything above it.
    pub fn finalize_listeners(&mut self, node: NodeId) -> Result<(), ListenerError> {
        if self.node(node)?.finalized {
            return Ok(());
        }

        let inherited: Vec<Listener<T, M>> = self
            .chain(node)
            .skip(1)
            .flat_map(|(_, n)| n.listeners.iter().cloned())
            .collect();

        let own = self.node_mut(node)?;
        let copied = inherited.len();
        own.listeners.extend(inherited);
        own.finalized = true;

        tracing::trace!(%node, source = %own.source, copied, "listener node finalized");
        Ok(())
    }

    /// Listeners for `event` visible from `node`, deduplicated by `(target, method)`.
    ///
    /// The first occurrence wins (own before inherited, nearest ancestor first).
    /// Entries covered by an active suspension on `node` carry
    /// [`ListenerFlags::SUSPENDED`].
    pub fn matching_listeners(
        &self,
        node: NodeId,
        event: &str,
    ) -> Result<Vec<MatchedListener<T, M>>, ListenerError> {
        let own = self.node(node)?;
        let mut result: Vec<MatchedListener<T, M>> = Vec::new();

        for (_, n) in self.chain(node) {
            for listener in n.listeners.iter().filter(|l| l.event == event) {
                let seen = result
                    .iter()
                    .any(|r| r.target == listener.target && r.method == listener.method);
                if !seen {
                    result.push(MatchedListener {
                        target: listener.target.clone(),
                        method: listener.method.clone(),
                        flags: listener.flags,
                    });
                }
            }
        }

        if let Some(suspended) = &own.suspended {
            for s in suspended.iter().filter(|s| s.event == event) {
                for entry in result
                    .iter_mut()
                    .filter(|r| r.target == s.target && r.method == s.method)
                {
                    entry.flags.insert(ListenerFlags::SUSPENDED);
                }
            }
        }

        Ok(result)
    }

    /// Suspends `(target, method)` for each of `events` while `callback` runs.
    ///
    /// The overlay is lifted on every exit path, including a panic in
    /// `callback`. The callback receives the registry and the target.
    pub fn suspend_listeners<E, F, R>(
        &mut self,
        node: NodeId,
        events: &[E],
        target: Option<T>,
        method: M,
        callback: F,
    ) -> Result<R, ListenerError>
    where
        E: AsRef<str>,
        F: FnOnce(&mut Self, Option<&T>) -> R,
    {
        let own = self.node_mut(node)?;
        own.suspended
            .get_or_insert_with(Vec::new)
            .extend(events.iter().map(|e| Suspension {
                event: e.as_ref().to_string(),
                target: target.clone(),
                method: method.clone(),
            }));

        let mut guard = SuspendGuard::new(self, node, events, target, method);
        let (registry, target) = guard.parts();
        Ok(callback(registry, target))
    }

    /// Single-event form of [`suspend_listeners`](Self::suspend_listeners).
    pub fn suspend_listener<F, R>(
        &mut self,
        node: NodeId,
        event: &str,
        target: Option<T>,
        method: M,
        callback: F,
    ) -> Result<R, ListenerError>
    where
        F: FnOnce(&mut Self, Option<&T>) -> R,
    {
        self.suspend_listeners(node, &[event], target, method, callback)
    }

    /// Drops one overlay entry per name in `events`, newest first.
    pub(crate) fn lift_suspension<E: AsRef<str>>(
        &mut self,
        node: NodeId,
        events: &[E],
        target: Option<&T>,
        method: &M,
    ) {
        let Ok(own) = self.node_mut(node) else {
            tracing::trace!(%node, "suspended node destroyed before release");
            return;
        };
        let Some(suspended) = own.suspended.as_mut() else {
            return;
        };

        for name in events.iter().rev() {
            let name = name.as_ref();
            if let Some(pos) = suspended
                .iter()
                .rposition(|s| s.event == name && s.target.as_ref() == target && s.method == *method)
            {
                suspended.remove(pos);
            }
        }

        if suspended.is_empty() {
            own.suspended = None;
        }
    }
}

struct Chain<'r, T, M> {
    registry: &'r ListenerRegistry<T, M>,
    next: Option<NodeId>,
}

impl<'r, T, M> Iterator for Chain<'r, T, M> {
    type Item = (NodeId, &'r ListenerNode<T, M>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        let node = self.registry.get(id)?;
        self.next = if node.finalized { None } else { node.parent };
        Some((id, node))
    }
}
