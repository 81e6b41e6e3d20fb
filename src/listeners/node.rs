//! Per-node listener state and the records it stores.

use std::borrow::Cow;

use super::flags::ListenerFlags;
use super::registry::NodeId;

/// One registration: "when `event` fires, call `method` on `target`".
///
/// `target == None` means "invoke on the listening object itself".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listener<T, M> {
    /// Event name.
    pub event: Cow<'static, str>,
    /// Receiver, or `None` for the owning object.
    pub target: Option<T>,
    /// Method to invoke.
    pub method: M,
    /// Registration flags.
    pub flags: ListenerFlags,
}

impl<T: PartialEq, M: PartialEq> Listener<T, M> {
    /// Exact `(event, target, method)` match.
    pub(crate) fn is(&self, event: &str, target: Option<&T>, method: &M) -> bool {
        self.event == event && self.target.as_ref() == target && self.method == *method
    }

    /// Removal match: `method == None` matches every listener for `event`.
    pub(crate) fn matches_removal(&self, event: &str, target: Option<&T>, method: Option<&M>) -> bool {
        self.event == event
            && method.is_none_or(|m| self.target.as_ref() == target && self.method == *m)
    }
}

/// One entry of a [`matching_listeners`](super::ListenerRegistry::matching_listeners) result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchedListener<T, M> {
    /// Receiver, or `None` for the owning object.
    pub target: Option<T>,
    /// Method to invoke.
    pub method: M,
    /// Stored flags, plus [`ListenerFlags::SUSPENDED`] when suspended.
    pub flags: ListenerFlags,
}

/// An active suspension overlay entry.
#[derive(Clone, Debug)]
pub(crate) struct Suspension<T, M> {
    pub(crate) event: String,
    pub(crate) target: Option<T>,
    pub(crate) method: M,
}

/// Listener state attached to one owning object.
///
/// ### States
/// - **unfinalized**: `listeners` holds only own registrations; reads walk the parent chain.
/// - **finalized**: `listeners` also holds a copy of everything inherited; reads stop here.
#[derive(Debug)]
pub struct ListenerNode<T, M> {
    pub(crate) source: Cow<'static, str>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) listeners: Vec<Listener<T, M>>,
    pub(crate) finalized: bool,
    pub(crate) suspended: Option<Vec<Suspension<T, M>>>,
}

impl<T, M> ListenerNode<T, M> {
    pub(crate) fn new(source: Cow<'static, str>, parent: Option<NodeId>) -> Self {
        Self {
            source,
            parent,
            listeners: Vec::new(),
            finalized: false,
            suspended: None,
        }
    }

    /// Label of the owning object, used in warnings.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Non-owning link to the parent node.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Records physically stored on this node.
    pub fn listeners(&self) -> &[Listener<T, M>] {
        &self.listeners
    }

    /// True once inherited records have been copied in.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// True while at least one suspension overlay is active.
    pub fn has_suspensions(&self) -> bool {
        self.suspended.is_some()
    }

    pub(crate) fn reset(&mut self) {
        self.listeners.clear();
        self.finalized = false;
        self.suspended = None;
    }
}
