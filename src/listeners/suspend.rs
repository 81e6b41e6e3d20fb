//! Scoped suspension: the overlay installed by
//! [`suspend_listeners`](super::ListenerRegistry::suspend_listeners) is lifted
//! when [`SuspendGuard`] drops, whether the callback returned or unwound.

use super::registry::{ListenerRegistry, NodeId};

pub(crate) struct SuspendGuard<'r, 'e, T, M, E>
where
    T: Clone + PartialEq,
    M: Clone + PartialEq,
    E: AsRef<str>,
{
    registry: &'r mut ListenerRegistry<T, M>,
    node: NodeId,
    events: &'e [E],
    target: Option<T>,
    method: M,
}

impl<'r, 'e, T, M, E> SuspendGuard<'r, 'e, T, M, E>
where
    T: Clone + PartialEq,
    M: Clone + PartialEq,
    E: AsRef<str>,
{
    /// Expects the overlay entries for `events` to be installed already.
    pub(crate) fn new(
        registry: &'r mut ListenerRegistry<T, M>,
        node: NodeId,
        events: &'e [E],
        target: Option<T>,
        method: M,
    ) -> Self {
        Self {
            registry,
            node,
            events,
            target,
            method,
        }
    }

    /// Registry and target, borrowed for the duration of the callback.
    pub(crate) fn parts(&mut self) -> (&mut ListenerRegistry<T, M>, Option<&T>) {
        (&mut *self.registry, self.target.as_ref())
    }
}

impl<T, M, E> Drop for SuspendGuard<'_, '_, T, M, E>
where
    T: Clone + PartialEq,
    M: Clone + PartialEq,
    E: AsRef<str>,
{
    fn drop(&mut self) {
        self.registry
            .lift_suspension(self.node, self.events, self.target.as_ref(), &self.method);
    }
}
