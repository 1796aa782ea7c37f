//! Synchronous change notifications for the patch graph.
//!
//! The bus is an explicit ordered list of subscriber closures, invoked
//! synchronously on the thread that performed the mutation, in
//! subscription order. There is no queue and no cross-thread delivery:
//! the bus is deliberately `!Send`, confining all notification traffic
//! to the interaction context.
//!
//! Subscribers must not assume they are alone — the view layer and any
//! bookkeeping observers may both be registered. Handlers receive the
//! event value only; anything else they need must already be in the
//! event or in their own captured state, which keeps a handler from
//! re-entering the graph mid-mutation.

use super::edge::Connection;

/// A change to the graph's edge set.
///
/// Emitted after the mutation is visible (edge list updated and
/// snapshot republished), never before.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphEvent {
    /// An edge was added.
    ConnectionAdded(Connection),
    /// An edge was removed.
    ConnectionRemoved(Connection),
    /// The whole edge set was replaced; subscribers should rebuild
    /// rather than reconcile incrementally.
    GraphReset,
}

/// Handle for removing a subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriberId(u64);

type Handler = Box<dyn FnMut(&GraphEvent)>;

/// Multi-subscriber broadcaster for [`GraphEvent`]s.
#[derive(Default)]
pub struct NotificationBus {
    subscribers: Vec<(SubscriberId, Handler)>,
    next_id: u64,
}

impl NotificationBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler; handlers run in subscription order.
    pub fn subscribe(&mut self, handler: Handler) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, handler));
        id
    }

    /// Removes a handler. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sub, _)| *sub != id);
    }

    /// Number of live subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether the bus has no subscribers.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Delivers `event` to every subscriber, in subscription order.
    pub(crate) fn emit(&mut self, event: &GraphEvent) {
        for (_, handler) in &mut self.subscribers {
            handler(event);
        }
    }
}
