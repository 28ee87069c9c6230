//! The inbound side of the platform.
//!
//! Sessions subscribe [`Listener`]s to an [`EventFeed`] for the lifetime of a
//! run and unsubscribe them during teardown. [`EventHub`] is the in-process
//! feed: adapters push [`GatewayEvent`]s into it and it fans them out.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::trace;

use crate::foundation::{EventKind, GatewayEvent, IncomingMessage, MessageDeleted, ReactionEvent};

/// Receives raw platform events.
///
/// Callbacks are invoked synchronously from the dispatching task and must not
/// block. Every callback defaults to a no-op so implementors only override
/// the events they subscribe to.
pub trait Listener: Send + Sync {
    fn on_message(&self, _event: &IncomingMessage) {}

    fn on_reaction_add(&self, _event: &ReactionEvent) {}

    fn on_reaction_remove(&self, _event: &ReactionEvent) {}

    fn on_message_delete(&self, _event: &MessageDeleted) {}
}

/// Handle returned by [`EventFeed::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Returns the raw id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// A source of platform events that listeners can attach to.
pub trait EventFeed: Send + Sync {
    /// Registers `listener` for events of `kind`.
    fn subscribe(&self, kind: EventKind, listener: Arc<dyn Listener>) -> ListenerId;

    /// Removes a registration. Returns `false` if `id` was not registered.
    fn unsubscribe(&self, id: ListenerId) -> bool;
}

/// A shared, type-erased event feed.
pub type BoxedFeed = Arc<dyn EventFeed>;

struct Subscription {
    id: ListenerId,
    kind: EventKind,
    listener: Arc<dyn Listener>,
}

/// In-process [`EventFeed`] with explicit dispatch.
///
/// # Example
///
/// ```rust,ignore
/// use chime_core::{EventHub, EventKind, GatewayEvent, IncomingMessage};
///
/// let hub = EventHub::new();
/// let id = hub.subscribe(EventKind::MessageCreate, listener);
/// hub.dispatch(&GatewayEvent::from(IncomingMessage::new(1, 2, 3, "hi")));
/// hub.unsubscribe(id);
/// ```
#[derive(Default)]
pub struct EventHub {
    subscriptions: RwLock<Vec<Subscription>>,
    next_id: AtomicU64,
}

impl EventHub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every listener subscribed to its kind.
    ///
    /// Listeners run in subscription order. The listener list is snapshotted
    /// first, so a callback may subscribe or unsubscribe without deadlocking.
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, event: &GatewayEvent) -> usize {
        let kind = event.kind();
        let targets: Vec<Arc<dyn Listener>> = self
            .subscriptions
            .read()
            .iter()
            .filter(|sub| sub.kind == kind)
            .map(|sub| Arc::clone(&sub.listener))
            .collect();

        trace!(event = %kind, listeners = targets.len(), "Dispatching event");

        for listener in &targets {
            match event {
                GatewayEvent::MessageCreate(e) => listener.on_message(e),
                GatewayEvent::ReactionAdd(e) => listener.on_reaction_add(e),
                GatewayEvent::ReactionRemove(e) => listener.on_reaction_remove(e),
                GatewayEvent::MessageDelete(e) => listener.on_message_delete(e),
            }
        }
        targets.len()
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Returns `true` if nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.read().is_empty()
    }
}

impl EventFeed for EventHub {
    fn subscribe(&self, kind: EventKind, listener: Arc<dyn Listener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions.write().push(Subscription { id, kind, listener });
        trace!(%id, event = %kind, "Listener subscribed");
        id
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut subscriptions = self.subscriptions.write();
        let before = subscriptions.len();
        subscriptions.retain(|sub| sub.id != id);
        let removed = subscriptions.len() != before;
        if removed {
            trace!(%id, "Listener unsubscribed");
        }
        removed
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("subscriptions", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl Listener for Recorder {
        fn on_message(&self, event: &IncomingMessage) {
            self.seen.lock().push(event.content.clone());
        }

        fn on_message_delete(&self, event: &MessageDeleted) {
            self.seen.lock().push(format!("deleted {}", event.message_id));
        }
    }

    #[test]
    fn test_dispatch_by_kind() {
        let hub = EventHub::new();
        let recorder = Arc::new(Recorder::default());
        hub.subscribe(EventKind::MessageCreate, recorder.clone());

        let delivered = hub.dispatch(&IncomingMessage::new(1, 2, 3, "hello").into());
        assert_eq!(delivered, 1);

        let delivered = hub.dispatch(&MessageDeleted::new(1, 2).into());
        assert_eq!(delivered, 0);

        assert_eq!(*recorder.seen.lock(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_unsubscribe() {
        let hub = EventHub::new();
        let recorder = Arc::new(Recorder::default());
        let id = hub.subscribe(EventKind::MessageDelete, recorder.clone());
        assert_eq!(hub.len(), 1);

        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));
        assert!(hub.is_empty());

        assert_eq!(hub.dispatch(&MessageDeleted::new(1, 2).into()), 0);
        assert!(recorder.seen.lock().is_empty());
    }

    struct SelfRemoving {
        hub: Arc<EventHub>,
        id: Mutex<Option<ListenerId>>,
    }

    impl Listener for SelfRemoving {
        fn on_message(&self, _event: &IncomingMessage) {
            if let Some(id) = self.id.lock().take() {
                self.hub.unsubscribe(id);
            }
        }
    }

    #[test]
    fn test_listener_may_unsubscribe_during_dispatch() {
        let hub = Arc::new(EventHub::new());
        let listener = Arc::new(SelfRemoving {
            hub: hub.clone(),
            id: Mutex::new(None),
        });
        let id = hub.subscribe(EventKind::MessageCreate, listener.clone());
        *listener.id.lock() = Some(id);

        assert_eq!(hub.dispatch(&IncomingMessage::new(1, 2, 3, "x").into()), 1);
        assert!(hub.is_empty());
    }
}
