//! Application-level event bus
//!
//! A plain keyed pub/sub object owned by the runtime. Closures have no
//! identity, so each subscriber registers under a `&'static str` key
//! and the (event, key) pair is what duplicate and unsubscribe checks
//! operate on.

use std::collections::HashMap;

/// Coarse application lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEvent {
    /// All subsystems finished startup
    ApplicationStart,
    /// A play session began
    GameStart,
    /// The play session ended
    GameOver,
    /// Shutdown is about to tear subsystems down
    ApplicationQuit,
}

/// Subscriber callback
pub type EventCallback = Box<dyn Fn() + Send>;

struct Subscriber {
    key: &'static str,
    callback: EventCallback,
}

/// Keyed publish/subscribe dispatcher
///
/// Subscribers for an event fire in subscription order. Constructed at
/// startup and cleared at shutdown; nothing here is global.
#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<GameEvent, Vec<Subscriber>>,
}

impl EventBus {
    /// Create an empty bus
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for an event under a key
    ///
    /// A key already registered for that event is rejected with a
    /// warning and `false`; the original subscriber stays in place.
    pub fn subscribe(&mut self, event: GameEvent, key: &'static str, callback: EventCallback) -> bool {
        let subscribers = self.subscribers.entry(event).or_default();
        if subscribers.iter().any(|subscriber| subscriber.key == key) {
            log::warn!("[EventBus] {key} is already subscribed to {event:?}");
            return false;
        }
        subscribers.push(Subscriber { key, callback });
        true
    }

    /// Remove the subscriber registered under a key
    ///
    /// An event with no subscribers, or a key never registered for it,
    /// warns and does nothing. Removing the last subscriber drops the
    /// event entry entirely.
    pub fn unsubscribe(&mut self, event: GameEvent, key: &'static str) {
        let Some(subscribers) = self.subscribers.get_mut(&event) else {
            log::warn!("[EventBus] unsubscribe from {event:?} but it has no subscribers");
            return;
        };
        let Some(index) = subscribers.iter().position(|subscriber| subscriber.key == key) else {
            log::warn!("[EventBus] {key} is not subscribed to {event:?}");
            return;
        };
        subscribers.remove(index);
        if subscribers.is_empty() {
            self.subscribers.remove(&event);
        }
    }

    /// Invoke every subscriber of an event in subscription order
    ///
    /// An event nobody listens to is a silent no-op.
    pub fn dispatch(&self, event: GameEvent) {
        let Some(subscribers) = self.subscribers.get(&event) else {
            return;
        };
        log::debug!("[EventBus] dispatching {event:?} to {} subscribers", subscribers.len());
        for subscriber in subscribers {
            (subscriber.callback)();
        }
    }

    /// Drop every subscriber of one event
    pub fn clear_event(&mut self, event: GameEvent) {
        self.subscribers.remove(&event);
    }

    /// Drop all subscribers
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    /// Number of subscribers registered for an event
    #[must_use]
    pub fn subscriber_count(&self, event: GameEvent) -> usize {
        self.subscribers.get(&event).map_or(0, Vec::len)
    }
}
