//! Thread-safe event aggregator.
//!
//! [`SharedAggregator`] has the same contract as [`EventAggregator`](crate::EventAggregator)
//! but can be shared between threads, typically behind an `Arc`.
//!
//! # Locking
//!
//! Handlers are stored in a `DashMap`, so operations on different event types rarely
//! contend. Publishing copies the handler list out under the shard's read lock and
//! invokes handlers with no lock held: handlers may subscribe, unsubscribe or publish
//! on the same aggregator without deadlocking.
//!
//! Handlers run on the publishing thread. Concurrent publishes of the same event type
//! may run the same handler concurrently, which is why [`SharedHandler`] requires
//! `Send + Sync` callbacks.

use std::{any::Any, fmt};

use dashmap::DashMap;

use crate::{
    Event, EventKey,
    handler::{SharedAnyHandler, SharedHandler},
    subscribers::Subscribers,
};

/// Thread-safe registry of handlers keyed by event type.
///
/// # Example
///
/// ```rust
/// use std::{
///     sync::{
///         Arc,
///         atomic::{AtomicU32, Ordering},
///     },
///     thread,
/// };
///
/// use event_aggregator::{Event, SharedAggregator, SharedHandler};
///
/// #[derive(Event)]
/// struct Tick;
///
/// let aggregator: Arc<SharedAggregator<str>> = Arc::new(SharedAggregator::new());
/// let ticks = Arc::new(AtomicU32::new(0));
///
/// let counter = Arc::clone(&ticks);
/// aggregator.subscribe(&SharedHandler::new(move |_: &str, _: &Tick| {
///     counter.fetch_add(1, Ordering::Relaxed);
/// }));
///
/// let workers: Vec<_> = (0..4)
///     .map(|_| {
///         let aggregator = Arc::clone(&aggregator);
///         thread::spawn(move || aggregator.publish("worker", &Tick))
///     })
///     .collect();
/// for worker in workers {
///     worker.join().unwrap();
/// }
///
/// assert_eq!(ticks.load(Ordering::Relaxed), 4);
/// ```
pub struct SharedAggregator<S: ?Sized + 'static = dyn Any> {
    /// Handlers per event type. A key is present only while it has handlers.
    handlers: DashMap<EventKey, Subscribers<SharedAnyHandler<S>>>,
}

impl<S: ?Sized + 'static> SharedAggregator<S> {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    /// Creates an empty aggregator with room for `capacity` event types.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            handlers: DashMap::with_capacity(capacity),
        }
    }

    /// Subscribes `handler` to its event type `E`.
    ///
    /// Returns `false` if the handler was already subscribed.
    pub fn subscribe<E: Event>(&self, handler: &SharedHandler<S, E>) -> bool {
        self.subscribe_to(EventKey::of::<E>(), &handler.erase())
    }

    /// Subscribes `handler` to the event type identified by `key`.
    ///
    /// A handler built for another event type is registered but never invoked.
    pub fn subscribe_to(&self, key: EventKey, handler: &SharedAnyHandler<S>) -> bool {
        if handler.key() != key {
            log::warn!(
                "Handler for {} subscribed to {key}; it will not receive these events.",
                handler.key()
            );
        }

        let added = self.handlers.entry(key).or_default().insert(handler);

        if added {
            log::debug!("Subscribed handler to {key}.");
        } else {
            log::debug!("Handler already subscribed to {key}, ignoring.");
        }
        added
    }

    /// Unsubscribes `handler` from its event type `E`.
    ///
    /// Returns `false` if the handler was not subscribed.
    pub fn unsubscribe<E: Event>(&self, handler: &SharedHandler<S, E>) -> bool {
        self.unsubscribe_from(EventKey::of::<E>(), &handler.erase())
    }

    /// Unsubscribes `handler` from the event type identified by `key`.
    pub fn unsubscribe_from(&self, key: EventKey, handler: &SharedAnyHandler<S>) -> bool {
        let removed = match self.handlers.get_mut(&key) {
            Some(mut subscribers) => subscribers.remove(handler),
            None => return false,
        };

        // Re-checked under the write lock: another thread may have subscribed since.
        self.handlers
            .remove_if(&key, |_, subscribers| subscribers.is_empty());

        if removed {
            log::debug!("Unsubscribed handler from {key}.");
        }
        removed
    }

    /// Publishes `event` to every handler subscribed to `E`, in registration order.
    ///
    /// Does nothing if `E` has no subscribers. Panics raised by handlers propagate
    /// to the caller.
    pub fn publish<E: Event>(&self, sender: &S, event: &E) {
        let key = EventKey::of::<E>();

        // The shard guard is dropped at the end of this statement.
        let snapshot = match self.handlers.get(&key) {
            Some(subscribers) => subscribers.snapshot(),
            None => {
                log::trace!("No subscribers for {key}.");
                return;
            }
        };

        log::trace!("Publishing {key} to {} handler(s).", snapshot.len());
        for handler in &snapshot {
            if !handler.call(sender, event) {
                log::trace!("Skipped handler for {} on {key}.", handler.key());
            }
        }
    }

    /// Returns `true` if `handler` is subscribed to `E`.
    pub fn is_subscribed<E: Event>(&self, handler: &SharedHandler<S, E>) -> bool {
        self.is_subscribed_to(EventKey::of::<E>(), &handler.erase())
    }

    /// Returns `true` if `handler` is subscribed to the event type identified by `key`.
    pub fn is_subscribed_to(&self, key: EventKey, handler: &SharedAnyHandler<S>) -> bool {
        self.handlers
            .get(&key)
            .is_some_and(|subscribers| subscribers.contains(handler))
    }

    /// Number of handlers subscribed to `E`.
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.subscriber_count_for(EventKey::of::<E>())
    }

    /// Number of handlers subscribed to the event type identified by `key`.
    pub fn subscriber_count_for(&self, key: EventKey) -> usize {
        self.handlers
            .get(&key)
            .map_or(0, |subscribers| subscribers.len())
    }

    /// Number of event types with at least one subscriber.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handler is subscribed to anything.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Removes every subscription.
    pub fn clear(&self) {
        let keys: Vec<EventKey> = self.handlers.iter().map(|entry| *entry.key()).collect();
        for key in keys {
            // `remove` releases the shard lock before the handlers are dropped here.
            drop(self.handlers.remove(&key));
        }
        log::debug!("Cleared all subscriptions.");
    }
}

impl<S: ?Sized + 'static> Default for SharedAggregator<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized + 'static> fmt::Debug for SharedAggregator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for entry in self.handlers.iter() {
            map.entry(entry.key(), &entry.value().len());
        }
        map.finish()
    }
}
