//! Single-threaded event aggregator.
//!
//! This module provides [`EventAggregator`], a registry mapping event types to the
//! handlers interested in them.
//!
//! # Overview
//!
//! - **Subscribe**: register a handler for an event type; registering the same
//!   handler twice is a no-op
//! - **Publish**: invoke every handler of the event's type with `(sender, event)`
//! - **Unsubscribe**: remove a handler; unknown handlers and event types are ignored
//!
//! Every operation takes `&self`. Handlers may hold a reference to the aggregator and
//! subscribe or unsubscribe while a publish is running. Each publish delivers to the
//! handlers registered when it started; changes made during delivery apply to the
//! next publish.
//!
//! # Generic and key-based API
//!
//! `subscribe::<E>` derives the key from the handler's event type. `subscribe_to`
//! takes an explicit [`EventKey`] and an [`AnyHandler`]. Both write to the same map.
//!
//! # Example
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//!
//! use event_aggregator::{Event, EventAggregator, Handler};
//!
//! #[derive(Event)]
//! struct DamageEvent {
//!     amount: u32,
//! }
//!
//! struct Player;
//!
//! let aggregator: EventAggregator<Player> = EventAggregator::new();
//! let total = Rc::new(Cell::new(0));
//!
//! let counter = Rc::clone(&total);
//! let handler = Handler::new(move |_: &Player, event: &DamageEvent| {
//!     counter.set(counter.get() + event.amount);
//! });
//!
//! aggregator.subscribe(&handler);
//! aggregator.subscribe(&handler); // already subscribed, ignored
//! aggregator.publish(&Player, &DamageEvent { amount: 50 });
//!
//! assert_eq!(total.get(), 50);
//! ```

use std::{any::Any, cell::RefCell, collections::HashMap, fmt};

use crate::{
    Event, EventKey,
    handler::{AnyHandler, Handler},
    subscribers::Subscribers,
};

/// Registry of handlers keyed by event type.
///
/// `S` is the sender type passed to every handler. It defaults to `dyn Any`, so
/// any `'static` value can be used as the sender and recovered by downcasting.
///
/// # Thread Safety
///
/// `EventAggregator` is neither `Send` nor `Sync`. Use
/// [`SharedAggregator`](crate::SharedAggregator) to share a registry between threads.
pub struct EventAggregator<S: ?Sized + 'static = dyn Any> {
    /// Handlers per event type. A key is present only while it has handlers.
    handlers: RefCell<HashMap<EventKey, Subscribers<AnyHandler<S>>>>,
}

impl<S: ?Sized + 'static> EventAggregator<S> {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(HashMap::new()),
        }
    }

    /// Creates an empty aggregator with room for `capacity` event types.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            handlers: RefCell::new(HashMap::with_capacity(capacity)),
        }
    }

    /// Subscribes `handler` to its event type `E`.
    ///
    /// Returns `false` if the handler was already subscribed; nothing changes in
    /// that case.
    pub fn subscribe<E: Event>(&self, handler: &Handler<S, E>) -> bool {
        self.subscribe_to(EventKey::of::<E>(), &handler.erase())
    }

    /// Subscribes `handler` to the event type identified by `key`.
    ///
    /// A handler built for another event type is still registered under `key`,
    /// but it is skipped when events for `key` are published.
    pub fn subscribe_to(&self, key: EventKey, handler: &AnyHandler<S>) -> bool {
        if handler.key() != key {
            log::warn!(
                "Handler for {} subscribed to {key}; it will not receive these events.",
                handler.key()
            );
        }

        let added = self
            .handlers
            .borrow_mut()
            .entry(key)
            .or_default()
            .insert(handler);

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
    pub fn unsubscribe<E: Event>(&self, handler: &Handler<S, E>) -> bool {
        self.unsubscribe_from(EventKey::of::<E>(), &handler.erase())
    }

    /// Unsubscribes `handler` from the event type identified by `key`.
    pub fn unsubscribe_from(&self, key: EventKey, handler: &AnyHandler<S>) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let Some(subscribers) = handlers.get_mut(&key) else {
            return false;
        };

        let removed = subscribers.remove(handler);
        if subscribers.is_empty() {
            handlers.remove(&key);
        }

        if removed {
            log::debug!("Unsubscribed handler from {key}.");
        }
        removed
    }

    /// Publishes `event` to every handler subscribed to `E`, in registration order.
    ///
    /// Does nothing if `E` has no subscribers. A panicking handler is not caught;
    /// the panic reaches the caller and the remaining handlers are not invoked.
    pub fn publish<E: Event>(&self, sender: &S, event: &E) {
        let key = EventKey::of::<E>();

        // Release the borrow before delivery so handlers can (un)subscribe.
        let snapshot = match self.handlers.borrow().get(&key) {
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
    pub fn is_subscribed<E: Event>(&self, handler: &Handler<S, E>) -> bool {
        self.is_subscribed_to(EventKey::of::<E>(), &handler.erase())
    }

    /// Returns `true` if `handler` is subscribed to the event type identified by `key`.
    pub fn is_subscribed_to(&self, key: EventKey, handler: &AnyHandler<S>) -> bool {
        self.handlers
            .borrow()
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
            .borrow()
            .get(&key)
            .map_or(0, Subscribers::len)
    }

    /// Number of event types with at least one subscriber.
    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Returns `true` if no handler is subscribed to anything.
    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    /// Removes every subscription.
    pub fn clear(&self) {
        // Dropped after the borrow ends: a handler's captures may call back in from `Drop`.
        let handlers = std::mem::take(&mut *self.handlers.borrow_mut());
        drop(handlers);
        log::debug!("Cleared all subscriptions.");
    }
}

impl<S: ?Sized + 'static> Default for EventAggregator<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized + 'static> fmt::Debug for EventAggregator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.handlers.try_borrow() {
            Ok(handlers) => f
                .debug_map()
                .entries(handlers.iter().map(|(key, subscribers)| (key, subscribers.len())))
                .finish(),
            Err(_) => f.write_str("EventAggregator { <borrowed> }"),
        }
    }
}
