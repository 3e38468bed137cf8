//! # Event Aggregator
//!
//! An in-process publish/subscribe registry. Handlers subscribe to an event type;
//! publishing an event invokes every handler subscribed to its type with the sender
//! and the event.
//!
//! - [`EventAggregator`]: single-threaded, re-entrant from handlers
//! - [`SharedAggregator`]: thread-safe, for use behind an `Arc`
//!
//! Event types implement [`Event`], usually through `#[derive(Event)]`. Handlers are
//! wrapped in reference-counted handles ([`Handler`], [`SharedHandler`]) which give
//! them a stable identity: subscribing the same handle twice has no effect, and the
//! handle is what is passed back to unsubscribe.
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use event_aggregator::{Event, EventAggregator, Handler};
//!
//! #[derive(Event, Debug)]
//! struct SampleEvent {
//!     message: String,
//!     time: i32,
//! }
//!
//! let aggregator: EventAggregator<str> = EventAggregator::new();
//! let received = Rc::new(RefCell::new(Vec::new()));
//!
//! let log = Rc::clone(&received);
//! let handler = Handler::new(move |sender: &str, event: &SampleEvent| {
//!     log.borrow_mut().push(format!("{sender}: {} at {}", event.message, event.time));
//! });
//!
//! aggregator.subscribe(&handler);
//! aggregator.publish("main", &SampleEvent { message: "hello".into(), time: 42 });
//! aggregator.unsubscribe(&handler);
//! aggregator.publish("main", &SampleEvent { message: "ignored".into(), time: 43 });
//!
//! assert_eq!(*received.borrow(), vec!["main: hello at 42".to_string()]);
//! ```
//!
//! Diagnostics are emitted through the [`log`] facade; the crate never installs a
//! logger.

// Lets `#[derive(Event)]` expand to `::event_aggregator::Event` inside this crate.
extern crate self as event_aggregator;

pub mod aggregator;
pub mod event;
pub mod handler;
pub mod shared;
mod subscribers;

pub use aggregator::EventAggregator;
pub use event::{Event, EventKey};
pub use event_aggregator_macros::Event;
pub use handler::{AnyHandler, Handler, SharedAnyHandler, SharedHandler};
pub use shared::SharedAggregator;
