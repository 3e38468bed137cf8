//! Event and sender types used across benchmarks.

use event_aggregator::Event;

/// Small, copyable event.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct Tick {
    pub frame: u64,
}

/// Event carrying owned data, similar to the log/message events of real applications.
#[derive(Event, Clone, Debug, Default)]
pub struct Message {
    pub text: String,
    pub time: i32,
}

/// Event type nobody subscribes to.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct Unobserved;

/// Sender passed to every publish.
#[derive(Clone, Copy, Debug, Default)]
pub struct Source {
    pub id: u32,
}
