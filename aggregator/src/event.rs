//! Event types and the keys used to route them.
//!
//! Every event published through an aggregator is identified by its [`EventKey`],
//! a thin wrapper around [`std::any::TypeId`]. Subscribing with the generic API
//! (`subscribe::<E>`) and with an explicit key (`subscribe_to(EventKey::of::<E>(), ..)`)
//! lands in the same slot of the registry.
//!
//! # Example
//!
//! ```rust
//! use event_aggregator::{Event, EventKey};
//!
//! #[derive(Event)]
//! struct PlayerJoined {
//!     name: String,
//! }
//!
//! let key = EventKey::of::<PlayerJoined>();
//! assert_eq!(key, EventKey::of::<PlayerJoined>());
//! assert!(key.name().ends_with("PlayerJoined"));
//! ```

use std::{
    any::{self, TypeId},
    borrow::Borrow,
    fmt,
    hash::{Hash, Hasher},
};

/// Marker trait for event types.
///
/// Use `#[derive(Event)]` to implement it. Events only need to be `'static`;
/// they are borrowed by handlers for the duration of a publish and never stored.
pub trait Event: 'static {}

/// Identifies one kind of event.
///
/// Equality and hashing only consider the underlying [`TypeId`]. The type name is
/// carried along for logging and `Debug` output.
#[derive(Clone, Copy)]
pub struct EventKey {
    type_id: TypeId,
    name: &'static str,
}

impl EventKey {
    /// Returns the key of event type `E`.
    #[inline]
    pub fn of<E: Event>() -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            name: any::type_name::<E>(),
        }
    }

    /// The Rust `TypeId` of the event type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The fully qualified name of the event type.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this key belongs to event type `E`.
    #[inline]
    pub fn is<E: Event>(&self) -> bool {
        self.type_id == TypeId::of::<E>()
    }
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for EventKey {}

impl Hash for EventKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

// Hash and Eq only look at the TypeId, so lookups by TypeId are consistent.
impl Borrow<TypeId> for EventKey {
    fn borrow(&self) -> &TypeId {
        &self.type_id
    }
}

impl fmt::Debug for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventKey").field(&self.name).finish()
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::Event;

    #[derive(Event)]
    struct Ping;

    #[derive(Event)]
    struct Pong {
        _value: u32,
    }

    #[derive(Event)]
    struct Wrapped<T> {
        _inner: T,
    }

    #[test]
    fn same_type_yields_equal_keys() {
        assert_eq!(EventKey::of::<Ping>(), EventKey::of::<Ping>());
    }

    #[test]
    fn different_types_yield_different_keys() {
        assert_ne!(EventKey::of::<Ping>(), EventKey::of::<Pong>());
    }

    #[test]
    fn generic_instantiations_are_distinct_events() {
        assert_ne!(
            EventKey::of::<Wrapped<u32>>(),
            EventKey::of::<Wrapped<String>>()
        );
    }

    #[test]
    fn is_matches_only_own_type() {
        let key = EventKey::of::<Ping>();

        assert!(key.is::<Ping>());
        assert!(!key.is::<Pong>());
    }

    #[test]
    fn name_and_display_use_type_name() {
        let key = EventKey::of::<Pong>();

        assert!(key.name().ends_with("Pong"));
        assert_eq!(key.to_string(), key.name());
        assert!(format!("{key:?}").contains("Pong"));
    }

    #[test]
    fn map_lookup_by_type_id() {
        let mut map = HashMap::new();
        map.insert(EventKey::of::<Ping>(), "ping");

        assert_eq!(map.get(&TypeId::of::<Ping>()), Some(&"ping"));
        assert_eq!(map.get(&TypeId::of::<Pong>()), None);
    }
}
