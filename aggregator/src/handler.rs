//! Handler handles stored by the aggregators.
//!
//! A handler is a callback receiving `(&sender, &event)`. Closures have no usable
//! notion of equality, so every callback is wrapped in a reference-counted handle
//! when it is created. Handles compare equal when they point at the same
//! allocation: clones of a handle are equal, two handles created from the same
//! closure source are not.
//!
//! # Typed and erased handles
//!
//! - [`Handler<S, E>`] / [`SharedHandler<S, E>`] know their event type and are used
//!   with the generic API (`subscribe::<E>`).
//! - [`AnyHandler<S>`] / [`SharedAnyHandler<S>`] hide the event type and are used
//!   with the key-based API (`subscribe_to(key, ..)`).
//!
//! Erasing a typed handle shares its allocation, so the erased handle is equal to
//! the typed handle it came from. A handler subscribed through one API can be
//! queried or unsubscribed through the other.
//!
//! The `Shared*` variants are backed by `Arc` and require `Send + Sync` callbacks
//! for use with [`SharedAggregator`](crate::SharedAggregator).

use std::{any::Any, fmt, marker::PhantomData, rc::Rc, sync::Arc};

use crate::event::{Event, EventKey};

/// Type-erased invocation interface shared by every handler.
pub(crate) trait ErasedHandler<S: ?Sized>: 'static {
    /// The key of the event type this handler accepts.
    fn key(&self) -> EventKey;

    /// Invokes the handler if `event` has the accepted type.
    ///
    /// Returns `false` without calling anything when the types do not match.
    fn call(&self, sender: &S, event: &dyn Any) -> bool;
}

/// A callback bound to event type `E`.
struct TypedHandler<S: ?Sized, E, F> {
    callback: F,
    _marker: PhantomData<fn(&S, &E)>,
}

impl<S, E, F> ErasedHandler<S> for TypedHandler<S, E, F>
where
    S: ?Sized + 'static,
    E: Event,
    F: Fn(&S, &E) + 'static,
{
    fn key(&self) -> EventKey {
        EventKey::of::<E>()
    }

    fn call(&self, sender: &S, event: &dyn Any) -> bool {
        match event.downcast_ref::<E>() {
            Some(event) => {
                (self.callback)(sender, event);
                true
            }
            None => false,
        }
    }
}

fn typed<S, E, F>(callback: F) -> TypedHandler<S, E, F>
where
    S: ?Sized + 'static,
    E: Event,
    F: Fn(&S, &E) + 'static,
{
    TypedHandler {
        callback,
        _marker: PhantomData,
    }
}

// Compares the data pointers only; vtable pointers are not guaranteed unique.
#[inline]
fn same_allocation<T: ?Sized>(a: *const T, b: *const T) -> bool {
    std::ptr::eq(a.cast::<()>(), b.cast::<()>())
}

// ==================== Single-threaded ====================

/// A handler for events of type `E`, sent by `S`.
///
/// # Example
///
/// ```rust
/// use event_aggregator::{Event, EventAggregator, Handler};
///
/// #[derive(Event)]
/// struct Saved(u32);
///
/// let aggregator: EventAggregator<str> = EventAggregator::new();
/// let handler = Handler::new(|sender: &str, event: &Saved| {
///     println!("{sender} saved {}", event.0);
/// });
///
/// aggregator.subscribe(&handler);
/// aggregator.publish("editor", &Saved(3));
/// aggregator.unsubscribe(&handler);
/// ```
pub struct Handler<S: ?Sized + 'static, E: Event> {
    inner: Rc<dyn ErasedHandler<S>>,
    _event: PhantomData<fn(&E)>,
}

impl<S: ?Sized + 'static, E: Event> Handler<S, E> {
    /// Wraps `callback` in a new handle.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&S, &E) + 'static,
    {
        Self {
            inner: Rc::new(typed::<S, E, F>(callback)),
            _event: PhantomData,
        }
    }

    /// The key of event type `E`.
    #[inline]
    pub fn key(&self) -> EventKey {
        EventKey::of::<E>()
    }

    /// Returns an erased handle equal to this one.
    pub fn erase(&self) -> AnyHandler<S> {
        AnyHandler {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: ?Sized + 'static, E: Event> Clone for Handler<S, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            _event: PhantomData,
        }
    }
}

impl<S: ?Sized + 'static, E: Event> PartialEq for Handler<S, E> {
    fn eq(&self, other: &Self) -> bool {
        same_allocation(Rc::as_ptr(&self.inner), Rc::as_ptr(&other.inner))
    }
}

impl<S: ?Sized + 'static, E: Event> Eq for Handler<S, E> {}

impl<S: ?Sized + 'static, E: Event> PartialEq<AnyHandler<S>> for Handler<S, E> {
    fn eq(&self, other: &AnyHandler<S>) -> bool {
        same_allocation(Rc::as_ptr(&self.inner), Rc::as_ptr(&other.inner))
    }
}

impl<S: ?Sized + 'static, E: Event> From<Handler<S, E>> for AnyHandler<S> {
    fn from(handler: Handler<S, E>) -> Self {
        Self {
            inner: handler.inner,
        }
    }
}

impl<S: ?Sized + 'static, E: Event> fmt::Debug for Handler<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("event", &self.key())
            .field("ptr", &Rc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

/// A handler whose event type is only known at runtime.
pub struct AnyHandler<S: ?Sized + 'static> {
    inner: Rc<dyn ErasedHandler<S>>,
}

impl<S: ?Sized + 'static> AnyHandler<S> {
    /// Wraps `callback` in a new erased handle accepting events of type `E`.
    pub fn new<E, F>(callback: F) -> Self
    where
        E: Event,
        F: Fn(&S, &E) + 'static,
    {
        Handler::<S, E>::new(callback).into()
    }

    /// The key of the event type this handler accepts.
    #[inline]
    pub fn key(&self) -> EventKey {
        self.inner.key()
    }

    #[inline]
    pub(crate) fn call(&self, sender: &S, event: &dyn Any) -> bool {
        self.inner.call(sender, event)
    }
}

impl<S: ?Sized + 'static> Clone for AnyHandler<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: ?Sized + 'static> PartialEq for AnyHandler<S> {
    fn eq(&self, other: &Self) -> bool {
        same_allocation(Rc::as_ptr(&self.inner), Rc::as_ptr(&other.inner))
    }
}

impl<S: ?Sized + 'static> Eq for AnyHandler<S> {}

impl<S: ?Sized + 'static> fmt::Debug for AnyHandler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyHandler")
            .field("event", &self.key())
            .field("ptr", &Rc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

// ==================== Thread-safe ====================

/// A thread-safe handler for events of type `E`, sent by `S`.
pub struct SharedHandler<S: ?Sized + 'static, E: Event> {
    inner: Arc<dyn ErasedHandler<S> + Send + Sync>,
    _event: PhantomData<fn(&E)>,
}

impl<S: ?Sized + 'static, E: Event> SharedHandler<S, E> {
    /// Wraps `callback` in a new handle.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&S, &E) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(typed::<S, E, F>(callback)),
            _event: PhantomData,
        }
    }

    /// The key of event type `E`.
    #[inline]
    pub fn key(&self) -> EventKey {
        EventKey::of::<E>()
    }

    /// Returns an erased handle equal to this one.
    pub fn erase(&self) -> SharedAnyHandler<S> {
        SharedAnyHandler {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ?Sized + 'static, E: Event> Clone for SharedHandler<S, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _event: PhantomData,
        }
    }
}

impl<S: ?Sized + 'static, E: Event> PartialEq for SharedHandler<S, E> {
    fn eq(&self, other: &Self) -> bool {
        same_allocation(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

impl<S: ?Sized + 'static, E: Event> Eq for SharedHandler<S, E> {}

impl<S: ?Sized + 'static, E: Event> PartialEq<SharedAnyHandler<S>> for SharedHandler<S, E> {
    fn eq(&self, other: &SharedAnyHandler<S>) -> bool {
        same_allocation(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

impl<S: ?Sized + 'static, E: Event> From<SharedHandler<S, E>> for SharedAnyHandler<S> {
    fn from(handler: SharedHandler<S, E>) -> Self {
        Self {
            inner: handler.inner,
        }
    }
}

impl<S: ?Sized + 'static, E: Event> fmt::Debug for SharedHandler<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedHandler")
            .field("event", &self.key())
            .field("ptr", &Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

/// A thread-safe handler whose event type is only known at runtime.
pub struct SharedAnyHandler<S: ?Sized + 'static> {
    inner: Arc<dyn ErasedHandler<S> + Send + Sync>,
}

impl<S: ?Sized + 'static> SharedAnyHandler<S> {
    /// Wraps `callback` in a new erased handle accepting events of type `E`.
    pub fn new<E, F>(callback: F) -> Self
    where
        E: Event,
        F: Fn(&S, &E) + Send + Sync + 'static,
    {
        SharedHandler::<S, E>::new(callback).into()
    }

    /// The key of the event type this handler accepts.
    #[inline]
    pub fn key(&self) -> EventKey {
        self.inner.key()
    }

    #[inline]
    pub(crate) fn call(&self, sender: &S, event: &dyn Any) -> bool {
        self.inner.call(sender, event)
    }
}

impl<S: ?Sized + 'static> Clone for SharedAnyHandler<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ?Sized + 'static> PartialEq for SharedAnyHandler<S> {
    fn eq(&self, other: &Self) -> bool {
        same_allocation(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

impl<S: ?Sized + 'static> Eq for SharedAnyHandler<S> {}

impl<S: ?Sized + 'static> fmt::Debug for SharedAnyHandler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedAnyHandler")
            .field("event", &self.key())
            .field("ptr", &Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}
