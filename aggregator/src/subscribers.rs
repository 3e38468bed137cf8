//! Ordered, duplicate-free handler list for a single event key.

/// Handlers registered for one event key, in registration order.
///
/// A handler is stored at most once. Publishing works on a [`snapshot`](Self::snapshot)
/// so the list may change while the snapshot is being delivered.
#[derive(Debug)]
pub(crate) struct Subscribers<H> {
    handlers: Vec<H>,
}

impl<H> Subscribers<H> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<H: PartialEq + Clone> Subscribers<H> {
    /// Appends `handler` unless an equal one is already present.
    ///
    /// Returns `true` if the handler was added.
    pub fn insert(&mut self, handler: &H) -> bool {
        if self.contains(handler) {
            return false;
        }
        self.handlers.push(handler.clone());
        true
    }

    /// Removes the entry equal to `handler`, keeping the order of the rest.
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove(&mut self, handler: &H) -> bool {
        match self.handlers.iter().position(|h| h == handler) {
            Some(index) => {
                self.handlers.remove(index);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn contains(&self, handler: &H) -> bool {
        self.handlers.contains(handler)
    }

    /// Copies the current handlers out for delivery.
    pub fn snapshot(&self) -> Vec<H> {
        self.handlers.clone()
    }
}

impl<H> Default for Subscribers<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Insert ====================

    #[test]
    fn new_is_empty() {
        let subscribers = Subscribers::<u32>::new();

        assert!(subscribers.is_empty());
        assert_eq!(subscribers.len(), 0);
    }

    #[test]
    fn insert_appends_in_order() {
        let mut subscribers = Subscribers::new();

        assert!(subscribers.insert(&1));
        assert!(subscribers.insert(&2));
        assert!(subscribers.insert(&3));

        assert_eq!(subscribers.snapshot(), vec![1, 2, 3]);
    }

    #[test]
    fn insert_ignores_duplicates() {
        let mut subscribers = Subscribers::new();

        assert!(subscribers.insert(&7));
        assert!(!subscribers.insert(&7));
        assert!(!subscribers.insert(&7));

        assert_eq!(subscribers.len(), 1);
    }

    // ==================== Remove ====================

    #[test]
    fn remove_keeps_remaining_order() {
        let mut subscribers = Subscribers::new();
        subscribers.insert(&1);
        subscribers.insert(&2);
        subscribers.insert(&3);

        assert!(subscribers.remove(&2));

        assert_eq!(subscribers.snapshot(), vec![1, 3]);
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut subscribers = Subscribers::new();
        subscribers.insert(&1);

        assert!(!subscribers.remove(&5));

        assert_eq!(subscribers.snapshot(), vec![1]);
    }

    #[test]
    fn remove_last_leaves_empty() {
        let mut subscribers = Subscribers::new();
        subscribers.insert(&1);

        subscribers.remove(&1);

        assert!(subscribers.is_empty());
        assert!(!subscribers.contains(&1));
    }

    // ==================== Snapshot ====================

    #[test]
    fn snapshot_is_detached_from_list() {
        let mut subscribers = Subscribers::new();
        subscribers.insert(&1);
        let snapshot = subscribers.snapshot();

        subscribers.insert(&2);
        subscribers.remove(&1);

        assert_eq!(snapshot, vec![1]);
        assert_eq!(subscribers.snapshot(), vec![2]);
    }
}
