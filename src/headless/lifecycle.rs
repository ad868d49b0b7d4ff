//! Removal signals raised by hand.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use hashbrown::HashMap;
use log::trace;

use crate::disposal::Subscription;
use crate::error::ReleaseError;
use crate::host::{EntityId, LifecycleSource};

type Listener = (u64, Box<dyn FnMut()>);

#[derive(Default)]
struct LifecycleState {
    next_id: u64,
    listeners: HashMap<EntityId, Vec<Listener>>,
}

/// Lifecycle source whose removal signals are raised with
/// [`emit_removed`](Self::emit_removed).
#[derive(Clone, Default)]
pub struct HeadlessLifecycle {
    state: Rc<RefCell<LifecycleState>>,
}

impl std::fmt::Debug for HeadlessLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessLifecycle")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl HeadlessLifecycle {
    /// Creates a source with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires every listener registered for `entity` and forgets them.
    ///
    /// Returns the number of listeners invoked. Listeners are taken out of
    /// the source before they run, so a listener may cancel subscriptions or
    /// subscribe again without re-entering a borrow.
    #[must_use]
    pub fn emit_removed(&self, entity: EntityId) -> usize {
        let listeners = self
            .state
            .borrow_mut()
            .listeners
            .remove(&entity)
            .unwrap_or_default();
        let count = listeners.len();
        trace!("entity {entity}: removal signal to {count} listener(s)");
        for (_, mut listener) in listeners {
            listener();
        }
        count
    }

    /// Listeners currently connected across all entities.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.values().map(Vec::len).sum()
    }
}

impl LifecycleSource for HeadlessLifecycle {
    fn subscribe_removed(
        &self,
        entity: EntityId,
        callback: Box<dyn FnMut()>,
    ) -> Box<dyn Subscription> {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        state.listeners.entry(entity).or_default().push((id, callback));
        Box::new(HeadlessSubscription {
            state: Rc::downgrade(&self.state),
            entity,
            id,
            cancelled: false,
        })
    }
}

struct HeadlessSubscription {
    state: Weak<RefCell<LifecycleState>>,
    entity: EntityId,
    id: u64,
    cancelled: bool,
}

impl Subscription for HeadlessSubscription {
    fn cancel(&mut self) -> Result<(), ReleaseError> {
        if self.cancelled {
            return Err(ReleaseError::AlreadyReleased);
        }
        self.cancelled = true;
        // Source already gone or signal already fired: nothing to disconnect.
        let Some(shared) = self.state.upgrade() else {
            return Ok(());
        };
        let mut state = shared.try_borrow_mut().map_err(|_| ReleaseError::Busy)?;
        if let Some(listeners) = state.listeners.get_mut(&self.entity) {
            listeners.retain(|(id, _)| *id != self.id);
            if listeners.is_empty() {
                state.listeners.remove(&self.entity);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, Box<dyn FnMut()>) {
        let hits = Rc::new(Cell::new(0));
        let inner = Rc::clone(&hits);
        (hits, Box::new(move || inner.set(inner.get() + 1)))
    }

    #[test]
    fn emit_fires_only_matching_listeners_once() {
        let lifecycle = HeadlessLifecycle::new();
        let (first, first_cb) = counter();
        let (other, other_cb) = counter();
        let _a = lifecycle.subscribe_removed(EntityId(1), first_cb);
        let _b = lifecycle.subscribe_removed(EntityId(2), other_cb);

        assert_eq!(lifecycle.emit_removed(EntityId(1)), 1);
        assert_eq!(lifecycle.emit_removed(EntityId(1)), 0);
        assert_eq!((first.get(), other.get()), (1, 0));
        assert_eq!(lifecycle.listener_count(), 1);
    }

    #[test]
    fn cancelled_subscription_never_fires() {
        let lifecycle = HeadlessLifecycle::new();
        let (hits, callback) = counter();
        let mut subscription = lifecycle.subscribe_removed(EntityId(1), callback);

        assert_eq!(subscription.cancel(), Ok(()));
        assert_eq!(subscription.cancel(), Err(ReleaseError::AlreadyReleased));
        assert_eq!(lifecycle.emit_removed(EntityId(1)), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn cancel_after_source_dropped_is_fine() {
        let lifecycle = HeadlessLifecycle::new();
        let (_hits, callback) = counter();
        let mut subscription = lifecycle.subscribe_removed(EntityId(3), callback);
        drop(lifecycle);
        assert_eq!(subscription.cancel(), Ok(()));
    }
}
