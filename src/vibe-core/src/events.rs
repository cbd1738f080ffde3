//! Synchronous, typed event dispatch.
//!
//! Every entity kind exposes a closed enum of events (for example
//! [`SongListEvent`](crate::SongListEvent)) and a listener table built on
//! this module. Events fire synchronously, after the mutation they describe
//! has been fully applied, in listener-registration order. There is no
//! coalescing or batching.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle returned by `connect`, used to remove a listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Slot<E> = Rc<RefCell<dyn FnMut(&E) + 'static>>;

/// Ordered listener table for one event type.
///
/// Listeners run on the caller's (single) thread. The table snapshots its
/// slots before dispatching, so a callback may freely connect or disconnect
/// listeners without hitting a re-entrant borrow; changes take effect from
/// the next emission onward.
pub struct Listeners<E> {
    next: Cell<u64>,
    slots: RefCell<Vec<(ListenerId, Slot<E>)>>,
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self {
            next: Cell::new(0),
            slots: RefCell::new(Vec::new()),
        }
    }

    pub fn connect(&self, listener: impl FnMut(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next.get());
        self.next.set(self.next.get() + 1);
        let slot: Slot<E> = Rc::new(RefCell::new(listener));
        self.slots.borrow_mut().push((id, slot));
        id
    }

    /// Returns true if the listener was still registered.
    pub fn disconnect(&self, id: ListenerId) -> bool {
        let mut slots = self.slots.borrow_mut();
        let before = slots.len();
        slots.retain(|(slot_id, _)| *slot_id != id);
        slots.len() != before
    }

    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Slot<E>> = self
            .slots
            .borrow()
            .iter()
            .map(|(_, slot)| slot.clone())
            .collect();
        for slot in snapshot {
            (&mut *slot.borrow_mut())(event);
        }
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_fire_in_registration_order() {
        let listeners: Listeners<u32> = Listeners::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = seen.clone();
        listeners.connect(move |n| first.borrow_mut().push(("first", *n)));
        let second = seen.clone();
        listeners.connect(move |n| second.borrow_mut().push(("second", *n)));

        listeners.emit(&7);
        assert_eq!(&*seen.borrow(), &[("first", 7), ("second", 7)]);
    }

    #[test]
    fn disconnect_removes_listener() {
        let listeners: Listeners<u32> = Listeners::new();
        let count = Rc::new(Cell::new(0));

        let counter = count.clone();
        let id = listeners.connect(move |_| counter.set(counter.get() + 1));

        listeners.emit(&1);
        assert!(listeners.disconnect(id));
        assert!(!listeners.disconnect(id));
        listeners.emit(&2);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn listener_may_disconnect_itself_during_dispatch() {
        let listeners: Rc<Listeners<u32>> = Rc::new(Listeners::new());
        let count = Rc::new(Cell::new(0));

        let id_cell: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let inner = listeners.clone();
        let counter = count.clone();
        let id_for_cb = id_cell.clone();
        let id = listeners.connect(move |_| {
            counter.set(counter.get() + 1);
            if let Some(id) = id_for_cb.get() {
                inner.disconnect(id);
            }
        });
        id_cell.set(Some(id));

        listeners.emit(&1);
        listeners.emit(&2);
        assert_eq!(count.get(), 1);
    }
}
