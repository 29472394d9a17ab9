use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

type Slot<T> = Rc<dyn Fn(&T)>;

struct Slots<T> {
    next_id: Cell<u64>,
    slots: RefCell<Vec<(u64, Slot<T>)>>,
}

/// A single-threaded change notification with any number of handlers.
///
/// Handlers run synchronously, in connection order, on the emitting thread. Emission works on a
/// snapshot of the handler list, so a handler may connect or disconnect handlers (itself
/// included) while it runs; such changes take effect on the next emission.
pub struct Signal<T> {
    inner: Rc<Slots<T>>,
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Signal<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Slots {
                next_id: Cell::new(0),
                slots: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Registers `handler`. It stays connected until the returned guard is dropped or
    /// [`Subscription::unsubscribe`] is called.
    #[must_use = "dropping the subscription disconnects the handler"]
    pub fn connect(&self, handler: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id.wrapping_add(1));
        self.inner
            .slots
            .borrow_mut()
            .push((id, Rc::new(handler) as Slot<T>));

        let weak: Weak<Slots<T>> = Rc::downgrade(&self.inner);
        Subscription {
            disconnect: Some(Box::new(move || {
                if let Some(slots) = weak.upgrade() {
                    slots.slots.borrow_mut().retain(|(slot_id, _)| *slot_id != id);
                }
            })),
        }
    }

    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Slot<T>> = self
            .inner
            .slots
            .borrow()
            .iter()
            .map(|(_, slot)| Rc::clone(slot))
            .collect();
        for slot in snapshot {
            slot(value);
        }
    }

    /// Number of connected handlers.
    pub fn len(&self) -> usize {
        self.inner.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> core::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Signal")
            .field("handlers", &self.inner.slots.borrow().len())
            .finish()
    }
}

/// Keeps a handler connected to a [`Signal`].
///
/// Dropping the guard disconnects the handler. The guard only holds a weak reference, so it may
/// outlive the signal.
pub struct Subscription {
    disconnect: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.disconnect_now();
    }

    fn disconnect_now(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.disconnect_now();
    }
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("connected", &self.disconnect.is_some())
            .finish()
    }
}
