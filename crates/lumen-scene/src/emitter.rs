use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Identifies one connection made with [`UpdateEmitter::connect`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Rc<dyn Fn()>;

#[derive(Default)]
struct Inner {
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<(SubscriptionId, Callback)>>,
}

/// Change-notification channel owned by every entity.
///
/// Cloning yields another handle to the same channel, which lets a visual or
/// a parent entity keep a way to notify without borrowing the entity itself.
///
/// Single-threaded by construction (`Rc`), matching the event-loop model.
#[derive(Clone, Default)]
pub struct UpdateEmitter {
    inner: Rc<Inner>,
}

impl UpdateEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback`; it runs on every [`notify`](Self::notify) until
    /// disconnected.
    pub fn connect(&self, callback: impl Fn() + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(callback)));
        id
    }

    /// Removes a connection. Unknown or already removed ids are ignored and
    /// reported as `false`.
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        let mut subs = self.inner.subscribers.borrow_mut();
        match subs.iter().position(|(sid, _)| *sid == id) {
            Some(index) => {
                subs.remove(index);
                true
            }
            None => false,
        }
    }

    /// Invokes every connected callback in connection order.
    ///
    /// The subscriber list is snapshotted first, so callbacks may connect or
    /// disconnect (on this or any other emitter) while being notified.
    pub fn notify(&self) {
        let snapshot: Vec<Callback> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();

        for callback in snapshot {
            callback();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    pub fn is_connected(&self, id: SubscriptionId) -> bool {
        self.inner.subscribers.borrow().iter().any(|(sid, _)| *sid == id)
    }

    /// Non-owning handle, used for upward forwarding so a child's channel never
    /// keeps its parent's channel alive.
    pub fn downgrade(&self) -> WeakEmitter {
        WeakEmitter { inner: Rc::downgrade(&self.inner) }
    }

    /// `true` when both handles refer to the same channel.
    pub fn same_channel(&self, other: &UpdateEmitter) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for UpdateEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateEmitter")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Weak counterpart of [`UpdateEmitter`].
#[derive(Clone)]
pub struct WeakEmitter {
    inner: Weak<Inner>,
}

impl WeakEmitter {
    /// Notifies the channel if it still exists.
    pub fn notify(&self) {
        if let Some(inner) = self.inner.upgrade() {
            UpdateEmitter { inner }.notify();
        }
    }
}
