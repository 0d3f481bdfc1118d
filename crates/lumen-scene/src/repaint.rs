use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

#[derive(Default)]
struct State {
    pending: Cell<bool>,
    scheduled: Cell<u64>,
    hook: RefCell<Option<Rc<dyn Fn()>>>,
}

/// Coalescing "please repaint" flag shared between a canvas and the scene
/// subscription it installs.
///
/// Any number of requests between two paints schedule exactly one repaint.
/// The hook, when installed, forwards the schedule to the platform.
#[derive(Clone, Default)]
pub struct RepaintSignal {
    state: Rc<State>,
}

impl RepaintSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a repaint. No-op while one is already pending.
    pub fn request(&self) {
        if self.state.pending.replace(true) {
            return;
        }
        self.state.scheduled.set(self.state.scheduled.get() + 1);
        log::trace!("repaint scheduled");
        self.fire_hook();
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.state.pending.get()
    }

    /// Total repaints scheduled so far; coalesced requests are not counted.
    #[inline]
    pub fn scheduled(&self) -> u64 {
        self.state.scheduled.get()
    }

    /// Marks the pending repaint as served. Returns whether one was pending.
    pub(crate) fn take_pending(&self) -> bool {
        self.state.pending.replace(false)
    }

    /// Installs the platform hook. Fires immediately if a repaint is already
    /// pending, since that request was never forwarded.
    pub fn set_hook(&self, hook: impl Fn() + 'static) {
        *self.state.hook.borrow_mut() = Some(Rc::new(hook));
        if self.is_pending() {
            self.fire_hook();
        }
    }

    // The hook may reinstall itself, so it runs outside the borrow.
    fn fire_hook(&self) {
        let hook = self.state.hook.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}

impl fmt::Debug for RepaintSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepaintSignal")
            .field("pending", &self.is_pending())
            .field("scheduled", &self.scheduled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_coalesce_until_served() {
        let signal = RepaintSignal::new();
        signal.request();
        signal.request();
        signal.request();
        assert!(signal.is_pending());
        assert_eq!(signal.scheduled(), 1);

        assert!(signal.take_pending());
        assert!(!signal.take_pending());

        signal.request();
        assert_eq!(signal.scheduled(), 2);
    }

    #[test]
    fn hook_fires_once_per_schedule() {
        let signal = RepaintSignal::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        signal.set_hook(move || h.set(h.get() + 1));

        signal.request();
        signal.request();
        assert_eq!(hits.get(), 1);

        signal.take_pending();
        signal.request();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn late_hook_receives_pending_request() {
        let signal = RepaintSignal::new();
        signal.request();

        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        signal.set_hook(move || h.set(h.get() + 1));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn hook_may_replace_itself_while_firing() {
        let signal = RepaintSignal::new();
        let hits = Rc::new(Cell::new(0));

        let (s, h) = (signal.clone(), hits.clone());
        signal.set_hook(move || {
            let h = h.clone();
            s.set_hook(move || h.set(h.get() + 1));
        });

        signal.request();
        // The replacement sees the still-pending request immediately.
        assert_eq!(hits.get(), 1);

        signal.take_pending();
        signal.request();
        assert_eq!(hits.get(), 2);
    }
}
