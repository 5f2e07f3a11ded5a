//! Debounce and throttle wrappers for page actions.
//!
//! Both wrappers are cheap `Rc` handles: clone one into every listener that
//! should share its timing state. The wrapped action receives the page and the
//! arguments of the call that fired it.

use crate::page::Page;
use crate::scheduler::TimerId;
use std::cell::Cell;
use std::rc::Rc;

type Action<A> = Rc<dyn Fn(&mut Page, A)>;

/// Fires once after `window_ms` of quiet, with the last call's arguments.
pub struct Debounced<A> {
    inner: Rc<DebounceState<A>>,
}

struct DebounceState<A> {
    window_ms: u64,
    action: Action<A>,
    pending: Cell<Option<TimerId>>,
}

impl<A: 'static> Debounced<A> {
    pub fn new(window_ms: u64, action: impl Fn(&mut Page, A) + 'static) -> Self {
        Self {
            inner: Rc::new(DebounceState {
                window_ms,
                action: Rc::new(action),
                pending: Cell::new(None),
            }),
        }
    }

    /// Cancel any pending call and reschedule with `args`.
    pub fn call(&self, page: &mut Page, args: A) {
        if let Some(id) = self.inner.pending.take() {
            page.clear_timeout(id);
        }
        let state = Rc::clone(&self.inner);
        let id = page.set_timeout(self.inner.window_ms, move |page| {
            state.pending.set(None);
            (state.action)(page, args);
        });
        self.inner.pending.set(Some(id));
    }

    /// Whether a call is waiting for its quiet period to end.
    pub fn is_pending(&self) -> bool {
        self.inner.pending.get().is_some()
    }
}

impl<A> Clone for Debounced<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Runs immediately, then drops calls until `window_ms` has elapsed.
pub struct Throttled<A> {
    inner: Rc<ThrottleState<A>>,
}

struct ThrottleState<A> {
    window_ms: u64,
    action: Action<A>,
    last_fired: Cell<Option<u64>>,
}

impl<A> Throttled<A> {
    pub fn new(window_ms: u64, action: impl Fn(&mut Page, A) + 'static) -> Self {
        Self {
            inner: Rc::new(ThrottleState {
                window_ms,
                action: Rc::new(action),
                last_fired: Cell::new(None),
            }),
        }
    }

    /// Run the action now unless it already ran within the window.
    /// Returns whether it ran.
    pub fn call(&self, page: &mut Page, args: A) -> bool {
        let now = page.now();
        let open = self
            .inner
            .last_fired
            .get()
            .is_none_or(|last| now.saturating_sub(last) >= self.inner.window_ms);
        if !open {
            return false;
        }
        self.inner.last_fired.set(Some(now));
        let action = Rc::clone(&self.inner.action);
        action(page, args);
        true
    }
}

impl<A> Clone for Throttled<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

pub fn debounce<A: 'static>(
    window_ms: u64,
    action: impl Fn(&mut Page, A) + 'static,
) -> Debounced<A> {
    Debounced::new(window_ms, action)
}

pub fn throttle<A>(window_ms: u64, action: impl Fn(&mut Page, A) + 'static) -> Throttled<A> {
    Throttled::new(window_ms, action)
}
