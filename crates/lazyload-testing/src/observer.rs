//! Scriptable intersection observer.
//!
//! Nothing is delivered on its own: tests push batches with
//! [`FakeObserver::deliver`] or through the owning
//! [`FakeDocument`](crate::FakeDocument).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use lazyload_core::{
    IntersectionCallback, IntersectionEntry, IntersectionObserverHandle, LazyElement,
    ObserverOptions,
};

use crate::element::FakeElement;

struct ObserverState {
    options: ObserverOptions,
    watched: Vec<FakeElement>,
    callback: Option<IntersectionCallback<FakeElement>>,
    observe_calls: usize,
    unobserve_calls: usize,
    disconnect_calls: usize,
}

/// Shared handle to one fake observer.
#[derive(Clone)]
pub struct FakeObserver {
    inner: Rc<RefCell<ObserverState>>,
}

impl FakeObserver {
    pub(crate) fn new(
        options: ObserverOptions,
        callback: IntersectionCallback<FakeElement>,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObserverState {
                options,
                watched: Vec::new(),
                callback: Some(callback),
                observe_calls: 0,
                unobserve_calls: 0,
                disconnect_calls: 0,
            })),
        }
    }

    pub fn options(&self) -> ObserverOptions {
        self.inner.borrow().options.clone()
    }

    /// Elements currently watched, in registration order.
    pub fn watched(&self) -> Vec<FakeElement> {
        self.inner.borrow().watched.clone()
    }

    pub fn is_watching(&self, element: &FakeElement) -> bool {
        self.inner
            .borrow()
            .watched
            .iter()
            .any(|watched| watched.same_node(element))
    }

    pub fn observe_calls(&self) -> usize {
        self.inner.borrow().observe_calls
    }

    pub fn unobserve_calls(&self) -> usize {
        self.inner.borrow().unobserve_calls
    }

    pub fn disconnect_calls(&self) -> usize {
        self.inner.borrow().disconnect_calls
    }

    pub fn is_disconnected(&self) -> bool {
        self.inner.borrow().disconnect_calls > 0
    }

    /// Delivers one batch to the callback.
    ///
    /// Entries for elements that are no longer watched are dropped first, as
    /// a browser would. Empty batches are not delivered.
    pub fn deliver(&self, entries: Vec<IntersectionEntry<FakeElement>>) {
        let entries: Vec<_> = entries
            .into_iter()
            .filter(|entry| self.is_watching(&entry.target))
            .collect();
        if entries.is_empty() {
            return;
        }

        // The callback may call back into this observer.
        let callback = self.inner.borrow_mut().callback.take();
        if let Some(mut callback) = callback {
            callback(entries.as_slice(), self);
            self.inner.borrow_mut().callback = Some(callback);
        }
    }

    /// Delivers a single fully visible entry for `element`.
    pub fn reveal(&self, element: &FakeElement) {
        self.deliver(vec![IntersectionEntry::new(element.clone(), 1.0)]);
    }
}

impl IntersectionObserverHandle<FakeElement> for FakeObserver {
    fn observe(&self, element: &FakeElement) {
        let mut state = self.inner.borrow_mut();
        state.observe_calls += 1;
        if !state.watched.iter().any(|watched| watched.same_node(element)) {
            state.watched.push(element.clone());
        }
    }

    fn unobserve(&self, element: &FakeElement) {
        let mut state = self.inner.borrow_mut();
        state.unobserve_calls += 1;
        state.watched.retain(|watched| !watched.same_node(element));
    }

    fn disconnect(&self) {
        let mut state = self.inner.borrow_mut();
        state.disconnect_calls += 1;
        state.watched.clear();
    }
}

impl fmt::Debug for FakeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("FakeObserver")
            .field("options", &state.options)
            .field("watched", &state.watched.len())
            .field("disconnect_calls", &state.disconnect_calls)
            .finish()
    }
}
