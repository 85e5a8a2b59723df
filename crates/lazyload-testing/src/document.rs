//! In-memory host document.

use std::cell::RefCell;
use std::rc::Rc;

use lazyload_core::{Host, IntersectionCallback, IntersectionEntry, ObserverOptions};

use crate::element::{Bounds, FakeElement};
use crate::observer::FakeObserver;

pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 600.0;

struct DocumentState {
    elements: Vec<FakeElement>,
    observers: Vec<FakeObserver>,
    intersection_supported: bool,
    observer_creation_fails: bool,
    viewport: Bounds,
}

/// A document with a vertical viewport and fake intersection observers.
///
/// Clones share the same document.
#[derive(Clone)]
pub struct FakeDocument {
    inner: Rc<RefCell<DocumentState>>,
}

impl FakeDocument {
    /// A document whose host supports intersection observers.
    pub fn new() -> Self {
        Self::with_capabilities(true, false)
    }

    /// A document whose host has no intersection observer at all.
    pub fn without_intersection_observer() -> Self {
        Self::with_capabilities(false, false)
    }

    /// Advertises observer support, but every construction attempt fails.
    pub fn with_failing_observer() -> Self {
        Self::with_capabilities(true, true)
    }

    fn with_capabilities(intersection_supported: bool, observer_creation_fails: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new(DocumentState {
                elements: Vec::new(),
                observers: Vec::new(),
                intersection_supported,
                observer_creation_fails,
                viewport: Bounds {
                    top: 0.0,
                    height: DEFAULT_VIEWPORT_HEIGHT,
                },
            })),
        }
    }

    /// Appends `element` and returns it for chaining.
    pub fn append(&self, element: FakeElement) -> FakeElement {
        element.set_connected(true);
        self.inner.borrow_mut().elements.push(element.clone());
        element
    }

    /// Detaches `element` from the document. Existing handles stay valid.
    pub fn remove(&self, element: &FakeElement) {
        element.set_connected(false);
        self.inner.borrow_mut().elements.retain(|existing| existing != element);
    }

    pub fn elements(&self) -> Vec<FakeElement> {
        self.inner.borrow().elements.clone()
    }

    /// Every observer created so far, oldest first.
    pub fn observers(&self) -> Vec<FakeObserver> {
        self.inner.borrow().observers.clone()
    }

    pub fn last_observer(&self) -> Option<FakeObserver> {
        self.inner.borrow().observers.last().cloned()
    }

    pub fn viewport(&self) -> Bounds {
        self.inner.borrow().viewport
    }

    /// Moves the viewport and delivers one batch per observer covering every
    /// element it watches, visible or not.
    pub fn scroll_to(&self, top: f64) {
        let viewport = {
            let mut state = self.inner.borrow_mut();
            state.viewport.top = top;
            state.viewport
        };

        for observer in self.observers() {
            let entries = observer
                .watched()
                .into_iter()
                .map(|element| {
                    let ratio = intersection_ratio(element.bounds(), viewport);
                    IntersectionEntry::new(element, ratio)
                })
                .collect();
            observer.deliver(entries);
        }
    }

    /// Delivers a fully visible entry for `element` to every observer
    /// watching it.
    pub fn reveal(&self, element: &FakeElement) {
        for observer in self.observers() {
            observer.reveal(element);
        }
    }
}

impl Default for FakeDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for FakeDocument {
    type Element = FakeElement;
    type Observer = FakeObserver;

    fn query_selector_all(&self, selector: &str) -> Vec<FakeElement> {
        self.inner
            .borrow()
            .elements
            .iter()
            .filter(|element| element.matches(selector))
            .cloned()
            .collect()
    }

    fn supports_intersection_observer(&self) -> bool {
        self.inner.borrow().intersection_supported
    }

    fn create_intersection_observer(
        &self,
        options: &ObserverOptions,
        callback: IntersectionCallback<FakeElement>,
    ) -> Option<FakeObserver> {
        let mut state = self.inner.borrow_mut();
        if !state.intersection_supported || state.observer_creation_fails {
            log::debug!("fake document: refusing to create an intersection observer");
            return None;
        }
        let observer = FakeObserver::new(options.clone(), callback);
        state.observers.push(observer.clone());
        Some(observer)
    }
}

/// Visible fraction of `bounds` inside `viewport`.
pub fn intersection_ratio(bounds: Bounds, viewport: Bounds) -> f64 {
    if bounds.height <= 0.0 {
        return 0.0;
    }
    let overlap = bounds.bottom().min(viewport.bottom()) - bounds.top.max(viewport.top);
    (overlap / bounds.height).clamp(0.0, 1.0)
}
