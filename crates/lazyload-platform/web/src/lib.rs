//! Browser host for lazyload.
//!
//! Implements the `lazyload-core` host traits over `web-sys`: elements are
//! live DOM nodes and visibility comes from the browser's
//! `IntersectionObserver`. Script exceptions raised by the browser are
//! logged and swallowed here so the engine never sees them.

mod options;

pub use options::{options_from_js, value_from_js};

use std::cell::Cell;
use std::fmt;

use js_sys::{Array, Object, Reflect, WeakMap};
use lazyload_core::{
    ElementKind, Host, IntersectionCallback, IntersectionEntry, IntersectionObserverHandle,
    LazyElement, ObserverOptions,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, Window,
};

const INTERSECTION_OBSERVER_GLOBAL: &str = "IntersectionObserver";

thread_local! {
    static NODE_KEYS: NodeKeys = NodeKeys {
        keys: WeakMap::new(),
        next: Cell::new(0),
    };
}

/// Hands out integer keys for DOM nodes. Entries die with their node.
struct NodeKeys {
    keys: WeakMap,
    next: Cell<usize>,
}

impl NodeKeys {
    fn key_for(&self, node: &Object) -> usize {
        if let Some(key) = self.keys.get(node).as_f64() {
            return key as usize;
        }
        let key = self.next.get();
        self.next.set(key + 1);
        self.keys.set(node, &JsValue::from_f64(key as f64));
        key
    }
}

/// The current window and its document.
#[derive(Clone, Debug)]
pub struct WebHost {
    window: Window,
    document: Document,
}

impl WebHost {
    /// Returns `None` outside a browsing context (workers, non-wasm hosts).
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    pub fn from_parts(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Host for WebHost {
    type Element = WebElement;
    type Observer = WebObserver;

    fn query_selector_all(&self, selector: &str) -> Vec<WebElement> {
        let nodes = match self.document.query_selector_all(selector) {
            Ok(nodes) => nodes,
            Err(err) => {
                log::warn!("lazyload: invalid selector {selector:?}: {err:?}");
                return Vec::new();
            }
        };
        (0..nodes.length())
            .filter_map(|index| nodes.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(WebElement)
            .collect()
    }

    fn supports_intersection_observer(&self) -> bool {
        let key = JsValue::from_str(INTERSECTION_OBSERVER_GLOBAL);
        Reflect::has(&self.window, &key).unwrap_or(false)
    }

    fn create_intersection_observer(
        &self,
        options: &ObserverOptions,
        mut callback: IntersectionCallback<WebElement>,
    ) -> Option<WebObserver> {
        let closure = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                let entries: Vec<IntersectionEntry<WebElement>> = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| {
                        let ratio = entry.intersection_ratio();
                        IntersectionEntry::new(WebElement(entry.target()), ratio)
                    })
                    .collect();
                callback(entries.as_slice(), &BorrowedObserver(&observer));
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin);
        let thresholds: Array = options
            .thresholds
            .iter()
            .map(|threshold| JsValue::from_f64(*threshold))
            .collect();
        init.set_threshold(&thresholds);

        match IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init) {
            Ok(observer) => Some(WebObserver {
                observer,
                disconnected: Cell::new(false),
                _callback: closure,
            }),
            Err(err) => {
                log::warn!("lazyload: IntersectionObserver construction failed: {err:?}");
                None
            }
        }
    }
}

/// A DOM element. Equality is node identity.
#[derive(Clone, Debug, PartialEq)]
pub struct WebElement(pub Element);

impl WebElement {
    pub fn as_element(&self) -> &Element {
        &self.0
    }
}

impl From<Element> for WebElement {
    fn from(element: Element) -> Self {
        Self(element)
    }
}

impl LazyElement for WebElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn kind(&self) -> ElementKind {
        ElementKind::from_tag_name(&self.0.tag_name())
    }

    // `src` and `srcset` are only written for `ElementKind::Image`, i.e. `IMG`.
    fn set_src(&self, src: &str) {
        self.0.unchecked_ref::<HtmlImageElement>().set_src(src);
    }

    fn set_srcset(&self, srcset: &str) {
        self.0.unchecked_ref::<HtmlImageElement>().set_srcset(srcset);
    }

    fn set_background_image(&self, value: &str) {
        let Some(element) = self.0.dyn_ref::<HtmlElement>() else {
            log::warn!("lazyload: <{}> has no inline style", self.0.tag_name());
            return;
        };
        if let Err(err) = element.style().set_property("background-image", value) {
            log::warn!("lazyload: failed to set background-image: {err:?}");
        }
    }

    fn is_connected(&self) -> bool {
        self.0.is_connected()
    }

    fn same_node(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn node_key(&self) -> Option<usize> {
        Some(NODE_KEYS.with(|keys| keys.key_for(self.0.unchecked_ref::<Object>())))
    }
}

/// Owns a browser `IntersectionObserver` and the closure it calls.
///
/// Dropping it disconnects the observer first, so the browser never calls
/// into a freed closure.
pub struct WebObserver {
    observer: IntersectionObserver,
    disconnected: Cell<bool>,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl IntersectionObserverHandle<WebElement> for WebObserver {
    fn observe(&self, element: &WebElement) {
        self.observer.observe(element.as_element());
    }

    fn unobserve(&self, element: &WebElement) {
        self.observer.unobserve(element.as_element());
    }

    fn disconnect(&self) {
        if !self.disconnected.replace(true) {
            self.observer.disconnect();
        }
    }
}

impl Drop for WebObserver {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl fmt::Debug for WebObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebObserver")
            .field("disconnected", &self.disconnected.get())
            .finish()
    }
}

/// The observer handed to the callback by the browser.
struct BorrowedObserver<'a>(&'a IntersectionObserver);

impl IntersectionObserverHandle<WebElement> for BorrowedObserver<'_> {
    fn observe(&self, element: &WebElement) {
        self.0.observe(element.as_element());
    }

    fn unobserve(&self, element: &WebElement) {
        self.0.unobserve(element.as_element());
    }

    fn disconnect(&self) {
        self.0.disconnect();
    }
}
