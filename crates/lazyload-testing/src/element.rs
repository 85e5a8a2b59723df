//! In-memory element handle.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use lazyload_core::{ElementKind, LazyElement};
use smallvec::SmallVec;

/// Vertical extent of an element in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub height: f64,
}

impl Bounds {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug)]
struct ElementState {
    tag_name: String,
    attributes: Vec<(String, String)>,
    classes: SmallVec<[String; 2]>,
    src: Option<String>,
    srcset: Option<String>,
    background_image: Option<String>,
    bounds: Bounds,
    connected: bool,
    mutations: usize,
}

/// A fake DOM node. Clones share state; equality is identity.
#[derive(Clone)]
pub struct FakeElement {
    inner: Rc<RefCell<ElementState>>,
}

impl FakeElement {
    pub fn new(tag_name: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ElementState {
                tag_name: tag_name.to_ascii_uppercase(),
                attributes: Vec::new(),
                classes: SmallVec::new(),
                src: None,
                srcset: None,
                background_image: None,
                bounds: Bounds {
                    top: 0.0,
                    height: 100.0,
                },
                connected: true,
                mutations: 0,
            })),
        }
    }

    pub fn img() -> Self {
        Self::new("img")
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    /// Sets an attribute; `class` also updates the class list.
    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        {
            let mut state = self.inner.borrow_mut();
            if !state.classes.iter().any(|existing| existing == class) {
                state.classes.push(class.to_owned());
            }
        }
        self
    }

    /// Places the element `top` pixels from the document start.
    pub fn at(self, top: f64, height: f64) -> Self {
        self.inner.borrow_mut().bounds = Bounds { top, height };
        self
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        let mut state = self.inner.borrow_mut();
        if name == "class" {
            state.classes = value.split_whitespace().map(str::to_owned).collect();
        }
        match state.attributes.iter().position(|(key, _)| key == name) {
            Some(index) => state.attributes[index].1 = value.to_owned(),
            None => state.attributes.push((name.to_owned(), value.to_owned())),
        }
    }

    /// Live `src` property, `None` if never assigned.
    pub fn src(&self) -> Option<String> {
        self.inner.borrow().src.clone()
    }

    pub fn srcset(&self) -> Option<String> {
        self.inner.borrow().srcset.clone()
    }

    pub fn background_image(&self) -> Option<String> {
        self.inner.borrow().background_image.clone()
    }

    /// Number of property writes made through [`LazyElement`].
    pub fn mutation_count(&self) -> usize {
        self.inner.borrow().mutations
    }

    pub fn tag_name(&self) -> String {
        self.inner.borrow().tag_name.clone()
    }

    pub fn id(&self) -> Option<String> {
        self.attribute("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.inner.borrow().classes.iter().any(|c| c == class)
    }

    pub fn bounds(&self) -> Bounds {
        self.inner.borrow().bounds
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.inner.borrow_mut().connected = connected;
    }

    /// Simple selector matching: comma separated compounds of an optional
    /// tag (or `*`) followed by `.class` and `#id` parts.
    pub fn matches(&self, selector: &str) -> bool {
        selector
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .any(|part| self.matches_compound(part))
    }

    fn matches_compound(&self, compound: &str) -> bool {
        let split = compound.find(['.', '#']).unwrap_or(compound.len());
        let (tag, rest) = compound.split_at(split);
        if !tag.is_empty() && tag != "*" && !self.tag_name().eq_ignore_ascii_case(tag) {
            return false;
        }

        let mut remaining = rest;
        while let Some(marker) = remaining.chars().next() {
            let body = &remaining[1..];
            let end = body.find(['.', '#']).unwrap_or(body.len());
            let name = &body[..end];
            let matched = match marker {
                '.' => self.has_class(name),
                '#' => self.id().as_deref() == Some(name),
                _ => false,
            };
            if !matched {
                return false;
            }
            remaining = &body[end..];
        }
        true
    }

    fn record_mutation(&self, apply: impl FnOnce(&mut ElementState)) {
        let mut state = self.inner.borrow_mut();
        apply(&mut state);
        state.mutations += 1;
    }
}

impl LazyElement for FakeElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    fn kind(&self) -> ElementKind {
        ElementKind::from_tag_name(&self.inner.borrow().tag_name)
    }

    fn set_src(&self, src: &str) {
        self.record_mutation(|state| state.src = Some(src.to_owned()));
    }

    fn set_srcset(&self, srcset: &str) {
        self.record_mutation(|state| state.srcset = Some(srcset.to_owned()));
    }

    fn set_background_image(&self, value: &str) {
        self.record_mutation(|state| state.background_image = Some(value.to_owned()));
    }

    fn is_connected(&self) -> bool {
        self.inner.borrow().connected
    }

    fn same_node(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn node_key(&self) -> Option<usize> {
        Some(Rc::as_ptr(&self.inner) as usize)
    }
}

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        self.same_node(other)
    }
}

impl fmt::Debug for FakeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("FakeElement")
            .field("tag_name", &state.tag_name)
            .field("attributes", &state.attributes)
            .field("src", &state.src)
            .field("background_image", &state.background_image)
            .finish()
    }
}
