//! Host environment collaborators.
//!
//! The engine never touches a concrete DOM. A host supplies candidate
//! elements, mutates them on request and, when it can, an intersection
//! observer. `lazyload-platform-web` implements these traits over `web-sys`;
//! `lazyload-testing` implements them in memory.

use crate::settings::ObserverOptions;

/// Tag classification relevant to loading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// An `<img>` element: loading assigns `src` / `srcset`.
    Image,
    /// Anything else: loading assigns a background image.
    Generic,
}

impl ElementKind {
    /// Classifies a tag name, case-insensitively.
    pub fn from_tag_name(tag_name: &str) -> Self {
        if tag_name.eq_ignore_ascii_case("img") {
            ElementKind::Image
        } else {
            ElementKind::Generic
        }
    }
}

/// Handle to a node in the host document.
///
/// Handles are cheap to clone and compare by node identity, never by
/// content. The engine only observes and mutates elements; it never creates
/// or destroys them.
pub trait LazyElement: Clone + 'static {
    fn attribute(&self, name: &str) -> Option<String>;

    fn kind(&self) -> ElementKind;

    fn set_src(&self, src: &str);

    fn set_srcset(&self, srcset: &str);

    /// Sets the `background-image` style property to `value`.
    fn set_background_image(&self, value: &str);

    /// Whether the node is still attached to its document.
    fn is_connected(&self) -> bool {
        true
    }

    /// Reference equality.
    fn same_node(&self, other: &Self) -> bool;

    /// Identity key, unique among live nodes and stable while the node is
    /// alive. Without one, candidate lookup scans with `same_node`.
    fn node_key(&self) -> Option<usize> {
        None
    }
}

/// One visibility report for a watched element.
#[derive(Clone, Debug)]
pub struct IntersectionEntry<E> {
    pub target: E,
    /// Fraction of the target's box inside the root, in `[0, 1]`.
    pub intersection_ratio: f64,
}

impl<E> IntersectionEntry<E> {
    pub fn new(target: E, intersection_ratio: f64) -> Self {
        Self {
            target,
            intersection_ratio,
        }
    }
}

/// Subscription to the host's intersection-detection primitive.
pub trait IntersectionObserverHandle<E> {
    fn observe(&self, element: &E);

    /// Stops reporting `element`. Unwatched elements are ignored.
    fn unobserve(&self, element: &E);

    /// Stops reporting every element.
    fn disconnect(&self);
}

/// Invoked by the host with each batch of entries and the observer that
/// produced them.
pub type IntersectionCallback<E> =
    Box<dyn FnMut(&[IntersectionEntry<E>], &dyn IntersectionObserverHandle<E>)>;

/// The host document and its capabilities.
pub trait Host {
    type Element: LazyElement;
    type Observer: IntersectionObserverHandle<Self::Element> + 'static;

    /// All elements currently matching `selector`, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Element>;

    /// Whether the intersection-detection primitive exists at all.
    fn supports_intersection_observer(&self) -> bool;

    /// Creates one observer that reports to `callback`.
    ///
    /// Returns `None` if the host could not build it.
    fn create_intersection_observer(
        &self,
        options: &ObserverOptions,
        callback: IntersectionCallback<Self::Element>,
    ) -> Option<Self::Observer>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_classification() {
        assert_eq!(ElementKind::from_tag_name("IMG"), ElementKind::Image);
        assert_eq!(ElementKind::from_tag_name("img"), ElementKind::Image);
        assert_eq!(ElementKind::from_tag_name("DIV"), ElementKind::Generic);
        assert_eq!(ElementKind::from_tag_name("picture"), ElementKind::Generic);
    }
}
