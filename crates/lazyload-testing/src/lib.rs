//! Testing utilities and harness for lazyload
//!
//! Provides a [`FakeDocument`] host with [`FakeElement`]s laid out on a
//! vertical axis and [`FakeObserver`]s that only deliver when a test tells
//! them to.

pub mod document;
pub mod element;
pub mod observer;

pub use document::*;
pub use element::*;
pub use observer::*;

pub mod prelude {
    pub use crate::{FakeDocument, FakeElement, FakeObserver};
    pub use lazyload_core::{IntersectionEntry, LazyElement, LazyLoad, Record};
}
