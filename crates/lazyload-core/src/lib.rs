//! Visibility-driven deferred loading of images and background images.
//!
//! Elements carry their real source in an attribute (`data-src` by default).
//! A [`LazyLoad`] controller watches them through the host's intersection
//! observer and copies that attribute into the live `src`, `srcset` or
//! `background-image` the first time each element scrolls into view. Hosts
//! without an observer get everything loaded at once.
//!
//! The crate is host-agnostic: see [`host`] for the traits a document
//! environment implements.

pub mod controller;
pub mod host;
pub mod loader;
pub mod merge;
pub mod record;
pub mod settings;
pub mod visibility;

pub use controller::{lazyload, LazyLoad, Lifecycle};
pub use host::{
    ElementKind, Host, IntersectionCallback, IntersectionEntry, IntersectionObserverHandle,
    LazyElement,
};
pub use loader::load;
pub use merge::merge;
pub use record::{is_plain_record, Record, Value};
pub use settings::{default_options, ObserverOptions, Settings};
pub use visibility::{
    select_strategy, CandidateSet, ImmediateStrategy, LazyLoadStats, LoadState, ThresholdStrategy,
    VisibilityStrategy,
};
