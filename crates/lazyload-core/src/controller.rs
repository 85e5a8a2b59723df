//! Lifecycle controller.
//!
//! [`LazyLoad`] is the object users hold. It owns the merged settings, the
//! candidate elements captured at construction and the active
//! [`VisibilityStrategy`].

use std::fmt;
use std::rc::Rc;

use crate::host::Host;
use crate::loader;
use crate::record::Record;
use crate::settings::Settings;
use crate::visibility::{
    select_strategy, CandidateSet, LazyLoadStats, SharedCandidates, VisibilityStrategy,
};

/// Whether a controller still responds to lifecycle calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    /// Terminal. Every public operation is a no-op.
    Destroyed,
}

/// Defers loading of a fixed set of elements until they become visible.
///
/// Construction immediately starts watching. Dropping the controller
/// releases the host subscription, so keep it alive for as long as elements
/// should keep loading.
///
/// # Example
///
/// ```rust,ignore
/// let host = WebHost::new().expect("browser window");
/// let mut lazy = LazyLoad::new(host, None, Some(&Record::new().with("src", "data-original")));
///
/// // Later, e.g. before printing:
/// lazy.load_and_destroy();
/// ```
pub struct LazyLoad<H: Host + 'static> {
    host: H,
    settings: Rc<Settings>,
    images: Vec<H::Element>,
    candidates: SharedCandidates<H::Element>,
    strategy: Option<Box<dyn VisibilityStrategy<H>>>,
    lifecycle: Lifecycle,
}

impl<H: Host + 'static> LazyLoad<H> {
    /// Creates a controller and runs [`LazyLoad::init`].
    ///
    /// `elements` defaults to every node matching the `selector` option.
    /// Repeated handles to the same node are kept once.
    pub fn new(host: H, elements: Option<Vec<H::Element>>, options: Option<&Record>) -> Self {
        let settings = Rc::new(Settings::from_options(options));
        let elements = elements.unwrap_or_else(|| host.query_selector_all(&settings.selector));
        let candidates = CandidateSet::new(elements).shared();
        let images: Vec<H::Element> = candidates.borrow().elements().cloned().collect();

        let mut lazy = Self {
            host,
            settings,
            images,
            candidates,
            strategy: None,
            lifecycle: Lifecycle::Active,
        };
        lazy.init();
        lazy
    }

    /// Starts the strategy the host supports over the still pending
    /// elements, replacing any strategy already running.
    pub fn init(&mut self) {
        if self.is_destroyed() {
            return;
        }
        if let Some(mut previous) = self.strategy.take() {
            previous.release();
        }

        let mut strategy = select_strategy(&self.host);
        log::debug!(
            "lazyload: init with {} strategy, {} candidates",
            strategy.name(),
            self.images.len()
        );
        strategy.start(&self.host, &self.candidates, &self.settings);
        self.strategy = Some(strategy);
    }

    /// Loads every candidate now, whatever its visibility.
    ///
    /// Candidates stay registered with the strategy.
    pub fn load_images(&self) {
        if self.is_destroyed() {
            return;
        }
        for image in &self.images {
            loader::load(image, &self.settings);
        }
    }

    /// [`load_images`](Self::load_images) followed by [`destroy`](Self::destroy).
    pub fn load_and_destroy(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.load_images();
        self.destroy();
    }

    /// Releases the host subscription and makes the controller inert.
    pub fn destroy(&mut self) {
        if self.is_destroyed() {
            return;
        }
        if let Some(mut strategy) = self.strategy.take() {
            strategy.release();
        }
        self.lifecycle = Lifecycle::Destroyed;
        log::debug!("lazyload: destroyed");
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_destroyed(&self) -> bool {
        self.lifecycle == Lifecycle::Destroyed
    }

    /// The merged settings, or `None` once destroyed.
    pub fn settings(&self) -> Option<&Settings> {
        match self.lifecycle {
            Lifecycle::Active => Some(&self.settings),
            Lifecycle::Destroyed => None,
        }
    }

    /// Candidate elements in the order they were captured.
    pub fn images(&self) -> &[H::Element] {
        &self.images
    }

    pub fn stats(&self) -> LazyLoadStats {
        self.candidates.borrow().stats()
    }

    /// Name of the running strategy, if any.
    pub fn strategy_name(&self) -> Option<&'static str> {
        self.strategy.as_ref().map(|strategy| strategy.name())
    }

    /// Whether a host subscription is currently held.
    pub fn is_watching(&self) -> bool {
        self.strategy
            .as_ref()
            .is_some_and(|strategy| strategy.is_watching())
    }
}

impl<H: Host + 'static> Drop for LazyLoad<H> {
    fn drop(&mut self) {
        if let Some(mut strategy) = self.strategy.take() {
            strategy.release();
        }
    }
}

impl<H: Host + 'static> fmt::Debug for LazyLoad<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyLoad")
            .field("settings", &self.settings)
            .field("images", &self.images.len())
            .field("strategy", &self.strategy_name())
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

/// Shorthand for [`LazyLoad::new`].
pub fn lazyload<H: Host + 'static>(
    host: H,
    elements: Option<Vec<H::Element>>,
    options: Option<&Record>,
) -> LazyLoad<H> {
    LazyLoad::new(host, elements, options)
}
