use std::fmt;
use std::rc::Rc;

use super::immediate::load_all_pending;
use super::{SharedCandidates, VisibilityStrategy};
use crate::host::{
    Host, IntersectionCallback, IntersectionEntry, IntersectionObserverHandle, LazyElement,
};
use crate::loader;
use crate::settings::Settings;

/// Watches all pending candidates with a single shared observer.
///
/// The first entry reporting a positive intersection ratio for an element
/// unobserves it and loads it. Zero-ratio entries are ignored. A target that
/// has left the document is unobserved but stays `Pending`.
pub struct ThresholdStrategy<H: Host> {
    observer: Option<H::Observer>,
}

impl<H: Host> ThresholdStrategy<H> {
    pub fn new() -> Self {
        Self { observer: None }
    }
}

impl<H: Host> Default for ThresholdStrategy<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> fmt::Debug for ThresholdStrategy<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThresholdStrategy")
            .field("watching", &self.observer.is_some())
            .finish()
    }
}

impl<H: Host> VisibilityStrategy<H> for ThresholdStrategy<H> {
    fn name(&self) -> &'static str {
        "threshold"
    }

    fn start(
        &mut self,
        host: &H,
        candidates: &SharedCandidates<H::Element>,
        settings: &Rc<Settings>,
    ) {
        self.release();

        let callback = dispatch_visible(Rc::clone(candidates), Rc::clone(settings));
        let Some(observer) = host.create_intersection_observer(&settings.observer, callback) else {
            log::warn!("lazyload: host failed to create an intersection observer, loading eagerly");
            load_all_pending(candidates, settings);
            return;
        };

        let pending = candidates.borrow().pending();
        for element in &pending {
            observer.observe(element);
        }
        log::debug!("lazyload: observing {} elements", pending.len());
        self.observer = Some(observer);
    }

    fn release(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
            log::debug!("lazyload: observer disconnected");
        }
    }

    fn is_watching(&self) -> bool {
        self.observer.is_some()
    }
}

/// Observer callback: unobserve then load every newly visible candidate, in
/// the order the host reported them.
fn dispatch_visible<E: LazyElement>(
    candidates: SharedCandidates<E>,
    settings: Rc<Settings>,
) -> IntersectionCallback<E> {
    Box::new(
        move |entries: &[IntersectionEntry<E>], observer: &dyn IntersectionObserverHandle<E>| {
            for entry in entries {
                if entry.intersection_ratio > 0.0 {
                    let target = &entry.target;
                    observer.unobserve(target);
                    if !target.is_connected() {
                        log::trace!("lazyload: detached element left pending");
                        continue;
                    }
                    if candidates.borrow_mut().mark_loaded(target) {
                        loader::load(target, &settings);
                    } else {
                        log::trace!("lazyload: ignoring entry for an element that is not pending");
                    }
                }
            }
        },
    )
}
