use std::rc::Rc;

use super::{SharedCandidates, VisibilityStrategy};
use crate::host::{Host, LazyElement};
use crate::loader;
use crate::settings::Settings;

/// Loads every pending candidate as soon as it starts. Holds no
/// subscription.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateStrategy;

impl<H: Host> VisibilityStrategy<H> for ImmediateStrategy {
    fn name(&self) -> &'static str {
        "immediate"
    }

    fn start(
        &mut self,
        _host: &H,
        candidates: &SharedCandidates<H::Element>,
        settings: &Rc<Settings>,
    ) {
        load_all_pending(candidates, settings);
    }

    fn release(&mut self) {}

    fn is_watching(&self) -> bool {
        false
    }
}

/// Loads every pending candidate still attached to the document. Detached
/// ones stay `Pending` so a later `init` can pick them up.
pub(crate) fn load_all_pending<E: LazyElement>(
    candidates: &SharedCandidates<E>,
    settings: &Settings,
) {
    let pending = candidates.borrow().pending();
    log::debug!("lazyload: loading {} elements immediately", pending.len());
    for element in &pending {
        if !element.is_connected() {
            log::trace!("lazyload: detached element left pending");
            continue;
        }
        if candidates.borrow_mut().mark_loaded(element) {
            loader::load(element, settings);
        }
    }
}
