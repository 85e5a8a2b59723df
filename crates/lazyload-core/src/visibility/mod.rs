//! Visibility engine.
//!
//! Decides when each candidate loads. Two strategies implement
//! [`VisibilityStrategy`]:
//! - [`ThresholdStrategy`] - one shared intersection observer; an element
//!   loads the first time it intersects the viewport
//! - [`ImmediateStrategy`] - fallback when the host has no observer; loads
//!   everything at start
//!
//! Both move candidates through the same `Pending -> Loaded` table
//! ([`CandidateSet`]), so an element is dispatched at most once no matter
//! how often a strategy is restarted.

mod candidates;
mod immediate;
mod threshold;

pub use candidates::*;
pub use immediate::*;
pub use threshold::*;

use std::rc::Rc;

use crate::host::Host;
use crate::settings::Settings;

/// How a controller turns visibility into loads.
pub trait VisibilityStrategy<H: Host> {
    /// Short name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Begins handling the pending candidates.
    fn start(
        &mut self,
        host: &H,
        candidates: &SharedCandidates<H::Element>,
        settings: &Rc<Settings>,
    );

    /// Drops any host subscription. Safe to call repeatedly.
    fn release(&mut self);

    /// Whether a host subscription is currently held.
    fn is_watching(&self) -> bool;
}

/// Picks the strategy the host can support.
pub fn select_strategy<H: Host + 'static>(host: &H) -> Box<dyn VisibilityStrategy<H>> {
    if host.supports_intersection_observer() {
        Box::new(ThresholdStrategy::new())
    } else {
        log::debug!("lazyload: no intersection observer available, loading eagerly");
        Box::new(ImmediateStrategy)
    }
}
