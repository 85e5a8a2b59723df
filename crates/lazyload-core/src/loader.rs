//! Element loader.
//!
//! Performs the single mutation that makes the host fetch an element's
//! deferred resource. Callers are responsible for invoking it at most once
//! per element.

use crate::host::{ElementKind, LazyElement};
use crate::settings::Settings;

/// Copies the deferred source attributes of `element` into its live
/// properties.
///
/// Image elements get `src` and `srcset` assigned independently; an absent
/// or empty attribute leaves the property untouched. Other elements get
/// `background-image: url(..)`, and nothing at all when the deferred source
/// is missing. Detached elements are skipped.
pub fn load<E: LazyElement>(element: &E, settings: &Settings) {
    if !element.is_connected() {
        log::trace!("lazyload: skipping detached element");
        return;
    }

    let src = deferred_value(element, &settings.src);

    match element.kind() {
        ElementKind::Image => {
            if let Some(src) = &src {
                log::trace!("lazyload: src <- {src}");
                element.set_src(src);
            }
            if let Some(srcset) = deferred_value(element, &settings.srcset) {
                log::trace!("lazyload: srcset <- {srcset}");
                element.set_srcset(&srcset);
            }
        }
        ElementKind::Generic => match src {
            Some(src) => {
                log::trace!("lazyload: background-image <- {src}");
                element.set_background_image(&background_image(&src));
            }
            None => {
                log::debug!(
                    "lazyload: element has no `{}` attribute; background left untouched",
                    settings.src
                );
            }
        },
    }
}

/// CSS value for a background image URL.
pub fn background_image(url: &str) -> String {
    format!("url({url})")
}

fn deferred_value<E: LazyElement>(element: &E, attribute: &str) -> Option<String> {
    element.attribute(attribute).filter(|value| !value.is_empty())
}
