//! Defer loading of off-screen images and background images.
//!
//! Re-exports the engine from `lazyload-core`. With the `web` feature the
//! browser host is available under [`web`] and [`lazyload_document`] wires
//! everything to the current page.
//!
//! ```rust,ignore
//! let lazy = lazyload::lazyload_document(None).expect("running in a browser");
//! ```

pub use lazyload_core::*;

#[cfg(feature = "web")]
pub use lazyload_platform_web as web;

/// Watches every element matching the `selector` option in the current
/// document.
///
/// Returns `None` outside a browsing context.
#[cfg(feature = "web")]
pub fn lazyload_document(options: Option<&Record>) -> Option<LazyLoad<web::WebHost>> {
    let Some(host) = web::WebHost::new() else {
        log::warn!("lazyload: no window or document available");
        return None;
    };
    Some(LazyLoad::new(host, None, options))
}
