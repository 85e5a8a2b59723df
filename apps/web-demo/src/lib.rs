use js_sys::Array;
use lazyload::web::{options_from_js, WebElement, WebHost};
use lazyload::{LazyLoad, LazyLoadStats};
use wasm_bindgen::prelude::*;
use web_sys::{Element, NodeList};

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("lazyload demo ready");
}

/// JS handle around a controller.
#[wasm_bindgen]
pub struct LazyLoadHandle {
    inner: LazyLoad<WebHost>,
}

#[wasm_bindgen]
impl LazyLoadHandle {
    pub fn init(&mut self) {
        self.inner.init();
    }

    #[wasm_bindgen(js_name = loadImages)]
    pub fn load_images(&self) {
        self.inner.load_images();
    }

    #[wasm_bindgen(js_name = loadAndDestroy)]
    pub fn load_and_destroy(&mut self) {
        self.inner.load_and_destroy();
    }

    pub fn destroy(&mut self) {
        self.inner.destroy();
    }

    #[wasm_bindgen(getter)]
    pub fn pending(&self) -> usize {
        let LazyLoadStats { pending, .. } = self.inner.stats();
        pending
    }
}

/// `lazyload(images?, options?)`, where `images` is a `NodeList`, an array
/// of elements, or nothing to use the `selector` option.
#[wasm_bindgen]
pub fn lazyload(images: JsValue, options: JsValue) -> Result<LazyLoadHandle, JsValue> {
    let host = WebHost::new()
        .ok_or_else(|| JsValue::from_str("lazyload needs a window and document"))?;
    let options = (!options.is_undefined() && !options.is_null())
        .then(|| options_from_js(&options));
    let elements = elements_from_js(&images);

    Ok(LazyLoadHandle {
        inner: LazyLoad::new(host, elements, options.as_ref()),
    })
}

fn elements_from_js(images: &JsValue) -> Option<Vec<WebElement>> {
    if images.is_undefined() || images.is_null() {
        return None;
    }
    let elements = if let Some(list) = images.dyn_ref::<NodeList>() {
        (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(WebElement)
            .collect()
    } else if Array::is_array(images) {
        Array::from(images)
            .iter()
            .filter_map(|item| item.dyn_into::<Element>().ok())
            .map(WebElement)
            .collect()
    } else if let Some(element) = images.dyn_ref::<Element>() {
        vec![WebElement(element.clone())]
    } else {
        log::warn!("lazyload: ignoring unsupported `images` argument");
        return None;
    };
    Some(elements)
}
