//! WASM bindings for running the theme passes in the browser.
//!
//! Page passes take and return HTML strings. The lightbox is exposed as a
//! class whose view state JavaScript reads back after each call and applies
//! to the real elements.

use wasm_bindgen::prelude::*;

use crate::dom::{parse_html, to_html};
use crate::lightbox::{GalleryItem, Key, Lightbox, LightboxState, ViewState};
use crate::reflow::ReflowConfig;
use crate::theme::{Theme, ThemeConfig, process_page};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

fn js_error(e: crate::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Run every Ember page pass over `html`.
#[wasm_bindgen]
pub fn process_ember_page(html: &str, host: &str) -> Result<String, JsValue> {
    let config = ThemeConfig::new(Theme::Ember).with_host(host);
    let (html, _) = process_page(html, &config).map_err(js_error)?;
    Ok(html)
}

/// Reflow the apps container in `html`.
#[wasm_bindgen]
pub fn reflow_apps(html: &str) -> Result<String, JsValue> {
    let mut dom = parse_html(html);
    crate::reflow::reflow_apps(&mut dom, &ReflowConfig::default()).map_err(js_error)?;
    Ok(to_html(&dom))
}

/// Mark links to other hosts to open in a new tab.
#[wasm_bindgen]
pub fn rewrite_external_links(html: &str, host: &str) -> String {
    let mut dom = parse_html(html);
    crate::links::rewrite_external_links(&mut dom, host);
    to_html(&dom)
}

/// Gallery lightbox driven from JavaScript.
///
/// Methods that start an image load return its ticket, or `-1` when nothing
/// changed. Pass the ticket to `imageLoaded` from the image's `load` event.
#[wasm_bindgen]
pub struct WasmLightbox {
    inner: Lightbox<ViewState>,
    pending: Vec<GalleryItem>,
}

#[wasm_bindgen]
impl WasmLightbox {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: Lightbox::new(Vec::new(), ViewState::default()),
            pending: Vec::new(),
        }
    }

    /// Queue one gallery item. Call `build` once all items are added.
    #[wasm_bindgen(js_name = addItem)]
    pub fn add_item(&mut self, image_url: &str, title: &str) {
        self.pending.push(GalleryItem::new(image_url, title));
    }

    /// Replace the gallery with the queued items. A non-positive threshold
    /// keeps the default swipe distance.
    pub fn build(&mut self, swipe_threshold: f64) {
        let mut config = ThemeConfig::new(Theme::Slate);
        if swipe_threshold > 0.0 {
            config = config.with_swipe_threshold(swipe_threshold);
        }
        let items = std::mem::take(&mut self.pending);
        self.inner = config.lightbox(items, ViewState::default());
    }

    #[wasm_bindgen(getter, js_name = swipeThreshold)]
    pub fn swipe_threshold(&self) -> f64 {
        self.inner.swipe_threshold()
    }

    pub fn open(&mut self, index: usize) -> f64 {
        ticket(self.inner.open(index).map(|t| t.generation))
    }

    pub fn close(&mut self) {
        self.inner.close();
    }

    pub fn next(&mut self) -> f64 {
        ticket(self.inner.next().map(|t| t.generation))
    }

    pub fn prev(&mut self) -> f64 {
        ticket(self.inner.prev().map(|t| t.generation))
    }

    /// Handle a `keydown` by its `KeyboardEvent.key`.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) -> f64 {
        ticket(self.inner.key_down(Key::from_name(key)).map(|t| t.generation))
    }

    #[wasm_bindgen(js_name = touchStart)]
    pub fn touch_start(&mut self, x: f64) {
        self.inner.touch_start(x);
    }

    #[wasm_bindgen(js_name = touchEnd)]
    pub fn touch_end(&mut self, x: f64) -> f64 {
        ticket(self.inner.touch_end(x).map(|t| t.generation))
    }

    /// Report a finished image load. Returns whether it was still current.
    #[wasm_bindgen(js_name = imageLoaded)]
    pub fn image_loaded(&mut self, generation: f64) -> bool {
        let Some(index) = self.inner.current_index() else {
            return false;
        };
        self.inner.image_loaded(crate::lightbox::LoadTicket {
            generation: generation as u64,
            index,
        })
    }

    /// Current index, or `-1` when closed.
    #[wasm_bindgen(getter)]
    pub fn index(&self) -> f64 {
        match self.inner.state() {
            LightboxState::Open(index) => index as f64,
            LightboxState::Closed => -1.0,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.inner.view().active
    }

    #[wasm_bindgen(getter, js_name = scrollLocked)]
    pub fn scroll_locked(&self) -> bool {
        self.inner.view().scroll_locked
    }

    #[wasm_bindgen(getter, js_name = imageSrc)]
    pub fn image_src(&self) -> String {
        self.inner.view().image_src.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn title(&self) -> String {
        self.inner.view().title.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn loaded(&self) -> bool {
        self.inner.view().loaded
    }

    #[wasm_bindgen(getter, js_name = prevHidden)]
    pub fn prev_hidden(&self) -> bool {
        self.inner.view().prev_hidden
    }

    #[wasm_bindgen(getter, js_name = nextHidden)]
    pub fn next_hidden(&self) -> bool {
        self.inner.view().next_hidden
    }
}

impl Default for WasmLightbox {
    fn default() -> Self {
        Self::new()
    }
}

fn ticket(generation: Option<u64>) -> f64 {
    generation.map_or(-1.0, |g| g as f64)
}
