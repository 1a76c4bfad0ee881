//! Binding between the lightbox controller and Slate page markup.
//!
//! Expected markup:
//!
//! ```html
//! <div class="gallery-item" data-image="/a.jpg" data-title="A" data-url="/a/">
//!   <a href="/a.jpg" data-gallery-open>...</a>
//! </div>
//! <div id="lightbox" aria-hidden="true">
//!   <div class="lightbox-backdrop"></div>
//!   <button class="lightbox-close"></button>
//!   <button class="lightbox-prev"></button>
//!   <img class="lightbox-image">
//!   <button class="lightbox-next"></button>
//!   <p class="lightbox-title"></p>
//! </div>
//! ```

use tracing::debug;

use crate::dom::{ArenaDom, NodeId, SelectorSet};
use crate::error::Result;

use super::{Control, GalleryItem, LightboxView};

const LIGHTBOX_ID: &str = "lightbox";
const GALLERY_ITEM: &str = ".gallery-item";
const OPEN_TRIGGER: &str = "[data-gallery-open]";

const CLASS_ACTIVE: &str = "is-active";
const CLASS_HIDDEN: &str = "is-hidden";
const CLASS_LOADED: &str = "is-loaded";

/// The lightbox root and its working parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightboxElements {
    pub root: NodeId,
    pub image: NodeId,
    pub title: NodeId,
    pub prev: NodeId,
    pub next: NodeId,
    pub close: NodeId,
    pub backdrop: NodeId,
    /// Page `body`, where scrolling is locked.
    pub body: Option<NodeId>,
}

impl LightboxElements {
    /// Find `#lightbox` and its parts. `None` when the page has no
    /// lightbox or any part is missing.
    pub fn locate(dom: &ArenaDom) -> Result<Option<Self>> {
        let Some(root) = dom.get_by_id(LIGHTBOX_ID) else {
            return Ok(None);
        };
        let part = |selector: &str| dom.query_first_in(root, selector);

        let (Some(image), Some(title), Some(prev), Some(next), Some(close), Some(backdrop)) = (
            part(".lightbox-image")?,
            part(".lightbox-title")?,
            part(".lightbox-prev")?,
            part(".lightbox-next")?,
            part(".lightbox-close")?,
            part(".lightbox-backdrop")?,
        ) else {
            debug!("lightbox markup incomplete");
            return Ok(None);
        };

        Ok(Some(Self {
            root,
            image,
            title,
            prev,
            next,
            close,
            backdrop,
            body: dom.find_by_tag("body"),
        }))
    }
}

/// Gallery items and lightbox parts read from a page.
#[derive(Debug, Clone)]
pub struct GalleryDocument {
    pub items: Vec<GalleryItem>,
    /// Open trigger of each item, by item index.
    pub triggers: Vec<Option<NodeId>>,
    pub elements: Option<LightboxElements>,
}

impl GalleryDocument {
    /// Read every `.gallery-item` and locate the lightbox.
    ///
    /// Items keep their document position even when `data-image` is
    /// missing, so trigger indices line up with the markup.
    pub fn from_dom(dom: &ArenaDom) -> Result<Self> {
        let item_set = SelectorSet::parse(GALLERY_ITEM)?;
        let trigger_set = SelectorSet::parse(OPEN_TRIGGER)?;

        let mut items = Vec::new();
        let mut triggers = Vec::new();
        for node in dom.select_all(dom.document(), &item_set) {
            let image_url = dom.get_attr(node, "data-image").unwrap_or_default();
            if image_url.is_empty() {
                debug!(index = items.len(), "gallery item without data-image");
            }
            items.push(GalleryItem {
                image_url: image_url.to_string(),
                title: dom.get_attr(node, "data-title").unwrap_or_default().to_string(),
                link_url: dom.get_attr(node, "data-url").map(str::to_string),
            });
            triggers.push(dom.select_first(node, &trigger_set));
        }

        Ok(Self {
            items,
            triggers,
            elements: LightboxElements::locate(dom)?,
        })
    }

    /// Whether the page can drive a lightbox at all.
    pub fn is_interactive(&self) -> bool {
        self.elements.is_some() && !self.items.is_empty()
    }

    /// Map a clicked node to the control it belongs to, walking up from the
    /// click target the way event delegation would.
    pub fn control_for(&self, dom: &ArenaDom, target: NodeId) -> Option<Control> {
        let elements = self.elements.as_ref()?;
        let mut current = target;
        while let Some(node) = dom.get(current) {
            if let Some(index) = self.triggers.iter().position(|t| *t == Some(current)) {
                return Some(Control::Item(index));
            }
            match current {
                id if id == elements.prev => return Some(Control::Prev),
                id if id == elements.next => return Some(Control::Next),
                id if id == elements.close => return Some(Control::Close),
                id if id == elements.backdrop => return Some(Control::Backdrop),
                _ => {}
            }
            current = node.parent;
        }
        None
    }
}

/// [`LightboxView`] that edits the page tree.
pub struct DomView<'a> {
    dom: &'a mut ArenaDom,
    elements: LightboxElements,
    focused: Option<NodeId>,
}

impl<'a> DomView<'a> {
    pub fn new(dom: &'a mut ArenaDom, elements: LightboxElements) -> Self {
        Self {
            dom,
            elements,
            focused: None,
        }
    }

    pub fn dom(&self) -> &ArenaDom {
        self.dom
    }

    /// Element holding keyboard focus, if the lightbox moved it.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }
}

impl LightboxView for DomView<'_> {
    fn set_active(&mut self, active: bool) {
        let root = self.elements.root;
        self.dom.toggle_class(root, CLASS_ACTIVE, active);
        self.dom
            .set_attr(root, "aria-hidden", if active { "false" } else { "true" });
        if !active {
            self.focused = None;
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        let Some(body) = self.elements.body else {
            return;
        };
        let style = set_overflow(self.dom.get_attr(body, "style").unwrap_or_default(), locked);
        if style.is_empty() {
            self.dom.remove_attr(body, "style");
        } else {
            self.dom.set_attr(body, "style", &style);
        }
    }

    fn focus_close(&mut self) {
        self.focused = Some(self.elements.close);
    }

    fn set_image(&mut self, src: &str, alt: &str) {
        self.dom.set_attr(self.elements.image, "src", src);
        self.dom.set_attr(self.elements.image, "alt", alt);
    }

    fn set_title(&mut self, title: &str) {
        self.dom.set_text_content(self.elements.title, title);
    }

    fn set_loaded(&mut self, loaded: bool) {
        self.dom
            .toggle_class(self.elements.image, CLASS_LOADED, loaded);
    }

    fn set_nav_hidden(&mut self, prev_hidden: bool, next_hidden: bool) {
        self.dom
            .toggle_class(self.elements.prev, CLASS_HIDDEN, prev_hidden);
        self.dom
            .toggle_class(self.elements.next, CLASS_HIDDEN, next_hidden);
    }
}

/// Rewrite an inline style with `overflow: hidden` added or the `overflow`
/// declaration dropped, leaving other declarations alone.
fn set_overflow(style: &str, hidden: bool) -> String {
    let mut decls: Vec<&str> = style
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .filter(|d| {
            d.split_once(':')
                .is_none_or(|(prop, _)| !prop.trim().eq_ignore_ascii_case("overflow"))
        })
        .collect();
    if hidden {
        decls.push("overflow: hidden");
    }
    decls.join("; ")
}
