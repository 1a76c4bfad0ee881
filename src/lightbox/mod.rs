//! Gallery lightbox controller.
//!
//! The controller owns the gallery items and the navigation state and
//! renders through a [`LightboxView`]. It never touches a document itself,
//! which keeps it usable from the CLI, from WebAssembly and from tests.
//!
//! State is either closed or open at an index. Navigation stops at both ends
//! of the gallery; there is no wraparound. Every image request is tagged
//! with a [`LoadTicket`], and a load completion only counts if its ticket is
//! still current, so an image the user has already navigated away from can
//! not flip the loaded flag.
//!
//! # Example
//!
//! ```
//! use themekit::lightbox::{GalleryItem, Lightbox, ViewState};
//!
//! let items = vec![
//!     GalleryItem::new("/a.jpg", "A"),
//!     GalleryItem::new("/b.jpg", "B"),
//! ];
//! let mut lightbox = Lightbox::new(items, ViewState::default());
//!
//! let ticket = lightbox.open(0).unwrap();
//! assert!(lightbox.view().prev_hidden);
//! lightbox.next();
//! assert!(!lightbox.image_loaded(ticket), "superseded load is ignored");
//! ```

mod document;
mod input;
mod view;

pub use document::{DomView, GalleryDocument, LightboxElements};
pub use input::{Key, SWIPE_THRESHOLD, Swipe, SwipeTracker};
pub use view::{LightboxView, ViewState};

use tracing::{debug, trace};

/// One gallery image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub image_url: String,
    /// May be empty.
    pub title: String,
    /// Carried along from the markup; not used when rendering.
    pub link_url: Option<String>,
}

impl GalleryItem {
    pub fn new(image_url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            title: title.into(),
            link_url: None,
        }
    }

    pub fn with_link(mut self, link_url: impl Into<String>) -> Self {
        self.link_url = Some(link_url.into());
        self
    }
}

/// Lightbox state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxState {
    Closed,
    Open(usize),
}

/// Identifies one image request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub index: usize,
}

/// Clickable parts of the lightbox and gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// The open trigger of the item at this index.
    Item(usize),
    Prev,
    Next,
    Close,
    Backdrop,
}

/// Lightbox controller over a fixed list of items.
#[derive(Debug)]
pub struct Lightbox<V: LightboxView> {
    items: Vec<GalleryItem>,
    state: LightboxState,
    generation: u64,
    swipe: SwipeTracker,
    view: V,
}

impl<V: LightboxView> Lightbox<V> {
    pub fn new(items: Vec<GalleryItem>, view: V) -> Self {
        Self {
            items,
            state: LightboxState::Closed,
            generation: 0,
            swipe: SwipeTracker::default(),
            view,
        }
    }

    /// Use a different minimum swipe distance.
    pub fn with_swipe_threshold(mut self, threshold: f64) -> Self {
        self.swipe = SwipeTracker::new(threshold);
        self
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn state(&self) -> LightboxState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, LightboxState::Open(_))
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            LightboxState::Open(index) => Some(index),
            LightboxState::Closed => None,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Minimum horizontal travel for a touch to count as a swipe.
    pub fn swipe_threshold(&self) -> f64 {
        self.swipe.threshold()
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Open at `index`. Ignored for an index outside the gallery, which
    /// includes every index of an empty gallery.
    pub fn open(&mut self, index: usize) -> Option<LoadTicket> {
        if index >= self.items.len() {
            debug!(index, len = self.items.len(), "open ignored");
            return None;
        }

        let ticket = self.show(index);
        self.view.set_active(true);
        self.view.set_scroll_locked(true);
        self.view.focus_close();
        Some(ticket)
    }

    /// Move to `index` while open. Out-of-range targets are ignored.
    pub fn navigate_to(&mut self, index: isize) -> Option<LoadTicket> {
        if !self.is_open() {
            return None;
        }
        let index = usize::try_from(index).ok().filter(|&i| i < self.items.len())?;
        Some(self.show(index))
    }

    pub fn next(&mut self) -> Option<LoadTicket> {
        let index = self.current_index()?;
        self.navigate_to(index as isize + 1)
    }

    pub fn prev(&mut self) -> Option<LoadTicket> {
        let index = self.current_index()?;
        self.navigate_to(index as isize - 1)
    }

    /// Close the lightbox and restore page scrolling.
    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        self.state = LightboxState::Closed;
        self.generation += 1;
        self.swipe.reset();

        self.view.set_active(false);
        self.view.set_scroll_locked(false);
        self.view.set_loaded(false);
    }

    /// Report that the image requested with `ticket` finished loading.
    /// Returns whether the loaded flag was set.
    pub fn image_loaded(&mut self, ticket: LoadTicket) -> bool {
        if ticket.generation != self.generation || self.current_index() != Some(ticket.index) {
            trace!(?ticket, current = self.generation, "stale image load");
            return false;
        }
        self.view.set_loaded(true);
        true
    }

    /// Handle a key press. Returns a ticket when it caused navigation.
    pub fn key_down(&mut self, key: Key) -> Option<LoadTicket> {
        if !self.is_open() {
            return None;
        }
        match key {
            Key::Escape => {
                self.close();
                None
            }
            Key::ArrowLeft => self.prev(),
            Key::ArrowRight => self.next(),
            Key::Other => None,
        }
    }

    pub fn touch_start(&mut self, screen_x: f64) {
        if self.is_open() {
            self.swipe.start(screen_x);
        }
    }

    /// Finish a touch. A leftward swipe shows the next item, a rightward one
    /// the previous item.
    pub fn touch_end(&mut self, screen_x: f64) -> Option<LoadTicket> {
        if !self.is_open() {
            return None;
        }
        match self.swipe.end(screen_x)? {
            Swipe::Left => self.next(),
            Swipe::Right => self.prev(),
        }
    }

    /// Dispatch a click on one of the lightbox or gallery controls.
    pub fn click(&mut self, control: Control) -> Option<LoadTicket> {
        match control {
            Control::Item(index) => self.open(index),
            Control::Prev => self.prev(),
            Control::Next => self.next(),
            Control::Close | Control::Backdrop => {
                self.close();
                None
            }
        }
    }

    /// Switch to `index` and push its content to the view.
    fn show(&mut self, index: usize) -> LoadTicket {
        self.state = LightboxState::Open(index);
        self.generation += 1;

        let item = &self.items[index];
        self.view.set_loaded(false);
        self.view.set_image(&item.image_url, &item.title);
        self.view.set_title(&item.title);
        self.view
            .set_nav_hidden(index == 0, index + 1 == self.items.len());

        trace!(index, generation = self.generation, "lightbox showing item");
        LoadTicket {
            generation: self.generation,
            index,
        }
    }
}
