//! Rendering side of the lightbox.

/// Everything the controller needs to change on screen.
///
/// Implementations decide how a change is shown: [`ViewState`] just records
/// it, [`super::DomView`] edits the page tree, a browser binding would touch
/// real elements.
pub trait LightboxView {
    /// Show or hide the overlay (`is-active`, `aria-hidden`).
    fn set_active(&mut self, active: bool);

    /// Lock or restore page scrolling behind the overlay.
    fn set_scroll_locked(&mut self, locked: bool);

    /// Move keyboard focus to the close control.
    fn focus_close(&mut self);

    /// Point the image at a new source.
    fn set_image(&mut self, src: &str, alt: &str);

    fn set_title(&mut self, title: &str);

    /// Toggle the fade-in state of the image.
    fn set_loaded(&mut self, loaded: bool);

    /// Hide the previous/next controls at the ends of the gallery.
    fn set_nav_hidden(&mut self, prev_hidden: bool, next_hidden: bool);
}

/// Plain record of what the lightbox currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub active: bool,
    pub aria_hidden: bool,
    pub scroll_locked: bool,
    pub close_focused: bool,
    pub image_src: String,
    pub image_alt: String,
    pub title: String,
    pub loaded: bool,
    pub prev_hidden: bool,
    pub next_hidden: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active: false,
            aria_hidden: true,
            scroll_locked: false,
            close_focused: false,
            image_src: String::new(),
            image_alt: String::new(),
            title: String::new(),
            loaded: false,
            prev_hidden: false,
            next_hidden: false,
        }
    }
}

impl LightboxView for ViewState {
    fn set_active(&mut self, active: bool) {
        self.active = active;
        self.aria_hidden = !active;
        if !active {
            self.close_focused = false;
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn focus_close(&mut self) {
        self.close_focused = true;
    }

    fn set_image(&mut self, src: &str, alt: &str) {
        self.image_src = src.to_string();
        self.image_alt = alt.to_string();
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    fn set_nav_hidden(&mut self, prev_hidden: bool, next_hidden: bool) {
        self.prev_hidden = prev_hidden;
        self.next_hidden = next_hidden;
    }
}
