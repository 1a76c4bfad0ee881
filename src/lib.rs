//! # themekit
//!
//! Page behavior and packaging for the Ember and Slate website themes.
//!
//! ## Features
//!
//! - Reflow a flat run of `h3`/`p` blocks into an `app-entry` grid
//! - Open off-site links in a new tab without opener or referrer
//! - Point linked-post card titles at the article they link to
//! - Drive the Slate gallery lightbox from keyboard, pointer and touch input
//! - Zip a theme directory as `{name}-{version}.zip`
//!
//! ## Quick Start
//!
//! ```
//! use themekit::theme::{process_page, Theme, ThemeConfig};
//!
//! let config = ThemeConfig::new(Theme::Ember).with_host("example.com");
//! let (html, report) = process_page(
//!     r#"<a href="https://elsewhere.test/">out</a>"#,
//!     &config,
//! ).unwrap();
//!
//! assert_eq!(report.external_links, 1);
//! assert!(html.contains(r#"target="_blank""#));
//! ```
//!
//! ## Lightbox
//!
//! The [`lightbox::Lightbox`] controller is independent of any document.
//! Render it through [`lightbox::ViewState`] to inspect state, or through
//! [`lightbox::DomView`] to apply it to a parsed page.

pub mod dom;
pub mod error;
pub mod lightbox;
pub mod links;
pub mod reflow;
pub mod theme;
pub(crate) mod util;

#[cfg(feature = "cli")]
pub mod package;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
pub use links::{rewrite_external_links, rewrite_linked_posts};
pub use reflow::{ReflowConfig, reflow_apps};
pub use theme::{PageReport, Theme, ThemeConfig, process_page};

#[cfg(feature = "cli")]
pub use package::package_theme;
