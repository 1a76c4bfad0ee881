//! Apps-page reflow.
//!
//! Rich-text editors give the apps page as a flat run of headings and
//! paragraphs:
//!
//! ```text
//! <h3>Name</h3>
//! <p><a href="https://app.test">app.test</a><br>One-line caption</p>
//! <p>More description...</p>
//! <h3>Next app</h3>
//! ```
//!
//! This module folds that run into [`Entry`] records and re-renders them as
//! a grid of `app-entry` rows. Folding is a pure function over
//! [`TaggedNode`]s so it can be exercised without a document; [`scan`]
//! and [`render`] connect it to the page tree.
//!
//! # Example
//!
//! ```
//! use themekit::reflow::{collect_entries, LinkRef, TaggedNode};
//!
//! let nodes = vec![
//!     TaggedNode::heading("Foo"),
//!     TaggedNode::paragraph(
//!         r#"<a href="x">Link</a><br>caption"#,
//!         Some(LinkRef::new("x", "Link")),
//!     ),
//! ];
//! let entries = collect_entries(&nodes);
//! assert_eq!(entries[0].url.as_deref(), Some("x"));
//! assert_eq!(entries[0].description_parts, vec!["caption"]);
//! ```

mod render;
mod scan;

pub use render::{CLASS_DESCRIPTION, CLASS_ENTRY, CLASS_INFO, CLASS_NAME, CLASS_URL, render_entries};
pub use scan::scan_container;

use tracing::debug;

use crate::dom::{ArenaDom, NodeId, SelectorSet};
use crate::error::Result;

/// Default selector for the apps page content wrapper.
pub const DEFAULT_CONTAINER: &str = ".gh-apps-content";

/// One app parsed out of the rich-text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub url: Option<String>,
    /// Display text for the link; `None` means show the URL itself.
    pub link_text: Option<String>,
    /// Inner markup of each description paragraph, in source order.
    pub description_parts: Vec<String>,
}

impl Entry {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
            link_text: None,
            description_parts: Vec::new(),
        }
    }

    /// Text shown inside the rendered link.
    pub fn display_link_text(&self) -> Option<&str> {
        self.link_text.as_deref().or(self.url.as_deref())
    }
}

/// First `a[href]` found inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub href: String,
    /// Trimmed text content of the anchor.
    pub text: String,
}

impl LinkRef {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }
}

/// A heading or paragraph lifted out of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaggedNode {
    /// An `h3`; `text` is already trimmed.
    Heading { text: String },
    /// A `p` with its serialized inner markup and first link.
    Paragraph {
        inner_html: String,
        link: Option<LinkRef>,
    },
}

impl TaggedNode {
    pub fn heading(text: &str) -> Self {
        TaggedNode::Heading {
            text: text.trim().to_string(),
        }
    }

    pub fn paragraph(inner_html: impl Into<String>, link: Option<LinkRef>) -> Self {
        TaggedNode::Paragraph {
            inner_html: inner_html.into(),
            link,
        }
    }
}

/// Scanner state: either waiting for the first heading or filling in the
/// most recent entry.
#[derive(Debug, Default)]
enum Builder {
    #[default]
    NoCurrentEntry,
    BuildingEntry(Entry),
}

/// Fold a run of tagged nodes into entries.
///
/// Paragraphs before the first heading are dropped. Within an entry the
/// first link-bearing paragraph supplies the URL; later ones, and any
/// paragraph without a link, become description.
pub fn collect_entries(nodes: &[TaggedNode]) -> Vec<Entry> {
    let mut entries = Vec::new();
    let mut state = Builder::NoCurrentEntry;

    for node in nodes {
        state = match (state, node) {
            (Builder::BuildingEntry(done), TaggedNode::Heading { text }) => {
                entries.push(done);
                Builder::BuildingEntry(Entry::new(text.as_str()))
            }
            (Builder::NoCurrentEntry, TaggedNode::Heading { text }) => {
                Builder::BuildingEntry(Entry::new(text.as_str()))
            }
            (Builder::NoCurrentEntry, TaggedNode::Paragraph { .. }) => {
                debug!("dropping paragraph before first heading");
                Builder::NoCurrentEntry
            }
            (Builder::BuildingEntry(mut entry), TaggedNode::Paragraph { inner_html, link }) => {
                match link {
                    Some(link) if entry.url.is_none() => {
                        entry.url = Some(link.href.clone());
                        entry.link_text = Some(link.text.trim())
                            .filter(|t| !t.is_empty())
                            .map(str::to_string);
                        if let Some(caption) = text_after_line_break(inner_html)
                            .map(str::trim)
                            .filter(|c| !c.is_empty())
                        {
                            entry.description_parts.push(caption.to_string());
                        }
                    }
                    _ => entry.description_parts.push(inner_html.clone()),
                }
                Builder::BuildingEntry(entry)
            }
        };
    }

    if let Builder::BuildingEntry(last) = state {
        entries.push(last);
    }
    entries
}

/// Markup following the first `<br>` marker (`<br>`, `<br/>`, `<br />`,
/// any case), or `None` when the markup has no line break.
pub fn text_after_line_break(html: &str) -> Option<&str> {
    let bytes = html.as_bytes();
    let mut from = 0;

    while let Some(offset) = memchr::memchr(b'<', &bytes[from..]) {
        let start = from + offset;
        let tag = &bytes[start + 1..];
        if tag.len() >= 2 && tag[..2].eq_ignore_ascii_case(b"br") {
            let rest = &tag[2..];
            let spaces = rest.iter().take_while(|b| b.is_ascii_whitespace()).count();
            let rest = &rest[spaces..];
            let close = match rest {
                [b'>', ..] => Some(1),
                [b'/', b'>', ..] => Some(2),
                _ => None,
            };
            if let Some(len) = close {
                return Some(&html[start + 3 + spaces + len..]);
            }
        }
        from = start + 1;
    }
    None
}

/// Options for the apps-page pass.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize), serde(default))]
pub struct ReflowConfig {
    /// Selector for the element holding the rich-text run.
    pub container: String,
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER.to_string(),
        }
    }
}

/// Reflow a single container in place. Returns the number of rendered
/// entries; zero means the container was left untouched.
pub fn reflow_container(dom: &mut ArenaDom, container: NodeId) -> usize {
    let nodes = scan_container(dom, container);
    if nodes.is_empty() {
        debug!("apps container has no headings or paragraphs");
        return 0;
    }

    let entries = collect_entries(&nodes);
    if entries.is_empty() {
        debug!("apps container has no headings");
        return 0;
    }

    dom.remove_children(container);
    render_entries(dom, container, &entries);
    entries.len()
}

/// Find the apps container and reflow it. A page without one is left as is.
pub fn reflow_apps(dom: &mut ArenaDom, config: &ReflowConfig) -> Result<usize> {
    let set = SelectorSet::parse(&config.container)?;
    let Some(container) = dom.select_first(dom.document(), &set) else {
        debug!(selector = %config.container, "no apps container on page");
        return Ok(0);
    };
    Ok(reflow_container(dom, container))
}
