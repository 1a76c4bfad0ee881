//! Page tree: parsing, querying, mutation and serialization.
//!
//! Themes run their page passes against this tree instead of a browser DOM.
//! Parsing goes through html5ever into an arena, lookups go through the
//! `selectors` crate, and output is plain HTML text.
//!
//! # Example
//!
//! ```
//! use themekit::dom::{parse_html, inner_html};
//!
//! let mut dom = parse_html(r#"<p class="note">Hi</p>"#);
//! let p = dom.query_all(".note").unwrap()[0];
//! dom.set_attr(p, "data-seen", "1");
//! assert_eq!(dom.get_attr(p, "data-seen"), Some("1"));
//! assert_eq!(inner_html(&dom, p), "Hi");
//! ```

mod arena;
mod element_ref;
mod query;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, Attribute, Node, NodeData, NodeId};
pub use element_ref::{ElementRef, PageSelectors};
pub use query::SelectorSet;
pub use serialize::{inner_html, outer_html, to_html};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::PageSink;

/// Parse a complete HTML document (or a bare fragment, which html5ever
/// wraps in `html`/`body`).
pub fn parse_html(html: &str) -> ArenaDom {
    parse_document(PageSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

/// Parse raw page bytes, sniffing the charset the way browsers fall back.
pub fn parse_html_bytes(bytes: &[u8]) -> ArenaDom {
    let hint = crate::util::extract_meta_charset(bytes);
    let text = crate::util::decode_text(bytes, hint);
    parse_html(&text)
}

impl ArenaDom {
    /// Parse `html` as body content and append the resulting nodes to
    /// `parent`, the equivalent of `parent.innerHTML += html`.
    pub fn append_html(&mut self, parent: NodeId, html: &str) {
        let fragment = parse_html(html);
        let Some(body) = fragment.find_by_tag("body") else {
            return;
        };
        for child in fragment.children(body) {
            let copy = self.import_subtree(&fragment, child);
            self.append(parent, copy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_html_grafts_fragment() {
        let mut dom = parse_html("<div id='out'></div>");
        let out = dom.get_by_id("out").unwrap();

        dom.append_html(out, "<p>One <em>two</em></p><p>three</p>");

        assert_eq!(
            inner_html(&dom, out),
            "<p>One <em>two</em></p><p>three</p>"
        );
    }

    #[test]
    fn test_append_html_plain_text() {
        let mut dom = parse_html("<p id='p'></p>");
        let p = dom.get_by_id("p").unwrap();

        dom.append_html(p, "just text &amp; more");

        assert_eq!(dom.text_content(p), "just text & more");
    }

    #[test]
    fn test_parse_bytes_latin1_meta() {
        let bytes = b"<meta charset=\"iso-8859-1\"><p>caf\xe9</p>";
        let dom = parse_html_bytes(bytes);

        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(dom.text_content(p), "caf\u{e9}");
    }
}
