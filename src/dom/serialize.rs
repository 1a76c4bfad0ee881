//! HTML serialization for the arena tree.
//!
//! Follows the HTML fragment serialization algorithm closely enough that
//! `inner_html` output matches what a browser reports for the same subtree:
//! void elements have no end tag, raw-text elements are written verbatim,
//! and only `&`, `<`, `>` and no-break spaces are escaped in text.

use std::fmt::Write;

use super::arena::{ArenaDom, NodeData, NodeId};

/// Elements that never have an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text children are written unescaped.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Serialize the children of `id`, like `element.innerHTML`.
pub fn inner_html(dom: &ArenaDom, id: NodeId) -> String {
    let mut out = String::new();
    let raw = is_raw_text(dom, id);
    for child in dom.children(id) {
        write_node(dom, child, raw, &mut out);
    }
    out
}

/// Serialize `id` together with its children, like `element.outerHTML`.
pub fn outer_html(dom: &ArenaDom, id: NodeId) -> String {
    let mut out = String::new();
    let raw = dom
        .get(id)
        .map(|n| n.parent)
        .is_some_and(|parent| is_raw_text(dom, parent));
    write_node(dom, id, raw, &mut out);
    out
}

/// Serialize a whole document, doctype included.
pub fn to_html(dom: &ArenaDom) -> String {
    inner_html(dom, dom.document())
}

fn is_raw_text(dom: &ArenaDom, id: NodeId) -> bool {
    dom.element_name(id)
        .is_some_and(|name| RAW_TEXT_ELEMENTS.contains(&name.as_ref()))
}

fn write_node(dom: &ArenaDom, id: NodeId, raw_parent: bool, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        NodeData::Document => {
            for child in dom.children(id) {
                write_node(dom, child, false, out);
            }
        }
        NodeData::Doctype { name, .. } => {
            let _ = write!(out, "<!DOCTYPE {name}>");
        }
        NodeData::Comment(text) => {
            let _ = write!(out, "<!--{text}-->");
        }
        NodeData::Text(text) => {
            if raw_parent {
                out.push_str(text);
            } else {
                escape_text(text, out);
            }
        }
        NodeData::Element { name, attrs, .. } => {
            let tag = name.local.as_ref();
            out.push('<');
            out.push_str(tag);
            for attr in attrs {
                out.push(' ');
                if let Some(prefix) = &attr.name.prefix {
                    out.push_str(prefix.as_ref());
                    out.push(':');
                }
                out.push_str(attr.name.local.as_ref());
                out.push_str("=\"");
                escape_attr(&attr.value, out);
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&tag) {
                return;
            }

            let raw = RAW_TEXT_ELEMENTS.contains(&tag);
            for child in dom.children(id) {
                write_node(dom, child, raw, out);
            }
            let _ = write!(out, "</{tag}>");
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
