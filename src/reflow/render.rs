//! Grid markup for reflowed entries.
//!
//! The class names are a contract with the theme stylesheet.

use crate::dom::{ArenaDom, NodeId};
use crate::links::{REL_NO_OPENER, TARGET_BLANK};

use super::Entry;

pub const CLASS_ENTRY: &str = "app-entry";
pub const CLASS_INFO: &str = "app-info";
pub const CLASS_NAME: &str = "app-name";
pub const CLASS_URL: &str = "app-url";
pub const CLASS_DESCRIPTION: &str = "app-description";

/// Append one `div.app-entry` row per entry to `container`.
///
/// The description block is always emitted so every row has the same grid
/// columns; it is simply empty when the entry has no description.
pub fn render_entries(dom: &mut ArenaDom, container: NodeId, entries: &[Entry]) {
    for entry in entries {
        let row = dom.create_html_element("div", &[("class", CLASS_ENTRY)]);
        let info = dom.create_html_element("div", &[("class", CLASS_INFO)]);

        let name = dom.create_html_element("h3", &[("class", CLASS_NAME)]);
        dom.set_text_content(name, &entry.name);
        dom.append(info, name);

        if let (Some(url), Some(text)) = (&entry.url, entry.display_link_text()) {
            let url_block = dom.create_html_element("div", &[("class", CLASS_URL)]);
            let link = dom.create_html_element(
                "a",
                &[("href", url.as_str()), ("target", TARGET_BLANK), ("rel", REL_NO_OPENER)],
            );
            dom.set_text_content(link, text);
            dom.append(url_block, link);
            dom.append(info, url_block);
        }
        dom.append(row, info);

        let description = dom.create_html_element("div", &[("class", CLASS_DESCRIPTION)]);
        for part in &entry.description_parts {
            dom.append_html(description, &format!("<p>{part}</p>"));
        }
        dom.append(row, description);

        dom.append(container, row);
    }
}
