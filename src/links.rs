//! Link rewriting passes.
//!
//! Both passes mark links to open in a new browsing context with
//! `target="_blank"` and `rel="noopener noreferrer"`, so the new page gets
//! neither an opener reference nor a referrer.

use tracing::debug;

use crate::dom::{ArenaDom, NodeId, SelectorSet};
use crate::error::Result;

pub const TARGET_BLANK: &str = "_blank";
pub const REL_NO_OPENER: &str = "noopener noreferrer";

/// Default selector for cards whose title should point off-site.
pub const DEFAULT_LINKED_CARD: &str = ".post-card.tag-hash-linked";

const EXTERNAL_LINKS: &str = r#"a[href^="http"]"#;
const CARD_BODY: &str = ".post-card-body";
const CARD_TITLE_LINK: &str = ".post-card-title a";
const ANY_LINK: &str = "a[href]";

/// Make a link open in a new tab without opener or referrer.
pub fn open_in_new_tab(dom: &mut ArenaDom, link: NodeId) {
    dom.set_attr(link, "target", TARGET_BLANK);
    dom.set_attr(link, "rel", REL_NO_OPENER);
}

/// Whether `href` counts as pointing away from `host`.
///
/// This is a plain substring check against the whole href: a same-site URL
/// is anything mentioning the host anywhere, so `https://other.test/?from=example.com`
/// is treated as local for `example.com`.
pub fn is_external(href: &str, host: &str) -> bool {
    !href.contains(host)
}

/// Mark every `http(s)` link not mentioning `host` to open in a new tab.
///
/// Returns how many links were marked. Running the pass again leaves the
/// attributes unchanged.
pub fn rewrite_external_links(dom: &mut ArenaDom, host: &str) -> usize {
    let set = match SelectorSet::parse(EXTERNAL_LINKS) {
        Ok(set) => set,
        Err(err) => {
            debug!(%err, "external link selector rejected");
            return 0;
        }
    };

    let links: Vec<_> = dom
        .select_all(dom.document(), &set)
        .into_iter()
        .filter(|&id| dom.get_attr(id, "href").is_some_and(|href| is_external(href, host)))
        .collect();

    for &link in &links {
        open_in_new_tab(dom, link);
    }
    debug!(host, marked = links.len(), "external links rewritten");
    links.len()
}

/// Point the title link of each linked-post card at the first link in the
/// card body.
///
/// Cards missing a body, a body link or a title link are skipped. Returns
/// the number of cards rewritten.
pub fn rewrite_linked_posts(dom: &mut ArenaDom, card_selector: &str) -> Result<usize> {
    let cards = SelectorSet::parse(card_selector)?;
    let bodies = SelectorSet::parse(CARD_BODY)?;
    let title_links = SelectorSet::parse(CARD_TITLE_LINK)?;
    let any_link = SelectorSet::parse(ANY_LINK)?;

    let mut rewritten = 0;
    for card in dom.select_all(dom.document(), &cards) {
        let Some(body) = dom.select_first(card, &bodies) else {
            debug!("linked card without body");
            continue;
        };
        let Some(href) = dom
            .select_first(body, &any_link)
            .and_then(|link| dom.get_attr(link, "href"))
            .map(str::to_string)
        else {
            debug!("linked card body has no link");
            continue;
        };
        let Some(title) = dom.select_first(card, &title_links) else {
            debug!("linked card without title link");
            continue;
        };

        dom.set_attr(title, "href", &href);
        open_in_new_tab(dom, title);
        rewritten += 1;
    }
    Ok(rewritten)
}
