use crate::dom::{ArenaDom, NodeId, inner_html};

use super::{LinkRef, TaggedNode};

/// Lift every `h3` and `p` below `container`, in document order.
///
/// Nested matches are included (a `p` inside a `blockquote` still counts),
/// matching `querySelectorAll("h3, p")`.
pub fn scan_container(dom: &ArenaDom, container: NodeId) -> Vec<TaggedNode> {
    dom.descendants(container)
        .filter_map(|id| {
            if dom.is_tag(id, "h3") {
                Some(TaggedNode::heading(&dom.text_content(id)))
            } else if dom.is_tag(id, "p") {
                Some(TaggedNode::paragraph(inner_html(dom, id), first_link(dom, id)))
            } else {
                None
            }
        })
        .collect()
}

fn first_link(dom: &ArenaDom, paragraph: NodeId) -> Option<LinkRef> {
    dom.descendants(paragraph).find_map(|id| {
        let href = dom.get_attr(id, "href").filter(|_| dom.is_tag(id, "a"))?;
        Some(LinkRef::new(href, dom.text_content(id).trim()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn test_scan_lifts_headings_and_paragraphs() {
        let dom = parse_html(
            r#"<div class="c">
                 <h2>ignored</h2>
                 <h3> Tool </h3>
                 <p><a name="x">no href</a> <a href="https://tool.test"> Tool site </a></p>
                 <ul><li>ignored</li></ul>
                 <p>plain</p>
               </div>"#,
        );
        let c = dom.query_all(".c").unwrap()[0];

        let nodes = scan_container(&dom, c);

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0], TaggedNode::heading("Tool"));
        match &nodes[1] {
            TaggedNode::Paragraph { link: Some(link), .. } => {
                assert_eq!(link.href, "https://tool.test");
                assert_eq!(link.text, "Tool site");
            }
            other => panic!("expected link paragraph, got {other:?}"),
        }
        assert_eq!(nodes[2], TaggedNode::paragraph("plain", None));
    }

    #[test]
    fn test_scan_includes_nested_paragraphs() {
        let dom = parse_html(
            r#"<section id="s"><h3>A</h3><blockquote><p>quoted</p></blockquote></section>"#,
        );
        let s = dom.get_by_id("s").unwrap();

        let nodes = scan_container(&dom, s);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1], TaggedNode::paragraph("quoted", None));
    }
}
