//! Reflow properties over generated heading/paragraph runs.

use proptest::prelude::*;

use themekit::dom::{inner_html, parse_html};
use themekit::reflow::{ReflowConfig, TaggedNode, collect_entries, reflow_apps};

#[derive(Debug, Clone)]
enum Block {
    Heading(String),
    Text(String),
    Link(String, String),
}

impl Block {
    fn to_html(&self) -> String {
        match self {
            Block::Heading(text) => format!("<h3>{text}</h3>"),
            Block::Text(text) => format!("<p>{text}</p>"),
            Block::Link(host, caption) => {
                format!(r#"<p><a href="https://{host}.test">{host}</a><br>{caption}</p>"#)
            }
        }
    }

    fn is_heading(&self) -> bool {
        matches!(self, Block::Heading(_))
    }
}

fn block() -> impl Strategy<Value = Block> {
    let word = "[a-z]{1,8}";
    prop_oneof![
        word.prop_map(Block::Heading),
        word.prop_map(Block::Text),
        (word, word).prop_map(|(host, caption)| Block::Link(host, caption)),
    ]
}

fn page(blocks: &[Block]) -> String {
    let body: String = blocks.iter().map(Block::to_html).collect();
    format!(r#"<div class="gh-apps-content">{body}</div>"#)
}

proptest! {
    #[test]
    fn prop_one_entry_per_heading(blocks in prop::collection::vec(block(), 0..24)) {
        let headings = blocks.iter().filter(|b| b.is_heading()).count();
        let mut dom = parse_html(&page(&blocks));

        let rendered = reflow_apps(&mut dom, &ReflowConfig::default()).unwrap();

        prop_assert_eq!(rendered, headings);
        prop_assert_eq!(dom.query_all(".app-entry").unwrap().len(), headings);
    }

    #[test]
    fn prop_no_headings_leaves_container(
        blocks in prop::collection::vec(block(), 0..12)
            .prop_map(|bs| bs.into_iter().filter(|b| !b.is_heading()).collect::<Vec<_>>())
    ) {
        let mut dom = parse_html(&page(&blocks));
        let container = dom.query_all(".gh-apps-content").unwrap()[0];
        let before = inner_html(&dom, container);

        prop_assert_eq!(reflow_apps(&mut dom, &ReflowConfig::default()).unwrap(), 0);
        prop_assert_eq!(inner_html(&dom, container), before);
    }

    #[test]
    fn prop_first_link_wins(first in "[a-z]{1,8}", second in "[a-z]{1,8}") {
        let nodes = [
            TaggedNode::heading("App"),
            TaggedNode::paragraph(
                format!(r#"<a href="https://{first}.test">{first}</a>"#),
                Some(themekit::reflow::LinkRef::new(format!("https://{first}.test"), first.clone())),
            ),
            TaggedNode::paragraph(
                format!(r#"<a href="https://{second}.test">{second}</a>"#),
                Some(themekit::reflow::LinkRef::new(format!("https://{second}.test"), second.clone())),
            ),
        ];

        let entries = collect_entries(&nodes);

        prop_assert_eq!(entries.len(), 1);
        let expected_url = format!("https://{first}.test");
        prop_assert_eq!(entries[0].url.as_deref(), Some(expected_url.as_str()));
        prop_assert_eq!(entries[0].description_parts.len(), 1);
    }
}

#[test]
fn test_missing_container_is_not_an_error() {
    let mut dom = parse_html("<h3>Loose</h3><p>text</p>");
    assert_eq!(reflow_apps(&mut dom, &ReflowConfig::default()).unwrap(), 0);
    assert_eq!(dom.query_all("h3").unwrap().len(), 1);
}

#[test]
fn test_custom_container_selector() {
    let mut dom = parse_html(r#"<section id="tools"><h3>Vim</h3><p>editor</p></section>"#);
    let config = ReflowConfig {
        container: "#tools".into(),
    };

    assert_eq!(reflow_apps(&mut dom, &config).unwrap(), 1);
    let description = dom.query_all("#tools .app-description p").unwrap();
    assert_eq!(dom.text_content(description[0]), "editor");
}
