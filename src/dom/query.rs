//! `querySelector`-style lookups over the arena tree.

use selectors::context::{MatchingContext, SelectorCaches};
use selectors::parser::{ParseRelative, Selector, SelectorList};

use super::arena::{ArenaDom, NodeId};
use super::element_ref::{ElementRef, PageSelectors};
use crate::error::{Error, Result};

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone)]
pub struct SelectorSet {
    source: String,
    selectors: Vec<Selector<PageSelectors>>,
}

impl SelectorSet {
    /// Parse a selector list such as `"h3, p"` or `a[href^="http"]`.
    pub fn parse(source: &str) -> Result<Self> {
        let mut input = cssparser::ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut input);
        let list = SelectorList::parse(&PageSelectors, &mut parser, ParseRelative::No)
            .map_err(|_| Error::Selector(source.to_string()))?;
        parser
            .expect_exhausted()
            .map_err(|_| Error::Selector(source.to_string()))?;

        Ok(Self {
            source: source.to_string(),
            selectors: list.slice().to_vec(),
        })
    }

    /// The text this set was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the element `id` matches any selector in the set.
    pub fn matches(&self, dom: &ArenaDom, id: NodeId) -> bool {
        if !dom.is_element(id) {
            return false;
        }
        let elem = ElementRef::new(dom, id);
        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            selectors::matching::MatchingMode::Normal,
            None,
            &mut caches,
            selectors::context::QuirksMode::NoQuirks,
            selectors::matching::NeedsSelectorFlags::No,
            selectors::matching::MatchingForInvalidation::No,
        );
        self.selectors
            .iter()
            .any(|s| selectors::matching::matches_selector(s, 0, None, &elem, &mut context))
    }
}

impl ArenaDom {
    /// Every element below `root` matching `set`, in document order.
    pub fn select_all(&self, root: NodeId, set: &SelectorSet) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|id| set.matches(self, *id))
            .collect()
    }

    /// First element below `root` matching `set`.
    pub fn select_first(&self, root: NodeId, set: &SelectorSet) -> Option<NodeId> {
        self.descendants(root).find(|id| set.matches(self, *id))
    }

    /// Parse `selector` and return every match in the whole document.
    pub fn query_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let set = SelectorSet::parse(selector)?;
        Ok(self.select_all(self.document(), &set))
    }

    /// Parse `selector` and return the first match below `root`.
    pub fn query_first_in(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let set = SelectorSet::parse(selector)?;
        Ok(self.select_first(root, &set))
    }
}
