//! Arena-allocated page tree.
//!
//! html5ever parses into this tree, the page passes query and mutate it, and
//! [`super::serialize`] writes it back out. Nodes are never freed; detached
//! subtrees simply stop being reachable from the document root.

use std::collections::HashMap;

use html5ever::{LocalName, Namespace, QualName, ns};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Cached `id` attribute.
        id: Option<String>,
        /// Cached `class` tokens.
        classes: Vec<String>,
    },
    Text(String),
    Comment(String),
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
}

/// HTML attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    /// Attribute in the null namespace, the common case for HTML.
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.into(),
        }
    }
}

#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Arena-based page tree.
pub struct ArenaDom {
    nodes: Vec<Node>,
    document: NodeId,
    id_map: HashMap<String, NodeId>,
}

impl ArenaDom {
    /// Create an empty tree holding only the document node.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
            id_map: HashMap::new(),
        };
        dom.document = dom.alloc(NodeData::Document);
        dom
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of allocated nodes, reachable or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        let id = find_attr(&attrs, "id").map(str::to_string);
        let classes = find_attr(&attrs, "class")
            .map(split_classes)
            .unwrap_or_default();

        let node = self.alloc(NodeData::Element {
            name,
            attrs,
            id: id.clone(),
            classes,
        });
        if let Some(id) = id {
            self.id_map.entry(id).or_insert(node);
        }
        node
    }

    /// Create an HTML-namespace element from a tag name and attribute pairs.
    pub fn create_html_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let attrs = attrs
            .iter()
            .map(|(name, value)| Attribute::new(name, *value))
            .collect();
        self.create_element(QualName::new(None, ns!(html), LocalName::from(tag)), attrs)
    }

    pub fn create_text(&mut self, text: String) -> NodeId {
        self.alloc(NodeData::Text(text))
    }

    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(NodeData::Comment(text))
    }

    pub fn create_doctype(&mut self, name: String, public_id: String, system_id: String) -> NodeId {
        self.alloc(NodeData::Doctype {
            name,
            public_id,
            system_id,
        })
    }

    // ------------------------------------------------------------------
    // Tree surgery
    // ------------------------------------------------------------------

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last = self.get(parent).map_or(NodeId::NONE, |n| n.last_child);

        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        match self.get_mut(last) {
            Some(prev) => prev.next_sibling = child,
            None => {
                if let Some(p) = self.get_mut(parent) {
                    p.first_child = child;
                }
            }
        }
        if let Some(p) = self.get_mut(parent) {
            p.last_child = child;
        }
    }

    /// Insert `new_node` immediately before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let Some((parent, prev)) = self.get(sibling).map(|n| (n.parent, n.prev_sibling)) else {
            return;
        };

        if let Some(node) = self.get_mut(new_node) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = sibling;
        }
        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }
        match self.get_mut(prev) {
            Some(p) => p.next_sibling = new_node,
            None => {
                if let Some(par) = self.get_mut(parent) {
                    par.first_child = new_node;
                }
            }
        }
    }

    /// Append text to `parent`, extending its trailing text node if it has one.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last = self.get(parent).map_or(NodeId::NONE, |n| n.last_child);
        if let Some(Node {
            data: NodeData::Text(existing),
            ..
        }) = self.get_mut(last)
        {
            existing.push_str(text);
            return;
        }
        let node = self.create_text(text.to_string());
        self.append(parent, node);
    }

    /// Unlink a node from its parent and siblings. Its own subtree stays intact.
    pub fn detach(&mut self, id: NodeId) {
        let Some((parent, prev, next)) = self
            .get(id)
            .map(|n| (n.parent, n.prev_sibling, n.next_sibling))
        else {
            return;
        };

        match self.get_mut(prev) {
            Some(p) => p.next_sibling = next,
            None => {
                if let Some(par) = self.get_mut(parent) {
                    par.first_child = next;
                }
            }
        }
        match self.get_mut(next) {
            Some(n) => n.prev_sibling = prev,
            None => {
                if let Some(par) = self.get_mut(parent) {
                    par.last_child = prev;
                }
            }
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Detach every child of `parent`, the equivalent of `innerHTML = ''`.
    pub fn remove_children(&mut self, parent: NodeId) {
        let children: Vec<_> = self.children(parent).collect();
        for child in children {
            self.detach(child);
        }
    }

    /// Move all children of `from` to the end of `to`.
    pub fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        let children: Vec<_> = self.children(from).collect();
        for child in children {
            self.detach(child);
            self.append(to, child);
        }
    }

    /// Deep-copy a subtree from another arena into this one, returning the
    /// new (unattached) root.
    pub fn import_subtree(&mut self, other: &ArenaDom, id: NodeId) -> NodeId {
        let data = match other.get(id) {
            Some(node) => node.data.clone(),
            None => return NodeId::NONE,
        };
        let copy = match data {
            NodeData::Element { name, attrs, .. } => self.create_element(name, attrs),
            other_data => self.alloc(other_data),
        };
        for child in other.children(id) {
            let child_copy = self.import_subtree(other, child);
            self.append(copy, child_copy);
        }
        copy
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        ChildrenIter {
            dom: self,
            current: self.get(parent).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// All nodes below `root` in document order, excluding `root` itself.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut stack: Vec<_> = self.children(root).collect();
        stack.reverse();
        Descendants { dom: self, stack }
    }

    pub fn get_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_map
            .get(id)
            .copied()
            .filter(|node| self.is_attached(*node))
    }

    /// Whether a node is still reachable from the document root.
    pub fn is_attached(&self, mut id: NodeId) -> bool {
        while let Some(node) = self.get(id) {
            if id == self.document {
                return true;
            }
            id = node.parent;
        }
        false
    }

    /// First element with the given tag name, in document order.
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.descendants(self.document)
            .find(|id| self.element_name(*id).is_some_and(|n| n.as_ref() == tag))
    }
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a ArenaDom,
    current: NodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current;
        let node = self.dom.get(id)?;
        self.current = node.next_sibling;
        Some(id)
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    dom: &'a ArenaDom,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let mark = self.stack.len();
        self.stack.extend(self.dom.children(id));
        self.stack[mark..].reverse();
        Some(id)
    }
}

/// Element accessors and mutators.
impl ArenaDom {
    pub fn element_name(&self, id: NodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    pub fn element_namespace(&self, id: NodeId) -> Option<&Namespace> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.ns),
            _ => None,
        })
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    /// Check for an element with the given tag name.
    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.element_name(id).is_some_and(|n| n.as_ref() == tag)
    }

    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Element { attrs, .. }) => attrs.as_slice(),
            _ => &[],
        }
    }

    pub fn get_attr(&self, id: NodeId, name: &str) -> Option<&str> {
        find_attr(self.attrs(id), name)
    }

    /// Set (or replace) an attribute, keeping the id/class caches current.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(NodeData::Element {
            attrs,
            id: cached_id,
            classes,
            ..
        }) = self.nodes.get_mut(id.0 as usize).map(|n| &mut n.data)
        else {
            return;
        };

        match attrs.iter_mut().find(|a| a.name.local.as_ref() == name) {
            Some(attr) => attr.value = value.to_string(),
            None => attrs.push(Attribute::new(name, value)),
        }

        match name {
            "class" => *classes = split_classes(value),
            "id" => {
                *cached_id = Some(value.to_string());
                self.id_map.insert(value.to_string(), id);
            }
            _ => {}
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        let Some(NodeData::Element {
            attrs,
            id: cached_id,
            classes,
            ..
        }) = self.nodes.get_mut(id.0 as usize).map(|n| &mut n.data)
        else {
            return;
        };

        attrs.retain(|a| a.name.local.as_ref() != name);
        match name {
            "class" => classes.clear(),
            "id" => {
                if let Some(old) = cached_id.take() {
                    self.id_map.remove(&old);
                }
            }
            _ => {}
        }
    }

    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { id, .. } => id.as_deref(),
            _ => None,
        })
    }

    pub fn element_classes(&self, id: NodeId) -> &[String] {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Element { classes, .. }) => classes.as_slice(),
            _ => &[],
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element_classes(id).iter().any(|c| c == class)
    }

    /// Add or remove a class token, the equivalent of `classList.toggle(c, on)`.
    pub fn toggle_class(&mut self, id: NodeId, class: &str, on: bool) {
        if self.has_class(id, class) == on {
            return;
        }
        let mut classes = self.element_classes(id).to_vec();
        if on {
            classes.push(class.to_string());
        } else {
            classes.retain(|c| c != class);
        }
        if classes.is_empty() {
            self.remove_attr(id, "class");
        } else {
            self.set_attr(id, "class", &classes.join(" "));
        }
    }

    /// Contents of a single text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of every text node under `id`, like `textContent`.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.text(d))
            .collect()
    }

    /// Replace the children of `id` with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        self.remove_children(id);
        if !text.is_empty() {
            let node = self.create_text(text.to_string());
            self.append(id, node);
        }
    }
}

fn find_attr<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|a| a.name.local.as_ref() == name)
        .map(|a| a.value.as_str())
}

fn split_classes(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_children_order() {
        let mut dom = ArenaDom::new();
        let div = dom.create_html_element("div", &[("id", "main")]);
        let a = dom.create_html_element("p", &[]);
        let b = dom.create_html_element("p", &[]);
        dom.append(dom.document(), div);
        dom.append(div, a);
        dom.append(div, b);

        assert_eq!(dom.children(div).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(dom.get_by_id("main"), Some(div));
    }

    #[test]
    fn test_text_merging() {
        let mut dom = ArenaDom::new();
        let p = dom.create_html_element("p", &[]);
        dom.append(dom.document(), p);
        dom.append_text(p, "Hello, ");
        dom.append_text(p, "World!");

        let children: Vec<_> = dom.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text(children[0]), Some("Hello, World!"));
    }

    #[test]
    fn test_detach_middle_child() {
        let mut dom = ArenaDom::new();
        let ul = dom.create_html_element("ul", &[]);
        let items: Vec<_> = (0..3).map(|_| dom.create_html_element("li", &[])).collect();
        for &li in &items {
            dom.append(ul, li);
        }

        dom.detach(items[1]);

        assert_eq!(dom.children(ul).collect::<Vec<_>>(), vec![items[0], items[2]]);
        assert!(dom.get(items[1]).unwrap().parent.is_none());
    }

    #[test]
    fn test_remove_children_then_append() {
        let mut dom = ArenaDom::new();
        let div = dom.create_html_element("div", &[]);
        dom.append_text(div, "old");
        dom.remove_children(div);
        assert_eq!(dom.children(div).count(), 0);

        let span = dom.create_html_element("span", &[]);
        dom.append(div, span);
        assert_eq!(dom.children(div).collect::<Vec<_>>(), vec![span]);
    }

    #[test]
    fn test_descendants_document_order() {
        let mut dom = ArenaDom::new();
        let root = dom.create_html_element("div", &[]);
        let h3 = dom.create_html_element("h3", &[]);
        let section = dom.create_html_element("section", &[]);
        let p = dom.create_html_element("p", &[]);
        let last = dom.create_html_element("p", &[]);
        dom.append(root, h3);
        dom.append(root, section);
        dom.append(section, p);
        dom.append(root, last);

        let order: Vec<_> = dom.descendants(root).collect();
        assert_eq!(order, vec![h3, section, p, last]);
    }

    #[test]
    fn test_class_toggling() {
        let mut dom = ArenaDom::new();
        let btn = dom.create_html_element("button", &[("class", "lightbox-prev")]);

        dom.toggle_class(btn, "is-hidden", true);
        assert_eq!(dom.get_attr(btn, "class"), Some("lightbox-prev is-hidden"));

        dom.toggle_class(btn, "is-hidden", true);
        assert_eq!(dom.element_classes(btn).len(), 2);

        dom.toggle_class(btn, "is-hidden", false);
        assert_eq!(dom.get_attr(btn, "class"), Some("lightbox-prev"));
        assert!(!dom.has_class(btn, "is-hidden"));
    }

    #[test]
    fn test_text_content_is_recursive() {
        let mut dom = ArenaDom::new();
        let h3 = dom.create_html_element("h3", &[]);
        let em = dom.create_html_element("em", &[]);
        dom.append_text(h3, "  Quick ");
        dom.append(h3, em);
        dom.append_text(em, "Notes");
        dom.append_text(h3, "  ");

        assert_eq!(dom.text_content(h3), "  Quick Notes  ");

        dom.set_text_content(h3, "Replaced");
        assert_eq!(dom.text_content(h3), "Replaced");
    }

    #[test]
    fn test_import_subtree_copies_attributes() {
        let mut source = ArenaDom::new();
        let p = source.create_html_element("p", &[("class", "lead")]);
        source.append_text(p, "copied");

        let mut dom = ArenaDom::new();
        let copy = dom.import_subtree(&source, p);
        dom.append(dom.document(), copy);

        assert!(dom.has_class(copy, "lead"));
        assert_eq!(dom.text_content(copy), "copied");
    }
}
