//! In-memory retained visual tree
//!
//! `Document` is the bundled `Surface`: an arena of nodes keyed by `NodeId`
//! that keeps child order and can serialize any subtree to markup.

use std::collections::HashMap;
use std::fmt::Write;

use html_escaper::HtmlEscaper;

/// HTML-escaping `Display` adapter over html-escaper's writer.
struct Escape<'a>(&'a str);

impl std::fmt::Display for Escape<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(HtmlEscaper(f), "{}", self.0)
    }
}

use meridian_core::{ClockError, ClockResult, NodeId};

use crate::{Element, Surface};

/// Tags that never self-close when serialized
const HTML_TAGS: &[&str] = &["div", "h2", "section", "span", "body", "main"];

/// Counters of the structural work done on a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    /// Nodes appended
    pub appended: u64,
    /// Nodes removed, subtrees included
    pub removed: u64,
    pub attr_writes: u64,
    pub text_writes: u64,
}

#[derive(Debug, Clone)]
struct NodeData {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Retained tree of elements
#[derive(Debug, Clone)]
pub struct Document {
    nodes: HashMap<NodeId, NodeData>,
    next_id: u64,
    stats: SurfaceStats,
}

impl Document {
    /// A document whose root is a `<div id="container">`
    pub fn new() -> Self {
        Self::with_root(Element::new("div").attr("id", "container"))
    }

    pub fn with_root(root: Element) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            NodeId::ROOT,
            NodeData {
                element: root,
                parent: None,
                children: Vec::new(),
            },
        );
        Document {
            nodes,
            next_id: 1,
            stats: SurfaceStats::default(),
        }
    }

    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SurfaceStats::default();
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(&node).map(|n| &n.element)
    }

    pub fn children(&self, node: NodeId) -> Option<&[NodeId]> {
        self.nodes.get(&node).map(|n| n.children.as_slice())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    /// All nodes below `node` in document order, `node` excluded
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.nodes.get(&node) {
            Some(n) => n.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(n) = self.nodes.get(&id) {
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    /// Descendants of `node` carrying a class
    pub fn find_by_class(&self, node: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(node)
            .into_iter()
            .filter(|id| self.element(*id).map(|e| e.has_class(class)).unwrap_or(false))
            .collect()
    }

    /// Serialize the whole document
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_node(NodeId::ROOT, &mut out);
        out
    }

    /// Serialize one subtree
    pub fn render_node(&self, node: NodeId) -> ClockResult<String> {
        if !self.contains(node) {
            return Err(ClockError::UnknownNode(node));
        }
        let mut out = String::new();
        self.write_node(node, &mut out);
        Ok(out)
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.nodes.get(&node) else {
            return;
        };
        let el = &data.element;
        let _ = write!(out, "<{}", el.tag);
        for (name, value) in &el.attrs {
            let _ = write!(out, " {}=\"{}\"", name, Escape(value.as_str()));
        }

        let html = HTML_TAGS.contains(&el.tag.as_str());
        if el.text.is_none() && data.children.is_empty() && !html {
            out.push_str("/>");
            return;
        }

        out.push('>');
        if let Some(text) = &el.text {
            let _ = write!(out, "{}", Escape(text.as_str()));
        }
        for child in &data.children {
            self.write_node(*child, out);
        }
        let _ = write!(out, "</{}>", el.tag);
    }

    fn node_mut(&mut self, node: NodeId) -> ClockResult<&mut NodeData> {
        self.nodes.get_mut(&node).ok_or(ClockError::UnknownNode(node))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for Document {
    fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    fn append(&mut self, parent: NodeId, element: Element) -> ClockResult<NodeId> {
        let id = NodeId::new(self.next_id);
        self.node_mut(parent)?.children.push(id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            NodeData {
                element,
                parent: Some(parent),
                children: Vec::new(),
            },
        );
        self.stats.appended += 1;
        Ok(id)
    }

    /// Removing the root clears its children instead.
    fn remove(&mut self, node: NodeId) -> ClockResult<()> {
        if !self.contains(node) {
            return Err(ClockError::UnknownNode(node));
        }

        let doomed = self.descendants(node);
        for id in &doomed {
            self.nodes.remove(id);
        }
        self.stats.removed += doomed.len() as u64;

        if node == NodeId::ROOT {
            self.node_mut(node)?.children.clear();
            return Ok(());
        }

        if let Some(data) = self.nodes.remove(&node) {
            self.stats.removed += 1;
            if let Some(parent) = data.parent.and_then(|p| self.nodes.get_mut(&p)) {
                parent.children.retain(|c| *c != node);
            }
        }
        Ok(())
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> ClockResult<()> {
        self.node_mut(node)?.element.set(name, value.to_string());
        self.stats.attr_writes += 1;
        Ok(())
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> ClockResult<()> {
        self.node_mut(node)?.element.text = Some(text.to_string());
        self.stats.text_writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_render() {
        let mut doc = Document::new();
        let svg = doc
            .append(doc.root(), Element::new("svg").attr("width", 200))
            .unwrap();
        doc.append(svg, Element::new("circle").attr("r", 95)).unwrap();
        doc.append(svg, Element::new("text").text("a<b")).unwrap();

        assert_eq!(
            doc.render(),
            "<div id=\"container\"><svg width=\"200\"><circle r=\"95\"/><text>a&lt;b</text></svg></div>"
        );
        assert_eq!(doc.stats().appended, 3);
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn test_empty_html_element_not_self_closed() {
        let doc = Document::new();
        assert_eq!(doc.render(), "<div id=\"container\"></div>");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_remove_subtree() {
        let mut doc = Document::new();
        let root = doc.root();
        let group = doc.append(root, Element::new("g")).unwrap();
        let child = doc.append(group, Element::new("path")).unwrap();
        let sibling = doc.append(root, Element::new("g")).unwrap();

        doc.remove(group).unwrap();
        assert!(!doc.contains(group));
        assert!(!doc.contains(child));
        assert_eq!(doc.children(root), Some(&[sibling][..]));
        assert_eq!(doc.stats().removed, 2);
    }

    #[test]
    fn test_remove_root_clears() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.append(root, Element::new("g")).unwrap();
        doc.remove(root).unwrap();
        assert!(doc.contains(root));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_unknown_node_fails_fast() {
        let mut doc = Document::new();
        let missing = NodeId::new(99);
        assert!(matches!(
            doc.append(missing, Element::new("g")),
            Err(ClockError::UnknownNode(id)) if id == missing
        ));
        assert!(doc.remove(missing).is_err());
        assert!(doc.set_attr(missing, "x", "1").is_err());
        assert!(doc.set_text(missing, "x").is_err());
        assert_eq!(doc.stats(), SurfaceStats::default());
    }

    #[test]
    fn test_find_by_class_in_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.append(root, Element::new("g").class("digit pulsable")).unwrap();
        let b = doc.append(root, Element::new("g").class("digit")).unwrap();
        let c = doc.append(b, Element::new("g").class("pulsable")).unwrap();
        assert_eq!(doc.find_by_class(root, "pulsable"), vec![a, c]);
        assert_eq!(doc.descendants(root), vec![a, b, c]);
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut doc = Document::new();
        let g = doc.append(doc.root(), Element::new("g").attr("transform", "a")).unwrap();
        doc.set_attr(g, "transform", "b").unwrap();
        assert_eq!(doc.element(g).unwrap().get("transform"), Some("b"));
        assert_eq!(doc.stats().attr_writes, 1);
    }
}
