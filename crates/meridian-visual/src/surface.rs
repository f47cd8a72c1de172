//! Visual substrate abstraction
//!
//! The engine only ever appends, removes and mutates nodes. It never reads
//! the substrate back.

use std::fmt::Display;

use meridian_core::{ClockResult, NodeId};

/// A node to be appended: tag name, ordered attributes and optional text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
            text: None,
        }
    }

    /// Set an attribute, replacing any previous value
    pub fn attr(mut self, name: &str, value: impl Display) -> Self {
        self.set(name, value.to_string());
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub(crate) fn set(&mut self, name: &str, value: String) {
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }
}

/// Where faces draw
pub trait Surface {
    /// The top-level container
    fn root(&self) -> NodeId;

    /// Append a child at the end of `parent`'s children
    fn append(&mut self, parent: NodeId, element: Element) -> ClockResult<NodeId>;

    /// Remove a node together with its whole subtree
    fn remove(&mut self, node: NodeId) -> ClockResult<()>;

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> ClockResult<()>;

    fn set_text(&mut self, node: NodeId, text: &str) -> ClockResult<()>;
}

/// Compact decimal form for coordinates: at most three decimals, no
/// trailing zeros
pub fn num(value: f64) -> String {
    let value = if value.abs() < 5e-4 { 0.0 } else { value };
    let mut s = format!("{:.3}", value);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}
