//! Headless in-memory [`Host`] document.
//!
//! Nodes live in a flat list in document order. Every mutation made through
//! the [`Host`] trait is appended to a log so callers can tell engine writes
//! apart from edits made directly through [`MemoryDocument::node_mut`].

use std::collections::BTreeMap;

use serde_json::Value;

use crate::binding::BINDING_ATTRIBUTE;
use crate::host::{Control, Host};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryNode {
    pub control: Control,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub value: Value,
    pub checked: bool,
    pub options: Vec<String>,
    pub selected: Option<usize>,
}

impl MemoryNode {
    fn bound(control: Control, binding: &str) -> Self {
        Self {
            control,
            attributes: BTreeMap::from([(BINDING_ATTRIBUTE.to_string(), binding.to_string())]),
            text: String::new(),
            value: Value::String(String::new()),
            checked: false,
            options: Vec::new(),
            selected: None,
        }
    }

    /// A text input bound to `binding`.
    pub fn input(binding: &str) -> Self {
        Self::bound(Control::Other, binding)
    }

    pub fn checkbox(binding: &str) -> Self {
        Self::bound(Control::Checkbox, binding)
    }

    /// A single-choice list offering `options`, nothing selected.
    pub fn select(binding: &str, options: &[&str]) -> Self {
        let mut node = Self::bound(Control::SingleChoice, binding);
        node.options = options.iter().map(|o| o.to_string()).collect();
        node
    }

    /// A node without a value slot, usually bound with a text or attribute
    /// facet.
    pub fn element(binding: &str) -> Self {
        Self::bound(Control::Other, binding)
    }

    /// A node carrying no binding at all.
    pub fn unbound() -> Self {
        let mut node = Self::bound(Control::Other, "");
        node.attributes.clear();
        node
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }
}

/// Which facet a logged mutation touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    Attribute(String),
    Text,
    Value,
    Checked,
    Selected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub node: NodeId,
    pub kind: MutationKind,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    nodes: Vec<(NodeId, MemoryNode)>,
    next_id: usize,
    mutations: Vec<Mutation>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `node` at the end of the document.
    pub fn insert(&mut self, node: MemoryNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push((id, node));
        id
    }

    pub fn remove(&mut self, id: NodeId) -> Option<MemoryNode> {
        let index = self.nodes.iter().position(|(nid, _)| *nid == id)?;
        Some(self.nodes.remove(index).1)
    }

    pub fn node(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.iter().find(|(nid, _)| *nid == id).map(|(_, n)| n)
    }

    /// Direct access for simulating edits; not recorded as a mutation.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut MemoryNode> {
        self.nodes.iter_mut().find(|(nid, _)| *nid == id).map(|(_, n)| n)
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn clear_mutations(&mut self) {
        self.mutations.clear();
    }

    /// Whether any recorded mutation touched `id`.
    pub fn was_written(&self, id: NodeId) -> bool {
        self.mutations.iter().any(|m| m.node == id)
    }

    fn record(&mut self, node: NodeId, kind: MutationKind) {
        self.mutations.push(Mutation { node, kind });
    }
}

impl Host for MemoryDocument {
    type Node = NodeId;

    /// Supports attribute-presence selectors such as `[x-bind]`.
    fn query(&self, selector: &str) -> Vec<NodeId> {
        let Some(name) = selector
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        else {
            return Vec::new();
        };
        self.nodes
            .iter()
            .filter(|(_, node)| node.attributes.contains_key(name))
            .map(|(id, _)| *id)
            .collect()
    }

    fn control(&self, node: &NodeId) -> Control {
        self.node(*node).map_or(Control::Other, |n| n.control)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.node(*node)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        if let Some(n) = self.node_mut(*node) {
            n.attributes.insert(name.to_string(), value.to_string());
            self.record(*node, MutationKind::Attribute(name.to_string()));
        }
    }

    fn text(&self, node: &NodeId) -> String {
        self.node(*node).map(|n| n.text.clone()).unwrap_or_default()
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        if let Some(n) = self.node_mut(*node) {
            n.text = text.to_string();
            self.record(*node, MutationKind::Text);
        }
    }

    fn value(&self, node: &NodeId) -> Value {
        let Some(n) = self.node(*node) else {
            return Value::Null;
        };
        match n.control {
            Control::SingleChoice => n
                .selected
                .and_then(|i| n.options.get(i))
                .map_or(Value::String(String::new()), |o| Value::String(o.clone())),
            Control::Checkbox | Control::Other => n.value.clone(),
        }
    }

    fn set_value(&mut self, node: &NodeId, value: &Value) {
        if let Some(n) = self.node_mut(*node) {
            n.value = value.clone();
            self.record(*node, MutationKind::Value);
        }
    }

    fn checked(&self, node: &NodeId) -> bool {
        self.node(*node).is_some_and(|n| n.checked)
    }

    fn set_checked(&mut self, node: &NodeId, checked: bool) {
        if let Some(n) = self.node_mut(*node) {
            n.checked = checked;
            self.record(*node, MutationKind::Checked);
        }
    }

    fn options(&self, node: &NodeId) -> Vec<String> {
        self.node(*node).map(|n| n.options.clone()).unwrap_or_default()
    }

    fn select(&mut self, node: &NodeId, index: usize) {
        if let Some(n) = self.node_mut(*node) {
            n.selected = Some(index);
            self.record(*node, MutationKind::Selected);
        }
    }
}
