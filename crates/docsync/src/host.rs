//! Capabilities the host document supplies to the engine.
//!
//! The engine never renders or creates nodes. It asks the host for the
//! nodes matching a selector under the root and reads or writes single
//! facets of those nodes. Node handles are compared with `PartialEq` to
//! recognize the node an edit originated from.

use std::fmt::Debug;

use serde_json::Value;

/// How a node's value slot behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Boolean checked-state instead of a value slot.
    Checkbox,
    /// A list of options of which at most one is selected.
    SingleChoice,
    /// Anything with a plain value slot.
    Other,
}

/// The root node plus the per-node accessor primitives.
pub trait Host {
    type Node: Clone + PartialEq + Debug;

    /// Nodes under the root matching `selector`, in document order.
    fn query(&self, selector: &str) -> Vec<Self::Node>;

    fn control(&self, node: &Self::Node) -> Control;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn text(&self, node: &Self::Node) -> String;
    fn set_text(&mut self, node: &Self::Node, text: &str);

    fn value(&self, node: &Self::Node) -> Value;
    fn set_value(&mut self, node: &Self::Node, value: &Value);

    fn checked(&self, node: &Self::Node) -> bool;
    fn set_checked(&mut self, node: &Self::Node, checked: bool);

    /// Option values of a [`Control::SingleChoice`] node, in order.
    fn options(&self, node: &Self::Node) -> Vec<String>;
    fn select(&mut self, node: &Self::Node, index: usize);
}
