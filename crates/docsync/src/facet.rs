//! Per-facet read and write strategies.
//!
//! Each [`FacetKind`] maps to one [`FacetStrategy`] in a [`FacetTable`]. The
//! document writer and reader only look strategies up; replacing an entry
//! changes how that facet is synchronized without touching the traversals.

use serde_json::Value;

use crate::binding::{Facet, FacetKind};
use crate::host::{Control, Host};

pub trait FacetStrategy<H: Host> {
    /// Current value of `facet` on `node`.
    fn read(&self, host: &H, node: &H::Node, facet: &Facet) -> Value;

    /// Push `value` into `facet` on `node`. Returns whether the node was
    /// mutated.
    fn write(&self, host: &mut H, node: &H::Node, facet: &Facet, value: &Value) -> bool;
}

/// Value slot, checked-state for checkboxes, selection for choice lists.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValueFacet;

impl<H: Host> FacetStrategy<H> for ValueFacet {
    fn read(&self, host: &H, node: &H::Node, _facet: &Facet) -> Value {
        match host.control(node) {
            Control::Checkbox => Value::Bool(host.checked(node)),
            Control::SingleChoice | Control::Other => host.value(node),
        }
    }

    fn write(&self, host: &mut H, node: &H::Node, _facet: &Facet, value: &Value) -> bool {
        match host.control(node) {
            Control::Checkbox => {
                host.set_checked(node, truthy(value));
                true
            }
            Control::SingleChoice => {
                let Value::String(wanted) = value else {
                    return false;
                };
                // No matching option leaves the selection alone.
                match host.options(node).iter().position(|option| option == wanted) {
                    Some(index) => {
                        host.select(node, index);
                        true
                    }
                    None => false,
                }
            }
            Control::Other => {
                host.set_value(node, value);
                true
            }
        }
    }
}

/// Textual content. Unchanged content is not rewritten.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextFacet;

impl<H: Host> FacetStrategy<H> for TextFacet {
    fn read(&self, host: &H, node: &H::Node, _facet: &Facet) -> Value {
        Value::String(host.text(node))
    }

    fn write(&self, host: &mut H, node: &H::Node, _facet: &Facet, value: &Value) -> bool {
        let text = stringify(value);
        if host.text(node) == text {
            return false;
        }
        host.set_text(node, &text);
        true
    }
}

/// A named attribute; absent attributes read as `null`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AttributeFacet;

impl<H: Host> FacetStrategy<H> for AttributeFacet {
    fn read(&self, host: &H, node: &H::Node, facet: &Facet) -> Value {
        let Facet::Attribute(name) = facet else {
            return Value::Null;
        };
        host.attribute(node, name)
            .map(Value::String)
            .unwrap_or(Value::Null)
    }

    fn write(&self, host: &mut H, node: &H::Node, facet: &Facet, value: &Value) -> bool {
        let Facet::Attribute(name) = facet else {
            return false;
        };
        host.set_attribute(node, name, &stringify(value));
        true
    }
}

/// One strategy per facet kind.
pub struct FacetTable<H: Host> {
    value: Box<dyn FacetStrategy<H>>,
    text: Box<dyn FacetStrategy<H>>,
    attribute: Box<dyn FacetStrategy<H>>,
}

impl<H: Host> Default for FacetTable<H> {
    fn default() -> Self {
        Self {
            value: Box::new(ValueFacet),
            text: Box::new(TextFacet),
            attribute: Box::new(AttributeFacet),
        }
    }
}

impl<H: Host> FacetTable<H> {
    pub fn strategy(&self, kind: FacetKind) -> &dyn FacetStrategy<H> {
        match kind {
            FacetKind::Value => self.value.as_ref(),
            FacetKind::Text => self.text.as_ref(),
            FacetKind::Attribute => self.attribute.as_ref(),
        }
    }

    /// Swap the strategy used for `kind`, returning the previous one.
    pub fn replace(
        &mut self,
        kind: FacetKind,
        strategy: Box<dyn FacetStrategy<H>>,
    ) -> Box<dyn FacetStrategy<H>> {
        let slot = match kind {
            FacetKind::Value => &mut self.value,
            FacetKind::Text => &mut self.text,
            FacetKind::Attribute => &mut self.attribute,
        };
        std::mem::replace(slot, strategy)
    }

    pub fn read(&self, host: &H, node: &H::Node, facet: &Facet) -> Value {
        self.strategy(facet.kind()).read(host, node, facet)
    }

    pub fn write(&self, host: &mut H, node: &H::Node, facet: &Facet, value: &Value) -> bool {
        self.strategy(facet.kind()).write(host, node, facet, value)
    }
}

/// Boolean coercion: `null`, `false`, `0` and `""` are false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text form of a value: strings verbatim, everything else as JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthy() {
        assert!(!truthy(&Value::Null));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!(0.0)));
        assert!(!truthy(&json!("")));
        assert!(truthy(&json!("no")));
        assert!(truthy(&json!(-1)));
        assert!(truthy(&json!([])));
        assert!(truthy(&json!({})));
    }

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(&json!("Ann")), "Ann");
        assert_eq!(stringify(&json!(3)), "3");
        assert_eq!(stringify(&json!(1.5)), "1.5");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&Value::Null), "null");
        assert_eq!(stringify(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
