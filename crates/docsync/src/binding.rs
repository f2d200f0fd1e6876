//! Binding annotations: `<path>` or `<path>@<facet>`.

use std::fmt;

use docsync_json_pointer::validate_json_pointer;

use crate::error::BindingError;
use crate::host::Host;

/// Attribute carrying a node's binding expression.
pub const BINDING_ATTRIBUTE: &str = "x-bind";

/// Selector for every bound node under the root.
pub const BOUND_SELECTOR: &str = "[x-bind]";

/// Which aspect of a node takes part in a binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Facet {
    /// The value slot (checked-state for checkboxes).
    Value,
    /// The textual content.
    Text,
    /// A named attribute.
    Attribute(String),
}

/// Discriminant of [`Facet`], used to look up strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetKind {
    Value,
    Text,
    Attribute,
}

impl Facet {
    pub fn kind(&self) -> FacetKind {
        match self {
            Facet::Value => FacetKind::Value,
            Facet::Text => FacetKind::Text,
            Facet::Attribute(_) => FacetKind::Attribute,
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facet::Value => f.write_str("value"),
            Facet::Text => Ok(()),
            Facet::Attribute(name) => f.write_str(name),
        }
    }
}

/// A resolved binding descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub path: String,
    pub facet: Facet,
}

impl Binding {
    /// Parse a binding expression.
    ///
    /// The expression splits at its last `@`: keys may contain `@`, attribute
    /// names may not. Without `@` the value facet is bound; an empty facet
    /// binds the textual content.
    ///
    /// ```
    /// use docsync::binding::{Binding, Facet};
    ///
    /// let b = Binding::parse("/user/name@").unwrap();
    /// assert_eq!(b.path, "/user/name");
    /// assert_eq!(b.facet, Facet::Text);
    ///
    /// let b = Binding::parse("/mail/a@b.c@title").unwrap();
    /// assert_eq!(b.path, "/mail/a@b.c");
    /// assert_eq!(b.facet, Facet::Attribute("title".into()));
    /// ```
    pub fn parse(annotation: &str) -> Result<Self, BindingError> {
        let (path, facet) = match annotation.rsplit_once('@') {
            Some((path, "value")) => (path, Facet::Value),
            Some((path, "")) => (path, Facet::Text),
            Some((path, name)) => {
                if !is_attribute_name(name) {
                    return Err(BindingError::InvalidFacet {
                        annotation: annotation.to_string(),
                        facet: name.to_string(),
                    });
                }
                (path, Facet::Attribute(name.to_string()))
            }
            None => (annotation, Facet::Value),
        };
        validate_json_pointer(path).map_err(|source| BindingError::InvalidPath {
            annotation: annotation.to_string(),
            source,
        })?;
        Ok(Self {
            path: path.to_string(),
            facet,
        })
    }

    /// Resolve the binding of `node` from its current annotation.
    pub fn resolve<H: Host>(host: &H, node: &H::Node) -> Result<Self, BindingError> {
        let annotation = host
            .attribute(node, BINDING_ATTRIBUTE)
            .ok_or(BindingError::Missing)?;
        Self::parse(&annotation)
    }
}

fn is_attribute_name(name: &str) -> bool {
    !name.chars().any(|c| {
        c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '=')
    })
}
