//! Two-way synchronization between a JSON data object and bound nodes.
//!
//! Nodes opt in with an `x-bind` annotation of the form `<path>` or
//! `<path>@<facet>`, where the path is a JSON Pointer into the data object
//! and the facet selects the node's value slot (`value`, the default), its
//! text (empty facet) or a named attribute.
//!
//! - A push walks the data object and writes each leaf into the nodes bound
//!   to its path.
//! - A pull reads every bound node and applies the values that actually
//!   differ.
//! - An edit on one node updates the data object and every other node bound
//!   to the same path.
//!
//! Both directions end with at most one `changed` event carrying the whole
//! data object, and only when something really changed.
//!
//! # Example
//!
//! ```
//! use docsync::memory::{MemoryDocument, MemoryNode};
//! use docsync::{Engine, Options};
//! use serde_json::json;
//!
//! let mut doc = MemoryDocument::new();
//! let input = doc.insert(MemoryNode::input("/user/name"));
//! let label = doc.insert(MemoryNode::element("/user/name@"));
//!
//! let data = json!({"user": {"name": "Ann"}});
//! let mut engine = Engine::new(doc, data, Options::default()).unwrap();
//! assert_eq!(engine.host().node(label).unwrap().text, "Ann");
//!
//! engine.host_mut().node_mut(input).unwrap().value = json!("Bea");
//! engine.handle_node_event("input", Some(&input)).unwrap();
//! assert_eq!(engine.data(), &json!({"user": {"name": "Bea"}}));
//! assert_eq!(engine.host().node(label).unwrap().text, "Bea");
//! ```

pub mod aggregator;
pub mod binding;
pub mod engine;
pub mod error;
pub mod events;
pub mod facet;
pub mod host;
pub mod memory;
pub mod reader;
pub mod writer;

pub use aggregator::ChangeAggregator;
pub use binding::{Binding, Facet, FacetKind, BINDING_ATTRIBUTE, BOUND_SELECTOR};
pub use engine::{Engine, Extension, Options, DEFAULT_EVENTS};
pub use error::{BindingError, BindingIssue, Error};
pub use events::{Event, EventKind, SubscriptionId};
pub use facet::{FacetStrategy, FacetTable};
pub use host::{Control, Host};
