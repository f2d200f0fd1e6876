//! Error types for the synchronization engine.

use docsync_json_pointer::JsonPointerError;
use thiserror::Error;

/// A node's binding could not be resolved, or its value could not be
/// stored in the data object.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("node has no binding annotation")]
    Missing,
    #[error("binding {annotation:?} has an invalid path: {source}")]
    InvalidPath {
        annotation: String,
        #[source]
        source: JsonPointerError,
    },
    #[error("binding {annotation:?} names an invalid facet {facet:?}")]
    InvalidFacet { annotation: String, facet: String },
    #[error("data object cannot hold a value at {path:?}: {source}")]
    Conflict {
        path: String,
        #[source]
        source: JsonPointerError,
    },
}

/// Errors surfaced by engine operations and event handlers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Path(#[from] JsonPointerError),
    #[error(transparent)]
    Binding(#[from] BindingError),
}

/// A node skipped during a pass or an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingIssue<N> {
    pub node: N,
    pub error: BindingError,
}

impl<N: std::fmt::Debug> BindingIssue<N> {
    pub(crate) fn record(node: N, error: BindingError) -> Self {
        tracing::warn!(?node, %error, "skipping node");
        Self { node, error }
    }
}
