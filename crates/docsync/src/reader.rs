//! Document to data: read every bound node's facet.

use serde_json::Value;

use crate::binding::{Binding, BOUND_SELECTOR};
use crate::error::BindingIssue;
use crate::facet::FacetTable;
use crate::host::Host;

/// Read the current `(node, path, value)` of every bound node, in document
/// order.
///
/// Nodes sharing a path each produce an entry. Nodes with unresolvable
/// bindings are skipped and appended to `issues`.
pub fn read_from_document<H: Host>(
    host: &H,
    facets: &FacetTable<H>,
    issues: &mut Vec<BindingIssue<H::Node>>,
) -> Vec<(H::Node, String, Value)> {
    let mut changes = Vec::new();
    for node in host.query(BOUND_SELECTOR) {
        match Binding::resolve(host, &node) {
            Ok(binding) => {
                let value = facets.read(host, &node, &binding.facet);
                changes.push((node, binding.path, value));
            }
            Err(error) => issues.push(BindingIssue::record(node, error)),
        }
    }
    tracing::debug!(nodes = changes.len(), "read pass finished");
    changes
}
