//! Data to document: push values into every node bound to a path.

use docsync_json_pointer::walk;
use serde_json::Value;

use crate::binding::{Binding, BOUND_SELECTOR};
use crate::error::BindingIssue;
use crate::facet::FacetTable;
use crate::host::Host;

/// Write `value` into every bound node whose binding path equals `path`,
/// skipping `origin`.
///
/// Nodes with unresolvable bindings are skipped and appended to `issues`.
/// Returns how many nodes were mutated; zero matches is not an error.
pub fn write_to_document<H: Host>(
    host: &mut H,
    facets: &FacetTable<H>,
    value: &Value,
    path: &str,
    origin: Option<&H::Node>,
    issues: &mut Vec<BindingIssue<H::Node>>,
) -> usize {
    let mut written = 0;
    for node in host.query(BOUND_SELECTOR) {
        if origin == Some(&node) {
            continue;
        }
        let binding = match Binding::resolve(host, &node) {
            Ok(binding) => binding,
            Err(error) => {
                issues.push(BindingIssue::record(node, error));
                continue;
            }
        };
        if binding.path != path {
            continue;
        }
        if facets.write(host, &node, &binding.facet, value) {
            tracing::trace!(?node, path, facet = %binding.facet, "wrote node");
            written += 1;
        }
    }
    written
}

/// Push every leaf of `data` to the document.
pub fn write_all<H: Host>(
    host: &mut H,
    facets: &FacetTable<H>,
    data: &Value,
    issues: &mut Vec<BindingIssue<H::Node>>,
) -> usize {
    let mut leaves = Vec::new();
    walk(data, |value, pointer| leaves.push((pointer.to_string(), value.clone())));

    let mut written = 0;
    for (path, value) in &leaves {
        written += write_to_document(host, facets, value, path, None, issues);
    }
    tracing::debug!(leaves = leaves.len(), written, "write pass finished");
    written
}
