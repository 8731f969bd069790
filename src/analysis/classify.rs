//! Per-line node classification.
//!
//! Walks every position-carrying node and records a `(kind tag, value)`
//! descriptor on the node's start line, in tree-walk order. Unlike
//! indentation recovery, the only extra filter here is the docstring flag;
//! a node with no column metadata at all is retained. The two guards differ
//! on purpose and must not be unified.

use std::collections::BTreeMap;

use super::resolve::{resolve_node, Descriptor, NodeKind};
use super::source::{carries_position, for_each_node, is_docstring_flagged, SourceFile};

/// Sparse ascending map of 1-based line number to the descriptors of the
/// nodes starting on that line.
pub type LineDescriptorMap = BTreeMap<usize, Vec<Descriptor>>;

/// Classify every node in the tree by line.
pub fn classify_lines(file: &SourceFile) -> LineDescriptorMap {
    let source = file.source().as_bytes();
    let mut out = LineDescriptorMap::new();

    for_each_node(file.root(), |node| {
        if !carries_position(node) {
            return;
        }
        if is_docstring_flagged(node) {
            return;
        }
        let lineno = node.start_position().row + 1;
        out.entry(lineno).or_default().push(Descriptor {
            kind: NodeKind::of(node),
            value: resolve_node(node, source),
        });
    });

    out
}
