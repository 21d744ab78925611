//! # Closure Engine
//!
//! Given an already-concretized set, extends it by fixed point: a symbolic
//! node joins the set once every one of its *non-constant* dependencies is
//! already concretized, provided it has at least one such dependency. A
//! single sweep in topological order (dependencies first) suffices — by the
//! time a node is visited, every node it could depend on has already been
//! considered.
//!
//! Constant operands never contribute to closing a node on their own: a
//! node whose dependencies are all constants — like a node with no
//! outgoing edges at all — is an actual symbolic input and only becomes
//! concrete by being recorded directly, never by inference alone.

use std::collections::BTreeSet;

use crate::graph::Graph;
use crate::types::NodeId;

/// Extend `set` in place, restricted to nodes whose topological index is
/// `>= min_topo_index`. Returns the ids newly added, in the order they were
/// added (topological order). Nodes already in `set` are left untouched and
/// never appear in the returned list, so callers can distinguish directly
/// pinned nodes from nodes the sweep itself concretized.
pub fn extend_closure(graph: &Graph, set: &mut BTreeSet<NodeId>, min_topo_index: usize) -> Vec<NodeId> {
    let mut added = Vec::new();

    for id in graph.topo_order() {
        let Some(idx) = graph.topo_index(id) else {
            continue;
        };
        if idx < min_topo_index || set.contains(id) {
            continue;
        }
        let Some(node) = graph.node(id) else { continue };
        if node.is_constant() {
            continue;
        }

        let mut has_non_constant_dep = false;
        let mut all_non_constant_resolved = true;
        for (target, _weight) in graph.out_neighbors(id) {
            if graph.node(target).is_some_and(crate::types::Node::is_constant) {
                continue;
            }
            has_non_constant_dep = true;
            if !set.contains(target) {
                all_non_constant_resolved = false;
                break;
            }
        }

        if has_non_constant_dep && all_non_constant_resolved {
            set.insert(id.clone());
            added.push(id.clone());
        }
    }

    added
}

/// Full, unrestricted closure starting from `baseline`. Convenience wrapper
/// over [`extend_closure`] for callers that don't need the topo-index
/// restriction or the newly-added list.
#[must_use]
pub fn close(graph: &Graph, baseline: &BTreeSet<NodeId>) -> BTreeSet<NodeId> {
    let mut set = baseline.clone();
    extend_closure(graph, &mut set, 0);
    set
}

/// True if `id` has at least one outgoing edge to a non-constant node,
/// i.e. it was concretized on the strength of a real symbolic dependency
/// rather than purely constant operands. Used by the candidate enumerator
/// to decide whether a newly-closed node counts as "hidden".
#[must_use]
pub fn has_symbolic_dependency(graph: &Graph, id: &NodeId) -> bool {
    graph
        .out_neighbors(id)
        .any(|(target, _)| graph.node(target).is_some_and(|t| !t.is_constant()))
}
