//! # Graph Core
//!
//! Owns the immutable node/edge collections and every derived index built
//! from them: adjacency maps, topological order, indirect depth, and the
//! kinst index. All of it is computed once in [`Graph::build`] and never
//! mutated afterwards — analyses borrow `&Graph` and never need to
//! invalidate these structures.
//!
//! Topological sort is iterative (an explicit stack, no recursion) so deep
//! graphs do not blow the call stack; indirect depth is then derived in a
//! single reverse-topological pass.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::AnalysisError;
use crate::types::{Edge, EdgeWeight, Node, NodeId};

/// A fully loaded, indexed constraint graph. Every field past `nodes` and
/// `edges` is a derived index built once by [`Graph::build`].
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: BTreeMap<NodeId, Node>,
    out_edges: BTreeMap<NodeId, BTreeMap<NodeId, EdgeWeight>>,
    in_edges: BTreeMap<NodeId, BTreeMap<NodeId, EdgeWeight>>,
    topo_order: Vec<NodeId>,
    topo_index: BTreeMap<NodeId, usize>,
    idep: BTreeMap<NodeId, u64>,
    kinst_index: BTreeMap<String, BTreeSet<NodeId>>,
}

impl Graph {
    /// Build a graph from a validated node/edge set. Edges referencing an
    /// unknown node or carrying an out-of-vocabulary weight are rejected
    /// before any index is built.
    pub fn build(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, AnalysisError> {
        let mut node_map = BTreeMap::new();
        for node in nodes {
            if node.width == 0 && !node.is_constant() {
                return Err(AnalysisError::ZeroWidth(node.id.clone()));
            }
            node_map.insert(node.id.clone(), node);
        }

        let mut out_edges: BTreeMap<NodeId, BTreeMap<NodeId, EdgeWeight>> = BTreeMap::new();
        let mut in_edges: BTreeMap<NodeId, BTreeMap<NodeId, EdgeWeight>> = BTreeMap::new();

        for edge in &edges {
            if !node_map.contains_key(&edge.source) || !node_map.contains_key(&edge.target) {
                return Err(AnalysisError::UnknownNodeReference {
                    source: edge.source.as_str().to_string(),
                    target: edge.target.as_str().to_string(),
                });
            }
            out_edges
                .entry(edge.source.clone())
                .or_default()
                .insert(edge.target.clone(), edge.weight);
            in_edges
                .entry(edge.target.clone())
                .or_default()
                .insert(edge.source.clone(), edge.weight);
        }

        let kinst_index = build_kinst_index(&node_map);
        let topo_order = topological_sort(&node_map, &out_edges);
        let topo_index = topo_order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        let idep = compute_idep(&topo_order, &in_edges)?;

        Ok(Self {
            nodes: node_map,
            out_edges,
            in_edges,
            topo_order,
            topo_index,
            idep,
            kinst_index,
        })
    }

    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.out_edges.values().map(BTreeMap::len).sum()
    }

    /// Outgoing edges of `id` (dependencies it refers to).
    #[must_use]
    pub fn out_neighbors(&self, id: &NodeId) -> impl Iterator<Item = (&NodeId, EdgeWeight)> {
        self.out_edges
            .get(id)
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, w)| (k, *w)))
    }

    /// Incoming edges of `id` (dependants that refer to it).
    #[must_use]
    pub fn in_neighbors(&self, id: &NodeId) -> impl Iterator<Item = (&NodeId, EdgeWeight)> {
        self.in_edges
            .get(id)
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, w)| (k, *w)))
    }

    /// Dependencies-first, dependants-last order.
    #[must_use]
    pub fn topo_order(&self) -> &[NodeId] {
        &self.topo_order
    }

    #[must_use]
    pub fn topo_index(&self, id: &NodeId) -> Option<usize> {
        self.topo_index.get(id).copied()
    }

    /// Recomputed indirect depth; authoritative over whatever was on the
    /// wire record.
    #[must_use]
    pub fn idep(&self, id: &NodeId) -> u64 {
        self.idep.get(id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn max_idep(&self) -> u64 {
        self.idep.values().copied().max().unwrap_or(0)
    }

    /// Node ids sharing a given kinst. Empty if `kinst` is not indexed
    /// (invalid kinst, or no such instruction in the graph).
    #[must_use]
    pub fn nodes_for_kinst(&self, kinst: &str) -> BTreeSet<NodeId> {
        self.kinst_index.get(kinst).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn kinst_index(&self) -> &BTreeMap<String, BTreeSet<NodeId>> {
        &self.kinst_index
    }
}

fn build_kinst_index(nodes: &BTreeMap<NodeId, Node>) -> BTreeMap<String, BTreeSet<NodeId>> {
    let mut index: BTreeMap<String, BTreeSet<NodeId>> = BTreeMap::new();
    for node in nodes.values() {
        if node.has_valid_kinst() {
            index.entry(node.kinst.clone()).or_default().insert(node.id.clone());
        }
    }
    index
}

/// Iterative post-order DFS over `out` edges. Emits a node only after every
/// node it depends on, so the result is dependencies-first. Node iteration
/// is in sorted-id order so the result is deterministic across runs on the
/// same input, including for nodes tied in depth.
fn topological_sort(
    nodes: &BTreeMap<NodeId, Node>,
    out_edges: &BTreeMap<NodeId, BTreeMap<NodeId, EdgeWeight>>,
) -> Vec<NodeId> {
    let mut visited: BTreeSet<NodeId> = BTreeSet::new();
    let mut order = Vec::with_capacity(nodes.len());

    for start in nodes.keys() {
        if visited.contains(start) {
            continue;
        }
        // (node, iterator index into its sorted children) frames.
        let mut stack: Vec<(NodeId, usize)> = vec![(start.clone(), 0)];
        visited.insert(start.clone());

        while let Some((node, child_idx)) = stack.pop() {
            let children: Vec<&NodeId> = out_edges
                .get(&node)
                .map(|m| m.keys().collect())
                .unwrap_or_default();

            if child_idx < children.len() {
                let next_child = children[child_idx].clone();
                stack.push((node, child_idx + 1));
                if !visited.contains(&next_child) {
                    visited.insert(next_child.clone());
                    stack.push((next_child, 0));
                }
            } else {
                order.push(node);
            }
        }
    }

    order
}

/// `idep(v) = 0` for a node with no incoming edges; otherwise the max over
/// incoming edges of `idep(source) + delta(weight)`. Computed in reverse
/// topological order (dependants before dependencies) so every source's
/// idep is already final when a dependant needs it — a dependant's idep
/// never depends on nodes later than it in topo order, only earlier ones.
fn compute_idep(
    topo_order: &[NodeId],
    in_edges: &BTreeMap<NodeId, BTreeMap<NodeId, EdgeWeight>>,
) -> Result<BTreeMap<NodeId, u64>, AnalysisError> {
    let mut idep: BTreeMap<NodeId, u64> = BTreeMap::new();

    for node in topo_order.iter().rev() {
        let incoming = in_edges.get(node);
        let value = match incoming {
            None => 0,
            Some(sources) if sources.is_empty() => 0,
            Some(sources) => {
                let mut max_val = 0u64;
                for (source, weight) in sources {
                    let source_idep = idep.get(source).copied().ok_or_else(|| {
                        AnalysisError::InvariantViolation(format!(
                            "idep of {source} required before it was computed (cycle?)"
                        ))
                    })?;
                    max_val = max_val.max(source_idep.saturating_add(weight.delta()));
                }
                max_val
            }
        };
        idep.insert(node.clone(), value);
    }

    Ok(idep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn node(id: &str, kind: i64, kinst: &str, width: u32) -> Node {
        Node {
            id: NodeId::new(id),
            kind,
            kinst: kinst.to_string(),
            width,
            freq: 1,
            category: Category::Normal,
            idep: 0,
            label: String::new(),
        }
    }

    fn edge(source: &str, target: &str, weight: EdgeWeight) -> Edge {
        Edge {
            source: NodeId::new(source),
            target: NodeId::new(target),
            weight,
        }
    }

    #[test]
    fn topo_order_respects_dependencies() {
        let nodes = vec![node("a", 1, "K1", 8), node("b", 0, "N/A", 8)];
        let edges = vec![edge("a", "b", EdgeWeight::SameLevel)];
        let graph = Graph::build(nodes, edges).expect("build");
        let idx_a = graph.topo_index(&NodeId::new("a")).unwrap();
        let idx_b = graph.topo_index(&NodeId::new("b")).unwrap();
        assert!(idx_b < idx_a, "dependency b must precede dependant a");
    }

    #[test]
    fn idep_propagates_index_crossing_delta() {
        let nodes = vec![
            node("x", 1, "Kx", 32),
            node("y", 1, "Ky", 32),
            node("c", 0, "N/A", 32),
        ];
        let edges = vec![
            edge("x", "y", EdgeWeight::IndexCrossing),
            edge("y", "c", EdgeWeight::SameLevel),
        ];
        let graph = Graph::build(nodes, edges).expect("build");
        assert_eq!(graph.idep(&NodeId::new("c")), 0);
        assert_eq!(graph.idep(&NodeId::new("y")), 0);
        assert_eq!(graph.idep(&NodeId::new("x")), 1);
        assert_eq!(graph.max_idep(), 1);
    }

    #[test]
    fn unknown_edge_reference_is_schema_error() {
        let nodes = vec![node("a", 1, "K1", 8)];
        let edges = vec![edge("a", "missing", EdgeWeight::SameLevel)];
        let err = Graph::build(nodes, edges).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownNodeReference { .. }));
    }

    #[test]
    fn empty_graph_has_zero_max_idep() {
        let graph = Graph::build(vec![], vec![]).expect("build");
        assert_eq!(graph.max_idep(), 0);
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn kinst_index_groups_same_instruction_nodes() {
        let nodes = vec![
            node("a", 1, "K1", 8),
            node("b", 1, "K1", 8),
            node("c", 0, "N/A", 8),
        ];
        let graph = Graph::build(nodes, vec![]).expect("build");
        let grouped = graph.nodes_for_kinst("K1");
        assert_eq!(grouped.len(), 2);
        assert!(grouped.contains(&NodeId::new("a")));
        assert!(grouped.contains(&NodeId::new("b")));
    }
}
