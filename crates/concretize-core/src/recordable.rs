//! # Candidate Enumerator
//!
//! For every kinst not yet recorded, computes what recording it — on top of
//! an already-chosen baseline — would concretize: the directly pinned
//! nodes, any other recordable instructions subsumed as a side effect
//! ("hidden"), and the full set of newly-concrete nodes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::closure::{extend_closure, has_symbolic_dependency};
use crate::error::AnalysisError;
use crate::graph::Graph;
use crate::types::NodeId;

/// What recording a single kinst would yield, relative to the baseline it
/// was computed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordableInst {
    pub kinst: String,
    pub width: u32,
    pub freq: u64,
    pub rec_nodes: BTreeSet<NodeId>,
    pub hidden_nodes: BTreeSet<NodeId>,
    pub concretized_nodes: BTreeSet<NodeId>,
}

/// Enumerate every new candidate kinst given an already-applied baseline
/// sequence. `baseline` entries are assumed already chosen; the result
/// contains one fresh `RecordableInst` per remaining valid-kinst node not
/// already covered, in topological order of its representative node.
pub fn analyze_recordable(
    graph: &Graph,
    baseline: &[RecordableInst],
) -> Result<Vec<RecordableInst>, AnalysisError> {
    let mut concretized: BTreeSet<NodeId> = BTreeSet::new();
    let mut checked: BTreeSet<NodeId> = BTreeSet::new();

    for entry in baseline {
        concretized.extend(entry.rec_nodes.iter().cloned());
        checked.extend(entry.rec_nodes.iter().cloned());
        checked.extend(entry.hidden_nodes.iter().cloned());
    }

    let expected_union: BTreeSet<NodeId> = baseline
        .iter()
        .flat_map(|entry| entry.concretized_nodes.iter().cloned())
        .collect();

    // Nodes whose only dependencies are constants never close here — they
    // are inputs, not inference targets — so this only re-derives nodes
    // that became concretizable purely from the baseline's rec_nodes.
    extend_closure(graph, &mut concretized, 0);

    if concretized != expected_union && !baseline.is_empty() {
        warn!("input graph is not simplified, dangling constant nodes detected");
    }

    let mut candidates = Vec::new();

    for node_id in graph.topo_order() {
        if checked.contains(node_id) {
            continue;
        }
        let Some(node) = graph.node(node_id) else {
            continue;
        };
        if !node.has_valid_kinst() {
            continue;
        }

        let kinst_nodes = graph.nodes_for_kinst(&node.kinst);
        checked.extend(kinst_nodes.iter().cloned());

        let mut local: BTreeSet<NodeId> = concretized.clone();
        local.extend(kinst_nodes.iter().cloned());

        let Some(topo_idx) = graph.topo_index(node_id) else {
            continue;
        };
        let added = extend_closure(graph, &mut local, topo_idx + 1);

        let mut hidden_nodes = BTreeSet::new();
        for added_id in &added {
            let is_valid_kinst = graph
                .node(added_id)
                .is_some_and(crate::types::Node::has_valid_kinst);
            if is_valid_kinst && has_symbolic_dependency(graph, added_id) {
                hidden_nodes.insert(added_id.clone());
                checked.insert(added_id.clone());
            }
        }

        let concretized_nodes: BTreeSet<NodeId> =
            local.difference(&concretized).cloned().collect();

        candidates.push(RecordableInst {
            kinst: node.kinst.clone(),
            width: node.width,
            freq: node.freq,
            rec_nodes: kinst_nodes,
            hidden_nodes,
            concretized_nodes,
        });
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Edge, EdgeWeight, Node};

    fn node(id: &str, kind: i64, kinst: &str, width: u32, freq: u64, idep: u64) -> Node {
        Node {
            id: NodeId::new(id),
            kind,
            kinst: kinst.to_string(),
            width,
            freq,
            category: Category::Normal,
            idep,
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
    fn single_pin_scenario() {
        // S1: a{kind=1,kinst=K1,width=8} -> c{kind=0}
        let nodes = vec![node("a", 1, "K1", 8, 1, 0), node("c", 0, "N/A", 8, 0, 0)];
        let edges = vec![edge("a", "c", EdgeWeight::SameLevel)];
        let graph = Graph::build(nodes, edges).expect("build");

        let candidates = analyze_recordable(&graph, &[]).expect("analyze");
        assert_eq!(candidates.len(), 1);
        let only = &candidates[0];
        assert_eq!(only.kinst, "K1");
        assert_eq!(only.rec_nodes, BTreeSet::from([NodeId::new("a")]));
        assert!(only.hidden_nodes.is_empty());
        assert_eq!(only.concretized_nodes, BTreeSet::from([NodeId::new("a")]));
    }

    #[test]
    fn hidden_node_scenario() {
        // S2: x{Kx,w=32,idep=1} -1.5-> y{Ky,w=32,idep=0} -1.0-> c{const}
        let nodes = vec![
            node("x", 1, "Kx", 32, 2, 1),
            node("y", 1, "Ky", 32, 2, 0),
            node("c", 0, "N/A", 32, 0, 0),
        ];
        let edges = vec![
            edge("x", "y", EdgeWeight::IndexCrossing),
            edge("y", "c", EdgeWeight::SameLevel),
        ];
        let graph = Graph::build(nodes, edges).expect("build");

        let candidates = analyze_recordable(&graph, &[]).expect("analyze");
        // topo order: y before x (y is x's dependency). Ky is reached first;
        // closure over its local set pins x as a side effect, marking x
        // hidden and folding x's kinst into checked_kinst, so Kx is never
        // enumerated as a separate candidate (hase.py does the same: a node
        // added to hidden_nodes also joins checked_kinst_set).
        assert_eq!(candidates.len(), 1);
        let ky = &candidates[0];
        assert_eq!(ky.kinst, "Ky");
        assert_eq!(ky.rec_nodes, BTreeSet::from([NodeId::new("y")]));
        assert_eq!(ky.hidden_nodes, BTreeSet::from([NodeId::new("x")]));
        assert!(ky.concretized_nodes.contains(&NodeId::new("x")));
        assert!(ky.concretized_nodes.contains(&NodeId::new("y")));
    }

    #[test]
    fn graph_of_only_constants_yields_no_candidates() {
        let nodes = vec![node("c1", 0, "N/A", 8, 0, 0), node("c2", 0, "N/A", 8, 0, 0)];
        let graph = Graph::build(nodes, vec![]).expect("build");
        let candidates = analyze_recordable(&graph, &[]).expect("analyze");
        assert!(candidates.is_empty());
    }
}
