//! # Reporting & Annotation Sink
//!
//! Turns a scored sequence of [`RecordableInst`] values into either a
//! structured, `serde`-serializable report (for `--json` mode) or the
//! per-node colour classes an external visualizer would consume. The core
//! never depends on a visualizer crate — [`annotate`] is a pure function
//! returning [`Annotation`], and the caller decides what to do with it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::closure::extend_closure;
use crate::error::AnalysisError;
use crate::graph::Graph;
use crate::recordable::RecordableInst;
use crate::scoring::{coverage_freq_score, coverage_score};
use crate::types::NodeId;

/// Per-node colour classes for a single candidate: red = directly recorded,
/// green = hidden (subsumed), white = concretized by inference but neither
/// red nor green.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Annotation {
    pub red: BTreeSet<NodeId>,
    pub green: BTreeSet<NodeId>,
    pub white: BTreeSet<NodeId>,
}

/// Build the colour classes for one candidate. A node appears in at most
/// one class.
#[must_use]
pub fn annotate(entry: &RecordableInst) -> Annotation {
    let red_and_green: BTreeSet<NodeId> = entry.rec_nodes.union(&entry.hidden_nodes).cloned().collect();
    let white = entry
        .concretized_nodes
        .difference(&red_and_green)
        .cloned()
        .collect();
    Annotation {
        red: entry.rec_nodes.clone(),
        green: entry.hidden_nodes.clone(),
        white,
    }
}

/// One line of a coverage report: a single candidate plus its scores and
/// the residual depth left in the graph after it is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub kinst: String,
    pub width: u32,
    pub freq: u64,
    pub rec_count: usize,
    pub hidden_count: usize,
    pub concretized_count: usize,
    pub labels: Vec<String>,
    pub coverage_score: f64,
    pub coverage_freq_score: Option<f64>,
    pub concretized_fraction: f64,
    pub residual_max_idep: u64,
}

/// Build a report entry for a single candidate (as a one-entry sequence —
/// the scores are defined over sequences, and a lone candidate is the
/// degenerate case of a sequence with one element).
pub fn report_entry(
    graph: &Graph,
    entry: &RecordableInst,
    byte_cost: u64,
) -> ReportEntry {
    let sequence = std::slice::from_ref(entry);
    let mut labels: Vec<String> = entry
        .rec_nodes
        .iter()
        .filter_map(|id| graph.node(id).map(|n| n.label.clone()))
        .collect();
    labels.sort();

    let total_nodes = graph.node_count().max(1);
    let concretized_fraction = entry.concretized_nodes.len() as f64 / total_nodes as f64;

    ReportEntry {
        kinst: entry.kinst.clone(),
        width: entry.width,
        freq: entry.freq,
        rec_count: entry.rec_nodes.len(),
        hidden_count: entry.hidden_nodes.len(),
        concretized_count: entry.concretized_nodes.len(),
        labels,
        coverage_score: coverage_score(graph, sequence),
        coverage_freq_score: coverage_freq_score(graph, sequence, byte_cost),
        concretized_fraction,
        residual_max_idep: residual_max_idep(graph, &entry.concretized_nodes),
    }
}

/// `max_idep` of the subgraph left after deleting every node in
/// `concretized` (and all edges incident to them). idep is recomputed on
/// that residual subgraph rather than reused from the full graph: deleting
/// a concretized dependant drops its contribution to a survivor's idep, so
/// the survivor's true residual depth can only be equal to or lower than
/// its full-graph value, never the same in general. Returns `0` on an empty
/// residual graph, the same sentinel `Graph::max_idep` uses for an empty
/// input — idep is otherwise always non-negative, so `0` cannot be
/// confused with "absent".
#[must_use]
pub fn residual_max_idep(graph: &Graph, concretized: &BTreeSet<NodeId>) -> u64 {
    let survivors: Vec<&NodeId> = graph
        .topo_order()
        .iter()
        .filter(|id| !concretized.contains(*id))
        .collect();

    let mut idep: BTreeMap<NodeId, u64> = BTreeMap::new();
    for id in survivors.iter().rev() {
        let mut max_val = 0u64;
        for (source, weight) in graph.in_neighbors(id) {
            if concretized.contains(source) {
                continue;
            }
            if let Some(&source_idep) = idep.get(source) {
                max_val = max_val.max(source_idep.saturating_add(weight.delta()));
            }
        }
        idep.insert((*id).clone(), max_val);
    }

    idep.values().copied().max().unwrap_or(0)
}

/// Verifies that `concretized_nodes` across every entry of `sequence` are
/// pairwise disjoint — the aggregation invariant a report over a *chosen*
/// (not merely candidate) sequence must uphold before it is presented as a
/// coherent recording plan.
pub fn check_disjoint(sequence: &[RecordableInst]) -> Result<(), AnalysisError> {
    let mut seen: BTreeSet<NodeId> = BTreeSet::new();
    for entry in sequence {
        for id in &entry.concretized_nodes {
            if !seen.insert(id.clone()) {
                return Err(AnalysisError::InvariantViolation(format!(
                    "node {id} is concretized by more than one entry in the aggregated sequence"
                )));
            }
        }
    }
    Ok(())
}

/// Full-graph closure over an empty baseline, exposed for callers (the CLI
/// status line) that only need the global concretization baseline without
/// going through the enumerator.
#[must_use]
pub fn baseline_closure(graph: &Graph) -> BTreeSet<NodeId> {
    let mut set = BTreeSet::new();
    extend_closure(graph, &mut set, 0);
    set
}
