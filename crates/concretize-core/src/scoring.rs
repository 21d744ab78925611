//! # Scoring & Ranking
//!
//! Coverage heuristics over a sequence of [`RecordableInst`] values, and the
//! query filter that answers "which of these alternatives covers a given
//! node". Every other module in this crate deliberately avoids floating
//! point (see the workspace-wide `clippy::float_arithmetic` lint); the two
//! scores this module computes are inherently fractional, so the lint is
//! relaxed here only, with the relaxation scoped to this file rather than
//! the whole crate.

#![allow(clippy::float_arithmetic)]

use crate::graph::Graph;
use crate::recordable::RecordableInst;
use crate::types::NodeId;

/// `Σ width(nid) · idep(nid)` over every node concretized by any entry of
/// `sequence`. Higher is better.
#[must_use]
pub fn coverage_score(graph: &Graph, sequence: &[RecordableInst]) -> f64 {
    let mut total = 0.0f64;
    for entry in sequence {
        for node_id in &entry.concretized_nodes {
            let width = f64::from(graph.node(node_id).map_or(0, |n| n.width));
            let idep = graph.idep(node_id) as f64;
            total += width * idep;
        }
    }
    total
}

/// `coverage_score(sequence) / (Σ freq(recinst) · byte_cost)`. `None` if the
/// total frequency is zero (the score is undefined, not zero — callers
/// should sort such entries last rather than treat them as worst-but-valid).
#[must_use]
pub fn coverage_freq_score(graph: &Graph, sequence: &[RecordableInst], byte_cost: u64) -> Option<f64> {
    let total_freq: u64 = sequence.iter().map(|entry| entry.freq).sum();
    if total_freq == 0 {
        return None;
    }
    let denom = total_freq as f64 * byte_cost as f64;
    Some(coverage_score(graph, sequence) / denom)
}

/// Stable ascending sort of single-candidate sequences by coverage score.
/// Callers typically take the tail (`.rev().take(n)`) for a top-N report.
pub fn sort_by_coverage_score(graph: &Graph, candidates: &mut [RecordableInst]) {
    candidates.sort_by(|a, b| {
        let sa = coverage_score(graph, std::slice::from_ref(a));
        let sb = coverage_score(graph, std::slice::from_ref(b));
        sa.total_cmp(&sb)
    });
}

/// Stable ascending sort by coverage/frequency score. Entries with an
/// undefined score (zero total frequency) sort last.
pub fn sort_by_coverage_freq_score(graph: &Graph, candidates: &mut [RecordableInst], byte_cost: u64) {
    candidates.sort_by(|a, b| {
        let sa = coverage_freq_score(graph, std::slice::from_ref(a), byte_cost);
        let sb = coverage_freq_score(graph, std::slice::from_ref(b), byte_cost);
        match (sa, sb) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}

/// Retain every outer sequence that has at least one inner entry whose
/// `concretized_nodes` contains `node_id`. Deliberately checks every inner
/// entry rather than stopping at the first — a short-circuit-on-first-miss
/// reading would silently under-report coverage for any sequence whose
/// covering entry isn't first.
pub fn filter_cover<'a>(
    sequences: &'a [Vec<RecordableInst>],
    node_id: &NodeId,
) -> Vec<&'a Vec<RecordableInst>> {
    sequences
        .iter()
        .filter(|sequence| sequence.iter().any(|entry| entry.concretized_nodes.contains(node_id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn fake_entry(concretized: &[&str], freq: u64) -> RecordableInst {
        RecordableInst {
            kinst: "K".to_string(),
            width: 8,
            freq,
            rec_nodes: BTreeSet::new(),
            hidden_nodes: BTreeSet::new(),
            concretized_nodes: concretized.iter().map(|s| NodeId::new(*s)).collect(),
        }
    }

    #[test]
    fn filter_cover_checks_every_inner_entry_not_just_the_first() {
        let seq_a = vec![fake_entry(&["other"], 1), fake_entry(&["target"], 1)];
        let seq_b = vec![fake_entry(&["unrelated"], 1)];
        let sequences = vec![seq_a.clone(), seq_b];

        let covering = filter_cover(&sequences, &NodeId::new("target"));
        assert_eq!(covering.len(), 1);
        assert_eq!(covering[0], &seq_a);
    }

    #[test]
    fn coverage_freq_score_undefined_when_total_freq_zero() {
        use crate::types::{Category, Node};
        let nodes = vec![Node {
            id: NodeId::new("a"),
            kind: 1,
            kinst: "K1".to_string(),
            width: 8,
            freq: 0,
            category: Category::Normal,
            idep: 0,
            label: String::new(),
        }];
        let graph = Graph::build(nodes, vec![]).expect("build");
        let entry = fake_entry(&["a"], 0);
        assert!(coverage_freq_score(&graph, &[entry], 64).is_none());
    }
}
