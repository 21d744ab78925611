//! # Graph Loader
//!
//! Deserializes the wire record (case-sensitive `Kind`/`KInst`/`Width`/
//! `Freq`/`Category`/`IDep`/`DbgInfo`/`label` fields) into the internal
//! [`Node`]/[`Edge`] types and hands them to [`Graph::build`]. This is the
//! only module depending on `serde_json`; nothing downstream of it touches
//! the wire representation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::AnalysisError;
use crate::graph::Graph;
use crate::limits::{MAX_EDGE_COUNT, MAX_NODE_COUNT};
use crate::types::{Category, Edge, EdgeWeight, Node, NodeId};

#[derive(Debug, Deserialize)]
struct NodeRecord {
    #[serde(rename = "Kind")]
    kind: i64,
    #[serde(rename = "KInst", default)]
    kinst: String,
    #[serde(rename = "Width")]
    width: u32,
    #[serde(rename = "Freq", default)]
    freq: u64,
    #[serde(rename = "Category", default = "default_category")]
    category: Category,
    #[serde(rename = "IDep", default)]
    idep: u64,
    #[serde(rename = "DbgInfo", default)]
    #[allow(dead_code)]
    dbg_info: String,
    #[serde(default)]
    label: String,
}

fn default_category() -> Category {
    Category::Normal
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    source: String,
    target: String,
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct GraphRecord {
    nodes: BTreeMap<String, NodeRecord>,
    edges: Vec<EdgeRecord>,
}

/// Parse and validate a graph from a JSON string, then build its derived
/// indexes. DoS-prevention size limits are checked before any per-node or
/// per-edge allocation proportional to the untrusted counts is performed.
#[instrument(skip(json))]
pub fn load_from_str(json: &str) -> Result<Graph, AnalysisError> {
    let record: GraphRecord =
        serde_json::from_str(json).map_err(|e| AnalysisError::Schema(e.to_string()))?;

    if record.nodes.len() > MAX_NODE_COUNT {
        return Err(AnalysisError::Schema(format!(
            "node count {} exceeds maximum {MAX_NODE_COUNT}",
            record.nodes.len()
        )));
    }
    if record.edges.len() > MAX_EDGE_COUNT {
        return Err(AnalysisError::Schema(format!(
            "edge count {} exceeds maximum {MAX_EDGE_COUNT}",
            record.edges.len()
        )));
    }

    let mut nodes = Vec::with_capacity(record.nodes.len());
    for (id, rec) in record.nodes {
        nodes.push(Node {
            id: NodeId::new(id),
            kind: rec.kind,
            kinst: rec.kinst,
            width: rec.width,
            freq: rec.freq,
            category: rec.category,
            idep: rec.idep,
            label: rec.label,
        });
    }

    let mut edges = Vec::with_capacity(record.edges.len());
    for rec in record.edges {
        let weight = EdgeWeight::from_raw(rec.weight)
            .ok_or(AnalysisError::InvalidEdgeWeight(rec.weight))?;
        edges.push(Edge {
            source: NodeId::new(rec.source),
            target: NodeId::new(rec.target),
            weight,
        });
    }

    let node_count = nodes.len();
    let edge_count = edges.len();
    let graph = Graph::build(nodes, edges)?;
    info!(node_count, edge_count, max_idep = graph.max_idep(), "graph loaded");
    Ok(graph)
}

/// Load a graph from a file path. I/O errors are wrapped in
/// [`AnalysisError::Io`]; the core proper never touches the filesystem
/// beyond this single entry point.
pub fn load_from_path(path: &Path) -> Result<Graph, AnalysisError> {
    let json = std::fs::read_to_string(path).map_err(|e| AnalysisError::Io(e.to_string()))?;
    load_from_str(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_minimal_graph() {
        let json = r#"{
            "nodes": {
                "a": {"Kind": 1, "KInst": "K1", "Width": 8, "Freq": 1, "Category": "N", "IDep": 0, "DbgInfo": "", "label": "a"},
                "c": {"Kind": 0, "KInst": "N/A", "Width": 8, "Freq": 0, "Category": "N", "IDep": 0, "DbgInfo": "", "label": "c"}
            },
            "edges": [
                {"source": "a", "target": "c", "weight": 1.0}
            ]
        }"#;
        let graph = load_from_str(json).expect("load");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn rejects_invalid_edge_weight() {
        let json = r#"{
            "nodes": {
                "a": {"Kind": 1, "KInst": "K1", "Width": 8, "Freq": 1, "Category": "N", "IDep": 0, "DbgInfo": "", "label": "a"},
                "b": {"Kind": 1, "KInst": "K2", "Width": 8, "Freq": 1, "Category": "N", "IDep": 0, "DbgInfo": "", "label": "b"}
            },
            "edges": [
                {"source": "a", "target": "b", "weight": 2.0}
            ]
        }"#;
        let err = load_from_str(json).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidEdgeWeight(_)));
    }

    #[test]
    fn rejects_unknown_edge_reference() {
        let json = r#"{
            "nodes": {
                "a": {"Kind": 1, "KInst": "K1", "Width": 8, "Freq": 1, "Category": "N", "IDep": 0, "DbgInfo": "", "label": "a"}
            },
            "edges": [
                {"source": "a", "target": "missing", "weight": 1.0}
            ]
        }"#;
        let err = load_from_str(json).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownNodeReference { .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = load_from_str("not json").unwrap_err();
        assert!(matches!(err, AnalysisError::Schema(_)));
    }
}
