//! Error type for every fallible operation in the crate.
//!
//! The core never panics on malformed input; every failure path returns a
//! variant of [`AnalysisError`]. Variants are grouped the way the design
//! separates them: schema errors (reject before any analysis runs),
//! invariant violations (a corrupt or inconsistent graph was detected
//! mid-analysis), and I/O (surfaced only at the CLI boundary — the core
//! itself never touches the filesystem).

use thiserror::Error;

use crate::types::NodeId;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("malformed input: {0}")]
    Schema(String),

    #[error("edge references unknown node: {source} -> {target}")]
    UnknownNodeReference { source: String, target: String },

    #[error("invalid edge weight {0} (expected 1.0 or 1.5)")]
    InvalidEdgeWeight(f64),

    #[error("node {0} has zero width but is not a constant")]
    ZeroWidth(NodeId),

    #[error("graph invariant violated: {0}")]
    InvariantViolation(String),

    #[error("I/O error: {0}")]
    Io(String),
}
