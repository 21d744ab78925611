//! # concretize-core
//!
//! The deterministic constraint-graph analysis engine — THE LOGIC.
//!
//! Given a symbolic-execution constraint/expression graph, this crate
//! enumerates which single instructions, if recorded during trace capture,
//! would let the largest and most valuable share of the graph be
//! concretized on replay, and ranks those candidates by two coverage
//! heuristics.
//!
//! ## Architecture
//!
//! - [`loader`] is the only module that touches the wire (JSON) format.
//! - [`graph`] owns the immutable node/edge collections and every index
//!   derived from them (topological order, indirect depth, kinst index).
//! - [`closure`] is the fixed-point concretization sweep used both to seed
//!   and to extend a baseline.
//! - [`recordable`] enumerates per-kinst candidates (`RecordableInst`)
//!   using the closure engine.
//! - [`scoring`] computes the two ranking heuristics and the query filter.
//! - [`report`] turns a scored sequence into a structured report or a
//!   visualizer-facing annotation; it never depends on a visualizer crate.
//!
//! ## Architectural constraints
//!
//! The core is pure, synchronous and I/O-free beyond the loader's single
//! file-reading entry point: no async runtime, no network, no persisted
//! state across invocations. Every collection keyed by node identity is a
//! `BTreeMap`/`BTreeSet` so iteration order — and therefore every report
//! this crate produces — is reproducible across runs on the same input.

pub mod closure;
pub mod error;
pub mod graph;
pub mod limits;
pub mod loader;
pub mod recordable;
pub mod report;
pub mod scoring;
pub mod types;

pub use closure::{close, extend_closure, has_symbolic_dependency};
pub use error::AnalysisError;
pub use graph::Graph;
pub use limits::{DEFAULT_BYTE_COST, DEFAULT_REPORT_TOP_N, MAX_EDGE_COUNT, MAX_NODE_COUNT};
pub use loader::{load_from_path, load_from_str};
pub use recordable::{RecordableInst, analyze_recordable};
pub use report::{
    Annotation, ReportEntry, annotate, baseline_closure, check_disjoint, report_entry,
    residual_max_idep,
};
pub use scoring::{
    coverage_freq_score, coverage_score, filter_cover, sort_by_coverage_freq_score,
    sort_by_coverage_score,
};
pub use types::{CONSTANT_KIND, Category, Edge, EdgeWeight, Node, NodeId};
