//! # Core Type Definitions
//!
//! Node and edge value types for the constraint-graph substrate, plus the
//! small set of identifiers that key every derived structure in the crate.
//!
//! ## Determinism Guarantees
//!
//! - `NodeId` and `Category` implement `Ord` so every collection keyed by
//!   them (`BTreeMap`/`BTreeSet`) iterates in a stable, reproducible order.
//! - Widths, frequencies and indirect depth are unsigned integers; only the
//!   scoring module (`scoring.rs`) introduces floating-point arithmetic, and
//!   it does so under an explicit, scoped lint allowance.

use serde::{Deserialize, Serialize};

/// Stable identifier of a graph node. The wire format keys nodes by string
/// id; node membership must always be tested through this type, never by
/// comparing `Node` values or pointers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Coarse classification carried on every node.
///
/// `Query` nodes are top-level constraints the CLI reports on specially;
/// `Normal` and `Other` are otherwise opaque to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "N")]
    Normal,
    #[serde(rename = "Q")]
    Query,
    #[serde(rename = "C")]
    Other,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Normal => "N",
            Self::Query => "Q",
            Self::Other => "C",
        };
        write!(f, "{s}")
    }
}

/// `kind == 0` denotes a constant node; every other value is a symbolic
/// operator or read. This is exposed as a named constant rather than a
/// magic literal scattered through the closure and enumerator logic.
pub const CONSTANT_KIND: i64 = 0;

/// A node in the constraint/expression graph.
///
/// `idep` as loaded from the wire record is informational only — the Graph
/// Core always recomputes it from the edge structure (see `graph::Graph`)
/// and the recomputed value is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: i64,
    pub kinst: String,
    pub width: u32,
    pub freq: u64,
    pub category: Category,
    pub idep: u64,
    pub label: String,
}

impl Node {
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.kind == CONSTANT_KIND
    }

    /// A kinst of `""` or `"N/A"` marks a node not attributable to any
    /// recordable instruction.
    #[must_use]
    pub fn has_valid_kinst(&self) -> bool {
        !self.kinst.is_empty() && self.kinst != "N/A"
    }
}

/// The two edge weights the graph vocabulary defines. `SameLevel` (1.0)
/// contributes nothing to indirect depth; `IndexCrossing` (1.5) contributes
/// one additional layer of indirection. Any other numeric weight on the
/// wire is a schema error, never represented by this type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EdgeWeight {
    SameLevel,
    IndexCrossing,
}

impl EdgeWeight {
    pub const SAME_LEVEL_VALUE: f64 = 1.0;
    pub const INDEX_CROSSING_VALUE: f64 = 1.5;

    /// Parse a raw numeric edge weight, rejecting anything outside the two
    /// defined values.
    pub fn from_raw(value: f64) -> Option<Self> {
        if (value - Self::SAME_LEVEL_VALUE).abs() < f64::EPSILON {
            Some(Self::SameLevel)
        } else if (value - Self::INDEX_CROSSING_VALUE).abs() < f64::EPSILON {
            Some(Self::IndexCrossing)
        } else {
            None
        }
    }

    /// The idep contribution (Δ) of traversing this edge.
    #[must_use]
    pub const fn delta(self) -> u64 {
        match self {
            Self::SameLevel => 0,
            Self::IndexCrossing => 1,
        }
    }

    #[must_use]
    pub const fn raw(self) -> f64 {
        match self {
            Self::SameLevel => Self::SAME_LEVEL_VALUE,
            Self::IndexCrossing => Self::INDEX_CROSSING_VALUE,
        }
    }
}

/// A directed edge: `source` is the dependant, `target` is the dependency
/// ("source uses target as an operand").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: EdgeWeight,
}
