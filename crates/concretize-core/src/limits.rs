//! Fixed constants shared across the crate.
//!
//! DoS-prevention limits are validated by the loader before any allocation
//! proportional to their count is made, the same pattern the persistence
//! layer this crate descends from used for its binary format.

/// Maximum node count accepted by the loader. A legitimate symbolic trace
/// graph is bounded by the instruction budget of one execution; this caps
/// memory blowup from a malformed or adversarial input file.
pub const MAX_NODE_COUNT: usize = 2_000_000;

/// Maximum edge count accepted by the loader.
pub const MAX_EDGE_COUNT: usize = 20_000_000;

/// Assumed fixed byte cost of one recorded trace instruction, used as the
/// denominator of the coverage/frequency score. Overridable by the CLI's
/// `--byte-cost` flag for architectures whose trace entries differ in size.
pub const DEFAULT_BYTE_COST: u64 = 64;

/// Default number of entries the CLI prints per ranking when not overridden
/// by `--top`.
pub const DEFAULT_REPORT_TOP_N: usize = 5;
