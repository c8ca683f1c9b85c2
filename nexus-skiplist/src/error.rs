//! Error types for skip list operations.

use thiserror::Error;

/// Errors returned by [`SkipMap`](crate::SkipMap) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An argument was outside its accepted range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested key has no entry.
    #[error("key not found")]
    KeyNotFound,
}

/// A structural invariant found broken by
/// [`SkipMap::check_invariants`](crate::SkipMap::check_invariants).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// A key is not strictly greater than its left neighbour.
    #[error("level {level}: node {node} is out of order")]
    Unordered {
        /// Level of the offending node.
        level: usize,
        /// Storage slot of the offending node.
        node: usize,
    },

    /// A `left`/`right` or `up`/`down` pair does not point back.
    #[error("level {level}: node {node} has an asymmetric link")]
    BrokenLink {
        /// Level of the offending node.
        level: usize,
        /// Storage slot of the offending node.
        node: usize,
    },

    /// A tower node is missing its copy below, or belongs to another key.
    #[error("level {level}: node {node} breaks its tower")]
    BrokenTower {
        /// Level of the offending node.
        level: usize,
        /// Storage slot of the offending node.
        node: usize,
    },

    /// The sentinel column is not a contiguous stack of front markers.
    #[error("level {level}: bad sentinel")]
    Sentinel {
        /// Level of the offending sentinel.
        level: usize,
    },

    /// The live count disagrees with the bottom level.
    #[error("count is {expected} but level 0 holds {actual} entries")]
    CountMismatch {
        /// The live count.
        expected: usize,
        /// Entries found by walking level 0.
        actual: usize,
    },

    /// Storage holds nodes that no level links to.
    #[error("storage holds {stored} nodes but {linked} are linked")]
    Leaked {
        /// Occupied storage slots.
        stored: usize,
        /// Nodes reached by walking every level, sentinels included.
        linked: usize,
    },
}
