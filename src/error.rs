//! Error types for the fixed Merkle tree

use thiserror::Error;

/// Error type for tree operations.
///
/// Every check runs before the tree is touched, so a failed call leaves the
/// tree exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The tree cannot hold that many leaves
    #[error("tree is full (capacity {capacity}, requested {requested})")]
    CapacityExceeded { capacity: usize, requested: usize },
    /// Index outside the writable or readable range of the leaves
    #[error("index out of bounds: {index} (leaves {len})")]
    IndexOutOfBounds { index: usize, len: usize },
    /// Tree edge requested past the last leaf
    #[error("index out of range: {index} (leaves {count})")]
    IndexOutOfRange { index: usize, count: usize },
    /// No leaf holds the requested value or the slot is a hole
    #[error("element not found")]
    ElementNotFound,
    /// The tree was built without a hash function
    #[error("hash function is missing")]
    InvalidHashFunction,
    /// Levels must be positive and leave room for the capacity in a `usize`
    #[error("invalid number of levels: {0}")]
    InvalidLevels(usize),
    /// Slices were requested with a count of zero
    #[error("slice count must be positive")]
    InvalidSliceCount,
    /// A proof does not hash up to its root or is malformed
    #[error("invalid merkle proof")]
    InvalidMerkleProof,
    /// Leaves handed to a partial tree do not line up with its edge
    #[error("invalid number of elements: expected {expected}, got {actual}")]
    InvalidElementCount { expected: usize, actual: usize },
    /// Partial trees do not hold leaves below their edge
    #[error("index {index} is below the edge {edge}")]
    BelowEdge { index: usize, edge: usize },
    /// A partial tree edge can only move towards the first leaf
    #[error("new edge index {requested} should be smaller than {current}")]
    InvalidEdgeShift { current: usize, requested: usize },
    /// Serialized bytes do not describe a tree
    #[error("failed to decode tree state: {0}")]
    DecodeFailure(String),
}
