//! Error types for halftopo.
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

use crate::mesh::{FaceId, HalfEdgeId, VertexId};

/// Result type alias using [`TopologyError`].
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Errors that can occur while building or querying a half-edge topology.
#[derive(Error, Debug)]
pub enum TopologyError {
    /// The index sequence cannot be turned into triangles.
    #[error("invalid index count {len}: {reason}")]
    InvalidInput {
        /// The offending index count.
        len: usize,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A directed edge was registered by more than one half-edge.
    #[error("directed edge ({origin}, {destination}) already owned by {existing:?}, duplicated by {duplicate:?}")]
    NonManifoldEdge {
        /// Origin of the duplicated edge.
        origin: VertexId,
        /// Destination of the duplicated edge.
        destination: VertexId,
        /// The half-edge that registered the edge first.
        existing: HalfEdgeId,
        /// The half-edge that tried to register it again.
        duplicate: HalfEdgeId,
    },

    /// A triangle repeats one of its vertices.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: FaceId,
    },

    /// A half-edge id is out of range.
    #[error("half-edge {id} not found")]
    NotFound {
        /// The requested id.
        id: usize,
    },

    /// A structural invariant does not hold.
    #[error("invariant violated at half-edge {id:?}: {reason}")]
    InvariantViolation {
        /// The lowest offending half-edge.
        id: HalfEdgeId,
        /// What went wrong.
        reason: &'static str,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A token in a text index buffer is not an unsigned integer.
    #[error("line {line}: cannot parse '{token}' as a vertex index")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// A text index buffer holds a value outside the 16-bit range.
    #[error("line {line}: vertex index {value} exceeds 65535")]
    IndexOutOfRange {
        /// 1-based line number.
        line: usize,
        /// The offending value.
        value: u64,
    },

    /// A binary index buffer has an odd number of bytes.
    #[error("binary index buffer has odd length {len}")]
    OddByteLength {
        /// Buffer length in bytes.
        len: usize,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}
