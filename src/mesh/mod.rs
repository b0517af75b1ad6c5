//! Core topology data structures.
//!
//! This module provides the half-edge representation of a triangle index
//! buffer and the builder that produces it.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeCollection`], an arena of [`HalfEdge`]
//! records in which `next`, `prev` and `twin` are stored as [`HalfEdgeId`]
//! indices. It is produced by [`HalfEdgeBuilder`] and is read-only afterwards.
//!
//! # Index Types
//!
//! Elements are identified by type-safe index wrappers:
//! - [`VertexId`] - A 16-bit index into an external vertex buffer
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a triangle
//!
//! # Construction
//!
//! ```
//! use halftopo::mesh::{build_from_indices, VertexId};
//!
//! let topo = build_from_indices(&[0, 1, 2, 0, 2, 3]).unwrap();
//!
//! let diagonal = topo.find_edge(VertexId::new(0), VertexId::new(2)).unwrap();
//! let twin = topo.twin(diagonal).unwrap();
//! assert_eq!(topo.origin(twin), VertexId::new(2));
//! ```

mod builder;
mod edge_key;
mod halfedge;
mod index;
mod lookup;

pub use builder::{
    build_from_indices, build_from_triangles, BuildOptions, HalfEdgeBuilder, NonManifoldPolicy,
};
pub use edge_key::EdgeKey;
pub use halfedge::{DuplicateEdge, FaceHalfEdgeIter, HalfEdge, HalfEdgeCollection};
pub use index::{FaceId, HalfEdgeId, VertexId};
pub use lookup::EdgeLookupTable;
