//! # halftopo
//!
//! Half-edge topology construction for triangle index buffers.
//!
//! halftopo turns a flat index sequence (three vertex indices per triangle)
//! into a half-edge graph with O(1) adjacency navigation. It is the
//! connectivity layer that mesh-processing passes such as simplification,
//! subdivision, boundary extraction or normal smoothing are built on.
//!
//! ## Features
//!
//! - **Arena storage**: half-edges live in one vector and link to each other
//!   by index, so the structure is freed as a unit and shared freely between
//!   threads once built
//! - **Deterministic twins**: twin pairs do not depend on triangle order for
//!   manifold input
//! - **Explicit non-manifold policy**: duplicate directed edges are recorded
//!   or rejected, never silently overwritten
//! - **Index-buffer readers**: text and little-endian `u16` buffers
//!
//! ## Quick Start
//!
//! ```
//! use halftopo::prelude::*;
//!
//! // A closed tetrahedron
//! let indices = [0, 2, 1, 0, 1, 3, 1, 2, 3, 2, 0, 3];
//! let topo = HalfEdgeBuilder::new().build(&indices).unwrap();
//!
//! assert_eq!(topo.count(), 12);
//! assert!(topo.is_closed());
//!
//! // Walk around a face and across an edge
//! let he = HalfEdgeId::new(0);
//! assert_eq!(topo.next(topo.next(topo.next(he))), he);
//! let twin = topo.twin(he).unwrap();
//! assert_eq!(topo.origin(twin), topo.destination(he));
//! ```
//!
//! ## Non-manifold Input
//!
//! ```
//! use halftopo::prelude::*;
//!
//! // Two faces share the directed edge 0 -> 1
//! let indices = [0, 1, 2, 0, 1, 3];
//!
//! let topo = build_from_indices(&indices).unwrap();
//! assert_eq!(topo.non_manifold_edges().len(), 1);
//!
//! let strict = HalfEdgeBuilder::with_options(BuildOptions::strict());
//! assert!(matches!(
//!     strict.build(&indices),
//!     Err(TopologyError::NonManifoldEdge { .. })
//! ));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use halftopo::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Result, TopologyError};
    pub use crate::mesh::{
        build_from_indices, build_from_triangles, BuildOptions, EdgeKey, FaceId, HalfEdge,
        HalfEdgeBuilder, HalfEdgeCollection, HalfEdgeId, NonManifoldPolicy, VertexId,
    };
}
