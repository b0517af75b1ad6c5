//! Half-edge topology storage and queries.
//!
//! This module provides the arena that owns every half-edge produced by the
//! [`HalfEdgeBuilder`](super::HalfEdgeBuilder). Topology links (`next`, `prev`,
//! `twin`) are stored as indices into the arena, so the whole structure is
//! freed as one unit and can be shared across threads for reading.
//!
//! # Structure
//!
//! - Each triangle contributes three consecutive half-edges forming a 3-cycle
//! - Each half-edge knows its **origin**, **destination**, **next** and **prev**
//!   half-edge around its face, and optionally its **twin**
//! - A half-edge without a twin lies on the mesh boundary
//!
//! # Boundary Handling
//!
//! No boundary half-edges are synthesised: a boundary edge is simply a
//! half-edge whose twin is absent. [`HalfEdgeCollection::boundary_edges`]
//! enumerates them by ascending id and [`HalfEdgeCollection::boundary_loops`]
//! chains them into loops.

use std::collections::HashMap;

use rayon::prelude::*;

use super::edge_key::EdgeKey;
use super::index::{FaceId, HalfEdgeId, VertexId};
use super::lookup::EdgeLookupTable;
use crate::error::{Result, TopologyError};

/// A directed edge of one triangular face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge {
    /// Position of this half-edge in its collection.
    pub id: HalfEdgeId,

    /// The vertex this half-edge starts at.
    pub origin: VertexId,

    /// The vertex this half-edge points to.
    pub destination: VertexId,

    /// The next half-edge around the face.
    pub next: HalfEdgeId,

    /// The previous half-edge around the face.
    pub prev: HalfEdgeId,

    /// The oppositely directed half-edge of the neighbouring face.
    /// `None` on the boundary.
    pub twin: Option<HalfEdgeId>,
}

impl HalfEdge {
    /// The face this half-edge belongs to.
    #[inline]
    pub fn face(&self) -> FaceId {
        self.id.face()
    }

    /// The directed key `(origin, destination)`.
    #[inline]
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.origin, self.destination)
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.twin.is_none()
    }
}

/// A directed edge registered by more than one half-edge.
///
/// The first registration keeps ownership of the edge in the lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateEdge {
    /// The duplicated directed edge.
    pub key: EdgeKey,
    /// The half-edge that owns the edge.
    pub existing: HalfEdgeId,
    /// The half-edge whose registration was refused.
    pub duplicate: HalfEdgeId,
}

impl DuplicateEdge {
    /// Convert into the matching [`TopologyError::NonManifoldEdge`].
    pub fn to_error(&self) -> TopologyError {
        TopologyError::NonManifoldEdge {
            origin: self.key.origin(),
            destination: self.key.destination(),
            existing: self.existing,
            duplicate: self.duplicate,
        }
    }
}

/// The half-edge topology of a triangle list.
///
/// Built once by [`HalfEdgeBuilder`](super::HalfEdgeBuilder) and read-only
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct HalfEdgeCollection {
    /// All half-edges, indexed by id.
    pub(crate) halfedges: Vec<HalfEdge>,

    /// Directed edge owners, retained for `find_edge`.
    pub(crate) table: EdgeLookupTable,

    /// Duplicate directed edges seen while building.
    pub(crate) duplicates: Vec<DuplicateEdge>,

    /// Faces that repeat a vertex.
    pub(crate) degenerate: Vec<FaceId>,
}

impl HalfEdgeCollection {
    // ==================== Accessors ====================

    /// Get the number of half-edges.
    #[inline]
    pub fn count(&self) -> usize {
        self.halfedges.len()
    }

    /// Alias for [`count`](Self::count).
    #[inline]
    pub fn len(&self) -> usize {
        self.halfedges.len()
    }

    /// Whether the collection holds no half-edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.halfedges.is_empty()
    }

    /// Get the number of triangular faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.halfedges.len() / 3
    }

    /// Get a half-edge by raw id.
    pub fn get(&self, id: usize) -> Result<&HalfEdge> {
        self.halfedges
            .get(id)
            .ok_or(TopologyError::NotFound { id })
    }

    /// Get a half-edge by ID.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this collection.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.halfedges[id.index()]
    }

    /// Look up the half-edge owning the directed edge `origin -> destination`.
    #[inline]
    pub fn find_edge(&self, origin: VertexId, destination: VertexId) -> Option<HalfEdgeId> {
        self.table.find(EdgeKey::new(origin, destination))
    }

    // ==================== Topology Queries ====================

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).prev
    }

    /// Get the twin (opposite) half-edge, if any.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId) -> Option<HalfEdgeId> {
        self.halfedge(he).twin
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId) -> VertexId {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn destination(&self, he: HalfEdgeId) -> VertexId {
        self.halfedge(he).destination
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId) -> FaceId {
        he.face()
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Whether every half-edge has a twin.
    pub fn is_closed(&self) -> bool {
        self.halfedges.iter().all(|he| he.twin.is_some())
    }

    /// One past the largest vertex index referenced, or 0 when empty.
    pub fn vertex_count_hint(&self) -> usize {
        self.halfedges
            .iter()
            .map(|he| he.origin.index() + 1)
            .max()
            .unwrap_or(0)
    }

    // ==================== Iteration ====================

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all half-edges in id order.
    pub fn halfedges(&self) -> impl Iterator<Item = &HalfEdge> + '_ {
        self.halfedges.iter()
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.num_faces()).map(FaceId::new)
    }

    /// Iterate over the three half-edges of a face.
    pub fn face_halfedges(&self, f: FaceId) -> FaceHalfEdgeIter<'_> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Get the three vertices of a face in winding order.
    pub fn face_vertices(&self, f: FaceId) -> [VertexId; 3] {
        let he0 = f.first_halfedge();
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        [self.origin(he0), self.origin(he1), self.origin(he2)]
    }

    /// All half-edges without a twin, by ascending id.
    pub fn boundary_edges(&self) -> impl Iterator<Item = &HalfEdge> + '_ {
        self.halfedges.iter().filter(|he| he.is_boundary())
    }

    /// Every twin pair once, as `(lower id, higher id)`, by ascending lower id.
    pub fn twin_pairs(&self) -> impl Iterator<Item = (HalfEdgeId, HalfEdgeId)> + '_ {
        self.halfedges.iter().filter_map(|he| match he.twin {
            Some(twin) if he.id < twin => Some((he.id, twin)),
            _ => None,
        })
    }

    /// Chain boundary half-edges into loops.
    ///
    /// Each loop starts at the smallest boundary half-edge not yet visited and
    /// follows, from each destination, the smallest unvisited boundary
    /// half-edge leaving that vertex. A loop ends when it returns to its
    /// starting vertex. Non-manifold input can leave open chains, which are
    /// returned as they are.
    pub fn boundary_loops(&self) -> Vec<Vec<HalfEdgeId>> {
        // Boundary half-edges leaving each vertex, with a cursor past the
        // visited prefix
        let mut outgoing: HashMap<VertexId, (Vec<HalfEdgeId>, usize)> = HashMap::new();
        for he in self.boundary_edges() {
            outgoing.entry(he.origin).or_default().0.push(he.id);
        }

        let mut visited = vec![false; self.halfedges.len()];
        let mut loops = Vec::new();

        for start in self.boundary_edges() {
            if visited[start.id.index()] {
                continue;
            }

            let mut chain = Vec::new();
            let mut current = start.id;
            loop {
                visited[current.index()] = true;
                chain.push(current);

                let dest = self.destination(current);
                if dest == start.origin {
                    break;
                }

                let candidate = outgoing.get_mut(&dest).and_then(|(hes, cursor)| {
                    while *cursor < hes.len() && visited[hes[*cursor].index()] {
                        *cursor += 1;
                    }
                    hes.get(*cursor).copied()
                });
                match candidate {
                    Some(he) => current = he,
                    None => break,
                }
            }
            loops.push(chain);
        }

        loops
    }

    /// Directed edges registered more than once while building.
    pub fn non_manifold_edges(&self) -> &[DuplicateEdge] {
        &self.duplicates
    }

    /// Faces that repeat a vertex.
    pub fn degenerate_faces(&self) -> &[FaceId] {
        &self.degenerate
    }

    // ==================== Validation ====================

    /// Check the face-cycle and twin invariants of every half-edge.
    ///
    /// Half-edges are checked in parallel; the error reports the lowest
    /// offending id.
    pub fn validate(&self) -> Result<()> {
        if self.halfedges.len() % 3 != 0 {
            return Err(TopologyError::InvariantViolation {
                id: HalfEdgeId::new(self.halfedges.len() - 1),
                reason: "half-edge count is not a multiple of 3",
            });
        }

        let violation = self
            .halfedges
            .par_iter()
            .enumerate()
            .filter_map(|(i, he)| self.check_halfedge(i, he).map(|reason| (i, reason)))
            .min_by_key(|&(i, _)| i);

        match violation {
            Some((i, reason)) => Err(TopologyError::InvariantViolation {
                id: HalfEdgeId::new(i),
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Check if the topology is consistent.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn check_halfedge(&self, i: usize, he: &HalfEdge) -> Option<&'static str> {
        let lookup = |id: HalfEdgeId| self.halfedges.get(id.index());

        if he.id.index() != i {
            return Some("id does not match position");
        }

        let (next, prev) = match (lookup(he.next), lookup(he.prev)) {
            (Some(next), Some(prev)) => (next, prev),
            _ => return Some("face link out of range"),
        };
        if next.face() != he.face() || prev.face() != he.face() {
            return Some("face link leaves the face");
        }
        if next.origin != he.destination {
            return Some("next does not start at destination");
        }
        if prev.next != he.id || next.prev != he.id {
            return Some("next/prev are not inverse");
        }
        match lookup(next.next) {
            Some(third) if third.next == he.id && third.id == he.prev => {}
            _ => return Some("face is not a 3-cycle"),
        }

        if let Some(twin_id) = he.twin {
            let twin = match lookup(twin_id) {
                Some(twin) => twin,
                None => return Some("twin out of range"),
            };
            if twin.id == he.id {
                return Some("half-edge is its own twin");
            }
            if twin.twin != Some(he.id) {
                return Some("twin is not an involution");
            }
            if twin.origin != he.destination || twin.destination != he.origin {
                return Some("twin endpoints are not swapped");
            }
        }

        None
    }
}

/// Iterator over the half-edges of a face.
pub struct FaceHalfEdgeIter<'a> {
    collection: &'a HalfEdgeCollection,
    start: HalfEdgeId,
    current: HalfEdgeId,
    done: bool,
}

impl<'a> FaceHalfEdgeIter<'a> {
    fn new(collection: &'a HalfEdgeCollection, f: FaceId) -> Self {
        let start = f.first_halfedge();
        Self {
            collection,
            start,
            current: start,
            done: start.index() >= collection.len(),
        }
    }
}

impl<'a> Iterator for FaceHalfEdgeIter<'a> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.collection.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}
