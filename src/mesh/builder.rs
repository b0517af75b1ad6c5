//! Topology construction from triangle index buffers.
//!
//! The builder makes a single pass over the index sequence. Every triangle
//! `(t1, t2, t3)` produces the half-edges `t1 -> t2`, `t2 -> t3` and
//! `t3 -> t1`, which are linked into a face cycle and registered in the
//! [`EdgeLookupTable`]. Each new half-edge then looks up its reversed key; a
//! hit links both sides as twins, a miss is resolved later from the other
//! side when the neighbouring triangle arrives.

use std::collections::{HashMap, VecDeque};

use log::{debug, trace, warn};

use super::edge_key::EdgeKey;
use super::halfedge::{DuplicateEdge, HalfEdge, HalfEdgeCollection};
use super::index::{FaceId, HalfEdgeId, VertexId};
use super::lookup::EdgeLookupTable;
use crate::error::{Result, TopologyError};

/// What to do when the input is not a clean manifold triangle list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonManifoldPolicy {
    /// Finish construction and record duplicate edges and degenerate faces
    /// on the collection.
    #[default]
    Record,
    /// Fail on the first duplicate directed edge or degenerate face.
    Strict,
}

/// Options for topology construction.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// How duplicate directed edges and degenerate faces are handled.
    pub policy: NonManifoldPolicy,

    /// Expected triangle count, used to pre-allocate storage.
    /// If None, the index count of the input is used.
    pub expected_triangles: Option<usize>,
}

impl BuildOptions {
    /// Options that reject non-manifold and degenerate input.
    pub fn strict() -> Self {
        Self {
            policy: NonManifoldPolicy::Strict,
            ..Self::default()
        }
    }

    /// Set the non-manifold policy.
    pub fn with_policy(mut self, policy: NonManifoldPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the expected triangle count.
    pub fn with_expected_triangles(mut self, triangles: usize) -> Self {
        self.expected_triangles = Some(triangles);
        self
    }
}

/// Builds a [`HalfEdgeCollection`] from a flat triangle index sequence.
///
/// # Example
/// ```
/// use halftopo::mesh::HalfEdgeBuilder;
///
/// // A quad split along the 0-2 diagonal
/// let topo = HalfEdgeBuilder::new().build(&[0, 1, 2, 0, 2, 3]).unwrap();
///
/// assert_eq!(topo.count(), 6);
/// assert_eq!(topo.twin_pairs().count(), 1);
/// assert_eq!(topo.boundary_edges().count(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HalfEdgeBuilder {
    options: BuildOptions,
}

impl HalfEdgeBuilder {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with the given options.
    pub fn with_options(options: BuildOptions) -> Self {
        Self { options }
    }

    /// The options this builder uses.
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Build the topology of `indices`, three indices per triangle.
    ///
    /// # Errors
    /// - [`TopologyError::InvalidInput`] if the length is not a multiple of 3
    ///   or exceeds `u32::MAX`; nothing is built in that case.
    /// - [`TopologyError::NonManifoldEdge`] and [`TopologyError::DegenerateFace`]
    ///   under [`NonManifoldPolicy::Strict`].
    pub fn build(&self, indices: &[u16]) -> Result<HalfEdgeCollection> {
        check_index_count(indices.len())?;

        let capacity = self
            .options
            .expected_triangles
            .map_or(indices.len(), |t| t * 3);
        let mut topo = HalfEdgeCollection {
            halfedges: Vec::with_capacity(capacity),
            table: EdgeLookupTable::with_capacity(capacity),
            duplicates: Vec::new(),
            degenerate: Vec::new(),
        };

        // Refused duplicates still waiting for a twin, oldest first
        let mut unpaired: HashMap<EdgeKey, VecDeque<HalfEdgeId>> = HashMap::new();

        let mut linked = 0usize;
        for (fi, tri) in indices.chunks_exact(3).enumerate() {
            let face = FaceId::new(fi);
            let corners = [
                VertexId::from_raw(tri[0]),
                VertexId::from_raw(tri[1]),
                VertexId::from_raw(tri[2]),
            ];

            if corners[0] == corners[1] || corners[1] == corners[2] || corners[2] == corners[0] {
                match self.options.policy {
                    NonManifoldPolicy::Strict => {
                        return Err(TopologyError::DegenerateFace { face });
                    }
                    NonManifoldPolicy::Record => {
                        warn!("face {} is degenerate: {:?}", face, corners);
                        topo.degenerate.push(face);
                    }
                }
            }

            // Face cycle
            let base = topo.halfedges.len();
            let ids = [
                HalfEdgeId::new(base),
                HalfEdgeId::new(base + 1),
                HalfEdgeId::new(base + 2),
            ];
            for i in 0..3 {
                topo.halfedges.push(HalfEdge {
                    id: ids[i],
                    origin: corners[i],
                    destination: corners[(i + 1) % 3],
                    next: ids[(i + 1) % 3],
                    prev: ids[(i + 2) % 3],
                    twin: None,
                });
            }

            // Ownership
            let mut refused = [false; 3];
            for (i, &id) in ids.iter().enumerate() {
                let key = topo.halfedge(id).key();
                if let Some(existing) = topo.table.insert(key, id) {
                    refused[i] = true;
                    let duplicate = DuplicateEdge {
                        key,
                        existing,
                        duplicate: id,
                    };
                    match self.options.policy {
                        NonManifoldPolicy::Strict => return Err(duplicate.to_error()),
                        NonManifoldPolicy::Record => {
                            warn!(
                                "non-manifold edge ({}, {}): {:?} duplicates {:?}",
                                key.origin(),
                                key.destination(),
                                id,
                                existing
                            );
                            topo.duplicates.push(duplicate);
                        }
                    }
                }
            }

            // Twins
            for (i, &id) in ids.iter().enumerate() {
                if link_twin(&mut topo, id) {
                    linked += 1;
                } else if refused[i] && topo.halfedge(id).twin.is_none() {
                    if pair_duplicate(&mut topo, &mut unpaired, id) {
                        linked += 1;
                    } else {
                        let key = topo.halfedge(id).key();
                        unpaired.entry(key).or_default().push_back(id);
                    }
                }
            }
        }

        debug!(
            "built {} half-edges from {} triangles: {} twin pairs, {} boundary, {} duplicate edges",
            topo.count(),
            topo.num_faces(),
            linked,
            topo.count() - 2 * linked,
            topo.duplicates.len()
        );

        Ok(topo)
    }
}

/// Link `id` with the owner of its reversed key.
///
/// Nothing is linked if the owner is `id` itself (a self-loop edge) or if
/// either side already has a twin, which keeps twins an involution on
/// non-manifold input.
fn link_twin(topo: &mut HalfEdgeCollection, id: HalfEdgeId) -> bool {
    let he = *topo.halfedge(id);
    if he.twin.is_some() {
        return false;
    }

    let other = match topo.table.find(he.key().reversed()) {
        Some(other) if other != id => other,
        _ => return false,
    };
    if topo.halfedge(other).twin.is_some() {
        return false;
    }

    set_twins(topo, id, other);
    true
}

/// Pair a refused duplicate with the oldest untwinned duplicate running the
/// other way.
///
/// Refused duplicates are not in the lookup table, so two of them in opposite
/// directions can only meet here.
fn pair_duplicate(
    topo: &mut HalfEdgeCollection,
    unpaired: &mut HashMap<EdgeKey, VecDeque<HalfEdgeId>>,
    id: HalfEdgeId,
) -> bool {
    if topo.halfedge(id).twin.is_some() {
        return false;
    }

    let reversed = topo.halfedge(id).key().reversed();
    let Some(waiting) = unpaired.get_mut(&reversed) else {
        return false;
    };
    while let Some(other) = waiting.pop_front() {
        if other != id && topo.halfedge(other).twin.is_none() {
            set_twins(topo, id, other);
            return true;
        }
    }
    false
}

fn set_twins(topo: &mut HalfEdgeCollection, a: HalfEdgeId, b: HalfEdgeId) {
    topo.halfedges[a.index()].twin = Some(b);
    topo.halfedges[b.index()].twin = Some(a);
    trace!("twin {:?} <-> {:?}", a, b);
}

/// Reject index counts that cannot form triangles or whose half-edges would
/// not fit a 32-bit [`HalfEdgeId`].
fn check_index_count(len: usize) -> Result<()> {
    if len % 3 != 0 {
        return Err(TopologyError::InvalidInput {
            len,
            reason: "not a multiple of 3",
        });
    }
    if len > u32::MAX as usize {
        return Err(TopologyError::InvalidInput {
            len,
            reason: "too many half-edges for 32-bit ids",
        });
    }
    Ok(())
}

/// Build the topology of `indices` with default options.
pub fn build_from_indices(indices: &[u16]) -> Result<HalfEdgeCollection> {
    HalfEdgeBuilder::new().build(indices)
}

/// Build the topology of a list of triangles with default options.
pub fn build_from_triangles(triangles: &[[u16; 3]]) -> Result<HalfEdgeCollection> {
    let indices: Vec<u16> = triangles.iter().flatten().copied().collect();
    HalfEdgeBuilder::new().build(&indices)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;

    fn tetrahedron() -> Vec<u16> {
        vec![
            0, 2, 1, // bottom
            0, 1, 3, // front
            1, 2, 3, // right
            2, 0, 3, // left
        ]
    }

    fn grid(n: u16, m: u16) -> Vec<[u16; 3]> {
        let mut faces = Vec::new();
        for j in 0..m {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }
        faces
    }

    fn twinned_edges(topo: &HalfEdgeCollection) -> BTreeSet<(u16, u16)> {
        topo.halfedges()
            .filter(|he| he.twin.is_some())
            .map(|he| (he.origin.raw(), he.destination.raw()))
            .collect()
    }

    fn boundary_set(topo: &HalfEdgeCollection) -> BTreeSet<(u16, u16)> {
        topo.boundary_edges()
            .map(|he| (he.origin.raw(), he.destination.raw()))
            .collect()
    }

    fn assert_invariants(topo: &HalfEdgeCollection) {
        for he in topo.halfedges() {
            let id = he.id;
            assert_eq!(topo.next(topo.next(topo.next(id))), id);
            assert_eq!(topo.next(topo.prev(id)), id);
            assert_eq!(topo.prev(id), topo.next(topo.next(id)));
            if let Some(twin) = he.twin {
                assert_eq!(topo.twin(twin), Some(id));
                assert_eq!(topo.origin(twin), he.destination);
                assert_eq!(topo.destination(twin), he.origin);
            }
        }
        assert!(topo.validate().is_ok());
    }

    #[test]
    fn test_single_triangle() {
        let topo = build_from_indices(&[0, 1, 2]).unwrap();

        assert_eq!(topo.count(), 3);
        assert_eq!(topo.num_faces(), 1);
        assert_eq!(topo.boundary_edges().count(), 3);
        assert!(topo.halfedges().all(|he| he.twin.is_none()));
        assert_invariants(&topo);
    }

    #[test]
    fn test_ids_and_face_links() {
        let topo = build_from_indices(&[4, 5, 6]).unwrap();
        let he: Vec<_> = topo.halfedges().copied().collect();

        assert_eq!(he[0].id, HalfEdgeId::new(0));
        assert_eq!((he[0].origin.raw(), he[0].destination.raw()), (4, 5));
        assert_eq!((he[1].origin.raw(), he[1].destination.raw()), (5, 6));
        assert_eq!((he[2].origin.raw(), he[2].destination.raw()), (6, 4));
        assert_eq!(he[0].next, HalfEdgeId::new(1));
        assert_eq!(he[0].prev, HalfEdgeId::new(2));
        assert_eq!(he[2].next, HalfEdgeId::new(0));
    }

    #[test]
    fn test_quad_shared_diagonal() {
        let topo = build_from_indices(&[0, 1, 2, 0, 2, 3]).unwrap();

        assert_eq!(topo.count(), 6);
        let pairs: Vec<_> = topo.twin_pairs().collect();
        assert_eq!(pairs.len(), 1);

        let (a, b) = pairs[0];
        assert_eq!((topo.origin(a).raw(), topo.destination(a).raw()), (2, 0));
        assert_eq!((topo.origin(b).raw(), topo.destination(b).raw()), (0, 2));
        assert_eq!(topo.boundary_edges().count(), 4);
        assert_invariants(&topo);
    }

    #[test]
    fn test_tetrahedron_is_closed() {
        let topo = build_from_indices(&tetrahedron()).unwrap();

        assert_eq!(topo.count(), 12);
        assert_eq!(topo.boundary_edges().count(), 0);
        assert!(topo.is_closed());
        assert!(topo.halfedges().all(|he| he.twin.is_some()));
        assert_eq!(topo.twin_pairs().count(), 6);
        assert!(topo.boundary_loops().is_empty());
        assert_invariants(&topo);
    }

    #[test]
    fn test_invalid_length() {
        let result = build_from_indices(&[0, 1, 2, 3]);
        assert!(matches!(result, Err(TopologyError::InvalidInput { len: 4, .. })));

        let result = HalfEdgeBuilder::with_options(BuildOptions::strict()).build(&[0]);
        assert!(matches!(result, Err(TopologyError::InvalidInput { len: 1, .. })));
    }

    #[test]
    fn test_retroactive_twin() {
        // The shared edge is seen first as 1->2, its twin arrives one face later
        let topo = build_from_triangles(&[[0, 1, 2], [5, 6, 7], [2, 1, 3]]).unwrap();
        let first = topo.find_edge(VertexId::from_raw(1), VertexId::from_raw(2)).unwrap();
        let later = topo.find_edge(VertexId::from_raw(2), VertexId::from_raw(1)).unwrap();

        assert_eq!(first, HalfEdgeId::new(1));
        assert_eq!(later, HalfEdgeId::new(6));
        assert_eq!(topo.twin(first), Some(later));
        assert_eq!(topo.twin(later), Some(first));
    }

    #[test]
    fn test_full_index_range() {
        let topo = build_from_indices(&[65535, 0, 32768, 0, 65535, 1]).unwrap();
        assert_eq!(topo.twin_pairs().count(), 1);
        assert_eq!(topo.vertex_count_hint(), 65536);
        assert_invariants(&topo);
    }

    #[test]
    fn test_duplicate_edge_recorded() {
        // Both faces use the directed edge 0->1
        let topo = build_from_indices(&[0, 1, 2, 0, 1, 3, 1, 0, 4]).unwrap();

        assert_eq!(topo.count(), 9);
        let dups = topo.non_manifold_edges();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].existing, HalfEdgeId::new(0));
        assert_eq!(dups[0].duplicate, HalfEdgeId::new(3));
        assert_eq!(dups[0].key.origin().raw(), 0);
        assert_eq!(dups[0].key.destination().raw(), 1);

        // The first registration keeps ownership and gets the twin
        assert_eq!(
            topo.find_edge(VertexId::from_raw(0), VertexId::from_raw(1)),
            Some(HalfEdgeId::new(0))
        );
        assert_eq!(topo.twin(HalfEdgeId::new(0)), Some(HalfEdgeId::new(6)));
        assert_eq!(topo.twin(HalfEdgeId::new(3)), None);
        assert_invariants(&topo);
    }

    #[test]
    fn test_opposite_duplicates_pair() {
        // 0->1 and 1->0 are each registered twice; the refused pair twins up
        let topo = build_from_indices(&[0, 1, 2, 0, 1, 3, 1, 0, 4, 1, 0, 5]).unwrap();

        assert_eq!(topo.non_manifold_edges().len(), 2);
        assert_eq!(topo.twin(HalfEdgeId::new(0)), Some(HalfEdgeId::new(6)));
        assert_eq!(topo.twin(HalfEdgeId::new(3)), Some(HalfEdgeId::new(9)));
        assert_eq!(topo.twin(HalfEdgeId::new(9)), Some(HalfEdgeId::new(3)));
        assert_eq!(topo.boundary_edges().count(), 8);
        assert_invariants(&topo);
    }

    #[test]
    fn test_opposite_duplicates_pair_oldest_first() {
        let topo = build_from_triangles(&[
            [0, 1, 2],
            [0, 1, 3],
            [0, 1, 4],
            [1, 0, 5],
            [1, 0, 6],
            [1, 0, 7],
        ])
        .unwrap();

        assert_eq!(topo.non_manifold_edges().len(), 4);
        assert_eq!(topo.twin(HalfEdgeId::new(0)), Some(HalfEdgeId::new(9)));
        assert_eq!(topo.twin(HalfEdgeId::new(3)), Some(HalfEdgeId::new(12)));
        assert_eq!(topo.twin(HalfEdgeId::new(6)), Some(HalfEdgeId::new(15)));
        assert_invariants(&topo);
    }

    #[test]
    fn test_unmatched_duplicate_stays_boundary() {
        let topo = build_from_indices(&[0, 1, 2, 0, 1, 3, 1, 0, 4]).unwrap();
        assert_eq!(topo.twin(HalfEdgeId::new(3)), None);
        assert!(topo.is_boundary_halfedge(HalfEdgeId::new(3)));
    }

    #[test]
    fn test_index_count_limits() {
        assert!(check_index_count(0).is_ok());
        assert!(check_index_count(u32::MAX as usize).is_ok());
        assert!(matches!(
            check_index_count(7),
            Err(TopologyError::InvalidInput { len: 7, .. })
        ));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_index_count_exceeds_id_range() {
        let len = u32::MAX as usize + 3;
        match check_index_count(len) {
            Err(TopologyError::InvalidInput { len: l, reason }) => {
                assert_eq!(l, len);
                assert!(reason.contains("32-bit"));
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_edge_strict() {
        let builder = HalfEdgeBuilder::with_options(BuildOptions::strict());
        let result = builder.build(&[0, 1, 2, 0, 1, 3]);

        match result {
            Err(TopologyError::NonManifoldEdge {
                origin,
                destination,
                existing,
                duplicate,
            }) => {
                assert_eq!((origin.raw(), destination.raw()), (0, 1));
                assert_eq!(existing, HalfEdgeId::new(0));
                assert_eq!(duplicate, HalfEdgeId::new(3));
            }
            other => panic!("expected NonManifoldEdge, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_triangle_recorded() {
        let topo = build_from_indices(&[0, 1, 2, 0, 1, 2]).unwrap();
        assert_eq!(topo.non_manifold_edges().len(), 3);
        assert_eq!(topo.boundary_edges().count(), 6);
        assert_invariants(&topo);
    }

    #[test]
    fn test_degenerate_face() {
        let topo = build_from_indices(&[0, 1, 0, 2, 3, 4]).unwrap();
        assert_eq!(topo.degenerate_faces(), &[FaceId::new(0)]);

        // 0->1 and 1->0 pair up inside the face; the 0->0 loop stays single
        assert_eq!(topo.twin(HalfEdgeId::new(0)), Some(HalfEdgeId::new(1)));
        assert_eq!(topo.twin(HalfEdgeId::new(2)), None);
        assert_invariants(&topo);

        let result = HalfEdgeBuilder::with_options(BuildOptions::strict()).build(&[2, 3, 4, 0, 0, 1]);
        assert!(matches!(
            result,
            Err(TopologyError::DegenerateFace { face }) if face == FaceId::new(1)
        ));
    }

    #[test]
    fn test_options() {
        let options = BuildOptions::default()
            .with_policy(NonManifoldPolicy::Strict)
            .with_expected_triangles(2);
        assert_eq!(options.policy, NonManifoldPolicy::Strict);

        let builder = HalfEdgeBuilder::with_options(options);
        assert_eq!(builder.options().expected_triangles, Some(2));
        let topo = builder.build(&[0, 1, 2, 0, 2, 3]).unwrap();
        assert_eq!(topo.count(), 6);
    }

    #[test]
    fn test_grid_topology() {
        let faces = grid(4, 3);
        let topo = build_from_triangles(&faces).unwrap();

        // 4x3 cells: 24 triangles, boundary has 2 * (4 + 3) edges
        assert_eq!(topo.count(), 72);
        assert_eq!(topo.boundary_edges().count(), 14);
        assert_eq!(topo.boundary_loops().len(), 1);
        assert_eq!(topo.boundary_loops()[0].len(), 14);
        assert_invariants(&topo);
    }

    proptest! {
        #[test]
        fn prop_order_independent(
            n in 1u16..6,
            m in 1u16..6,
            seed in any::<u64>(),
        ) {
            let faces = grid(n, m);
            let reference = build_from_triangles(&faces).unwrap();

            // Shuffle faces and rotate corners; winding is preserved
            let mut permuted = faces.clone();
            let len = permuted.len();
            let mut state = seed | 1;
            for i in (1..len).rev() {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                permuted.swap(i, (state % (i as u64 + 1)) as usize);
            }
            for (i, tri) in permuted.iter_mut().enumerate() {
                tri.rotate_left(i % 3);
            }

            let topo = build_from_triangles(&permuted).unwrap();
            prop_assert_eq!(topo.count(), reference.count());
            prop_assert_eq!(twinned_edges(&topo), twinned_edges(&reference));
            prop_assert_eq!(boundary_set(&topo), boundary_set(&reference));
        }

        #[test]
        fn prop_invariants_on_soup(tris in prop::collection::vec(prop::array::uniform3(0u16..8), 0..40)) {
            let topo = build_from_triangles(&tris).unwrap();
            prop_assert_eq!(topo.count(), 3 * tris.len());
            prop_assert!(topo.validate().is_ok());

            for he in topo.halfedges() {
                let id = he.id;
                prop_assert_eq!(topo.next(topo.next(topo.next(id))), id);
                prop_assert_eq!(topo.next(topo.prev(id)), id);
                if let Some(twin) = he.twin {
                    prop_assert_eq!(topo.twin(twin), Some(id));
                    prop_assert_eq!(topo.origin(twin), he.destination);
                }
            }
        }
    }
}
