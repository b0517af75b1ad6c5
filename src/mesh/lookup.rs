//! Directed edge ownership table used for twin resolution.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::edge_key::EdgeKey;
use super::index::HalfEdgeId;

/// Maps each directed edge to the half-edge that first registered it.
///
/// The table is filled while building and kept afterwards to answer
/// [`find`](EdgeLookupTable::find) queries on the finished collection.
#[derive(Debug, Clone, Default)]
pub struct EdgeLookupTable {
    owners: HashMap<EdgeKey, HalfEdgeId>,
}

impl EdgeLookupTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table sized for the given number of half-edges.
    pub fn with_capacity(num_halfedges: usize) -> Self {
        Self {
            owners: HashMap::with_capacity(num_halfedges),
        }
    }

    /// Register `halfedge` as the owner of `key`.
    ///
    /// Returns `None` on success. If the key is already owned, the existing
    /// registration is kept and its owner is returned so the caller can
    /// report the duplicate.
    pub fn insert(&mut self, key: EdgeKey, halfedge: HalfEdgeId) -> Option<HalfEdgeId> {
        match self.owners.entry(key) {
            Entry::Occupied(existing) => Some(*existing.get()),
            Entry::Vacant(slot) => {
                slot.insert(halfedge);
                None
            }
        }
    }

    /// Look up the owner of a directed edge.
    #[inline]
    pub fn find(&self, key: EdgeKey) -> Option<HalfEdgeId> {
        self.owners.get(&key).copied()
    }

    /// Number of distinct directed edges registered.
    #[inline]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether no edge has been registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
