//! Directed edge keys.

use std::fmt;

use super::index::VertexId;

/// A directed vertex pair `(origin, destination)` packed into one `u32`.
///
/// The origin occupies the high 16 bits and the destination the low 16 bits,
/// so equality and hashing are structural on the pair.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EdgeKey(u32);

impl EdgeKey {
    /// Create a key for the directed edge `origin -> destination`.
    #[inline]
    pub fn new(origin: VertexId, destination: VertexId) -> Self {
        Self(((origin.raw() as u32) << 16) | destination.raw() as u32)
    }

    /// The origin vertex.
    #[inline]
    pub fn origin(self) -> VertexId {
        VertexId::from_raw((self.0 >> 16) as u16)
    }

    /// The destination vertex.
    #[inline]
    pub fn destination(self) -> VertexId {
        VertexId::from_raw((self.0 & 0xFFFF) as u16)
    }

    /// The key of the oppositely directed edge.
    #[inline]
    pub fn reversed(self) -> Self {
        Self(self.0.rotate_left(16))
    }

    /// Whether origin and destination coincide.
    #[inline]
    pub fn is_loop(self) -> bool {
        self.origin() == self.destination()
    }

    /// The packed representation.
    #[inline]
    pub fn packed(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeKey({} -> {})", self.origin(), self.destination())
    }
}
