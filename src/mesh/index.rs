//! Index types for topology elements.
//!
//! Vertices are addressed with 16-bit indices to match the upstream index
//! buffer format; half-edges and faces use 32-bit indices since a buffer of
//! 65536 distinct vertices can still describe far more than 65536 triangles.

use std::fmt::{self, Debug, Display};

/// A type-safe vertex index into an external vertex buffer.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u16);

/// A type-safe half-edge index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId(u32);

/// A type-safe face (triangle) index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

macro_rules! impl_index_type {
    ($name:ident, $raw:ty, $display:literal) => {
        impl $name {
            /// Create a new index from a `usize`.
            ///
            /// # Panics
            /// Panics in debug builds if the value does not fit the raw type.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(
                    index <= <$raw>::MAX as usize,
                    "index {} too large for {}",
                    index,
                    stringify!($raw)
                );
                Self(index as $raw)
            }

            /// Create an index from its raw value.
            #[inline]
            pub const fn from_raw(raw: $raw) -> Self {
                Self(raw)
            }

            /// Get the index as a `usize`.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Get the raw value of the underlying type.
            #[inline]
            pub fn raw(self) -> $raw {
                self.0
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.0)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$raw> for $name {
            fn from(v: $raw) -> Self {
                Self(v)
            }
        }
    };
}

impl_index_type!(VertexId, u16, "V");
impl_index_type!(HalfEdgeId, u32, "HE");
impl_index_type!(FaceId, u32, "F");

impl HalfEdgeId {
    /// The face this half-edge belongs to.
    ///
    /// Half-edges are allocated three per triangle in face order, so the face
    /// is implied by the id.
    #[inline]
    pub fn face(self) -> FaceId {
        FaceId(self.0 / 3)
    }
}

impl FaceId {
    /// The first half-edge of this face's 3-cycle.
    #[inline]
    pub fn first_halfedge(self) -> HalfEdgeId {
        HalfEdgeId(self.0 * 3)
    }
}
