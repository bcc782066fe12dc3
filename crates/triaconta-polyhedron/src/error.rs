//! Error types for polyhedron construction and topology resolution.

/// Errors raised while building a [`Polyhedron`](crate::Polyhedron) or a
/// [`CellLayout`](crate::CellLayout).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolyhedronError {
    /// The polyhedron has no faces.
    #[error("polyhedron has no faces")]
    NoFaces,

    /// A face references a corner index that does not exist.
    #[error("face {face} references corner {corner}, but only {corner_count} corners exist")]
    CornerOutOfRange {
        /// Offending face index.
        face: usize,
        /// Referenced corner index.
        corner: u32,
        /// Number of corners supplied.
        corner_count: usize,
    },

    /// A corner has zero (or non-finite) length and cannot be projected onto
    /// the unit sphere.
    #[error("corner {index} cannot be normalized onto the unit sphere")]
    DegenerateCorner {
        /// Corner index.
        index: usize,
    },

    /// The tile grid cannot be partitioned into whole cells.
    #[error("resolution {resolution} is not a positive multiple of {cells_per_side} cells per side")]
    InvalidCellLayout {
        /// Full tile resolution per face side.
        resolution: u32,
        /// Requested cells per face side.
        cells_per_side: u32,
    },
}

/// The load-time topology invariant: every edge is shared by exactly two
/// faces.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// An edge is owned by a number of faces other than two.
    #[error("edge ({a}, {b}) is owned by {owners} face(s), expected exactly 2")]
    UnpairedEdge {
        /// Lower corner index of the edge.
        a: u32,
        /// Higher corner index of the edge.
        b: u32,
        /// How many face edges reference this corner pair.
        owners: usize,
    },
}
