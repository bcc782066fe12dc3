//! Errors for terrain grids handed to the mesh layer.

/// Terrain data that cannot back a face.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    /// A face grid does not hold `resolution²` tiles.
    #[error("terrain grid has {actual} tiles, expected {expected}")]
    TerrainSizeMismatch {
        /// `resolution * resolution`.
        expected: usize,
        /// Tiles supplied.
        actual: usize,
    },

    /// Terrain delivered at a resolution other than the globe's.
    #[error("terrain resolution {actual} does not match globe resolution {expected}")]
    ResolutionMismatch {
        /// Globe tile resolution.
        expected: u32,
        /// Resolution of the delivered grid.
        actual: u32,
    },
}
