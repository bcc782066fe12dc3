//! Errors raised while assembling a globe.

use triaconta_lod::LodError;
use triaconta_mesh::MeshError;
use triaconta_polyhedron::{FaceId, PolyhedronError, TileAddress, TopologyError};

/// Construction-time failures. Per-frame work never returns these.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GlobeError {
    /// Invalid polyhedron or cell layout.
    #[error(transparent)]
    Polyhedron(#[from] PolyhedronError),

    /// The polyhedron surface is not closed.
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// Invalid level thresholds.
    #[error(transparent)]
    Lod(#[from] LodError),

    /// Terrain that does not fit the grid.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Terrain delivered for a face the polyhedron does not have.
    #[error("{0} does not exist")]
    UnknownFace(FaceId),

    /// A tile address outside the grid.
    #[error("{0} is outside the tile grid")]
    InvalidTile(TileAddress),
}
