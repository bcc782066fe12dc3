//! Cell meshes for the globe surface: tessellation, terrain and overlay
//! colouring, and the `(cell, level)` mesh cache.

mod blend;
mod cache;
mod cell_mesh;
mod error;
mod overlay;
mod palette;
mod terrain;

pub use blend::{CellShading, coarse_tiles_touching, covered_full_tiles, nearest_full_tile};
pub use cache::{CacheStats, MeshCache, MeshHandle, MeshKey};
pub use cell_mesh::{CellMesh, LINE_LIFT, LineMesh, LineVertex};
pub use error::MeshError;
pub use overlay::{Overlay, OverlayMap};
pub use palette::{DEFAULT_RESOURCE_ACCENT_BLEND, Palette};
pub use terrain::{BiomeTag, FaceTerrain, ResourceTag, TerrainTile};
