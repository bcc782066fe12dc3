//! The tiled globe: per-face terrain, the level-of-detail cell manager, and
//! the `Globe` facade that ties addressing, routing, overlays and meshing
//! together.

mod error;
mod globe;
mod settings;
mod surface;
mod terrain_store;

pub use error::GlobeError;
pub use globe::Globe;
pub use settings::GlobeSettings;
pub use surface::{FrameStats, SurfaceManager};
pub use terrain_store::TerrainStore;
