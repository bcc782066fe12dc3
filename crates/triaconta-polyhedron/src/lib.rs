//! Rhombic-triacontahedron geometry: face patches, seam topology, tile
//! addressing, the direction-to-tile locator, cell partitioning, and greedy
//! tile paths.

mod cell;
mod descriptor;
mod error;
mod face_coord;
mod face_edge;
mod inverse;
mod path;
mod tile;
mod topology;

pub use cell::{CellGeometry, CellId, CellLayout};
pub use descriptor::{FaceGeometry, FaceId, Polyhedron};
pub use error::{PolyhedronError, TopologyError};
pub use face_coord::FaceCoord;
pub use face_edge::{Direction, FaceEdge};
pub use inverse::direction_to_face_coord;
pub use path::{DEFAULT_MAX_STEPS, Path, PathOutcome, PathPlanner, PathStep};
pub use tile::{TileAddress, TileAddresser, tile_position};
pub use topology::{EdgeAdjacency, Topology};
