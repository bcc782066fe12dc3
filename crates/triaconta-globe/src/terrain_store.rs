//! Per-face terrain as delivered by the world data source.

use triaconta_mesh::{FaceTerrain, MeshError};
use triaconta_polyhedron::FaceId;

use crate::GlobeError;

/// Holds each face's terrain once it has arrived.
#[derive(Clone, Debug)]
pub struct TerrainStore {
    resolution: u32,
    faces: Vec<Option<FaceTerrain>>,
}

impl TerrainStore {
    /// An empty store for `face_count` faces of `resolution²` tiles.
    #[must_use]
    pub fn new(face_count: usize, resolution: u32) -> Self {
        Self {
            resolution,
            faces: vec![None; face_count],
        }
    }

    /// Store terrain for `face`. Returns whether it replaced earlier data.
    pub fn deliver(&mut self, face: FaceId, terrain: FaceTerrain) -> Result<bool, GlobeError> {
        if terrain.resolution() != self.resolution {
            return Err(MeshError::ResolutionMismatch {
                expected: self.resolution,
                actual: terrain.resolution(),
            }
            .into());
        }
        let slot = self
            .faces
            .get_mut(face.index())
            .ok_or(GlobeError::UnknownFace(face))?;
        Ok(slot.replace(terrain).is_some())
    }

    /// Terrain of `face`, if it has arrived.
    #[must_use]
    pub fn get(&self, face: FaceId) -> Option<&FaceTerrain> {
        self.faces.get(face.index()).and_then(Option::as_ref)
    }

    /// Whether `face` has terrain.
    #[must_use]
    pub fn is_loaded(&self, face: FaceId) -> bool {
        self.get(face).is_some()
    }

    /// Number of faces with terrain.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_some()).count()
    }
}
