//! The `Globe` facade: addressing, routing, overlays, and the per-frame
//! surface update behind one owner.

use std::sync::Arc;

use glam::DVec3;
use tracing::{debug, info};
use triaconta_config::Config;
use triaconta_lod::LodLevel;
use triaconta_mesh::{CacheStats, CellMesh, FaceTerrain, MeshHandle, Overlay, OverlayMap};
use triaconta_polyhedron::{
    CellId, CellLayout, Direction, FaceId, Path, PathPlanner, Polyhedron, TileAddress,
    TileAddresser, Topology,
};

use crate::{FrameStats, GlobeError, GlobeSettings, SurfaceManager, TerrainStore};

/// A tiled globe and its level-of-detail surface.
#[derive(Debug)]
pub struct Globe {
    addresser: TileAddresser,
    planner: PathPlanner,
    surface: SurfaceManager,
    terrain: TerrainStore,
    overlays: OverlayMap,
}

impl Globe {
    /// A globe on the rhombic triacontahedron.
    pub fn new(settings: GlobeSettings) -> Result<Self, GlobeError> {
        Self::with_polyhedron(Polyhedron::rhombic_triacontahedron(), settings)
    }

    /// A globe built from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, GlobeError> {
        Self::new(GlobeSettings::from_config(config)?)
    }

    /// A globe on any closed quad polyhedron. Fails if some edge is not
    /// shared by exactly two faces.
    pub fn with_polyhedron(
        polyhedron: Polyhedron,
        settings: GlobeSettings,
    ) -> Result<Self, GlobeError> {
        let topology = Arc::new(Topology::resolve(&polyhedron)?);
        let polyhedron = Arc::new(polyhedron);
        let resolution = settings.layout.resolution();
        let addresser = TileAddresser::new(Arc::clone(&polyhedron), topology, resolution);
        let surface = SurfaceManager::new(Arc::clone(&polyhedron), &settings);
        info!(
            faces = polyhedron.face_count(),
            resolution,
            cells_per_side = settings.layout.cells_per_side(),
            "globe ready"
        );
        Ok(Self {
            addresser,
            planner: PathPlanner::new(settings.max_path_steps),
            surface,
            terrain: TerrainStore::new(polyhedron.face_count(), resolution),
            overlays: OverlayMap::new(),
        })
    }

    /// Tile addressing over this globe.
    #[must_use]
    pub fn addresser(&self) -> &TileAddresser {
        &self.addresser
    }

    /// The cell partition.
    #[must_use]
    pub fn layout(&self) -> &CellLayout {
        self.surface.layout()
    }

    /// Full-resolution tiles per face side.
    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.addresser.resolution()
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.addresser.polyhedron().face_count()
    }

    /// Deliver (or replace) the terrain of `face`. Cells of that face pick
    /// it up on the next `update`.
    pub fn deliver_terrain(&mut self, face: FaceId, terrain: FaceTerrain) -> Result<(), GlobeError> {
        let replaced = self.terrain.deliver(face, terrain)?;
        self.surface.on_terrain_arrived(face);
        debug!(%face, replaced, loaded = self.terrain.loaded_count(), "terrain delivered");
        Ok(())
    }

    /// Terrain of `face`, if it has arrived.
    #[must_use]
    pub fn terrain(&self, face: FaceId) -> Option<&FaceTerrain> {
        self.terrain.get(face)
    }

    /// Advance one frame for a camera at `camera`.
    pub fn update(&mut self, camera: DVec3) -> FrameStats {
        self.surface.update(camera, &self.terrain, &self.overlays)
    }

    /// Full-resolution centre of `tile`, whether or not it is shown.
    #[must_use]
    pub fn tile_center(&self, tile: TileAddress) -> Option<DVec3> {
        self.addresser
            .is_valid(tile)
            .then(|| self.addresser.tile_center(tile))
    }

    /// The tile under a direction from the globe centre.
    #[must_use]
    pub fn tile_at_direction(&self, direction: DVec3) -> Option<TileAddress> {
        self.addresser.locate(direction)
    }

    /// Whether the cell owning `tile` is shown.
    #[must_use]
    pub fn is_tile_visible(&self, tile: TileAddress) -> bool {
        self.addresser.is_valid(tile) && self.surface.is_tile_visible(tile)
    }

    /// The tile one step from `tile`; `None` only for an invalid `tile`.
    #[must_use]
    pub fn neighbor(&self, tile: TileAddress, dir: Direction) -> Option<TileAddress> {
        self.addresser.neighbor(tile, dir)
    }

    /// Greedy route from `start` to `end`.
    #[must_use]
    pub fn compute_path(&self, start: TileAddress, end: TileAddress, initial: Direction) -> Path {
        self.planner.compute_path(&self.addresser, start, end, initial)
    }

    /// Tag `tile` and recolour the shown mesh around it. Returns the
    /// previous tag.
    pub fn set_overlay(&mut self, tile: TileAddress, overlay: Overlay) -> Result<Overlay, GlobeError> {
        if !self.addresser.is_valid(tile) {
            return Err(GlobeError::InvalidTile(tile));
        }
        let previous = self.overlays.set(tile, overlay);
        if previous != overlay {
            self.surface.refresh_tile(tile, &self.terrain, &self.overlays);
        }
        Ok(previous)
    }

    /// Remove the tag on `tile`. Returns the previous tag.
    pub fn clear_overlay(&mut self, tile: TileAddress) -> Result<Overlay, GlobeError> {
        self.set_overlay(tile, Overlay::None)
    }

    /// Current tag of `tile`.
    #[must_use]
    pub fn overlay(&self, tile: TileAddress) -> Overlay {
        self.overlays.get(tile)
    }

    /// Handles of every shown mesh.
    #[must_use]
    pub fn raycast_targets(&self) -> Vec<MeshHandle> {
        self.surface.raycast_targets()
    }

    /// The full-resolution tile under sub-face `sub_face` of a shown mesh.
    #[must_use]
    pub fn resolve_raycast_hit(&self, handle: MeshHandle, sub_face: u32) -> Option<TileAddress> {
        self.surface.resolve_raycast_hit(handle, sub_face)
    }

    /// A cached mesh.
    #[must_use]
    pub fn mesh(&self, handle: MeshHandle) -> Option<&CellMesh> {
        self.surface.mesh(handle)
    }

    /// Mutable access to a cached mesh, e.g. to mark colours uploaded.
    pub fn mesh_mut(&mut self, handle: MeshHandle) -> Option<&mut CellMesh> {
        self.surface.mesh_mut(handle)
    }

    /// Every shown mesh with its handle.
    pub fn visible_meshes(&self) -> impl Iterator<Item = (MeshHandle, &CellMesh)> + '_ {
        self.surface
            .raycast_targets()
            .into_iter()
            .filter_map(|handle| self.surface.mesh(handle).map(|mesh| (handle, mesh)))
    }

    /// Current level of `cell`.
    #[must_use]
    pub fn cell_level(&self, cell: CellId) -> LodLevel {
        self.surface.cell_level(cell)
    }

    /// Drop every cached mesh that is not shown. Returns how many went.
    pub fn clear_cache(&mut self) -> usize {
        self.surface.clear_cache()
    }

    /// Cache counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.surface.cache_stats()
    }
}
