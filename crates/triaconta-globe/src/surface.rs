//! The level-of-detail cell manager.
//!
//! Each `update` culls cells behind the horizon, picks a target level for the
//! rest, hides culled cells at once, and applies at most `K` of the remaining
//! transitions, nearest first. Meshes are pooled per `(cell, level)` in a
//! [`MeshCache`]; switching levels hides the old mesh rather than freeing it.

use std::ops::Range;
use std::sync::Arc;

use glam::DVec3;
use rustc_hash::FxHashSet;
use tracing::{debug, info, trace, warn};
use triaconta_lod::{HorizonCuller, LodLevel, LodSelector, PendingTransition, RebuildQueue};
use triaconta_mesh::{
    CacheStats, CellMesh, CellShading, MeshCache, MeshHandle, MeshKey, OverlayMap, Palette,
    nearest_full_tile,
};
use triaconta_polyhedron::{CellGeometry, CellId, CellLayout, FaceId, Polyhedron, TileAddress};

use crate::{GlobeSettings, TerrainStore};

/// What one `update` call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Cells hidden this frame.
    pub hidden: usize,
    /// Meshes built this frame.
    pub built: usize,
    /// Cached meshes recoloured and shown this frame.
    pub reused: usize,
    /// Active meshes recoloured after a terrain update.
    pub recolored: usize,
    /// Transitions postponed by the per-frame budget.
    pub deferred: usize,
    /// Transitions skipped because the face has no terrain yet.
    pub awaiting_terrain: usize,
    /// Cells shown after this frame.
    pub visible_cells: usize,
}

#[derive(Clone, Debug)]
struct CellState {
    id: CellId,
    geometry: CellGeometry,
    level: LodLevel,
    active: Option<MeshHandle>,
}

enum Applied {
    Built,
    Reused,
}

/// Owns every cell's level state and the mesh cache.
#[derive(Debug)]
pub struct SurfaceManager {
    polyhedron: Arc<Polyhedron>,
    layout: CellLayout,
    cells: Vec<CellState>,
    cache: MeshCache,
    selector: LodSelector,
    horizon_margin: f64,
    max_builds: usize,
    grid_lines: bool,
    palette: Palette,
    queue: RebuildQueue,
    pending_recolor: FxHashSet<CellId>,
}

impl SurfaceManager {
    /// Create all cells, hidden, with their geometry precomputed.
    #[must_use]
    pub fn new(polyhedron: Arc<Polyhedron>, settings: &GlobeSettings) -> Self {
        let layout = settings.layout;
        let cells: Vec<CellState> = layout
            .cells(polyhedron.face_count())
            .map(|id| CellState {
                id,
                geometry: CellGeometry::new(polyhedron.geometry(id.face), &layout, id),
                level: LodLevel::Hidden,
                active: None,
            })
            .collect();
        info!(
            faces = polyhedron.face_count(),
            cells = cells.len(),
            resolution = layout.resolution(),
            max_builds = settings.max_builds_per_frame,
            "created surface manager"
        );
        Self {
            polyhedron,
            layout,
            cells,
            cache: MeshCache::new(),
            selector: LodSelector::new(settings.thresholds.clone()),
            horizon_margin: settings.horizon_margin,
            max_builds: settings.max_builds_per_frame.max(1),
            grid_lines: settings.grid_lines,
            palette: settings.palette.clone(),
            queue: RebuildQueue::new(),
            pending_recolor: FxHashSet::default(),
        }
    }

    /// The cell partition.
    #[must_use]
    pub fn layout(&self) -> &CellLayout {
        &self.layout
    }

    fn face_cells(&self, face: FaceId) -> Range<usize> {
        let per_face = self.layout.cells_per_face();
        face.index() * per_face..(face.index() + 1) * per_face
    }

    fn state(&self, cell: CellId) -> Option<&CellState> {
        let c = self.layout.cells_per_side();
        if !self.polyhedron.contains_face(cell.face) || cell.row >= c || cell.col >= c {
            return None;
        }
        self.cells.get(self.layout.index(cell))
    }

    /// Precomputed geometry of `cell`.
    #[must_use]
    pub fn cell_geometry(&self, cell: CellId) -> Option<&CellGeometry> {
        self.state(cell).map(|s| &s.geometry)
    }

    /// Current level of `cell` ([`LodLevel::Hidden`] for unknown cells).
    #[must_use]
    pub fn cell_level(&self, cell: CellId) -> LodLevel {
        self.state(cell).map_or(LodLevel::Hidden, |s| s.level)
    }

    /// The mesh currently shown for `cell`.
    #[must_use]
    pub fn active_mesh(&self, cell: CellId) -> Option<MeshHandle> {
        self.state(cell).and_then(|s| s.active)
    }

    /// Whether the cell owning `tile` is shown.
    #[must_use]
    pub fn is_tile_visible(&self, tile: TileAddress) -> bool {
        self.cell_level(self.layout.cell_of(tile)).is_visible()
    }

    /// Handles of every shown mesh.
    #[must_use]
    pub fn raycast_targets(&self) -> Vec<MeshHandle> {
        self.cache.visible_handles()
    }

    /// A cached mesh.
    #[must_use]
    pub fn mesh(&self, handle: MeshHandle) -> Option<&CellMesh> {
        self.cache.mesh(handle)
    }

    /// Mutable access, e.g. to mark colours uploaded.
    pub fn mesh_mut(&mut self, handle: MeshHandle) -> Option<&mut CellMesh> {
        self.cache.mesh_mut(handle)
    }

    /// Cache counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Advance one frame for a camera at `camera` (globe centre at the
    /// origin, radius 1).
    pub fn update(
        &mut self,
        camera: DVec3,
        terrain: &TerrainStore,
        overlays: &OverlayMap,
    ) -> FrameStats {
        let mut stats = FrameStats {
            recolored: self.apply_pending_recolors(terrain, overlays),
            ..FrameStats::default()
        };

        let culler = HorizonCuller::new(camera, self.horizon_margin);
        let camera_distance = culler.camera_distance();
        self.queue.clear();

        for face in self.polyhedron.faces() {
            let geometry = self.polyhedron.geometry(face);
            let face_visible = culler.may_see_face(geometry.center_dir, geometry.angular_radius);
            let loaded = terrain.is_loaded(face);
            let range = self.face_cells(face);

            for state in &mut self.cells[range] {
                let target = (face_visible && culler.is_visible(state.geometry.center_dir))
                    .then(|| {
                        let distance = camera.distance(state.geometry.center);
                        (self.selector.select(distance, camera_distance), distance)
                    });

                match target {
                    None => {
                        if state.level.is_visible() {
                            if let Some(handle) = state.active.take() {
                                self.cache.set_visible(handle, false);
                            }
                            state.level = LodLevel::Hidden;
                            stats.hidden += 1;
                        }
                    }
                    Some((level, distance)) if level != state.level => {
                        if loaded {
                            self.queue.push(PendingTransition {
                                cell: state.id,
                                target: level,
                                distance,
                            });
                        } else {
                            stats.awaiting_terrain += 1;
                        }
                    }
                    Some(_) => {}
                }
            }
        }

        let batch = self.queue.drain_budget(self.max_builds);
        stats.deferred = self.queue.len();
        self.queue.clear();

        for transition in batch {
            match self.apply_transition(transition, terrain, overlays) {
                Some(Applied::Built) => stats.built += 1,
                Some(Applied::Reused) => stats.reused += 1,
                None => {}
            }
        }

        stats.visible_cells = self.cells.iter().filter(|s| s.level.is_visible()).count();
        debug!(
            camera_distance,
            hidden = stats.hidden,
            built = stats.built,
            reused = stats.reused,
            recolored = stats.recolored,
            deferred = stats.deferred,
            awaiting_terrain = stats.awaiting_terrain,
            visible_cells = stats.visible_cells,
            "surface update"
        );
        stats
    }

    fn apply_transition(
        &mut self,
        transition: PendingTransition,
        terrain: &TerrainStore,
        overlays: &OverlayMap,
    ) -> Option<Applied> {
        let cell = transition.cell;
        let face_terrain = terrain.get(cell.face)?;
        let index = self.layout.index(cell);
        let key = MeshKey::new(cell, transition.target);
        let shading = CellShading {
            layout: &self.layout,
            cell,
            terrain: face_terrain,
            overlays,
            palette: &self.palette,
        };

        let (handle, applied) = match self.cache.get(key) {
            Some(handle) => {
                if let Some(mesh) = self.cache.mesh_mut(handle) {
                    shading.recolor(mesh);
                }
                trace!(%cell, level = %transition.target, "reusing cached mesh");
                (handle, Applied::Reused)
            }
            None => {
                let mut mesh = CellMesh::build(
                    self.polyhedron.geometry(cell.face),
                    &self.cells[index].geometry,
                    cell,
                    transition.target,
                    self.grid_lines,
                );
                shading.recolor(&mut mesh);
                trace!(%cell, level = %transition.target, "built mesh");
                (self.cache.insert(key, mesh), Applied::Built)
            }
        };

        let state = &mut self.cells[index];
        if let Some(previous) = state.active.replace(handle)
            && previous != handle
        {
            self.cache.set_visible(previous, false);
        }
        self.cache.set_visible(handle, true);
        state.level = transition.target;
        Some(applied)
    }

    fn apply_pending_recolors(&mut self, terrain: &TerrainStore, overlays: &OverlayMap) -> usize {
        if self.pending_recolor.is_empty() {
            return 0;
        }
        let mut pending: Vec<CellId> = self.pending_recolor.drain().collect();
        pending.sort_unstable();

        let mut recolored = 0;
        for cell in pending {
            let Some(face_terrain) = terrain.get(cell.face) else {
                continue;
            };
            let Some(handle) = self.cells[self.layout.index(cell)].active else {
                continue;
            };
            let shading = CellShading {
                layout: &self.layout,
                cell,
                terrain: face_terrain,
                overlays,
                palette: &self.palette,
            };
            if let Some(mesh) = self.cache.mesh_mut(handle) {
                shading.recolor(mesh);
                recolored += 1;
            }
        }
        recolored
    }

    /// React to terrain arriving (or being replaced) for `face`: cached
    /// non-active levels are evicted and active meshes recoloured next frame.
    pub fn on_terrain_arrived(&mut self, face: FaceId) {
        let mut evicted = 0;
        for index in self.face_cells(face) {
            let state = &self.cells[index];
            let keep = state.active.map(|_| state.level);
            evicted += self.cache.evict_cell_except(state.id, keep);
            if state.active.is_some() {
                self.pending_recolor.insert(state.id);
            }
        }
        debug!(%face, evicted, "terrain arrived");
    }

    /// Recolour the active mesh around `tile` after its overlay changed.
    /// Returns whether a shown mesh was touched.
    pub fn refresh_tile(
        &mut self,
        tile: TileAddress,
        terrain: &TerrainStore,
        overlays: &OverlayMap,
    ) -> bool {
        let cell = self.layout.cell_of(tile);
        let Some(handle) = self.active_mesh(cell) else {
            return false;
        };
        let Some(face_terrain) = terrain.get(cell.face) else {
            return false;
        };
        let shading = CellShading {
            layout: &self.layout,
            cell,
            terrain: face_terrain,
            overlays,
            palette: &self.palette,
        };
        match self.cache.mesh_mut(handle) {
            Some(mesh) => {
                shading.recolor_full_tile(mesh, tile);
                true
            }
            None => false,
        }
    }

    /// Map a raycast hit on a shown mesh to the full-resolution tile under it.
    ///
    /// Stale or hidden handles and out-of-range sub-faces resolve to `None`.
    #[must_use]
    pub fn resolve_raycast_hit(&self, handle: MeshHandle, sub_face: u32) -> Option<TileAddress> {
        let Some(key) = self.cache.owner(handle) else {
            warn!(?handle, "raycast hit on a stale mesh handle");
            return None;
        };
        let state = self.state(key.cell)?;
        if state.active != Some(handle) {
            warn!(cell = %key.cell, level = %key.level, "raycast hit on a hidden mesh");
            return None;
        }
        let (row, col) = self.cache.mesh(handle)?.coarse_tile_of(sub_face)?;
        let n = state.level.subdivisions();
        let t = self.layout.tiles_per_cell();
        let (row0, col0) = self.layout.tile_origin(key.cell);
        let last = self.layout.resolution() - 1;
        Some(TileAddress::new(
            key.cell.face,
            (row0 + nearest_full_tile(row, t, n)).min(last),
            (col0 + nearest_full_tile(col, t, n)).min(last),
        ))
    }

    /// Release every cached mesh except the ones currently shown. Returns
    /// how many were dropped.
    pub fn clear_cache(&mut self) -> usize {
        let keep: Vec<MeshHandle> = self.cells.iter().filter_map(|s| s.active).collect();
        self.cache.clear_except(&keep)
    }
}

#[cfg(test)]
mod tests {
    use triaconta_mesh::{BiomeTag, FaceTerrain, Overlay, TerrainTile};

    use super::*;

    const TOY_RESOLUTION: u32 = 8;

    fn toy_polyhedron() -> Arc<Polyhedron> {
        let corners = vec![
            DVec3::new(-1.0, -1.0, 2.0),
            DVec3::new(1.0, -1.0, 2.0),
            DVec3::new(1.0, 1.0, 2.0),
            DVec3::new(-1.0, 1.0, 2.0),
        ];
        Arc::new(Polyhedron::new(corners, vec![[0, 1, 2, 3]]).expect("valid face"))
    }

    fn toy_settings(max_builds: usize) -> GlobeSettings {
        let mut settings = GlobeSettings::new(TOY_RESOLUTION, 2).expect("valid layout");
        settings.max_builds_per_frame = max_builds;
        settings
    }

    fn terrain_with(face_count: usize, resolution: u32, biome: u16) -> TerrainStore {
        let mut store = TerrainStore::new(face_count, resolution);
        for face in 0..face_count {
            store
                .deliver(
                    FaceId(face as u16),
                    FaceTerrain::filled(resolution, TerrainTile::biome(BiomeTag(biome))),
                )
                .expect("matching resolution");
        }
        store
    }

    fn toy() -> (SurfaceManager, TerrainStore) {
        let surface = SurfaceManager::new(toy_polyhedron(), &toy_settings(8));
        (surface, terrain_with(1, TOY_RESOLUTION, 3))
    }

    fn cell(row: u32, col: u32) -> CellId {
        CellId::new(FaceId(0), row, col)
    }

    fn center_dir(surface: &SurfaceManager, cell: CellId) -> DVec3 {
        surface.cell_geometry(cell).expect("known cell").center_dir
    }

    #[test]
    fn test_toy_scenario_levels() {
        let (mut surface, terrain) = toy();
        let overlays = OverlayMap::new();

        let above = center_dir(&surface, cell(0, 0)) * 1.2;
        surface.update(above, &terrain, &overlays);
        assert_eq!(surface.cell_level(cell(0, 0)), LodLevel::Sixteen);

        let dir11 = center_dir(&surface, cell(1, 1));
        let far = -dir11 * 5.0;
        let center11 = surface.cell_geometry(cell(1, 1)).expect("known cell").center;
        assert!((far.distance(center11) - 6.0).abs() < 1e-9);
        surface.update(far, &terrain, &overlays);
        assert_eq!(surface.cell_level(cell(1, 1)), LodLevel::Hidden);
    }

    #[test]
    fn test_cell_under_camera_is_never_culled() {
        let (mut surface, terrain) = toy();
        let overlays = OverlayMap::new();
        let dir = center_dir(&surface, cell(1, 0));
        for d in [1.01, 1.5, 2.5, 5.0, 20.0] {
            surface.update(dir * d, &terrain, &overlays);
            assert!(surface.cell_level(cell(1, 0)).is_visible(), "culled at {d}");
        }
    }

    #[test]
    fn test_frame_throttling_builds_exactly_k() {
        let poly = Arc::new(Polyhedron::rhombic_triacontahedron());
        let mut settings = GlobeSettings::new(16, 2).expect("valid layout");
        settings.max_builds_per_frame = 8;
        let mut surface = SurfaceManager::new(poly, &settings);
        let terrain = terrain_with(30, 16, 1);
        let overlays = OverlayMap::new();
        let camera = DVec3::new(0.0, 0.0, 3.0);

        let first = surface.update(camera, &terrain, &overlays);
        assert_eq!(first.built, 8);
        assert_eq!(first.reused, 0);
        assert!(first.deferred > 0, "more than K cells should be waiting");
        assert_eq!(first.visible_cells, 8);

        let second = surface.update(camera, &terrain, &overlays);
        assert_eq!(second.built, first.deferred.min(8));
        assert_eq!(second.deferred, first.deferred - second.built);
        assert_eq!(surface.raycast_targets().len(), second.visible_cells);
    }

    #[test]
    fn test_cache_reuse_allocates_nothing() {
        let (mut surface, terrain) = toy();
        let overlays = OverlayMap::new();
        let dir = center_dir(&surface, cell(0, 0));

        surface.update(dir * 1.2, &terrain, &overlays);
        let original = surface.active_mesh(cell(0, 0)).expect("shown");
        let positions = surface.mesh(original).expect("cached").positions.clone();
        let indices = surface.mesh(original).expect("cached").indices.clone();

        surface.update(dir * 3.0, &terrain, &overlays);
        assert_eq!(surface.cell_level(cell(0, 0)), LodLevel::Two);
        assert!(!surface.raycast_targets().contains(&original));
        let built_before = surface.cache_stats().built;

        let stats = surface.update(dir * 1.2, &terrain, &overlays);
        assert_eq!(stats.built, 0);
        assert!(stats.reused >= 1);
        assert_eq!(surface.cache_stats().built, built_before);
        assert_eq!(surface.active_mesh(cell(0, 0)), Some(original));
        let mesh = surface.mesh(original).expect("cached");
        assert_eq!(mesh.positions, positions);
        assert_eq!(mesh.indices, indices);
    }

    #[test]
    fn test_missing_terrain_keeps_cells_hidden() {
        let mut surface = SurfaceManager::new(toy_polyhedron(), &toy_settings(8));
        let mut terrain = TerrainStore::new(1, TOY_RESOLUTION);
        let overlays = OverlayMap::new();
        let camera = center_dir(&surface, cell(0, 0)) * 1.2;

        let stats = surface.update(camera, &terrain, &overlays);
        assert!(stats.awaiting_terrain > 0);
        assert_eq!(stats.built, 0);
        assert_eq!(surface.cell_level(cell(0, 0)), LodLevel::Hidden);

        terrain
            .deliver(
                FaceId(0),
                FaceTerrain::filled(TOY_RESOLUTION, TerrainTile::default()),
            )
            .expect("matching resolution");
        surface.on_terrain_arrived(FaceId(0));
        let stats = surface.update(camera, &terrain, &overlays);
        assert_eq!(stats.awaiting_terrain, 0);
        assert!(stats.built > 0);
        assert_eq!(surface.cell_level(cell(0, 0)), LodLevel::Sixteen);
    }

    #[test]
    fn test_terrain_replacement_evicts_and_recolors() {
        let (mut surface, mut terrain) = toy();
        let overlays = OverlayMap::new();
        let dir = center_dir(&surface, cell(0, 0));
        surface.update(dir * 1.2, &terrain, &overlays);
        surface.update(dir * 3.0, &terrain, &overlays);
        let active = surface.active_mesh(cell(0, 0)).expect("shown");
        let visible = surface.raycast_targets().len();

        terrain
            .deliver(
                FaceId(0),
                FaceTerrain::filled(TOY_RESOLUTION, TerrainTile::biome(BiomeTag(5))),
            )
            .expect("matching resolution");
        surface.on_terrain_arrived(FaceId(0));
        // The hidden Sixteen mesh of cell (0, 0) had stale colours.
        assert!(surface.cache.get(MeshKey::new(cell(0, 0), LodLevel::Sixteen)).is_none());
        assert_eq!(surface.cache.get(MeshKey::new(cell(0, 0), LodLevel::Two)), Some(active));

        let stats = surface.update(dir * 3.0, &terrain, &overlays);
        assert_eq!(stats.recolored, visible);
        let expected = Palette::default().biome_color(BiomeTag(5));
        let color = surface.mesh(active).expect("cached").colors[0];
        assert!((color[0] - expected.x).abs() < 1e-6);
        assert!((color[2] - expected.z).abs() < 1e-6);
    }

    #[test]
    fn test_raycast_resolves_full_resolution_tile() {
        let (mut surface, terrain) = toy();
        let overlays = OverlayMap::new();
        let dir = center_dir(&surface, cell(0, 0));
        surface.update(dir * 1.2, &terrain, &overlays);
        let handle = surface.active_mesh(cell(0, 0)).expect("shown");

        assert_eq!(
            surface.resolve_raycast_hit(handle, 0),
            Some(TileAddress::new(FaceId(0), 0, 0))
        );
        // Last triangle of a 16 x 16 mesh over 4 x 4 full tiles.
        assert_eq!(
            surface.resolve_raycast_hit(handle, 511),
            Some(TileAddress::new(FaceId(0), 3, 3))
        );
        assert_eq!(surface.resolve_raycast_hit(handle, 512), None);

        surface.update(dir * 3.0, &terrain, &overlays);
        assert_eq!(surface.resolve_raycast_hit(handle, 0), None, "hidden mesh");
    }

    #[test]
    fn test_overlay_refresh_touches_only_colors() {
        let (mut surface, terrain) = toy();
        let mut overlays = OverlayMap::new();
        let dir = center_dir(&surface, cell(0, 0));
        surface.update(dir * 1.2, &terrain, &overlays);
        let handle = surface.active_mesh(cell(0, 0)).expect("shown");
        surface.mesh_mut(handle).expect("cached").mark_colors_uploaded();
        let before = surface.mesh(handle).expect("cached").clone();

        let tile = TileAddress::new(FaceId(0), 1, 1);
        overlays.set(tile, Overlay::Selected);
        assert!(surface.refresh_tile(tile, &terrain, &overlays));

        let after = surface.mesh(handle).expect("cached");
        assert!(after.colors_dirty());
        assert_ne!(after.colors, before.colors);
        assert_eq!(after.positions, before.positions);
        assert_eq!(after.indices, before.indices);

        let hidden_tile = TileAddress::new(FaceId(0), 7, 7);
        let refreshed = surface.refresh_tile(hidden_tile, &terrain, &overlays);
        assert_eq!(refreshed, surface.is_tile_visible(hidden_tile));
    }

    #[test]
    fn test_clear_cache_keeps_active_meshes() {
        let (mut surface, terrain) = toy();
        let overlays = OverlayMap::new();
        let dir = center_dir(&surface, cell(0, 0));
        surface.update(dir * 1.2, &terrain, &overlays);
        surface.update(dir * 3.0, &terrain, &overlays);
        let shown = surface.raycast_targets();
        assert!(surface.cache_stats().live > shown.len());

        surface.clear_cache();
        assert_eq!(surface.cache_stats().live, shown.len());
        for handle in shown {
            assert!(surface.mesh(handle).is_some());
        }
    }
}
