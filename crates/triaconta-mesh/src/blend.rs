//! Vertex colouring: terrain sampling, overlay tinting and neighbour
//! averaging, for whole meshes or single coarse tiles.

use std::ops::Range;

use glam::Vec3;
use triaconta_polyhedron::{CellId, CellLayout, TileAddress};

use crate::{CellMesh, FaceTerrain, Overlay, OverlayMap, Palette};

/// Cell-local full-resolution index of the tile nearest the centre of coarse
/// tile `k`, for `tiles` full tiles and `n` coarse tiles per cell side.
#[must_use]
pub fn nearest_full_tile(k: u32, tiles: u32, n: u32) -> u32 {
    let index = ((f64::from(k) + 0.5) * f64::from(tiles) / f64::from(n)).floor() as u32;
    index.min(tiles.saturating_sub(1))
}

/// Cell-local full-resolution indices covered by coarse tile `k`. Never empty.
#[must_use]
pub fn covered_full_tiles(k: u32, tiles: u32, n: u32) -> Range<u32> {
    let start = ((u64::from(k) * u64::from(tiles)) / u64::from(n)) as u32;
    let start = start.min(tiles.saturating_sub(1));
    let end = (u64::from(k + 1) * u64::from(tiles)).div_ceil(u64::from(n)) as u32;
    start..end.max(start + 1).min(tiles)
}

/// Coarse indices whose colour depends on cell-local full tile `f`.
#[must_use]
pub fn coarse_tiles_touching(f: u32, tiles: u32, n: u32) -> Vec<u32> {
    (0..n)
        .filter(|&k| nearest_full_tile(k, tiles, n) == f || covered_full_tiles(k, tiles, n).contains(&f))
        .collect()
}

/// Everything needed to colour meshes of one cell.
#[derive(Clone, Copy)]
pub struct CellShading<'a> {
    /// Cell partition.
    pub layout: &'a CellLayout,
    /// The cell being coloured.
    pub cell: CellId,
    /// Terrain of the cell's face.
    pub terrain: &'a FaceTerrain,
    /// Full-resolution overlays.
    pub overlays: &'a OverlayMap,
    /// Colour tables.
    pub palette: &'a Palette,
}

impl CellShading<'_> {
    /// Full-resolution address of cell-local tile `(row, col)`.
    fn full_tile(&self, row: u32, col: u32) -> TileAddress {
        let (row0, col0) = self.layout.tile_origin(self.cell);
        TileAddress::new(self.cell.face, row0 + row, col0 + col)
    }

    /// Colour of coarse tile `(row, col)` at `n` subdivisions: nearest-centre
    /// terrain sample tinted by the strongest overlay among covered tiles.
    #[must_use]
    pub fn coarse_color(&self, row: u32, col: u32, n: u32) -> Vec3 {
        let t = self.layout.tiles_per_cell();
        let sample = self.full_tile(nearest_full_tile(row, t, n), nearest_full_tile(col, t, n));
        let base = self.palette.tile_color(self.terrain.get(sample.row, sample.col));

        let mut overlay = Overlay::None;
        if !self.overlays.is_empty() {
            for r in covered_full_tiles(row, t, n) {
                for c in covered_full_tiles(col, t, n) {
                    overlay = overlay.max_priority(self.overlays.get(self.full_tile(r, c)));
                }
            }
        }
        overlay.apply(base)
    }

    /// Mean colour of the up-to-4 coarse tiles sharing vertex `(i, j)`.
    fn vertex_color(&self, i: u32, j: u32, n: u32, coarse: &impl Fn(u32, u32) -> Vec3) -> [f32; 4] {
        let rows = i.saturating_sub(1)..(i + 1).min(n);
        let mut sum = Vec3::ZERO;
        let mut count = 0.0;
        for r in rows {
            for c in j.saturating_sub(1)..(j + 1).min(n) {
                sum += coarse(r, c);
                count += 1.0;
            }
        }
        (sum / count).extend(1.0).to_array()
    }

    /// Recolour every vertex of `mesh`.
    pub fn recolor(&self, mesh: &mut CellMesh) {
        let n = mesh.subdivisions();
        let mut table = Vec::with_capacity((n * n) as usize);
        for row in 0..n {
            for col in 0..n {
                table.push(self.coarse_color(row, col, n));
            }
        }
        let lookup = |r: u32, c: u32| table[(r * n + c) as usize];
        for i in 0..=n {
            for j in 0..=n {
                let color = self.vertex_color(i, j, n, &lookup);
                mesh.set_color(i, j, color);
            }
        }
    }

    /// Recolour only the vertices touching coarse tile `(row, col)`.
    pub fn recolor_coarse_tile(&self, mesh: &mut CellMesh, row: u32, col: u32) {
        let n = mesh.subdivisions();
        let lookup = |r: u32, c: u32| self.coarse_color(r, c, n);
        for i in row..=(row + 1).min(n) {
            for j in col..=(col + 1).min(n) {
                let color = self.vertex_color(i, j, n, &lookup);
                mesh.set_color(i, j, color);
            }
        }
    }

    /// Recolour the vertices affected by a change to full-resolution `tile`,
    /// which must lie in this cell.
    pub fn recolor_full_tile(&self, mesh: &mut CellMesh, tile: TileAddress) {
        let n = mesh.subdivisions();
        let t = self.layout.tiles_per_cell();
        debug_assert_eq!(self.layout.cell_of(tile), self.cell, "{tile} is outside {}", self.cell);
        let (row0, col0) = self.layout.tile_origin(self.cell);
        let rows = coarse_tiles_touching(tile.row.saturating_sub(row0), t, n);
        let cols = coarse_tiles_touching(tile.col.saturating_sub(col0), t, n);
        for &r in &rows {
            for &c in &cols {
                self.recolor_coarse_tile(mesh, r, c);
            }
        }
    }
}
