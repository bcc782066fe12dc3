//! Partition of each face into a fixed grid of independently levelled cells.

use std::fmt;

use glam::{DVec2, DVec3};

use crate::error::PolyhedronError;
use crate::{FaceGeometry, FaceId, TileAddress};

/// One cell of a face's `C × C` cell grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    /// Owning face.
    pub face: FaceId,
    /// Cell row in `[0, C)`.
    pub row: u32,
    /// Cell column in `[0, C)`.
    pub col: u32,
}

impl CellId {
    /// Create a cell id. No range checking is performed.
    #[must_use]
    pub const fn new(face: FaceId, row: u32, col: u32) -> Self {
        Self { face, row, col }
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:cell({}, {})", self.face, self.row, self.col)
    }
}

/// How a face's `R × R` tile grid divides into `C × C` cells of
/// `R / C` tiles per side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellLayout {
    resolution: u32,
    cells_per_side: u32,
}

impl CellLayout {
    /// Validate and create a layout.
    pub fn new(resolution: u32, cells_per_side: u32) -> Result<Self, PolyhedronError> {
        if cells_per_side == 0 || resolution == 0 || resolution % cells_per_side != 0 {
            return Err(PolyhedronError::InvalidCellLayout {
                resolution,
                cells_per_side,
            });
        }
        Ok(Self {
            resolution,
            cells_per_side,
        })
    }

    /// Full tile resolution `R`.
    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Cells per face side `C`.
    #[must_use]
    pub fn cells_per_side(&self) -> u32 {
        self.cells_per_side
    }

    /// Full-resolution tiles per cell side `R / C`.
    #[must_use]
    pub fn tiles_per_cell(&self) -> u32 {
        self.resolution / self.cells_per_side
    }

    /// Cells on one face.
    #[must_use]
    pub fn cells_per_face(&self) -> usize {
        (self.cells_per_side * self.cells_per_side) as usize
    }

    /// The cell owning `tile`.
    #[must_use]
    pub fn cell_of(&self, tile: TileAddress) -> CellId {
        let t = self.tiles_per_cell();
        CellId::new(tile.face, tile.row / t, tile.col / t)
    }

    /// Full-resolution `(row, col)` of the cell's first tile.
    #[must_use]
    pub fn tile_origin(&self, cell: CellId) -> (u32, u32) {
        let t = self.tiles_per_cell();
        (cell.row * t, cell.col * t)
    }

    /// Dense index of `cell` over all faces.
    #[must_use]
    pub fn index(&self, cell: CellId) -> usize {
        let c = self.cells_per_side as usize;
        cell.face.index() * c * c + cell.row as usize * c + cell.col as usize
    }

    /// Every cell of `face_count` faces, in [`Self::index`] order.
    pub fn cells(&self, face_count: usize) -> impl Iterator<Item = CellId> + '_ {
        let c = self.cells_per_side;
        (0..face_count).flat_map(move |face| {
            (0..c).flat_map(move |row| {
                (0..c).map(move |col| CellId::new(FaceId(face as u16), row, col))
            })
        })
    }
}

/// Geometry of one cell, computed once at load.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellGeometry {
    /// Face-local `(u, v)` of the cell's corner 0.
    pub uv_min: DVec2,
    /// Side length of the cell in face-local `(u, v)` units.
    pub uv_size: f64,
    /// Sphere point at the cell's corner 0.
    pub origin: DVec3,
    /// Sphere point at `(u_max, v_min)` minus `origin`.
    pub edge_u: DVec3,
    /// Sphere point at `(u_min, v_max)` minus `origin`.
    pub edge_v: DVec3,
    /// Cell centre on the unit sphere.
    pub center: DVec3,
    /// Unit direction through the cell centre (equal to `center` on a unit sphere).
    pub center_dir: DVec3,
    /// Whether triangles must be emitted clockwise in `(u, v)` to face outward.
    pub flip_winding: bool,
}

impl CellGeometry {
    /// Precompute geometry for `cell` on a face with patch `face`.
    #[must_use]
    pub fn new(face: &FaceGeometry, layout: &CellLayout, cell: CellId) -> Self {
        let uv_size = 1.0 / f64::from(layout.cells_per_side());
        let uv_min = DVec2::new(f64::from(cell.col) * uv_size, f64::from(cell.row) * uv_size);
        let origin = face.sphere_point(uv_min.x, uv_min.y);
        let edge_u = face.sphere_point(uv_min.x + uv_size, uv_min.y) - origin;
        let edge_v = face.sphere_point(uv_min.x, uv_min.y + uv_size) - origin;
        let center = face.sphere_point(uv_min.x + 0.5 * uv_size, uv_min.y + 0.5 * uv_size);
        let flip_winding = edge_u.cross(edge_v).dot(origin) < 0.0;
        Self {
            uv_min,
            uv_size,
            origin,
            edge_u,
            edge_v,
            center,
            center_dir: center.normalize(),
            flip_winding,
        }
    }

    /// Sphere point of grid vertex `(i, j)` (row, column) when the cell is
    /// tessellated `n` times per side.
    #[must_use]
    pub fn vertex(&self, face: &FaceGeometry, i: u32, j: u32, n: u32) -> DVec3 {
        let step = self.uv_size / f64::from(n);
        face.sphere_point(
            self.uv_min.x + f64::from(j) * step,
            self.uv_min.y + f64::from(i) * step,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Polyhedron;

    #[test]
    fn test_layout_rejects_uneven_partition() {
        assert!(CellLayout::new(64, 4).is_ok());
        assert_eq!(
            CellLayout::new(64, 5),
            Err(PolyhedronError::InvalidCellLayout {
                resolution: 64,
                cells_per_side: 5
            })
        );
        assert!(CellLayout::new(64, 0).is_err());
    }

    #[test]
    fn test_cell_of_tile() {
        let layout = CellLayout::new(64, 4).expect("valid");
        assert_eq!(layout.tiles_per_cell(), 16);
        let cell = layout.cell_of(TileAddress::new(FaceId(9), 17, 63));
        assert_eq!(cell, CellId::new(FaceId(9), 1, 3));
        assert_eq!(layout.tile_origin(cell), (16, 48));
    }

    #[test]
    fn test_cells_iterate_in_index_order() {
        let layout = CellLayout::new(8, 2).expect("valid");
        for (i, cell) in layout.cells(3).enumerate() {
            assert_eq!(layout.index(cell), i);
        }
        assert_eq!(layout.cells(3).count(), 12);
    }

    #[test]
    fn test_cell_centers_are_on_sphere_and_inside_face() {
        let poly = Polyhedron::rhombic_triacontahedron();
        let layout = CellLayout::new(64, 4).expect("valid");
        for cell in layout.cells(poly.face_count()) {
            let face = poly.geometry(cell.face);
            let g = CellGeometry::new(face, &layout, cell);
            assert!((g.center.length() - 1.0).abs() < 1e-12);
            let angle = g.center_dir.dot(face.center_dir).clamp(-1.0, 1.0).acos();
            assert!(angle <= face.angular_radius);
        }
    }

    #[test]
    fn test_outward_faces_keep_default_winding() {
        let poly = Polyhedron::rhombic_triacontahedron();
        let layout = CellLayout::new(64, 4).expect("valid");
        for cell in layout.cells(poly.face_count()) {
            let g = CellGeometry::new(poly.geometry(cell.face), &layout, cell);
            assert!(!g.flip_winding, "{cell} should not need flipped winding");
        }
    }

    #[test]
    fn test_cell_vertices_share_face_seams() {
        let poly = Polyhedron::rhombic_triacontahedron();
        let layout = CellLayout::new(64, 4).expect("valid");
        let face = poly.geometry(FaceId(0));
        let left = CellGeometry::new(face, &layout, CellId::new(FaceId(0), 0, 0));
        let right = CellGeometry::new(face, &layout, CellId::new(FaceId(0), 0, 1));
        for i in 0..=4 {
            let a = left.vertex(face, i, 4, 4);
            let b = right.vertex(face, i, 0, 4);
            assert!((a - b).length() < 1e-12);
        }
    }
}
