//! Renderable mesh of one cell at one level.
//!
//! A level-`N` mesh is an `(N + 1) × (N + 1)` vertex grid over the cell's
//! `(u, v)` rectangle, projected onto the unit sphere, with two triangles per
//! coarse tile. Triangle `t` belongs to coarse tile `t / 2`, stored row-major.

use glam::DVec3;
use triaconta_lod::LodLevel;
use triaconta_polyhedron::{CellGeometry, CellId, FaceGeometry};

/// Radial lift applied to grid lines so they sit just above the surface.
pub const LINE_LIFT: f64 = 1.002;

const LINE_COLOR: [f32; 4] = [0.05, 0.05, 0.05, 0.35];

/// A single grid-line vertex, ready for GPU upload.
///
/// Layout (28 bytes total):
///   - `[0..12]`  position `[f32; 3]`
///   - `[12..28]` color `[f32; 4]`, linear RGBA
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    /// Position, slightly above the unit sphere.
    pub position: [f32; 3],
    /// Line colour.
    pub color: [f32; 4],
}

static_assertions::assert_eq_size!(LineVertex, [u8; 28]);

/// Tile-border lines of a cell's coarse grid, as a line list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineMesh {
    /// Vertex buffer.
    pub vertices: Vec<LineVertex>,
    /// Index buffer (segments, 2 indices per segment).
    pub indices: Vec<u32>,
}

impl LineMesh {
    /// Vertex buffer as raw bytes.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Positions, texture coordinates, colours and triangles of one cell at one
/// level, plus an optional line overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct CellMesh {
    cell: CellId,
    level: LodLevel,
    /// Vertex positions on the unit sphere.
    pub positions: Vec<[f32; 3]>,
    /// Texture coordinates `(j / N, i / N)`.
    pub uvs: Vec<[f32; 2]>,
    /// Linear RGBA vertex colours.
    pub colors: Vec<[f32; 4]>,
    /// Index buffer (triangles, 3 indices per triangle).
    pub indices: Vec<u32>,
    /// Optional grid-line overlay.
    pub lines: Option<LineMesh>,
    colors_dirty: bool,
}

impl CellMesh {
    /// Tessellate `cell` at `level`.
    ///
    /// Colours start white and dirty; the caller recolours before showing.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `level` is [`LodLevel::Hidden`].
    #[must_use]
    pub fn build(
        face: &FaceGeometry,
        geometry: &CellGeometry,
        cell: CellId,
        level: LodLevel,
        grid_lines: bool,
    ) -> Self {
        debug_assert!(level.is_visible(), "cannot build a hidden mesh");
        let n = level.subdivisions().max(1);
        let side = n + 1;
        let vertex_count = (side * side) as usize;

        let mut points: Vec<DVec3> = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);
        for i in 0..side {
            for j in 0..side {
                points.push(geometry.vertex(face, i, j, n));
                uvs.push([j as f32 / n as f32, i as f32 / n as f32]);
            }
        }

        let mut indices = Vec::with_capacity((6 * n * n) as usize);
        for row in 0..n {
            for col in 0..n {
                let v00 = row * side + col;
                let v10 = v00 + 1;
                let v01 = v00 + side;
                let v11 = v01 + 1;
                if geometry.flip_winding {
                    indices.extend_from_slice(&[v00, v11, v10, v00, v01, v11]);
                } else {
                    indices.extend_from_slice(&[v00, v10, v11, v00, v11, v01]);
                }
            }
        }

        let lines = grid_lines.then(|| build_lines(&points, side));

        Self {
            cell,
            level,
            positions: points.iter().map(|p| p.as_vec3().to_array()).collect(),
            uvs,
            colors: vec![[1.0; 4]; vertex_count],
            indices,
            lines,
            colors_dirty: true,
        }
    }

    /// The cell this mesh covers.
    #[must_use]
    pub fn cell(&self) -> CellId {
        self.cell
    }

    /// The level this mesh was built at.
    #[must_use]
    pub fn level(&self) -> LodLevel {
        self.level
    }

    /// Subdivisions per side.
    #[must_use]
    pub fn subdivisions(&self) -> u32 {
        self.level.subdivisions()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Coarse `(row, col)` owning triangle `sub_face`, or `None` past the end.
    #[must_use]
    pub fn coarse_tile_of(&self, sub_face: u32) -> Option<(u32, u32)> {
        if sub_face as usize >= self.triangle_count() {
            return None;
        }
        let n = self.subdivisions();
        let quad = sub_face / 2;
        Some((quad / n, quad % n))
    }

    /// Index of grid vertex `(i, j)`.
    #[must_use]
    pub fn vertex_index(&self, i: u32, j: u32) -> usize {
        (i * (self.subdivisions() + 1) + j) as usize
    }

    /// Overwrite one vertex colour and flag the buffer for re-upload.
    pub fn set_color(&mut self, i: u32, j: u32, color: [f32; 4]) {
        let index = self.vertex_index(i, j);
        if self.colors[index] != color {
            self.colors[index] = color;
            self.colors_dirty = true;
        }
    }

    /// Colour buffer as raw bytes.
    #[must_use]
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Whether colours changed since the last upload.
    #[must_use]
    pub fn colors_dirty(&self) -> bool {
        self.colors_dirty
    }

    /// Record that the colour buffer has been uploaded.
    pub fn mark_colors_uploaded(&mut self) {
        self.colors_dirty = false;
    }
}

fn build_lines(points: &[DVec3], side: u32) -> LineMesh {
    let vertices = points
        .iter()
        .map(|p| LineVertex {
            position: (*p * LINE_LIFT).as_vec3().to_array(),
            color: LINE_COLOR,
        })
        .collect();
    let mut indices = Vec::with_capacity((4 * side * (side - 1)) as usize);
    for i in 0..side {
        for j in 0..side {
            let v = i * side + j;
            if j + 1 < side {
                indices.extend_from_slice(&[v, v + 1]);
            }
            if i + 1 < side {
                indices.extend_from_slice(&[v, v + side]);
            }
        }
    }
    LineMesh { vertices, indices }
}
