//! Inverse mapping: from a direction in space to the face coordinate and tile
//! beneath it.

use glam::{DMat3, DVec3};

use crate::{FaceCoord, FaceGeometry, FaceId, Polyhedron, TileAddress, TileAddresser};

const MAX_ITERATIONS: usize = 12;
const UV_TOLERANCE: f64 = 1e-9;

/// Solve `P(u, v) = s * dir` on one face patch by Newton iteration.
///
/// Returns `(u, v)` without range checking, or `None` if the patch faces away
/// from `dir` or the system is singular.
fn solve_patch(geometry: &FaceGeometry, dir: DVec3) -> Option<(f64, f64)> {
    let (mut u, mut v) = (0.5, 0.5);
    let mut s = geometry.point_at(u, v).dot(dir);
    if s <= 0.0 {
        return None;
    }
    for _ in 0..MAX_ITERATIONS {
        let residual = geometry.point_at(u, v) - s * dir;
        if residual.length_squared() < 1e-26 {
            break;
        }
        let (du, dv) = geometry.partials(u, v);
        let jacobian = DMat3::from_cols(du, dv, -dir);
        if jacobian.determinant().abs() < 1e-14 {
            return None;
        }
        let delta = jacobian.inverse() * residual;
        u -= delta.x;
        v -= delta.y;
        s -= delta.z;
    }
    (s > 0.0).then_some((u, v))
}

/// Find the face coordinate whose sphere point lies in `direction`.
///
/// Faces are tried in order of decreasing alignment with `direction`; the
/// first whose solved `(u, v)` falls inside the unit square wins. Returns
/// `None` for a zero direction.
#[must_use]
pub fn direction_to_face_coord(polyhedron: &Polyhedron, direction: DVec3) -> Option<FaceCoord> {
    let dir = direction.try_normalize()?;
    let mut candidates: Vec<(FaceId, f64)> = polyhedron
        .faces()
        .map(|face| (face, polyhedron.geometry(face).center_dir.dot(dir)))
        .filter(|&(_, alignment)| alignment > 0.0)
        .collect();
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

    let inside = |x: f64| (-UV_TOLERANCE..=1.0 + UV_TOLERANCE).contains(&x);
    candidates.into_iter().find_map(|(face, _)| {
        let (u, v) = solve_patch(polyhedron.geometry(face), dir)?;
        (inside(u) && inside(v)).then(|| FaceCoord::new(face, u, v))
    })
}

impl TileAddresser {
    /// The full-resolution tile whose area contains `direction`.
    #[must_use]
    pub fn locate(&self, direction: DVec3) -> Option<TileAddress> {
        let coord = direction_to_face_coord(self.polyhedron(), direction)?;
        let (row, col) = coord.tile(self.resolution());
        Some(TileAddress::new(coord.face, row, col))
    }
}
