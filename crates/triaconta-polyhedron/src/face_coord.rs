//! Continuous coordinates on a polyhedron face.

use crate::FaceId;

/// A point on a face's patch. `u` and `v` are in the range \[0, 1\].
///
/// `(u=0, v=0)` is corner 0 of the face, `(u=1, v=1)` corner 2.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceCoord {
    /// Which face this coordinate lies on.
    pub face: FaceId,
    /// Parameter along the column axis, in \[0, 1\].
    pub u: f64,
    /// Parameter along the row axis, in \[0, 1\].
    pub v: f64,
}

impl FaceCoord {
    /// Construct a `FaceCoord`, clamping `u` and `v` to \[0, 1\].
    #[must_use]
    pub fn new(face: FaceId, u: f64, v: f64) -> Self {
        Self {
            face,
            u: u.clamp(0.0, 1.0),
            v: v.clamp(0.0, 1.0),
        }
    }

    /// The `(row, col)` of the tile containing this coordinate on an
    /// `n × n` grid.
    #[must_use]
    pub fn tile(&self, n: u32) -> (u32, u32) {
        let last = n.saturating_sub(1);
        let scale = f64::from(n);
        let row = ((self.v * scale).floor() as u32).min(last);
        let col = ((self.u * scale).floor() as u32).min(last);
        (row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_coord_clamping() {
        let fc = FaceCoord::new(FaceId(0), -0.5, 1.5);
        assert_eq!(fc.u, 0.0);
        assert_eq!(fc.v, 1.0);
    }

    #[test]
    fn test_tile_of_far_corner_is_last_tile() {
        let fc = FaceCoord::new(FaceId(3), 1.0, 1.0);
        assert_eq!(fc.tile(64), (63, 63));
    }

    #[test]
    fn test_tile_floor() {
        let fc = FaceCoord::new(FaceId(3), 0.26, 0.74);
        assert_eq!(fc.tile(4), (2, 1));
    }
}
