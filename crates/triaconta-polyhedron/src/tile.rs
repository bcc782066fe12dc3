//! Tile addressing: face-local grid coordinates, their positions on the unit
//! sphere, and cardinal neighbour lookup across face seams.

use std::fmt;
use std::sync::Arc;

use glam::DVec3;

use crate::{Direction, FaceGeometry, FaceId, Polyhedron, Topology};

/// Address of one full-resolution tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileAddress {
    /// Owning face.
    pub face: FaceId,
    /// Row in `[0, R)`, growing along the face's `v` axis.
    pub row: u32,
    /// Column in `[0, R)`, growing along the face's `u` axis.
    pub col: u32,
}

impl TileAddress {
    /// Create a tile address. No range checking is performed.
    #[must_use]
    pub const fn new(face: FaceId, row: u32, col: u32) -> Self {
        Self { face, row, col }
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:r{}:c{}", self.face, self.row, self.col)
    }
}

/// Centre of tile `(row, col)` on a face subdivided `n` times per side,
/// projected onto the unit sphere.
#[must_use]
pub fn tile_position(geometry: &FaceGeometry, row: u32, col: u32, n: u32) -> DVec3 {
    let n = f64::from(n);
    geometry.sphere_point((f64::from(col) + 0.5) / n, (f64::from(row) + 0.5) / n)
}

/// Maps tile addresses to sphere positions and resolves neighbours,
/// including across face boundaries.
///
/// Full-resolution tile centres are computed once at construction.
#[derive(Clone, Debug)]
pub struct TileAddresser {
    polyhedron: Arc<Polyhedron>,
    topology: Arc<Topology>,
    resolution: u32,
    centers: Vec<DVec3>,
}

impl TileAddresser {
    /// Create an addresser for an `resolution × resolution` grid per face.
    ///
    /// A zero resolution is raised to 1.
    #[must_use]
    pub fn new(polyhedron: Arc<Polyhedron>, topology: Arc<Topology>, resolution: u32) -> Self {
        debug_assert!(resolution > 0, "resolution must be positive");
        let resolution = resolution.max(1);
        let mut centers = Vec::with_capacity(polyhedron.face_count() * (resolution * resolution) as usize);
        for face in polyhedron.faces() {
            let geometry = polyhedron.geometry(face);
            for row in 0..resolution {
                for col in 0..resolution {
                    centers.push(tile_position(geometry, row, col, resolution));
                }
            }
        }
        Self {
            polyhedron,
            topology,
            resolution,
            centers,
        }
    }

    /// Full tile resolution `R` per face side.
    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// The shared polyhedron.
    #[must_use]
    pub fn polyhedron(&self) -> &Arc<Polyhedron> {
        &self.polyhedron
    }

    /// The shared topology.
    #[must_use]
    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    /// Whether `tile` names an existing face and lies inside its grid.
    #[must_use]
    pub fn is_valid(&self, tile: TileAddress) -> bool {
        self.polyhedron.contains_face(tile.face)
            && tile.row < self.resolution
            && tile.col < self.resolution
    }

    /// Centre of tile `(row, col)` of `face` at resolution `n`.
    ///
    /// Out-of-range rows and columns are clamped to `n - 1` (debug builds
    /// assert instead).
    ///
    /// # Panics
    ///
    /// Panics if `face` does not exist.
    #[must_use]
    pub fn position_of(&self, face: FaceId, row: u32, col: u32, n: u32) -> DVec3 {
        debug_assert!(row < n && col < n, "tile ({row}, {col}) outside {n}x{n} grid");
        let n = n.max(1);
        tile_position(self.polyhedron.geometry(face), row.min(n - 1), col.min(n - 1), n)
    }

    /// Full-resolution centre of `tile`, from the precomputed table.
    ///
    /// Out-of-range rows and columns are clamped like [`Self::position_of`].
    #[must_use]
    pub fn tile_center(&self, tile: TileAddress) -> DVec3 {
        debug_assert!(self.is_valid(tile), "invalid tile {tile}");
        let last = self.resolution - 1;
        let row = tile.row.min(last) as usize;
        let col = tile.col.min(last) as usize;
        let res = self.resolution as usize;
        self.centers[(tile.face.index() * res + row) * res + col]
    }

    /// The tile one step from `tile` in `dir`.
    ///
    /// Returns `None` only if `tile` itself is invalid.
    #[must_use]
    pub fn neighbor(&self, tile: TileAddress, dir: Direction) -> Option<TileAddress> {
        self.step(tile, dir).map(|(next, _)| next)
    }

    /// Like [`Self::neighbor`], also returning the heading of the move in the
    /// destination face's frame.
    ///
    /// Within a face the heading is `dir`. Across a seam it is the direction
    /// pointing inward from the entry edge, so stepping by
    /// `heading.opposite()` returns to `tile`.
    #[must_use]
    pub fn step(&self, tile: TileAddress, dir: Direction) -> Option<(TileAddress, Direction)> {
        if !self.is_valid(tile) {
            return None;
        }
        let res = i64::from(self.resolution);
        let (dr, dc) = dir.offset();
        let row = i64::from(tile.row) + dr;
        let col = i64::from(tile.col) + dc;
        if (0..res).contains(&row) && (0..res).contains(&col) {
            return Some((TileAddress::new(tile.face, row as u32, col as u32), dir));
        }

        let edge = dir.crossed_edge();
        let along = edge.position_along(tile.row, tile.col, self.resolution);
        let adj = self.topology.adjacency(tile.face, edge);
        let position = if adj.flipped {
            self.resolution - 1 - along
        } else {
            along
        };
        let (row, col) = adj.neighbor_edge.tile_at(position, self.resolution);
        let heading = adj.neighbor_edge.outward().opposite();
        Some((TileAddress::new(adj.neighbor_face, row, col), heading))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addresser(resolution: u32) -> TileAddresser {
        let poly = Arc::new(Polyhedron::rhombic_triacontahedron());
        let topo = Arc::new(Topology::resolve(&poly).expect("closed"));
        TileAddresser::new(poly, topo, resolution)
    }

    #[test]
    fn test_tile_centers_lie_on_unit_sphere() {
        let a = addresser(8);
        for face in a.polyhedron().faces() {
            for row in 0..8 {
                for col in 0..8 {
                    let p = a.tile_center(TileAddress::new(face, row, col));
                    assert!((p.length() - 1.0).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_position_of_matches_cached_center_at_full_resolution() {
        let a = addresser(16);
        let tile = TileAddress::new(FaceId(7), 3, 11);
        let direct = a.position_of(tile.face, tile.row, tile.col, 16);
        assert!((direct - a.tile_center(tile)).length() < 1e-15);
    }

    #[test]
    fn test_coarse_position_is_inside_its_covered_tiles() {
        let a = addresser(16);
        // Coarse tile (0, 0) at N=2 covers full tiles (0..8, 0..8); its
        // centre sits on the corner shared by tiles (3..=4, 3..=4).
        let coarse = a.position_of(FaceId(2), 0, 0, 2);
        let nearby = a.tile_center(TileAddress::new(FaceId(2), 4, 4));
        let far = a.tile_center(TileAddress::new(FaceId(2), 15, 15));
        assert!((coarse - nearby).length() < (coarse - far).length());
    }

    #[test]
    fn test_interior_neighbors_stay_on_face() {
        let a = addresser(8);
        let tile = TileAddress::new(FaceId(4), 3, 3);
        assert_eq!(
            a.neighbor(tile, Direction::North),
            Some(TileAddress::new(FaceId(4), 4, 3))
        );
        assert_eq!(
            a.neighbor(tile, Direction::West),
            Some(TileAddress::new(FaceId(4), 3, 2))
        );
    }

    #[test]
    fn test_neighbor_round_trip_returns_origin() {
        let res = 8;
        let a = addresser(res);
        for face in a.polyhedron().faces() {
            for row in 0..res {
                for col in 0..res {
                    let tile = TileAddress::new(face, row, col);
                    for dir in Direction::ALL {
                        let (next, heading) = a.step(tile, dir).expect("valid tile");
                        assert!(a.is_valid(next), "{tile} {dir:?} left the grid: {next}");
                        let back = a.neighbor(next, heading.opposite());
                        assert_eq!(back, Some(tile), "round trip failed for {tile} {dir:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_cross_face_neighbors_are_geometrically_adjacent() {
        let res = 16;
        let a = addresser(res);
        // Typical spacing between adjacent tiles on the same face.
        let spacing = (a.tile_center(TileAddress::new(FaceId(0), 8, 8))
            - a.tile_center(TileAddress::new(FaceId(0), 8, 9)))
        .length();
        for face in a.polyhedron().faces() {
            for t in 0..res {
                for (tile, dir) in [
                    (TileAddress::new(face, 0, t), Direction::South),
                    (TileAddress::new(face, t, res - 1), Direction::East),
                    (TileAddress::new(face, res - 1, t), Direction::North),
                    (TileAddress::new(face, t, 0), Direction::West),
                ] {
                    let next = a.neighbor(tile, dir).expect("valid tile");
                    assert_ne!(next.face, face);
                    let gap = (a.tile_center(tile) - a.tile_center(next)).length();
                    assert!(
                        gap < spacing * 2.0,
                        "{tile} -> {next} is {gap}, typical spacing {spacing}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_invalid_tile_has_no_neighbor() {
        let a = addresser(8);
        assert_eq!(a.neighbor(TileAddress::new(FaceId(0), 8, 0), Direction::East), None);
        assert_eq!(a.neighbor(TileAddress::new(FaceId(30), 0, 0), Direction::East), None);
    }

    #[test]
    fn test_every_tile_has_four_distinct_neighbors() {
        let a = addresser(4);
        for face in a.polyhedron().faces() {
            for row in 0..4 {
                for col in 0..4 {
                    let tile = TileAddress::new(face, row, col);
                    let mut n: Vec<TileAddress> = Direction::ALL
                        .iter()
                        .filter_map(|&d| a.neighbor(tile, d))
                        .collect();
                    n.sort();
                    n.dedup();
                    assert_eq!(n.len(), 4, "{tile} has repeated neighbours");
                    assert!(!n.contains(&tile));
                }
            }
        }
    }
}
