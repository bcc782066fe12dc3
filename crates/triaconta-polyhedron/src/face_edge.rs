//! Local face edges and the four cardinal tile directions.

/// One of the four directed edges of a quadrilateral face.
///
/// Edge `k` runs from corner `k` to corner `(k + 1) % 4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FaceEdge {
    /// Corner 0 → corner 1, the row 0 side.
    Bottom = 0,
    /// Corner 1 → corner 2, the last column side.
    Right = 1,
    /// Corner 2 → corner 3, the last row side.
    Top = 2,
    /// Corner 3 → corner 0, the column 0 side.
    Left = 3,
}

impl FaceEdge {
    /// All four edges in corner order.
    pub const ALL: [FaceEdge; 4] = [
        FaceEdge::Bottom,
        FaceEdge::Right,
        FaceEdge::Top,
        FaceEdge::Left,
    ];

    /// Edge index `0..4`.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Slots (within the face's corner 4-tuple) of this edge's start and end.
    #[must_use]
    pub fn corner_slots(self) -> (usize, usize) {
        let k = self.index();
        (k, (k + 1) % 4)
    }

    /// Direction that leaves the face through this edge.
    #[must_use]
    pub fn outward(self) -> Direction {
        match self {
            FaceEdge::Bottom => Direction::South,
            FaceEdge::Right => Direction::East,
            FaceEdge::Top => Direction::North,
            FaceEdge::Left => Direction::West,
        }
    }

    /// Position of a boundary tile along this edge, counted from the edge's
    /// start corner.
    #[must_use]
    pub fn position_along(self, row: u32, col: u32, resolution: u32) -> u32 {
        match self {
            FaceEdge::Bottom => col,
            FaceEdge::Right => row,
            FaceEdge::Top => resolution - 1 - col,
            FaceEdge::Left => resolution - 1 - row,
        }
    }

    /// The `(row, col)` of the tile touching this edge at `position`.
    #[must_use]
    pub fn tile_at(self, position: u32, resolution: u32) -> (u32, u32) {
        let last = resolution - 1;
        match self {
            FaceEdge::Bottom => (0, position),
            FaceEdge::Right => (position, last),
            FaceEdge::Top => (last, last - position),
            FaceEdge::Left => (last - position, 0),
        }
    }
}

/// Cardinal step directions on a face's tile grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Decreasing row.
    South,
    /// Increasing column.
    East,
    /// Increasing row.
    North,
    /// Decreasing column.
    West,
}

impl Direction {
    /// All four directions. This order is also the path planner's tie-break.
    pub const ALL: [Direction; 4] = [
        Direction::South,
        Direction::East,
        Direction::North,
        Direction::West,
    ];

    /// The reverse direction.
    #[must_use]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::North => Direction::South,
            Direction::West => Direction::East,
        }
    }

    /// `(row, col)` offset of one step.
    #[must_use]
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::South => (-1, 0),
            Direction::East => (0, 1),
            Direction::North => (1, 0),
            Direction::West => (0, -1),
        }
    }

    /// The face edge crossed when stepping off the grid in this direction.
    #[must_use]
    pub fn crossed_edge(self) -> FaceEdge {
        match self {
            Direction::South => FaceEdge::Bottom,
            Direction::East => FaceEdge::Right,
            Direction::North => FaceEdge::Top,
            Direction::West => FaceEdge::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn test_crossed_edge_matches_outward() {
        for dir in Direction::ALL {
            assert_eq!(dir.crossed_edge().outward(), dir);
        }
    }

    #[test]
    fn test_tile_at_inverts_position_along() {
        let res = 8;
        for edge in FaceEdge::ALL {
            for t in 0..res {
                let (row, col) = edge.tile_at(t, res);
                assert!(row < res && col < res);
                assert_eq!(
                    edge.position_along(row, col, res),
                    t,
                    "{edge:?} does not invert at {t}"
                );
            }
        }
    }

    #[test]
    fn test_position_runs_from_start_corner() {
        // Corner 0 is (row 0, col 0); edges Bottom and Left touch it at
        // opposite ends.
        assert_eq!(FaceEdge::Bottom.position_along(0, 0, 8), 0);
        assert_eq!(FaceEdge::Left.position_along(0, 0, 8), 7);
        // Corner 2 is (row 7, col 7).
        assert_eq!(FaceEdge::Top.position_along(7, 7, 8), 0);
        assert_eq!(FaceEdge::Right.position_along(7, 7, 8), 7);
    }

    #[test]
    fn test_corner_slots_cycle() {
        assert_eq!(FaceEdge::Bottom.corner_slots(), (0, 1));
        assert_eq!(FaceEdge::Left.corner_slots(), (3, 0));
    }
}
