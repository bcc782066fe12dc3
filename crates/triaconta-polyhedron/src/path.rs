//! Greedy bounded tile paths between two addresses.
//!
//! At each tile the planner steps toward whichever of the four neighbours is
//! closest (squared 3-D distance) to the goal. It guarantees termination, not
//! optimality. Equidistant candidates resolve to the first in
//! [`Direction::ALL`] order, and near symmetric boundaries the walk can
//! oscillate until the cycle guard stops it.

use std::collections::HashSet;

use crate::{Direction, TileAddress, TileAddresser};

/// Default step bound.
pub const DEFAULT_MAX_STEPS: usize = 128;

/// One tile of a path and the direction of travel leaving (or, for the final
/// tile, entering) it, expressed in that tile's face frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathStep {
    /// The tile.
    pub tile: TileAddress,
    /// Direction of travel at this tile.
    pub orientation: Direction,
}

/// Why path computation stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathOutcome {
    /// The goal tile is the last step.
    Reached,
    /// The walk returned to an already visited tile.
    Cycle,
    /// The step bound ran out first.
    StepLimit,
    /// The start or goal is not a valid tile.
    InvalidEndpoint,
}

/// An ordered tile sequence plus how it ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    /// Steps from the start tile onward.
    pub steps: Vec<PathStep>,
    /// Termination reason.
    pub outcome: PathOutcome,
}

impl Path {
    /// Whether the path ends at its goal.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outcome == PathOutcome::Reached
    }

    /// The tiles visited, in order.
    pub fn tiles(&self) -> impl Iterator<Item = TileAddress> + '_ {
        self.steps.iter().map(|s| s.tile)
    }
}

/// Greedy path planner with a fixed step bound.
#[derive(Clone, Copy, Debug)]
pub struct PathPlanner {
    max_steps: usize,
}

impl Default for PathPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STEPS)
    }
}

impl PathPlanner {
    /// Create a planner that gives up after `max_steps` moves.
    #[must_use]
    pub fn new(max_steps: usize) -> Self {
        Self { max_steps }
    }

    /// The configured step bound.
    #[must_use]
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Compute a path from `start` to `end`.
    ///
    /// If `start == end` the path is the single step `{start, initial}`.
    /// Cycles and step exhaustion return the partial path walked so far.
    #[must_use]
    pub fn compute_path(
        &self,
        addresser: &TileAddresser,
        start: TileAddress,
        end: TileAddress,
        initial: Direction,
    ) -> Path {
        if !addresser.is_valid(start) || !addresser.is_valid(end) {
            return Path {
                steps: Vec::new(),
                outcome: PathOutcome::InvalidEndpoint,
            };
        }
        if start == end {
            return Path {
                steps: vec![PathStep {
                    tile: start,
                    orientation: initial,
                }],
                outcome: PathOutcome::Reached,
            };
        }

        let goal = addresser.tile_center(end);
        let mut visited = HashSet::from([start]);
        let mut steps = Vec::new();
        let mut current = start;

        for _ in 0..self.max_steps {
            let best = Direction::ALL
                .iter()
                .filter_map(|&dir| {
                    let (next, heading) = addresser.step(current, dir)?;
                    let dist = addresser.tile_center(next).distance_squared(goal);
                    Some((dir, next, heading, dist))
                })
                .min_by(|a, b| a.3.total_cmp(&b.3));
            let Some((dir, next, heading, _)) = best else {
                break;
            };

            steps.push(PathStep {
                tile: current,
                orientation: dir,
            });
            if next == end {
                steps.push(PathStep {
                    tile: end,
                    orientation: heading,
                });
                return Path {
                    steps,
                    outcome: PathOutcome::Reached,
                };
            }
            if !visited.insert(next) {
                return Path {
                    steps,
                    outcome: PathOutcome::Cycle,
                };
            }
            current = next;
        }

        Path {
            steps,
            outcome: PathOutcome::StepLimit,
        }
    }
}
