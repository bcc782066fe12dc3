//! Nearest-first queue of pending level transitions, drained under a
//! per-frame budget.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use triaconta_polyhedron::CellId;

use crate::LodLevel;

/// A cell waiting to switch to a visible level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingTransition {
    /// The cell.
    pub cell: CellId,
    /// Level to switch to.
    pub target: LodLevel,
    /// Camera distance to the cell centre.
    pub distance: f64,
}

#[derive(Clone, Debug)]
struct QueueEntry {
    transition: PendingTransition,
    /// Generation counter to skip entries superseded by a later push.
    generation: u64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    /// Reversed so the max-heap pops the nearest cell, ties by cell id.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .transition
            .distance
            .total_cmp(&self.transition.distance)
            .then_with(|| other.transition.cell.cmp(&self.transition.cell))
    }
}

/// Pending non-hide transitions for one frame.
///
/// Pushing a cell twice keeps only the latest transition.
#[derive(Debug, Default)]
pub struct RebuildQueue {
    heap: BinaryHeap<QueueEntry>,
    /// Current generation of each queued cell.
    generations: HashMap<CellId, u64>,
    next_generation: u64,
}

impl RebuildQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue or replace the transition for `transition.cell`.
    pub fn push(&mut self, transition: PendingTransition) {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.generations.insert(transition.cell, generation);
        self.heap.push(QueueEntry {
            transition,
            generation,
        });
    }

    /// Remove and return the nearest pending transition.
    pub fn pop(&mut self) -> Option<PendingTransition> {
        while let Some(entry) = self.heap.pop() {
            let cell = entry.transition.cell;
            if self.generations.get(&cell) == Some(&entry.generation) {
                self.generations.remove(&cell);
                return Some(entry.transition);
            }
        }
        None
    }

    /// Pop up to `budget` transitions, nearest first.
    pub fn drain_budget(&mut self, budget: usize) -> Vec<PendingTransition> {
        let mut out = Vec::with_capacity(budget.min(self.len()));
        while out.len() < budget {
            match self.pop() {
                Some(t) => out.push(t),
                None => break,
            }
        }
        out
    }

    /// Whether `cell` has a pending transition.
    #[must_use]
    pub fn contains(&self, cell: CellId) -> bool {
        self.generations.contains_key(&cell)
    }

    /// Number of pending transitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    /// Drop every pending transition.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.generations.clear();
    }
}

#[cfg(test)]
mod tests {
    use triaconta_polyhedron::FaceId;

    use super::*;

    fn pending(face: u16, row: u32, distance: f64) -> PendingTransition {
        PendingTransition {
            cell: CellId::new(FaceId(face), row, 0),
            target: LodLevel::Four,
            distance,
        }
    }

    #[test]
    fn test_pops_nearest_first() {
        let mut queue = RebuildQueue::new();
        queue.push(pending(0, 0, 3.0));
        queue.push(pending(0, 1, 1.0));
        queue.push(pending(0, 2, 2.0));
        let order: Vec<f64> = std::iter::from_fn(|| queue.pop())
            .map(|t| t.distance)
            .collect();
        assert_eq!(order, vec![1.0, 2.0, 3.0]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_ties_break_by_cell_id() {
        let mut queue = RebuildQueue::new();
        queue.push(pending(2, 0, 1.0));
        queue.push(pending(1, 3, 1.0));
        queue.push(pending(1, 1, 1.0));
        let cells: Vec<CellId> = queue.drain_budget(3).into_iter().map(|t| t.cell).collect();
        assert_eq!(
            cells,
            vec![
                CellId::new(FaceId(1), 1, 0),
                CellId::new(FaceId(1), 3, 0),
                CellId::new(FaceId(2), 0, 0),
            ]
        );
    }

    #[test]
    fn test_push_replaces_previous_entry() {
        let mut queue = RebuildQueue::new();
        queue.push(pending(0, 0, 5.0));
        queue.push(pending(0, 1, 2.0));
        queue.push(pending(0, 0, 1.0));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop().map(|t| t.distance), Some(1.0));
        assert_eq!(queue.pop().map(|t| t.distance), Some(2.0));
        assert_eq!(queue.pop(), None, "stale entry must be skipped");
    }

    #[test]
    fn test_drain_budget_leaves_remainder() {
        let mut queue = RebuildQueue::new();
        for row in 0..10 {
            queue.push(pending(0, row, f64::from(row)));
        }
        let batch = queue.drain_budget(4);
        assert_eq!(batch.len(), 4);
        assert_eq!(queue.len(), 6);
        assert!(queue.contains(CellId::new(FaceId(0), 9, 0)));
        assert!(!queue.contains(CellId::new(FaceId(0), 0, 0)));
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.drain_budget(4).is_empty());
    }
}
