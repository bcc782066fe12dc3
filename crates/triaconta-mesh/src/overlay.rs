//! Per-tile UI overlays and their tints.

use glam::Vec3;
use rustc_hash::FxHashMap;
use triaconta_polyhedron::TileAddress;

/// A transient UI state attached to a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Overlay {
    /// No overlay.
    #[default]
    None,
    /// Pointer is over the tile.
    Hover,
    /// Tile is selected.
    Selected,
    /// Tile is in an error state.
    Error,
    /// Tile is marked for demolition.
    Demolish,
}

impl Overlay {
    /// Aggregation priority: Error > Selected > Demolish > Hover > None.
    #[must_use]
    pub fn priority(self) -> u8 {
        match self {
            Overlay::None => 0,
            Overlay::Hover => 1,
            Overlay::Demolish => 2,
            Overlay::Selected => 3,
            Overlay::Error => 4,
        }
    }

    /// Tint colour and blend factor, or `None` for no tint.
    #[must_use]
    pub fn tint(self) -> Option<(Vec3, f32)> {
        match self {
            Overlay::None => None,
            Overlay::Hover => Some((Vec3::new(0.6, 0.8, 1.0), 0.35)),
            Overlay::Selected => Some((Vec3::new(1.0, 0.85, 0.2), 0.55)),
            Overlay::Error => Some((Vec3::new(0.9, 0.1, 0.1), 0.60)),
            Overlay::Demolish => Some((Vec3::new(1.0, 0.35, 0.1), 0.50)),
        }
    }

    /// Blend `color` toward this overlay's tint.
    #[must_use]
    pub fn apply(self, color: Vec3) -> Vec3 {
        match self.tint() {
            Some((tint, amount)) => color.lerp(tint, amount),
            None => color,
        }
    }

    /// The strongest of two overlays.
    #[must_use]
    pub fn max_priority(self, other: Overlay) -> Overlay {
        if other.priority() > self.priority() {
            other
        } else {
            self
        }
    }
}

/// Sparse full-resolution overlay storage. Survives level changes because it
/// never depends on how a cell is tessellated.
#[derive(Clone, Debug, Default)]
pub struct OverlayMap {
    tiles: FxHashMap<TileAddress, Overlay>,
}

impl OverlayMap {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag `tile`; setting [`Overlay::None`] clears it. Returns the previous overlay.
    pub fn set(&mut self, tile: TileAddress, overlay: Overlay) -> Overlay {
        let previous = if overlay == Overlay::None {
            self.tiles.remove(&tile)
        } else {
            self.tiles.insert(tile, overlay)
        };
        previous.unwrap_or_default()
    }

    /// Overlay on `tile`.
    #[must_use]
    pub fn get(&self, tile: TileAddress) -> Overlay {
        self.tiles.get(&tile).copied().unwrap_or_default()
    }

    /// Number of tagged tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no tile is tagged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
