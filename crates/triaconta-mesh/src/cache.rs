//! Mesh cache keyed by `(cell, level)`.
//!
//! Meshes are retained hidden across level switches and released only by
//! explicit eviction. Handles carry a slot generation, so a handle to an
//! evicted mesh never resolves to whatever later reuses its slot.

use std::mem::size_of;

use rustc_hash::FxHashMap;
use tracing::debug;
use triaconta_lod::LodLevel;
use triaconta_polyhedron::CellId;

use crate::CellMesh;

/// Cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshKey {
    /// Owning cell.
    pub cell: CellId,
    /// Level the mesh was built at.
    pub level: LodLevel,
}

impl MeshKey {
    /// Create a key.
    #[must_use]
    pub const fn new(cell: CellId, level: LodLevel) -> Self {
        Self { cell, level }
    }
}

/// Generation-tagged reference to a cached mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle {
    slot: u32,
    generation: u32,
}

impl MeshHandle {
    /// Slot index, stable while the mesh is cached.
    #[must_use]
    pub fn slot(self) -> u32 {
        self.slot
    }
}

#[derive(Debug)]
struct Entry {
    key: MeshKey,
    mesh: CellMesh,
    visible: bool,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Counters describing cache contents and churn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Meshes currently cached.
    pub live: usize,
    /// Cached meshes currently shown.
    pub visible: usize,
    /// Meshes inserted since creation.
    pub built: u64,
    /// Meshes evicted since creation.
    pub evicted: u64,
    /// Approximate bytes held by cached vertex and index buffers.
    pub approx_bytes: usize,
}

/// Slot-vector cache of cell meshes.
#[derive(Debug, Default)]
pub struct MeshCache {
    slots: Vec<Slot>,
    free: Vec<u32>,
    index: FxHashMap<MeshKey, MeshHandle>,
    built: u64,
    evicted: u64,
}

fn mesh_bytes(mesh: &CellMesh) -> usize {
    // position + uv + colour
    let vertex = size_of::<[f32; 3]>() + size_of::<[f32; 2]>() + size_of::<[f32; 4]>();
    let lines = mesh.lines.as_ref().map_or(0, |l| {
        l.vertex_bytes().len() + l.indices.len() * size_of::<u32>()
    });
    mesh.positions.len() * vertex + mesh.indices.len() * size_of::<u32>() + lines
}

impl MeshCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, handle: MeshHandle) -> Option<&Entry> {
        let slot = self.slots.get(handle.slot as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, handle: MeshHandle) -> Option<&mut Entry> {
        let slot = self.slots.get_mut(handle.slot as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_mut()
    }

    /// Handle of the mesh cached for `key`.
    #[must_use]
    pub fn get(&self, key: MeshKey) -> Option<MeshHandle> {
        self.index.get(&key).copied()
    }

    /// Cache `mesh` under `key`, hidden. An existing mesh for `key` is evicted first.
    pub fn insert(&mut self, key: MeshKey, mesh: CellMesh) -> MeshHandle {
        self.evict(key);
        let entry = Entry {
            key,
            mesh,
            visible: false,
        };
        let handle = match self.free.pop() {
            Some(slot) => {
                let s = &mut self.slots[slot as usize];
                s.entry = Some(entry);
                MeshHandle {
                    slot,
                    generation: s.generation,
                }
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                MeshHandle {
                    slot,
                    generation: 0,
                }
            }
        };
        self.index.insert(key, handle);
        self.built += 1;
        handle
    }

    /// The mesh behind `handle`, if still cached.
    #[must_use]
    pub fn mesh(&self, handle: MeshHandle) -> Option<&CellMesh> {
        self.entry(handle).map(|e| &e.mesh)
    }

    /// Mutable access for in-place recolouring.
    pub fn mesh_mut(&mut self, handle: MeshHandle) -> Option<&mut CellMesh> {
        self.entry_mut(handle).map(|e| &mut e.mesh)
    }

    /// The key `handle` was cached under.
    #[must_use]
    pub fn owner(&self, handle: MeshHandle) -> Option<MeshKey> {
        self.entry(handle).map(|e| e.key)
    }

    /// Show or hide a cached mesh. Returns `false` for a stale handle.
    pub fn set_visible(&mut self, handle: MeshHandle, visible: bool) -> bool {
        match self.entry_mut(handle) {
            Some(entry) => {
                entry.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Whether `handle` resolves to a shown mesh.
    #[must_use]
    pub fn is_visible(&self, handle: MeshHandle) -> bool {
        self.entry(handle).is_some_and(|e| e.visible)
    }

    /// Handles of every shown mesh, in slot order.
    #[must_use]
    pub fn visible_handles(&self) -> Vec<MeshHandle> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, s)| {
                s.entry.as_ref().filter(|e| e.visible).map(|_| MeshHandle {
                    slot: slot as u32,
                    generation: s.generation,
                })
            })
            .collect()
    }

    fn release(&mut self, handle: MeshHandle) -> Option<Entry> {
        let slot = self.slots.get_mut(handle.slot as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.slot);
        self.index.remove(&entry.key);
        self.evicted += 1;
        Some(entry)
    }

    /// Drop the mesh cached for `key`. Returns whether one existed.
    pub fn evict(&mut self, key: MeshKey) -> bool {
        match self.index.get(&key).copied() {
            Some(handle) => self.release(handle).is_some(),
            None => false,
        }
    }

    /// Drop every level cached for `cell` except `keep`. Returns how many were dropped.
    pub fn evict_cell_except(&mut self, cell: CellId, keep: Option<LodLevel>) -> usize {
        let mut dropped = 0;
        for level in LodLevel::VISIBLE {
            if Some(level) != keep && self.evict(MeshKey::new(cell, level)) {
                dropped += 1;
            }
        }
        dropped
    }

    /// Drop every mesh not in `keep`. Returns how many were dropped.
    pub fn clear_except(&mut self, keep: &[MeshHandle]) -> usize {
        let doomed: Vec<MeshHandle> = self
            .index
            .values()
            .copied()
            .filter(|h| !keep.contains(h))
            .collect();
        let mut dropped = 0;
        for handle in doomed {
            if self.release(handle).is_some() {
                dropped += 1;
            }
        }
        debug!(dropped, kept = self.index.len(), "cleared mesh cache");
        dropped
    }

    /// Number of cached meshes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats {
            built: self.built,
            evicted: self.evicted,
            ..CacheStats::default()
        };
        for entry in self.slots.iter().filter_map(|s| s.entry.as_ref()) {
            stats.live += 1;
            stats.visible += usize::from(entry.visible);
            stats.approx_bytes += mesh_bytes(&entry.mesh);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use triaconta_polyhedron::{CellGeometry, CellLayout, FaceId, Polyhedron};

    use super::*;

    fn mesh(cell: CellId, level: LodLevel) -> CellMesh {
        let poly = Polyhedron::rhombic_triacontahedron();
        let layout = CellLayout::new(16, 2).expect("valid");
        let face = poly.geometry(cell.face);
        let geometry = CellGeometry::new(face, &layout, cell);
        CellMesh::build(face, &geometry, cell, level, false)
    }

    fn key(row: u32, level: LodLevel) -> MeshKey {
        MeshKey::new(CellId::new(FaceId(0), row, 0), level)
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut cache = MeshCache::new();
        let k = key(0, LodLevel::Four);
        let handle = cache.insert(k, mesh(k.cell, k.level));
        assert_eq!(cache.get(k), Some(handle));
        assert_eq!(cache.owner(handle), Some(k));
        assert_eq!(cache.mesh(handle).map(CellMesh::level), Some(LodLevel::Four));
        assert!(!cache.is_visible(handle), "new meshes start hidden");
    }

    #[test]
    fn test_stale_handle_does_not_resolve_to_new_occupant() {
        let mut cache = MeshCache::new();
        let a = key(0, LodLevel::Two);
        let b = key(1, LodLevel::Two);
        let old = cache.insert(a, mesh(a.cell, a.level));
        assert!(cache.evict(a));
        let new = cache.insert(b, mesh(b.cell, b.level));
        assert_eq!(old.slot(), new.slot(), "slot is reused");
        assert_eq!(cache.mesh(old), None);
        assert_eq!(cache.owner(old), None);
        assert!(!cache.set_visible(old, true));
        assert_eq!(cache.owner(new), Some(b));
    }

    #[test]
    fn test_visible_handles() {
        let mut cache = MeshCache::new();
        let a = key(0, LodLevel::Two);
        let b = key(0, LodLevel::Eight);
        let ha = cache.insert(a, mesh(a.cell, a.level));
        let hb = cache.insert(b, mesh(b.cell, b.level));
        cache.set_visible(hb, true);
        assert_eq!(cache.visible_handles(), vec![hb]);
        cache.set_visible(ha, true);
        cache.set_visible(hb, false);
        assert_eq!(cache.visible_handles(), vec![ha]);
    }

    #[test]
    fn test_evict_cell_except_keeps_active_level() {
        let mut cache = MeshCache::new();
        for level in LodLevel::VISIBLE {
            let k = key(0, level);
            cache.insert(k, mesh(k.cell, k.level));
        }
        let other = key(1, LodLevel::Two);
        cache.insert(other, mesh(other.cell, other.level));

        let dropped = cache.evict_cell_except(key(0, LodLevel::Two).cell, Some(LodLevel::Eight));
        assert_eq!(dropped, 3);
        assert!(cache.get(key(0, LodLevel::Eight)).is_some());
        assert!(cache.get(key(0, LodLevel::Two)).is_none());
        assert!(cache.get(other).is_some());
    }

    #[test]
    fn test_clear_except_preserves_kept_handles() {
        let mut cache = MeshCache::new();
        let a = key(0, LodLevel::Two);
        let b = key(1, LodLevel::Four);
        let ha = cache.insert(a, mesh(a.cell, a.level));
        cache.insert(b, mesh(b.cell, b.level));
        assert_eq!(cache.clear_except(&[ha]), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.mesh(ha).is_some());
        let stats = cache.stats();
        assert_eq!((stats.live, stats.built, stats.evicted), (1, 2, 1));
        assert!(stats.approx_bytes > 0);
    }

    #[test]
    fn test_reinsert_replaces_entry() {
        let mut cache = MeshCache::new();
        let k = key(0, LodLevel::Two);
        let first = cache.insert(k, mesh(k.cell, k.level));
        let second = cache.insert(k, mesh(k.cell, k.level));
        assert_ne!(first, second);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.mesh(first), None);
    }
}
