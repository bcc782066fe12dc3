//! Per-face terrain tags read when colouring meshes.

use crate::MeshError;

/// Biome identifier supplied by the world data source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeTag(pub u16);

/// Resource identifier supplied by the world data source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceTag(pub u16);

/// What the world data source says about one full-resolution tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TerrainTile {
    /// Biome of the tile.
    pub biome: BiomeTag,
    /// Optional resource deposit.
    pub resource: Option<ResourceTag>,
}

impl TerrainTile {
    /// A tile with a biome and no resource.
    #[must_use]
    pub const fn biome(biome: BiomeTag) -> Self {
        Self {
            biome,
            resource: None,
        }
    }
}

/// Full-resolution terrain for one face, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceTerrain {
    resolution: u32,
    tiles: Vec<TerrainTile>,
}

impl FaceTerrain {
    /// A face filled with `fill`.
    #[must_use]
    pub fn filled(resolution: u32, fill: TerrainTile) -> Self {
        Self {
            resolution,
            tiles: vec![fill; (resolution * resolution) as usize],
        }
    }

    /// Wrap a row-major tile vector.
    pub fn from_tiles(resolution: u32, tiles: Vec<TerrainTile>) -> Result<Self, MeshError> {
        let expected = (resolution * resolution) as usize;
        if tiles.len() != expected {
            return Err(MeshError::TerrainSizeMismatch {
                expected,
                actual: tiles.len(),
            });
        }
        Ok(Self { resolution, tiles })
    }

    /// Tiles per face side.
    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// The tile at `(row, col)`, clamped into the grid.
    #[must_use]
    pub fn get(&self, row: u32, col: u32) -> TerrainTile {
        let last = self.resolution.saturating_sub(1);
        self.tiles[(row.min(last) * self.resolution + col.min(last)) as usize]
    }

    /// Overwrite one tile. Out-of-range writes are ignored.
    pub fn set(&mut self, row: u32, col: u32, tile: TerrainTile) {
        if row < self.resolution && col < self.resolution {
            self.tiles[(row * self.resolution + col) as usize] = tile;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tiles_checks_size() {
        assert_eq!(
            FaceTerrain::from_tiles(4, vec![TerrainTile::default(); 15]),
            Err(MeshError::TerrainSizeMismatch {
                expected: 16,
                actual: 15
            })
        );
        assert!(FaceTerrain::from_tiles(4, vec![TerrainTile::default(); 16]).is_ok());
    }

    #[test]
    fn test_get_and_set() {
        let mut face = FaceTerrain::filled(4, TerrainTile::biome(BiomeTag(1)));
        let ore = TerrainTile {
            biome: BiomeTag(2),
            resource: Some(ResourceTag(0)),
        };
        face.set(2, 3, ore);
        face.set(9, 9, ore);
        assert_eq!(face.get(2, 3), ore);
        assert_eq!(face.get(3, 2).biome, BiomeTag(1));
        assert_eq!(face.get(99, 3), face.get(3, 3), "reads clamp into the grid");
    }
}
