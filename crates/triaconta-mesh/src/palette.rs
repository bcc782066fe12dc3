//! Biome and resource colours.

use glam::Vec3;

use crate::{BiomeTag, ResourceTag, TerrainTile};

/// Default blend toward a resource accent colour.
pub const DEFAULT_RESOURCE_ACCENT_BLEND: f32 = 0.35;

const UNKNOWN: Vec3 = Vec3::new(0.5, 0.5, 0.5);

/// Maps terrain tags to linear RGB.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    biomes: Vec<Vec3>,
    resources: Vec<Vec3>,
    resource_accent_blend: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            biomes: vec![
                Vec3::new(0.08, 0.22, 0.48), // deep ocean
                Vec3::new(0.16, 0.42, 0.66), // shallows
                Vec3::new(0.86, 0.80, 0.56), // beach
                Vec3::new(0.36, 0.62, 0.26), // grassland
                Vec3::new(0.16, 0.40, 0.18), // forest
                Vec3::new(0.84, 0.66, 0.36), // desert
                Vec3::new(0.52, 0.48, 0.44), // mountain
                Vec3::new(0.92, 0.95, 0.98), // ice
            ],
            resources: vec![
                Vec3::new(0.75, 0.45, 0.20), // ore
                Vec3::new(0.55, 0.30, 0.10), // timber
                Vec3::new(0.55, 0.85, 0.95), // crystal
                Vec3::new(0.10, 0.10, 0.12), // oil
            ],
            resource_accent_blend: DEFAULT_RESOURCE_ACCENT_BLEND,
        }
    }
}

impl Palette {
    /// Build a palette from explicit tables.
    #[must_use]
    pub fn new(biomes: Vec<Vec3>, resources: Vec<Vec3>, resource_accent_blend: f32) -> Self {
        Self {
            biomes,
            resources,
            resource_accent_blend: resource_accent_blend.clamp(0.0, 1.0),
        }
    }

    /// Replace the accent blend factor, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_resource_accent_blend(mut self, blend: f32) -> Self {
        self.resource_accent_blend = blend.clamp(0.0, 1.0);
        self
    }

    /// Colour of a biome; unknown tags are grey.
    #[must_use]
    pub fn biome_color(&self, biome: BiomeTag) -> Vec3 {
        self.biomes.get(biome.0 as usize).copied().unwrap_or(UNKNOWN)
    }

    /// Accent colour of a resource; unknown tags are grey.
    #[must_use]
    pub fn resource_color(&self, resource: ResourceTag) -> Vec3 {
        self.resources
            .get(resource.0 as usize)
            .copied()
            .unwrap_or(UNKNOWN)
    }

    /// Base colour of a tile before overlay tinting.
    #[must_use]
    pub fn tile_color(&self, tile: TerrainTile) -> Vec3 {
        let base = self.biome_color(tile.biome);
        match tile.resource {
            Some(resource) => base.lerp(self.resource_color(resource), self.resource_accent_blend),
            None => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_biome_is_grey() {
        let palette = Palette::default();
        assert_eq!(palette.biome_color(BiomeTag(500)), UNKNOWN);
        assert_ne!(palette.biome_color(BiomeTag(3)), UNKNOWN);
    }

    #[test]
    fn test_resource_blends_toward_accent() {
        let palette = Palette::new(vec![Vec3::ZERO], vec![Vec3::ONE], 0.35);
        let plain = palette.tile_color(TerrainTile::biome(BiomeTag(0)));
        let rich = palette.tile_color(TerrainTile {
            biome: BiomeTag(0),
            resource: Some(ResourceTag(0)),
        });
        assert_eq!(plain, Vec3::ZERO);
        assert!((rich - Vec3::splat(0.35)).length() < 1e-6);
    }
}
