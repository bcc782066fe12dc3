//! Runtime settings for a globe, built from configuration.

use triaconta_config::Config;
use triaconta_lod::{DEFAULT_HORIZON_MARGIN, LodBand, LodLevel, LodThresholds};
use triaconta_mesh::{DEFAULT_RESOURCE_ACCENT_BLEND, Palette};
use triaconta_polyhedron::{CellLayout, DEFAULT_MAX_STEPS};

use crate::GlobeError;

/// Validated settings shared by the surface manager and the facade.
#[derive(Clone, Debug)]
pub struct GlobeSettings {
    /// Tile grid partition.
    pub layout: CellLayout,
    /// Level selection thresholds.
    pub thresholds: LodThresholds,
    /// Hemisphere cull margin.
    pub horizon_margin: f64,
    /// Transitions applied per frame (K).
    pub max_builds_per_frame: usize,
    /// Path planner step bound.
    pub max_path_steps: usize,
    /// Build grid-line meshes.
    pub grid_lines: bool,
    /// Terrain colours.
    pub palette: Palette,
}

impl GlobeSettings {
    /// Defaults for a given grid.
    pub fn new(resolution: u32, cells_per_side: u32) -> Result<Self, GlobeError> {
        Ok(Self {
            layout: CellLayout::new(resolution, cells_per_side)?,
            thresholds: LodThresholds::default(),
            horizon_margin: DEFAULT_HORIZON_MARGIN,
            max_builds_per_frame: 8,
            max_path_steps: DEFAULT_MAX_STEPS,
            grid_lines: true,
            palette: Palette::default().with_resource_accent_blend(DEFAULT_RESOURCE_ACCENT_BLEND),
        })
    }

    /// Translate a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, GlobeError> {
        let layout = CellLayout::new(config.globe.resolution, config.globe.cells_per_side)?;
        let bands = config
            .lod
            .bands
            .iter()
            .map(|b| -> Result<LodBand, GlobeError> {
                Ok(LodBand::new(LodLevel::from_subdivisions(b.level)?, b.max_distance))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let thresholds = LodThresholds::new(
            bands,
            LodLevel::from_subdivisions(config.lod.floor_level)?,
            config.lod.zoom_reference,
        )?;
        Ok(Self {
            layout,
            thresholds,
            horizon_margin: config.lod.horizon_margin.max(0.0),
            max_builds_per_frame: config.lod.max_builds_per_frame.max(1) as usize,
            max_path_steps: config.path.max_steps.max(1) as usize,
            grid_lines: config.render.grid_lines,
            palette: Palette::default().with_resource_accent_blend(config.render.resource_accent_blend),
        })
    }
}

#[cfg(test)]
mod tests {
    use triaconta_lod::LodError;

    use super::*;

    #[test]
    fn test_from_default_config() {
        let settings = GlobeSettings::from_config(&Config::default()).expect("defaults are valid");
        assert_eq!(settings.layout.resolution(), 64);
        assert_eq!(settings.layout.cells_per_side(), 4);
        assert_eq!(settings.thresholds, LodThresholds::default());
        assert_eq!(settings.max_builds_per_frame, 8);
        assert_eq!(settings.max_path_steps, 128);
        assert!(settings.grid_lines);
    }

    #[test]
    fn test_from_config_rejects_bad_level() {
        let mut config = Config::default();
        config.lod.floor_level = 3;
        assert_eq!(
            GlobeSettings::from_config(&config).unwrap_err(),
            GlobeError::Lod(LodError::UnsupportedLevel(3))
        );
    }

    #[test]
    fn test_from_config_rejects_bad_layout() {
        let mut config = Config::default();
        config.globe.cells_per_side = 3;
        assert!(matches!(
            GlobeSettings::from_config(&config),
            Err(GlobeError::Polyhedron(_))
        ));
    }
}
