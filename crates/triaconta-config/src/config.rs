//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted config inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

const VISIBLE_LEVELS: [u32; 4] = [2, 4, 8, 16];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Tile grid dimensions.
    pub globe: GlobeConfig,
    /// Level-of-detail selection and rebuild throttling.
    pub lod: LodConfig,
    /// Path planner settings.
    pub path: PathConfig,
    /// Mesh appearance.
    pub render: RenderConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Tile grid dimensions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobeConfig {
    /// Full-resolution tiles per face side (R).
    pub resolution: u32,
    /// Cells per face side (C). Must divide `resolution`.
    pub cells_per_side: u32,
}

/// One distance band of the level selector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BandConfig {
    /// Subdivisions per cell side (2, 4, 8 or 16).
    pub level: u32,
    /// Cells nearer than this (at zoom scale 1) take `level`.
    pub max_distance: f64,
}

/// Level-of-detail configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodConfig {
    /// Distance bands, finest first.
    pub bands: Vec<BandConfig>,
    /// Level for visible cells beyond the last band.
    pub floor_level: u32,
    /// Camera distance beyond which thresholds shrink proportionally.
    pub zoom_reference: f64,
    /// Widening of the visible cap against silhouette popping.
    pub horizon_margin: f64,
    /// Maximum mesh builds or cache reuses applied per frame (K).
    pub max_builds_per_frame: u32,
}

/// Path planner configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathConfig {
    /// Step bound for a single path computation.
    pub max_steps: u32,
}

/// Mesh appearance configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Build the tile-border line mesh alongside each cell mesh.
    pub grid_lines: bool,
    /// Blend toward a resource's accent colour (0.0 - 1.0).
    pub resource_accent_blend: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            resolution: 64,
            cells_per_side: 4,
        }
    }
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            bands: vec![
                BandConfig {
                    level: 16,
                    max_distance: 0.35,
                },
                BandConfig {
                    level: 8,
                    max_distance: 0.7,
                },
                BandConfig {
                    level: 4,
                    max_distance: 1.2,
                },
            ],
            floor_level: 2,
            zoom_reference: 1.5,
            horizon_margin: 0.15,
            max_builds_per_frame: 8,
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self { max_steps: 128 }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            grid_lines: true,
            resource_accent_blend: 0.35,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Platform config directory for triaconta, if the platform has one.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("triaconta"))
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Check every value range the globe relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let globe = &self.globe;
        if globe.cells_per_side == 0 {
            return Err(invalid("globe.cells_per_side", "must be at least 1"));
        }
        if globe.resolution == 0 || globe.resolution % globe.cells_per_side != 0 {
            return Err(invalid(
                "globe.resolution",
                format!(
                    "{} is not a positive multiple of cells_per_side {}",
                    globe.resolution, globe.cells_per_side
                ),
            ));
        }

        let lod = &self.lod;
        if lod.bands.is_empty() {
            return Err(invalid("lod.bands", "at least one band is required"));
        }
        for (i, band) in lod.bands.iter().enumerate() {
            if !VISIBLE_LEVELS.contains(&band.level) {
                return Err(invalid(
                    "lod.bands",
                    format!("band {i} level {} is not one of 2, 4, 8, 16", band.level),
                ));
            }
            if !(band.max_distance.is_finite() && band.max_distance > 0.0) {
                return Err(invalid(
                    "lod.bands",
                    format!("band {i} distance {} must be positive", band.max_distance),
                ));
            }
            if i > 0 {
                let prev = lod.bands[i - 1];
                if band.max_distance <= prev.max_distance {
                    return Err(invalid(
                        "lod.bands",
                        format!("band {i} distance must exceed the previous band"),
                    ));
                }
                if band.level >= prev.level {
                    return Err(invalid(
                        "lod.bands",
                        format!("band {i} level must be coarser than the previous band"),
                    ));
                }
            }
        }
        if !VISIBLE_LEVELS.contains(&lod.floor_level) {
            return Err(invalid("lod.floor_level", "must be one of 2, 4, 8, 16"));
        }
        if !(lod.zoom_reference.is_finite() && lod.zoom_reference > 0.0) {
            return Err(invalid("lod.zoom_reference", "must be positive"));
        }
        if !(lod.horizon_margin.is_finite() && lod.horizon_margin >= 0.0) {
            return Err(invalid("lod.horizon_margin", "must be non-negative"));
        }
        if lod.max_builds_per_frame == 0 {
            return Err(invalid("lod.max_builds_per_frame", "must be at least 1"));
        }
        if self.path.max_steps == 0 {
            return Err(invalid("path.max_steps", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.render.resource_accent_blend) {
            return Err(invalid("render.resource_accent_blend", "must be within 0.0 - 1.0"));
        }
        Ok(())
    }
}
