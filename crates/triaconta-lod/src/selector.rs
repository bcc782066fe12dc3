//! Distance-based level selection with zoom-scaled thresholds.

use crate::{LodError, LodLevel};

/// One distance band: cells nearer than `max_distance` (after zoom scaling)
/// take `level`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodBand {
    /// Level assigned inside this band.
    pub level: LodLevel,
    /// Exclusive upper distance bound at zoom scale 1.
    pub max_distance: f64,
}

impl LodBand {
    /// Create a band.
    #[must_use]
    pub const fn new(level: LodLevel, max_distance: f64) -> Self {
        Self {
            level,
            max_distance,
        }
    }
}

/// Configuration for distance-based level selection.
#[derive(Clone, Debug, PartialEq)]
pub struct LodThresholds {
    /// Bands ordered nearest (finest) first.
    bands: Vec<LodBand>,
    /// Level for visible cells beyond the last band.
    floor_level: LodLevel,
    /// Camera distance at and below which thresholds are not scaled.
    zoom_reference: f64,
}

impl Default for LodThresholds {
    /// Sixteen below 0.35, eight below 0.7, four below 1.2, two beyond;
    /// thresholds start shrinking once the camera is farther than 1.5 radii.
    fn default() -> Self {
        Self {
            bands: vec![
                LodBand::new(LodLevel::Sixteen, 0.35),
                LodBand::new(LodLevel::Eight, 0.7),
                LodBand::new(LodLevel::Four, 1.2),
            ],
            floor_level: LodLevel::Two,
            zoom_reference: 1.5,
        }
    }
}

impl LodThresholds {
    /// Validate and create thresholds.
    ///
    /// Distances must be positive and strictly increasing, levels strictly
    /// decreasing, and the floor no finer than the last band.
    pub fn new(
        bands: Vec<LodBand>,
        floor_level: LodLevel,
        zoom_reference: f64,
    ) -> Result<Self, LodError> {
        let Some(last) = bands.last() else {
            return Err(LodError::NoBands);
        };
        if !floor_level.is_visible() || bands.iter().any(|b| !b.level.is_visible()) {
            return Err(LodError::HiddenLevel);
        }
        for (index, band) in bands.iter().enumerate() {
            if !(band.max_distance.is_finite() && band.max_distance > 0.0) {
                return Err(LodError::InvalidDistance {
                    index,
                    distance: band.max_distance,
                });
            }
            if index > 0 {
                let prev = bands[index - 1];
                if band.max_distance <= prev.max_distance {
                    return Err(LodError::DistancesNotIncreasing { index });
                }
                if band.level >= prev.level {
                    return Err(LodError::LevelsNotDecreasing {
                        index,
                        level: band.level,
                    });
                }
            }
        }
        if floor_level > last.level {
            return Err(LodError::FloorTooFine {
                floor: floor_level,
                last: last.level,
            });
        }
        if !(zoom_reference.is_finite() && zoom_reference > 0.0) {
            return Err(LodError::InvalidZoomReference(zoom_reference));
        }
        Ok(Self {
            bands,
            floor_level,
            zoom_reference,
        })
    }

    /// The distance bands, nearest first.
    #[must_use]
    pub fn bands(&self) -> &[LodBand] {
        &self.bands
    }

    /// Level beyond the last band.
    #[must_use]
    pub fn floor_level(&self) -> LodLevel {
        self.floor_level
    }

    /// Zoom reference distance.
    #[must_use]
    pub fn zoom_reference(&self) -> f64 {
        self.zoom_reference
    }

    /// Threshold multiplier for a camera `camera_distance` from the globe
    /// centre: `min(1, zoom_reference / camera_distance)`.
    #[must_use]
    pub fn zoom_scale(&self, camera_distance: f64) -> f64 {
        if camera_distance <= self.zoom_reference {
            1.0
        } else {
            self.zoom_reference / camera_distance
        }
    }
}

/// Selects a cell's target level from its distance to the camera.
#[derive(Clone, Debug, Default)]
pub struct LodSelector {
    thresholds: LodThresholds,
}

impl LodSelector {
    /// Create a selector with the given thresholds.
    #[must_use]
    pub fn new(thresholds: LodThresholds) -> Self {
        Self { thresholds }
    }

    /// Target level for a visible cell `distance` from the camera, with the
    /// camera `camera_distance` from the globe centre.
    ///
    /// Never returns [`LodLevel::Hidden`]; hiding is the culler's job.
    #[must_use]
    pub fn select(&self, distance: f64, camera_distance: f64) -> LodLevel {
        debug_assert!(distance >= 0.0, "distance must be non-negative");
        let scale = self.thresholds.zoom_scale(camera_distance);
        self.thresholds
            .bands
            .iter()
            .find(|band| distance < band.max_distance * scale)
            .map_or(self.thresholds.floor_level, |band| band.level)
    }

    /// Access the underlying thresholds.
    #[must_use]
    pub fn thresholds(&self) -> &LodThresholds {
        &self.thresholds
    }
}
