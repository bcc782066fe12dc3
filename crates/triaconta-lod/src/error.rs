//! Errors raised while validating level-of-detail thresholds.

use crate::LodLevel;

/// Invalid distance-band configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LodError {
    /// No distance bands were supplied.
    #[error("at least one distance band is required")]
    NoBands,

    /// A band distance is zero, negative, or not finite.
    #[error("band {index} has invalid distance {distance}")]
    InvalidDistance {
        /// Band index.
        index: usize,
        /// Offending distance.
        distance: f64,
    },

    /// Band distances must strictly increase.
    #[error("band {index} distance does not increase over the previous band")]
    DistancesNotIncreasing {
        /// Band index.
        index: usize,
    },

    /// Band levels must strictly decrease with distance.
    #[error("band {index} level {level:?} is not coarser than the previous band")]
    LevelsNotDecreasing {
        /// Band index.
        index: usize,
        /// Offending level.
        level: LodLevel,
    },

    /// A band or the floor names the hidden level; culling is the only way to hide a cell.
    #[error("distance bands and the floor level must be visible levels")]
    HiddenLevel,

    /// The floor level is finer than the last band.
    #[error("floor level {floor:?} is finer than the last band level {last:?}")]
    FloorTooFine {
        /// Configured floor.
        floor: LodLevel,
        /// Level of the last band.
        last: LodLevel,
    },

    /// The zoom reference distance is zero, negative, or not finite.
    #[error("zoom reference distance {0} must be positive")]
    InvalidZoomReference(f64),

    /// A subdivision count that is not one of 0, 2, 4, 8 or 16.
    #[error("{0} is not a supported subdivision count")]
    UnsupportedLevel(u32),
}
