//! The discrete detail levels a cell can take.

use std::fmt;

use crate::LodError;

/// Subdivisions per cell side. `Hidden` means the cell is not rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum LodLevel {
    /// Not rendered.
    #[default]
    Hidden = 0,
    /// 2 × 2 coarse tiles.
    Two = 2,
    /// 4 × 4 coarse tiles.
    Four = 4,
    /// 8 × 8 coarse tiles.
    Eight = 8,
    /// 16 × 16 coarse tiles.
    Sixteen = 16,
}

impl LodLevel {
    /// Every visible level, coarsest first.
    pub const VISIBLE: [LodLevel; 4] = [
        LodLevel::Two,
        LodLevel::Four,
        LodLevel::Eight,
        LodLevel::Sixteen,
    ];

    /// Subdivisions per cell side (0 for `Hidden`).
    #[must_use]
    pub fn subdivisions(self) -> u32 {
        self as u32
    }

    /// Whether a mesh is shown at this level.
    #[must_use]
    pub fn is_visible(self) -> bool {
        self != LodLevel::Hidden
    }

    /// Parse a subdivision count.
    pub fn from_subdivisions(n: u32) -> Result<Self, LodError> {
        match n {
            0 => Ok(LodLevel::Hidden),
            2 => Ok(LodLevel::Two),
            4 => Ok(LodLevel::Four),
            8 => Ok(LodLevel::Eight),
            16 => Ok(LodLevel::Sixteen),
            other => Err(LodError::UnsupportedLevel(other)),
        }
    }
}

impl fmt::Display for LodLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.subdivisions())
    }
}
