//! Hemisphere culling for the unit globe.
//!
//! A cell whose centre direction `c` satisfies `dot(c, camera_dir) < 1/D - margin`
//! is behind the visible horizon seen from camera distance `D`. The margin
//! widens the visible cap a little so cells do not pop at the silhouette.

use glam::DVec3;

/// Default widening of the visible cap, in dot-product units.
pub const DEFAULT_HORIZON_MARGIN: f64 = 0.15;

/// Horizon culling state for one camera position.
#[derive(Clone, Debug)]
pub struct HorizonCuller {
    /// Camera distance from the globe centre.
    camera_distance: f64,
    /// Unit direction from the globe centre to the camera.
    camera_dir: DVec3,
    /// Minimum dot product for a visible centre direction.
    threshold: f64,
    /// Angular radius of the visible cap, `acos(clamp(threshold))`.
    cap_angle: f64,
    /// Camera at or inside the surface: nothing is culled.
    inside: bool,
}

impl HorizonCuller {
    /// Build culling state for a camera at `camera_pos` (globe centre at the
    /// origin, radius 1).
    #[must_use]
    pub fn new(camera_pos: DVec3, margin: f64) -> Self {
        let camera_distance = camera_pos.length();
        let inside = camera_distance <= 1.0;
        let camera_dir = if camera_distance > 0.0 {
            camera_pos / camera_distance
        } else {
            DVec3::Z
        };
        let threshold = if inside {
            -1.0
        } else {
            1.0 / camera_distance - margin
        };
        Self {
            camera_distance,
            camera_dir,
            threshold,
            cap_angle: threshold.clamp(-1.0, 1.0).acos(),
            inside,
        }
    }

    /// Camera distance from the globe centre.
    #[must_use]
    pub fn camera_distance(&self) -> f64 {
        self.camera_distance
    }

    /// Unit direction toward the camera.
    #[must_use]
    pub fn camera_dir(&self) -> DVec3 {
        self.camera_dir
    }

    /// Whether a cell with unit centre direction `center_dir` is visible.
    #[must_use]
    pub fn is_visible(&self, center_dir: DVec3) -> bool {
        self.inside || center_dir.dot(self.camera_dir) >= self.threshold
    }

    /// Cheap per-face pre-test. Returns `false` only when no direction within
    /// `angular_radius` of `face_center_dir` can pass [`Self::is_visible`].
    #[must_use]
    pub fn may_see_face(&self, face_center_dir: DVec3, angular_radius: f64) -> bool {
        if self.inside {
            return true;
        }
        let angle = face_center_dir
            .dot(self.camera_dir)
            .clamp(-1.0, 1.0)
            .acos();
        angle - angular_radius <= self.cap_angle
    }
}
