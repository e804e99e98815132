// Position composer: one task -> one SpatialPosition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::LayoutConfig;
use super::angle::{compute_angle, spiral_factor};
use super::distance::{DistanceMapping, distortion_factor, map_time_to_distance};
use crate::model::TaskSnapshot;

/// Where a task sits in the scene. The XZ plane is the timeline, Y is elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Always `hypot(x, z)`.
    pub radius: f64,
    /// Radians, after spiral skew.
    pub angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spiral_offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distortion: Option<f64>,
}

impl SpatialPosition {
    /// Position on the plane at `radius`/`angle`, lifted to `y`.
    pub fn from_polar(radius: f64, angle: f64, y: f64) -> Self {
        Self {
            x: angle.cos() * radius,
            y,
            z: angle.sin() * radius,
            radius,
            angle,
            spiral_offset: None,
            distortion: None,
        }
    }

    /// Refresh `radius` and `angle` from the cartesian coordinates.
    pub(crate) fn recompute_polar(&mut self) {
        self.radius = self.x.hypot(self.z);
        self.angle = self.z.atan2(self.x);
    }
}

/// Compose the position of a single task relative to `now`.
pub fn compute_position(task: &TaskSnapshot, scale: f64, now: DateTime<Utc>, cfg: &LayoutConfig) -> SpatialPosition {
    let is_future = task.is_future(now);
    let abs_offset_ms = task.offset_ms(now).abs();

    let radius = map_time_to_distance(abs_offset_ms, scale, is_future, cfg);
    let mut angle = compute_angle(task.due_at, &task.id, is_future, cfg);

    let spiral_offset = if cfg.spiral {
        let factor = spiral_factor(&task.id, cfg);
        angle += factor * radius / 100.0;
        Some(factor)
    } else {
        None
    };

    let y = if task.completed {
        cfg.completed_elevation
    } else {
        cfg.priority_elevation.get(task.priority)
    };

    // Orbit bands have no distortion curve.
    let distortion = match cfg.distance_mapping {
        DistanceMapping::Logarithmic => {
            let interval = cfg.presets.duration_for_scale(scale, cfg.interpolation);
            Some(distortion_factor(abs_offset_ms, interval, cfg.distortion_k))
        }
        DistanceMapping::OrbitBands => None,
    };

    SpatialPosition {
        spiral_offset,
        distortion,
        ..SpatialPosition::from_polar(radius, angle, y)
    }
}
