// Distance mapping: absolute time offset -> radial distance from "now".
//
// Two strategies share the same contract:
// - Logarithmic: log10 growth relative to the effective interval of the
//   current scale, damped near the center by a distortion factor so the
//   radius stays bounded for far-off tasks.
// - OrbitBands: piecewise-linear bands (hour, day, week, ...) whose outer
//   radii are fixed boundaries, stretched by the scale value.
//
// Both pin a zero offset to `base_distance`, pull past tasks inwards by
// `past_dampening` (never below the base), and never decrease as the
// offset grows.

use serde::{Deserialize, Serialize};

use super::LayoutConfig;
use crate::scale::TimeInterval;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistanceMapping {
    #[default]
    Logarithmic,
    OrbitBands,
}

/// Orbit bands: (interval, outer boundary radius before scaling).
pub(crate) const ORBIT_BANDS: [(TimeInterval, f64); 6] = [
    (TimeInterval::Hour, 5.0),
    (TimeInterval::Day, 15.0),
    (TimeInterval::Week, 30.0),
    (TimeInterval::Month, 60.0),
    (TimeInterval::Quarter, 110.0),
    (TimeInterval::Year, 200.0),
];

/// `1 - exp(-offset / (interval * k))`: 0 at the center, approaching 1 far out.
pub fn distortion_factor(abs_offset_ms: f64, interval_ms: f64, k: f64) -> f64 {
    1.0 - (-abs_offset_ms / (interval_ms * k)).exp()
}

/// Map an absolute offset from now to a distance from the origin.
pub fn map_time_to_distance(abs_offset_ms: f64, scale: f64, is_future: bool, cfg: &LayoutConfig) -> f64 {
    if !(abs_offset_ms > 0.0) {
        return cfg.base_distance;
    }

    let distance = match cfg.distance_mapping {
        DistanceMapping::Logarithmic => logarithmic_distance(abs_offset_ms, scale, cfg),
        DistanceMapping::OrbitBands => cfg.base_distance + band_radius(abs_offset_ms) * orbit_stretch(scale, cfg),
    };

    if is_future {
        distance
    } else {
        (distance * cfg.past_dampening).max(cfg.base_distance)
    }
}

fn logarithmic_distance(abs_offset_ms: f64, scale: f64, cfg: &LayoutConfig) -> f64 {
    let interval = cfg.presets.duration_for_scale(scale, cfg.interpolation);
    let presets = cfg.presets.presets();
    let shortest = presets[0].unit_duration_ms;
    let longest = presets[presets.len() - 1].unit_duration_ms;

    // A full-range offset (longest preset at the shortest scale) spans max_distance.
    let log_scale = if longest > shortest {
        cfg.max_distance / (1.0 + longest / shortest).log10()
    } else {
        cfg.max_distance
    };
    let raw = cfg.base_distance + (1.0 + abs_offset_ms / interval).log10() * log_scale;
    let distortion = distortion_factor(abs_offset_ms, interval, cfg.distortion_k);

    cfg.base_distance + (raw - cfg.base_distance) * distortion
}

/// Unscaled band radius: continuous and piecewise linear, 0 at zero offset,
/// capped at the outermost boundary.
fn band_radius(abs_offset_ms: f64) -> f64 {
    let mut inner_radius = 0.0;
    let mut inner_ms = 0.0;
    for (interval, boundary) in ORBIT_BANDS {
        let outer_ms = interval.ms();
        if abs_offset_ms < outer_ms {
            let t = (abs_offset_ms - inner_ms) / (outer_ms - inner_ms);
            return inner_radius + (boundary - inner_radius) * t;
        }
        inner_radius = boundary;
        inner_ms = outer_ms;
    }
    inner_radius
}

/// Stretch applied to band radii: half a unit plus the slider's distance from its minimum.
pub(crate) fn orbit_stretch(scale: f64, cfg: &LayoutConfig) -> f64 {
    cfg.presets.clamp(scale) - cfg.presets.min_value() + 0.5
}
