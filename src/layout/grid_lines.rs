// Reference rings drawn behind the tasks.
//
// For the logarithmic mapping the rings mark the current interval, its
// neighbours and fractions of it; for orbit bands there is one ring per band.
// Radii always come from the same distance mapping the tasks use, so a task
// due in exactly one day sits on the "1d" ring.

use serde::Serialize;

use super::LayoutConfig;
use super::distance::{DistanceMapping, ORBIT_BANDS, map_time_to_distance, orbit_stretch};
use crate::scale::TimeInterval;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLine {
    pub radius: f64,
    pub label: String,
    /// None for preset-table entries without a named interval.
    pub interval: Option<TimeInterval>,
    pub time_ms: f64,
    /// Prominence in `[0, 1]`.
    pub alpha: f64,
}

/// Annulus used to draw one orbit band.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RingBounds {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub segments: u32,
}

const RING_THICKNESS: f64 = 0.5;
const RING_SEGMENTS: u32 = 64;

/// Grid lines for the given scale, outermost concerns first and `NOW` last.
pub fn generate_grid_lines(scale: f64, cfg: &LayoutConfig) -> Vec<GridLine> {
    let mut lines = match cfg.distance_mapping {
        DistanceMapping::Logarithmic => interval_lines(scale, cfg),
        DistanceMapping::OrbitBands => ORBIT_BANDS
            .iter()
            .enumerate()
            .map(|(index, &(interval, _))| GridLine {
                radius: ring_bounds(index, scale, cfg).inner_radius,
                label: interval.short_label().to_string(),
                interval: Some(interval),
                time_ms: interval.ms(),
                alpha: 0.7,
            })
            .collect(),
    };

    lines.push(GridLine {
        radius: cfg.base_distance,
        label: "NOW".to_string(),
        interval: None,
        time_ms: 0.0,
        alpha: 1.0,
    });
    lines
}

fn interval_lines(scale: f64, cfg: &LayoutConfig) -> Vec<GridLine> {
    let presets = cfg.presets.presets();
    let primary_index = cfg.presets.floor_index(scale);
    let primary = &presets[primary_index];

    let line = |time_ms: f64, label: String, interval: Option<TimeInterval>, alpha: f64| GridLine {
        radius: map_time_to_distance(time_ms, scale, true, cfg),
        label,
        interval,
        time_ms,
        alpha,
    };
    let label_of = |index: usize| {
        let preset = &presets[index];
        preset.interval.map_or_else(|| preset.label.clone(), |i| i.short_label().to_string())
    };

    let mut lines = vec![line(primary.unit_duration_ms, label_of(primary_index), primary.interval, 1.0)];

    if let Some(next) = presets.get(primary_index + 1) {
        lines.push(line(next.unit_duration_ms, label_of(primary_index + 1), next.interval, 0.7));
    }
    if primary_index > 0 {
        let prev = &presets[primary_index - 1];
        lines.push(line(prev.unit_duration_ms, label_of(primary_index - 1), prev.interval, 0.7));
    }

    let primary_label = label_of(primary_index);
    lines.push(line(primary.unit_duration_ms / 2.0, format!("½{primary_label}"), primary.interval, 0.4));
    lines.push(line(primary.unit_duration_ms / 4.0, format!("¼{primary_label}"), primary.interval, 0.3));
    lines
}

/// Ring for orbit band `band_index` (clamped to the outermost band).
pub fn ring_bounds(band_index: usize, scale: f64, cfg: &LayoutConfig) -> RingBounds {
    let (_, boundary) = ORBIT_BANDS[band_index.min(ORBIT_BANDS.len() - 1)];
    let inner_radius = cfg.base_distance + boundary * orbit_stretch(scale, cfg);
    RingBounds {
        inner_radius,
        outer_radius: inner_radius + RING_THICKNESS,
        segments: RING_SEGMENTS,
    }
}
